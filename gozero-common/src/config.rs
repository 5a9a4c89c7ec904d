//! Configuration file model and config path resolution

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Default listen port for gozero-ai
pub const DEFAULT_PORT: u16 = 5730;

/// Default listen host for gozero-ai
pub const DEFAULT_HOST: &str = "127.0.0.1";

/// Top-level TOML configuration file
///
/// Every section is optional; a missing section falls back to its defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub vision: VisionSection,
}

/// `[server]` section
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

/// `[logging]` section
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// tracing-subscriber filter directive (e.g. "gozero_ai=debug,tower_http=info")
    pub filter: Option<String>,
}

/// `[vision]` section: inference provider settings
///
/// `api_key` absent means the service runs in sample-catalog mode.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VisionSection {
    pub api_key: Option<String>,
    pub endpoint: Option<String>,
    pub vision_model: Option<String>,
    pub chat_model: Option<String>,
    pub timeout_secs: Option<u64>,
    pub chat_timeout_secs: Option<u64>,
}

/// Resolve the configuration file path
///
/// Priority order:
/// 1. Command-line argument
/// 2. Environment variable `env_var_name`
/// 3. `<config_dir>/gozero/<module_name>.toml` if that file exists
///
/// Returns `None` when no file is configured or found; callers use defaults.
pub fn resolve_config_path(
    cli_arg: Option<&Path>,
    env_var_name: &str,
    module_name: &str,
) -> Option<PathBuf> {
    if let Some(path) = cli_arg {
        return Some(path.to_path_buf());
    }

    if let Ok(path) = std::env::var(env_var_name) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }

    default_config_path(module_name).filter(|p| p.exists())
}

/// Platform config location for a module (`~/.config/gozero/<module>.toml` on Linux)
pub fn default_config_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("gozero").join(format!("{}.toml", module_name)))
}

/// Load and parse a TOML config file
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;

    toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
}

/// Load the config file if a path was resolved, otherwise return defaults
///
/// A path that does not exist yields defaults; a file that exists but
/// fails to parse is an error.
pub fn load_or_default(path: Option<&Path>) -> Result<TomlConfig> {
    match path {
        Some(p) if p.exists() => {
            let config = load_toml_config(p)?;
            info!("Loaded configuration from {}", p.display());
            Ok(config)
        }
        Some(p) => {
            info!("Config file {} not found, using defaults", p.display());
            Ok(TomlConfig::default())
        }
        None => {
            debug!("No config file configured, using defaults");
            Ok(TomlConfig::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_empty_toml_uses_defaults() {
        let config: TomlConfig = toml::from_str("").unwrap();
        assert_eq!(config.server.port, DEFAULT_PORT);
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert!(config.vision.api_key.is_none());
        assert!(config.logging.filter.is_none());
    }

    #[test]
    fn test_load_toml_config_sections() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(
            file,
            r#"
[server]
port = 6000

[logging]
filter = "gozero_ai=debug"

[vision]
api_key = "sk-test"
timeout_secs = 12
"#
        )
        .unwrap();

        let config = load_toml_config(file.path()).unwrap();
        assert_eq!(config.server.port, 6000);
        assert_eq!(config.server.host, DEFAULT_HOST);
        assert_eq!(config.logging.filter.as_deref(), Some("gozero_ai=debug"));
        assert_eq!(config.vision.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.vision.timeout_secs, Some(12));
        assert!(config.vision.endpoint.is_none());
    }

    #[test]
    fn test_load_invalid_toml_is_config_error() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "[server\nport = ").unwrap();

        let err = load_toml_config(file.path()).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_load_or_default_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("absent.toml");
        let config = load_or_default(Some(&missing)).unwrap();
        assert_eq!(config.server.port, DEFAULT_PORT);

        let config = load_or_default(None).unwrap();
        assert!(config.vision.api_key.is_none());
    }

    #[test]
    #[serial]
    fn test_resolve_config_path_priority() {
        std::env::set_var("GOZERO_TEST_CONFIG", "/tmp/from-env.toml");

        let cli = PathBuf::from("/tmp/from-cli.toml");
        assert_eq!(
            resolve_config_path(Some(&cli), "GOZERO_TEST_CONFIG", "gozero-test"),
            Some(cli.clone())
        );
        assert_eq!(
            resolve_config_path(None, "GOZERO_TEST_CONFIG", "gozero-test"),
            Some(PathBuf::from("/tmp/from-env.toml"))
        );

        std::env::remove_var("GOZERO_TEST_CONFIG");
    }

    #[test]
    #[serial]
    fn test_resolve_config_path_blank_env_ignored() {
        std::env::set_var("GOZERO_TEST_CONFIG_BLANK", "   ");
        let resolved = resolve_config_path(None, "GOZERO_TEST_CONFIG_BLANK", "gozero-nonexistent-module");
        assert!(resolved.is_none());
        std::env::remove_var("GOZERO_TEST_CONFIG_BLANK");
    }
}
