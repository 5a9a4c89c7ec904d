//! Build script for gozero-ai
//!
//! Stamps the binary with its git revision, build time, and profile for the
//! startup log, and rebuilds when the embedded sample catalog changes.

use std::process::Command;

const SAMPLE_CATALOG: &str = "data/sample_catalog.json";

fn short_git_revision() -> Option<String> {
    let output = Command::new("git")
        .args(["rev-parse", "--short=8", "HEAD"])
        .output()
        .ok()?;
    if !output.status.success() {
        return None;
    }
    let revision = String::from_utf8(output.stdout).ok()?;
    Some(revision.trim().to_string()).filter(|r| !r.is_empty())
}

fn main() {
    // include_str! alone does not re-run this script
    println!("cargo:rerun-if-changed={}", SAMPLE_CATALOG);
    println!("cargo:rerun-if-changed=build.rs");
    println!("cargo:rerun-if-env-changed=PROFILE");

    let revision = short_git_revision().unwrap_or_else(|| "unknown".to_string());
    let built_at = chrono::Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Secs, true);
    let profile = std::env::var("PROFILE").unwrap_or_else(|_| "unknown".to_string());

    println!("cargo:rustc-env=GIT_HASH={}", revision);
    println!("cargo:rustc-env=BUILD_TIMESTAMP={}", built_at);
    println!("cargo:rustc-env=BUILD_PROFILE={}", profile);
}
