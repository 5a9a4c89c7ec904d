//! Common error types for GoZero

use thiserror::Error;

/// Common result type for GoZero operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across GoZero services
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),
}
