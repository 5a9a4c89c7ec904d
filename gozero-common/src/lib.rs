//! # GoZero Common Library
//!
//! Shared code for the GoZero services:
//! - Common error and result types
//! - TOML configuration model and loading
//! - Configuration file path resolution

pub mod config;
pub mod error;

pub use error::{Error, Result};
