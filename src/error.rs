//! Error types for the signal dispatcher
//!
//! Routing itself never fails: every extractor is total and `evaluate`
//! always produces a result. Errors only surface while building a
//! dispatcher from configuration.

use thiserror::Error;

/// Main error type for dispatcher construction and configuration
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Failed to read config file {path}: {source}")]
    ConfigIo {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse YAML config: {0}")]
    ConfigParse(String),

    #[error("Reflex threshold {0} is outside [0, 1]")]
    InvalidThreshold(f32),
}

pub type Result<T> = std::result::Result<T, DispatchError>;
