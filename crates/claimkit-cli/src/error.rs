//! Error types for the CLI application.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for CLI operations.
pub type Result<T> = std::result::Result<T, CliError>;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    /// Input file could not be read
    #[error("Cannot read {}: {source}", path.display())]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// TOML parsing error
    #[error("TOML parsing error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Binding schema file is malformed
    #[error("Schema error: {0}")]
    Schema(String),

    /// Record file does not match the binding schema
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Property catalog error
    #[error("Catalog error: {0}")]
    Domain(#[from] claimkit_domain::DomainError),

    /// Transformation error
    #[error("Transform error: {0}")]
    Transform(#[from] claimkit_transform::TransformError),
}
