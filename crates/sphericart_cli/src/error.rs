//! CLI error types.

use thiserror::Error;

use crate::config::ConfigError;

/// Errors reported by `sphericart` commands.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Kernel error: {0}")]
    Kernel(#[from] sphericart_kernel::KernelError),

    #[error("Self-check failed: {0}")]
    CheckFailed(String),

    #[error("Serialisation error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for CLI commands.
pub type Result<T> = std::result::Result<T, CliError>;
