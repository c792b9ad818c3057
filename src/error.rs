//! Error types for the command line front end.
//!
//! Wraps the installer core's errors together with argument and I/O failures
//! so every command reports through one type.

use thiserror::Error;

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, YpackError>;

/// Main error type for all CLI operations
#[derive(Error, Debug)]
pub enum YpackError {
    /// CLI argument errors
    #[error("CLI error: {0}")]
    Cli(#[from] CliError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Errors from loading, resolving or converting a package description
    #[error("{0}")]
    Installer(#[from] crate::installer::Error),

    /// Generic errors from anyhow
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

/// CLI-specific errors
#[derive(Error, Debug)]
pub enum CliError {
    /// Invalid command line arguments
    #[error("Invalid arguments: {reason}")]
    InvalidArguments {
        /// Reason for the error
        reason: String,
    },
}
