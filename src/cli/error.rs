//! CLI-level errors (wraps application and domain errors)

use thiserror::Error;

use crate::application::{LoadError, SaveError};
use crate::domain::DomainError;
use crate::exitcode;

/// CLI errors are the top-level error type.
/// These are what get displayed to the user.
#[derive(Error, Debug)]
pub enum CliError {
    #[error("{0}")]
    Load(#[from] LoadError),

    #[error("{0}")]
    Save(#[from] SaveError),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("config error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("invalid arguments: {0}")]
    InvalidArgs(String),

    #[error("{0}")]
    NotFound(String),
}

/// Result type for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

impl CliError {
    /// Get the appropriate exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Load(LoadError::Io { .. }) => exitcode::NOINPUT,
            CliError::Load(LoadError::Decode(_)) => exitcode::DATAERR,
            CliError::Save(_) => exitcode::CANTCREAT,
            CliError::Domain(_) => exitcode::DATAERR,
            CliError::Config(_) => exitcode::CONFIG,
            CliError::InvalidArgs(_) => exitcode::USAGE,
            CliError::NotFound(_) => exitcode::DATAERR,
        }
    }
}
