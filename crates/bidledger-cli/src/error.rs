//! Errors surfaced by the CLI and the exit codes they map to

use bidledger_core::errors::{LedgerError, OpError, OpErrorKind};
use bidledger_engine::ConfigError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error(transparent)]
    Op(#[from] OpError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Failed to encode output: {0}")]
    Output(#[from] serde_json::Error),

    #[error("{0}")]
    Usage(String),
}

impl From<LedgerError> for CliError {
    fn from(err: LedgerError) -> Self {
        CliError::Op(err.into())
    }
}

impl CliError {
    /// Process exit code. Operation failures get one code per kind so
    /// scripts can branch without parsing stderr.
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Op(e) => match e.kind() {
                OpErrorKind::Unauthorized => 2,
                OpErrorKind::Forbidden => 3,
                OpErrorKind::NotFound => 4,
                OpErrorKind::InvalidTransition => 5,
                OpErrorKind::ValidationError => 6,
                OpErrorKind::StorageFailure => 7,
            },
            CliError::Config(_) | CliError::Output(_) | CliError::Usage(_) => 1,
        }
    }
}
