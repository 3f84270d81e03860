//! CLI error types.

use dataflow_config::ConfigError;
use dataflow_erd::DocumentError;
use dataflow_gemini::{GenerationError, PoolError};

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Pool(#[from] PoolError),

    #[error("{0}")]
    Generation(#[from] GenerationError),

    #[error("invalid document: {0}")]
    Document(#[from] DocumentError),

    #[error("{0}")]
    Validation(String),
}
