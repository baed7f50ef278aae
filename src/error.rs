use std::path::PathBuf;

use crate::ai::{AnalysisError, ValidationError};
use crate::config::ConfigError;
use crate::document::ExtractionError;
use crate::session::SessionError;

/// Anything that ends a command early
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Extraction(#[from] ExtractionError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),

    #[error(transparent)]
    Session(SessionError),

    #[error("failed to read {path}: {source}")]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to start async runtime: {0}")]
    Runtime(#[source] std::io::Error),
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Validation(e) => Self::Validation(e),
            other => Self::Session(other),
        }
    }
}

impl AppError {
    /// Extra lines printed under the error message
    pub fn details(&self) -> Option<&str> {
        match self {
            Self::Analysis(e) => e.details.as_deref(),
            _ => None,
        }
    }
}
