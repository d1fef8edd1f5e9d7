//! Errors raised by the drivers and use cases.

use agentspark_core::{InferenceError, SparkError};
use agentspark_infrastructure::ShareError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    /// The orchestrated call failed; carries the terminal `{status?, message}`
    #[error(transparent)]
    Inference(#[from] InferenceError),

    #[error(transparent)]
    Domain(#[from] SparkError),

    #[error(transparent)]
    Share(#[from] ShareError),

    #[error("Failed to render prompt: {0}")]
    Template(String),

    /// The operation does not fit the session's current phase
    #[error("{0}")]
    InvalidState(String),
}

impl AppError {
    pub fn invalid_state(message: impl Into<String>) -> Self {
        AppError::InvalidState(message.into())
    }

    /// True when the model answered but the reply could not be used.
    pub fn is_parse(&self) -> bool {
        matches!(self, AppError::Domain(SparkError::Parse(_)))
    }
}

impl From<minijinja::Error> for AppError {
    fn from(err: minijinja::Error) -> Self {
        AppError::Template(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
