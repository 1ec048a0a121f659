//! Worker error types.

use thiserror::Error;

pub type WorkerResult<T> = Result<T, WorkerError>;

#[derive(Debug, Error)]
pub enum WorkerError {
    #[error("Research failed: {0}")]
    ResearchFailed(String),

    #[error("Generation failed: {0}")]
    GenerationFailed(String),

    #[error("Http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Json error: {0}")]
    Json(#[from] serde_json::Error),
}

impl WorkerError {
    pub fn research_failed(msg: impl Into<String>) -> Self {
        Self::ResearchFailed(msg.into())
    }

    pub fn generation_failed(msg: impl Into<String>) -> Self {
        Self::GenerationFailed(msg.into())
    }
}
