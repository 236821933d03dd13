// src/domain/error.rs
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DomainError {
    #[error("Template '{0}' not found")]
    TemplateNotFound(String),
    #[error("Render error: {0}")]
    Render(String),
}

/// Failures of a single call to the Tana Input API.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TransportError {
    #[error("API token not configured. Run \"tana config set api.token <your-token>\" first.")]
    AuthConfig,
    #[error("API Error {status}: {message}")]
    ApiStatus { status: u16, message: String },
    #[error("Network error: Could not reach Tana API ({0})")]
    Network(String),
    #[error("Request error: {0}")]
    Request(String),
}

impl TransportError {
    /// Network failures are the only ones worth retrying by the caller.
    pub fn is_retriable(&self) -> bool {
        matches!(self, TransportError::Network(_))
    }
}

/// A batched send stopped at `chunk`; responses of earlier chunks are kept in `completed`.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Batch {chunk} failed after {} successful batch(es): {source}", .completed.len())]
pub struct BatchError {
    pub chunk: usize,
    pub completed: Vec<serde_json::Value>,
    #[source]
    pub source: TransportError,
}

impl BatchError {
    pub fn into_inner(self) -> TransportError {
        self.source
    }
}

/// Failure of a send use case: the note could not be built, or a call failed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SendError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error(transparent)]
    Transport(#[from] TransportError),
    #[error(transparent)]
    Batch(#[from] BatchError),
}
