use std::fmt;

use async_trait::async_trait;

use super::types::{Note, NoteDraft, NoteId};

/// Errors that can occur while talking to the notes service.
/// None of them are retried; the user repeats the action instead.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Transport-level failure (DNS, connection refused, reset).
    Network(String),
    /// The server rejected the submitted note (HTTP 400 / 422).
    Validation(String),
    /// The referenced note does not exist on the server (HTTP 404).
    NotFound(NoteId),
    /// Any other non-success status.
    Server { status: u16, message: String },
    /// Success status, but the body was not the expected JSON.
    Parse(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Network(msg) => write!(f, "network error: {msg}"),
            ServiceError::Validation(msg) => write!(f, "validation error: {msg}"),
            ServiceError::NotFound(id) => write!(f, "note {id} not found"),
            ServiceError::Server { status, message } => {
                write!(f, "server error (HTTP {status}): {message}")
            }
            ServiceError::Parse(msg) => write!(f, "parse error: {msg}"),
        }
    }
}

impl std::error::Error for ServiceError {}

/// The four operations the board consumes from the notes backend.
///
/// Every call is a single request: no batching, no streaming, no retry.
#[async_trait]
pub trait NotesService: Send + Sync {
    /// Returns the name of the backend (used in logs).
    fn name(&self) -> &str;

    async fn list(&self) -> Result<Vec<Note>, ServiceError>;

    async fn create(&self, draft: &NoteDraft) -> Result<Note, ServiceError>;

    async fn update(&self, id: NoteId, draft: &NoteDraft) -> Result<Note, ServiceError>;

    async fn delete(&self, id: NoteId) -> Result<(), ServiceError>;
}
