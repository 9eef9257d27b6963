use thiserror::Error;
use uuid::Uuid;

/// Errors surfaced by repository implementations.
///
/// The transport layer maps these to HTTP status codes by variant, so
/// both backends must report the same kinds for the same conditions.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("{kind} with id {id} not found")]
    NotFound { kind: &'static str, id: Uuid },

    #[error("storage error: {message}")]
    Storage { message: String },
}

impl RepoError {
    pub fn not_found(kind: &'static str, id: Uuid) -> Self {
        Self::NotFound { kind, id }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}
