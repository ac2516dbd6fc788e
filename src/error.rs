//! Domain failure taxonomy shared by the application modules.

use thiserror::Error;

use libris_http::error::AppError;
use libris_store::StoreError;

/// Everything a catalog or lending operation can fail with.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The caller supplied a token that cannot be an identifier. Raised
    /// before any store access happens.
    #[error("'{0}' is not a valid identifier")]
    MalformedId(String),

    /// The identifier parsed but matched no record.
    #[error("{kind} '{id}' not found")]
    NotFound { kind: &'static str, id: String },

    /// A lending precondition was violated.
    #[error("{0}")]
    InvalidState(&'static str),

    /// A conditional update matched nothing even though the record was just
    /// read. Another caller raced this transition; safe to retry.
    #[error("record changed concurrently, no update applied")]
    UpdateConflict,

    /// The store backend itself failed. Not retried automatically.
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::MalformedId(_) | DomainError::InvalidState(_) => {
                AppError::bad_request(err.to_string())
            }
            DomainError::NotFound { .. } => AppError::not_found(err.to_string()),
            DomainError::UpdateConflict => AppError::Internal(anyhow::Error::new(err)),
            DomainError::Store(inner) => AppError::Internal(anyhow::Error::new(inner)),
        }
    }
}
