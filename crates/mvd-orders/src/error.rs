//! Error taxonomy for lifecycle operations.
//!
//! Each variant maps to exactly one HTTP status in the daemon:
//! `Validation`/`Conflict`/`Dependency` → 400, `NotFound` → 404,
//! `Forbidden` → 403, `Internal` → 500. Errors are handled per request and
//! never retried.

// ---------------------------------------------------------------------------
// OrderError
// ---------------------------------------------------------------------------

/// The reason a lifecycle operation was refused or failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderError {
    /// Malformed or missing request data (e.g. empty item list).
    Validation(String),
    /// The order does not exist.
    NotFound(String),
    /// The caller is not the order's owner.
    Forbidden(String),
    /// The operation is not legal in the order's current state
    /// (insufficient stock, duplicate payment, non-cancellable state,
    /// unknown status value).
    Conflict(String),
    /// A collaborator (catalog) is unreachable or rejected the lookup.
    Dependency(String),
    /// Persistence failure.
    Internal(String),
}

impl std::fmt::Display for OrderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderError::Validation(msg)
            | OrderError::NotFound(msg)
            | OrderError::Forbidden(msg)
            | OrderError::Conflict(msg)
            | OrderError::Dependency(msg)
            | OrderError::Internal(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for OrderError {}

impl OrderError {
    /// Wrap a store failure, preserving the anyhow chain as text.
    pub fn internal(err: anyhow::Error) -> Self {
        OrderError::Internal(format!("{err:#}"))
    }
}
