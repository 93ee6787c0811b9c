use thiserror::Error;

/// Unified infrastructure error type used by stores and collaborators.
///
/// Domain modules translate these at their own boundary. A `NotFound`
/// from a store means different things to different callers, so no
/// blanket conversion into HTTP responses happens here.
#[derive(Error, Debug)]
pub enum ServiceError {
    /// Resource does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate key / resource already exists.
    #[error("{0}")]
    Conflict(String),

    /// Storage backend failure.
    #[error("{0}")]
    Storage(String),

    /// Unexpected internal error.
    #[error("{0}")]
    Internal(String),
}
