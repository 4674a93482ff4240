use std::time::Duration;

/// Errors from object store exchanges.
///
/// The store itself cannot reject a well-formed request; every variant here
/// describes a failure of the exchange with the actor.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StoreError {
    /// The actor task is no longer running.
    #[error("object store is closed")]
    Closed,

    /// The actor did not reply within the configured request timeout.
    #[error("object store request timed out after {0:?}")]
    Timeout(Duration),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
