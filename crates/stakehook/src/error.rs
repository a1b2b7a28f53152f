use std::sync::PoisonError;

/// Hook Error.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum Error {
    /// Model Error.
    #[error("model: {0}")]
    Model(#[from] stakehook_model::Error),
    /// The event was not delivered by the pool manager.
    #[error("unauthorized sender")]
    Unauthorized,
    /// The pool has no reward program.
    #[error("pool has no reward program")]
    Uninitialized,
    /// A lock was poisoned by a panicking holder.
    #[error("lock poisoned")]
    Poisoned,
}

impl<T> From<PoisonError<T>> for Error {
    fn from(_: PoisonError<T>) -> Self {
        Self::Poisoned
    }
}
