//! The module contains the faults the engine can raise.
//!
//! Expected failures (a rejected request, a missing record, a label that can
//! no longer be used) are never errors: handlers return them as a
//! [`Failure`] inside an [`Outcome`]. [`EngineError`] is reserved for faults
//! the caller cannot act upon:
//!
//! - [`Database`] when the store is unreachable or a statement fails.
//! - [`Cancelled`] when the caller gave up before the work was done.
//! - [`DuplicateHandler`] / [`MissingHandler`] for a broken handler registry.
//! - [`CorruptRecord`] when a stored row no longer maps onto its entity.
//!
//!  [`Failure`]: crate::Failure
//!  [`Outcome`]: crate::Outcome
//!  [`Database`]: EngineError::Database
//!  [`Cancelled`]: EngineError::Cancelled
//!  [`DuplicateHandler`]: EngineError::DuplicateHandler
//!  [`MissingHandler`]: EngineError::MissingHandler
//!  [`CorruptRecord`]: EngineError::CorruptRecord
use sea_orm::DbErr;
use thiserror::Error;

/// Engine infrastructure faults.
#[derive(Error, Debug)]
pub enum EngineError {
    #[error(transparent)]
    Database(#[from] DbErr),
    #[error("request cancelled")]
    Cancelled,
    #[error("\"{0}\" has more than one handler")]
    DuplicateHandler(&'static str),
    #[error("\"{0}\" has no handler")]
    MissingHandler(&'static str),
    #[error("corrupt record: {0}")]
    CorruptRecord(String),
}

impl PartialEq for EngineError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            (Self::Cancelled, Self::Cancelled) => true,
            (Self::DuplicateHandler(a), Self::DuplicateHandler(b)) => a == b,
            (Self::MissingHandler(a), Self::MissingHandler(b)) => a == b,
            (Self::CorruptRecord(a), Self::CorruptRecord(b)) => a == b,
            _ => false,
        }
    }
}
