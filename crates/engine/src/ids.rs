//! Record identifiers.
//!
//! Ids look like `e_01HMZ3…`: a one-letter kind prefix and a ULID stamped
//! with the creation instant, so they sort by creation time and an
//! expenditure id can never be mistaken for a label id.
//!
//! One generator serves the whole process. Ids minted within the same
//! millisecond, or under a clock that stands still, keep increasing in
//! the order they were minted.

use std::{
    sync::{Mutex, PoisonError},
    time::SystemTime,
};

use chrono::{DateTime, Utc};
use ulid::{Generator, Ulid};

static GENERATOR: Mutex<Generator> = Mutex::new(Generator::new());

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IdKind {
    Expenditure,
    Income,
    Label,
}

impl IdKind {
    pub fn prefix(self) -> &'static str {
        match self {
            Self::Expenditure => "e",
            Self::Income => "i",
            Self::Label => "l",
        }
    }
}

pub(crate) fn new_id(kind: IdKind, created_at: DateTime<Utc>) -> String {
    let at = SystemTime::from(created_at);
    let ulid = GENERATOR
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
        .generate_from_datetime(at)
        .unwrap_or_else(|err| {
            tracing::warn!("monotonic id space exhausted: {err}");
            Ulid::from_datetime(at)
        });
    format!("{}_{ulid}", kind.prefix())
}
