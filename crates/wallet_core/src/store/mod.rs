//! Durable storage for the ledger document.
//!
//! # Responsibility
//! - Define the persisted document shape and the store contract.
//! - Map file-system and decode faults to `StoreError`.
//!
//! # Invariants
//! - The whole document is the unit of durability; there are no partial
//!   writes or side indexes.
//! - Reads reject documents of the wrong shape; rule checks on the decoded
//!   records belong to the caller that owns the rules.

use crate::model::field::ValidationError;
use crate::model::record::Record;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::PathBuf;

mod json_store;

pub use json_store::{JsonFileStore, StoreLock, DEFAULT_DATA_FILE};

pub type StoreResult<T> = Result<T, StoreError>;

/// Persisted dataset: records in head-to-tail order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub list: Vec<Record>,
}

/// Storage-layer fault. These are the only errors service calls surface.
#[derive(Debug)]
pub enum StoreError {
    /// The backing file could not be read, created or replaced.
    Unavailable {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The backing file is not a valid ledger document.
    Corrupt {
        path: PathBuf,
        source: serde_json::Error,
    },
    /// A decoded record breaks the rules of the service reading it.
    InvalidRecord {
        index: usize,
        source: ValidationError,
    },
    /// The in-memory document could not be encoded.
    Encode(serde_json::Error),
    /// The advisory lock could not be taken.
    Lock {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unavailable { path, source } => {
                write!(f, "store unavailable at `{}`: {source}", path.display())
            }
            Self::Corrupt { path, source } => {
                write!(f, "store document at `{}` is corrupt: {source}", path.display())
            }
            Self::InvalidRecord { index, source } => {
                write!(f, "stored record [{index}] is invalid: {source}")
            }
            Self::Encode(err) => write!(f, "failed to encode store document: {err}"),
            Self::Lock { path, source } => {
                write!(f, "failed to lock store at `{}`: {source}", path.display())
            }
        }
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::Encode(err)
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Unavailable { source, .. } | Self::Lock { source, .. } => Some(source),
            Self::Corrupt { source, .. } => Some(source),
            Self::InvalidRecord { source, .. } => Some(source),
            Self::Encode(err) => Some(err),
        }
    }
}

/// Store interface consumed by `RecordService`.
pub trait RecordStore {
    /// Guard that keeps the store exclusively locked while alive.
    type Lock;

    /// Creates an empty document when none exists. Idempotent.
    fn ensure_initialized(&self) -> StoreResult<()>;
    /// Loads the full document.
    fn read(&self) -> StoreResult<Document>;
    /// Replaces the full document.
    fn write(&self, document: &Document) -> StoreResult<()>;
    /// Takes the exclusive lock for a read-modify-write span.
    fn lock(&self) -> StoreResult<Self::Lock>;
}
