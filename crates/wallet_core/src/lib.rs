//! Core ledger logic for the wallet.
//! This crate is the single source of truth for record invariants.

pub mod container;
pub mod logging;
pub mod model;
pub mod service;
pub mod store;

pub use container::record_list::{NodeRef, RecordList};
pub use logging::{default_log_level, init_logging, logging_status, LoggingError};
pub use model::field::{FieldRule, RecordField, ValidationError, ValidationResult};
pub use model::record::{Record, RecordDraft, RecordRules, MAX_DESCRIPTION_CHARS};
pub use model::validator::{
    supported_categories, FieldValidator, StandardValidator, CATEGORY_EXPENSE, CATEGORY_INCOME,
};
pub use service::record_service::{
    BalanceSummary, KeyQueryOutcome, QueryValue, RecordService, MSG_ADDED, MSG_INVALID_INDEX,
    MSG_NO_RECORDS, MSG_REMOVED, MSG_UPDATED,
};
pub use store::{
    Document, JsonFileStore, RecordStore, StoreError, StoreLock, StoreResult, DEFAULT_DATA_FILE,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
