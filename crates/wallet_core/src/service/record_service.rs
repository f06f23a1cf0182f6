//! Record use-case service.
//!
//! # Responsibility
//! - Run every ledger operation as read -> materialize -> mutate -> write.
//! - Turn validation and lookup failures into caller-facing messages.
//!
//! # Invariants
//! - Only `StoreError` escapes as an error; everything else is a value.
//! - Persisted records are checked against the service's own rules on every
//!   read; a record those rules reject is `StoreError::InvalidRecord`.
//! - Mutations hold the store lock from read to write.
//! - A rejected mutation never writes.

use crate::container::record_list::RecordList;
use crate::model::field::ValidationError;
use crate::model::record::{Record, RecordDraft, RecordRules};
use crate::model::validator::{CATEGORY_EXPENSE, CATEGORY_INCOME};
use crate::store::{Document, RecordStore, StoreError, StoreResult};
use log::{error, info, warn};
use std::collections::BTreeMap;
use std::sync::Arc;

pub const MSG_ADDED: &str = "The record was successfully added.";
pub const MSG_UPDATED: &str = "The record was successfully updated.";
pub const MSG_UPDATE_FAILED: &str = "Failed to update the record.";
pub const MSG_REMOVED: &str = "The record was successfully removed.";
pub const MSG_REMOVE_FAILED: &str = "Failed to remove the record.";
pub const MSG_NO_RECORDS: &str = "No records found.";
pub const MSG_INVALID_INDEX: &str = "Invalid index.";

const SEARCH_KEYS: &[&str] = &["amount", "category", "date"];

/// Search value as supplied by the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryValue {
    Number(f64),
    Text(String),
}

impl From<f64> for QueryValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

/// Result of `get_by_key`.
///
/// `Message` covers rejected keys, empty stores and invalid query values;
/// `Matches` may be empty when nothing matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyQueryOutcome {
    Matches(Vec<String>),
    Message(String),
}

/// Aggregated totals over all records.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BalanceSummary {
    pub balance: f64,
    pub income: f64,
    pub expense: f64,
    pub records: usize,
}

enum SearchKey {
    Amount(f64),
    Category(String),
    Date(String),
}

impl SearchKey {
    fn parse(by: &str, value: QueryValue) -> Option<Self> {
        match (by, value) {
            ("amount", QueryValue::Number(amount)) => Some(Self::Amount(amount)),
            ("category", QueryValue::Text(category)) => Some(Self::Category(category)),
            ("date", QueryValue::Text(date)) => Some(Self::Date(date)),
            _ => None,
        }
    }

    fn search<'a>(
        &self,
        list: &'a RecordList,
    ) -> Result<BTreeMap<usize, &'a Record>, ValidationError> {
        match self {
            Self::Amount(amount) => list.get_by_amount(*amount),
            Self::Category(category) => list.get_by_category(category),
            Self::Date(date) => list.get_by_date(date),
        }
    }
}

/// Use-case facade over a `RecordStore`.
pub struct RecordService<S: RecordStore> {
    store: S,
    rules: Arc<RecordRules>,
}

impl<S: RecordStore> RecordService<S> {
    /// Creates a service with the standard record rules.
    pub fn new(store: S) -> Self {
        Self::with_rules(store, RecordRules::standard())
    }

    /// Creates a service with caller-provided record rules.
    pub fn with_rules(store: S, rules: Arc<RecordRules>) -> Self {
        Self { store, rules }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Validates and appends one record.
    ///
    /// Validation failures come back as the message text and leave the store
    /// unmodified.
    pub fn add(
        &self,
        amount: f64,
        category: &str,
        date: &str,
        description: &str,
    ) -> StoreResult<String> {
        let _lock = self.store.lock()?;
        let mut document = self.store.read()?;

        let mut list = self.materialize(std::mem::take(&mut document.list))?;
        if let Err(err) = list.insert_last(amount, category, date, description) {
            return Ok(rejected("record_add", err));
        }

        document.list = list.into_records();
        self.store.write(&document)?;
        info!(
            "event=record_add module=service status=ok records={}",
            document.list.len()
        );
        Ok(MSG_ADDED.to_string())
    }

    /// Overwrites the supplied fields of the record at `index`.
    pub fn update(&self, index: i64, changes: &RecordDraft) -> StoreResult<String> {
        let _lock = self.store.lock()?;
        let mut document = self.store.read()?;

        if let Some(message) = check_index(document.list.len(), index) {
            return Ok(message.to_string());
        }

        let mut list = self.materialize(std::mem::take(&mut document.list))?;
        match list.update_by_index(index, changes) {
            Ok(true) => {}
            Ok(false) => return Ok(MSG_UPDATE_FAILED.to_string()),
            Err(err) => return Ok(rejected("record_update", err)),
        }

        document.list = list.into_records();
        self.store.write(&document)?;
        info!("event=record_update module=service status=ok index={index}");
        Ok(MSG_UPDATED.to_string())
    }

    /// Removes the record at `index`.
    pub fn remove(&self, index: i64) -> StoreResult<String> {
        let _lock = self.store.lock()?;
        let mut document = self.store.read()?;

        if let Some(message) = check_index(document.list.len(), index) {
            return Ok(message.to_string());
        }

        let mut list = self.materialize(std::mem::take(&mut document.list))?;
        if !list.remove_by_index(index) {
            return Ok(MSG_REMOVE_FAILED.to_string());
        }

        document.list = list.into_records();
        self.store.write(&document)?;
        info!(
            "event=record_remove module=service status=ok index={index} records={}",
            document.list.len()
        );
        Ok(MSG_REMOVED.to_string())
    }

    /// Sums income and expense records in one pass over the document.
    pub fn balance(&self) -> StoreResult<BalanceSummary> {
        let document = self.read_checked()?;
        let mut summary = BalanceSummary {
            records: document.list.len(),
            ..BalanceSummary::default()
        };

        for record in &document.list {
            match record.category() {
                CATEGORY_INCOME => {
                    summary.balance += record.amount();
                    summary.income += record.amount();
                }
                CATEGORY_EXPENSE => {
                    summary.balance -= record.amount();
                    summary.expense += record.amount();
                }
                _ => {}
            }
        }
        Ok(summary)
    }

    /// Returns `Balance: X`, `Income: X`, `Expense: X` lines.
    ///
    /// Totals are rounded to two decimals; an empty store reports a bare `0`.
    pub fn get_balance(&self) -> StoreResult<Vec<String>> {
        let summary = self.balance()?;
        let render = |total: f64| {
            if summary.records == 0 {
                "0".to_string()
            } else {
                format_amount(total)
            }
        };

        Ok(vec![
            format!("Balance: {}", render(summary.balance)),
            format!("Income: {}", render(summary.income)),
            format!("Expense: {}", render(summary.expense)),
        ])
    }

    /// Formats every record with its position. Empty store yields no blocks.
    pub fn get(&self) -> StoreResult<Vec<String>> {
        let document = self.read_checked()?;
        Ok(document
            .list
            .iter()
            .enumerate()
            .map(|(index, record)| format_record(index, record))
            .collect())
    }

    /// Finds records whose `by` field equals `value`.
    ///
    /// The key and value kind are checked first: `amount` needs a number,
    /// `category` and `date` need text.
    pub fn get_by_key(&self, by: &str, value: QueryValue) -> StoreResult<KeyQueryOutcome> {
        let Some(key) = SearchKey::parse(by, value) else {
            warn!("event=record_search module=service status=rejected reason=invalid_key");
            return Ok(KeyQueryOutcome::Message(invalid_key_message(by)));
        };

        let document = self.store.read()?;
        if document.list.is_empty() {
            return Ok(KeyQueryOutcome::Message(MSG_NO_RECORDS.to_string()));
        }

        let list = self.materialize(document.list)?;
        match key.search(&list) {
            Ok(found) => Ok(KeyQueryOutcome::Matches(
                found
                    .into_iter()
                    .map(|(index, record)| format_record(index, record))
                    .collect(),
            )),
            Err(err) => Ok(KeyQueryOutcome::Message(rejected("record_search", err))),
        }
    }

    /// Reads the document and checks every record against `self.rules`.
    fn read_checked(&self) -> StoreResult<Document> {
        let document = self.store.read()?;
        for (index, record) in document.list.iter().enumerate() {
            self.rules
                .check_record(record)
                .map_err(|source| invalid_record(index, source))?;
        }
        Ok(document)
    }

    /// Links `records` in document order; `push_last` re-checks each one.
    fn materialize(&self, records: Vec<Record>) -> StoreResult<RecordList> {
        let mut list = RecordList::with_rules(Arc::clone(&self.rules));
        for (index, record) in records.into_iter().enumerate() {
            list.push_last(record)
                .map_err(|source| invalid_record(index, source))?;
        }
        Ok(list)
    }
}

fn check_index(length: usize, index: i64) -> Option<&'static str> {
    if length == 0 {
        return Some(MSG_NO_RECORDS);
    }
    match usize::try_from(index) {
        Ok(index) if index < length => None,
        _ => Some(MSG_INVALID_INDEX),
    }
}

fn invalid_record(index: usize, source: ValidationError) -> StoreError {
    error!(
        "event=store_check module=service status=error index={index} field={}",
        source.field()
    );
    StoreError::InvalidRecord { index, source }
}

fn rejected(event: &str, err: ValidationError) -> String {
    warn!(
        "event={event} module=service status=rejected field={} type_error={}",
        err.field(),
        err.is_type_error()
    );
    err.to_string()
}

fn invalid_key_message(by: &str) -> String {
    let keys = SEARCH_KEYS
        .iter()
        .map(|key| format!("'{key}'"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("The '{by}' key cannot be searched, the available search keys are {keys}.")
}

/// Renders one record block prefixed with its position.
pub fn format_record(index: usize, record: &Record) -> String {
    format!(
        "[{index}]\nAmount: {}.\nCategory: {}.\nDate: {}.\nDescription: {}.",
        format_amount(record.amount()),
        record.category(),
        record.date(),
        record.description()
    )
}

/// Rounds to two decimals and renders the shortest form that keeps at least
/// one fractional digit (`31.0`, `134.42`, `-103.42`). Values from `1e16` up
/// switch to exponent form with a signed exponent (`1e+16`).
pub fn format_amount(value: f64) -> String {
    let rounded: f64 = format!("{value:.2}").parse().unwrap_or(value);
    let rendered = format!("{rounded:?}");
    match rendered.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => rendered,
    }
}
