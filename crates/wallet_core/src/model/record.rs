//! Record entity, drafts and per-field rules.
//!
//! # Responsibility
//! - Define the canonical transaction record stored by the ledger.
//! - Validate every field on construction, on every write and on decode.
//! - Model "not supplied" explicitly through `RecordDraft`.
//!
//! # Invariants
//! - A `Record` always holds four fields; there is no unset state.
//! - Constructors and setters validate against the `RecordRules` they are
//!   given; a failed write leaves the previous value in place.
//! - Decoding only checks shape (float amount, string fields). Domain rules
//!   are applied by whoever owns the rules, via `RecordRules::check_record`.

use super::field::{FieldRule, RecordField, ValidationError, ValidationResult};
use super::validator::{FieldValidator, StandardValidator};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

/// Maximum description length, in characters.
pub const MAX_DESCRIPTION_CHARS: usize = 500;

static STANDARD_RULES: Lazy<Arc<RecordRules>> =
    Lazy::new(|| Arc::new(RecordRules::with_validator(Arc::new(StandardValidator))));

/// Field rules applied to records.
pub struct RecordRules {
    amount: FieldRule<f64>,
    category: FieldRule<str>,
    date: FieldRule<str>,
    description: FieldRule<str>,
}

impl RecordRules {
    /// Shared rules backed by `StandardValidator`.
    pub fn standard() -> Arc<RecordRules> {
        Arc::clone(&STANDARD_RULES)
    }

    /// Builds rules whose category and date checks delegate to `validator`.
    pub fn with_validator(validator: Arc<dyn FieldValidator>) -> Self {
        let date_validator = Arc::clone(&validator);
        Self {
            amount: FieldRule::new(RecordField::Amount)
                .min(0.0)
                .check(|value: &f64| {
                    if value.is_finite() {
                        Ok(())
                    } else {
                        Err(ValidationError::NotFinite {
                            field: RecordField::Amount,
                        })
                    }
                }),
            category: FieldRule::new(RecordField::Category)
                .check(move |value: &str| validator.is_category(value)),
            date: FieldRule::new(RecordField::Date)
                .check(move |value: &str| date_validator.is_date(value)),
            description: FieldRule::new(RecordField::Description)
                .min(0)
                .max(MAX_DESCRIPTION_CHARS),
        }
    }

    pub fn check_amount(&self, value: f64) -> ValidationResult<()> {
        self.amount.validate(&value)
    }

    pub fn check_category(&self, value: &str) -> ValidationResult<()> {
        self.category.validate(value)
    }

    pub fn check_date(&self, value: &str) -> ValidationResult<()> {
        self.date.validate(value)
    }

    pub fn check_description(&self, value: &str) -> ValidationResult<()> {
        self.description.validate(value)
    }

    /// Re-checks a complete record, in field order.
    pub fn check_record(&self, record: &Record) -> ValidationResult<()> {
        self.check_amount(record.amount)?;
        self.check_category(&record.category)?;
        self.check_date(&record.date)?;
        self.check_description(&record.description)
    }
}

/// Fully formed transaction record.
///
/// Serialized field order is `amount, date, category, description`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawRecord")]
pub struct Record {
    amount: f64,
    date: String,
    category: String,
    description: String,
}

impl Record {
    /// Validates and builds a record with the standard rules.
    ///
    /// Fields are checked in the order amount, category, date, description;
    /// the first failure aborts construction.
    pub fn new(
        amount: f64,
        category: impl Into<String>,
        date: impl Into<String>,
        description: impl Into<String>,
    ) -> ValidationResult<Self> {
        Self::new_with(&RecordRules::standard(), amount, category, date, description)
    }

    /// Same as [`Record::new`] with caller-provided rules.
    pub fn new_with(
        rules: &RecordRules,
        amount: f64,
        category: impl Into<String>,
        date: impl Into<String>,
        description: impl Into<String>,
    ) -> ValidationResult<Self> {
        RecordDraft::new()
            .with_amount(amount)
            .with_category(category)
            .with_date(date)
            .with_description(description)
            .into_record(rules)
    }

    pub fn amount(&self) -> f64 {
        self.amount
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn date(&self) -> &str {
        &self.date
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Replaces the amount after checking it against `rules`.
    pub fn set_amount(&mut self, rules: &RecordRules, value: f64) -> ValidationResult<()> {
        rules.check_amount(value)?;
        self.amount = value;
        Ok(())
    }

    pub fn set_category(
        &mut self,
        rules: &RecordRules,
        value: impl Into<String>,
    ) -> ValidationResult<()> {
        let value = value.into();
        rules.check_category(&value)?;
        self.category = value;
        Ok(())
    }

    pub fn set_date(&mut self, rules: &RecordRules, value: impl Into<String>) -> ValidationResult<()> {
        let value = value.into();
        rules.check_date(&value)?;
        self.date = value;
        Ok(())
    }

    pub fn set_description(
        &mut self,
        rules: &RecordRules,
        value: impl Into<String>,
    ) -> ValidationResult<()> {
        let value = value.into();
        rules.check_description(&value)?;
        self.description = value;
        Ok(())
    }

    /// Applies every supplied field of `changes`.
    ///
    /// All supplied fields are validated before any is written, so a failure
    /// leaves the record untouched.
    pub fn apply(&mut self, rules: &RecordRules, changes: &RecordDraft) -> ValidationResult<()> {
        changes.validate(rules)?;

        if let Some(amount) = changes.amount {
            self.amount = amount;
        }
        if let Some(category) = &changes.category {
            self.category.clone_from(category);
        }
        if let Some(date) = &changes.date {
            self.date.clone_from(date);
        }
        if let Some(description) = &changes.description {
            self.description.clone_from(description);
        }
        Ok(())
    }
}

/// Record with individually optional fields.
///
/// `None` means "not supplied"; `Some(0.0)` and `Some(String::new())` are real
/// values. Used while composing a record and as a positional update
/// change-set.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordDraft {
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
}

impl RecordDraft {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Returns whether no field is supplied.
    pub fn is_empty(&self) -> bool {
        self.amount.is_none()
            && self.category.is_none()
            && self.date.is_none()
            && self.description.is_none()
    }

    /// Validates supplied fields only, in field order.
    pub fn validate(&self, rules: &RecordRules) -> ValidationResult<()> {
        if let Some(amount) = self.amount {
            rules.check_amount(amount)?;
        }
        if let Some(category) = &self.category {
            rules.check_category(category)?;
        }
        if let Some(date) = &self.date {
            rules.check_date(date)?;
        }
        if let Some(description) = &self.description {
            rules.check_description(description)?;
        }
        Ok(())
    }

    /// Converts into a record, failing on the first invalid or unset field.
    pub fn into_record(self, rules: &RecordRules) -> ValidationResult<Record> {
        self.validate(rules)?;
        Ok(Record {
            amount: self
                .amount
                .ok_or(ValidationError::Missing(RecordField::Amount))?,
            category: self
                .category
                .ok_or(ValidationError::Missing(RecordField::Category))?,
            date: self.date.ok_or(ValidationError::Missing(RecordField::Date))?,
            description: self
                .description
                .ok_or(ValidationError::Missing(RecordField::Description))?,
        })
    }
}

impl From<&Record> for RecordDraft {
    fn from(record: &Record) -> Self {
        Self {
            amount: Some(record.amount),
            category: Some(record.category.clone()),
            date: Some(record.date.clone()),
            description: Some(record.description.clone()),
        }
    }
}

/// Wire shape before the amount type check; `amount` stays untyped so
/// integers and other kinds can be reported as type errors.
#[derive(Deserialize)]
struct RawRecord {
    amount: Value,
    category: String,
    date: String,
    description: String,
}

impl TryFrom<RawRecord> for Record {
    type Error = ValidationError;

    fn try_from(raw: RawRecord) -> Result<Self, Self::Error> {
        Ok(Record {
            amount: amount_from_json(&raw.amount)?,
            date: raw.date,
            category: raw.category,
            description: raw.description,
        })
    }
}

fn amount_from_json(value: &Value) -> ValidationResult<f64> {
    let found = match value {
        Value::Number(number) if number.is_f64() => {
            if let Some(amount) = number.as_f64() {
                return Ok(amount);
            }
            "number"
        }
        Value::Number(_) => "integer",
        Value::String(_) => "string",
        Value::Bool(_) => "boolean",
        Value::Null => "null",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };
    Err(ValidationError::TypeMismatch {
        field: RecordField::Amount,
        expected: "float",
        found,
    })
}
