//! Field validators injected into record rules.
//!
//! # Responsibility
//! - Own the allowed category set and the date acceptance rules.
//! - Keep those rules swappable without touching the record entity.
//!
//! # Invariants
//! - Dates match `YYYY-M-D` / `YYYY-MM-DD` (ASCII digits) and name a real
//!   calendar day with year >= 1.
//! - Category matching is exact and case-sensitive.

use super::field::{ValidationError, ValidationResult};
use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;

/// Category for money coming in.
pub const CATEGORY_INCOME: &str = "income";
/// Category for money going out.
pub const CATEGORY_EXPENSE: &str = "expense";

const SUPPORTED_CATEGORIES: &[&str] = &[CATEGORY_INCOME, CATEGORY_EXPENSE];

static DATE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^([0-9]{4})-([0-9]{1,2})-([0-9]{1,2})$").expect("valid date regex")
});

/// Returns the category strings accepted by the standard validator.
pub fn supported_categories() -> &'static [&'static str] {
    SUPPORTED_CATEGORIES
}

/// Named checks consumed by `RecordRules`.
pub trait FieldValidator: Send + Sync {
    fn is_date(&self, value: &str) -> ValidationResult<()>;
    fn is_category(&self, value: &str) -> ValidationResult<()>;
}

/// Validator with the built-in category set and Gregorian date rules.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardValidator;

impl FieldValidator for StandardValidator {
    fn is_date(&self, value: &str) -> ValidationResult<()> {
        let Some(captures) = DATE_RE.captures(value) else {
            return Err(ValidationError::MalformedDate {
                value: value.to_string(),
            });
        };

        let impossible = || ValidationError::ImpossibleDate {
            value: value.to_string(),
        };
        let year: i32 = captures[1].parse().map_err(|_| impossible())?;
        let month: u32 = captures[2].parse().map_err(|_| impossible())?;
        let day: u32 = captures[3].parse().map_err(|_| impossible())?;

        if year < 1 || NaiveDate::from_ymd_opt(year, month, day).is_none() {
            return Err(impossible());
        }
        Ok(())
    }

    fn is_category(&self, value: &str) -> ValidationResult<()> {
        if supported_categories().contains(&value) {
            return Ok(());
        }
        Err(ValidationError::UnknownCategory {
            value: value.to_string(),
            allowed: supported_categories()
                .iter()
                .map(|category| category.to_string())
                .collect(),
        })
    }
}
