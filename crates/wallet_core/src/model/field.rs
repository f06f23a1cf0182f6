//! Parametric validated-field rules.
//!
//! # Responsibility
//! - Describe one field constraint (bounds plus an optional custom check)
//!   independently of the value type being checked.
//! - Produce field-scoped `ValidationError`s callers can render directly.
//!
//! # Invariants
//! - A rule never mutates the value it checks.
//! - Bounds are inclusive; numbers are measured by value, text by character
//!   count (Unicode scalar values, not bytes).

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type ValidationResult<T> = Result<T, ValidationError>;

type Check<T> = Box<dyn Fn(&T) -> ValidationResult<()> + Send + Sync>;

/// Record field identifiers, in validation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum RecordField {
    Amount,
    Category,
    Date,
    Description,
}

impl RecordField {
    /// Wire name used by the persisted document.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Amount => "amount",
            Self::Category => "category",
            Self::Date => "date",
            Self::Description => "description",
        }
    }
}

impl Display for RecordField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Field-level validation failure.
///
/// `TypeMismatch` is the "wrong kind of value" class; every other variant
/// except `Missing` is the "right kind, wrong content" class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    TypeMismatch {
        field: RecordField,
        expected: &'static str,
        found: &'static str,
    },
    NotFinite {
        field: RecordField,
    },
    BelowMinimum {
        field: RecordField,
        measure: &'static str,
        actual: String,
        min: String,
    },
    AboveMaximum {
        field: RecordField,
        measure: &'static str,
        actual: String,
        max: String,
    },
    UnknownCategory {
        value: String,
        allowed: Vec<String>,
    },
    MalformedDate {
        value: String,
    },
    ImpossibleDate {
        value: String,
    },
    Missing(RecordField),
}

impl ValidationError {
    /// Returns the field the failure is attributed to.
    pub fn field(&self) -> RecordField {
        match self {
            Self::TypeMismatch { field, .. }
            | Self::NotFinite { field }
            | Self::BelowMinimum { field, .. }
            | Self::AboveMaximum { field, .. }
            | Self::Missing(field) => *field,
            Self::UnknownCategory { .. } => RecordField::Category,
            Self::MalformedDate { .. } | Self::ImpossibleDate { .. } => RecordField::Date,
        }
    }

    /// Whether this is a wrong-kind-of-value failure.
    pub fn is_type_error(&self) -> bool {
        matches!(self, Self::TypeMismatch { .. })
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TypeMismatch {
                field,
                expected,
                found,
            } => write!(f, "Invalid {field}: value must be a {expected}, got {found}."),
            Self::NotFinite { field } => write!(f, "Invalid {field}: value must be finite."),
            Self::BelowMinimum {
                field,
                measure,
                actual,
                min,
            } => write!(
                f,
                "Invalid {field}: {measure} {actual} is less than the minimum {min}."
            ),
            Self::AboveMaximum {
                field,
                measure,
                actual,
                max,
            } => write!(
                f,
                "Invalid {field}: {measure} {actual} exceeds the maximum {max}."
            ),
            Self::UnknownCategory { value, allowed } => {
                let allowed = allowed
                    .iter()
                    .map(|category| format!("'{category}'"))
                    .collect::<Vec<_>>()
                    .join(", ");
                write!(
                    f,
                    "Category '{value}' was not found. Available categories: {allowed}."
                )
            }
            Self::MalformedDate { value } => write!(
                f,
                "Invalid date format '{value}'. Expected YYYY-MM-DD or YYYY-M-D."
            ),
            Self::ImpossibleDate { value } => {
                write!(f, "Invalid date '{value}': not a real calendar date.")
            }
            Self::Missing(field) => write!(f, "Missing {field}: value is not set."),
        }
    }
}

impl Error for ValidationError {}

/// Values a `FieldRule` can bound.
pub trait Measured {
    type Measure: PartialOrd + Copy;

    /// Word used in bound messages, e.g. `value` or `length`.
    const MEASURE: &'static str;

    fn measure(&self) -> Self::Measure;

    fn render(measure: Self::Measure) -> String;
}

impl Measured for f64 {
    type Measure = f64;

    const MEASURE: &'static str = "value";

    fn measure(&self) -> f64 {
        *self
    }

    fn render(measure: f64) -> String {
        format!("{measure:?}")
    }
}

impl Measured for str {
    type Measure = usize;

    const MEASURE: &'static str = "length";

    fn measure(&self) -> usize {
        self.chars().count()
    }

    fn render(measure: usize) -> String {
        measure.to_string()
    }
}

/// One validated-field constraint: optional inclusive bounds and an optional
/// custom check that runs after the bounds pass.
pub struct FieldRule<T: Measured + ?Sized> {
    field: RecordField,
    min: Option<T::Measure>,
    max: Option<T::Measure>,
    check: Option<Check<T>>,
}

impl<T: Measured + ?Sized> FieldRule<T> {
    pub fn new(field: RecordField) -> Self {
        Self {
            field,
            min: None,
            max: None,
            check: None,
        }
    }

    pub fn min(mut self, min: T::Measure) -> Self {
        self.min = Some(min);
        self
    }

    pub fn max(mut self, max: T::Measure) -> Self {
        self.max = Some(max);
        self
    }

    pub fn check<F>(mut self, check: F) -> Self
    where
        F: Fn(&T) -> ValidationResult<()> + Send + Sync + 'static,
    {
        self.check = Some(Box::new(check));
        self
    }

    pub fn field(&self) -> RecordField {
        self.field
    }

    /// Validates `value`, reporting the first violated constraint.
    pub fn validate(&self, value: &T) -> ValidationResult<()> {
        let measure = value.measure();

        if let Some(min) = self.min {
            if measure < min {
                return Err(ValidationError::BelowMinimum {
                    field: self.field,
                    measure: T::MEASURE,
                    actual: T::render(measure),
                    min: T::render(min),
                });
            }
        }

        if let Some(max) = self.max {
            if measure > max {
                return Err(ValidationError::AboveMaximum {
                    field: self.field,
                    measure: T::MEASURE,
                    actual: T::render(measure),
                    max: T::render(max),
                });
            }
        }

        match &self.check {
            Some(check) => check(value),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{FieldRule, RecordField, ValidationError};

    #[test]
    fn numeric_bounds_are_inclusive() {
        let rule = FieldRule::<f64>::new(RecordField::Amount).min(0.0).max(10.0);
        assert!(rule.validate(&0.0).is_ok());
        assert!(rule.validate(&10.0).is_ok());

        let err = rule.validate(&-5.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Invalid amount: value -5.0 is less than the minimum 0.0."
        );
    }

    #[test]
    fn text_length_counts_characters_not_bytes() {
        let rule = FieldRule::<str>::new(RecordField::Description).max(3);
        assert!(rule.validate("Прд").is_ok());

        let err = rule.validate("Прод").unwrap_err();
        assert!(matches!(
            err,
            ValidationError::AboveMaximum { ref actual, .. } if actual == "4"
        ));
    }

    #[test]
    fn custom_check_runs_after_bounds() {
        let rule = FieldRule::<str>::new(RecordField::Category)
            .max(1)
            .check(|_: &str| Err(ValidationError::Missing(RecordField::Category)));

        let err = rule.validate("long").unwrap_err();
        assert!(matches!(err, ValidationError::AboveMaximum { .. }));

        let err = rule.validate("x").unwrap_err();
        assert_eq!(err, ValidationError::Missing(RecordField::Category));
    }

    #[test]
    fn errors_report_their_field() {
        let err = ValidationError::MalformedDate {
            value: "2/11/2024".to_string(),
        };
        assert_eq!(err.field(), RecordField::Date);
        assert!(!err.is_type_error());
    }
}
