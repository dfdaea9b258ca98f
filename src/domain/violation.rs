//! Validation violations shared by every record validator

use serde::Serialize;
use thiserror::Error;

/// A single broken constraint found while validating a record
#[derive(Debug, Error, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum Violation {
    #[error("Field '{field}' is required")]
    MissingField { field: String },

    #[error("Field '{field}' must not be set")]
    UnexpectedField { field: String },

    #[error("Fields '{first}' and '{second}' cannot both be set")]
    ConflictingFields { first: String, second: String },

    #[error("Field '{field}' has unrecognized value '{value}'")]
    UnrecognizedValue { field: String, value: String },

    #[error("Field '{field}' contains an invalid combination of values")]
    InvalidCombination { field: String },

    #[error("Field '{field}' has malformed value '{value}': {reason}")]
    InvalidFormat {
        field: String,
        value: String,
        reason: String,
    },
}

impl Violation {
    pub fn missing(field: impl Into<String>) -> Self {
        Self::MissingField {
            field: field.into(),
        }
    }

    pub fn unexpected(field: impl Into<String>) -> Self {
        Self::UnexpectedField {
            field: field.into(),
        }
    }

    pub fn conflicting(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self::ConflictingFields {
            first: first.into(),
            second: second.into(),
        }
    }

    pub fn unrecognized(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::UnrecognizedValue {
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn invalid_combination(field: impl Into<String>) -> Self {
        Self::InvalidCombination {
            field: field.into(),
        }
    }

    pub fn invalid_format(
        field: impl Into<String>,
        value: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::InvalidFormat {
            field: field.into(),
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Name of the first field this violation refers to
    pub fn field(&self) -> &str {
        match self {
            Self::MissingField { field }
            | Self::UnexpectedField { field }
            | Self::UnrecognizedValue { field, .. }
            | Self::InvalidCombination { field }
            | Self::InvalidFormat { field, .. } => field,
            Self::ConflictingFields { first, .. } => first,
        }
    }
}

/// A stateless check over one record shape.
///
/// Implementations never mutate the record and report every violation they
/// find rather than stopping at the first one.
pub trait Validator {
    type Record;

    fn validate(&self, record: &Self::Record) -> Result<(), Vec<Violation>>;
}

/// Turn an accumulated list into the validator result
pub(crate) fn into_result(violations: Vec<Violation>) -> Result<(), Vec<Violation>> {
    if violations.is_empty() {
        Ok(())
    } else {
        Err(violations)
    }
}
