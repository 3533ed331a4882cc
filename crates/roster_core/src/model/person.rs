//! Person domain model.
//!
//! # Responsibility
//! - Define the roster row shape returned by list/get.
//! - Own the only validation path for user-entered name/age text.
//!
//! # Invariants
//! - `id` is assigned by the store, never reused, never changed.
//! - A `PersonInput` always carries a trimmed, non-empty name.
//! - `age` has no range constraint; any `i64` is accepted.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Leading optional whitespace, optional sign, then at least one digit.
static LEADING_INTEGER_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*([+-]?[0-9]+)").expect("valid leading integer regex"));

/// Store-assigned surrogate key (`people.id`).
pub type PersonId = i64;

/// One persisted roster row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    pub id: PersonId,
    pub name: String,
    pub age: i64,
}

/// Validation failure for user-entered person fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersonValidationError {
    /// Name is empty after trimming.
    EmptyName,
    /// Age text has no leading base-10 integer (or it overflows `i64`).
    InvalidAge(String),
}

impl Display for PersonValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyName => write!(f, "name must not be empty"),
            Self::InvalidAge(raw) => write!(f, "age `{raw}` is not an integer"),
        }
    }
}

impl Error for PersonValidationError {}

/// Validated name/age pair accepted by store write paths.
///
/// Fields are private so the only way to obtain one is through
/// [`PersonInput::new`] or [`PersonInput::parse`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersonInput {
    name: String,
    age: i64,
}

impl PersonInput {
    /// Builds input from an already-typed age.
    ///
    /// # Errors
    /// - `EmptyName` when `name` is empty after trimming.
    pub fn new(name: &str, age: i64) -> Result<Self, PersonValidationError> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(PersonValidationError::EmptyName);
        }
        Ok(Self {
            name: trimmed.to_string(),
            age,
        })
    }

    /// Builds input from raw form text.
    ///
    /// The age is read from its leading integer, so `"42"`, `" 42"`,
    /// `"42 years"` and `"42.9"` all yield 42.
    ///
    /// # Errors
    /// - `EmptyName` when `raw_name` is empty after trimming.
    /// - `InvalidAge` when `raw_age` does not start with an integer.
    pub fn parse(raw_name: &str, raw_age: &str) -> Result<Self, PersonValidationError> {
        let age = parse_age(raw_age)?;
        Self::new(raw_name, age)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> i64 {
        self.age
    }
}

/// Parses the leading base-10 integer of `raw`.
pub fn parse_age(raw: &str) -> Result<i64, PersonValidationError> {
    LEADING_INTEGER_RE
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .and_then(|digits| digits.as_str().parse::<i64>().ok())
        .ok_or_else(|| PersonValidationError::InvalidAge(raw.to_string()))
}

#[cfg(test)]
mod tests {
    use super::{parse_age, Person, PersonInput, PersonValidationError};

    #[test]
    fn parse_trims_name() {
        let input = PersonInput::parse("  Alice \t", "30").unwrap();
        assert_eq!(input.name(), "Alice");
        assert_eq!(input.age(), 30);
    }

    #[test]
    fn parse_rejects_blank_name() {
        assert_eq!(
            PersonInput::parse("   ", "30").unwrap_err(),
            PersonValidationError::EmptyName
        );
        assert_eq!(
            PersonInput::new("", 1).unwrap_err(),
            PersonValidationError::EmptyName
        );
    }

    #[test]
    fn parse_age_uses_leading_integer() {
        assert_eq!(parse_age("42").unwrap(), 42);
        assert_eq!(parse_age("  42").unwrap(), 42);
        assert_eq!(parse_age("7 years").unwrap(), 7);
        assert_eq!(parse_age("3.9").unwrap(), 3);
        assert_eq!(parse_age("-5").unwrap(), -5);
        assert_eq!(parse_age("+12").unwrap(), 12);
        assert_eq!(parse_age("007").unwrap(), 7);
    }

    #[test]
    fn parse_age_rejects_non_numeric_text() {
        for raw in ["", "   ", "abc", "-", "+", "x12", "- 3"] {
            assert!(
                matches!(parse_age(raw), Err(PersonValidationError::InvalidAge(_))),
                "`{raw}` should be rejected"
            );
        }
    }

    #[test]
    fn parse_age_rejects_overflow() {
        assert!(parse_age("99999999999999999999").is_err());
    }

    #[test]
    fn age_has_no_range_constraint() {
        assert_eq!(PersonInput::parse("Old", "250").unwrap().age(), 250);
        assert_eq!(PersonInput::parse("Neg", "-1").unwrap().age(), -1);
    }

    #[test]
    fn person_serializes_with_flat_fields() {
        let person = Person {
            id: 3,
            name: "O'Brien".to_string(),
            age: 41,
        };
        let json = serde_json::to_value(&person).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "id": 3, "name": "O'Brien", "age": 41 })
        );
    }
}
