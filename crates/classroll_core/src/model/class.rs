//! Class domain model.
//!
//! # Responsibility
//! - Define the persisted Class record and its derived display name.
//! - Normalize and validate `(standard, division)` input.
//!
//! # Invariants
//! - `standard` and `division` are non-empty after trimming.
//! - `division` is stored uppercase, so `10-a` and `10-A` are the same class.
//! - `full_class_name()` is derived on demand and never persisted.

use crate::model::validation::{FieldErrors, ValidationError};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for a Class.
pub type ClassId = Uuid;

pub(crate) const STANDARD_REQUIRED: &str = "Standard is required";
pub(crate) const DIVISION_REQUIRED: &str = "Division is required";

/// Persisted Class record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    pub id: ClassId,
    /// Grade/year level, e.g. `10`.
    pub standard: String,
    /// Section label, uppercase, e.g. `A`.
    pub division: String,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds, refreshed by every update.
    pub updated_at: i64,
}

impl Class {
    /// Returns `standard-division`, e.g. `10-A`.
    pub fn full_class_name(&self) -> String {
        format!("{}-{}", self.standard, self.division)
    }

    pub fn label(&self) -> ClassLabel {
        ClassLabel {
            standard: self.standard.clone(),
            division: self.division.clone(),
        }
    }
}

impl Serialize for Class {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Class", 6)?;
        state.serialize_field("id", &self.id)?;
        state.serialize_field("standard", &self.standard)?;
        state.serialize_field("division", &self.division)?;
        state.serialize_field("fullClassName", &self.full_class_name())?;
        state.serialize_field("createdAt", &self.created_at)?;
        state.serialize_field("updatedAt", &self.updated_at)?;
        state.end()
    }
}

/// Normalized `(standard, division)` pair that identifies one Class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ClassLabel {
    pub standard: String,
    pub division: String,
}

impl ClassLabel {
    /// Normalizes without validating: trims both parts and uppercases the division.
    ///
    /// Used for lookups, where a blank part simply matches nothing.
    pub fn normalized(standard: &str, division: &str) -> Self {
        Self {
            standard: normalize_standard(standard),
            division: normalize_division(division),
        }
    }
}

impl Display for ClassLabel {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", self.standard, self.division)
    }
}

/// Raw class input as submitted by callers.
///
/// Fields are optional so a missing field reports the same message as a blank one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ClassInput {
    pub standard: Option<String>,
    pub division: Option<String>,
}

impl ClassInput {
    pub fn new(standard: impl Into<String>, division: impl Into<String>) -> Self {
        Self {
            standard: Some(standard.into()),
            division: Some(division.into()),
        }
    }

    /// Validates both fields and returns the normalized label.
    ///
    /// # Errors
    /// - One message per blank or missing field.
    pub fn validate(&self) -> Result<ClassLabel, ValidationError> {
        let mut errors = FieldErrors::default();
        let standard = errors.required(self.standard.as_deref(), STANDARD_REQUIRED);
        let division = errors.required(self.division.as_deref(), DIVISION_REQUIRED);
        errors.into_result()?;
        Ok(ClassLabel::normalized(&standard, &division))
    }
}

pub fn normalize_standard(value: &str) -> String {
    value.trim().to_string()
}

pub fn normalize_division(value: &str) -> String {
    value.trim().to_uppercase()
}
