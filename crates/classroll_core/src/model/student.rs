//! Student domain model.
//!
//! # Responsibility
//! - Define the persisted Student record and its Class-resolved read model.
//! - Validate student input (name length, roll number, mobile pattern).
//!
//! # Invariants
//! - `name` is 2..=100 characters after trimming.
//! - `mobile_no` matches `^[6-9]\d{9}$` after trimming.
//! - `class_id` is a lookup key only; Class fields are joined at read time.

use crate::model::class::{Class, ClassId};
use crate::model::validation::{FieldErrors, ValidationError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier for a Student.
pub type StudentId = Uuid;

pub const NAME_MIN_CHARS: usize = 2;
pub const NAME_MAX_CHARS: usize = 100;

static MOBILE_NO_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[6-9]\d{9}$").expect("valid mobile number regex"));

/// Persisted Student record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: StudentId,
    pub name: String,
    pub roll_no: String,
    pub mobile_no: String,
    pub class_id: ClassId,
    /// Unix epoch milliseconds.
    pub created_at: i64,
    /// Unix epoch milliseconds.
    pub updated_at: i64,
}

/// Student read model with its Class resolved.
///
/// Serialized with the resolved Class under `classId`, matching the wire
/// shape clients already consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentDetails {
    pub id: StudentId,
    pub name: String,
    pub roll_no: String,
    pub mobile_no: String,
    #[serde(rename = "classId")]
    pub class: Class,
    pub created_at: i64,
    pub updated_at: i64,
}

impl StudentDetails {
    pub fn new(student: Student, class: Class) -> Self {
        Self {
            id: student.id,
            name: student.name,
            roll_no: student.roll_no,
            mobile_no: student.mobile_no,
            class,
            created_at: student.created_at,
            updated_at: student.updated_at,
        }
    }
}

/// Raw student input as submitted by callers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentInput {
    pub name: Option<String>,
    pub roll_no: Option<String>,
    pub mobile_no: Option<String>,
    /// Class id in string form; resolved against the Class registry.
    pub class_id: Option<String>,
}

impl StudentInput {
    pub fn new(
        name: impl Into<String>,
        roll_no: impl Into<String>,
        mobile_no: impl Into<String>,
        class_id: impl ToString,
    ) -> Self {
        Self {
            name: Some(name.into()),
            roll_no: Some(roll_no.into()),
            mobile_no: Some(mobile_no.into()),
            class_id: Some(class_id.to_string()),
        }
    }

    /// Validates all fields and returns trimmed values.
    ///
    /// The mobile number is matched as sent: surrounding whitespace fails the
    /// pattern instead of being stripped.
    ///
    /// The class reference is only checked for presence here; resolving it is
    /// the registry's job.
    ///
    /// # Errors
    /// - One message per failing field, in declaration order.
    pub fn validate(&self) -> Result<ValidStudentInput, ValidationError> {
        let mut errors = FieldErrors::default();

        let name = errors.required(self.name.as_deref(), "Student name is required");
        if !name.is_empty() {
            let chars = name.chars().count();
            if chars < NAME_MIN_CHARS {
                errors.push("Name must be at least 2 characters long");
            } else if chars > NAME_MAX_CHARS {
                errors.push("Name cannot exceed 100 characters");
            }
        }

        let roll_no = errors.required(self.roll_no.as_deref(), "Roll number is required");

        let mobile_no =
            errors.required_raw(self.mobile_no.as_deref(), "Mobile number is required");
        if !mobile_no.is_empty() && !is_valid_mobile_no(&mobile_no) {
            errors.push("Please enter a valid 10-digit mobile number");
        }

        let class_ref = errors.required(self.class_id.as_deref(), "Class ID is required");

        errors.into_result()?;
        Ok(ValidStudentInput {
            name,
            roll_no,
            mobile_no,
            class_ref,
        })
    }
}

/// Student input that passed field-level validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidStudentInput {
    pub name: String,
    pub roll_no: String,
    pub mobile_no: String,
    pub class_ref: String,
}

/// Returns whether `value` is a 10-digit mobile number starting with 6-9.
pub fn is_valid_mobile_no(value: &str) -> bool {
    MOBILE_NO_RE.is_match(value)
}
