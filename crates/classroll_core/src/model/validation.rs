//! Field-level validation error shared by Class and Student input.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Input rejected by field-level constraints.
///
/// Carries one user-facing message per failing field, in field order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    messages: Vec<String>,
}

impl ValidationError {
    pub fn new(messages: Vec<String>) -> Self {
        Self { messages }
    }

    /// Creates an error for a single failing field.
    pub fn single(message: impl Into<String>) -> Self {
        Self {
            messages: vec![message.into()],
        }
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<String> {
        self.messages
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation failed: {}", self.messages.join("; "))
    }
}

impl Error for ValidationError {}

/// Collects per-field failures for one input record.
#[derive(Debug, Default)]
pub(crate) struct FieldErrors {
    messages: Vec<String>,
}

impl FieldErrors {
    pub(crate) fn push(&mut self, message: impl Into<String>) {
        self.messages.push(message.into());
    }

    /// Returns the trimmed value and records `message` when it is absent or blank.
    ///
    /// A blank return value is only observable when `into_result` fails.
    pub(crate) fn required(&mut self, value: Option<&str>, message: &str) -> String {
        let trimmed = value.map(str::trim).unwrap_or_default();
        if trimmed.is_empty() {
            self.push(message);
        }
        trimmed.to_string()
    }

    /// Like `required`, but only an absent or empty value counts as missing
    /// and the value is returned untouched.
    pub(crate) fn required_raw(&mut self, value: Option<&str>, message: &str) -> String {
        let raw = value.unwrap_or_default();
        if raw.is_empty() {
            self.push(message);
        }
        raw.to_string()
    }

    pub(crate) fn into_result(self) -> Result<(), ValidationError> {
        if self.messages.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::new(self.messages))
        }
    }
}
