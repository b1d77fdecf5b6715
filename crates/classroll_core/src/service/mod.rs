//! Core registry services.
//!
//! # Responsibility
//! - Orchestrate repository calls into the Class and Student registry use-cases.
//! - Turn repository outcomes into transport-agnostic registry errors.
//!
//! # Invariants
//! - Every domain failure is returned as a `RegistryError`, never swallowed
//!   or retried.
//! - `RegistryError::Store` keeps the underlying cause for logs; its
//!   user-facing message never exposes it.

use crate::model::class::{Class, ClassId, ClassLabel};
use crate::model::validation::ValidationError;
use crate::repo::RepoError;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod class_service;
pub mod pagination;
pub mod student_service;

pub type RegistryResult<T> = Result<T, RegistryError>;

/// Class reads the Student registry is allowed to make.
///
/// Implemented by `ClassService`; the Student registry resolves every class
/// through this seam instead of reading class storage.
pub trait ClassLookup {
    /// Loads one class by id, `None` when unknown.
    fn find_by_id(&self, id: ClassId) -> RegistryResult<Option<Class>>;
    /// Loads the class owning a normalized `(standard, division)` pair.
    fn find_by_label(&self, label: &ClassLabel) -> RegistryResult<Option<Class>>;
    /// Lists every division of one normalized standard.
    fn list_by_standard(&self, standard: &str) -> RegistryResult<Vec<Class>>;
}

/// Per-class student count consulted by the class delete gate.
///
/// Implemented by `StudentService`.
pub trait StudentCounter {
    fn count_by_class(&self, class_id: ClassId) -> RegistryResult<u64>;
}

const VALIDATION_MESSAGE: &str = "Validation error";
const STORE_MESSAGE: &str = "Internal store error";

/// Coarse error category used by callers to pick a response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Conflict,
    PreconditionFailed,
    Store,
}

/// Error returned by every registry operation.
#[derive(Debug)]
pub enum RegistryError {
    /// Input failed field-level constraints.
    Validation(ValidationError),
    /// Referenced class or student does not exist.
    NotFound(String),
    /// A uniqueness rule would be violated.
    Conflict(String),
    /// Class delete blocked by students still assigned to it.
    PreconditionFailed { dependents: u64 },
    /// Persistence failure outside domain rules.
    Store(RepoError),
}

impl RegistryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Validation(_) => ErrorKind::Validation,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::PreconditionFailed { .. } => ErrorKind::PreconditionFailed,
            Self::Store(_) => ErrorKind::Store,
        }
    }

    /// User-facing message, safe to return to callers.
    pub fn message(&self) -> String {
        match self {
            Self::Validation(_) => VALIDATION_MESSAGE.to_string(),
            Self::NotFound(message) | Self::Conflict(message) => message.clone(),
            Self::PreconditionFailed { dependents } => format!(
                "Cannot delete class. {dependents} student(s) are assigned to this class"
            ),
            Self::Store(_) => STORE_MESSAGE.to_string(),
        }
    }

    /// Per-field messages; empty unless this is a validation error.
    pub fn field_errors(&self) -> &[String] {
        match self {
            Self::Validation(err) => err.messages(),
            _ => &[],
        }
    }
}

impl Display for RegistryError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "store failure: {err}"),
            other => write!(f, "{}", other.message()),
        }
    }
}

impl Error for RegistryError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Store(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for RegistryError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<RepoError> for RegistryError {
    fn from(value: RepoError) -> Self {
        Self::Store(value)
    }
}

#[cfg(test)]
mod tests {
    use super::{ErrorKind, RegistryError};
    use crate::model::validation::ValidationError;
    use crate::repo::RepoError;

    #[test]
    fn precondition_message_reports_exact_count() {
        let err = RegistryError::PreconditionFailed { dependents: 3 };
        assert_eq!(err.kind(), ErrorKind::PreconditionFailed);
        assert_eq!(
            err.message(),
            "Cannot delete class. 3 student(s) are assigned to this class"
        );
    }

    #[test]
    fn store_message_hides_cause() {
        let err = RegistryError::from(RepoError::InvalidData("secret detail".to_string()));
        assert_eq!(err.kind(), ErrorKind::Store);
        assert!(!err.message().contains("secret"));
        assert!(err.to_string().contains("secret detail"));
    }

    #[test]
    fn validation_exposes_field_errors() {
        let err = RegistryError::from(ValidationError::single("Standard is required"));
        assert_eq!(err.message(), "Validation error");
        assert_eq!(err.field_errors(), ["Standard is required"]);
    }
}
