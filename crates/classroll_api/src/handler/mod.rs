//! HTTP handlers and the shared response envelope.
//!
//! - `classes`: Class registry endpoints under `/api/classes`
//! - `students`: Student registry endpoints under `/api/students`
//! - `system`: health check, welcome document, and unmatched routes
//! - `middleware`: request logging
//! - `routes`: router assembly

pub mod classes;
pub mod middleware;
pub mod routes;
pub mod students;
pub mod system;

use crate::error::ApiError;
use classroll_core::{ClassId, RegistryError, StudentId};
use serde::Serialize;
use uuid::Uuid;

/// JSON envelope shared by every registry endpoint.
///
/// Optional members are omitted when unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_pages: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub standard: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl<T> ApiResponse<T> {
    fn with_success(success: bool, data: Option<T>) -> Self {
        Self {
            success,
            message: None,
            count: None,
            total: None,
            current_page: None,
            total_pages: None,
            class: None,
            standard: None,
            data,
            errors: None,
        }
    }

    pub fn success(data: T) -> Self {
        Self::with_success(true, Some(data))
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_page(mut self, total: u64, current_page: u32, total_pages: u64) -> Self {
        self.total = Some(total);
        self.current_page = Some(current_page);
        self.total_pages = Some(total_pages);
        self
    }

    pub fn with_class(mut self, label: impl Into<String>) -> Self {
        self.class = Some(label.into());
        self
    }

    pub fn with_standard(mut self, standard: impl Into<String>) -> Self {
        self.standard = Some(standard.into());
        self
    }

    pub fn with_errors(mut self, errors: Vec<String>) -> Self {
        self.errors = Some(errors);
        self
    }
}

impl ApiResponse<()> {
    /// Success without a payload, e.g. after a delete.
    pub fn done(message: impl Into<String>) -> Self {
        Self::with_success(true, None).with_message(message)
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self::with_success(false, None).with_message(message)
    }
}

/// Parses a path id; a malformed id is reported like a missing record.
pub(crate) fn parse_path_id(raw: &str, not_found: &str) -> Result<Uuid, ApiError> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| ApiError::from(RegistryError::NotFound(not_found.to_string())))
}

pub(crate) fn parse_class_id(raw: &str) -> Result<ClassId, ApiError> {
    parse_path_id(raw, classroll_core::CLASS_NOT_FOUND)
}

pub(crate) fn parse_student_id(raw: &str) -> Result<StudentId, ApiError> {
    parse_path_id(raw, classroll_core::STUDENT_NOT_FOUND)
}
