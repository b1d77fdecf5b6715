//! HTTP error mapping for registry failures.

use crate::handler::ApiResponse;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use classroll_core::{ErrorKind, RegistryError};
use log::error;
use thiserror::Error;

const VALIDATION_MESSAGE: &str = "Validation error";
const INTERNAL_MESSAGE: &str = "Internal server error";

/// Every failure a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    /// Body is not JSON or does not fit the expected shape.
    #[error("malformed request body: {0}")]
    MalformedBody(String),
    /// No route matched the request path.
    #[error("Route {0} not found")]
    RouteNotFound(String),
    /// Runtime failure outside the registry, such as a poisoned store lock.
    #[error("internal failure: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Registry(err) => match err.kind() {
                ErrorKind::Validation | ErrorKind::PreconditionFailed => StatusCode::BAD_REQUEST,
                ErrorKind::NotFound => StatusCode::NOT_FOUND,
                ErrorKind::Conflict => StatusCode::CONFLICT,
                ErrorKind::Store => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::MalformedBody(_) => StatusCode::BAD_REQUEST,
            Self::RouteNotFound(_) => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn envelope(&self) -> ApiResponse<()> {
        match self {
            Self::Registry(err) => match err.kind() {
                ErrorKind::Validation => ApiResponse::failure(VALIDATION_MESSAGE)
                    .with_errors(err.field_errors().to_vec()),
                ErrorKind::Store => ApiResponse::failure(INTERNAL_MESSAGE),
                _ => ApiResponse::failure(err.message()),
            },
            Self::MalformedBody(detail) => {
                ApiResponse::failure(VALIDATION_MESSAGE).with_errors(vec![detail.clone()])
            }
            Self::RouteNotFound(_) => ApiResponse::failure(self.to_string()),
            Self::Internal(_) => ApiResponse::failure(INTERNAL_MESSAGE),
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(value: JsonRejection) -> Self {
        Self::MalformedBody(value.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("event=http_error module=api status=error code={} error={}", status.as_u16(), self);
        }
        (status, Json(self.envelope())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use axum::http::StatusCode;
    use classroll_core::{RegistryError, RepoError, ValidationError};

    #[test]
    fn registry_kinds_map_to_statuses() {
        let cases = [
            (
                RegistryError::from(ValidationError::single("Standard is required")),
                StatusCode::BAD_REQUEST,
            ),
            (
                RegistryError::NotFound("Class not found".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                RegistryError::Conflict("Class 10-A already exists".to_string()),
                StatusCode::CONFLICT,
            ),
            (
                RegistryError::PreconditionFailed { dependents: 2 },
                StatusCode::BAD_REQUEST,
            ),
            (
                RegistryError::from(RepoError::ForeignKeyViolation),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).status_code(), expected);
        }
    }

    #[test]
    fn store_failures_render_generic_message() {
        let err = ApiError::from(RegistryError::from(RepoError::InvalidData(
            "bad uuid in classes.id".to_string(),
        )));
        let envelope = serde_json::to_value(err.envelope()).unwrap();
        assert_eq!(envelope["success"], false);
        assert_eq!(envelope["message"], "Internal server error");
        assert!(envelope.get("errors").is_none());
    }

    #[test]
    fn validation_failures_list_every_field_message() {
        let err = ApiError::from(RegistryError::from(ValidationError::new(vec![
            "Standard is required".to_string(),
            "Division is required".to_string(),
        ])));
        let envelope = serde_json::to_value(err.envelope()).unwrap();
        assert_eq!(envelope["message"], "Validation error");
        assert_eq!(
            envelope["errors"],
            serde_json::json!(["Standard is required", "Division is required"])
        );
    }
}
