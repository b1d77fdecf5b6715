//! Class registry endpoints.

use super::{parse_class_id, ApiResponse};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use classroll_core::{Class, ClassInput};

type ClassResponse = Json<ApiResponse<Class>>;

/// POST /api/classes
pub async fn create_class(
    State(state): State<AppState>,
    payload: Result<Json<ClassInput>, JsonRejection>,
) -> Result<(StatusCode, ClassResponse), ApiError> {
    let Json(input) = payload?;
    let class = state
        .with_classes(move |classes| classes.create_class(&input))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(class).with_message("Class created successfully")),
    ))
}

/// GET /api/classes
pub async fn list_classes(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<Class>>>, ApiError> {
    let classes = state.with_classes(|classes| classes.list_classes()).await?;
    let count = classes.len();
    Ok(Json(ApiResponse::success(classes).with_count(count)))
}

/// GET /api/classes/:id
pub async fn get_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ClassResponse, ApiError> {
    let id = parse_class_id(&id)?;
    let class = state.with_classes(move |classes| classes.get_class(id)).await?;
    Ok(Json(ApiResponse::success(class)))
}

/// PUT /api/classes/:id
pub async fn update_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ClassInput>, JsonRejection>,
) -> Result<ClassResponse, ApiError> {
    let Json(input) = payload?;
    let id = parse_class_id(&id)?;
    let class = state
        .with_classes(move |classes| classes.update_class(id, &input))
        .await?;
    Ok(Json(
        ApiResponse::success(class).with_message("Class updated successfully"),
    ))
}

/// DELETE /api/classes/:id
pub async fn delete_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = parse_class_id(&id)?;
    state
        .with_registries(move |classes, students| classes.delete_class(id, students))
        .await?;
    Ok(Json(ApiResponse::done("Class deleted successfully")))
}
