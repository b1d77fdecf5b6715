//! Student registry endpoints.

use super::{parse_student_id, ApiResponse};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use classroll_core::{ClassInput, PageRequest, StudentDetails, StudentInput};

type StudentResponse = Json<ApiResponse<StudentDetails>>;
type RosterResponse = Json<ApiResponse<Vec<StudentDetails>>>;

/// Raw pagination parameters; coerced leniently, never rejected.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct PageParams {
    pub page: Option<String>,
    pub limit: Option<String>,
}

impl PageParams {
    /// Keeps the first value of each key and ignores unknown keys.
    pub fn from_pairs(pairs: Vec<(String, String)>) -> Self {
        let mut params = Self::default();
        for (key, value) in pairs {
            let slot = match key.as_str() {
                "page" => &mut params.page,
                "limit" => &mut params.limit,
                _ => continue,
            };
            slot.get_or_insert(value);
        }
        params
    }
}

/// POST /api/students
pub async fn create_student(
    State(state): State<AppState>,
    payload: Result<Json<StudentInput>, JsonRejection>,
) -> Result<(StatusCode, StudentResponse), ApiError> {
    let Json(input) = payload?;
    let student = state
        .with_students(move |students| students.create_student(&input))
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(student).with_message("Student created successfully")),
    ))
}

/// GET /api/students?page=&limit=
pub async fn list_students(
    State(state): State<AppState>,
    pairs: Result<Query<Vec<(String, String)>>, QueryRejection>,
) -> Result<RosterResponse, ApiError> {
    let params = pairs
        .map(|Query(pairs)| PageParams::from_pairs(pairs))
        .unwrap_or_default();
    let request = PageRequest::from_raw(params.page.as_deref(), params.limit.as_deref());

    let page = state
        .with_students(move |students| students.list_students(request))
        .await?;
    let count = page.items.len();
    Ok(Json(
        ApiResponse::success(page.items)
            .with_count(count)
            .with_page(page.total, page.page, page.total_pages),
    ))
}

/// GET /api/students/:id
pub async fn get_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StudentResponse, ApiError> {
    let id = parse_student_id(&id)?;
    let student = state
        .with_students(move |students| students.get_student(id))
        .await?;
    Ok(Json(ApiResponse::success(student)))
}

/// PUT /api/students/:id/class
pub async fn update_student_class(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: Result<Json<ClassInput>, JsonRejection>,
) -> Result<StudentResponse, ApiError> {
    let Json(input) = payload?;
    let id = parse_student_id(&id)?;
    let student = state
        .with_students(move |students| students.update_student_class(id, &input))
        .await?;
    Ok(Json(
        ApiResponse::success(student).with_message("Student class updated successfully"),
    ))
}

/// DELETE /api/students/:id
pub async fn delete_student(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let id = parse_student_id(&id)?;
    state
        .with_students(move |students| students.delete_student(id))
        .await?;
    Ok(Json(ApiResponse::done("Student deleted successfully")))
}

/// GET /api/students/class/:standard/:division
pub async fn list_by_class(
    State(state): State<AppState>,
    Path((standard, division)): Path<(String, String)>,
) -> Result<RosterResponse, ApiError> {
    let roster = state
        .with_students(move |students| students.list_by_class(&standard, &division))
        .await?;
    let count = roster.students.len();
    Ok(Json(
        ApiResponse::success(roster.students)
            .with_count(count)
            .with_class(roster.label),
    ))
}

/// GET /api/students/standard/:standard
pub async fn list_by_standard(
    State(state): State<AppState>,
    Path(standard): Path<String>,
) -> Result<RosterResponse, ApiError> {
    let roster = state
        .with_students(move |students| students.list_by_standard(&standard))
        .await?;
    let count = roster.students.len();
    Ok(Json(
        ApiResponse::success(roster.students)
            .with_count(count)
            .with_standard(roster.standard),
    ))
}
