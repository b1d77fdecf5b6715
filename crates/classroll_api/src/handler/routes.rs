//! Router assembly.

use super::middleware::request_logging_middleware;
use super::{classes, students, system};
use crate::state::AppState;
use axum::extract::DefaultBodyLimit;
use axum::middleware;
use axum::routing::{get, put};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::normalize_path::NormalizePath;

const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;

/// The routed application. Trailing slashes are trimmed before routing, so
/// `/api/classes/` and `/api/classes` reach the same handler.
pub type App = NormalizePath<Router>;

/// Builds the full application router over `state`.
pub fn create_router(state: AppState) -> App {
    let class_routes = Router::new()
        .route("/", get(classes::list_classes).post(classes::create_class))
        .route(
            "/:id",
            get(classes::get_class)
                .put(classes::update_class)
                .delete(classes::delete_class),
        );

    let student_routes = Router::new()
        .route(
            "/",
            get(students::list_students).post(students::create_student),
        )
        .route(
            "/class/:standard/:division",
            get(students::list_by_class),
        )
        .route("/standard/:standard", get(students::list_by_standard))
        .route(
            "/:id",
            get(students::get_student).delete(students::delete_student),
        )
        .route("/:id/class", put(students::update_student_class));

    let router = Router::new()
        .route("/", get(system::welcome))
        .route("/health", get(system::health_check))
        .nest("/api/classes", class_routes)
        .nest("/api/students", student_routes)
        .fallback(system::route_not_found)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CorsLayer::permissive())
        .layer(middleware::from_fn(request_logging_middleware))
        .with_state(state);

    NormalizePath::trim_trailing_slash(router)
}
