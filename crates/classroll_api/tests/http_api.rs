use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use classroll_api::{create_router, App, AppState};
use classroll_core::db::open_db_in_memory;
use serde_json::{json, Value};
use tower::ServiceExt;

fn app() -> App {
    create_router(AppState::new(open_db_in_memory().unwrap()))
}

async fn send(app: &App, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn create_class(app: &App, standard: &str, division: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/classes",
        Some(json!({"standard": standard, "division": division})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"]["id"].as_str().unwrap().to_string()
}

async fn create_student(app: &App, name: &str, roll_no: &str, class_id: &str) -> Value {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/students",
        Some(json!({
            "name": name,
            "rollNo": roll_no,
            "mobileNo": "9876543210",
            "classId": class_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
    body["data"].clone()
}

#[tokio::test]
async fn health_and_welcome_respond() {
    let app = app();

    let (status, body) = send(&app, Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Server is running!");
    assert!(body["timestamp"].as_str().is_some());

    let (status, body) = send(&app, Method::GET, "/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["endpoints"]["classes"], "/api/classes");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let app = app();
    let (status, body) = send(&app, Method::GET, "/api/teachers?x=1", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["message"], "Route /api/teachers?x=1 not found");
}

#[tokio::test]
async fn trailing_slash_reaches_the_same_route() {
    let app = app();
    let class_id = create_class(&app, "10", "A").await;

    let (status, body) = send(&app, Method::GET, "/api/classes/", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    let uri = format!("/api/classes/{class_id}/");
    let (status, body) = send(&app, Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["fullClassName"], "10-A");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/classes/",
        Some(json!({"standard": "10", "division": "B"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "{body}");
}

#[tokio::test]
async fn class_create_serializes_entity_and_rejects_duplicates() {
    let app = app();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/classes",
        Some(json!({"standard": " 10 ", "division": "a"})),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "Class created successfully");
    assert_eq!(body["data"]["standard"], "10");
    assert_eq!(body["data"]["division"], "A");
    assert_eq!(body["data"]["fullClassName"], "10-A");
    assert!(body["data"]["createdAt"].is_i64());

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/classes",
        Some(json!({"standard": "10", "division": "A"})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Class 10-A already exists");
}

#[tokio::test]
async fn class_validation_lists_field_errors() {
    let app = app();

    let (status, body) = send(&app, Method::POST, "/api/classes", Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation error");
    assert_eq!(
        body["errors"],
        json!(["Standard is required", "Division is required"])
    );
}

#[tokio::test]
async fn malformed_json_is_a_validation_error() {
    let app = app();
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/classes")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"standard\":"))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();
    assert_eq!(body["message"], "Validation error");
    assert_eq!(body["errors"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn class_lifecycle_over_http() {
    let app = app();
    let id = create_class(&app, "9", "B").await;
    create_class(&app, "10", "A").await;

    let (status, body) = send(&app, Method::GET, "/api/classes", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["fullClassName"], "10-A");

    let (status, body) = send(&app, Method::GET, &format!("/api/classes/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["id"], id.as_str());

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/classes/{id}"),
        Some(json!({"standard": "9", "division": "c"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Class updated successfully");
    assert_eq!(body["data"]["fullClassName"], "9-C");

    let (status, body) = send(&app, Method::DELETE, &format!("/api/classes/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Class deleted successfully");
    assert!(body.get("data").is_none());

    let (status, body) = send(&app, Method::GET, &format!("/api/classes/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Class not found");

    let (status, _) = send(&app, Method::GET, "/api/classes/not-an-id", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn class_delete_is_blocked_while_students_are_assigned() {
    let app = app();
    let class_id = create_class(&app, "10", "A").await;
    create_student(&app, "Ann Lee", "R001", &class_id).await;
    create_student(&app, "Bo Yu", "R002", &class_id).await;

    let (status, body) = send(
        &app,
        Method::DELETE,
        &format!("/api/classes/{class_id}"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        "Cannot delete class. 2 student(s) are assigned to this class"
    );
}

#[tokio::test]
async fn student_create_embeds_class_and_rejects_conflicts() {
    let app = app();
    let class_id = create_class(&app, "10", "A").await;

    let student = create_student(&app, "Ann Lee", "R001", &class_id).await;
    assert_eq!(student["rollNo"], "R001");
    assert_eq!(student["mobileNo"], "9876543210");
    assert_eq!(student["classId"]["id"], class_id.as_str());
    assert_eq!(student["classId"]["fullClassName"], "10-A");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/students",
        Some(json!({
            "name": "Bo Yu",
            "rollNo": "R001",
            "mobileNo": "9123456780",
            "classId": class_id,
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["message"], "Student with this roll number already exists");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/students",
        Some(json!({
            "name": "Cy Do",
            "rollNo": "R003",
            "mobileNo": "9123456780",
            "classId": "missing",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Class not found");
}

#[tokio::test]
async fn student_validation_reports_each_field() {
    let app = app();
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/students",
        Some(json!({"name": "A", "mobileNo": "12345"})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["errors"],
        json!([
            "Name must be at least 2 characters long",
            "Roll number is required",
            "Please enter a valid 10-digit mobile number",
            "Class ID is required",
        ])
    );
}

#[tokio::test]
async fn student_list_paginates_by_name() {
    let app = app();
    let class_id = create_class(&app, "10", "A").await;
    for (index, name) in ["Eve", "Ann", "Dan", "Bob", "Cat"].iter().enumerate() {
        create_student(&app, name, &format!("R{index}"), &class_id).await;
    }

    let (status, body) = send(&app, Method::GET, "/api/students?page=2&limit=2", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(body["total"], 5);
    assert_eq!(body["currentPage"], 2);
    assert_eq!(body["totalPages"], 3);
    assert_eq!(body["data"][0]["name"], "Cat");
    assert_eq!(body["data"][1]["name"], "Dan");

    let (status, body) = send(&app, Method::GET, "/api/students?page=abc&limit=0", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currentPage"], 1);
    assert_eq!(body["totalPages"], 1);
    assert_eq!(body["count"], 5);

    let uri = "/api/students?page=2&page=3&limit=2";
    let (status, body) = send(&app, Method::GET, uri, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["currentPage"], 2);
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["name"], "Cat");
}

#[tokio::test]
async fn student_reassignment_and_delete() {
    let app = app();
    let class_a = create_class(&app, "10", "A").await;
    let class_b = create_class(&app, "10", "B").await;
    let student = create_student(&app, "Ann Lee", "R001", &class_a).await;
    let id = student["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/students/{id}/class"),
        Some(json!({"standard": "10", "division": "b"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Student class updated successfully");
    assert_eq!(body["data"]["classId"]["id"], class_b.as_str());

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/students/{id}/class"),
        Some(json!({"standard": "12", "division": "Z"})),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Class 12-Z not found");

    let (status, body) = send(&app, Method::DELETE, &format!("/api/students/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Student deleted successfully");

    let (status, body) = send(&app, Method::GET, &format!("/api/students/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Student not found");
}

#[tokio::test]
async fn filtered_rosters_are_tagged() {
    let app = app();
    let class_a = create_class(&app, "10", "A").await;
    let class_b = create_class(&app, "10", "B").await;
    create_student(&app, "Zoe", "R1", &class_a).await;
    create_student(&app, "Ann", "R2", &class_b).await;

    let (status, body) = send(&app, Method::GET, "/api/students/class/10/a", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["class"], "10-A");
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["name"], "Zoe");

    let (status, body) = send(&app, Method::GET, "/api/students/standard/10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["standard"], "10");
    assert_eq!(body["count"], 2);
    assert_eq!(body["data"][0]["name"], "Ann");

    let (status, body) = send(&app, Method::GET, "/api/students/class/11/A", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "Class 11-A not found");

    let (status, body) = send(&app, Method::GET, "/api/students/standard/12", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "No classes found for standard 12");
}
