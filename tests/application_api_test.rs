use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use internship_intake::{
    middleware::auth::AdminCredential,
    routes::{router, RouterSettings},
    store::{ApplicationStore, MemoryApplicationStore},
    AppState,
};
use serde_json::{json, Value as JsonValue};
use tower::ServiceExt;

const ADMIN_TOKEN: &str = "test_admin_token";

fn setup_app() -> (Router, Arc<MemoryApplicationStore>) {
    let store = Arc::new(MemoryApplicationStore::new());
    let app = router(
        AppState::new(store.clone()),
        RouterSettings {
            admin: AdminCredential::new(ADMIN_TOKEN),
            public_rps: 1000,
            admin_rps: 1000,
        },
    );
    (app, store)
}

fn submission(name: &str, phone: &str, role: &str) -> JsonValue {
    json!({
        "legalName": name,
        "email": format!("{}@Example.COM", name.replace(' ', ".")),
        "contactNumber": phone,
        "resumeLink": "https://drive.google.com/file/d/abc123/view",
        "role": role,
        "justification": "I have been editing short films for two years and want to grow with a team."
    })
}

async fn send(app: &Router, req: Request<Body>) -> (StatusCode, JsonValue) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let bytes = to_bytes(resp.into_body(), 1024 * 1024).await.unwrap();
    let body = if bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn post_json(uri: &str, body: &JsonValue) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn admin(method: &str, uri: &str, body: Option<&JsonValue>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", ADMIN_TOKEN));
    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

async fn create(app: &Router, name: &str, phone: &str, role: &str) -> JsonValue {
    let request = post_json("/api/applications", &submission(name, phone, role));
    let (status, body) = send(app, request).await;
    assert_eq!(status, StatusCode::CREATED, "unexpected body: {body}");
    body
}

#[tokio::test]
async fn submission_is_normalized_and_pending() {
    let (app, _) = setup_app();
    let body = create(&app, "Ada Byron", "+1 555 123 4567", "VIDEO_EDITOR").await;

    assert_eq!(body["status"], "PENDING");
    assert_eq!(body["email"], "ada.byron@example.com");
    assert_eq!(body["contactNumber"], "+15551234567");
    assert_eq!(body["role"], "VIDEO_EDITOR");
    assert_eq!(body["createdAt"], body["updatedAt"]);
    assert!(body["id"].as_str().is_some());
}

#[tokio::test]
async fn invalid_submission_lists_every_field() {
    let (app, store) = setup_app();
    let body = json!({
        "legalName": "J4ne",
        "email": "not-an-email",
        "contactNumber": "12345",
        "resumeLink": "https://example.com/resume",
        "role": "CHEF",
        "justification": " ".repeat(50),
    });
    let (status, body) = send(&app, post_json("/api/applications", &body)).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Validation failed");
    let fields: Vec<&str> = body["details"]
        .as_array()
        .unwrap()
        .iter()
        .map(|d| d["field"].as_str().unwrap())
        .collect();
    for field in [
        "legalName",
        "email",
        "contactNumber",
        "resumeLink",
        "role",
        "justification",
    ] {
        assert!(fields.contains(&field), "missing {field} in {fields:?}");
    }
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn resume_link_rules() {
    let (app, _) = setup_app();
    let mut accepted = submission("Pdf Person", "+15550000001", "WEB_DEVELOPER");
    accepted["resumeLink"] = json!("https://example.com/resume.pdf");
    let (status, _) = send(&app, post_json("/api/applications", &accepted)).await;
    assert_eq!(status, StatusCode::CREATED);

    let mut rejected = submission("Plain Person", "+15550000002", "WEB_DEVELOPER");
    rejected["resumeLink"] = json!("https://example.com/resume");
    let (status, body) = send(&app, post_json("/api/applications", &rejected)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "resumeLink");
}

#[tokio::test]
async fn duplicate_identity_is_a_conflict() {
    let (app, store) = setup_app();
    create(&app, "Ada Byron", "+1 555 123 4567", "VIDEO_EDITOR").await;

    let same_contact = submission("Other Person", "+15551234567", "CONTENT_WRITER");
    let (status, body) = send(&app, post_json("/api/applications", &same_contact)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DUPLICATE_ENTRY");

    let same_name = submission("Ada Byron", "+15559999999", "CONTENT_WRITER");
    let (status, _) = send(&app, post_json("/api/applications", &same_name)).await;
    assert_eq!(status, StatusCode::CONFLICT);

    assert_eq!(store.count(None).await.unwrap(), 1);
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let (app, _) = setup_app();
    let req = Request::builder()
        .method("POST")
        .uri("/api/applications")
        .header("content-type", "application/json")
        .body(Body::from("{\"legalName\": 42"))
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid data provided"));
}

#[tokio::test]
async fn admin_routes_require_the_token() {
    let (app, _) = setup_app();

    let req = Request::builder()
        .uri("/api/applications")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let req = Request::builder()
        .uri("/api/applications/stats")
        .header("authorization", "Bearer wrong")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid_token");

    let (status, _) = send(&app, admin("GET", "/api/applications", None)).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn review_flow_only_moves_out_of_pending() {
    let (app, _) = setup_app();
    let created = create(&app, "Ada Byron", "+15551234567", "VIDEO_EDITOR").await;
    let uri = format!("/api/applications/{}", created["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        admin("PATCH", &uri, Some(&json!({ "status": "APPROVED" }))),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "APPROVED");

    let (status, body) = send(
        &app,
        admin("PATCH", &uri, Some(&json!({ "status": "REJECTED" }))),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INVALID_TRANSITION");

    let (status, body) = send(&app, admin("GET", &uri, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "APPROVED");
}

#[tokio::test]
async fn invalid_status_value_is_rejected() {
    let (app, _) = setup_app();
    let created = create(&app, "Ada Byron", "+15551234567", "VIDEO_EDITOR").await;
    let uri = format!("/api/applications/{}", created["id"].as_str().unwrap());

    let (status, body) = send(
        &app,
        admin("PATCH", &uri, Some(&json!({ "status": "ARCHIVED" }))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "status");
}

#[tokio::test]
async fn unknown_ids_are_not_found_and_store_is_untouched() {
    let (app, store) = setup_app();
    create(&app, "Ada Byron", "+15551234567", "VIDEO_EDITOR").await;
    let missing = format!("/api/applications/{}", uuid::Uuid::new_v4());

    let (status, _) = send(
        &app,
        admin("PATCH", &missing, Some(&json!({ "status": "APPROVED" }))),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, admin("DELETE", &missing, None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, admin("GET", "/api/applications/not-a-uuid", None)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(store.count(None).await.unwrap(), 1);
    assert_eq!(
        store
            .count(Some(internship_intake::models::application::ApplicationStatus::Pending))
            .await
            .unwrap(),
        1
    );
}

#[tokio::test]
async fn delete_removes_the_record() {
    let (app, store) = setup_app();
    let created = create(&app, "Ada Byron", "+15551234567", "VIDEO_EDITOR").await;
    let uri = format!("/api/applications/{}", created["id"].as_str().unwrap());

    let (status, body) = send(&app, admin("DELETE", &uri, None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Application deleted successfully");
    assert!(store.is_empty().await);
}

#[tokio::test]
async fn stats_on_empty_store() {
    let (app, _) = setup_app();
    let (status, body) = send(&app, admin("GET", "/api/applications/stats", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "total": 0, "pending": 0, "approved": 0, "rejected": 0, "byRole": {} })
    );
}

#[tokio::test]
async fn stats_break_down_by_role() {
    let (app, _) = setup_app();
    create(&app, "Ann Lee", "+15550000001", "WEB_DEVELOPER").await;
    create(&app, "Bob Ray", "+15550000002", "WEB_DEVELOPER").await;
    create(&app, "Cid Moe", "+15550000003", "CONTENT_WRITER").await;

    let (status, body) = send(&app, admin("GET", "/api/applications/stats", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 3);
    assert_eq!(body["pending"], 3);
    assert_eq!(
        body["byRole"],
        json!({ "WEB_DEVELOPER": 2, "CONTENT_WRITER": 1 })
    );
}

#[tokio::test]
async fn list_filters_and_paginates() {
    let (app, _) = setup_app();
    create(&app, "Ann Lee", "+15550000001", "WEB_DEVELOPER").await;
    let bob = create(&app, "Bob Ray", "+15550000002", "GRAPHIC_DESIGNER").await;
    create(&app, "Cid Moe", "+15550000003", "WEB_DEVELOPER").await;

    let bob_uri = format!("/api/applications/{}", bob["id"].as_str().unwrap());
    send(
        &app,
        admin("PATCH", &bob_uri, Some(&json!({ "status": "REJECTED" }))),
    )
    .await;

    let (_, body) = send(
        &app,
        admin("GET", "/api/applications?role=WEB_DEVELOPER", None),
    )
    .await;
    assert_eq!(body["total"], 2);

    let (_, body) = send(
        &app,
        admin("GET", "/api/applications?status=REJECTED", None),
    )
    .await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["items"][0]["legalName"], "Bob Ray");

    let (_, body) = send(&app, admin("GET", "/api/applications?search=ANN", None)).await;
    assert_eq!(body["total"], 1);

    let (_, body) = send(&app, admin("GET", "/api/applications?limit=2&page=2", None)).await;
    assert_eq!(body["total"], 3);
    assert_eq!(body["totalPages"], 2);
    assert_eq!(body["items"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, admin("GET", "/api/applications?limit=0", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, admin("GET", "/api/applications?status=DONE", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn out_of_range_page_and_wildcard_search() {
    let (app, _) = setup_app();
    create(&app, "Ann Lee", "+15550000011", "WEB_DEVELOPER").await;

    let uri = format!("/api/applications?page={}&limit=100", i64::MAX);
    let (status, body) = send(&app, admin("GET", &uri, None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["details"][0]["field"], "page");

    let (status, body) = send(&app, admin("GET", "/api/applications?search=%25", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 0);
}

#[tokio::test]
async fn long_contact_numbers_are_accepted() {
    let (app, store) = setup_app();
    let phone = "1".repeat(80);
    let body = create(&app, "Long Number", &phone, "GRAPHIC_DESIGNER").await;
    assert_eq!(body["contactNumber"], phone);
    assert_eq!(store.count(None).await.unwrap(), 1);
}

#[tokio::test]
async fn responses_carry_security_headers() {
    let (app, _) = setup_app();
    let req = Request::builder()
        .uri("/health")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let headers = resp.headers();
    assert_eq!(headers["x-content-type-options"], "nosniff");
    assert_eq!(headers["x-frame-options"], "DENY");
    assert_eq!(headers["x-xss-protection"], "1; mode=block");
    assert_eq!(headers["referrer-policy"], "strict-origin-when-cross-origin");
}

#[tokio::test]
async fn public_rate_limit_applies_to_submissions() {
    let store = Arc::new(MemoryApplicationStore::new());
    let app = router(
        AppState::new(store),
        RouterSettings {
            admin: AdminCredential::new(ADMIN_TOKEN),
            public_rps: 1,
            admin_rps: 1000,
        },
    );
    create(&app, "Ann Lee", "+15550000001", "WEB_DEVELOPER").await;
    let (status, _) = send(
        &app,
        post_json(
            "/api/applications",
            &submission("Bob Ray", "+15550000002", "WEB_DEVELOPER"),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::TOO_MANY_REQUESTS);
}

#[tokio::test]
async fn openapi_document_is_served() {
    let (app, _) = setup_app();
    let req = Request::builder()
        .uri("/api/openapi.json")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&app, req).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["paths"]["/api/applications"].is_object());
}
