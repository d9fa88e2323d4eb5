//! ApiClient against a local axum backend.

use std::net::SocketAddr;

use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post, put};
use axum::{Json, Router};
use devjobs_client::ApiClient;
use devjobs_core::models::{AccountKind, AuthToken, Listing, Session};
use devjobs_core::validation::{LoginForm, ProfileUpdate, SignupForm};
use devjobs_core::{FailureKind, JobBoardApi};
use serde_json::{json, Value};

async fn jobs() -> Json<Value> {
    Json(json!([
        {"pk": 1, "title": "Engineer", "company_name": "Acme", "users_applied": 3, "created_date": "2024-01-01"},
        {"pk": 2, "title": "Designer", "company_name": "Globex", "expected_salary": 90000}
    ]))
}

async fn dashboard(headers: HeaderMap) -> impl IntoResponse {
    match headers.get("authorization").and_then(|v| v.to_str().ok()) {
        Some("Token employer-key") => (
            StatusCode::OK,
            Json(json!({"total_jobs_posted": [1, 2, 3], "active_jobs": []})),
        ),
        _ => (
            StatusCode::UNAUTHORIZED,
            Json(json!({"detail": "Authentication credentials were not provided."})),
        ),
    }
}

async fn register(Json(body): Json<Value>) -> impl IntoResponse {
    if body["username"] == "taken" {
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"username": ["A user with that username already exists."]})),
        )
    } else {
        (StatusCode::CREATED, Json(json!({"key": "fresh-key"})))
    }
}

async fn login() -> Json<Value> {
    Json(json!({"key": "login-key"}))
}

async fn profile(Json(body): Json<Value>) -> Json<Value> {
    Json(body)
}

async fn broken() -> impl IntoResponse {
    (StatusCode::INTERNAL_SERVER_ERROR, "<h1>Server Error</h1>")
}

async fn not_json() -> &'static str {
    "<html>maintenance</html>"
}

async fn serve(app: Router) -> SocketAddr {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    addr
}

async fn backend() -> ApiClient {
    let app = Router::new()
        .route("/api/jobs/", get(jobs))
        .route("/api/employer/dashboard/", get(dashboard))
        .route("/api/auth/registration/", post(register))
        .route("/api/auth/login/", post(login))
        .route("/api/users/profile/", put(profile));
    let addr = serve(app).await;
    ApiClient::new(&format!("http://{}/api", addr)).unwrap()
}

#[tokio::test]
async fn jobs_are_decoded() {
    let client = backend().await;
    let listing = client.get_jobs().await.unwrap();
    assert_eq!(listing.len(), 2);
    let jobs = listing.into_vec();
    assert_eq!(jobs[0].title, "Engineer");
    assert_eq!(jobs[0].applications(), 3);
    assert_eq!(jobs[1].salary.as_deref(), Some("90000"));
}

#[tokio::test]
async fn empty_object_listing_is_placeholder() {
    let app = Router::new().route("/jobs/", get(|| async { Json(json!({})) }));
    let addr = serve(app).await;
    let client = ApiClient::new(&format!("http://{}/", addr)).unwrap();
    assert_eq!(client.get_jobs().await.unwrap(), Listing::Placeholder);
}

#[tokio::test]
async fn non_success_status_is_response_error() {
    let app = Router::new().route("/api/jobs/", get(broken));
    let addr = serve(app).await;
    let client = ApiClient::new(&format!("http://{}/api/", addr)).unwrap();

    let err = client.get_jobs().await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Response);
    assert_eq!(err.status(), Some(500));
}

#[tokio::test]
async fn undecodable_success_body_is_response_error() {
    let app = Router::new().route("/api/jobs/", get(not_json));
    let addr = serve(app).await;
    let client = ApiClient::new(&format!("http://{}/api/", addr)).unwrap();

    let err = client.get_jobs().await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::Response);
    assert_eq!(err.status(), Some(200));
}

#[tokio::test]
async fn refused_connection_is_no_response() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = ApiClient::new(&format!("http://{}/api/", addr)).unwrap();
    let err = client.get_jobs().await.unwrap_err();
    assert_eq!(err.kind(), FailureKind::NoResponse);
}

#[tokio::test]
async fn dashboard_requires_token() {
    let client = backend().await;

    let err = client.get_employer_dashboard().await.unwrap_err();
    assert_eq!(err.status(), Some(401));

    let session = Session::new(
        AuthToken {
            key: "employer-key".into(),
        },
        AccountKind::Employer,
    );
    client.set_auth(Some(&session));
    let summary = client.get_employer_dashboard().await.unwrap();
    assert_eq!(summary.total_jobs_posted(), Some(3));
    assert_eq!(summary.active_jobs(), Some(0));
    assert_eq!(summary.expired_jobs(), None);
}

#[tokio::test]
async fn registration_errors_carry_field_messages() {
    let client = backend().await;
    let mut form = SignupForm {
        username: "taken".into(),
        email: "a@b.co".into(),
        password1: "password123".into(),
        password2: "password123".into(),
    };

    let err = client.register_user(&form).await.unwrap_err();
    assert_eq!(err.status(), Some(400));
    assert_eq!(
        err.field_error(&["username", "password1"]).as_deref(),
        Some("A user with that username already exists.")
    );

    form.username = "ada".into();
    let token = client.register_user(&form).await.unwrap();
    assert_eq!(token.key, "fresh-key");
}

#[tokio::test]
async fn login_and_profile_update() {
    let client = backend().await;
    let token = client
        .login(&LoginForm {
            username: "ada".into(),
            password: "password123".into(),
        })
        .await
        .unwrap();
    assert_eq!(token.key, "login-key");

    let saved = client
        .update_user_profile(&ProfileUpdate {
            first_name: "Ada".into(),
            email: "ada@example.com".into(),
            about: "Engineer".into(),
            salary: Some("120000".into()),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(saved.first_name.as_deref(), Some("Ada"));
    assert_eq!(saved.salary.as_deref(), Some("120000"));
}
