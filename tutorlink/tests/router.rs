//! Router-level smoke tests.
//!
//! These build the full application router against a lazy (never-connected)
//! database pool, so they exercise routing, the identity extractor's
//! missing-header path, and the error envelope without needing Postgres.

use std::sync::Arc;

use tutorlink::config::{Config, EmailConfig, EmailTransportConfig};
use tutorlink::email::EmailService;
use tutorlink::storage::NoopStorage;
use tutorlink::{AppState, build_router};

fn test_state(emails_dir: &std::path::Path) -> AppState {
    let mut config = Config::default();
    config.email = EmailConfig {
        transport: EmailTransportConfig::File {
            path: emails_dir.to_string_lossy().to_string(),
        },
        from_email: "noreply@example.com".to_string(),
        from_name: "TutorLink".to_string(),
    };

    let pool = sqlx::postgres::PgPoolOptions::new()
        .connect_lazy("postgres://localhost:5432/tutorlink_test_unused")
        .expect("lazy pool construction does not connect");

    let email = Arc::new(EmailService::new(&config.email).expect("file transport"));

    AppState::builder()
        .db(pool)
        .config(config)
        .storage(Arc::new(NoopStorage))
        .email(email)
        .build()
}

fn test_server(emails_dir: &std::path::Path) -> axum_test::TestServer {
    let router = build_router(test_state(emails_dir)).expect("router builds");
    axum_test::TestServer::new(router).expect("test server starts")
}

#[tokio::test]
async fn healthz_responds_without_a_database() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(dir.path());

    let response = server.get("/healthz").await;
    response.assert_status_ok();
    response.assert_text("OK");
}

#[tokio::test]
async fn missing_identity_header_is_unauthorized_with_the_error_envelope() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(dir.path());

    let response = server.get("/api/v1/wallet").await;
    response.assert_status_unauthorized();

    let body: serde_json::Value = response.json();
    assert_eq!(body["success"], serde_json::json!(false));
    assert!(body["message"].is_string());
}

#[tokio::test]
async fn unknown_routes_are_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(dir.path());

    let response = server.get("/api/v1/nope").await;
    response.assert_status_not_found();
}

#[tokio::test]
async fn api_docs_are_served() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(dir.path());

    let response = server.get("/docs").await;
    response.assert_status_ok();
}

#[tokio::test]
async fn malformed_path_ids_are_client_errors() {
    let dir = tempfile::tempdir().unwrap();
    let server = test_server(dir.path());

    // Identity is checked via the extractor in the handler body; the path
    // deserializer rejects the non-UUID segment first
    let response = server.get("/api/v1/teachers/not-a-uuid").await;
    assert!(response.status_code().is_client_error());
}
