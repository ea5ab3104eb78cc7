//! End-to-end registration flow: HTTP intake, SQLite persistence and
//! provider fallback against local stand-in email APIs.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::body::{Body, Bytes, to_bytes};
use axum::extract::State;
use axum::http::{Request, StatusCode, Uri, header};
use axum::routing::post;
use axum::{Router, response::Response};
use tokio::net::TcpListener;
use tower::ServiceExt;

use rust_regmail::api::{ApiServer, ApiServerConfig};
use rust_regmail::config::AppConfig;
use rust_regmail::database;
use rust_regmail::services::ServiceContainer;

/// Requests seen by a stand-in provider: (path, body).
type Seen = Arc<Mutex<Vec<(String, String)>>>;

/// Start a local HTTP server that answers every POST with `status`.
async fn stand_in_provider(status: StatusCode) -> (String, Seen) {
    let seen: Seen = Arc::default();

    async fn handle(
        State((status, seen)): State<(StatusCode, Seen)>,
        uri: Uri,
        body: Bytes,
    ) -> (StatusCode, &'static str) {
        seen.lock()
            .unwrap()
            .push((uri.path().to_string(), String::from_utf8_lossy(&body).into_owned()));
        (status, "stand-in reply")
    }

    let app = Router::new()
        .route("/{*path}", post(handle))
        .with_state((status, Arc::clone(&seen)));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}", addr), seen)
}

async fn app(vars: &[(&str, &str)]) -> Router {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let config = AppConfig::from_lookup(|key| vars.get(key).cloned()).unwrap();

    let pool = database::init_pool_with_size("sqlite::memory:", 1)
        .await
        .unwrap();
    let container = ServiceContainer::with_pool(pool, &config).await.unwrap();

    ApiServer::with_state(ApiServerConfig::default(), container.app_state()).build_router()
}

async fn submit_form(app: &Router, form: &str) -> Response {
    app.clone()
        .oneshot(
            Request::post("/api/registrations")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(form.to_string()))
                .unwrap(),
        )
        .await
        .unwrap()
}

async fn json(response: Response) -> serde_json::Value {
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn registration_falls_back_to_sendgrid() {
    let (mailgun_base, mailgun_seen) = stand_in_provider(StatusCode::INTERNAL_SERVER_ERROR).await;
    let (sendgrid_base, sendgrid_seen) = stand_in_provider(StatusCode::ACCEPTED).await;

    let app = app(&[
        ("MAILGUN_API_KEY", "key-123"),
        ("MAILGUN_DOMAIN", "mg.example.org"),
        ("MAILGUN_API_BASE", &mailgun_base),
        ("SENDGRID_API_KEY", "SG.secret"),
        ("SENDGRID_API_BASE", &sendgrid_base),
        ("INSTITUTIONAL_EMAIL", "office@school.edu"),
    ])
    .await;

    let response = submit_form(
        &app,
        "record_number=2024-17&full_name=Ana+Silva&account_name=asilva&request_secondary_notification=on",
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json(response).await;
    assert_eq!(body["display_name"], "Ana Silva");
    assert_eq!(
        body["message"],
        "Registered: Ana Silva. Institutional email: delivered via SendGrid. Secondary email: delivered via SendGrid"
    );

    // Mailgun was tried first for each recipient.
    let mailgun = mailgun_seen.lock().unwrap().clone();
    assert_eq!(mailgun.len(), 2);
    assert!(mailgun.iter().all(|(path, _)| path == "/v3/mg.example.org/messages"));

    let sendgrid = sendgrid_seen.lock().unwrap().clone();
    assert_eq!(sendgrid.len(), 2);
    assert!(sendgrid[0].1.contains("office@school.edu"));
    assert!(sendgrid[1].1.contains("flaskaulasweb@zohomail.com"));
    assert!(sendgrid[0].1.contains("New registration: Ana Silva (asilva)"));
}

#[tokio::test]
async fn registration_succeeds_without_providers() {
    let app = app(&[("INSTITUTIONAL_EMAIL", "office@school.edu")]).await;

    let response = submit_form(&app, "full_name=Ana+Silva&account_name=asilva").await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let body = json(response).await;
    assert_eq!(body["id"], 1);
    assert_eq!(body["outcomes"][0]["delivered"], false);
    assert_eq!(
        body["outcomes"][0]["detail"],
        "both providers failed: Mailgun not configured / SendGrid not configured"
    );
    assert_eq!(body["outcomes"][1]["detail"], "not requested");

    let listing = app
        .oneshot(
            Request::get("/api/registrations")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json(listing).await;
    assert_eq!(body["greeting"], "Ana Silva");
    assert_eq!(body["registrations"][0]["record_number"], "");
}

#[tokio::test]
async fn rejected_submission_is_not_stored() {
    let (mailgun_base, mailgun_seen) = stand_in_provider(StatusCode::OK).await;
    let app = app(&[
        ("MAILGUN_API_KEY", "key-123"),
        ("MAILGUN_DOMAIN", "mg.example.org"),
        ("MAILGUN_API_BASE", &mailgun_base),
        ("INSTITUTIONAL_EMAIL", "office@school.edu"),
    ])
    .await;

    let response = submit_form(&app, "record_number=1&full_name=&account_name=asilva").await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json(response).await["code"], "VALIDATION_ERROR");
    assert!(mailgun_seen.lock().unwrap().is_empty());

    let listing = app
        .oneshot(
            Request::get("/api/registrations")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    let body = json(listing).await;
    assert_eq!(body["greeting"], "Stranger");
    assert!(body["registrations"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = app(&[]).await;

    let response = app
        .oneshot(
            Request::get("/api/docs/openapi.json")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json(response).await;
    assert!(body["paths"]["/api/registrations"].is_object());
}
