#![allow(dead_code)]

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use sqlx::PgPool;
use tower::ServiceExt;
use uuid::Uuid;

use lectern::modules::notifications::templates::TemplateRegistry;
use lectern::router::init_router;
use lectern::state::AppState;
use lectern::utils::email::{MailError, Mailer, OutgoingEmail};
use lectern_config::{CorsConfig, EmailConfig, JwtConfig};

/// Captures every message instead of talking to a relay.
#[derive(Default)]
pub struct RecordingMailer {
    pub sent: Mutex<Vec<OutgoingEmail>>,
}

impl RecordingMailer {
    pub fn messages(&self) -> Vec<OutgoingEmail> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for RecordingMailer {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        self.sent.lock().unwrap().push(email.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "recording"
    }
}

/// Rejects every message.
pub struct FailingMailer;

#[async_trait]
impl Mailer for FailingMailer {
    async fn send(&self, _email: &OutgoingEmail) -> Result<(), MailError> {
        Err(MailError::Transport("relay unavailable".to_string()))
    }

    fn name(&self) -> &str {
        "failing"
    }
}

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        access_secret: "access-secret-for-integration-tests".to_string(),
        refresh_secret: "refresh-secret-for-integration-tests".to_string(),
        access_token_expiry: 900,
        refresh_token_expiry: 604800,
    }
}

pub fn test_email_config() -> EmailConfig {
    EmailConfig {
        smtp_host: "localhost".to_string(),
        smtp_port: 1025,
        smtp_username: String::new(),
        smtp_password: String::new(),
        from_email: "noreply@lectern.test".to_string(),
        from_name: "Lectern".to_string(),
        max_attempts: 3,
        retry_backoff: Duration::ZERO,
    }
}

pub fn build_app(pool: PgPool, jwt_config: JwtConfig, mailer: Arc<dyn Mailer>) -> Router {
    let state = AppState {
        db: pool,
        jwt_config,
        email_config: test_email_config(),
        cors_config: CorsConfig {
            allowed_origins: vec!["http://localhost:5173".to_string()],
        },
        templates: Arc::new(TemplateRegistry::new().unwrap()),
        mailer,
    };
    init_router(state)
}

pub fn setup_test_app(pool: PgPool) -> Router {
    build_app(pool, test_jwt_config(), Arc::new(RecordingMailer::default()))
}

pub fn generate_unique_email() -> String {
    format!("test-{}@test.com", Uuid::new_v4())
}

pub fn json_request(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

/// Request carrying the bearer token and the claimed email header.
pub fn authed_request(
    method: &str,
    uri: &str,
    token: &str,
    email: &str,
    body: Option<Value>,
) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("authorization", format!("Bearer {}", token))
        .header("x-user-email", email);

    match body {
        Some(body) => builder
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    if bytes.is_empty() {
        return Value::Null;
    }
    serde_json::from_slice(&bytes).unwrap()
}

pub struct Registered {
    pub email: String,
    pub password: String,
    pub token: String,
    pub refresh_token: String,
    pub body: Value,
}

/// Registers a user through the API and returns the issued tokens.
pub async fn register(app: &Router, name: &str) -> Registered {
    let email = generate_unique_email();
    let password = "password123".to_string();

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/register",
            json!({ "name": name, "email": email, "password": password }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), 201);

    let body = body_json(response).await;
    Registered {
        email,
        password,
        token: body["token"].as_str().unwrap().to_string(),
        refresh_token: body["refreshToken"].as_str().unwrap().to_string(),
        body,
    }
}

/// Logs an already registered user in and returns the new access token.
pub async fn login(app: &Router, user: &Registered) -> String {
    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/login",
            json!({ "email": user.email, "password": user.password }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), 200);

    let body = body_json(response).await;
    body["token"].as_str().unwrap().to_string()
}
