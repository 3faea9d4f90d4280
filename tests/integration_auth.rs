mod common;

use axum::http::StatusCode;
use serde_json::json;
use sqlx::PgPool;
use tower::ServiceExt;

use std::sync::Arc;

use common::{
    RecordingMailer, body_json, build_app, generate_unique_email, json_request, register,
    setup_test_app, test_jwt_config,
};
use lectern_auth::{verify_access_token, verify_refresh_token};

#[sqlx::test(migrations = "./migrations")]
async fn test_first_user_becomes_admin(pool: PgPool) {
    let app = setup_test_app(pool.clone());

    let first = register(&app, "First").await;
    assert_eq!(first.body["user"]["role"], "admin");
    assert_eq!(first.body["user"]["email"], first.email);
    assert!(first.body["user"].get("password").is_none());

    let second = register(&app, "Second").await;
    assert_eq!(second.body["user"]["role"], "student");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_stores_refresh_token(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let user = register(&app, "Ada").await;

    let tokens: Vec<String> =
        sqlx::query_scalar("SELECT refresh_tokens FROM users WHERE email = $1")
            .bind(&user.email)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(tokens, vec![user.refresh_token]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_duplicate_email(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let user = register(&app, "Ada").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/register",
            json!({ "name": "Again", "email": user.email.to_uppercase(), "password": "password123" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Email already exists");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_short_password(pool: PgPool) {
    let app = setup_test_app(pool.clone());

    let response = app
        .oneshot(json_request(
            "POST",
            "/register",
            json!({ "name": "Ada", "email": generate_unique_email(), "password": "short" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_missing_field(pool: PgPool) {
    let app = setup_test_app(pool.clone());

    let response = app
        .oneshot(json_request(
            "POST",
            "/register",
            json!({ "email": generate_unique_email(), "password": "password123" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_success(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let user = register(&app, "Ada").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/login",
            json!({ "email": user.email, "password": user.password }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert!(body["token"].is_string());
    assert!(body["refreshToken"].is_string());
    assert_eq!(body["user"]["email"], user.email);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_wrong_password(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let user = register(&app, "Ada").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/login",
            json!({ "email": user.email, "password": "wrongpass123" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid email or password");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_login_unknown_email_same_message(pool: PgPool) {
    let app = setup_test_app(pool.clone());

    let response = app
        .oneshot(json_request(
            "POST",
            "/login",
            json!({ "email": "nobody@test.com", "password": "password123" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Invalid email or password");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_sessions_accumulate_across_logins(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let user = register(&app, "Ada").await;

    let response = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/login",
            json!({ "email": user.email, "password": user.password }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let login = body_json(response).await;

    let tokens: Vec<String> =
        sqlx::query_scalar("SELECT refresh_tokens FROM users WHERE email = $1")
            .bind(&user.email)
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(tokens.len(), 2);
    assert_eq!(tokens[0], user.refresh_token);
    assert_eq!(tokens[1], login["refreshToken"].as_str().unwrap());

    let config = common::test_jwt_config();
    assert!(verify_access_token(&user.token, &config).is_ok());
    assert!(verify_access_token(login["token"].as_str().unwrap(), &config).is_ok());
    assert!(verify_refresh_token(&tokens[0], &config).is_ok());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_returns_new_access_token(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let user = register(&app, "Ada").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/refresh",
            json!({ "refreshToken": user.refresh_token }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let token = body["token"].as_str().unwrap();

    let claims = verify_access_token(token, &common::test_jwt_config()).unwrap();
    assert_eq!(claims.sub, user.body["user"]["id"].as_str().unwrap());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_rejects_access_token(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let user = register(&app, "Ada").await;

    let response = app
        .oneshot(json_request("POST", "/refresh", json!({ "refreshToken": user.token })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["code"], "INVALID_TOKEN");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_rejects_revoked_token(pool: PgPool) {
    let app = setup_test_app(pool.clone());
    let user = register(&app, "Ada").await;

    sqlx::query("UPDATE users SET refresh_tokens = '{}' WHERE email = $1")
        .bind(&user.email)
        .execute(&pool)
        .await
        .unwrap();

    let response = app
        .oneshot(json_request(
            "POST",
            "/refresh",
            json!({ "refreshToken": user.refresh_token }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let body = body_json(response).await;
    assert_eq!(body["code"], "TOKEN_INVALIDATED");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_refresh_rejects_just_expired_token(pool: PgPool) {
    let mut config = test_jwt_config();
    config.refresh_token_expiry = -5;
    let app = build_app(pool.clone(), config, Arc::new(RecordingMailer::default()));
    let user = register(&app, "Ada").await;

    let response = app
        .oneshot(json_request(
            "POST",
            "/refresh",
            json!({ "refreshToken": user.refresh_token }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["code"], "TOKEN_EXPIRED");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_register_blank_name(pool: PgPool) {
    let app = setup_test_app(pool.clone());

    let response = app
        .oneshot(json_request(
            "POST",
            "/register",
            json!({ "name": "   ", "email": generate_unique_email(), "password": "password123" }),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}
