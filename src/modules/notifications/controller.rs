use axum::{Json, extract::State};
use tracing::instrument;

use lectern_core::AppError;

use crate::modules::notifications::model::{Notification, SendEmailRequest, SendEmailResponse};
use crate::modules::notifications::service::NotificationService;
use crate::modules::notifications::templates::Locale;
use crate::state::AppState;
use crate::validator::ValidatedJson;

async fn send_in(
    state: &AppState,
    locale: Locale,
    request: SendEmailRequest,
) -> Result<Json<SendEmailResponse>, AppError> {
    let notification = NotificationService::send(state, locale, request).await?;
    Ok(Json(SendEmailResponse {
        message: "Email sent successfully".to_string(),
        notification,
    }))
}

/// Send a provider transaction email in English
#[utoipa::path(
    post,
    path = "/send-email",
    request_body = SendEmailRequest,
    responses(
        (status = 200, description = "Email sent", body = SendEmailResponse),
        (status = 400, description = "Validation error or unknown provider", body = lectern_core::ErrorResponse),
        (status = 500, description = "Dispatch failed; the record is marked Failed", body = lectern_core::ErrorResponse)
    ),
    tag = "Notifications"
)]
#[instrument(skip(state))]
pub async fn send_email(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SendEmailRequest>,
) -> Result<Json<SendEmailResponse>, AppError> {
    send_in(&state, Locale::English, request).await
}

/// Send a Bitso transaction email in Spanish
#[utoipa::path(
    post,
    path = "/send-email-bitso-spanish",
    request_body = SendEmailRequest,
    responses(
        (status = 200, description = "Email sent", body = SendEmailResponse),
        (status = 400, description = "Validation error or unknown provider", body = lectern_core::ErrorResponse),
        (status = 500, description = "Dispatch failed", body = lectern_core::ErrorResponse)
    ),
    tag = "Notifications"
)]
#[instrument(skip(state))]
pub async fn send_email_spanish(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SendEmailRequest>,
) -> Result<Json<SendEmailResponse>, AppError> {
    send_in(&state, Locale::Spanish, request).await
}

/// Send a Bitso transaction email in Portuguese
#[utoipa::path(
    post,
    path = "/send-email-bitso-portugusse",
    request_body = SendEmailRequest,
    responses(
        (status = 200, description = "Email sent", body = SendEmailResponse),
        (status = 400, description = "Validation error or unknown provider", body = lectern_core::ErrorResponse),
        (status = 500, description = "Dispatch failed", body = lectern_core::ErrorResponse)
    ),
    tag = "Notifications"
)]
#[instrument(skip(state))]
pub async fn send_email_portuguese(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<SendEmailRequest>,
) -> Result<Json<SendEmailResponse>, AppError> {
    send_in(&state, Locale::Portuguese, request).await
}

/// List every recorded notification, newest first
#[utoipa::path(
    get,
    path = "/transactions",
    responses(
        (status = 200, description = "Notification records", body = Vec<Notification>),
        (status = 500, description = "Internal server error", body = lectern_core::ErrorResponse)
    ),
    tag = "Notifications"
)]
#[instrument(skip(state))]
pub async fn get_transactions(
    State(state): State<AppState>,
) -> Result<Json<Vec<Notification>>, AppError> {
    let notifications = NotificationService::list(&state.db).await?;
    Ok(Json(notifications))
}
