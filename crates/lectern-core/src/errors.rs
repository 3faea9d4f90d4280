//! Application error type with HTTP response conversion.
//!
//! Every handler returns `Result<_, AppError>`. An [`AppError`] carries the
//! HTTP status, a stable machine-readable [`ErrorCode`], and the underlying
//! [`anyhow::Error`]. Client errors echo their message; server errors are
//! logged with their cause and answered with a generic message.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::json;
use utoipa::ToSchema;

/// Stable error codes returned in the `code` field of error responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    ValidationError,
    UnknownProvider,
    Unauthorized,
    TokenMissing,
    EmailMissing,
    TokenExpired,
    InvalidToken,
    InvalidCredentials,
    TokenInvalidated,
    Forbidden,
    NotFound,
    AuthFailed,
    InternalError,
}

impl ErrorCode {
    /// Default HTTP status for this code.
    pub fn status(self) -> StatusCode {
        match self {
            Self::ValidationError | Self::UnknownProvider => StatusCode::BAD_REQUEST,
            Self::Unauthorized | Self::TokenMissing | Self::EmailMissing | Self::TokenExpired => {
                StatusCode::UNAUTHORIZED
            }
            Self::InvalidToken
            | Self::InvalidCredentials
            | Self::TokenInvalidated
            | Self::Forbidden => StatusCode::FORBIDDEN,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::AuthFailed | Self::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::ValidationError => "VALIDATION_ERROR",
            Self::UnknownProvider => "UNKNOWN_PROVIDER",
            Self::Unauthorized => "UNAUTHORIZED",
            Self::TokenMissing => "TOKEN_MISSING",
            Self::EmailMissing => "EMAIL_MISSING",
            Self::TokenExpired => "TOKEN_EXPIRED",
            Self::InvalidToken => "INVALID_TOKEN",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::TokenInvalidated => "TOKEN_INVALIDATED",
            Self::Forbidden => "FORBIDDEN",
            Self::NotFound => "NOT_FOUND",
            Self::AuthFailed => "AUTH_FAILED",
            Self::InternalError => "INTERNAL_ERROR",
        }
    }

    fn from_status(status: StatusCode) -> Self {
        match status {
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => Self::ValidationError,
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            StatusCode::FORBIDDEN => Self::Forbidden,
            StatusCode::NOT_FOUND => Self::NotFound,
            _ => Self::InternalError,
        }
    }
}

/// Error body as documented in the OpenAPI schema.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub code: ErrorCode,
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub code: ErrorCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            code: ErrorCode::from_status(status),
            error: err.into(),
        }
    }

    /// Builds an error whose status follows from its code.
    pub fn with_code<E>(code: ErrorCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status: code.status(),
            code,
            error: err.into(),
        }
    }

    pub fn coded(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::with_code(code, anyhow::anyhow!(message.into()))
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn internal_error(message: String) -> Self {
        Self::coded(ErrorCode::InternalError, message)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized(message: String) -> Self {
        Self::coded(ErrorCode::Unauthorized, message)
    }

    pub fn forbidden(message: String) -> Self {
        Self::coded(ErrorCode::Forbidden, message)
    }

    /// Message sent to the client. Server-side failures never leak their cause.
    pub fn public_message(&self) -> String {
        match self.code {
            ErrorCode::AuthFailed => "Authentication failed".to_string(),
            _ if self.status.is_server_error() => "Internal server error".to_string(),
            _ => self.error.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            tracing::error!(code = self.code.as_str(), error = ?self.error, "request failed");
        }

        let body = Json(json!({
            "error": self.public_message(),
            "code": self.code,
        }));

        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}
