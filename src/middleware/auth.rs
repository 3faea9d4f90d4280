//! Bearer authentication.
//!
//! A request is authenticated when all of the following hold, checked in
//! this order:
//!
//! 1. an `Authorization: Bearer <token>` header is present
//! 2. an `x-user-email` header is present
//! 3. the token verifies against the access secret and is unexpired
//! 4. the token subject and the claimed email resolve to the same user
//! 5. that user still holds at least one valid refresh token for themselves
//!
//! The resolved [`User`] is stored in the request extensions so later
//! extractors reuse it instead of hitting the database again.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use uuid::Uuid;

use lectern_auth::{TokenError, verify_access_token, verify_refresh_token};
use lectern_config::JwtConfig;
use lectern_core::{AppError, ErrorCode};
use lectern_observability::track_auth_rejection;

use crate::modules::users::model::User;
use crate::modules::users::service::UserService;
use crate::state::AppState;

/// Header carrying the email the caller claims to be.
pub const USER_EMAIL_HEADER: &str = "x-user-email";

fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

fn claimed_email(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(USER_EMAIL_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|email| !email.is_empty())
}

/// True when at least one stored refresh token verifies, is unexpired and
/// belongs to `user`.
pub fn has_active_session(user: &User, jwt_config: &JwtConfig) -> bool {
    let subject = user.id.to_string();
    user.refresh_tokens.iter().any(|token| {
        verify_refresh_token(token, jwt_config)
            .map(|claims| claims.sub == subject)
            .unwrap_or(false)
    })
}

fn reject(code: ErrorCode, message: &str) -> AppError {
    track_auth_rejection(code.as_str());
    AppError::coded(code, message)
}

/// Runs the full authentication check against the request headers.
pub async fn authenticate(headers: &HeaderMap, state: &AppState) -> Result<User, AppError> {
    let token = bearer_token(headers)
        .ok_or_else(|| reject(ErrorCode::TokenMissing, "Access token is required"))?;

    let email = claimed_email(headers)
        .ok_or_else(|| reject(ErrorCode::EmailMissing, "User email header is required"))?;

    let claims = verify_access_token(token, &state.jwt_config).map_err(|err| match err {
        TokenError::Expired => reject(ErrorCode::TokenExpired, "Access token has expired"),
        _ => reject(ErrorCode::InvalidToken, "Invalid access token"),
    })?;

    let user_id = Uuid::parse_str(&claims.sub)
        .map_err(|_| reject(ErrorCode::InvalidCredentials, "Invalid credentials"))?;

    let user = UserService::find_by_id_and_email(&state.db, user_id, email)
        .await
        .map_err(|e| AppError::with_code(ErrorCode::AuthFailed, e))?
        .ok_or_else(|| reject(ErrorCode::InvalidCredentials, "Invalid credentials"))?;

    if !has_active_session(&user, &state.jwt_config) {
        return Err(reject(
            ErrorCode::TokenInvalidated,
            "Session is no longer valid, please log in again",
        ));
    }

    Ok(user)
}

/// Extractor for the authenticated user.
#[derive(Debug, Clone)]
pub struct AuthUser(pub User);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<AuthUser>() {
            return Ok(user.clone());
        }

        let user = AuthUser(authenticate(&parts.headers, state).await?);
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

/// Layer function guarding every route of a router.
///
/// ```rust,ignore
/// init_lessons_router()
///     .route_layer(middleware::from_fn_with_state(state.clone(), require_auth))
/// ```
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(req.headers(), &state).await?;
    req.extensions_mut().insert(AuthUser(user));
    Ok(next.run(req).await)
}
