//! Role-based authorization.

use axum::{extract::FromRequestParts, http::request::Parts};

use lectern_core::AppError;

use crate::middleware::auth::AuthUser;
use crate::modules::users::model::{User, UserRole};
use crate::state::AppState;

/// Fails with `403 Forbidden` unless the user's stored role is one of `allowed`.
pub fn check_role(user: &User, allowed: &[UserRole]) -> Result<(), AppError> {
    if allowed.contains(&user.role) {
        Ok(())
    } else {
        tracing::debug!(user_id = %user.id, role = %user.role, ?allowed, "role check denied");
        Err(AppError::forbidden("Forbidden".to_string()))
    }
}

/// Extractor for admin-only handlers.
///
/// # Example
///
/// ```rust,ignore
/// pub async fn create_course(
///     State(state): State<AppState>,
///     RequireAdmin(admin): RequireAdmin,
///     ValidatedJson(dto): ValidatedJson<CreateCourseDto>,
/// ) -> Result<(StatusCode, Json<Course>), AppError> { ... }
/// ```
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub User);

impl FromRequestParts<AppState> for RequireAdmin {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let AuthUser(user) = AuthUser::from_request_parts(parts, state).await?;
        check_role(&user, &[UserRole::Admin])?;
        Ok(RequireAdmin(user))
    }
}
