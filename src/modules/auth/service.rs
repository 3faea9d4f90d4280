use sqlx::PgPool;
use tracing::{info, instrument};
use uuid::Uuid;

use lectern_auth::{TokenError, create_access_token, issue_token_pair, verify_refresh_token};
use lectern_config::JwtConfig;
use lectern_core::{AppError, ErrorCode, hash_password, verify_password};
use lectern_models::UserRole;
use lectern_observability::{
    track_jwt_issued, track_user_login_failure, track_user_login_success, track_user_registered,
};

use crate::modules::users::model::User;
use crate::modules::users::service::{USER_COLUMNS, UserService, normalize_email};

use super::model::{AuthResponse, LoginRequest, PublicUser, RegisterRequest};

/// Advisory lock key serializing registrations, so the "first user becomes
/// admin" check and the insert happen atomically.
const REGISTRATION_LOCK_KEY: i64 = 0x6c65_6374_6572_6e01;

const INVALID_LOGIN: &str = "Invalid email or password";

pub struct AuthService;

impl AuthService {
    #[instrument(skip(db, jwt_config, dto), fields(email = %dto.email))]
    pub async fn register(
        db: &PgPool,
        jwt_config: &JwtConfig,
        dto: RegisterRequest,
    ) -> Result<AuthResponse, AppError> {
        let email = normalize_email(&dto.email);
        let hashed_password = hash_password(&dto.password)?;

        let mut tx = db.begin().await?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(REGISTRATION_LOCK_KEY)
            .execute(&mut *tx)
            .await?;

        let email_taken =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(&email)
                .fetch_one(&mut *tx)
                .await?;

        if email_taken {
            return Err(AppError::bad_request(anyhow::anyhow!("Email already exists")));
        }

        let has_users = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users)")
            .fetch_one(&mut *tx)
            .await?;

        let role = if has_users {
            UserRole::Student
        } else {
            UserRole::Admin
        };

        let user = sqlx::query_as::<_, User>(&format!(
            "INSERT INTO users (name, email, password, role)
             VALUES ($1, $2, $3, $4)
             RETURNING {USER_COLUMNS}"
        ))
        .bind(dto.name.trim())
        .bind(&email)
        .bind(&hashed_password)
        .bind(role)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e
                && db_err.is_unique_violation()
            {
                return AppError::bad_request(anyhow::anyhow!("Email already exists"));
            }
            AppError::from(e)
        })?;

        let pair = issue_token_pair(user.id, user.role, jwt_config)?;
        UserService::append_refresh_token(&mut *tx, user.id, &pair.refresh_token).await?;

        tx.commit().await?;

        track_user_registered(user.role.as_str());
        track_jwt_issued("access");
        track_jwt_issued("refresh");
        info!(user_id = %user.id, role = %user.role, "user registered");

        Ok(AuthResponse {
            token: pair.access_token,
            refresh_token: pair.refresh_token,
            user: PublicUser::from(&user),
        })
    }

    #[instrument(skip(db, jwt_config, dto), fields(email = %dto.email))]
    pub async fn login(
        db: &PgPool,
        jwt_config: &JwtConfig,
        dto: LoginRequest,
    ) -> Result<AuthResponse, AppError> {
        let Some(user) = UserService::find_by_email(db, &dto.email).await? else {
            track_user_login_failure();
            return Err(AppError::unauthorized(INVALID_LOGIN.to_string()));
        };

        if !verify_password(&dto.password, &user.password)? {
            track_user_login_failure();
            return Err(AppError::unauthorized(INVALID_LOGIN.to_string()));
        }

        let pair = issue_token_pair(user.id, user.role, jwt_config)?;
        UserService::append_refresh_token(db, user.id, &pair.refresh_token).await?;

        track_user_login_success(user.role.as_str());
        track_jwt_issued("access");
        track_jwt_issued("refresh");

        Ok(AuthResponse {
            token: pair.access_token,
            refresh_token: pair.refresh_token,
            user: PublicUser::from(&user),
        })
    }

    /// Exchanges a stored refresh token for a new access token.
    ///
    /// The refresh token is not rotated. The new access token carries the
    /// role currently stored for the user.
    #[instrument(skip_all)]
    pub async fn refresh(
        db: &PgPool,
        jwt_config: &JwtConfig,
        refresh_token: &str,
    ) -> Result<String, AppError> {
        let claims = verify_refresh_token(refresh_token, jwt_config).map_err(|err| match err {
            TokenError::Expired => {
                AppError::coded(ErrorCode::TokenExpired, "Refresh token has expired")
            }
            _ => AppError::coded(ErrorCode::InvalidToken, "Invalid refresh token"),
        })?;

        let user_id = Uuid::parse_str(&claims.sub)
            .map_err(|_| AppError::coded(ErrorCode::InvalidToken, "Invalid refresh token"))?;

        let user = UserService::find_by_id(db, user_id)
            .await?
            .filter(|user| user.refresh_tokens.iter().any(|t| t == refresh_token))
            .ok_or_else(|| {
                AppError::coded(ErrorCode::TokenInvalidated, "Refresh token is no longer valid")
            })?;

        let token = create_access_token(user.id, user.role, jwt_config)?;
        track_jwt_issued("access");

        Ok(token)
    }
}
