//! Credential store queries.

use sqlx::{PgExecutor, PgPool};
use tracing::instrument;
use uuid::Uuid;

use lectern_core::AppError;

use crate::modules::users::model::User;

pub(crate) const USER_COLUMNS: &str =
    "id, name, email, password, role, refresh_tokens, created_at, updated_at";

/// Emails are stored and compared trimmed and lowercased.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub struct UserService;

impl UserService {
    #[instrument(skip(db))]
    pub async fn find_by_email(db: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = $1"))
            .bind(normalize_email(email))
            .fetch_optional(db)
            .await
    }

    #[instrument(skip(db))]
    pub async fn find_by_id(db: &PgPool, id: Uuid) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(db)
            .await
    }

    /// Resolves the user only when both the id and the email match the same row.
    #[instrument(skip(db))]
    pub async fn find_by_id_and_email(
        db: &PgPool,
        id: Uuid,
        email: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = $1 AND email = $2"
        ))
        .bind(id)
        .bind(normalize_email(email))
        .fetch_optional(db)
        .await
    }

    /// Appends to the user's refresh token list in a single statement, so
    /// concurrent logins never overwrite each other's tokens.
    #[instrument(skip(executor, token))]
    pub async fn append_refresh_token<'e, E>(
        executor: E,
        user_id: Uuid,
        token: &str,
    ) -> Result<(), AppError>
    where
        E: PgExecutor<'e>,
    {
        let result = sqlx::query(
            "UPDATE users
             SET refresh_tokens = array_append(refresh_tokens, $2), updated_at = NOW()
             WHERE id = $1",
        )
        .bind(user_id)
        .bind(token)
        .execute(executor)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::internal(anyhow::anyhow!(
                "User {} disappeared while storing refresh token",
                user_id
            )));
        }

        Ok(())
    }
}
