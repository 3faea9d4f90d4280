//! JWT creation and verification.
//!
//! Access and refresh tokens are HS256 JWTs signed with separate secrets
//! from [`JwtConfig`]. Verification reports expiry separately from every
//! other failure so callers can answer "expired" and "invalid" differently.
//!
//! # Example
//!
//! ```ignore
//! use lectern_auth::{issue_token_pair, verify_access_token};
//! use lectern_config::JwtConfig;
//!
//! let config = JwtConfig::from_env();
//! let pair = issue_token_pair(user_id, UserRole::Student, &config)?;
//! let claims = verify_access_token(&pair.access_token, &config)?;
//! ```

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;
use uuid::Uuid;

use lectern_config::JwtConfig;
use lectern_models::UserRole;

use crate::claims::{AccessClaims, RefreshClaims};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TokenError {
    #[error("token has expired")]
    Expired,
    #[error("token is invalid")]
    Invalid,
    #[error("failed to sign token: {0}")]
    Signing(String),
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        match err.kind() {
            ErrorKind::ExpiredSignature => TokenError::Expired,
            _ => TokenError::Invalid,
        }
    }
}

/// An access token and its companion refresh token.
#[derive(Debug, Clone)]
pub struct TokenPair {
    pub access_token: String,
    pub refresh_token: String,
}

/// Returns `(iat, exp)` for a token living `lifetime` seconds from now.
fn timestamps(lifetime: i64) -> (usize, usize) {
    let now = Utc::now().timestamp();
    (now.max(0) as usize, (now + lifetime).max(0) as usize)
}

fn sign<T: Serialize>(claims: &T, secret: &str) -> Result<String, TokenError> {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| TokenError::Signing(e.to_string()))
}

/// HS256 validation with no clock leeway: a token is expired the second
/// `exp` passes.
fn validation() -> Validation {
    let mut validation = Validation::new(Algorithm::HS256);
    validation.leeway = 0;
    validation
}

fn verify<T: DeserializeOwned>(token: &str, secret: &str) -> Result<T, TokenError> {
    decode::<T>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &validation(),
    )
    .map(|data| data.claims)
    .map_err(TokenError::from)
}

pub fn create_access_token(
    user_id: Uuid,
    role: UserRole,
    jwt_config: &JwtConfig,
) -> Result<String, TokenError> {
    let (iat, exp) = timestamps(jwt_config.access_token_expiry);
    let claims = AccessClaims {
        sub: user_id.to_string(),
        role,
        exp,
        iat,
    };
    sign(&claims, &jwt_config.access_secret)
}

pub fn create_refresh_token(user_id: Uuid, jwt_config: &JwtConfig) -> Result<String, TokenError> {
    let (iat, exp) = timestamps(jwt_config.refresh_token_expiry);
    let claims = RefreshClaims {
        sub: user_id.to_string(),
        exp,
        iat,
        jti: Uuid::new_v4().to_string(),
    };
    sign(&claims, &jwt_config.refresh_secret)
}

/// Issues a fresh access/refresh pair.
///
/// The caller must persist `refresh_token` on the user before handing the
/// pair to the client; an access token is only honoured while one of its
/// owner's stored refresh tokens is still valid.
pub fn issue_token_pair(
    user_id: Uuid,
    role: UserRole,
    jwt_config: &JwtConfig,
) -> Result<TokenPair, TokenError> {
    Ok(TokenPair {
        access_token: create_access_token(user_id, role, jwt_config)?,
        refresh_token: create_refresh_token(user_id, jwt_config)?,
    })
}

pub fn verify_access_token(token: &str, jwt_config: &JwtConfig) -> Result<AccessClaims, TokenError> {
    verify(token, &jwt_config.access_secret)
}

pub fn verify_refresh_token(
    token: &str,
    jwt_config: &JwtConfig,
) -> Result<RefreshClaims, TokenError> {
    verify(token, &jwt_config.refresh_secret)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get_test_jwt_config() -> JwtConfig {
        JwtConfig {
            access_secret: "test-access-secret-at-least-32-characters".to_string(),
            refresh_secret: "test-refresh-secret-at-least-32-characters".to_string(),
            access_token_expiry: 900,
            refresh_token_expiry: 604800,
        }
    }

    #[test]
    fn test_access_token_round_trip() {
        let config = get_test_jwt_config();
        let user_id = Uuid::new_v4();

        let token = create_access_token(user_id, UserRole::Admin, &config).unwrap();
        let claims = verify_access_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, UserRole::Admin);
        assert_eq!(claims.exp - claims.iat, 900);
    }

    #[test]
    fn test_refresh_token_round_trip() {
        let config = get_test_jwt_config();
        let user_id = Uuid::new_v4();

        let token = create_refresh_token(user_id, &config).unwrap();
        let claims = verify_refresh_token(&token, &config).unwrap();

        assert_eq!(claims.sub, user_id.to_string());
        assert!(!claims.jti.is_empty());
    }

    #[test]
    fn test_verify_garbage_is_invalid() {
        let config = get_test_jwt_config();
        assert_eq!(
            verify_access_token("invalid-token", &config).unwrap_err(),
            TokenError::Invalid
        );
        assert_eq!(
            verify_refresh_token("", &config).unwrap_err(),
            TokenError::Invalid
        );
    }

    #[test]
    fn test_expired_access_token() {
        let mut config = get_test_jwt_config();
        config.access_token_expiry = -3600;

        let token = create_access_token(Uuid::new_v4(), UserRole::Student, &config).unwrap();
        assert_eq!(
            verify_access_token(&token, &config).unwrap_err(),
            TokenError::Expired
        );
    }

    #[test]
    fn test_expired_refresh_token() {
        let mut config = get_test_jwt_config();
        config.refresh_token_expiry = -3600;

        let token = create_refresh_token(Uuid::new_v4(), &config).unwrap();
        assert_eq!(
            verify_refresh_token(&token, &config).unwrap_err(),
            TokenError::Expired
        );
    }

    #[test]
    fn test_recently_expired_tokens_are_rejected() {
        let mut config = get_test_jwt_config();
        config.access_token_expiry = -5;
        config.refresh_token_expiry = -5;
        let user_id = Uuid::new_v4();

        let access = create_access_token(user_id, UserRole::Student, &config).unwrap();
        assert_eq!(
            verify_access_token(&access, &config).unwrap_err(),
            TokenError::Expired
        );

        let refresh = create_refresh_token(user_id, &config).unwrap();
        assert_eq!(
            verify_refresh_token(&refresh, &config).unwrap_err(),
            TokenError::Expired
        );
    }

    #[test]
    fn test_wrong_secret_is_invalid() {
        let config = get_test_jwt_config();
        let token = create_access_token(Uuid::new_v4(), UserRole::Student, &config).unwrap();

        let mut other = get_test_jwt_config();
        other.access_secret = "different-secret-key-at-least-32-characters".to_string();

        assert_eq!(
            verify_access_token(&token, &other).unwrap_err(),
            TokenError::Invalid
        );
    }

    #[test]
    fn test_refresh_token_is_not_an_access_token() {
        let config = get_test_jwt_config();
        let user_id = Uuid::new_v4();
        let pair = issue_token_pair(user_id, UserRole::Student, &config).unwrap();

        assert!(verify_access_token(&pair.refresh_token, &config).is_err());
        assert!(verify_refresh_token(&pair.access_token, &config).is_err());
    }

    #[test]
    fn test_pair_refresh_outlives_access() {
        let config = get_test_jwt_config();
        let pair = issue_token_pair(Uuid::new_v4(), UserRole::Admin, &config).unwrap();

        let access = verify_access_token(&pair.access_token, &config).unwrap();
        let refresh = verify_refresh_token(&pair.refresh_token, &config).unwrap();

        assert_eq!(access.sub, refresh.sub);
        assert!(refresh.exp > access.exp);
    }

    #[test]
    fn test_refresh_tokens_are_unique() {
        let config = get_test_jwt_config();
        let user_id = Uuid::new_v4();

        let first = create_refresh_token(user_id, &config).unwrap();
        let second = create_refresh_token(user_id, &config).unwrap();
        assert_ne!(first, second);
    }
}
