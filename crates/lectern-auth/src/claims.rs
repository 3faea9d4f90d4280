//! JWT claim structures for authentication tokens.
//!
//! - [`AccessClaims`]: short-lived access token carrying the user id and role
//! - [`RefreshClaims`]: long-lived refresh token carrying only the user id

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use lectern_models::UserRole;

/// JWT claims for access tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AccessClaims {
    /// User ID (subject claim)
    pub sub: String,
    /// Role at the time the token was issued
    pub role: UserRole,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
}

/// JWT claims for refresh tokens.
///
/// `jti` keeps two tokens issued to the same user in the same second
/// distinct, so each entry in the user's refresh token list is unique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RefreshClaims {
    /// User ID (subject claim)
    pub sub: String,
    /// Token expiration timestamp (Unix timestamp)
    pub exp: usize,
    /// Token issued-at timestamp (Unix timestamp)
    pub iat: usize,
    /// Unique token identifier
    pub jti: String,
}
