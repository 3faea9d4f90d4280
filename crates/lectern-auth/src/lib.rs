//! # Lectern Auth
//!
//! JWT claims and token utilities for the Lectern API.
//!
//! - [`claims`]: access and refresh claim structures
//! - [`jwt`]: token issuing and verification
//!
//! Access tokens carry the user id and role; refresh tokens carry only the
//! user id. The two are signed with different secrets.

pub mod claims;
pub mod jwt;

pub use claims::{AccessClaims, RefreshClaims};
pub use jwt::{
    TokenError, TokenPair, create_access_token, create_refresh_token, issue_token_pair,
    verify_access_token, verify_refresh_token,
};
