//! Middleware and extractors for authentication and authorization.
//!
//! - [`auth`]: bearer token + claimed email authentication ([`auth::AuthUser`], [`auth::require_auth`])
//! - [`role`]: role checks ([`role::RequireAdmin`])
//!
//! # Example
//!
//! ```ignore
//! use crate::middleware::auth::AuthUser;
//! use crate::middleware::role::RequireAdmin;
//!
//! // Any authenticated user
//! async fn me(AuthUser(user): AuthUser) -> impl IntoResponse { ... }
//!
//! // Admins only
//! async fn create_course(RequireAdmin(admin): RequireAdmin) -> impl IntoResponse { ... }
//! ```

pub mod auth;
pub mod role;
