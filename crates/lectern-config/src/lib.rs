//! # Lectern Config
//!
//! Configuration types loaded from environment variables:
//!
//! - [`jwt`]: access/refresh token secrets and lifetimes
//! - [`email`]: SMTP relay settings and dispatch retry policy
//! - [`cors`]: allowed browser origins
//!
//! Every `from_env()` falls back to development defaults, so only
//! `DATABASE_URL` is strictly required to boot the server.

pub mod cors;
pub mod email;
pub mod jwt;

pub use cors::CorsConfig;
pub use email::EmailConfig;
pub use jwt::JwtConfig;
