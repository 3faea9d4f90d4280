//! Authentication request/response bodies.
//!
//! Re-exports from `lectern-models` so handlers and docs share one definition.

pub use lectern_models::users::{
    AccessTokenResponse, AuthResponse, LoginRequest, PublicUser, RefreshTokenRequest,
    RegisterRequest,
};
