use axum::{Router, routing::post};

use crate::state::AppState;

use super::controller::{login_user, refresh_token, register_user};

pub fn init_auth_router() -> Router<AppState> {
    // TODO: add POST /logout that removes the presented refresh token from
    // the caller's refresh_tokens list.
    Router::new()
        .route("/register", post(register_user))
        .route("/login", post(login_user))
        .route("/refresh", post(refresh_token))
}
