use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

use super::controller::{
    get_transactions, send_email, send_email_portuguese, send_email_spanish,
};

pub fn init_notifications_router() -> Router<AppState> {
    Router::new()
        .route("/send-email", post(send_email))
        .route("/send-email-bitso-spanish", post(send_email_spanish))
        .route("/send-email-bitso-portugusse", post(send_email_portuguese))
        .route("/transactions", get(get_transactions))
}
