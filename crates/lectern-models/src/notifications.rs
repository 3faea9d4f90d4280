//! Transactional email notification models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "notification_status")]
pub enum NotificationStatus {
    Pending,
    Sent,
    Failed,
}

/// One outbound email attempt as recorded in the `notifications` table.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: Uuid,
    pub wallet: String,
    /// Formatted as `"<amount> <coin>"`
    #[schema(example = "0.5 BTC")]
    pub amount: String,
    pub email: String,
    #[serde(rename = "date")]
    pub sent_date: String,
    #[serde(rename = "time")]
    pub sent_time: String,
    pub status: NotificationStatus,
    pub attempts: i32,
    pub last_error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of the `send-email` endpoints.
///
/// Field names follow the public form the emails are triggered from, so a
/// few of them are snake_case on the wire.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct SendEmailRequest {
    #[validate(length(min = 1, message = "wallet is required"))]
    #[schema(example = "Binance")]
    pub wallet: String,
    #[validate(length(min = 1, message = "amount is required"))]
    #[schema(example = "0.5")]
    pub amount: String,
    #[validate(email(message = "A valid email is required"))]
    pub email: String,
    #[serde(default)]
    #[schema(example = "BTC")]
    pub coin: String,
    pub network: Option<String>,
    #[serde(rename = "walletAddress", alias = "wallet_address")]
    pub wallet_address: Option<String>,
    pub message: Option<String>,
    pub warning: Option<String>,
    pub localcurrency: Option<String>,
    pub cashapp_tag: Option<String>,
    pub transaction_fee: Option<String>,
    pub transaction_id: Option<String>,
    pub recipient_name: Option<String>,
    #[serde(rename = "senderName", alias = "sender_name")]
    pub sender_name: Option<String>,
}

impl SendEmailRequest {
    /// `"<amount> <coin>"`, without a trailing space when no coin is given.
    pub fn formatted_amount(&self) -> String {
        format!("{} {}", self.amount.trim(), self.coin.trim())
            .trim()
            .to_string()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SendEmailResponse {
    pub message: String,
    pub notification: Notification,
}
