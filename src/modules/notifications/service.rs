use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use lectern_core::{AppError, ErrorCode};
use lectern_observability::track_notification;

use crate::modules::notifications::model::{Notification, NotificationStatus, SendEmailRequest};
use crate::modules::notifications::templates::{Locale, TemplateRegistry, provider_key};
use crate::state::AppState;
use crate::utils::email::{MailError, Mailer, OutgoingEmail};

const NOTIFICATION_COLUMNS: &str = "id, wallet, amount, email, sent_date, sent_time, status, \
                                    attempts, last_error, created_at, updated_at";

/// Values available to every email template, on top of the request fields.
#[derive(Debug, Serialize)]
struct EmailContext<'a> {
    #[serde(flatten)]
    request: &'a SendEmailRequest,
    formatted_amount: String,
    timestamp: String,
    date: String,
    time: String,
    subject: String,
}

impl<'a> EmailContext<'a> {
    fn new(request: &'a SendEmailRequest, locale: Locale, at: DateTime<Utc>) -> Self {
        let chrono_locale = locale.chrono_locale();
        Self {
            request,
            formatted_amount: request.formatted_amount(),
            timestamp: at.format("%Y-%m-%d %H:%M:%S").to_string(),
            date: at
                .format_localized(locale.date_format(), chrono_locale)
                .to_string(),
            time: at
                .format_localized(locale.time_format(), chrono_locale)
                .to_string(),
            subject: locale.subject(request.wallet.trim()),
        }
    }
}

/// Outcome of dispatching one email, possibly over several attempts.
#[derive(Debug)]
pub struct DispatchOutcome {
    pub attempts: u32,
    pub result: Result<(), MailError>,
}

/// Sends `email`, retrying up to `max_attempts` times. Attempt `n` that
/// fails is followed by a pause of `n * backoff`.
pub async fn dispatch_with_retry(
    mailer: &dyn Mailer,
    email: &OutgoingEmail,
    max_attempts: u32,
    backoff: Duration,
) -> DispatchOutcome {
    let max_attempts = max_attempts.max(1);
    let mut attempt = 0;

    loop {
        attempt += 1;
        match mailer.send(email).await {
            Ok(()) => {
                return DispatchOutcome {
                    attempts: attempt,
                    result: Ok(()),
                };
            }
            Err(err) if attempt < max_attempts => {
                warn!(
                    attempt,
                    max_attempts,
                    mailer = mailer.name(),
                    error = %err,
                    "email dispatch failed, retrying"
                );
                tokio::time::sleep(backoff * attempt).await;
            }
            Err(err) => {
                return DispatchOutcome {
                    attempts: attempt,
                    result: Err(err),
                };
            }
        }
    }
}

pub struct NotificationService;

impl NotificationService {
    /// Renders, records and dispatches a provider email.
    ///
    /// Unknown providers are rejected before anything is written. Once the
    /// record exists its final status always reflects the dispatch outcome.
    #[instrument(skip(state, request), fields(wallet = %request.wallet, locale = %locale))]
    pub async fn send(
        state: &AppState,
        locale: Locale,
        request: SendEmailRequest,
    ) -> Result<Notification, AppError> {
        let templates: &TemplateRegistry = &state.templates;
        let template = templates.resolve(&request.wallet, locale).ok_or_else(|| {
            AppError::coded(
                ErrorCode::UnknownProvider,
                format!(
                    "No email template for provider '{}' in locale '{}'",
                    request.wallet.trim(),
                    locale
                ),
            )
        })?;

        let context = EmailContext::new(&request, locale, Utc::now());
        let html_body = templates.render(template, &context)?;

        let notification = Self::create_pending(
            &state.db,
            request.wallet.trim(),
            &context.formatted_amount,
            &request.email,
            &context.date,
            &context.time,
        )
        .await?;

        let email = OutgoingEmail {
            to: request.email.clone(),
            subject: context.subject.clone(),
            html_body,
        };

        let outcome = dispatch_with_retry(
            state.mailer.as_ref(),
            &email,
            state.email_config.max_attempts,
            state.email_config.retry_backoff,
        )
        .await;

        let provider = provider_key(&request.wallet);

        match outcome.result {
            Ok(()) => {
                track_notification(&provider, "sent");
                let sent = match Self::finish(
                    &state.db,
                    notification.id,
                    NotificationStatus::Sent,
                    outcome.attempts,
                    None,
                )
                .await
                {
                    Ok(sent) => sent,
                    Err(err) => {
                        // The email is out; only the record is stale.
                        error!(
                            notification_id = %notification.id,
                            attempts = outcome.attempts,
                            error = %err.error,
                            "email delivered but status update failed, record left Pending"
                        );
                        return Err(err);
                    }
                };
                info!(notification_id = %sent.id, attempts = outcome.attempts, "email sent");
                Ok(sent)
            }
            Err(err) => {
                let message = err.to_string();
                Self::finish(
                    &state.db,
                    notification.id,
                    NotificationStatus::Failed,
                    outcome.attempts,
                    Some(&message),
                )
                .await?;
                track_notification(&provider, "failed");
                Err(AppError::internal(anyhow::anyhow!(
                    "Failed to send email after {} attempts: {}",
                    outcome.attempts,
                    message
                )))
            }
        }
    }

    #[instrument(skip(db))]
    async fn create_pending(
        db: &PgPool,
        wallet: &str,
        amount: &str,
        email: &str,
        sent_date: &str,
        sent_time: &str,
    ) -> Result<Notification, AppError> {
        let notification = sqlx::query_as::<_, Notification>(&format!(
            "INSERT INTO notifications (wallet, amount, email, sent_date, sent_time, status)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {NOTIFICATION_COLUMNS}"
        ))
        .bind(wallet)
        .bind(amount)
        .bind(email)
        .bind(sent_date)
        .bind(sent_time)
        .bind(NotificationStatus::Pending)
        .fetch_one(db)
        .await?;

        Ok(notification)
    }

    #[instrument(skip(db))]
    async fn finish(
        db: &PgPool,
        id: Uuid,
        status: NotificationStatus,
        attempts: u32,
        last_error: Option<&str>,
    ) -> Result<Notification, AppError> {
        let notification = sqlx::query_as::<_, Notification>(&format!(
            "UPDATE notifications
             SET status = $2, attempts = $3, last_error = $4, updated_at = NOW()
             WHERE id = $1
             RETURNING {NOTIFICATION_COLUMNS}"
        ))
        .bind(id)
        .bind(status)
        .bind(attempts as i32)
        .bind(last_error)
        .fetch_one(db)
        .await?;

        Ok(notification)
    }

    #[instrument(skip(db))]
    pub async fn list(db: &PgPool) -> Result<Vec<Notification>, AppError> {
        let notifications = sqlx::query_as::<_, Notification>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications ORDER BY created_at DESC"
        ))
        .fetch_all(db)
        .await?;

        Ok(notifications)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::TimeZone;

    use super::*;

    struct FlakyMailer {
        failures_before_success: u32,
        calls: Mutex<u32>,
    }

    #[async_trait]
    impl Mailer for FlakyMailer {
        async fn send(&self, _email: &OutgoingEmail) -> Result<(), MailError> {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            if *calls <= self.failures_before_success {
                Err(MailError::Transport("connection refused".to_string()))
            } else {
                Ok(())
            }
        }

        fn name(&self) -> &str {
            "flaky"
        }
    }

    fn email() -> OutgoingEmail {
        OutgoingEmail {
            to: "a@b.com".to_string(),
            subject: "Transaction Confirmation - Binance".to_string(),
            html_body: "<p>hi</p>".to_string(),
        }
    }

    fn request() -> SendEmailRequest {
        serde_json::from_value(serde_json::json!({
            "wallet": " Binance ",
            "amount": "0.5",
            "coin": "BTC",
            "email": "a@b.com",
            "walletAddress": "0xabc",
        }))
        .unwrap()
    }

    #[tokio::test]
    async fn test_dispatch_succeeds_first_try() {
        let mailer = FlakyMailer {
            failures_before_success: 0,
            calls: Mutex::new(0),
        };
        let outcome = dispatch_with_retry(&mailer, &email(), 3, Duration::ZERO).await;
        assert!(outcome.result.is_ok());
        assert_eq!(outcome.attempts, 1);
    }

    #[tokio::test]
    async fn test_dispatch_retries_until_success() {
        let mailer = FlakyMailer {
            failures_before_success: 2,
            calls: Mutex::new(0),
        };
        let outcome = dispatch_with_retry(&mailer, &email(), 3, Duration::ZERO).await;
        assert!(outcome.result.is_ok());
        assert_eq!(outcome.attempts, 3);
    }

    #[tokio::test]
    async fn test_dispatch_gives_up_after_max_attempts() {
        let mailer = FlakyMailer {
            failures_before_success: u32::MAX,
            calls: Mutex::new(0),
        };
        let outcome = dispatch_with_retry(&mailer, &email(), 3, Duration::ZERO).await;
        assert!(outcome.result.is_err());
        assert_eq!(outcome.attempts, 3);
        assert_eq!(*mailer.calls.lock().unwrap(), 3);
    }

    #[tokio::test]
    async fn test_dispatch_zero_attempts_still_tries_once() {
        let mailer = FlakyMailer {
            failures_before_success: u32::MAX,
            calls: Mutex::new(0),
        };
        let outcome = dispatch_with_retry(&mailer, &email(), 0, Duration::ZERO).await;
        assert_eq!(outcome.attempts, 1);
    }

    #[test]
    fn test_email_context_fields() {
        let request = request();
        let at = Utc.with_ymd_and_hms(2025, 3, 9, 8, 5, 1).unwrap();
        let context = EmailContext::new(&request, Locale::English, at);

        assert_eq!(context.formatted_amount, "0.5 BTC");
        assert_eq!(context.timestamp, "2025-03-09 08:05:01");
        assert_eq!(context.date, "March 9, 2025");
        assert_eq!(context.subject, "Transaction Confirmation - Binance");

        let json = serde_json::to_value(&context).unwrap();
        assert_eq!(json["walletAddress"], "0xabc");
        assert_eq!(json["formatted_amount"], "0.5 BTC");
        assert_eq!(json["coin"], "BTC");
    }

    #[test]
    fn test_email_context_portuguese_subject() {
        let mut request = request();
        request.wallet = "Bitso".to_string();
        let context = EmailContext::new(&request, Locale::Portuguese, Utc::now());
        assert_eq!(context.subject, "Confirmação de Transação - Bitso");
    }
}
