use async_trait::async_trait;
use lettre::message::{SinglePart, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;
use tracing::instrument;

use lectern_config::EmailConfig;

/// A rendered message ready to hand to a [`Mailer`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingEmail {
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

#[derive(Debug, Error)]
pub enum MailError {
    #[error("invalid address: {0}")]
    Address(String),
    #[error("failed to build email: {0}")]
    Build(String),
    #[error("SMTP relay error: {0}")]
    Transport(String),
    #[error("mail task failed: {0}")]
    Task(String),
}

/// Delivers a message to an external relay.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError>;

    fn name(&self) -> &str;
}

/// SMTP relay via lettre. Without credentials it talks plain SMTP to
/// `smtp_host:smtp_port`, which is what local catch-all servers expect.
pub struct SmtpMailer {
    config: EmailConfig,
}

impl SmtpMailer {
    pub fn new(config: EmailConfig) -> Self {
        Self { config }
    }

    fn transport(&self) -> Result<SmtpTransport, MailError> {
        if self.config.smtp_username.is_empty() {
            return Ok(SmtpTransport::builder_dangerous(&self.config.smtp_host)
                .port(self.config.smtp_port)
                .build());
        }

        let creds = Credentials::new(
            self.config.smtp_username.clone(),
            self.config.smtp_password.clone(),
        );

        Ok(SmtpTransport::relay(&self.config.smtp_host)
            .map_err(|e| MailError::Transport(e.to_string()))?
            .port(self.config.smtp_port)
            .credentials(creds)
            .build())
    }
}

#[async_trait]
impl Mailer for SmtpMailer {
    #[instrument(skip(self, email), fields(to = %email.to, subject = %email.subject))]
    async fn send(&self, email: &OutgoingEmail) -> Result<(), MailError> {
        let from = format!("{} <{}>", self.config.from_name, self.config.from_email);

        let message = Message::builder()
            .from(from.parse().map_err(|e| MailError::Address(format!("{}", e)))?)
            .to(email
                .to
                .parse()
                .map_err(|e| MailError::Address(format!("{}", e)))?)
            .subject(email.subject.as_str())
            .singlepart(
                SinglePart::builder()
                    .header(header::ContentType::TEXT_HTML)
                    .body(email.html_body.clone()),
            )
            .map_err(|e| MailError::Build(e.to_string()))?;

        let transport = self.transport()?;

        tokio::task::spawn_blocking(move || transport.send(&message))
            .await
            .map_err(|e| MailError::Task(e.to_string()))?
            .map_err(|e| MailError::Transport(e.to_string()))?;

        Ok(())
    }

    fn name(&self) -> &str {
        "smtp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> EmailConfig {
        EmailConfig {
            smtp_host: "localhost".to_string(),
            smtp_port: 1025,
            smtp_username: String::new(),
            smtp_password: String::new(),
            from_email: "noreply@lectern.dev".to_string(),
            from_name: "Lectern".to_string(),
            max_attempts: 3,
            retry_backoff: std::time::Duration::from_millis(500),
        }
    }

    #[tokio::test]
    async fn test_invalid_recipient_is_rejected_before_connecting() {
        let mailer = SmtpMailer::new(config());
        let email = OutgoingEmail {
            to: "not an address".to_string(),
            subject: "Hello".to_string(),
            html_body: "<p>hi</p>".to_string(),
        };

        let err = mailer.send(&email).await.unwrap_err();
        assert!(matches!(err, MailError::Address(_)));
    }

    #[test]
    fn test_transport_builds_with_credentials() {
        let mut config = config();
        config.smtp_host = "smtp.example.com".to_string();
        config.smtp_username = "user".to_string();
        config.smtp_password = "pass".to_string();

        assert!(SmtpMailer::new(config).transport().is_ok());
    }
}
