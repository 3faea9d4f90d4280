use std::sync::Arc;

use lectern_config::{CorsConfig, EmailConfig, JwtConfig};
use lectern_db::PgPool;

use crate::modules::notifications::templates::TemplateRegistry;
use crate::utils::email::{Mailer, SmtpMailer};

/// Shared per-request state. Everything in it is cheap to clone.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub jwt_config: JwtConfig,
    pub email_config: EmailConfig,
    pub cors_config: CorsConfig,
    pub templates: Arc<TemplateRegistry>,
    pub mailer: Arc<dyn Mailer>,
}

/// Builds the state from the environment: connects the pool, applies
/// migrations, compiles the email templates and sets up the SMTP mailer.
pub async fn init_app_state() -> anyhow::Result<AppState> {
    let db = lectern_db::init_db_pool().await?;
    lectern_db::run_migrations(&db).await?;

    let email_config = EmailConfig::from_env();
    let mailer: Arc<dyn Mailer> = Arc::new(SmtpMailer::new(email_config.clone()));

    Ok(AppState {
        db,
        jwt_config: JwtConfig::from_env(),
        email_config,
        cors_config: CorsConfig::from_env(),
        templates: Arc::new(TemplateRegistry::new()?),
        mailer,
    })
}
