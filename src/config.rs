use crate::llm::DEFAULT_MODEL;
use crate::mailer::MailConfig;
use crate::types::{BriefingError, Result};
use std::env;

/// Default Gmail SMTP host.
pub const DEFAULT_SMTP_HOST: &str = "smtp.gmail.com";

/// Default Gmail SMTP port (STARTTLS).
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Subject line of the outbound briefing mail.
pub const BRIEFING_SUBJECT: &str = "Daily India Market Briefing";

/// Process configuration, loaded once at startup.
///
/// Required environment variables: `EMAIL_SENDER`, `EMAIL_PASSWORD`
/// (sender address and app password), `GEMINI_API_KEY`. Optional:
/// `SMTP_HOST`, `SMTP_PORT`, `GEMINI_MODEL`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub sender: String,
    pub password: String,
    pub smtp_host: String,
    pub smtp_port: u16,
    pub gemini_api_key: String,
    pub gemini_model: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self> {
        let sender = require_var("EMAIL_SENDER")?;
        let password = require_var("EMAIL_PASSWORD")?;
        let gemini_api_key = require_var("GEMINI_API_KEY")?;

        let smtp_host =
            env::var("SMTP_HOST").unwrap_or_else(|_| DEFAULT_SMTP_HOST.to_string());
        let smtp_port = env::var("SMTP_PORT")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_SMTP_PORT);
        let gemini_model =
            env::var("GEMINI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Ok(Self {
            sender,
            password,
            smtp_host,
            smtp_port,
            gemini_api_key,
            gemini_model,
        })
    }

    pub fn mail_config(&self) -> MailConfig {
        MailConfig {
            smtp_host: self.smtp_host.clone(),
            smtp_port: self.smtp_port,
            sender: self.sender.clone(),
            password: self.password.clone(),
            subject: BRIEFING_SUBJECT.to_string(),
        }
    }
}

fn require_var(name: &str) -> Result<String> {
    env::var(name)
        .map_err(|_| BriefingError::Config(format!("{} environment variable not set", name)))
}
