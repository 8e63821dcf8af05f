use crate::types::{DeliveryReport, Result};
use async_trait::async_trait;
use lettre::message::{header::ContentType, Mailbox};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use std::sync::Arc;
use tracing::{error, info};

/// SMTP connection settings for the outbound briefing mail.
#[derive(Debug, Clone)]
pub struct MailConfig {
    pub smtp_host: String,
    pub smtp_port: u16,
    pub sender: String,
    pub password: String,
    pub subject: String,
}

/// Trait for delivering a built message. The production implementation
/// opens one SMTP session per delivery; tests substitute a recorder.
#[async_trait]
pub trait MailTransport: Send + Sync {
    async fn deliver(&self, message: Message) -> Result<()>;
}

/// SMTP delivery: a fresh STARTTLS session per message, closed after the
/// send. No connection reuse across recipients.
pub struct SmtpMailer {
    config: MailConfig,
}

impl SmtpMailer {
    pub fn new(config: MailConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl MailTransport for SmtpMailer {
    async fn deliver(&self, message: Message) -> Result<()> {
        let creds = Credentials::new(self.config.sender.clone(), self.config.password.clone());

        let mailer: AsyncSmtpTransport<Tokio1Executor> =
            AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&self.config.smtp_host)?
                .port(self.config.smtp_port)
                .credentials(creds)
                .build();

        mailer.send(message).await?;
        Ok(())
    }
}

/// Sends the cleaned briefing to every subscriber, one delivery attempt per
/// recipient. Failures are isolated: a failing recipient is recorded in the
/// report and the loop continues.
pub struct Notifier {
    transport: Arc<dyn MailTransport>,
    sender: String,
    subject: String,
}

impl Notifier {
    pub fn new(transport: Arc<dyn MailTransport>, sender: String, subject: String) -> Self {
        Self {
            transport,
            sender,
            subject,
        }
    }

    pub async fn notify_all(&self, briefing: &str, recipients: &[String]) -> DeliveryReport {
        let mut report = DeliveryReport::default();

        for recipient in recipients {
            match self.send_one(briefing, recipient).await {
                Ok(()) => {
                    info!(recipient, "Briefing delivered");
                    report.sent.push(recipient.clone());
                }
                Err(e) => {
                    error!(recipient, error = %e, "Briefing delivery failed");
                    report.failed.push((recipient.clone(), e.to_string()));
                }
            }
        }

        info!(
            sent = report.sent.len(),
            failed = report.failed.len(),
            "Notification run complete"
        );
        report
    }

    async fn send_one(&self, briefing: &str, recipient: &str) -> Result<()> {
        let from: Mailbox = self.sender.parse()?;
        let to: Mailbox = recipient.parse()?;

        let message = Message::builder()
            .from(from)
            .to(to)
            .subject(self.subject.clone())
            .header(ContentType::TEXT_PLAIN)
            .body(briefing.to_string())?;

        self.transport.deliver(message).await
    }
}
