#![allow(dead_code)]

use async_trait::async_trait;
use lettre::Message;
use market_briefing::mailer::MailTransport;
use market_briefing::types::{BriefingError, Result};
use std::sync::Mutex;

/// Mail transport that records every delivery instead of sending it.
#[derive(Default)]
pub struct RecordingTransport {
    sent: Mutex<Vec<(String, String)>>,
}

impl RecordingTransport {
    /// Recorded (recipient, raw message) pairs, in delivery order.
    pub fn deliveries(&self) -> Vec<(String, String)> {
        self.sent.lock().expect("deliveries lock poisoned").clone()
    }
}

#[async_trait]
impl MailTransport for RecordingTransport {
    async fn deliver(&self, message: Message) -> Result<()> {
        let to = message
            .envelope()
            .to()
            .first()
            .map(ToString::to_string)
            .unwrap_or_default();
        let raw = String::from_utf8_lossy(&message.formatted()).to_string();

        self.sent
            .lock()
            .expect("deliveries lock poisoned")
            .push((to, raw));
        Ok(())
    }
}

/// Transport that fails for one specific recipient and records the rest.
#[derive(Default)]
pub struct FailingTransport {
    pub fail_for: String,
    pub record: RecordingTransport,
}

impl FailingTransport {
    pub fn new(fail_for: &str) -> Self {
        Self {
            fail_for: fail_for.to_string(),
            record: RecordingTransport::default(),
        }
    }
}

#[async_trait]
impl MailTransport for FailingTransport {
    async fn deliver(&self, message: Message) -> Result<()> {
        let to = message
            .envelope()
            .to()
            .first()
            .map(ToString::to_string)
            .unwrap_or_default();

        if to == self.fail_for {
            return Err(BriefingError::General(format!(
                "simulated SMTP failure for {}",
                to
            )));
        }

        self.record.deliver(message).await
    }
}

/// Build an RSS document with the given item titles.
pub fn rss_feed(titles: &[&str]) -> String {
    let items: String = titles
        .iter()
        .enumerate()
        .map(|(i, title)| {
            format!(
                "<item><title>{}</title><link>https://example.com/{}</link>\
                 <pubDate>Mon, 04 Aug 2025 06:00:00 GMT</pubDate></item>",
                title, i
            )
        })
        .collect();

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
         <rss version=\"2.0\"><channel><title>Business News</title>{}</channel></rss>",
        items
    )
}
