use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A single headline pulled from the news feed. Transient: consumed by the
/// research stage and never persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Headline {
    pub title: String,
    pub link: String,
    pub published: Option<DateTime<Utc>>,
}

impl Headline {
    pub fn as_context_line(&self) -> String {
        match &self.published {
            Some(published) => format!("- {} ({}, {})", self.title, self.link, published.to_rfc2822()),
            None => format!("- {} ({})", self.title, self.link),
        }
    }
}

/// Outcome of a headline fetch. Failures are carried as data rather than
/// raised: the research stage absorbs them as ordinary context text.
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    Headlines(Vec<Headline>),
    Failed { message: String },
}

impl FetchOutcome {
    pub fn headline_count(&self) -> usize {
        match self {
            Self::Headlines(headlines) => headlines.len(),
            Self::Failed { .. } => 0,
        }
    }

    /// Render the outcome as input context for the research stage.
    pub fn as_context_text(&self) -> String {
        match self {
            Self::Headlines(headlines) if headlines.is_empty() => {
                "No headlines were available from the feed.".to_string()
            }
            Self::Headlines(headlines) => headlines
                .iter()
                .map(Headline::as_context_line)
                .collect::<Vec<_>>()
                .join("\n"),
            Self::Failed { message } => format!("Headline fetch failed: {}", message),
        }
    }
}

/// Output of the research stage: the researcher's free-text notes on the
/// fetched headlines.
#[derive(Debug, Clone)]
pub struct ResearchNotes {
    pub text: String,
}

/// Output of the insight stage. Generation stays free-text, but the raw
/// reply is split into discrete insight lines so an unusable reply fails
/// structurally instead of flowing downstream as prose.
#[derive(Debug, Clone)]
pub struct InsightSet {
    pub insights: Vec<String>,
    pub raw: String,
}

impl InsightSet {
    pub fn from_raw(raw: String) -> Self {
        let insights = raw
            .lines()
            .map(|line| {
                line.trim()
                    .trim_start_matches(|c: char| c.is_ascii_digit() || matches!(c, '-' | '*' | '.' | ')'))
                    .trim()
            })
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();

        Self { insights, raw }
    }
}

/// Output of the numeric stage: a short block of quantitative signals.
#[derive(Debug, Clone)]
pub struct NumericSnapshot {
    pub text: String,
}

/// The final briefing text produced by the writing stage.
#[derive(Debug, Clone)]
pub struct Briefing {
    pub text: String,
}

/// Per-recipient outcome of a notification run. A failed recipient never
/// stops the rest of the batch; both lists together cover every recipient.
#[derive(Debug, Clone, Default)]
pub struct DeliveryReport {
    pub sent: Vec<String>,
    pub failed: Vec<(String, String)>,
}

impl DeliveryReport {
    pub fn attempted(&self) -> usize {
        self.sent.len() + self.failed.len()
    }

    pub fn status_line(&self) -> String {
        if self.failed.is_empty() {
            format!("Daily market briefing sent to {} subscribers", self.sent.len())
        } else {
            format!(
                "Daily market briefing sent to {} subscribers ({} failed)",
                self.sent.len(),
                self.failed.len()
            )
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum BriefingError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Feed parse error: {0}")]
    Parse(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Model call failed: {0}")]
    Model(String),

    #[error("SMTP error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    #[error("Invalid mailbox: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Message build error: {0}")]
    MessageBuild(#[from] lettre::error::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("General error: {0}")]
    General(String),
}

pub type Result<T> = std::result::Result<T, BriefingError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insight_set_splits_numbered_lines() {
        let set = InsightSet::from_raw("1. Markets rallied.\n2. Oil slid.\n".to_string());
        assert_eq!(set.insights, vec!["Markets rallied.", "Oil slid."]);
    }

    #[test]
    fn insight_set_splits_bulleted_lines() {
        let set = InsightSet::from_raw("- First insight\n* Second insight\n\n".to_string());
        assert_eq!(set.insights.len(), 2);
        assert_eq!(set.insights[0], "First insight");
    }

    #[test]
    fn insight_set_drops_marker_only_lines() {
        let set = InsightSet::from_raw("---\n1. Real content\n***".to_string());
        assert_eq!(set.insights, vec!["Real content"]);
    }

    #[test]
    fn failed_outcome_renders_as_plain_text() {
        let outcome = FetchOutcome::Failed {
            message: "connection refused".to_string(),
        };
        assert!(outcome.as_context_text().contains("connection refused"));
        assert_eq!(outcome.headline_count(), 0);
    }

    #[test]
    fn empty_headline_list_renders_placeholder() {
        let outcome = FetchOutcome::Headlines(Vec::new());
        assert_eq!(outcome.as_context_text(), "No headlines were available from the feed.");
    }
}
