use crate::types::{BriefingError, FetchOutcome, Headline, Result};
use feed_rs::parser;
use reqwest::Client;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

/// Business-section feed of Google News, region and language pinned to the
/// Indian edition.
pub const DEFAULT_FEED_URL: &str =
    "https://news.google.com/rss/headlines/section/topic/BUSINESS?hl=en-IN&gl=IN&ceid=IN:en";

/// Only the first entries of the feed are considered, in source order.
pub const MAX_HEADLINES: usize = 10;

const USER_AGENT: &str = "market-briefing/0.1";
const TIMEOUT_SECONDS: u64 = 30;

pub struct HeadlineFetcher {
    client: Client,
    feed_url: String,
}

impl HeadlineFetcher {
    pub fn new(feed_url: &str) -> Result<Self> {
        let parsed = Url::parse(feed_url)?;
        debug!(host = parsed.host_str(), "Configuring headline fetcher");

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(Duration::from_secs(TIMEOUT_SECONDS))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()
            .expect("Failed to create HTTP client");

        Ok(Self {
            client,
            feed_url: feed_url.to_string(),
        })
    }

    /// Fetch the current headlines. Faults are returned as a sentinel
    /// outcome, never as an error: the caller proceeds either way and the
    /// research stage absorbs the failure message as ordinary text.
    pub async fn fetch_headlines(&self) -> FetchOutcome {
        match self.try_fetch().await {
            Ok(headlines) => {
                info!(count = headlines.len(), "Fetched headlines from feed");
                FetchOutcome::Headlines(headlines)
            }
            Err(e) => {
                warn!(error = %e, url = %self.feed_url, "Headline fetch failed");
                FetchOutcome::Failed {
                    message: e.to_string(),
                }
            }
        }
    }

    async fn try_fetch(&self) -> Result<Vec<Headline>> {
        let response = self
            .client
            .get(&self.feed_url)
            .send()
            .await?
            .error_for_status()?;

        let content = response.text().await?;
        let feed = parser::parse(content.as_bytes())
            .map_err(|e| BriefingError::Parse(format!("Failed to parse feed: {}", e)))?;

        let headlines = feed
            .entries
            .into_iter()
            .take(MAX_HEADLINES)
            .filter_map(|entry| {
                let link = entry.links.first()?.href.clone();
                let title = entry
                    .title
                    .map(|t| t.content)
                    .unwrap_or_else(|| "Untitled".to_string());

                Some(Headline {
                    title,
                    link,
                    published: entry.published,
                })
            })
            .collect();

        Ok(headlines)
    }
}
