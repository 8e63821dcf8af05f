pub mod cleaner;
pub mod config;
pub mod fetcher;
pub mod llm;
pub mod mailer;
pub mod pipeline;
pub mod server;
pub mod store;
pub mod types;

pub use cleaner::clean_markdown;
pub use config::AppConfig;
pub use fetcher::HeadlineFetcher;
pub use llm::{GeminiClient, LlmClient, MockLlmClient};
pub use mailer::{MailConfig, MailTransport, Notifier, SmtpMailer};
pub use pipeline::BriefingPipeline;
pub use server::{build_router, AppState};
pub use store::SubscriberStore;
pub use types::*;
