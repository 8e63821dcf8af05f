use clap::Parser;
use market_briefing::config::BRIEFING_SUBJECT;
use market_briefing::{
    build_router, fetcher, AppConfig, AppState, BriefingPipeline, GeminiClient, HeadlineFetcher,
    LlmClient, Notifier, SmtpMailer, SubscriberStore,
};
use std::sync::Arc;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "market-briefing", about = "Daily market briefing service")]
struct Cli {
    /// Address to bind the HTTP server to
    #[arg(long, default_value = "0.0.0.0:8000")]
    bind: String,

    /// Path to the subscriber database file
    #[arg(long, default_value = "subscribers.db")]
    db: String,

    /// RSS feed to pull headlines from
    #[arg(long, default_value = fetcher::DEFAULT_FEED_URL)]
    feed_url: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    info!("Starting market briefing service");

    let config = AppConfig::from_env()?;
    let store = SubscriberStore::open(&cli.db).await?;

    let llm: Arc<dyn LlmClient> = Arc::new(GeminiClient::new(
        config.gemini_api_key.clone(),
        config.gemini_model.clone(),
    ));
    let fetcher = HeadlineFetcher::new(&cli.feed_url)?;
    let pipeline = Arc::new(BriefingPipeline::new(llm, fetcher));

    let transport = Arc::new(SmtpMailer::new(config.mail_config()));
    let notifier = Arc::new(Notifier::new(
        transport,
        config.sender.clone(),
        BRIEFING_SUBJECT.to_string(),
    ));

    let state = AppState {
        store,
        pipeline,
        notifier,
    };

    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(&cli.bind).await?;
    info!(bind = %cli.bind, "Listening");
    axum::serve(listener, app).await?;

    Ok(())
}
