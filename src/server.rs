use crate::cleaner::clean_markdown;
use crate::mailer::Notifier;
use crate::pipeline::BriefingPipeline;
use crate::store::SubscriberStore;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, Json, Redirect},
    routing::{get, post},
    Form, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{error, info};

/// Shared application state, injected into every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: SubscriberStore,
    pub pipeline: Arc<BriefingPipeline>,
    pub notifier: Arc<Notifier>,
}

/// Build the HTTP router for the briefing service.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(home))
        .route("/subscribe", post(subscribe))
        .route("/send-daily", get(send_daily))
        .with_state(state)
}

const SUBSCRIBE_PAGE: &str = r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>Daily Market Briefing</title>
</head>
<body>
  <h1>Daily Market Briefing</h1>
  <p>A concise morning market briefing, delivered to your inbox.</p>
  <form action="/subscribe" method="post">
    <input type="email" name="email" placeholder="you@example.com" required>
    <button type="submit">Subscribe</button>
  </form>
</body>
</html>
"#;

async fn home() -> Html<&'static str> {
    Html(SUBSCRIBE_PAGE)
}

#[derive(Debug, Deserialize)]
struct SubscribeForm {
    email: String,
}

/// Store the submitted address and redirect back to the form. Duplicates
/// are absorbed by the store; the response is the same 303 either way.
async fn subscribe(
    State(state): State<AppState>,
    Form(form): Form<SubscribeForm>,
) -> Result<Redirect, StatusCode> {
    if let Err(e) = state.store.add(&form.email).await {
        error!(error = %e, "Failed to store subscriber");
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    Ok(Redirect::to("/"))
}

/// Run the full chain synchronously within the request: pipeline, cleaner,
/// subscriber listing, and the per-recipient mail loop. A stage failure
/// surfaces as a generic 500 with no partial-success detail.
async fn send_daily(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    info!("Daily briefing triggered");

    let briefing = state.pipeline.run().await.map_err(|e| {
        error!(error = %e, "Briefing pipeline failed");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let cleaned = clean_markdown(&briefing.text);

    let recipients = state.store.list_all().await.map_err(|e| {
        error!(error = %e, "Failed to list subscribers");
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let report = state.notifier.notify_all(&cleaned, &recipients).await;

    Ok(Json(json!({ "status": report.status_line() })))
}
