mod common;

use common::rss_feed;
use market_briefing::{BriefingPipeline, HeadlineFetcher, MockLlmClient};
use std::sync::Arc;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const STAGE_REPLIES: [&str; 4] = [
    "Top story: Sensex climbs on strong earnings.",
    "1. Sensex climbed 2% on earnings.\n2. Rupee steady against the dollar.\n3. Oil prices eased.\n4. IT stocks led the gains.",
    "Sensex +2%, 4 of 5 sectors positive, sentiment 3:1 bullish.",
    "Markets opened strong this morning.\nSensex gained 2% on earnings beats.\nIT led, energy lagged.\nRupee held steady.\nOil eased, helping importers.\nSentiment remains bullish.\nWatch global cues into the afternoon.",
];

async fn mount_feed(server: &MockServer, body: String) {
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .mount(server)
        .await;
}

fn pipeline_with(server: &MockServer, llm: Arc<MockLlmClient>) -> BriefingPipeline {
    let fetcher =
        HeadlineFetcher::new(&format!("{}/feed", server.uri())).expect("valid feed url");
    BriefingPipeline::new(llm, fetcher)
}

#[tokio::test]
async fn runs_four_stages_in_sequence() {
    let server = MockServer::start().await;
    mount_feed(&server, rss_feed(&["Sensex climbs 2%", "Rupee steady"])).await;

    let llm = Arc::new(MockLlmClient::scripted(STAGE_REPLIES));
    let pipeline = pipeline_with(&server, llm.clone());

    let briefing = pipeline.run().await.expect("pipeline should complete");
    assert_eq!(briefing.text, STAGE_REPLIES[3]);

    let calls = llm.calls();
    assert_eq!(calls.len(), 4, "one model call per stage");

    // Each stage consumes the previous stage's output as context.
    assert!(calls[0].1.contains("Sensex climbs 2%"));
    assert!(calls[1].1.contains(STAGE_REPLIES[0]));
    assert!(calls[2].1.contains("Rupee steady against the dollar"));
    assert!(calls[3].1.contains(STAGE_REPLIES[2]));

    // Stage personas arrive as system instructions, in chain order.
    assert!(calls[0].0.contains("Market Researcher"));
    assert!(calls[1].0.contains("Data Analyst"));
    assert!(calls[2].0.contains("Statistician"));
    assert!(calls[3].0.contains("Report Writer"));
}

#[tokio::test]
async fn empty_feed_still_produces_briefing() {
    let server = MockServer::start().await;
    mount_feed(&server, rss_feed(&[])).await;

    let llm = Arc::new(MockLlmClient::scripted(STAGE_REPLIES));
    let pipeline = pipeline_with(&server, llm.clone());

    let briefing = pipeline.run().await.expect("empty feed must not abort the chain");
    assert!(!briefing.text.is_empty());

    let calls = llm.calls();
    assert!(calls[0].1.contains("No headlines were available"));
}

#[tokio::test]
async fn fetch_failure_is_absorbed_as_stage_context() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/feed"))
        .respond_with(ResponseTemplate::new(502))
        .mount(&server)
        .await;

    let llm = Arc::new(MockLlmClient::scripted(STAGE_REPLIES));
    let pipeline = pipeline_with(&server, llm.clone());

    let briefing = pipeline.run().await.expect("fetch failure must not abort the chain");
    assert!(!briefing.text.is_empty());

    let calls = llm.calls();
    assert!(calls[0].1.contains("Headline fetch failed"));
}

#[tokio::test]
async fn stage_failure_propagates_without_partial_result() {
    let server = MockServer::start().await;
    mount_feed(&server, rss_feed(&["Sensex climbs 2%"])).await;

    // Only two replies scripted: the numeric stage dies.
    let llm = Arc::new(MockLlmClient::scripted([STAGE_REPLIES[0], STAGE_REPLIES[1]]));
    let pipeline = pipeline_with(&server, llm.clone());

    let result = pipeline.run().await;
    assert!(result.is_err());
    assert_eq!(llm.calls().len(), 3, "chain stops at the failing stage");
}

#[tokio::test]
async fn empty_insight_reply_fails_structurally() {
    let server = MockServer::start().await;
    mount_feed(&server, rss_feed(&["Sensex climbs 2%"])).await;

    // The insight stage replies with markers only, which split to nothing.
    let llm = Arc::new(MockLlmClient::scripted([STAGE_REPLIES[0], "***\n---"]));
    let pipeline = pipeline_with(&server, llm.clone());

    let result = pipeline.run().await;
    assert!(result.is_err());
}
