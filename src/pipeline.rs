use crate::fetcher::HeadlineFetcher;
use crate::llm::LlmClient;
use crate::types::{
    Briefing, BriefingError, FetchOutcome, InsightSet, NumericSnapshot, ResearchNotes, Result,
};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

/// Role, goal, and persona of one pipeline stage, handed to the model as its
/// system instruction.
#[derive(Debug, Clone, Copy)]
pub struct StageSpec {
    pub role: &'static str,
    pub goal: &'static str,
    pub persona: &'static str,
}

impl StageSpec {
    fn system_prompt(&self) -> String {
        format!("You are a {}. {} Your goal: {}", self.role, self.persona, self.goal)
    }
}

pub const RESEARCH_STAGE: StageSpec = StageSpec {
    role: "Market Researcher",
    goal: "Fetch only the most relevant and high-impact market and finance headlines.",
    persona: "A financial news scout that tracks only the most impactful updates shaping Indian and global markets.",
};

pub const INSIGHT_STAGE: StageSpec = StageSpec {
    role: "Data Analyst",
    goal: "Summarize market news into 4-5 insights with global and Indian perspective.",
    persona: "A sharp market analyst who converts raw headlines into clear, decision-ready takeaways.",
};

pub const NUMERIC_STAGE: StageSpec = StageSpec {
    role: "Statistician",
    goal: "Extract useful numbers: % moves, counts, and sentiment balance in one short block.",
    persona: "Keeps things numerical and precise for decision-making.",
};

pub const WRITING_STAGE: StageSpec = StageSpec {
    role: "Report Writer",
    goal: "Deliver a 7-10 line, high-impact morning market briefing that is concise, clear, and actionable.",
    persona: "Writes daily executive market briefs that leaders can read in under a minute.",
};

/// The fixed four-stage summarization chain. Strictly sequential: each
/// stage's full text output becomes part of the next stage's input context.
/// Only the research stage has access to the headline fetcher.
pub struct BriefingPipeline {
    llm: Arc<dyn LlmClient>,
    fetcher: HeadlineFetcher,
}

impl BriefingPipeline {
    pub fn new(llm: Arc<dyn LlmClient>, fetcher: HeadlineFetcher) -> Self {
        Self { llm, fetcher }
    }

    /// Run the full chain. Any stage failure propagates with no partial
    /// result; a headline-fetch failure does not (it arrives as a sentinel
    /// and is absorbed as stage-1 context).
    pub async fn run(&self) -> Result<Briefing> {
        let run_id = Uuid::new_v4();
        info!(%run_id, client = %self.llm.client_name(), "Starting briefing pipeline");

        let outcome = self.fetcher.fetch_headlines().await;
        debug!(%run_id, headlines = outcome.headline_count(), "Headline fetch complete");

        let notes = self.research(&outcome).await?;
        let insights = self.extract_insights(&notes).await?;
        let snapshot = self.extract_numbers(&insights).await?;
        let briefing = self.write_briefing(&insights, &snapshot).await?;

        info!(%run_id, lines = briefing.text.lines().count(), "Briefing pipeline finished");
        Ok(briefing)
    }

    async fn research(&self, outcome: &FetchOutcome) -> Result<ResearchNotes> {
        let prompt = format!(
            "Scrape top finance and market news from India.\n\nFetched headlines:\n{}",
            outcome.as_context_text()
        );
        let text = self.call_stage(&RESEARCH_STAGE, &prompt).await?;
        Ok(ResearchNotes { text })
    }

    async fn extract_insights(&self, notes: &ResearchNotes) -> Result<InsightSet> {
        let prompt = format!(
            "Summarize into 4-5 key insights.\n\nResearch notes:\n{}",
            notes.text
        );
        let raw = self.call_stage(&INSIGHT_STAGE, &prompt).await?;

        let set = InsightSet::from_raw(raw);
        if set.insights.is_empty() {
            return Err(BriefingError::Model(
                "insight stage produced no usable insights".to_string(),
            ));
        }
        Ok(set)
    }

    async fn extract_numbers(&self, insights: &InsightSet) -> Result<NumericSnapshot> {
        let prompt = format!(
            "Give short numeric snapshot.\n\nKey insights:\n{}",
            insights.raw
        );
        let text = self.call_stage(&NUMERIC_STAGE, &prompt).await?;
        Ok(NumericSnapshot { text })
    }

    async fn write_briefing(
        &self,
        insights: &InsightSet,
        snapshot: &NumericSnapshot,
    ) -> Result<Briefing> {
        let prompt = format!(
            "Write final 7-10 line briefing.\n\nKey insights:\n{}\n\nNumeric snapshot:\n{}",
            insights.raw, snapshot.text
        );
        let text = self.call_stage(&WRITING_STAGE, &prompt).await?;
        Ok(Briefing { text })
    }

    async fn call_stage(&self, spec: &StageSpec, prompt: &str) -> Result<String> {
        debug!(stage = spec.role, "Running pipeline stage");

        let reply = self.llm.complete(&spec.system_prompt(), prompt).await?;
        let trimmed = reply.trim();
        if trimmed.is_empty() {
            return Err(BriefingError::Model(format!(
                "{} stage returned empty output",
                spec.role
            )));
        }
        Ok(trimmed.to_string())
    }
}
