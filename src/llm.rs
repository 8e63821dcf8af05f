use crate::types::{BriefingError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Mutex;
use tracing::debug;

/// Gemini API endpoint.
pub const GEMINI_API_URL: &str = "https://generativelanguage.googleapis.com";

/// Default model for the summarization chain.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Sampling temperature used for every stage.
pub const DEFAULT_TEMPERATURE: f64 = 0.3;

/// Trait for language-model clients driving the pipeline stages.
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Get the name of this client, for logging.
    fn client_name(&self) -> String;

    /// Run a single completion with a system instruction and user prompt.
    async fn complete(&self, system: &str, prompt: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct GeminiPart {
    text: String,
}

#[derive(Debug, Serialize)]
struct GeminiContent {
    role: String,
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiSystemInstruction {
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Serialize)]
struct GeminiGenerationConfig {
    temperature: f64,
}

#[derive(Debug, Serialize)]
struct GeminiRequest {
    contents: Vec<GeminiContent>,
    #[serde(rename = "systemInstruction")]
    system_instruction: GeminiSystemInstruction,
    #[serde(rename = "generationConfig")]
    generation_config: GeminiGenerationConfig,
}

#[derive(Debug, Deserialize)]
struct GeminiResponsePart {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GeminiResponseContent {
    #[serde(default)]
    parts: Vec<GeminiResponsePart>,
}

#[derive(Debug, Deserialize)]
struct GeminiCandidate {
    content: GeminiResponseContent,
}

#[derive(Debug, Deserialize)]
struct GeminiResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
}

#[derive(Debug, Deserialize)]
struct GeminiApiError {
    message: String,
    #[serde(default)]
    status: String,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorResponse {
    error: GeminiApiError,
}

/// Gemini REST client.
pub struct GeminiClient {
    client: reqwest::Client,
    api_key: String,
    model: String,
    base_url: String,
    temperature: f64,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: GEMINI_API_URL.to_string(),
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Set a custom base URL.
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    fn client_name(&self) -> String {
        format!("gemini ({})", self.model)
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );

        let request = GeminiRequest {
            contents: vec![GeminiContent {
                role: "user".to_string(),
                parts: vec![GeminiPart {
                    text: prompt.to_string(),
                }],
            }],
            system_instruction: GeminiSystemInstruction {
                parts: vec![GeminiPart {
                    text: system.to_string(),
                }],
            },
            generation_config: GeminiGenerationConfig {
                temperature: self.temperature,
            },
        };

        debug!(model = %self.model, prompt_bytes = prompt.len(), "Sending Gemini request");

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            if let Ok(error_response) = serde_json::from_str::<GeminiErrorResponse>(&body) {
                return Err(BriefingError::Model(format!(
                    "Gemini API error: {} - {}",
                    error_response.error.status, error_response.error.message
                )));
            }
            return Err(BriefingError::Model(format!(
                "Gemini API error ({}): {}",
                status, body
            )));
        }

        let api_response: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| BriefingError::Model(format!("Failed to parse Gemini response: {}", e)))?;

        let text = api_response
            .candidates
            .first()
            .map(|candidate| {
                candidate
                    .content
                    .parts
                    .iter()
                    .map(|part| part.text.as_str())
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default();

        if text.is_empty() {
            return Err(BriefingError::Model(
                "Gemini response contained no candidates".to_string(),
            ));
        }

        Ok(text)
    }
}

/// Mock LLM client for development and testing. Replies with a scripted
/// response queue and records every call for assertions.
pub struct MockLlmClient {
    responses: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<(String, String)>>,
}

impl MockLlmClient {
    pub fn scripted<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            responses: Mutex::new(responses.into_iter().map(Into::into).collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Every (system, prompt) pair this client has served, in call order.
    pub fn calls(&self) -> Vec<(String, String)> {
        self.calls.lock().expect("calls lock poisoned").clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    fn client_name(&self) -> String {
        "mock".to_string()
    }

    async fn complete(&self, system: &str, prompt: &str) -> Result<String> {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .push((system.to_string(), prompt.to_string()));

        self.responses
            .lock()
            .expect("responses lock poisoned")
            .pop_front()
            .ok_or_else(|| BriefingError::Model("mock ran out of scripted responses".to_string()))
    }
}
