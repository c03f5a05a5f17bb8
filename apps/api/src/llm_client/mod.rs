//! LLM Client: the single point of entry for all Gemini API calls.
//!
//! ARCHITECTURAL RULE: No other module may call the Gemini API directly.
//! Generation code depends on the `TextGenerator` trait, never on `GeminiClient`.
//!
//! One attempt per call with a fixed timeout. Retry is a user-initiated new
//! generation, never automatic.
use std::fmt;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

pub mod models;

const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const API_KEY_HEADER: &str = "x-goog-api-key";

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("request timed out")]
    Timeout,

    /// Built through `transport_error`, which strips the request URL.
    #[error("HTTP error: {0}")]
    Http(reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("generation blocked: {0}")]
    Blocked(BlockReason),

    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Why the upstream refused to return text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "detail")]
pub enum BlockReason {
    Safety,
    Recitation,
    /// The prompt itself was rejected (`promptFeedback.blockReason`).
    Prompt(String),
}

impl fmt::Display for BlockReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BlockReason::Safety => write!(f, "safety filter"),
            BlockReason::Recitation => write!(f, "recitation filter"),
            BlockReason::Prompt(reason) => write!(f, "prompt rejected ({reason})"),
        }
    }
}

/// Sampling controls sent with every call.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationParams {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationParams {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_k: 50,
            top_p: 0.98,
            max_output_tokens: 3072,
        }
    }
}

/// One generation call: one prompt in, one text blob (or a typed failure) out.
#[derive(Debug, Clone, Copy)]
pub struct GenerationCall<'a> {
    pub prompt: &'a str,
    pub model_id: &'a str,
    pub api_key: &'a str,
    pub params: GenerationParams,
}

/// The external text generator. `AppState` carries an `Arc<dyn TextGenerator>`
/// so tests can swap the network out.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, call: GenerationCall<'_>) -> Result<String, LlmError>;
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeminiRequest<'a> {
    contents: Vec<GeminiContent<'a>>,
    generation_config: GenerationParams,
}

#[derive(Debug, Serialize)]
struct GeminiContent<'a> {
    parts: Vec<GeminiPart<'a>>,
}

#[derive(Debug, Serialize)]
struct GeminiPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    pub candidates: Option<Vec<Candidate>>,
    pub prompt_feedback: Option<PromptFeedback>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    pub parts: Option<Vec<CandidatePart>>,
}

#[derive(Debug, Deserialize)]
pub struct CandidatePart {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
}

impl GeminiResponse {
    /// Extracts the generated text from the first candidate.
    pub fn into_text(self) -> Result<String, LlmError> {
        if let Some(reason) = self.prompt_feedback.and_then(|f| f.block_reason) {
            return Err(LlmError::Blocked(BlockReason::Prompt(reason)));
        }

        let candidate = self
            .candidates
            .ok_or_else(|| LlmError::Malformed("response has no candidates".to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Malformed("response candidates are empty".to_string()))?;

        match candidate.finish_reason.as_deref() {
            Some("SAFETY") => return Err(LlmError::Blocked(BlockReason::Safety)),
            Some("RECITATION") => return Err(LlmError::Blocked(BlockReason::Recitation)),
            _ => {}
        }

        let text = candidate
            .content
            .ok_or_else(|| LlmError::Malformed("candidate has no content".to_string()))?
            .parts
            .ok_or_else(|| LlmError::Malformed("content has no parts".to_string()))?
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Malformed("content parts are empty".to_string()))?
            .text
            .ok_or_else(|| LlmError::Malformed("part has no text".to_string()))?;

        if text.trim().is_empty() {
            return Err(LlmError::Malformed("generated text is empty".to_string()));
        }
        Ok(text)
    }
}

#[derive(Debug, Deserialize)]
struct GeminiError {
    error: GeminiErrorBody,
}

#[derive(Debug, Deserialize)]
struct GeminiErrorBody {
    message: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Gemini `generateContent` client with a single fixed timeout.
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    base_url: String,
}

impl GeminiClient {
    pub fn new(timeout: Duration) -> anyhow::Result<Self> {
        Self::with_base_url(GEMINI_API_BASE, timeout)
    }

    pub fn with_base_url(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, model_id: &str) -> String {
        format!("{}/{}:generateContent", self.base_url, model_id)
    }
}

fn transport_error(e: reqwest::Error) -> LlmError {
    if e.is_timeout() {
        LlmError::Timeout
    } else {
        LlmError::Http(e.without_url())
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, call: GenerationCall<'_>) -> Result<String, LlmError> {
        let request_body = GeminiRequest {
            contents: vec![GeminiContent {
                parts: vec![GeminiPart { text: call.prompt }],
            }],
            generation_config: call.params,
        };

        let response = self
            .client
            .post(self.endpoint(call.model_id))
            .header(API_KEY_HEADER, call.api_key)
            .json(&request_body)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Gemini API returned {}: {}", status, body);
            let message = serde_json::from_str::<GeminiError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let body = response.text().await.map_err(transport_error)?;
        let parsed: GeminiResponse = serde_json::from_str(&body)
            .map_err(|e| LlmError::Malformed(format!("response is not valid JSON: {e}")))?;

        if let Some(usage) = &parsed.usage_metadata {
            debug!(
                "Gemini call succeeded: prompt_tokens={:?}, output_tokens={:?}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        parsed.into_text()
    }
}
