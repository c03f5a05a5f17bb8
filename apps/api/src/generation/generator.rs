//! Reaction generation: orchestrates a single request end to end.
//!
//! Flow: validate → allocate distribution → assemble prompt → one generator
//! call → decode into three buckets.
//!
//! States: idle → building_prompt → awaiting_response → decoding → done, with
//! error reachable from awaiting_response and decoding. Only one generation
//! may be in flight per orchestrator; a concurrent request is rejected.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::generation::assembler::{assemble_prompt, PromptInput, PromptVariant};
use crate::generation::decoder::{decode, DecodedReactions, Section, SectionMarkers};
use crate::generation::distribution::{allocate, EmotionDistribution, RatioPolicy};
use crate::generation::guide_format::GuideBlocks;
use crate::generation::progress::ProgressTicker;
use crate::llm_client::models::{resolve_model, ModelInfo};
use crate::llm_client::{BlockReason, GenerationCall, GenerationParams, LlmError, TextGenerator};
use crate::models::program::EXAMPLE_SCAN_CAP;
use crate::programs::ProgramLibrary;

pub const MIN_COUNT: u32 = 1;
pub const MAX_COUNT: u32 = 50;

/// Descriptions starting with this are the input hint, not user text.
pub const DESCRIPTION_PLACEHOLDER_PREFIX: &str = "예시:";

// ────────────────────────────────────────────────────────────────────────────
// Errors and states
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Another generation is already in progress")]
    InFlight,

    #[error("The generator did not respond in time")]
    TransportTimeout,

    #[error("Generator request failed: {0}")]
    TransportFailure(String),

    #[error("Generation blocked by {0}")]
    ContentBlocked(BlockReason),

    #[error("Could not read the generator response: {0}")]
    MalformedPayload(String),
}

impl From<LlmError> for GenerationError {
    fn from(e: LlmError) -> Self {
        match e {
            LlmError::Timeout => GenerationError::TransportTimeout,
            LlmError::Http(e) => GenerationError::TransportFailure(e.to_string()),
            LlmError::Api { status, message } => {
                GenerationError::TransportFailure(format!("status {status}: {message}"))
            }
            LlmError::Blocked(reason) => GenerationError::ContentBlocked(reason),
            LlmError::Malformed(detail) => GenerationError::MalformedPayload(detail),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GenerationState {
    Idle,
    BuildingPrompt,
    AwaitingResponse,
    Decoding,
    Done,
    Error,
}

impl GenerationState {
    pub fn can_transition_to(self, next: GenerationState) -> bool {
        use GenerationState::*;
        matches!(
            (self, next),
            (Idle, BuildingPrompt)
                | (BuildingPrompt, AwaitingResponse)
                | (AwaitingResponse, Decoding)
                | (AwaitingResponse, Error)
                | (Decoding, Done)
                | (Decoding, Error)
        )
    }
}

/// Tracks one request through the state machine.
struct Lifecycle {
    request_id: Uuid,
    state: GenerationState,
}

impl Lifecycle {
    fn new() -> Self {
        Self {
            request_id: Uuid::new_v4(),
            state: GenerationState::Idle,
        }
    }

    fn advance(&mut self, next: GenerationState) {
        debug_assert!(
            self.state.can_transition_to(next),
            "invalid transition {:?} → {:?}",
            self.state,
            next
        );
        debug!(
            "Generation {}: {:?} → {:?}",
            self.request_id, self.state, next
        );
        self.state = next;
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Request / outcome
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum GenerationMode {
    Existing { program_name: String },
    New { title: String, description: String },
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateRequest {
    #[serde(flatten)]
    pub mode: GenerationMode,
    pub count: u32,
    #[serde(default)]
    pub ratios: Option<RatioPolicy>,
    /// Display name or model id; the catalogue default when absent.
    #[serde(default)]
    pub model: Option<String>,
    /// Falls back to the server-side key when absent.
    #[serde(default)]
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ModeKind {
    Existing,
    New,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerationOutcome {
    pub request_id: Uuid,
    pub mode: ModeKind,
    pub program: String,
    pub model: ModelInfo,
    pub distribution: EmotionDistribution,
    pub reactions: DecodedReactions,
    /// The three buckets under their headers, ready to copy.
    pub export: String,
    pub state: GenerationState,
    pub elapsed_ms: u64,
    pub generated_at: DateTime<Utc>,
}

/// A validated request, ready for prompt assembly.
struct Plan {
    api_key: String,
    model: ModelInfo,
    count: u32,
    ratios: RatioPolicy,
    target: Target,
}

enum Target {
    Existing {
        program_name: String,
        examples: Vec<String>,
    },
    New {
        title: String,
        description: String,
    },
}

impl Target {
    fn variant(&self) -> PromptVariant<'_> {
        match self {
            Target::Existing {
                program_name,
                examples,
            } => PromptVariant::Existing {
                program_name,
                examples,
            },
            Target::New { title, description } => PromptVariant::New { title, description },
        }
    }

    fn mode(&self) -> ModeKind {
        match self {
            Target::Existing { .. } => ModeKind::Existing,
            Target::New { .. } => ModeKind::New,
        }
    }

    fn program(&self) -> &str {
        match self {
            Target::Existing { program_name, .. } => program_name,
            Target::New { title, .. } => title,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct OrchestratorSettings {
    pub default_api_key: Option<String>,
    pub default_ratios: RatioPolicy,
    pub progress_tick: Duration,
    pub params: GenerationParams,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            default_api_key: None,
            default_ratios: RatioPolicy::default(),
            progress_tick: Duration::from_secs(1),
            params: GenerationParams::default(),
        }
    }
}

pub struct Orchestrator {
    generator: Arc<dyn TextGenerator>,
    programs: Arc<ProgramLibrary>,
    blocks: GuideBlocks,
    markers: SectionMarkers,
    settings: OrchestratorSettings,
    in_flight: Mutex<()>,
}

impl Orchestrator {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        programs: Arc<ProgramLibrary>,
        blocks: GuideBlocks,
        markers: SectionMarkers,
        settings: OrchestratorSettings,
    ) -> Self {
        Self {
            generator,
            programs,
            blocks,
            markers,
            settings,
            in_flight: Mutex::new(()),
        }
    }

    pub fn markers(&self) -> &SectionMarkers {
        &self.markers
    }

    pub fn default_ratios(&self) -> RatioPolicy {
        self.settings.default_ratios
    }

    /// Runs one generation. Prompt assembly, the upstream call and decoding
    /// happen as one sequential unit; the call is never retried.
    pub async fn generate(
        &self,
        request: GenerateRequest,
    ) -> Result<GenerationOutcome, GenerationError> {
        let _slot = self
            .in_flight
            .try_lock()
            .map_err(|_| GenerationError::InFlight)?;

        let mut lifecycle = Lifecycle::new();
        let plan = self.validate(request)?;

        // Step 1: distribution + prompt
        lifecycle.advance(GenerationState::BuildingPrompt);
        let distribution = allocate(plan.count, plan.ratios);
        let prompt = assemble_prompt(&PromptInput {
            variant: plan.target.variant(),
            distribution,
            blocks: &self.blocks,
            markers: &self.markers,
        });
        info!(
            "Generation {} started: mode={:?} program={:?} model={} count={} distribution={}/{}/{}",
            lifecycle.request_id,
            plan.target.mode(),
            plan.target.program(),
            plan.model.id,
            plan.count,
            distribution.positive,
            distribution.neutral,
            distribution.reduced
        );

        // Step 2: single upstream call
        lifecycle.advance(GenerationState::AwaitingResponse);
        let ticker = ProgressTicker::start(&lifecycle.request_id.to_string(), self.settings.progress_tick);
        let result = self
            .generator
            .generate(GenerationCall {
                prompt: &prompt,
                model_id: plan.model.id,
                api_key: &plan.api_key,
                params: self.settings.params,
            })
            .await;
        let elapsed = ticker.stop();

        let text = match result {
            Ok(text) => text,
            Err(e) => {
                lifecycle.advance(GenerationState::Error);
                let err = GenerationError::from(e);
                warn!("Generation {} failed: {err}", lifecycle.request_id);
                return Err(err);
            }
        };

        // Step 3: decode (never fails)
        lifecycle.advance(GenerationState::Decoding);
        let reactions = decode(&text, &self.markers);
        lifecycle.advance(GenerationState::Done);

        if reactions.is_empty() {
            warn!(
                "Generation {}: no section headers recognised in the response",
                lifecycle.request_id
            );
        }

        let decoded_counts = [
            reactions.line_count(Section::Positive),
            reactions.line_count(Section::Neutral),
            reactions.line_count(Section::Reduced),
        ];
        let requested = [distribution.positive, distribution.neutral, distribution.reduced];
        if decoded_counts
            .iter()
            .zip(requested)
            .any(|(got, want)| *got != want as usize)
        {
            warn!(
                "Generation {}: decoded {:?} lines, requested {:?}",
                lifecycle.request_id, decoded_counts, requested
            );
        }

        info!(
            "Generation {} done in {:.1}s",
            lifecycle.request_id,
            elapsed.as_secs_f64()
        );

        Ok(GenerationOutcome {
            request_id: lifecycle.request_id,
            mode: plan.target.mode(),
            program: plan.target.program().to_string(),
            model: plan.model,
            distribution,
            export: reactions.export(&self.markers),
            reactions,
            state: lifecycle.state,
            elapsed_ms: elapsed.as_millis() as u64,
            generated_at: Utc::now(),
        })
    }

    fn validate(&self, request: GenerateRequest) -> Result<Plan, GenerationError> {
        let api_key = request
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
            .map(str::to_string)
            .or_else(|| self.settings.default_api_key.clone())
            .ok_or_else(|| GenerationError::InvalidInput("a Gemini API key is required".into()))?;

        if !(MIN_COUNT..=MAX_COUNT).contains(&request.count) {
            return Err(GenerationError::InvalidInput(format!(
                "count must be between {MIN_COUNT} and {MAX_COUNT}, got {}",
                request.count
            )));
        }

        let model = resolve_model(request.model.as_deref()).ok_or_else(|| {
            GenerationError::InvalidInput(format!(
                "unknown model '{}'",
                request.model.as_deref().unwrap_or_default()
            ))
        })?;

        let target = match request.mode {
            GenerationMode::Existing { program_name } => {
                let name = program_name.trim();
                if name.is_empty() {
                    return Err(GenerationError::InvalidInput(
                        "select a program to generate for".into(),
                    ));
                }
                if !self.programs.contains(name) {
                    return Err(GenerationError::InvalidInput(format!(
                        "unknown program '{name}'"
                    )));
                }
                let examples = self.programs.example_set(name, EXAMPLE_SCAN_CAP);
                if examples.is_empty() {
                    return Err(GenerationError::InvalidInput(format!(
                        "program '{name}' has no recorded reactions to use as examples"
                    )));
                }
                Target::Existing {
                    program_name: name.to_string(),
                    examples,
                }
            }
            GenerationMode::New { title, description } => {
                let title = title.trim();
                let description = description.trim();
                if title.is_empty() {
                    return Err(GenerationError::InvalidInput(
                        "a title is required for a new program".into(),
                    ));
                }
                if description.is_empty() || description.starts_with(DESCRIPTION_PLACEHOLDER_PREFIX)
                {
                    return Err(GenerationError::InvalidInput(
                        "a description is required for a new program".into(),
                    ));
                }
                Target::New {
                    title: title.to_string(),
                    description: description.to_string(),
                }
            }
        };

        let ratios = request.ratios.unwrap_or(self.settings.default_ratios);
        ratios.check_bounds().map_err(GenerationError::InvalidInput)?;

        Ok(Plan {
            api_key,
            model,
            count: request.count,
            ratios,
            target,
        })
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
