use std::sync::Arc;

use crate::config::Config;
use crate::generation::generator::Orchestrator;
use crate::programs::ProgramLibrary;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Startup configuration, kept for handlers that need it.
    #[allow(dead_code)]
    pub config: Config,
    pub programs: Arc<ProgramLibrary>,
    /// Single-flight generation pipeline; holds the pluggable `TextGenerator`.
    pub orchestrator: Arc<Orchestrator>,
}
