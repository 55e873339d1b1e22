use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionBackend;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable completion backend. Production wiring uses the Groq client;
    /// tests substitute a mock.
    pub llm: Arc<dyn CompletionBackend>,
    /// Loaded service configuration.
    #[allow(dead_code)]
    pub config: Config,
}
