use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::CompletionBackend;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    /// Completion backend. `LlmClient` in production, a fake in tests.
    pub llm: Arc<dyn CompletionBackend>,
}
