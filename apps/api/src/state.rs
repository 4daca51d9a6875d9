use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::research::gemini::GeminiBackend;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    /// Research backend — `None` when GOOGLE_API_KEY is not configured.
    pub research: Option<Arc<GeminiBackend>>,
    pub config: Config,
}
