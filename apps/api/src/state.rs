use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::store::Store;
use crate::workspace::UiStateRegistry;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Postgres when `DATABASE_URL` is set, otherwise in-memory.
    pub store: Arc<dyn Store>,
    /// `None` when no API key is configured; AI features then report 503 or fall back.
    pub llm: Option<LlmClient>,
    /// Outbound client for OAuth token and profile requests.
    pub http: reqwest::Client,
    pub config: Config,
    pub ui: Arc<UiStateRegistry>,
}
