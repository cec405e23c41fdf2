use std::sync::Arc;

use crate::llm_client::LanguageModel;
use crate::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    /// Gemini in production; a scripted model in tests.
    pub llm: Arc<dyn LanguageModel>,
}
