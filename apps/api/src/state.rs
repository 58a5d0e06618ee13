use std::sync::Arc;

use crate::config::Config;
use crate::llm_client::Evaluator;

/// Shared application state injected into all route handlers via Axum extractors.
///
/// Holds no per-submission data: every evaluation is a stateless run.
#[derive(Clone)]
pub struct AppState {
    /// Pluggable evaluator. Production: `GeminiClient`.
    pub evaluator: Arc<dyn Evaluator>,
    pub config: Config,
}
