use std::sync::Arc;

use crate::config::Config;
use crate::interview::orchestrator::Interviewer;
use crate::interview::store::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Interview engine. Holds the completion client and the answer evaluator.
    pub interviewer: Arc<Interviewer>,
    pub sessions: SessionStore,
    pub config: Config,
}
