use std::sync::Arc;
use std::time::Instant;

use crate::ai::AiService;
use crate::auth::TokenKeys;
use crate::store::UserStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub users: Arc<dyn UserStore>,
    /// AI façade over the model provider and the recruiting tables.
    pub ai: AiService,
    pub tokens: TokenKeys,
    /// Process start, reported as uptime by /health.
    pub started_at: Instant,
}
