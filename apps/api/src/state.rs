use sqlx::PgPool;

use crate::recommendation::orchestrator::Recommender;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    /// Wraps the generation backend. Production: `LlmClient`; tests swap in a stub.
    pub recommender: Recommender,
}
