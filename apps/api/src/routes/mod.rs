pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::recommendation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/recommendations/jobs",
            post(handlers::handle_recommend_jobs),
        )
        .route(
            "/api/v1/recommendations/jobs/batch",
            post(handlers::handle_recommend_jobs_batch),
        )
        .route(
            "/api/v1/recommendations/courses",
            post(handlers::handle_recommend_courses),
        )
        .route(
            "/api/v1/recommendations/match-score",
            post(handlers::handle_match_score),
        )
        .with_state(state)
}
