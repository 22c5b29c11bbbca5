//! Axum route handlers for the Recommendation API.

use axum::{extract::State, Json};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::profile::CandidateProfile;
use crate::models::recommendation::{RecommendationResult, RecommendedCourse, RecommendedJob};
use crate::recommendation::skill_match::{compute_match_score, JobPosting, ScoreSource};
use crate::recommendation::store::persist_result;
use crate::state::AppState;

/// Upper bound on profiles per batch request.
const MAX_BATCH_SIZE: usize = 20;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct JobRecommendationRequest {
    pub user_id: Uuid,
    pub profile: CandidateProfile,
    /// Overrides the configured score authority for this request.
    #[serde(default)]
    pub score_source: Option<ScoreSource>,
}

#[derive(Debug, Deserialize)]
pub struct BatchJobRecommendationRequest {
    pub requests: Vec<JobRecommendationRequest>,
}

#[derive(Debug, Serialize)]
pub struct BatchJobRecommendationResponse {
    pub results: Vec<RecommendationResult<RecommendedJob>>,
}

#[derive(Debug, Deserialize)]
pub struct CourseRecommendationRequest {
    pub user_id: Uuid,
    pub profile: CandidateProfile,
    #[serde(default)]
    pub skill_gaps: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct MatchScoreRequest {
    pub skills: Vec<String>,
    pub job: JobPosting,
}

#[derive(Debug, Serialize)]
pub struct MatchScoreResponse {
    pub match_score: u32,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/recommendations/jobs
///
/// Returns up to 10 ranked jobs. An empty list is a normal response.
pub async fn handle_recommend_jobs(
    State(state): State<AppState>,
    Json(request): Json<JobRecommendationRequest>,
) -> Result<Json<RecommendationResult<RecommendedJob>>, AppError> {
    ensure_profile(&request.profile)?;

    let run = state
        .recommender
        .recommend_jobs(&request.profile, request.score_source)
        .await;
    persist_result(&state.db, request.user_id, &run.result).await?;

    Ok(Json(run.result))
}

/// POST /api/v1/recommendations/jobs/batch
///
/// Runs one independent pipeline per profile, concurrently. Results are
/// returned in request order. A failed write is logged against its own
/// request and does not affect the others.
pub async fn handle_recommend_jobs_batch(
    State(state): State<AppState>,
    Json(batch): Json<BatchJobRecommendationRequest>,
) -> Result<Json<BatchJobRecommendationResponse>, AppError> {
    if batch.requests.is_empty() {
        return Err(AppError::Validation("requests cannot be empty".to_string()));
    }
    if batch.requests.len() > MAX_BATCH_SIZE {
        return Err(AppError::Validation(format!(
            "at most {MAX_BATCH_SIZE} requests per batch, got {}",
            batch.requests.len()
        )));
    }
    for (i, request) in batch.requests.iter().enumerate() {
        ensure_profile(&request.profile)
            .map_err(|_| AppError::Validation(format!("requests[{i}]: profile is empty")))?;
    }

    let state = &state;
    let results = join_all(batch.requests.iter().map(|request| async move {
        let run = state
            .recommender
            .recommend_jobs(&request.profile, request.score_source)
            .await;
        if let Err(e) = persist_result(&state.db, request.user_id, &run.result).await {
            error!(user_id = %request.user_id, "Failed to persist batch recommendations: {e}");
        }
        run.result
    }))
    .await;

    Ok(Json(BatchJobRecommendationResponse { results }))
}

/// POST /api/v1/recommendations/courses
///
/// Returns up to 5 ranked courses, aimed at `skill_gaps` when given.
pub async fn handle_recommend_courses(
    State(state): State<AppState>,
    Json(request): Json<CourseRecommendationRequest>,
) -> Result<Json<RecommendationResult<RecommendedCourse>>, AppError> {
    ensure_profile(&request.profile)?;

    let run = state
        .recommender
        .recommend_courses(&request.profile, &request.skill_gaps)
        .await;
    persist_result(&state.db, request.user_id, &run.result).await?;

    Ok(Json(run.result))
}

/// POST /api/v1/recommendations/match-score
///
/// Skill-overlap score for one posting. No LLM call.
pub async fn handle_match_score(
    Json(request): Json<MatchScoreRequest>,
) -> Result<Json<MatchScoreResponse>, AppError> {
    if request.job.title.trim().is_empty() {
        return Err(AppError::Validation("job.title cannot be empty".to_string()));
    }

    Ok(Json(MatchScoreResponse {
        match_score: compute_match_score(&request.skills, &request.job),
    }))
}

fn ensure_profile(profile: &CandidateProfile) -> Result<(), AppError> {
    if profile.is_empty() {
        return Err(AppError::Validation(
            "profile needs at least one skill or an experience summary".to_string(),
        ));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
