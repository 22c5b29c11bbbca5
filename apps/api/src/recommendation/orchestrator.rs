//! Recommendation Orchestrator — one generation call, then the trust pipeline.
//!
//! Stages: Requesting → Validating → Sanitizing → Ranking → Done.
//! `FailedEmpty` is reachable from Requesting (transport/parse failure),
//! Validating (no candidate list) and Ranking (nothing survived admission).
//! Every path yields a `RecommendationResult`; none returns an error.
//!
//! The orchestrator makes exactly one generation call per invocation and
//! neither retries it nor imposes a timeout of its own.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::llm_client::GenerationService;
use crate::models::profile::CandidateProfile;
use crate::models::recommendation::{RecommendationResult, RecommendedCourse, RecommendedJob};
use crate::recommendation::admission::{admit, log_discard};
use crate::recommendation::policy::{Recommendation, Variant};
use crate::recommendation::prompts::{
    build_course_prompt, build_job_prompt, course_system, job_system,
};
use crate::recommendation::ranking::rank;
use crate::recommendation::sanitizer::sanitize;
use crate::recommendation::schema::{validate, Conformance, Shape};
use crate::recommendation::skill_match::{rescore_job, ScoreSource};

// ────────────────────────────────────────────────────────────────────────────
// Pipeline state and outcome
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Requesting,
    Validating,
    Sanitizing,
    Ranking,
    Done,
    FailedEmpty,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::Requesting => "requesting",
            Stage::Validating => "validating",
            Stage::Sanitizing => "sanitizing",
            Stage::Ranking => "ranking",
            Stage::Done => "done",
            Stage::FailedEmpty => "failed_empty",
        };
        f.write_str(name)
    }
}

/// Why a request produced nothing. Logged, never serialized to clients.
#[derive(Debug, Clone, PartialEq)]
pub enum FailureCause {
    /// The generation call failed or returned no decodable JSON.
    Transport(String),
    /// The payload had no candidate list.
    Shape(String),
    /// The list was empty, or every record was discarded.
    NoSurvivors { discarded: usize },
}

impl FailureCause {
    /// The stage the pipeline was in when it gave up.
    pub fn stage(&self) -> Stage {
        match self {
            FailureCause::Transport(_) => Stage::Requesting,
            FailureCause::Shape(_) => Stage::Validating,
            FailureCause::NoSurvivors { .. } => Stage::Ranking,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            FailureCause::Transport(_) => "transport_failure",
            FailureCause::Shape(_) => "shape_failure",
            FailureCause::NoSurvivors { .. } => "no_survivors",
        }
    }
}

impl fmt::Display for FailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureCause::Transport(detail) => write!(f, "generation call failed: {detail}"),
            FailureCause::Shape(detail) => write!(f, "unusable payload: {detail}"),
            FailureCause::NoSurvivors { discarded } => {
                write!(f, "no records survived ({discarded} discarded)")
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
    Done {
        conformance: Conformance,
        returned: usize,
        discarded: usize,
        truncated: usize,
    },
    FailedEmpty(FailureCause),
}

/// What one invocation produced. Callers serve `result`; `outcome` is for
/// logs and tests.
#[derive(Debug, Clone)]
pub struct PipelineRun<T> {
    pub result: RecommendationResult<T>,
    pub outcome: PipelineOutcome,
}

impl<T> PipelineRun<T> {
    fn failed(cause: FailureCause) -> Self {
        Self {
            result: RecommendationResult::empty(),
            outcome: PipelineOutcome::FailedEmpty(cause),
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Orchestrator
// ────────────────────────────────────────────────────────────────────────────

/// Runs recommendation requests against a generation backend.
///
/// Holds no per-request state; concurrent invocations are independent.
#[derive(Clone)]
pub struct Recommender {
    generator: Arc<dyn GenerationService>,
    default_score_source: ScoreSource,
}

impl Recommender {
    pub fn new(generator: Arc<dyn GenerationService>, default_score_source: ScoreSource) -> Self {
        Self {
            generator,
            default_score_source,
        }
    }

    pub fn default_score_source(&self) -> ScoreSource {
        self.default_score_source
    }

    /// Recommends up to 10 jobs scoring at least 30.
    ///
    /// `score_source` overrides the configured default for this request.
    pub async fn recommend_jobs(
        &self,
        profile: &CandidateProfile,
        score_source: Option<ScoreSource>,
    ) -> PipelineRun<RecommendedJob> {
        let prompt = build_job_prompt(profile);
        let system = job_system();

        match score_source.unwrap_or(self.default_score_source) {
            ScoreSource::SelfReported => self.run(&prompt, &system, |job| job).await,
            ScoreSource::SkillOverlap => {
                self.run(&prompt, &system, |job| rescore_job(&profile.skills, job))
                    .await
            }
        }
    }

    /// Recommends up to 5 courses, optionally aimed at specific skill gaps.
    pub async fn recommend_courses(
        &self,
        profile: &CandidateProfile,
        skill_gaps: &[String],
    ) -> PipelineRun<RecommendedCourse> {
        let prompt = build_course_prompt(profile, skill_gaps);
        let system = course_system();
        self.run(&prompt, &system, |course| course).await
    }

    /// Requesting → Validating → Sanitizing → Ranking → Done.
    ///
    /// `adjust` runs on each sanitized item before admission, so a
    /// recomputed score is the one the admission gate sees.
    async fn run<T, F>(&self, prompt: &str, system: &str, adjust: F) -> PipelineRun<T>
    where
        T: Recommendation,
        F: Fn(T) -> T + Send + Sync,
    {
        let policy = T::policy();
        let variant = policy.variant;

        debug!(%variant, stage = %Stage::Requesting, "Calling generation service");
        let payload = match self.generator.generate(prompt, system).await {
            Ok(payload) => payload,
            Err(e) => {
                return finish(
                    variant,
                    PipelineRun::failed(FailureCause::Transport(e.to_string())),
                )
            }
        };

        debug!(%variant, stage = %Stage::Validating, "Validating generated payload");
        let validated = match validate(payload, Shape::from(policy)) {
            Ok(validated) => validated,
            Err(e) => {
                return finish(variant, PipelineRun::failed(FailureCause::Shape(e.to_string())))
            }
        };

        debug!(
            %variant,
            stage = %Stage::Sanitizing,
            candidates = validated.records.len(),
            conformance = ?validated.conformance,
            "Sanitizing candidate records"
        );
        let mut admitted = Vec::with_capacity(validated.records.len());
        let mut discarded = 0;

        for (index, raw) in validated.records.iter().enumerate() {
            let item = match sanitize(raw, policy) {
                Ok(record) => adjust(T::from_sanitized(record)),
                Err(reason) => {
                    log_discard(variant, index, None, &reason);
                    discarded += 1;
                    continue;
                }
            };

            if let Err(reason) = admit(&item) {
                log_discard(variant, index, Some(item.title()), &reason);
                discarded += 1;
                continue;
            }

            admitted.push(item);
        }

        debug!(%variant, stage = %Stage::Ranking, admitted = admitted.len(), "Ranking admitted items");
        if admitted.is_empty() {
            return finish(variant, PipelineRun::failed(FailureCause::NoSurvivors { discarded }));
        }

        let admitted_count = admitted.len();
        let items = rank(admitted);
        let truncated = admitted_count - items.len();

        finish(
            variant,
            PipelineRun {
                outcome: PipelineOutcome::Done {
                    conformance: validated.conformance,
                    returned: items.len(),
                    discarded,
                    truncated,
                },
                result: RecommendationResult { items },
            },
        )
    }
}

/// Logs the terminal state once per request.
fn finish<T>(variant: Variant, run: PipelineRun<T>) -> PipelineRun<T> {
    match &run.outcome {
        PipelineOutcome::Done {
            conformance,
            returned,
            discarded,
            truncated,
        } => info!(
            %variant,
            stage = %Stage::Done,
            returned,
            discarded,
            truncated,
            conformance = ?conformance,
            "Recommendation pipeline completed"
        ),
        PipelineOutcome::FailedEmpty(cause) => warn!(
            %variant,
            stage = %Stage::FailedEmpty,
            failed_at = %cause.stage(),
            cause = cause.code(),
            "Recommendation pipeline returned no items: {cause}"
        ),
    }
    run
}
