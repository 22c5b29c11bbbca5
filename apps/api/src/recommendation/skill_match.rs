//! Skill-overlap match scoring — an alternative to the model's self-reported score.
//!
//! Pure-Rust, deterministic, no LLM call. Used only when a caller asks for
//! `ScoreSource::SkillOverlap`; otherwise the sanitized model score stands.

use serde::{Deserialize, Serialize};

use crate::models::recommendation::RecommendedJob;

// ────────────────────────────────────────────────────────────────────────────
// Score authority
// ────────────────────────────────────────────────────────────────────────────

/// Which score is authoritative for job admission and ranking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoreSource {
    /// Trust the (sanitized) score the model reported.
    #[default]
    SelfReported,
    /// Replace it with `compute_match_score` over the candidate's skills.
    SkillOverlap,
}

// ────────────────────────────────────────────────────────────────────────────
// Weights
// ────────────────────────────────────────────────────────────────────────────

const REQUIRED_SKILL_WEIGHT: f64 = 1.5;
const TITLE_WEIGHT: f64 = 1.0;
const DESCRIPTION_WEIGHT: f64 = 0.5;

/// The parts of a job posting the overlap score looks at.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct JobPosting {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, alias = "keyRequiredSkills")]
    pub key_required_skills: Vec<String>,
}

impl From<&RecommendedJob> for JobPosting {
    fn from(job: &RecommendedJob) -> Self {
        Self {
            title: job.title.clone(),
            description: job.description.clone(),
            key_required_skills: job.key_required_skills.clone(),
        }
    }
}

/// Scores a posting against candidate skills on a 0 – 100 scale.
///
/// Algorithm, per non-blank candidate skill (case-insensitive substring tests):
/// - any required skill contains it → +1.5
/// - the title contains it → +1.0
/// - the description contains it → +0.5
///
/// score = round(Σ / skill_count × 100), clamped to [0, 100].
/// No usable skills → 0.
pub fn compute_match_score(skills: &[String], job: &JobPosting) -> u32 {
    let skills: Vec<String> = skills
        .iter()
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();

    if skills.is_empty() {
        return 0;
    }

    let title = job.title.to_lowercase();
    let description = job.description.to_lowercase();
    let required: Vec<String> = job
        .key_required_skills
        .iter()
        .map(|s| s.to_lowercase())
        .collect();

    let total: f64 = skills
        .iter()
        .map(|skill| {
            let mut weight = 0.0;
            if required.iter().any(|r| r.contains(skill.as_str())) {
                weight += REQUIRED_SKILL_WEIGHT;
            }
            if title.contains(skill.as_str()) {
                weight += TITLE_WEIGHT;
            }
            if description.contains(skill.as_str()) {
                weight += DESCRIPTION_WEIGHT;
            }
            weight
        })
        .sum();

    ((total / skills.len() as f64) * 100.0).round().clamp(0.0, 100.0) as u32
}

/// Replaces the job's self-reported score with its skill-overlap score.
pub fn rescore_job(skills: &[String], mut job: RecommendedJob) -> RecommendedJob {
    job.match_score = compute_match_score(skills, &JobPosting::from(&job)) as f64;
    job
}
