use serde::{Deserialize, Serialize};

use crate::recommendation::policy::{Recommendation, VariantPolicy, COURSE_POLICY, JOB_POLICY};
use crate::recommendation::sanitizer::SanitizedRecord;

/// A job recommendation that has passed sanitization.
///
/// Field names serialize to the same keys the sanitizer reads, so a stored
/// item can be fed back through the pipeline unchanged.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedJob {
    pub title: String,
    pub company: String,
    pub location: String,
    pub key_required_skills: Vec<String>,
    pub description: String,
    pub application_link: String,
    /// 0 – 100
    pub match_score: f64,
}

impl Recommendation for RecommendedJob {
    fn policy() -> &'static VariantPolicy {
        &JOB_POLICY
    }

    fn from_sanitized(mut record: SanitizedRecord) -> Self {
        let match_score = record.score("matchScore");
        Self {
            title: record.take_text("title"),
            company: record.take_text("company"),
            location: record.take_text("location"),
            key_required_skills: record.take_list("keyRequiredSkills"),
            description: record.take_text("description"),
            application_link: record.take_text("applicationLink"),
            match_score,
        }
    }

    fn score(&self) -> f64 {
        self.match_score
    }

    fn title(&self) -> &str {
        &self.title
    }
}

/// A course recommendation that has passed sanitization.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecommendedCourse {
    pub title: String,
    pub platform: String,
    pub skills_covered: Vec<String>,
    pub description: String,
    pub url: String,
    /// 0.0 – 1.0
    pub relevance_score: f64,
}

impl Recommendation for RecommendedCourse {
    fn policy() -> &'static VariantPolicy {
        &COURSE_POLICY
    }

    fn from_sanitized(mut record: SanitizedRecord) -> Self {
        let relevance_score = record.score("relevanceScore");
        Self {
            title: record.take_text("title"),
            platform: record.take_text("platform"),
            skills_covered: record.take_list("skillsCovered"),
            description: record.take_text("description"),
            url: record.take_text("url"),
            relevance_score,
        }
    }

    fn score(&self) -> f64 {
        self.relevance_score
    }

    fn title(&self) -> &str {
        &self.title
    }
}

/// Ranked, size-bounded output of one recommendation request. May be empty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationResult<T> {
    pub items: Vec<T>,
}

impl<T> RecommendationResult<T> {
    pub fn empty() -> Self {
        Self { items: Vec::new() }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
