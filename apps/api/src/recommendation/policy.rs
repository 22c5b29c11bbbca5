//! Per-variant field policy.
//!
//! Which fields are fatal when absent and which take a sentinel is a product
//! decision, and the job and course flows disagree on it (`location` is fatal
//! for jobs, courses have none). The tables below are the single place that
//! decision lives; the sanitizer and validator only interpret them.

use std::fmt;

use serde::Serialize;
use thiserror::Error;

use crate::recommendation::sanitizer::SanitizedRecord;

/// Sentinel for an empty skills list.
pub const SKILL_NOT_SPECIFIED: &[&str] = &["Skill not specified"];
pub const NO_DESCRIPTION: &str = "No description provided.";

/// Jobs scoring below this are dropped before ranking.
pub const JOB_MATCH_THRESHOLD: f64 = 30.0;
pub const MAX_JOB_RESULTS: usize = 10;
pub const MAX_COURSE_RESULTS: usize = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Job,
    Course,
}

impl Variant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Variant::Job => "job",
            Variant::Course => "course",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Text,
    TextList,
    Url,
    Score { min: f64, max: f64 },
}

/// What the sanitizer does when a field is missing, blank, or unusable.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WhenAbsent {
    /// Drop the whole record.
    Discard,
    Sentinel(&'static str),
    SentinelList(&'static [&'static str]),
    /// Build a search URL from the policy's `search_terms`.
    SearchFallback,
    /// Use the lower bound of the score range.
    RangeMinimum,
}

#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    /// Canonical key, also the serialized name on the output type.
    pub key: &'static str,
    /// Other keys models commonly use for the same field.
    pub aliases: &'static [&'static str],
    pub kind: FieldKind,
    pub when_absent: WhenAbsent,
}

#[derive(Debug)]
pub struct VariantPolicy {
    pub variant: Variant,
    /// Key holding the candidate list in the generated payload.
    pub list_key: &'static str,
    pub max_items: usize,
    /// Records scoring strictly below this are rejected. `None` admits all.
    pub admission_threshold: Option<f64>,
    /// Evaluated in order; URL fallbacks read fields resolved earlier.
    pub fields: &'static [FieldRule],
    /// Field keys whose sanitized text makes up the fallback search query.
    pub search_terms: &'static [&'static str],
    /// Appended to the fallback query, e.g. "course".
    pub search_suffix: Option<&'static str>,
}

pub static JOB_POLICY: VariantPolicy = VariantPolicy {
    variant: Variant::Job,
    list_key: "jobs",
    max_items: MAX_JOB_RESULTS,
    admission_threshold: Some(JOB_MATCH_THRESHOLD),
    fields: &[
        FieldRule {
            key: "title",
            aliases: &["jobTitle", "job_title"],
            kind: FieldKind::Text,
            when_absent: WhenAbsent::Discard,
        },
        FieldRule {
            key: "company",
            aliases: &["companyName", "company_name", "employer"],
            kind: FieldKind::Text,
            when_absent: WhenAbsent::Sentinel("Unknown Company"),
        },
        FieldRule {
            key: "location",
            aliases: &["jobLocation", "job_location"],
            kind: FieldKind::Text,
            when_absent: WhenAbsent::Discard,
        },
        FieldRule {
            key: "keyRequiredSkills",
            aliases: &["key_required_skills", "requiredSkills", "skills"],
            kind: FieldKind::TextList,
            when_absent: WhenAbsent::SentinelList(SKILL_NOT_SPECIFIED),
        },
        FieldRule {
            key: "description",
            aliases: &["summary"],
            kind: FieldKind::Text,
            when_absent: WhenAbsent::Sentinel(NO_DESCRIPTION),
        },
        FieldRule {
            key: "applicationLink",
            aliases: &["application_link", "url", "link"],
            kind: FieldKind::Url,
            when_absent: WhenAbsent::SearchFallback,
        },
        FieldRule {
            key: "matchScore",
            aliases: &["match_score", "score"],
            kind: FieldKind::Score {
                min: 0.0,
                max: 100.0,
            },
            when_absent: WhenAbsent::RangeMinimum,
        },
    ],
    search_terms: &["title", "company", "location"],
    search_suffix: None,
};

pub static COURSE_POLICY: VariantPolicy = VariantPolicy {
    variant: Variant::Course,
    list_key: "recommendations",
    max_items: MAX_COURSE_RESULTS,
    admission_threshold: None,
    fields: &[
        FieldRule {
            key: "title",
            aliases: &["courseTitle", "course_title", "name"],
            kind: FieldKind::Text,
            when_absent: WhenAbsent::Discard,
        },
        FieldRule {
            key: "platform",
            aliases: &["provider"],
            kind: FieldKind::Text,
            when_absent: WhenAbsent::Sentinel("Unknown Platform"),
        },
        FieldRule {
            key: "skillsCovered",
            aliases: &["skills_covered", "skills"],
            kind: FieldKind::TextList,
            when_absent: WhenAbsent::SentinelList(SKILL_NOT_SPECIFIED),
        },
        FieldRule {
            key: "description",
            aliases: &["summary"],
            kind: FieldKind::Text,
            when_absent: WhenAbsent::Sentinel(NO_DESCRIPTION),
        },
        FieldRule {
            key: "url",
            aliases: &["link", "courseUrl", "course_url"],
            kind: FieldKind::Url,
            when_absent: WhenAbsent::SearchFallback,
        },
        FieldRule {
            key: "relevanceScore",
            aliases: &["relevance_score", "score"],
            kind: FieldKind::Score { min: 0.0, max: 1.0 },
            when_absent: WhenAbsent::RangeMinimum,
        },
    ],
    search_terms: &["title", "platform"],
    search_suffix: Some("course"),
};

/// Why a candidate record was dropped.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiscardReason {
    #[error("record is not a JSON object")]
    NotAnObject,

    #[error("missing {0}")]
    MissingField(&'static str),

    #[error("score {score} below threshold {threshold}")]
    BelowThreshold { score: f64, threshold: f64 },
}

impl DiscardReason {
    /// Short machine-readable label for structured logs.
    pub fn code(&self) -> &'static str {
        match self {
            DiscardReason::NotAnObject => "not_an_object",
            DiscardReason::MissingField("title") => "missing_title",
            DiscardReason::MissingField("location") => "missing_location",
            DiscardReason::MissingField(_) => "missing_field",
            DiscardReason::BelowThreshold { .. } => "below_threshold",
        }
    }
}

/// A trusted output type built from a sanitized record.
pub trait Recommendation: Serialize + Clone + Send + Sync + 'static {
    fn policy() -> &'static VariantPolicy;

    /// Assembles the typed item. Every field the policy declares is present
    /// in `record` once sanitization has succeeded.
    fn from_sanitized(record: SanitizedRecord) -> Self;

    /// The score used for admission and ranking.
    fn score(&self) -> f64;

    fn title(&self) -> &str;
}
