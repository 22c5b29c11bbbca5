use serde::{Deserialize, Serialize};

/// Resume-derived facts sent to the generation service.
///
/// Borrowed immutably for the whole of one recommendation request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CandidateProfile {
    /// Ordered as the resume lists them. Duplicates are allowed.
    #[serde(default)]
    pub skills: Vec<String>,
    #[serde(default)]
    pub experience_summary: String,
    #[serde(default)]
    pub projects: Vec<String>,
    #[serde(default)]
    pub target_role: Option<String>,
}

impl CandidateProfile {
    /// True when there is nothing to recommend from: no non-blank skill and
    /// a blank experience summary.
    pub fn is_empty(&self) -> bool {
        self.skills.iter().all(|s| s.trim().is_empty()) && self.experience_summary.trim().is_empty()
    }

    /// The target role, if present and not blank.
    pub fn target_role(&self) -> Option<&str> {
        self.target_role
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty())
    }
}
