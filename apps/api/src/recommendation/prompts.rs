// All LLM prompt constants for the Recommendation module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::{bullet_list, JSON_ONLY_INSTRUCTION};
use crate::models::profile::CandidateProfile;

const JOB_SYSTEM_PREAMBLE: &str = "You are an experienced technical recruiter \
    matching candidates to open roles.";

const COURSE_SYSTEM_PREAMBLE: &str = "You are a career coach recommending online \
    courses that close a candidate's skill gaps.";

/// Job recommendation prompt template.
/// Replace: {skills}, {experience}, {projects}, {target_role}
pub const JOB_PROMPT_TEMPLATE: &str = r#"Recommend up to 10 currently plausible job openings for this candidate.

CANDIDATE SKILLS:
{skills}

EXPERIENCE SUMMARY:
{experience}

PROJECTS:
{projects}

TARGET ROLE: {target_role}

Return a JSON object with this EXACT schema:
{
  "jobs": [
    {
      "title": "Backend Engineer",
      "company": "Example Corp",
      "location": "Remote (EU)",
      "keyRequiredSkills": ["Rust", "PostgreSQL"],
      "description": "One or two sentences on the role.",
      "applicationLink": "https://example.com/careers/backend",
      "matchScore": 82
    }
  ]
}

Rules:
1. `matchScore` is an integer from 0 to 100 estimating how well the candidate fits
2. `location` is required; use "Remote" for remote roles
3. Only include roles with a matchScore of 30 or more
4. Leave `applicationLink` empty rather than inventing a URL"#;

/// Course recommendation prompt template.
/// Replace: {skills}, {experience}, {target_role}, {skill_gaps}
pub const COURSE_PROMPT_TEMPLATE: &str = r#"Recommend 3 to 5 online courses for this candidate.

CANDIDATE SKILLS:
{skills}

EXPERIENCE SUMMARY:
{experience}

TARGET ROLE: {target_role}

SKILL GAPS TO CLOSE:
{skill_gaps}

Return a JSON object with this EXACT schema:
{
  "recommendations": [
    {
      "title": "Distributed Systems Fundamentals",
      "platform": "Coursera",
      "skillsCovered": ["Consensus", "Replication"],
      "description": "Why this course helps the candidate.",
      "url": "https://www.coursera.org/learn/example",
      "relevanceScore": 0.85
    }
  ]
}

Rules:
1. `relevanceScore` is a number from 0.0 to 1.0
2. Prefer courses that address the listed skill gaps
3. Leave `url` empty rather than inventing a URL"#;

pub fn job_system() -> String {
    format!("{JOB_SYSTEM_PREAMBLE} {JSON_ONLY_INSTRUCTION}")
}

pub fn course_system() -> String {
    format!("{COURSE_SYSTEM_PREAMBLE} {JSON_ONLY_INSTRUCTION}")
}

pub fn build_job_prompt(profile: &CandidateProfile) -> String {
    JOB_PROMPT_TEMPLATE
        .replace("{skills}", &bullet_list(&profile.skills, "None listed"))
        .replace("{experience}", experience_or_default(profile))
        .replace("{projects}", &bullet_list(&profile.projects, "None listed"))
        .replace("{target_role}", profile.target_role().unwrap_or("Open to suggestions"))
}

pub fn build_course_prompt(profile: &CandidateProfile, skill_gaps: &[String]) -> String {
    COURSE_PROMPT_TEMPLATE
        .replace("{skills}", &bullet_list(&profile.skills, "None listed"))
        .replace("{experience}", experience_or_default(profile))
        .replace("{target_role}", profile.target_role().unwrap_or("Open to suggestions"))
        .replace(
            "{skill_gaps}",
            &bullet_list(skill_gaps, "Infer the most valuable gaps for the target role"),
        )
}

fn experience_or_default(profile: &CandidateProfile) -> &str {
    let summary = profile.experience_summary.trim();
    if summary.is_empty() {
        "Not provided"
    } else {
        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile() -> CandidateProfile {
        CandidateProfile {
            skills: vec!["Rust".to_string(), "Kafka".to_string()],
            experience_summary: "Six years building payment systems.".to_string(),
            projects: vec!["Open-source rate limiter".to_string()],
            target_role: Some("Staff Engineer".to_string()),
        }
    }

    #[test]
    fn test_job_prompt_fills_every_placeholder() {
        let prompt = build_job_prompt(&profile());
        assert!(prompt.contains("- Rust\n- Kafka"));
        assert!(prompt.contains("Six years building payment systems."));
        assert!(prompt.contains("- Open-source rate limiter"));
        assert!(prompt.contains("TARGET ROLE: Staff Engineer"));
        assert!(!prompt.contains("{skills}"));
        assert!(!prompt.contains("{target_role}"));
    }

    #[test]
    fn test_course_prompt_lists_skill_gaps() {
        let prompt = build_course_prompt(&profile(), &["Terraform".to_string()]);
        assert!(prompt.contains("- Terraform"));
        assert!(!prompt.contains("{skill_gaps}"));
    }

    #[test]
    fn test_prompts_fall_back_for_missing_facts() {
        let prompt = build_course_prompt(&CandidateProfile::default(), &[]);
        assert!(prompt.contains("TARGET ROLE: Open to suggestions"));
        assert!(prompt.contains("Not provided"));
        assert!(prompt.contains("Infer the most valuable gaps"));
    }

    #[test]
    fn test_system_prompts_demand_json() {
        assert!(job_system().contains("valid JSON only"));
        assert!(course_system().contains("valid JSON only"));
    }
}
