//! Field Sanitizer — turns one untrusted record into a fully-populated one.
//!
//! Per field, in policy order:
//! 1. trim; all-whitespace counts as absent
//! 2. keep present values as they are
//! 3. fatal-if-absent → discard the record
//! 4. otherwise substitute the declared sentinel
//! 5. URLs: add `https://` to bare hosts, else fall back to a search URL
//! 6. scores: anything non-numeric or out of range becomes the range minimum
//!
//! Running the sanitizer over its own serialized output changes nothing.

use std::collections::HashMap;

use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::recommendation::policy::{
    DiscardReason, FieldKind, FieldRule, VariantPolicy, WhenAbsent,
};

const SEARCH_BASE_URL: &str = "https://www.google.com/search?q=";

/// One element of the generated list, before any trust is established.
#[derive(Debug, Clone)]
pub struct RawCandidateRecord(Value);

impl RawCandidateRecord {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// Looks the field up by its canonical key, then by alias.
    fn get(&self, rule: &FieldRule) -> Option<&Value> {
        let object = self.0.as_object()?;
        std::iter::once(rule.key)
            .chain(rule.aliases.iter().copied())
            .find_map(|key| object.get(key).filter(|v| !v.is_null()))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Score(f64),
}

/// A record whose every declared field has been resolved.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SanitizedRecord {
    fields: HashMap<&'static str, FieldValue>,
}

impl SanitizedRecord {
    pub fn text(&self, key: &str) -> &str {
        match self.fields.get(key) {
            Some(FieldValue::Text(s)) => s,
            _ => "",
        }
    }

    pub fn take_text(&mut self, key: &str) -> String {
        match self.fields.remove(key) {
            Some(FieldValue::Text(s)) => s,
            _ => String::new(),
        }
    }

    pub fn take_list(&mut self, key: &str) -> Vec<String> {
        match self.fields.remove(key) {
            Some(FieldValue::List(items)) => items,
            _ => Vec::new(),
        }
    }

    pub fn score(&self, key: &str) -> f64 {
        match self.fields.get(key) {
            Some(FieldValue::Score(score)) => *score,
            _ => 0.0,
        }
    }
}

/// Sanitizes one record under `policy`, or says why it must be dropped.
pub fn sanitize(
    raw: &RawCandidateRecord,
    policy: &VariantPolicy,
) -> Result<SanitizedRecord, DiscardReason> {
    if !raw.as_value().is_object() {
        return Err(DiscardReason::NotAnObject);
    }

    let mut record = SanitizedRecord::default();

    for rule in policy.fields {
        let value = raw.get(rule);
        let resolved = match rule.kind {
            FieldKind::Text => clean_text(value).map(FieldValue::Text),
            FieldKind::TextList => clean_list(value).map(FieldValue::List),
            FieldKind::Url => clean_text(value)
                .and_then(|s| repair_url(&s))
                .map(FieldValue::Text),
            FieldKind::Score { min, max } => clean_score(value, min, max).map(FieldValue::Score),
        };

        let resolved = match resolved {
            Some(v) => v,
            None => {
                if value.is_some() {
                    debug!(
                        variant = %policy.variant,
                        field = rule.key,
                        "unusable value replaced"
                    );
                }
                fill_absent(rule, &record, policy)?
            }
        };

        record.fields.insert(rule.key, resolved);
    }

    Ok(record)
}

fn fill_absent(
    rule: &FieldRule,
    record: &SanitizedRecord,
    policy: &VariantPolicy,
) -> Result<FieldValue, DiscardReason> {
    match (rule.when_absent, rule.kind) {
        (WhenAbsent::Discard, _) => Err(DiscardReason::MissingField(rule.key)),
        (WhenAbsent::Sentinel(s), _) => Ok(FieldValue::Text(s.to_string())),
        (WhenAbsent::SentinelList(items), _) => Ok(FieldValue::List(
            items.iter().map(|s| s.to_string()).collect(),
        )),
        (WhenAbsent::SearchFallback, _) => Ok(FieldValue::Text(search_fallback_url(record, policy))),
        (WhenAbsent::RangeMinimum, FieldKind::Score { min, .. }) => Ok(FieldValue::Score(min)),
        (WhenAbsent::RangeMinimum, _) => Ok(FieldValue::Score(0.0)),
    }
}

/// Text of a present, non-blank string (numbers are taken as their text).
fn clean_text(value: Option<&Value>) -> Option<String> {
    let text = match value? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Non-blank strings from an array, or from a comma-separated string.
fn clean_list(value: Option<&Value>) -> Option<Vec<String>> {
    let items: Vec<String> = match value? {
        Value::Array(items) => items
            .iter()
            .filter_map(|item| clean_text(Some(item)))
            .collect(),
        Value::String(s) => s
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
        _ => return None,
    };
    (!items.is_empty()).then_some(items)
}

/// Numbers and numeric strings inside `[min, max]`; `None` for anything else.
fn clean_score(value: Option<&Value>, min: f64, max: f64) -> Option<f64> {
    let score = match value? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().trim_end_matches('%').trim_end().parse::<f64>().ok()?,
        _ => return None,
    };
    (score.is_finite() && (min..=max).contains(&score)).then_some(score)
}

/// Returns the link if it is, or can be repaired into, an absolute http(s) URL.
///
/// A leading `host.tld:port` parses as a scheme; a scheme containing a dot is
/// treated as a bare host and gets `https://` like any other schemeless link.
///
/// The result is the parsed URL's serialization, except that the root `/`
/// the parser adds is dropped when the input did not have one.
fn repair_url(raw: &str) -> Option<String> {
    let has_scheme = Url::parse(raw).is_ok_and(|url| !url.scheme().contains('.'));
    let parsed = if has_scheme {
        Url::parse(raw).ok()?
    } else if raw.contains('.') {
        Url::parse(&format!("https://{}", raw.trim_start_matches('/'))).ok()?
    } else {
        return None;
    };

    let web_scheme = matches!(parsed.scheme(), "http" | "https");
    let has_host = parsed.host_str().is_some_and(|h| !h.is_empty());
    if !(web_scheme && has_host) {
        return None;
    }

    let mut repaired = String::from(parsed.as_str());
    let bare_root = parsed.path() == "/" && parsed.query().is_none() && parsed.fragment().is_none();
    if bare_root && !raw.ends_with('/') {
        repaired.pop();
    }
    Some(repaired)
}

fn search_fallback_url(record: &SanitizedRecord, policy: &VariantPolicy) -> String {
    let mut terms: Vec<&str> = policy
        .search_terms
        .iter()
        .map(|key| record.text(key))
        .filter(|s| !s.is_empty())
        .collect();
    if let Some(suffix) = policy.search_suffix {
        terms.push(suffix);
    }
    format!("{SEARCH_BASE_URL}{}", urlencoding::encode(&terms.join(" ")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::policy::{COURSE_POLICY, JOB_POLICY};
    use serde_json::json;

    fn raw(value: Value) -> RawCandidateRecord {
        RawCandidateRecord::new(value)
    }

    fn job(link: Value) -> Value {
        json!({
            "title": "Platform Engineer",
            "company": "Acme Corp",
            "location": "Berlin",
            "keyRequiredSkills": ["Kubernetes", "Go"],
            "description": "Run the platform",
            "applicationLink": link,
            "matchScore": 72
        })
    }

    #[test]
    fn test_complete_job_is_kept_as_is() {
        let record = sanitize(&raw(job(json!("https://acme.io/jobs/7"))), &JOB_POLICY).unwrap();
        assert_eq!(record.text("title"), "Platform Engineer");
        assert_eq!(record.text("company"), "Acme Corp");
        assert_eq!(record.text("applicationLink"), "https://acme.io/jobs/7");
        assert_eq!(record.score("matchScore"), 72.0);
    }

    #[test]
    fn test_bare_domain_gets_https_prefix() {
        let record = sanitize(&raw(job(json!("example.com"))), &JOB_POLICY).unwrap();
        assert_eq!(record.text("applicationLink"), "https://example.com");
    }

    #[test]
    fn test_bare_host_with_port_gets_https_prefix() {
        let record = sanitize(&raw(job(json!("example.com:8080/jobs"))), &JOB_POLICY).unwrap();
        assert_eq!(record.text("applicationLink"), "https://example.com:8080/jobs");

        let record = sanitize(&raw(job(json!("www.acme.io:443"))), &JOB_POLICY).unwrap();
        assert_eq!(record.text("applicationLink"), "https://www.acme.io");
    }

    #[test]
    fn test_repaired_link_is_serialized_url() {
        let record =
            sanitize(&raw(job(json!("acme.io/jobs?q=senior dev"))), &JOB_POLICY).unwrap();
        assert_eq!(record.text("applicationLink"), "https://acme.io/jobs?q=senior%20dev");

        let record = sanitize(&raw(job(json!("https://acme.io/a b"))), &JOB_POLICY).unwrap();
        assert_eq!(record.text("applicationLink"), "https://acme.io/a%20b");

        let record = sanitize(&raw(job(json!("https://acme.io/"))), &JOB_POLICY).unwrap();
        assert_eq!(record.text("applicationLink"), "https://acme.io/");
    }

    #[test]
    fn test_protocol_relative_link_gets_https() {
        let record = sanitize(&raw(job(json!("//acme.io/x"))), &JOB_POLICY).unwrap();
        assert_eq!(record.text("applicationLink"), "https://acme.io/x");
    }

    #[test]
    fn test_mailto_link_falls_back_to_search() {
        let record = sanitize(&raw(job(json!("mailto:jobs@acme.io"))), &JOB_POLICY).unwrap();
        assert!(record
            .text("applicationLink")
            .starts_with("https://www.google.com/search?q="));
    }

    #[test]
    fn test_unparsable_link_falls_back_to_search() {
        let record = sanitize(&raw(job(json!("not a url"))), &JOB_POLICY).unwrap();
        assert_eq!(
            record.text("applicationLink"),
            "https://www.google.com/search?q=Platform%20Engineer%20Acme%20Corp%20Berlin"
        );
    }

    #[test]
    fn test_non_web_scheme_falls_back_to_search() {
        let record = sanitize(&raw(job(json!("javascript:alert(1)"))), &JOB_POLICY).unwrap();
        assert!(record
            .text("applicationLink")
            .starts_with("https://www.google.com/search?q="));
    }

    #[test]
    fn test_missing_link_uses_defaulted_company_in_fallback() {
        let value = json!({ "title": "QA Lead", "location": "Lisbon", "matchScore": 50 });
        let record = sanitize(&raw(value), &JOB_POLICY).unwrap();
        assert_eq!(record.text("company"), "Unknown Company");
        assert_eq!(
            record.text("applicationLink"),
            "https://www.google.com/search?q=QA%20Lead%20Unknown%20Company%20Lisbon"
        );
    }

    #[test]
    fn test_blank_title_is_fatal() {
        let mut value = job(json!("https://acme.io"));
        value["title"] = json!("   ");
        let err = sanitize(&raw(value), &JOB_POLICY).unwrap_err();
        assert_eq!(err, DiscardReason::MissingField("title"));
    }

    #[test]
    fn test_missing_location_is_fatal_for_jobs() {
        let mut value = job(json!("https://acme.io"));
        value.as_object_mut().unwrap().remove("location");
        let err = sanitize(&raw(value), &JOB_POLICY).unwrap_err();
        assert_eq!(err, DiscardReason::MissingField("location"));
    }

    #[test]
    fn test_non_object_is_discarded() {
        let err = sanitize(&raw(json!("Backend Engineer at Acme")), &JOB_POLICY).unwrap_err();
        assert_eq!(err, DiscardReason::NotAnObject);
    }

    #[test]
    fn test_defaults_fill_missing_optional_fields() {
        let value = json!({ "title": "SRE", "location": "Remote", "keyRequiredSkills": [] });
        let mut record = sanitize(&raw(value), &JOB_POLICY).unwrap();
        assert_eq!(record.text("description"), "No description provided.");
        assert_eq!(record.score("matchScore"), 0.0);
        assert_eq!(record.take_list("keyRequiredSkills"), vec!["Skill not specified"]);
    }

    #[test]
    fn test_skill_list_accepts_comma_separated_string() {
        let mut value = job(json!("https://acme.io"));
        value["keyRequiredSkills"] = json!("Rust, Tokio , ,SQL");
        let mut record = sanitize(&raw(value), &JOB_POLICY).unwrap();
        assert_eq!(record.take_list("keyRequiredSkills"), vec!["Rust", "Tokio", "SQL"]);
    }

    #[test]
    fn test_aliases_are_honoured() {
        let value = json!({
            "job_title": "Analyst",
            "company_name": "Globex",
            "location": "Paris",
            "url": "globex.fr/careers",
            "match_score": "64"
        });
        let record = sanitize(&raw(value), &JOB_POLICY).unwrap();
        assert_eq!(record.text("title"), "Analyst");
        assert_eq!(record.text("company"), "Globex");
        assert_eq!(record.text("applicationLink"), "https://globex.fr/careers");
        assert_eq!(record.score("matchScore"), 64.0);
    }

    #[test]
    fn test_out_of_range_score_becomes_minimum() {
        let mut value = job(json!("https://acme.io"));
        value["matchScore"] = json!(140);
        assert_eq!(sanitize(&raw(value.clone()), &JOB_POLICY).unwrap().score("matchScore"), 0.0);

        value["matchScore"] = json!(-5);
        assert_eq!(sanitize(&raw(value.clone()), &JOB_POLICY).unwrap().score("matchScore"), 0.0);

        value["matchScore"] = json!("high");
        assert_eq!(sanitize(&raw(value), &JOB_POLICY).unwrap().score("matchScore"), 0.0);
    }

    #[test]
    fn test_percent_string_score_is_read() {
        let mut value = job(json!("https://acme.io"));
        value["matchScore"] = json!("85%");
        assert_eq!(sanitize(&raw(value), &JOB_POLICY).unwrap().score("matchScore"), 85.0);
    }

    #[test]
    fn test_course_relevance_uses_unit_range() {
        let value = json!({ "title": "Intro to Rust", "relevanceScore": 0.9 });
        let record = sanitize(&raw(value), &COURSE_POLICY).unwrap();
        assert_eq!(record.score("relevanceScore"), 0.9);
        assert_eq!(record.text("platform"), "Unknown Platform");
        assert_eq!(
            record.text("url"),
            "https://www.google.com/search?q=Intro%20to%20Rust%20Unknown%20Platform%20course"
        );

        let value = json!({ "title": "Intro to Rust", "relevanceScore": 90 });
        let record = sanitize(&raw(value), &COURSE_POLICY).unwrap();
        assert_eq!(record.score("relevanceScore"), 0.0);
    }

    #[test]
    fn test_course_without_location_is_kept() {
        let value = json!({ "title": "Kubernetes Basics", "platform": "Coursera" });
        assert!(sanitize(&raw(value), &COURSE_POLICY).is_ok());
    }
}
