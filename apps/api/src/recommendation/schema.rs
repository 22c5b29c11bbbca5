//! Schema Validator — checks a generated payload against the declared shape.
//!
//! Lax by design: partial records pass through untouched and are left to the
//! sanitizer. The only hard failure is a payload with no candidate list.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::recommendation::policy::{FieldKind, FieldRule, VariantPolicy};
use crate::recommendation::sanitizer::RawCandidateRecord;

/// How closely an accepted payload matched its shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Conformance {
    /// Every record is an object carrying every declared field with its kind.
    Valid,
    /// List-shaped, but some records are partial or mistyped.
    LaxAccepted,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ShapeError {
    #[error("payload has no '{list_key}' list")]
    MissingList { list_key: &'static str },

    #[error("'{list_key}' is a {found}, expected an array")]
    NotAList {
        list_key: &'static str,
        found: &'static str,
    },

    #[error("payload is a {found}, expected an object or array")]
    UnexpectedTopLevel { found: &'static str },
}

/// The declared shape of one variant's payload.
#[derive(Debug, Clone, Copy)]
pub struct Shape {
    pub list_key: &'static str,
    pub fields: &'static [FieldRule],
}

impl From<&'static VariantPolicy> for Shape {
    fn from(policy: &'static VariantPolicy) -> Self {
        Shape {
            list_key: policy.list_key,
            fields: policy.fields,
        }
    }
}

#[derive(Debug)]
pub struct Validated {
    pub conformance: Conformance,
    pub records: Vec<RawCandidateRecord>,
}

/// Validates `payload` against `shape` without altering it.
///
/// Accepts `{ "<list_key>": [...] }` or a bare array.
pub fn validate(payload: Value, shape: Shape) -> Result<Validated, ShapeError> {
    let list = match payload {
        Value::Array(items) => items,
        Value::Object(mut map) => match map.remove(shape.list_key) {
            Some(Value::Array(items)) => items,
            Some(other) => {
                return Err(ShapeError::NotAList {
                    list_key: shape.list_key,
                    found: json_type_name(&other),
                })
            }
            None => {
                return Err(ShapeError::MissingList {
                    list_key: shape.list_key,
                })
            }
        },
        other => {
            return Err(ShapeError::UnexpectedTopLevel {
                found: json_type_name(&other),
            })
        }
    };

    let conformance = if list.iter().all(|item| conforms(item, shape.fields)) {
        Conformance::Valid
    } else {
        Conformance::LaxAccepted
    };

    Ok(Validated {
        conformance,
        records: list.into_iter().map(RawCandidateRecord::new).collect(),
    })
}

fn conforms(item: &Value, fields: &[FieldRule]) -> bool {
    let Some(object) = item.as_object() else {
        return false;
    };

    fields.iter().all(|rule| match object.get(rule.key) {
        Some(value) => kind_matches(value, rule.kind),
        None => false,
    })
}

fn kind_matches(value: &Value, kind: FieldKind) -> bool {
    match kind {
        FieldKind::Text | FieldKind::Url => value.is_string(),
        FieldKind::TextList => value
            .as_array()
            .is_some_and(|items| items.iter().all(Value::is_string)),
        FieldKind::Score { .. } => value.is_number(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::recommendation::policy::{COURSE_POLICY, JOB_POLICY};
    use serde_json::json;

    fn full_job() -> Value {
        json!({
            "title": "Backend Engineer",
            "company": "Acme",
            "location": "Remote",
            "keyRequiredSkills": ["Rust"],
            "description": "Build services",
            "applicationLink": "https://acme.dev/jobs/1",
            "matchScore": 80
        })
    }

    #[test]
    fn test_complete_records_are_valid() {
        let validated = validate(json!({ "jobs": [full_job()] }), Shape::from(&JOB_POLICY)).unwrap();
        assert_eq!(validated.conformance, Conformance::Valid);
        assert_eq!(validated.records.len(), 1);
    }

    #[test]
    fn test_partial_records_are_lax_accepted_unchanged() {
        let partial = json!({ "title": "Data Analyst" });
        let validated = validate(
            json!({ "jobs": [full_job(), partial.clone()] }),
            Shape::from(&JOB_POLICY),
        )
        .unwrap();
        assert_eq!(validated.conformance, Conformance::LaxAccepted);
        assert_eq!(validated.records.len(), 2);
        assert_eq!(validated.records[1].as_value(), &partial);
    }

    #[test]
    fn test_mistyped_score_is_lax_accepted() {
        let mut job = full_job();
        job["matchScore"] = json!("eighty");
        let validated = validate(json!({ "jobs": [job] }), Shape::from(&JOB_POLICY)).unwrap();
        assert_eq!(validated.conformance, Conformance::LaxAccepted);
    }

    #[test]
    fn test_empty_list_is_valid() {
        let validated = validate(json!({ "jobs": [] }), Shape::from(&JOB_POLICY)).unwrap();
        assert_eq!(validated.conformance, Conformance::Valid);
        assert!(validated.records.is_empty());
    }

    #[test]
    fn test_bare_array_is_accepted() {
        let validated = validate(json!([full_job()]), Shape::from(&JOB_POLICY)).unwrap();
        assert_eq!(validated.records.len(), 1);
    }

    #[test]
    fn test_missing_list_is_shape_error() {
        let err = validate(json!({ "results": [] }), Shape::from(&JOB_POLICY)).unwrap_err();
        assert_eq!(err, ShapeError::MissingList { list_key: "jobs" });
    }

    #[test]
    fn test_non_array_list_is_shape_error() {
        let err = validate(
            json!({ "recommendations": "none found" }),
            Shape::from(&COURSE_POLICY),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ShapeError::NotAList {
                list_key: "recommendations",
                found: "string"
            }
        );
    }

    #[test]
    fn test_scalar_payload_is_shape_error() {
        let err = validate(json!("sorry"), Shape::from(&JOB_POLICY)).unwrap_err();
        assert_eq!(err, ShapeError::UnexpectedTopLevel { found: "string" });
    }
}
