//! Field validation
//!
//! Pure and deterministic: the same fields always yield the same result.
//! Failures are reported per field in document order; within a field the
//! order is `EMPTY`, then the kind check, then `TOO_LONG`.

use crate::field::{FieldKind, FormField};
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;
use url::Url;

/// Why a field failed validation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureReason {
    /// Required field is blank
    Empty,
    /// Not shaped like `local@domain.tld`
    BadEmail,
    /// Not an absolute URL
    BadUrl,
    /// Longer than `maxLength`
    TooLong,
}

/// One failed constraint
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationFailure {
    /// Field name
    pub field: String,
    /// Failed constraint
    pub reason: FailureReason,
}

/// Outcome of a validation pass
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValidationResult {
    /// True when `failures` is empty
    pub valid: bool,
    /// Failures in field order
    pub failures: Vec<ValidationFailure>,
}

impl ValidationResult {
    fn from_failures(failures: Vec<ValidationFailure>) -> Self {
        Self {
            valid: failures.is_empty(),
            failures,
        }
    }

    /// Reasons reported for one field
    pub fn reasons_for(&self, field: &str) -> Vec<FailureReason> {
        self.failures
            .iter()
            .filter(|f| f.field == field)
            .map(|f| f.reason)
            .collect()
    }

    /// Names of failing fields, without repeats
    pub fn failed_fields(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for failure in &self.failures {
            if !names.contains(&failure.field.as_str()) {
                names.push(&failure.field);
            }
        }
        names
    }
}

/// Validator with its patterns compiled once
pub struct FieldValidator {
    email: Regex,
}

impl FieldValidator {
    /// Create a validator
    pub fn new() -> Self {
        Self {
            email: Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles"),
        }
    }

    /// Validate every field (the submit-time gate)
    pub fn validate(&self, fields: &[FormField]) -> ValidationResult {
        let failures: Vec<ValidationFailure> = fields
            .iter()
            .flat_map(|field| {
                self.check_field(field)
                    .into_iter()
                    .map(move |reason| ValidationFailure {
                        field: field.name.clone(),
                        reason,
                    })
            })
            .collect();

        if !failures.is_empty() {
            debug!("Validation failed for {} constraint(s)", failures.len());
        }

        ValidationResult::from_failures(failures)
    }

    /// Validate a single field (the on-blur check)
    pub fn check_field(&self, field: &FormField) -> Vec<FailureReason> {
        let mut reasons = Vec::new();

        if field.is_blank() {
            if field.constraints.required {
                reasons.push(FailureReason::Empty);
            }
        } else {
            match field.constraints.kind {
                FieldKind::Email if !self.is_email(&field.value) => {
                    reasons.push(FailureReason::BadEmail)
                }
                FieldKind::Url if !Self::is_url(&field.value) => reasons.push(FailureReason::BadUrl),
                _ => {}
            }
        }

        if let Some(max) = field.constraints.max_length {
            if field.len() > max {
                reasons.push(FailureReason::TooLong);
            }
        }

        reasons
    }

    /// `local-part@domain` with no whitespace and a dotted domain
    pub fn is_email(&self, value: &str) -> bool {
        self.email.is_match(value)
    }

    /// Well-formed absolute URL
    pub fn is_url(value: &str) -> bool {
        Url::parse(value).is_ok()
    }
}

impl Default for FieldValidator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{FieldConstraints, FieldSpec};

    fn field(spec: FieldSpec, value: &str) -> FormField {
        FormField::new(spec.name, value, spec.constraints)
    }

    #[test]
    fn test_empty_required_fields() {
        let v = FieldValidator::new();
        let fields = vec![
            field(FieldSpec::text("name").required(), "   "),
            field(FieldSpec::email("email").required(), ""),
            field(FieldSpec::text("company"), ""),
        ];

        let result = v.validate(&fields);
        assert!(!result.valid);
        assert_eq!(
            result.failures,
            vec![
                ValidationFailure { field: "name".into(), reason: FailureReason::Empty },
                ValidationFailure { field: "email".into(), reason: FailureReason::Empty },
            ]
        );
    }

    #[test]
    fn test_email_shapes() {
        let v = FieldValidator::new();
        for good in ["jane@x.com", "a.b+c@mail.example.org", "x@y.z"] {
            assert!(v.is_email(good), "{good} should be accepted");
        }
        for bad in ["jane", "jane@x", "jane@@x.com", "ja ne@x.com", "@x.com", "jane@.", "jane@x."] {
            assert!(!v.is_email(bad), "{bad} should be rejected");
        }
    }

    #[test]
    fn test_bad_email_reported() {
        let v = FieldValidator::new();
        let result = v.validate(&[field(FieldSpec::email("email").required(), "jane-at-x.com")]);
        assert_eq!(result.reasons_for("email"), vec![FailureReason::BadEmail]);
    }

    #[test]
    fn test_optional_email_skipped_when_empty() {
        let v = FieldValidator::new();
        let result = v.validate(&[field(FieldSpec::email("backup"), "")]);
        assert!(result.valid);
    }

    #[test]
    fn test_url_check() {
        let v = FieldValidator::new();
        let ok = v.validate(&[field(FieldSpec::url("website"), "https://example.com/about")]);
        assert!(ok.valid);

        let bad = v.validate(&[field(FieldSpec::url("website"), "example.com")]);
        assert_eq!(bad.reasons_for("website"), vec![FailureReason::BadUrl]);
    }

    #[test]
    fn test_too_long() {
        let v = FieldValidator::new();
        let spec = FieldSpec::text("message").max_length(5);
        assert!(v.validate(&[field(spec.clone(), "hello")]).valid);

        let result = v.validate(&[field(spec, "hello!")]);
        assert_eq!(result.reasons_for("message"), vec![FailureReason::TooLong]);
    }

    #[test]
    fn test_multiple_reasons_on_one_field() {
        let v = FieldValidator::new();
        let constraints = FieldConstraints {
            required: true,
            kind: FieldKind::Email,
            max_length: Some(4),
        };
        let reasons = v.check_field(&FormField::new("email", "not-an-email", constraints));
        assert_eq!(reasons, vec![FailureReason::BadEmail, FailureReason::TooLong]);
    }

    #[test]
    fn test_deterministic() {
        let v = FieldValidator::new();
        let fields = vec![
            field(FieldSpec::text("name").required(), ""),
            field(FieldSpec::url("website"), "nope"),
        ];
        assert_eq!(v.validate(&fields), v.validate(&fields));
        assert_eq!(v.validate(&fields).failed_fields(), vec!["name", "website"]);
    }

    #[test]
    fn test_reason_wire_names() {
        let json = serde_json::to_string(&FailureReason::BadEmail).unwrap();
        assert_eq!(json, "\"BAD_EMAIL\"");
    }
}
