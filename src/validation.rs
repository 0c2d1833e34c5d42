//! Validation System - Rule/Policy Separation
//!
//! Rules produce structured violations.
//! The validator decides whether to stop at the first one.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;

use crate::profile::{Field, ProfileInput};

static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]+$").expect("phone pattern compiles"));

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.-]+@[A-Za-z0-9_.-]+\.[A-Za-z0-9_]+$").expect("email pattern compiles")
});

/// Why a profile was rejected. `Display` is the message shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValidationFailure {
    #[error("Please fill in all the fields.")]
    MissingField,

    #[error("Please enter a valid mobile number (numbers only).")]
    InvalidPhoneFormat,

    #[error("Please enter a valid email address.")]
    InvalidEmailFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationViolation {
    pub rule: String,
    pub kind: ValidationFailure,
    pub fields: Vec<Field>,
    pub message: String,
}

impl ValidationViolation {
    fn new(rule: &str, kind: ValidationFailure, fields: Vec<Field>) -> Self {
        Self {
            rule: rule.to_string(),
            kind,
            fields,
            message: kind.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationResult {
    pub valid: bool,
    pub violations: Vec<ValidationViolation>,
}

impl ValidationResult {
    pub fn success() -> Self {
        Self {
            valid: true,
            violations: vec![],
        }
    }

    pub fn failure(violations: Vec<ValidationViolation>) -> Self {
        Self {
            valid: violations.is_empty(),
            violations,
        }
    }

    /// The first failure, which is what the user gets to see.
    pub fn first_failure(&self) -> Option<ValidationFailure> {
        self.violations.first().map(|v| v.kind)
    }
}

/// Validation rule trait - produces violations
pub trait ValidationRule: Send + Sync {
    fn name(&self) -> &'static str;
    fn validate(&self, input: &ProfileInput) -> Vec<ValidationViolation>;
}

// --- Concrete Rules ---

pub struct RequiredFieldsRule;

impl ValidationRule for RequiredFieldsRule {
    fn name(&self) -> &'static str { "required_fields" }

    fn validate(&self, input: &ProfileInput) -> Vec<ValidationViolation> {
        let missing = input.missing_fields();
        if missing.is_empty() {
            vec![]
        } else {
            vec![ValidationViolation::new(self.name(), ValidationFailure::MissingField, missing)]
        }
    }
}

pub struct PhoneFormatRule;

impl ValidationRule for PhoneFormatRule {
    fn name(&self) -> &'static str { "phone_format" }

    fn validate(&self, input: &ProfileInput) -> Vec<ValidationViolation> {
        // Empty values belong to the required rule
        if input.phone_number.trim().is_empty() || is_valid_phone(&input.phone_number) {
            return vec![];
        }
        vec![ValidationViolation::new(
            self.name(),
            ValidationFailure::InvalidPhoneFormat,
            vec![Field::PhoneNumber],
        )]
    }
}

pub struct EmailFormatRule;

impl ValidationRule for EmailFormatRule {
    fn name(&self) -> &'static str { "email_format" }

    fn validate(&self, input: &ProfileInput) -> Vec<ValidationViolation> {
        if input.email.trim().is_empty() || is_valid_email(&input.email) {
            return vec![];
        }
        vec![ValidationViolation::new(
            self.name(),
            ValidationFailure::InvalidEmailFormat,
            vec![Field::Email],
        )]
    }
}

/// One or more ASCII digits, nothing else.
pub fn is_valid_phone(value: &str) -> bool {
    PHONE_PATTERN.is_match(value)
}

/// Syntactic sanity check only; says nothing about deliverability.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value)
}

/// Validator runs the rules in order: required, phone, email.
pub struct Validator {
    rules: Vec<Box<dyn ValidationRule>>,
}

impl Validator {
    pub fn new() -> Self {
        Self {
            rules: vec![
                Box::new(RequiredFieldsRule),
                Box::new(PhoneFormatRule),
                Box::new(EmailFormatRule),
            ],
        }
    }

    /// Stop at the first rule that reports anything.
    pub fn validate(&self, input: &ProfileInput) -> ValidationResult {
        for rule in &self.rules {
            let violations = rule.validate(input);
            if !violations.is_empty() {
                return ValidationResult::failure(violations);
            }
        }
        ValidationResult::success()
    }

    /// Run every rule and report everything found.
    pub fn validate_all(&self, input: &ProfileInput) -> ValidationResult {
        let all_violations: Vec<_> = self
            .rules
            .iter()
            .flat_map(|rule| rule.validate(input))
            .collect();
        ValidationResult::failure(all_violations)
    }
}

impl Default for Validator {
    fn default() -> Self {
        Self::new()
    }
}
