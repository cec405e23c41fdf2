//! Field validators for candidate input. Pure functions; no LLM calls.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::models::candidate::ProfileForm;

/// Upper bound on the number of skills accepted in one submission.
pub const MAX_SKILLS: usize = 20;

static PHONE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\+?1?\d{9,15}$").expect("phone pattern is valid"));

/// Outcome of a single field check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldCheck {
    pub valid: bool,
    pub message: String,
}

impl FieldCheck {
    fn ok() -> Self {
        Self {
            valid: true,
            message: String::new(),
        }
    }

    fn fail(message: impl Into<String>) -> Self {
        Self {
            valid: false,
            message: message.into(),
        }
    }
}

/// A failed check, tagged with the form field it belongs to.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

pub fn validate_email(email: &str) -> FieldCheck {
    if validator::validate_email(email.trim()) {
        FieldCheck::ok()
    } else {
        FieldCheck::fail("Invalid email address")
    }
}

pub fn validate_phone(phone: &str) -> FieldCheck {
    if PHONE_PATTERN.is_match(phone.trim()) {
        FieldCheck::ok()
    } else {
        FieldCheck::fail("Invalid phone number format")
    }
}

/// Years of experience must parse as a number in [0, 50].
pub fn validate_experience(experience: &str) -> FieldCheck {
    match experience.trim().parse::<f64>() {
        Ok(years) if (0.0..=50.0).contains(&years) => FieldCheck::ok(),
        Ok(_) => FieldCheck::fail("Experience years should be between 0 and 50"),
        Err(_) => FieldCheck::fail("Experience must be a number"),
    }
}

pub fn validate_tech_stack(skills: &[String]) -> FieldCheck {
    if skills.is_empty() {
        FieldCheck::fail("Tech stack cannot be empty")
    } else if skills.len() > MAX_SKILLS {
        FieldCheck::fail("Too many technologies listed")
    } else {
        FieldCheck::ok()
    }
}

/// Runs the format checks on a profile form. Blank fields are skipped here;
/// the flow reports them as missing.
pub fn validate_profile_form(form: &ProfileForm) -> Vec<FieldError> {
    let checks = [
        ("email", &form.email, validate_email as fn(&str) -> FieldCheck),
        ("phone", &form.phone, validate_phone),
        ("experience", &form.experience, validate_experience),
    ];

    checks
        .into_iter()
        .filter(|(_, value, _)| !value.trim().is_empty())
        .filter_map(|(field, value, check)| {
            let result = check(value);
            (!result.valid).then(|| FieldError::new(field, result.message))
        })
        .collect()
}
