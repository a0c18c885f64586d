//! Field rules shared by request DTOs.
//!
//! The functions below are referenced from `#[validate(custom(...))]`
//! attributes on the create/update DTOs in `fabula-db`.

use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors};

/// Upper bound on the number of keys in a free-form attribute map.
pub const MAX_ATTRIBUTE_KEYS: usize = 200;

fn error(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

/// Usernames start with a letter or digit and otherwise contain only
/// letters, digits, `_`, `-` and `.`.
pub fn validate_username(value: &str) -> Result<(), ValidationError> {
    let mut chars = value.chars();
    let starts_ok = chars.next().is_some_and(|c| c.is_ascii_alphanumeric());
    let rest_ok = chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'));
    if starts_ok && rest_ok {
        Ok(())
    } else {
        Err(error(
            "username",
            "must start with a letter or digit and contain only letters, digits, '_', '-' or '.'",
        ))
    }
}

/// Rejects strings that are empty after trimming.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        Err(error("blank", "must not be blank"))
    } else {
        Ok(())
    }
}

/// Attribute maps must be JSON objects of bounded size.
pub fn validate_attributes(value: &serde_json::Value) -> Result<(), ValidationError> {
    match value.as_object() {
        Some(map) if map.len() <= MAX_ATTRIBUTE_KEYS => Ok(()),
        Some(_) => Err(error("attributes", "has too many keys")),
        None => Err(error("attributes", "must be a JSON object")),
    }
}

/// Flatten `validator` output into one deterministic, human-readable line.
///
/// ```text
/// email: invalid; title: must not be blank
/// ```
pub fn describe_errors(errors: &ValidationErrors) -> String {
    let mut parts: Vec<String> = errors
        .field_errors()
        .into_iter()
        .map(|(field, errs)| {
            let reasons: Vec<String> = errs
                .iter()
                .map(|e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => e.code.to_string(),
                })
                .collect();
            format!("{field}: {}", reasons.join(", "))
        })
        .collect();
    parts.sort();
    parts.join("; ")
}
