//! Request-shape validation helpers shared by the auth handlers.

use once_cell::sync::Lazy;
use regex::Regex;
use validator::Validate;

use crate::services::ServiceError;

/// Accepted password alphabet and length window. Length is additionally
/// bounded below by the 8-character minimum on the request DTOs.
pub static PASSWORD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9@#$%^&*!_]{3,30}$").expect("password regex"));

/// Loose email shape test used to decide whether a login identifier should
/// be looked up as an email address or as a username.
pub static EMAIL_SHAPE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email regex"));

pub fn looks_like_email(identifier: &str) -> bool {
    EMAIL_SHAPE_RE.is_match(identifier)
}

/// Character-class check applied on top of the derive-based length rules.
pub fn require_password_policy(password: &str) -> Result<(), ServiceError> {
    if !PASSWORD_RE.is_match(password) {
        return Err(ServiceError::validation(
            "Password may only contain letters, digits and @#$%^&*!_ (3-30 chars)",
        ));
    }
    Ok(())
}

/// Run derive-based validation and flatten the failures into one
/// client-facing message.
pub fn check<T: Validate>(input: &T) -> Result<(), ServiceError> {
    input.validate().map_err(|errors| {
        let mut parts: Vec<String> = Vec::new();
        for (field, failures) in errors.field_errors() {
            for failure in failures {
                let detail = failure
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("invalid value ({})", failure.code));
                parts.push(format!("{field}: {detail}"));
            }
        }
        parts.sort();
        ServiceError::Validation(parts.join("; "))
    })
}
