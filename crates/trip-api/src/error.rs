//! API Errors
//!
//! Authentication failures, backend validation errors (shown inline per
//! field), other HTTP failures, and transport/decoding problems.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;
use thiserror::Error;

/// Common result type for API calls
pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    /// Still 401 after the session refresh, or the refresh itself failed
    #[error("not authenticated")]
    Unauthorized,
    /// 400 with per-field messages
    #[error("validation failed: {0}")]
    Validation(FieldErrors),
    /// Any other non-success status
    #[error("request failed with status {status}: {message}")]
    Status { status: u16, message: String },
    #[error("transport error: {0}")]
    Transport(String),
    #[error("invalid response: {0}")]
    Decode(String),
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ApiError {
    /// Message suitable for showing to the user
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Unauthorized => "Your session has expired. Please sign in again.".to_string(),
            ApiError::Validation(errors) => errors.message().unwrap_or_else(|| fallback.to_string()),
            ApiError::Status { message, .. } if !message.is_empty() => message.clone(),
            _ => fallback.to_string(),
        }
    }

    /// Field-level messages, when the backend rejected the input
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            ApiError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

/// Validation messages from a 400 response body
///
/// The backend answers `{"field": ["message", ...], "detail": "...",
/// "non_field_errors": [...]}`; trip actions use `"error"` instead of
/// `"detail"`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FieldErrors {
    pub fields: BTreeMap<String, Vec<String>>,
    pub general: Vec<String>,
}

impl FieldErrors {
    pub fn from_body(body: &str) -> Self {
        let mut errors = FieldErrors::default();
        match serde_json::from_str::<Value>(body) {
            Ok(Value::Object(map)) => {
                for (key, value) in map {
                    let messages = messages(&value);
                    if messages.is_empty() {
                        continue;
                    }
                    if matches!(key.as_str(), "detail" | "error" | "non_field_errors") {
                        errors.general.extend(messages);
                    } else {
                        errors.fields.insert(key, messages);
                    }
                }
            }
            Ok(other) => errors.general.extend(messages(&other)),
            Err(_) => {
                let text = body.trim();
                if !text.is_empty() {
                    errors.general.push(text.to_string());
                }
            }
        }
        errors
    }

    /// Messages for one form field
    pub fn field(&self, name: &str) -> Option<&[String]> {
        self.fields.get(name).map(Vec::as_slice)
    }

    /// First message worth showing, general messages first
    pub fn message(&self) -> Option<String> {
        self.general
            .first()
            .cloned()
            .or_else(|| {
                self.fields
                    .iter()
                    .find_map(|(field, msgs)| msgs.first().map(|m| format!("{}: {}", field, m)))
            })
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty() && self.general.is_empty()
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<String> = self.general.clone();
        for (field, msgs) in &self.fields {
            parts.push(format!("{}: {}", field, msgs.join(" ")));
        }
        write!(f, "{}", parts.join("; "))
    }
}

/// Flatten a JSON error value into plain messages
fn messages(value: &Value) -> Vec<String> {
    match value {
        Value::String(s) => vec![s.clone()],
        Value::Array(values) => values.iter().flat_map(messages).collect(),
        Value::Null => Vec::new(),
        other => vec![other.to_string()],
    }
}

/// Best-effort message of a non-validation error body
pub(crate) fn detail_message(body: &str) -> String {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("detail").or_else(|| map.get("error")) {
            Some(Value::String(detail)) => detail.clone(),
            _ => body.trim().to_string(),
        },
        _ => body.trim().chars().take(200).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_field_errors_from_drf_body() {
        let errors = FieldErrors::from_body(
            r#"{"name": ["This field is required."], "quantity": ["Ensure this value is greater than 0."], "non_field_errors": ["Duplicate item."]}"#,
        );

        assert_eq!(errors.field("name"), Some(&["This field is required.".to_string()][..]));
        assert!(errors.field("quantity").is_some());
        assert_eq!(errors.general, vec!["Duplicate item."]);
        assert_eq!(errors.message().as_deref(), Some("Duplicate item."));
    }

    #[test]
    fn test_field_errors_from_plain_text() {
        let errors = FieldErrors::from_body("Bad Request");
        assert!(errors.fields.is_empty());
        assert_eq!(errors.general, vec!["Bad Request"]);
    }

    #[test]
    fn test_detail_is_general() {
        let errors = FieldErrors::from_body(r#"{"detail": "Trip is archived."}"#);
        assert_eq!(errors.message().as_deref(), Some("Trip is archived."));
    }

    #[test]
    fn test_user_message_fallback() {
        let error = ApiError::Transport("connection reset".into());
        assert_eq!(error.user_message("Please try again later."), "Please try again later.");

        let error = ApiError::Validation(FieldErrors::from_body(r#"{"email": ["Enter a valid email address."]}"#));
        assert_eq!(error.user_message("x"), "email: Enter a valid email address.");
    }

    #[test]
    fn test_detail_message() {
        assert_eq!(detail_message(r#"{"detail": "Not found."}"#), "Not found.");
        assert_eq!(
            detail_message(r#"{"error": "This trip is not public."}"#),
            "This trip is not public."
        );
        assert_eq!(detail_message("<html>oops</html>"), "<html>oops</html>");
    }
}
