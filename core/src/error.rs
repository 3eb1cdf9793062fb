//! Error types for the pet-store gateway.
//!
//! # Design
//! Every expected failure of an upstream call lands in one `GatewayError`
//! variant, so gateway operations return `GatewayResult<T>` and never panic.
//! An upstream 404 is an ordinary `UpstreamHttp` error: callers that care
//! about "not found" check `status()`.
//!
//! `envelope()` flattens any variant into the `{error, status?, details?}`
//! shape the front end renders.

use std::path::PathBuf;

use serde::Serialize;
use serde_json::Value;
use validator::ValidationErrors;

pub type GatewayResult<T> = Result<T, GatewayError>;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Base URL or API key missing. No request was attempted.
    #[error("{0}")]
    Configuration(String),

    /// A required field is absent or invalid. Raised before any I/O.
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The request never produced an HTTP response (DNS, connect, timeout).
    #[error("{message}")]
    Network { message: String, details: String },

    /// The upstream answered with a non-2xx status.
    #[error("{message} (HTTP {status})")]
    UpstreamHttp {
        message: String,
        status: u16,
        /// Parsed JSON body when the body is JSON, the raw text otherwise.
        details: Value,
    },

    /// The local upload file is missing or unreadable.
    #[error("{message}")]
    File { message: String, path: PathBuf },

    /// A 2xx response whose body does not match the expected schema.
    #[error("Unexpected upstream response: {0}")]
    Decode(String),

    /// The outbound payload could not be serialized.
    #[error("Failed to serialize request: {0}")]
    Encode(String),
}

/// Serializable error shape handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorEnvelope {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

impl GatewayError {
    /// Human-readable message without the status suffix.
    pub fn message(&self) -> String {
        match self {
            GatewayError::Network { message, .. }
            | GatewayError::UpstreamHttp { message, .. }
            | GatewayError::File { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }

    /// HTTP status of the upstream response, when there was one.
    pub fn status(&self) -> Option<u16> {
        match self {
            GatewayError::UpstreamHttp { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn details(&self) -> Option<Value> {
        match self {
            GatewayError::Network { details, .. } => Some(Value::String(details.clone())),
            GatewayError::UpstreamHttp { details, .. } => Some(details.clone()),
            GatewayError::File { path, .. } => Some(Value::String(path.display().to_string())),
            _ => None,
        }
    }

    pub fn envelope(&self) -> ErrorEnvelope {
        ErrorEnvelope {
            error: self.message(),
            status: self.status(),
            details: self.details(),
        }
    }
}

impl From<ValidationErrors> for GatewayError {
    fn from(errors: ValidationErrors) -> Self {
        GatewayError::Validation(validation_message(&errors))
    }
}

/// One sentence per failed rule, fields in name order.
pub fn validation_message(errors: &ValidationErrors) -> String {
    let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
    fields.sort_by_key(|(field, _)| *field);
    fields
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(message) => message.to_string(),
                None => format!("\"{field}\" is invalid."),
            })
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn upstream_envelope_carries_status_and_details() {
        let err = GatewayError::UpstreamHttp {
            message: "Failed to fetch pet.".to_string(),
            status: 404,
            details: json!({"code": 1, "message": "Pet not found"}),
        };
        let envelope = serde_json::to_value(err.envelope()).unwrap();
        assert_eq!(
            envelope,
            json!({
                "error": "Failed to fetch pet.",
                "status": 404,
                "details": {"code": 1, "message": "Pet not found"}
            })
        );
        assert_eq!(err.to_string(), "Failed to fetch pet. (HTTP 404)");
    }

    #[test]
    fn configuration_envelope_has_only_message() {
        let err = GatewayError::Configuration("Missing base URL.".to_string());
        let envelope = serde_json::to_value(err.envelope()).unwrap();
        assert_eq!(envelope, json!({"error": "Missing base URL."}));
    }

    #[test]
    fn file_error_reports_path_as_details() {
        let err = GatewayError::File {
            message: "Image file is not readable.".to_string(),
            path: PathBuf::from("/tmp/missing.png"),
        };
        assert_eq!(err.details(), Some(json!("/tmp/missing.png")));
        assert_eq!(err.status(), None);
    }

    #[test]
    fn validation_errors_become_one_message() {
        let mut errors = ValidationErrors::new();
        let mut status = validator::ValidationError::new("status");
        status.message = Some("\"lost\" is not a valid status.".into());
        errors.add("status", status);
        errors.add("name", validator::ValidationError::new("required"));

        let err = GatewayError::from(errors);
        assert!(matches!(err, GatewayError::Validation(_)));
        assert_eq!(
            err.message(),
            "Validation failed: \"name\" is invalid. \"lost\" is not a valid status."
        );
    }
}
