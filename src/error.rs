use serde_json::Value;
use strum::{Display, EnumString};
use thiserror::Error;

use crate::configuration::ConfigurationError;
use crate::transport::TransportError;

/// Error types that can occur while executing a request against the Management API
#[derive(Debug, Error)]
pub enum ClientError {
    /// The transport failed before a response was received
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
    /// The API answered with an error payload and `raise_errors` is enabled
    #[error("{0}")]
    Api(ApiError),
    /// A successful response carried a body that is not valid JSON
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
    /// A header value could not be encoded
    #[error("invalid value for header {name:?}")]
    InvalidHeader { name: String },
    #[error("configuration error: {0}")]
    Configuration(#[from] ConfigurationError),
}

impl ClientError {
    pub fn is_api_error(&self) -> bool {
        matches!(self, ClientError::Api(_))
    }

    /// The API error carried by this error, if any
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            ClientError::Api(error) => Some(error),
            _ => None,
        }
    }
}

/// The error identifiers the Management API reports in `sys.id` of an error payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString)]
pub enum ApiErrorKind {
    BadRequest,
    Unauthorized,
    AccessDenied,
    NotFound,
    VersionMismatch,
    ValidationFailed,
    RateLimitExceeded,
    ServerError,
    ServiceUnavailable,
    Unknown,
}

impl ApiErrorKind {
    /// Best guess of the error kind for a status code without a readable payload
    pub fn from_status(status: u16) -> ApiErrorKind {
        match status {
            400 => ApiErrorKind::BadRequest,
            401 => ApiErrorKind::Unauthorized,
            403 => ApiErrorKind::AccessDenied,
            404 => ApiErrorKind::NotFound,
            409 => ApiErrorKind::VersionMismatch,
            422 => ApiErrorKind::ValidationFailed,
            429 => ApiErrorKind::RateLimitExceeded,
            503 => ApiErrorKind::ServiceUnavailable,
            500..=599 => ApiErrorKind::ServerError,
            _ => ApiErrorKind::Unknown,
        }
    }
}

/// An application level error reported by the API.
///
/// Produced by the response interpreter both for error payloads and for
/// non-success status codes whose body could not be read as an error payload.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("{kind} (HTTP {status}): {message}")]
pub struct ApiError {
    pub kind: ApiErrorKind,
    pub status: u16,
    pub message: String,
    pub request_id: Option<String>,
    pub details: Option<Value>,
}

impl ApiError {
    /// Read an error payload of the shape `{"sys": {"type": "Error", "id": ...}, "message": ...}`.
    ///
    /// Returns `None` when the value is not an error payload.
    pub fn from_payload(status: u16, payload: &Value) -> Option<ApiError> {
        let sys = payload.get("sys")?;
        if sys.get("type").and_then(Value::as_str) != Some("Error") {
            return None;
        }

        let kind = sys
            .get("id")
            .and_then(Value::as_str)
            .and_then(|id| id.parse::<ApiErrorKind>().ok())
            .unwrap_or_else(|| ApiErrorKind::from_status(status));

        let message = payload
            .get("message")
            .and_then(Value::as_str)
            .map(str::to_string)
            .unwrap_or_else(|| kind.to_string());

        Some(ApiError {
            kind,
            status,
            message,
            request_id: payload
                .get("requestId")
                .and_then(Value::as_str)
                .map(str::to_string),
            details: payload.get("details").cloned(),
        })
    }

    /// Synthesize an error from the status code and raw body alone
    pub fn from_status(status: u16, body: &str) -> ApiError {
        let message = if body.trim().is_empty() {
            format!("request failed with status {status}")
        } else {
            body.to_string()
        };
        ApiError {
            kind: ApiErrorKind::from_status(status),
            status,
            message,
            request_id: None,
            details: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_from_payload_reads_sys_id_and_message() {
        let payload = json!({
            "sys": {"type": "Error", "id": "VersionMismatch"},
            "message": "version mismatch",
            "requestId": "abc-123"
        });
        let error = ApiError::from_payload(409, &payload).unwrap();
        assert_eq!(error.kind, ApiErrorKind::VersionMismatch);
        assert_eq!(error.message, "version mismatch");
        assert_eq!(error.request_id.as_deref(), Some("abc-123"));
        assert!(error.details.is_none());
    }

    #[test]
    fn test_from_payload_unknown_id_falls_back_to_status() {
        let payload = json!({"sys": {"type": "Error", "id": "SomethingNew"}});
        let error = ApiError::from_payload(404, &payload).unwrap();
        assert_eq!(error.kind, ApiErrorKind::NotFound);
        assert_eq!(error.message, "NotFound");
    }

    #[test]
    fn test_from_payload_ignores_non_error_payloads() {
        let payload = json!({"sys": {"type": "Space", "id": "abc"}});
        assert!(ApiError::from_payload(200, &payload).is_none());
        assert!(ApiError::from_payload(500, &json!([1, 2, 3])).is_none());
    }

    #[test]
    fn test_from_status() {
        let error = ApiError::from_status(503, "");
        assert_eq!(error.kind, ApiErrorKind::ServiceUnavailable);
        assert_eq!(error.message, "request failed with status 503");
        assert_eq!(ApiErrorKind::from_status(502), ApiErrorKind::ServerError);
        assert_eq!(ApiErrorKind::from_status(418), ApiErrorKind::Unknown);
    }

    #[test]
    fn test_client_error_api_helpers() {
        let error = ClientError::Api(ApiError::from_status(401, "nope"));
        assert!(error.is_api_error());
        assert_eq!(error.api_error().unwrap().kind, ApiErrorKind::Unauthorized);

        let error = ClientError::InvalidHeader {
            name: "Authorization".to_string(),
        };
        assert!(!error.is_api_error());
        assert!(error.api_error().is_none());
    }
}
