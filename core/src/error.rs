//! Error types for the todo API client.
//!
//! # Design
//! Every failed call lands in exactly one of three variants, decided by how
//! far the request got: the server answered with an error status, the
//! request left but nothing came back, or the client failed on its own side
//! (building, encoding or decoding). Each variant keeps its original cause.
//!
//! Messages are deliberately English. Callers that localise should branch on
//! `ApiError::kind()` and the structured fields rather than parse the text.

use std::num::ParseIntError;

/// Boxed cause carried by transport and codec failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Placeholder used when an error response carries no `detail`.
pub const UNKNOWN_DETAIL: &str = "unknown error";

/// Fixed message for requests that never got a response.
pub const NO_RESPONSE_MESSAGE: &str =
    "cannot connect to server, check that the backend service is running";

/// Errors returned by `TodoClient`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A response arrived with a non-2xx status.
    #[error("error status: {status}, detail: {}", .detail.as_deref().unwrap_or(UNKNOWN_DETAIL))]
    Server {
        status: u16,
        /// The `detail` field of the error body, if any.
        detail: Option<String>,
        /// Raw response body.
        body: String,
    },

    /// The request was sent but no response arrived: unreachable host,
    /// refused connection, timeout, or a connection dropped mid-body.
    #[error("{}", NO_RESPONSE_MESSAGE)]
    NoResponse {
        #[source]
        source: BoxError,
    },

    /// The client could not build or dispatch the request, or could not make
    /// sense of the payload.
    #[error("{source}")]
    Request {
        #[source]
        source: BoxError,
    },
}

/// Coarse classification of an `ApiError`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Server,
    NoResponse,
    Request,
}

impl ApiError {
    pub fn no_response(source: impl Into<BoxError>) -> Self {
        ApiError::NoResponse {
            source: source.into(),
        }
    }

    pub fn request(source: impl Into<BoxError>) -> Self {
        ApiError::Request {
            source: source.into(),
        }
    }

    /// Build a `Server` error from a status and raw body, pulling `detail`
    /// out of the body when it is a JSON object that has one.
    pub fn from_status(status: u16, body: String) -> Self {
        let detail = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|value| match value.get("detail")? {
                serde_json::Value::Null => None,
                serde_json::Value::String(text) => Some(text.clone()),
                other => Some(other.to_string()),
            });
        ApiError::Server {
            status,
            detail,
            body,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Server { .. } => ErrorKind::Server,
            ApiError::NoResponse { .. } => ErrorKind::NoResponse,
            ApiError::Request { .. } => ErrorKind::Request,
        }
    }

    /// HTTP status for `Server` errors.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Server { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Errors raised while reading `ClientConfig` from the environment.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var}={value:?} is not a whole number of milliseconds")]
    InvalidTimeout {
        var: &'static str,
        value: String,
        #[source]
        source: ParseIntError,
    },
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn server_error_message_carries_status_and_detail() {
        let err = ApiError::from_status(404, r#"{"detail":"not found"}"#.to_string());
        assert_eq!(err.to_string(), "error status: 404, detail: not found");
        assert_eq!(err.status(), Some(404));
    }

    #[test]
    fn server_error_without_detail_uses_placeholder() {
        let err = ApiError::from_status(500, r#"{"error":"boom"}"#.to_string());
        assert_eq!(err.to_string(), "error status: 500, detail: unknown error");
    }

    #[test]
    fn server_error_with_plain_text_body_uses_placeholder() {
        let err = ApiError::from_status(502, "Bad Gateway".to_string());
        assert!(matches!(&err, ApiError::Server { detail: None, body, .. } if body == "Bad Gateway"));
        assert!(err.to_string().ends_with(UNKNOWN_DETAIL));
    }

    #[test]
    fn null_detail_counts_as_missing() {
        let err = ApiError::from_status(400, r#"{"detail":null}"#.to_string());
        assert!(err.to_string().ends_with(UNKNOWN_DETAIL));
    }

    #[test]
    fn structured_detail_is_rendered_as_json() {
        let err = ApiError::from_status(422, r#"{"detail":[{"loc":["query","keyword"]}]}"#.to_string());
        assert_eq!(
            err.to_string(),
            r#"error status: 422, detail: [{"loc":["query","keyword"]}]"#
        );
    }

    #[test]
    fn no_response_message_ignores_the_cause() {
        let err = ApiError::no_response("connection refused (os error 111)");
        assert_eq!(err.to_string(), NO_RESPONSE_MESSAGE);
        assert_eq!(err.kind(), ErrorKind::NoResponse);
        assert_eq!(
            err.source().unwrap().to_string(),
            "connection refused (os error 111)"
        );
    }

    #[test]
    fn request_error_message_is_the_cause() {
        let cause = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let expected = cause.to_string();
        let err = ApiError::request(cause);
        assert_eq!(err.to_string(), expected);
        assert_eq!(err.kind(), ErrorKind::Request);
        assert_eq!(err.status(), None);
    }
}
