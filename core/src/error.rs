//! Error types for the Remo API client.
//!
//! # Design
//! The remote service has a single failure kind: a non-2xx response. It lands
//! in `HttpError` with the raw status code and body. The remaining variants
//! cover local failures on either side of the round trip.

use thiserror::Error;

/// Errors returned by `RemoClient`, `Transport`, and `Remo`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server returned a non-2xx status.
    #[error("HTTP {status}: {body}")]
    HttpError { status: u16, body: String },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    DeserializationError(String),

    /// The request parameters could not be form- or JSON-encoded.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The transport could not complete the round trip.
    #[error("transport failed: {0}")]
    Transport(String),
}

impl ApiError {
    /// HTTP status carried by the error, if the server answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::HttpError { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn http_error_display_includes_status_and_body() {
        let err = ApiError::HttpError {
            status: 401,
            body: r#"{"code":401001}"#.to_string(),
        };
        assert_eq!(err.to_string(), r#"HTTP 401: {"code":401001}"#);
        assert_eq!(err.status(), Some(401));
    }

    #[test]
    fn local_errors_have_no_status() {
        assert_eq!(ApiError::Transport("refused".into()).status(), None);
        assert_eq!(ApiError::DeserializationError("eof".into()).status(), None);
    }
}
