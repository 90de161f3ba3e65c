//! Error types for the Elasticsearch REST client.
//!
//! # Design
//! `NotFound` gets a dedicated variant because callers frequently distinguish
//! "the index or document does not exist" from "the server returned an
//! unexpected status." Every other non-2xx response lands in `Http` with the
//! raw status code and body for debugging. Status-based variants are only
//! produced by the status-checked call path (`Client::run`,
//! `HttpResponse::error_for_status`); `Client::call` hands every status back
//! as data and fails only on `Transport`.

use thiserror::Error;

/// Errors returned while building or executing a request.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request never produced a response: connection refused, DNS
    /// failure, broken pipe, unreadable response body.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The server returned 404.
    #[error("resource not found: {body}")]
    NotFound { body: String },

    /// The server returned a non-2xx status other than 404.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The request body could not be serialized.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// The client configuration could not be loaded.
    #[error("invalid configuration: {0}")]
    Config(String),

    /// Strict building rejected option keys the operation does not know.
    #[error("unrecognized parameters: {}", .0.join(", "))]
    UnrecognizedParams(Vec<String>),
}

impl ApiError {
    /// HTTP status carried by the error, if it came from a response.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::NotFound { .. } => Some(404),
            ApiError::Http { status, .. } => Some(*status),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_is_exposed_for_response_errors() {
        assert_eq!(ApiError::NotFound { body: String::new() }.status(), Some(404));
        let err = ApiError::Http {
            status: 503,
            body: "unavailable".to_string(),
        };
        assert_eq!(err.status(), Some(503));
        assert_eq!(ApiError::Transport("refused".to_string()).status(), None);
    }

    #[test]
    fn unrecognized_params_lists_keys() {
        let err = ApiError::UnrecognizedParams(vec!["bogus".to_string(), "typo".to_string()]);
        assert_eq!(err.to_string(), "unrecognized parameters: bogus, typo");
    }
}
