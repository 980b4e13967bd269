//! Application-wide error types.

use thiserror::Error;

use crate::api::RpcMethod;

/// Application-wide result type.
pub type Result<T> = std::result::Result<T, Error>;

/// Application-wide error type.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Transport failure: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("NZBGet API response {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("Malformed {method} response: {source}")]
    MalformedEnvelope {
        method: RpcMethod,
        #[source]
        source: DecodeError,
    },

    #[error("Decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("Server id {id} outside configured range 1..={len}")]
    OutOfRange { id: i64, len: usize },

    #[error("Collection task failed: {0}")]
    Task(String),

    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    pub fn malformed(method: RpcMethod, source: impl Into<DecodeError>) -> Self {
        Self::MalformedEnvelope {
            method,
            source: source.into(),
        }
    }

    /// Short machine-friendly name of the failure class.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport(_) => "transport",
            Self::HttpStatus(_) => "http_status",
            Self::MalformedEnvelope { .. } => "malformed_envelope",
            Self::Decode(_) => "decode",
            Self::OutOfRange { .. } => "out_of_range",
            Self::Task(_) => "task",
            Self::Configuration(_) => "configuration",
            Self::Io(_) => "io",
        }
    }
}

/// Field-level decoding failure for an upstream payload.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("{field}: value {value} does not fit a 32-bit half")]
    SplitHalf { field: &'static str, value: i64 },

    #[error("Status {0:?} has no '/' separator")]
    CompositeStatus(String),

    #[error("{field}: timestamp {value} out of range")]
    Timestamp { field: &'static str, value: i64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_kind() {
        let err = Error::HttpStatus(reqwest::StatusCode::UNAUTHORIZED);
        assert_eq!(err.kind(), "http_status");
        assert_eq!(err.to_string(), "NZBGet API response 401 Unauthorized");

        let err = Error::OutOfRange { id: 4, len: 2 };
        assert_eq!(err.kind(), "out_of_range");
        assert!(err.to_string().contains("1..=2"));
    }

    #[test]
    fn test_malformed_wraps_decode_error() {
        let err = Error::malformed(
            RpcMethod::History,
            DecodeError::CompositeStatus("SUCCESS".to_string()),
        );
        assert_eq!(err.kind(), "malformed_envelope");
        assert!(err.to_string().starts_with("Malformed history response"));
    }
}
