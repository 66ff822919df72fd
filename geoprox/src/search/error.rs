//! Search errors.

use super::types::SearchProgress;
use crate::decode::DecodeError;
use crate::wfs::WfsError;
use thiserror::Error;

/// Reasons a search stops before producing a result.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SearchError {
    /// The request could not be sent or no response arrived
    #[error("Network error: {message}")]
    Network { message: String, raw: Option<String> },

    #[error("Expected a {expected} response but the server sent '{actual}'")]
    ContentTypeMismatch {
        expected: String,
        actual: String,
        raw: String,
    },

    #[error("Failed to parse server response: {message}")]
    Parse { message: String, raw: String },

    /// Non-2xx status or an OGC exception report
    #[error("Server error: {message}")]
    ServerException { message: String, raw: String },

    #[error("Invalid search request: {0}")]
    InvalidRequest(String),

    #[error("Search cancelled")]
    Cancelled,

    /// The search task panicked
    #[error("Search task failed: {0}")]
    TaskFailed(String),
}

impl SearchError {
    /// Response text kept for diagnostics, if any.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            SearchError::Network { raw, .. } => raw.as_deref(),
            SearchError::ContentTypeMismatch { raw, .. }
            | SearchError::Parse { raw, .. }
            | SearchError::ServerException { raw, .. } => Some(raw.as_str()),
            SearchError::InvalidRequest(_)
            | SearchError::Cancelled
            | SearchError::TaskFailed(_) => None,
        }
        .filter(|raw| !raw.is_empty())
    }

    /// Wraps a decoder failure together with the payload it failed on.
    pub fn from_decode(error: DecodeError, raw: &str) -> Self {
        match error {
            DecodeError::ServerException(message) => SearchError::ServerException {
                message,
                raw: raw.to_string(),
            },
            other => SearchError::Parse {
                message: other.to_string(),
                raw: raw.to_string(),
            },
        }
    }
}

impl From<WfsError> for SearchError {
    fn from(error: WfsError) -> Self {
        match error {
            WfsError::InvalidUrl { .. } => SearchError::InvalidRequest(error.to_string()),
            WfsError::Http(e) => SearchError::Network {
                message: e.to_string(),
                raw: None,
            },
            WfsError::Status { message, raw, .. } | WfsError::Exception { message, raw } => {
                SearchError::ServerException { message, raw }
            }
            WfsError::ContentType {
                expected,
                actual,
                raw,
            } => SearchError::ContentTypeMismatch {
                expected,
                actual,
                raw,
            },
            WfsError::Parse { message, raw } => SearchError::Parse { message, raw },
            WfsError::NoLayers => SearchError::ServerException {
                message: error.to_string(),
                raw: String::new(),
            },
        }
    }
}

/// A failed search together with everything gathered before the failure.
#[derive(Debug, Clone, Error)]
#[error("{error}")]
pub struct SearchFailure {
    pub error: SearchError,
    pub partial: SearchProgress,
}

impl SearchFailure {
    pub fn new(error: SearchError, partial: SearchProgress) -> Self {
        Self { error, partial }
    }

    pub fn is_cancelled(&self) -> bool {
        self.error == SearchError::Cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wfs::HttpError;

    #[test]
    fn test_wfs_error_mapping() {
        let err: SearchError = WfsError::Http(HttpError::Timeout {
            url: "http://x".to_string(),
        })
        .into();
        assert!(matches!(err, SearchError::Network { raw: None, .. }));

        let err: SearchError = WfsError::ContentType {
            expected: "JSON".to_string(),
            actual: "text/html".to_string(),
            raw: "<html/>".to_string(),
        }
        .into();
        assert_eq!(err.raw_response(), Some("<html/>"));
        assert_eq!(
            err.to_string(),
            "Expected a JSON response but the server sent 'text/html'"
        );
    }

    #[test]
    fn test_decode_error_keeps_payload() {
        let err = SearchError::from_decode(DecodeError::Xml("unexpected EOF".to_string()), "<a>");
        assert!(matches!(err, SearchError::Parse { .. }));
        assert_eq!(err.raw_response(), Some("<a>"));

        let err = SearchError::from_decode(DecodeError::ServerException("bad".to_string()), "<x/>");
        assert_eq!(err.to_string(), "Server error: bad");
    }

    #[test]
    fn test_cancelled_has_no_raw() {
        assert_eq!(SearchError::Cancelled.raw_response(), None);
    }
}
