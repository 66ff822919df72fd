//! OGC WFS 2.0 transport.
//!
//! URL construction for `GetFeature` and `GetCapabilities`, validation of
//! the raw responses and the [`AsyncHttpClient`] seam everything else is
//! tested through.

mod capabilities;
mod http;
mod request;
mod response;

pub use capabilities::{capabilities_url, fetch_layers, parse_layers};
pub use http::{AsyncHttpClient, AsyncReqwestClient, HttpError, HttpResponse, DEFAULT_TIMEOUT_SECS};
pub use request::{get_feature_url, GetFeature, WFS_SRS, WFS_VERSION};
pub use response::check_response;

#[cfg(test)]
pub use http::tests::{MockAsyncHttpClient, RecordedRequest};

use thiserror::Error;

/// Errors raised by the WFS transport layer.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum WfsError {
    #[error("Invalid server URL '{url}': {message}")]
    InvalidUrl { url: String, message: String },

    #[error("{0}")]
    Http(#[from] HttpError),

    /// Non-2xx status; `message` is the OGC exception text when present
    #[error("{message}")]
    Status {
        status: u16,
        message: String,
        raw: String,
    },

    #[error("Unexpected content type: expected {expected}, got {actual}")]
    ContentType {
        expected: String,
        actual: String,
        raw: String,
    },

    #[error("Server reported an exception: {message}")]
    Exception { message: String, raw: String },

    #[error("Failed to parse capabilities: {message}")]
    Parse { message: String, raw: String },

    #[error("Server advertises no feature types")]
    NoLayers,
}

impl WfsError {
    /// Raw response body kept for diagnostics, if any.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            WfsError::Status { raw, .. }
            | WfsError::ContentType { raw, .. }
            | WfsError::Exception { raw, .. }
            | WfsError::Parse { raw, .. } => Some(raw),
            _ => None,
        }
    }
}
