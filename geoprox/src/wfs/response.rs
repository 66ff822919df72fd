//! Validation of raw WFS responses before decoding.

use super::{HttpResponse, WfsError};
use crate::decode::exception_text;
use crate::dialect::ServerDialect;

/// Checks status and content type, returning the body for the decoder.
///
/// A non-2xx status is reported with the OGC exception text when the body
/// carries one. A missing `Content-Type` header counts as a mismatch.
pub fn check_response(response: HttpResponse, dialect: ServerDialect) -> Result<String, WfsError> {
    if !response.is_success() {
        let message = exception_text(&response.body)
            .unwrap_or_else(|| format!("HTTP {}", response.status));
        return Err(WfsError::Status {
            status: response.status,
            message,
            raw: response.body,
        });
    }

    match response.content_type.as_deref() {
        Some(ct) if dialect.accepts_content_type(ct) => Ok(response.body),
        other => Err(WfsError::ContentType {
            expected: dialect.expected_content().to_string(),
            actual: other.unwrap_or("none").to_string(),
            raw: response.body,
        }),
    }
}
