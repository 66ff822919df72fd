//! Language model collaborators.
//!
//! Two optional helpers sit on top of the search: turning a free-text
//! instruction into search parameters, and judging a finished search
//! against a rule written in plain language. Both talk to an
//! OpenAI-compatible chat-completions endpoint and never alter computed
//! distances.

mod client;
mod compliance;
mod extraction;
mod json;
mod prompts;

pub use client::{
    AssistConfig, ChatClient, DEFAULT_AI_ENDPOINT, DEFAULT_AI_MODEL, DEFAULT_COMPLIANCE_MAX_TOKENS,
    DEFAULT_EXTRACTION_MAX_TOKENS, DEFAULT_TEMPERATURE,
};
pub use compliance::{
    check_compliance, parse_assessment, ComplianceAssessment, ComplianceStatus, ComplianceSummary,
    FeatureDetail, MAX_FEATURE_DETAILS,
};
pub use extraction::{extract_parameters, parse_extraction, ExtractedParameters};
pub use prompts::{compliance_prompt, extraction_prompt};

use thiserror::Error;

/// Errors from the language model collaborators.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum AssistError {
    /// The endpoint answered with a non-2xx status
    #[error("AI request failed with status {status}: {message}")]
    AiRequest { status: u16, message: String },

    /// The answer could not be read as the expected JSON shape
    #[error("Unexpected AI response: {0}")]
    AiResponseShape(String),

    #[error("AI request could not be sent: {0}")]
    Transport(String),

    #[error("No API key configured (set [ai] api_key or GEOPROX_API_KEY)")]
    MissingApiKey,
}
