//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and appropriate exit codes.

use geoprox::assist::AssistError;
use geoprox::config::ConfigFileError;
use geoprox::search::SearchError;
use geoprox::wfs::{HttpError, WfsError};
use std::fmt;
use std::process;

/// Longest raw server response echoed after an error.
const RAW_PREVIEW_CHARS: usize = 600;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to create the HTTP client
    HttpClient(HttpError),
    /// A distance search failed
    Search(SearchError),
    /// Listing layers failed
    Layers(WfsError),
    /// A language model request failed
    Assist(AssistError),
    /// Failed to render output
    Output(String),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        self.report();
        process::exit(1)
    }

    /// Print the error and any hints to stderr.
    pub fn report(&self) {
        eprintln!("Error: {}", self);

        match self {
            CliError::Search(e) => print_raw(e.raw_response()),
            CliError::Layers(e) => print_raw(e.raw_response()),
            CliError::Assist(AssistError::MissingApiKey) => {
                eprintln!();
                eprintln!("To use AI features:");
                eprintln!("  1. Get an API key from your chat completions provider");
                eprintln!("  2. export GEOPROX_API_KEY=<key>, or set api_key in the [ai] section");
                eprintln!("     of {}", geoprox::config::config_file_path().display());
            }
            _ => {}
        }
    }
}

fn print_raw(raw: Option<&str>) {
    let Some(raw) = raw else {
        return;
    };
    let preview: String = raw.chars().take(RAW_PREVIEW_CHARS).collect();
    eprintln!();
    eprintln!("Server response:");
    eprintln!("{}", preview.trim());
    if raw.chars().count() > RAW_PREVIEW_CHARS {
        eprintln!("... ({} characters total)", raw.chars().count());
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::HttpClient(e) => write!(f, "{}", e),
            CliError::Search(e) => write!(f, "Search failed: {}", e),
            CliError::Layers(e) => write!(f, "Could not list layers: {}", e),
            CliError::Assist(e) => write!(f, "AI request failed: {}", e),
            CliError::Output(msg) => write!(f, "Failed to write output: {}", msg),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::HttpClient(e) => Some(e),
            CliError::Search(e) => Some(e),
            CliError::Layers(e) => Some(e),
            CliError::Assist(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<SearchError> for CliError {
    fn from(e: SearchError) -> Self {
        CliError::Search(e)
    }
}

impl From<AssistError> for CliError {
    fn from(e: AssistError) -> Self {
        CliError::Assist(e)
    }
}

impl From<HttpError> for CliError {
    fn from(e: HttpError) -> Self {
        CliError::HttpClient(e)
    }
}
