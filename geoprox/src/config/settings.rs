//! Settings structs for all configuration sections.
//!
//! Each struct represents one `[section]` of the INI config file.
//! These are pure data types with no parsing or serialization logic.

use std::path::PathBuf;
use std::time::Duration;

use super::defaults::API_KEY_ENV;
use super::servers::{find_server, ServerConfig};
use crate::assist::AssistConfig;
use crate::search::SearchSettings;

/// Complete application configuration loaded from config.ini.
#[derive(Debug, Clone)]
pub struct ConfigFile {
    pub search: SearchDefaults,
    pub http: HttpSettings,
    pub ai: AiSettings,
    pub logging: LoggingSettings,
    /// Built-in servers followed by `[server.<id>]` additions
    pub servers: Vec<ServerConfig>,
}

/// `[search]` section.
#[derive(Debug, Clone)]
pub struct SearchDefaults {
    /// Search radius in metres
    pub max_distance: f64,
    /// Features requested per GetFeature page
    pub page_size: usize,
    /// Pause between pages in milliseconds
    pub page_delay_ms: u64,
    /// Server id used when none is given
    pub default_server: String,
    /// Layer used when none is given
    pub default_layer: String,
    pub default_lat: f64,
    pub default_lon: f64,
}

/// `[http]` section.
#[derive(Debug, Clone)]
pub struct HttpSettings {
    /// Request timeout in seconds
    pub timeout: u64,
}

/// `[ai]` section.
#[derive(Debug, Clone)]
pub struct AiSettings {
    /// OpenAI-compatible chat completions URL
    pub endpoint: String,
    pub model: String,
    pub temperature: f32,
    pub extraction_max_tokens: u32,
    pub compliance_max_tokens: u32,
    pub api_key: Option<String>,
}

/// `[logging]` section.
#[derive(Debug, Clone)]
pub struct LoggingSettings {
    /// Log file path, truncated on every start
    pub file: PathBuf,
}

impl ConfigFile {
    /// Engine settings derived from `[search]`.
    pub fn search_settings(&self) -> SearchSettings {
        SearchSettings::new().with_page_delay(Duration::from_millis(self.search.page_delay_ms))
    }

    /// Model settings derived from `[ai]`, with the API key taken from
    /// `GEOPROX_API_KEY` when that is set.
    pub fn assist_config(&self) -> AssistConfig {
        let api_key = std::env::var(API_KEY_ENV)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .or_else(|| self.ai.api_key.clone());

        AssistConfig::new()
            .with_endpoint(self.ai.endpoint.clone())
            .with_model(self.ai.model.clone())
            .with_temperature(self.ai.temperature)
            .with_extraction_max_tokens(self.ai.extraction_max_tokens)
            .with_compliance_max_tokens(self.ai.compliance_max_tokens)
            .with_api_key(api_key)
    }

    /// Looks a server up by id or URL.
    pub fn server(&self, key: &str) -> Option<&ServerConfig> {
        find_server(&self.servers, key)
    }

    /// The server named by `[search] default_server`.
    pub fn default_server(&self) -> Option<&ServerConfig> {
        self.server(&self.search.default_server)
    }
}
