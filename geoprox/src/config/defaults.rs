//! Default values for every configuration setting and the
//! `ConfigFile::default()` implementation.

use std::path::PathBuf;

use super::file::config_directory;
use super::servers::builtin_servers;
use super::settings::*;
use crate::assist::{
    DEFAULT_AI_ENDPOINT, DEFAULT_AI_MODEL, DEFAULT_COMPLIANCE_MAX_TOKENS,
    DEFAULT_EXTRACTION_MAX_TOKENS, DEFAULT_TEMPERATURE,
};
use crate::search::{DEFAULT_MAX_DISTANCE_M, DEFAULT_PAGE_DELAY_MS, DEFAULT_PAGE_SIZE};
use crate::wfs::DEFAULT_TIMEOUT_SECS;

/// Server searched when none is named.
pub const DEFAULT_SERVER_ID: &str = "vg250";

/// Layer searched when none is named.
pub const DEFAULT_LAYER: &str = "vg250:vg250_gem";

/// Default reference latitude (Dresden).
pub const DEFAULT_LAT: f64 = 51.0036;

/// Default reference longitude (Dresden).
pub const DEFAULT_LON: f64 = 13.8713;

/// Environment variable that overrides `[ai] api_key`.
pub const API_KEY_ENV: &str = "GEOPROX_API_KEY";

/// Default log file name inside the config directory.
pub const DEFAULT_LOG_FILE: &str = "geoprox.log";

/// Default log file path (~/.geoprox/geoprox.log).
pub fn default_log_path() -> PathBuf {
    config_directory().join(DEFAULT_LOG_FILE)
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            search: SearchDefaults {
                max_distance: DEFAULT_MAX_DISTANCE_M,
                page_size: DEFAULT_PAGE_SIZE,
                page_delay_ms: DEFAULT_PAGE_DELAY_MS,
                default_server: DEFAULT_SERVER_ID.to_string(),
                default_layer: DEFAULT_LAYER.to_string(),
                default_lat: DEFAULT_LAT,
                default_lon: DEFAULT_LON,
            },
            http: HttpSettings {
                timeout: DEFAULT_TIMEOUT_SECS,
            },
            ai: AiSettings {
                endpoint: DEFAULT_AI_ENDPOINT.to_string(),
                model: DEFAULT_AI_MODEL.to_string(),
                temperature: DEFAULT_TEMPERATURE,
                extraction_max_tokens: DEFAULT_EXTRACTION_MAX_TOKENS,
                compliance_max_tokens: DEFAULT_COMPLIANCE_MAX_TOKENS,
                api_key: None,
            },
            logging: LoggingSettings {
                file: default_log_path(),
            },
            servers: builtin_servers(),
        }
    }
}
