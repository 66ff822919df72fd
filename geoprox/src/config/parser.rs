//! INI parsing logic for converting `Ini` → `ConfigFile`.
//!
//! This module contains the `parse_ini()` function and its helpers.
//! It is the single place where INI key names are mapped to struct fields.

use ini::Ini;
use std::path::PathBuf;
use std::str::FromStr;

use super::file::ConfigFileError;
use super::servers::ServerConfig;
use super::settings::ConfigFile;
use crate::dialect::ServerDialect;

/// Prefix of per-server sections, e.g. `[server.vg250]`.
pub(super) const SERVER_SECTION_PREFIX: &str = "server.";

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found in the INI.
pub(super) fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    // [search] section
    if let Some(section) = ini.section(Some("search")) {
        if let Some(v) = section.get("max_distance") {
            let metres: f64 = parse_number("search", "max_distance", v)?;
            if !metres.is_finite() || metres <= 0.0 {
                return Err(invalid("search", "max_distance", v, "must be a positive number of metres"));
            }
            config.search.max_distance = metres;
        }
        if let Some(v) = section.get("page_size") {
            let size: usize = parse_number("search", "page_size", v)?;
            if size == 0 {
                return Err(invalid("search", "page_size", v, "must be at least 1"));
            }
            config.search.page_size = size;
        }
        if let Some(v) = section.get("page_delay_ms") {
            config.search.page_delay_ms = parse_number("search", "page_delay_ms", v)?;
        }
        if let Some(v) = section.get("default_server") {
            let v = v.trim();
            if !v.is_empty() {
                config.search.default_server = v.to_string();
            }
        }
        if let Some(v) = section.get("default_layer") {
            let v = v.trim();
            if !v.is_empty() {
                config.search.default_layer = v.to_string();
            }
        }
        if let Some(v) = section.get("default_lat") {
            let lat: f64 = parse_number("search", "default_lat", v)?;
            if !(-90.0..=90.0).contains(&lat) {
                return Err(invalid("search", "default_lat", v, "must be between -90 and 90"));
            }
            config.search.default_lat = lat;
        }
        if let Some(v) = section.get("default_lon") {
            let lon: f64 = parse_number("search", "default_lon", v)?;
            if !(-180.0..=180.0).contains(&lon) {
                return Err(invalid("search", "default_lon", v, "must be between -180 and 180"));
            }
            config.search.default_lon = lon;
        }
    }

    // [http] section
    if let Some(section) = ini.section(Some("http")) {
        if let Some(v) = section.get("timeout") {
            let secs: u64 = parse_number("http", "timeout", v)?;
            if secs == 0 {
                return Err(invalid("http", "timeout", v, "must be at least 1 second"));
            }
            config.http.timeout = secs;
        }
    }

    // [ai] section
    if let Some(section) = ini.section(Some("ai")) {
        if let Some(v) = section.get("endpoint") {
            let v = v.trim();
            if !v.is_empty() {
                if !v.starts_with("http://") && !v.starts_with("https://") {
                    return Err(invalid("ai", "endpoint", v, "must be an http(s) URL"));
                }
                config.ai.endpoint = v.to_string();
            }
        }
        if let Some(v) = section.get("model") {
            let v = v.trim();
            if !v.is_empty() {
                config.ai.model = v.to_string();
            }
        }
        if let Some(v) = section.get("temperature") {
            let t: f32 = parse_number("ai", "temperature", v)?;
            if !(0.0..=2.0).contains(&t) {
                return Err(invalid("ai", "temperature", v, "must be between 0.0 and 2.0"));
            }
            config.ai.temperature = t;
        }
        if let Some(v) = section.get("extraction_max_tokens") {
            config.ai.extraction_max_tokens = parse_number("ai", "extraction_max_tokens", v)?;
        }
        if let Some(v) = section.get("compliance_max_tokens") {
            config.ai.compliance_max_tokens = parse_number("ai", "compliance_max_tokens", v)?;
        }
        if let Some(v) = section.get("api_key") {
            let v = v.trim();
            if !v.is_empty() {
                config.ai.api_key = Some(v.to_string());
            }
        }
    }

    // [logging] section
    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("file") {
            let v = v.trim();
            if !v.is_empty() {
                config.logging.file = expand_tilde(v);
            }
        }
    }

    // [server.<id>] sections
    for (name, section) in ini.iter() {
        let Some(id) = name.and_then(|n| n.strip_prefix(SERVER_SECTION_PREFIX)) else {
            continue;
        };
        let id = id.trim();
        let section_name = format!("{SERVER_SECTION_PREFIX}{id}");
        if id.is_empty() {
            return Err(invalid(&section_name, "", "", "server id must not be empty"));
        }

        let existing = config.servers.iter().position(|s| s.id == id);
        let url = section.get("url").map(str::trim).filter(|v| !v.is_empty());
        let mut server = match (existing, url) {
            (Some(index), _) => config.servers[index].clone(),
            (None, Some(url)) => ServerConfig::new(id, url, ServerDialect::GeoJson),
            (None, None) => {
                return Err(invalid(&section_name, "url", "", "required for new servers"));
            }
        };

        if let Some(url) = url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err(invalid(&section_name, "url", url, "must be an http(s) URL"));
            }
            server.url = url.to_string();
        }
        if let Some(v) = section.get("dialect") {
            server.dialect = ServerDialect::from_str(v)
                .map_err(|reason| invalid(&section_name, "dialect", v, &reason))?;
        }
        if let Some(v) = section.get("output_format") {
            let v = v.trim();
            server.output_format = (!v.is_empty()).then(|| v.to_string());
        }
        if let Some(v) = section.get("label") {
            let v = v.trim();
            if !v.is_empty() {
                server.label = v.to_string();
            }
        }
        if let Some(v) = section.get("layers") {
            server.layers = parse_list(v);
        }

        match existing {
            Some(index) => config.servers[index] = server,
            None => config.servers.push(server),
        }
    }

    Ok(config)
}

fn parse_number<T: FromStr>(section: &str, key: &str, value: &str) -> Result<T, ConfigFileError> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(section, key, value, "must be a number"))
}

fn invalid(section: &str, key: &str, value: &str, reason: &str) -> ConfigFileError {
    ConfigFileError::InvalidValue {
        section: section.to_string(),
        key: key.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

/// Split a comma separated list, dropping blanks.
pub(super) fn parse_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

/// Expand ~ to home directory in paths.
pub(super) fn expand_tilde(path: &str) -> PathBuf {
    if let Some(stripped) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }
    PathBuf::from(path)
}
