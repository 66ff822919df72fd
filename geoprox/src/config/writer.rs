//! INI serialization logic for converting `ConfigFile` → INI string.
//!
//! This module contains the `to_config_string()` function that produces
//! the commented INI representation written to `config.ini`.

use std::fmt::Write;
use std::path::Path;

use super::parser::SERVER_SECTION_PREFIX;
use super::settings::ConfigFile;

/// Convert a `ConfigFile` to a commented INI string for saving.
pub(super) fn to_config_string(config: &ConfigFile) -> String {
    let api_key = config.ai.api_key.as_deref().unwrap_or("");

    let mut out = format!(
        r#"[search]
; Search radius around the reference point in metres (default: 1000)
max_distance = {}
; Features requested per GetFeature page (default: 1000)
page_size = {}
; Pause between pages in milliseconds, for rate-limited servers (default: 0)
page_delay_ms = {}
; Server id searched when --server is not given
default_server = {}
; Layer searched when --layer is not given
default_layer = {}
; Reference point used when --lat/--lon are not given
default_lat = {}
default_lon = {}

[http]
; Request timeout in seconds (default: 30)
timeout = {}

[ai]
; OpenAI-compatible chat completions endpoint
endpoint = {}
model = {}
; Sampling temperature, 0.0 to 2.0 (default: 0.1)
temperature = {}
extraction_max_tokens = {}
compliance_max_tokens = {}
; API key for the endpoint; the GEOPROX_API_KEY environment variable takes precedence
api_key = {}

[logging]
; Log file, truncated on every start
file = {}
"#,
        config.search.max_distance,
        config.search.page_size,
        config.search.page_delay_ms,
        config.search.default_server,
        config.search.default_layer,
        config.search.default_lat,
        config.search.default_lon,
        config.http.timeout,
        config.ai.endpoint,
        config.ai.model,
        config.ai.temperature,
        config.ai.extraction_max_tokens,
        config.ai.compliance_max_tokens,
        api_key,
        path_to_string(&config.logging.file),
    );

    for server in &config.servers {
        // Writing to a String cannot fail
        let _ = write!(
            out,
            r#"
[{}{}]
url = {}
; Dialect: json, latlon-gml or inspire-gml
dialect = {}
; outputFormat for GML servers (empty: application/gml+xml; version=3.2)
output_format = {}
label = {}
; Comma separated feature types offered to `geoprox ask`
layers = {}
"#,
            SERVER_SECTION_PREFIX,
            server.id,
            server.url,
            server.dialect,
            server.output_format.as_deref().unwrap_or(""),
            server.label,
            server.layers.join(", "),
        );
    }

    out
}

/// Convert a path to a string, using ~ for home directory.
fn path_to_string(path: &Path) -> String {
    if let Some(home) = dirs::home_dir() {
        if let Ok(stripped) = path.strip_prefix(&home) {
            return format!("~/{}", stripped.display());
        }
    }
    path.display().to_string()
}

#[cfg(test)]
mod tests {
    use super::super::settings::ConfigFile;
    use super::*;
    use crate::config::ServerConfig;
    use crate::dialect::ServerDialect;
    use tempfile::TempDir;

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.ini");

        let mut config = ConfigFile::default();
        config.search.max_distance = 750.0;
        config.search.page_size = 250;
        config.http.timeout = 60;
        config.ai.api_key = Some("sk-test".to_string());
        config.servers.push(
            ServerConfig::new("local", "http://localhost:8080/wfs", ServerDialect::InspireGml)
                .with_layers(["ns:roads"]),
        );

        config.save_to(&config_path).unwrap();
        let loaded = ConfigFile::load_from(&config_path).unwrap();

        assert_eq!(loaded.search.max_distance, 750.0);
        assert_eq!(loaded.search.page_size, 250);
        assert_eq!(loaded.http.timeout, 60);
        assert_eq!(loaded.ai.api_key.as_deref(), Some("sk-test"));
        assert_eq!(loaded.servers.len(), 4);
        assert_eq!(loaded.servers, config.servers);
    }

    #[test]
    fn test_default_string_lists_every_section() {
        let text = to_config_string(&ConfigFile::default());
        for section in ["[search]", "[http]", "[ai]", "[logging]", "[server.vg250]", "[server.dlm250]"] {
            assert!(text.contains(section), "missing {section}");
        }
        assert!(text.contains("api_key = \n"));
    }
}
