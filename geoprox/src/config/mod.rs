//! User configuration.
//!
//! `~/.geoprox/config.ini` holds search defaults, the HTTP timeout, the
//! language model endpoint and the list of WFS servers. A missing file
//! means defaults.
//!
//! # Example
//!
//! ```
//! use geoprox::config::ConfigFile;
//!
//! let config = ConfigFile::default();
//! let server = config.server("vg250").unwrap();
//! assert_eq!(server.url, "https://sgx.geodatenzentrum.de/wfs_vg250");
//! ```

mod defaults;
mod file;
mod parser;
mod servers;
mod settings;
mod writer;

pub use defaults::{
    default_log_path, API_KEY_ENV, DEFAULT_LAT, DEFAULT_LAYER, DEFAULT_LOG_FILE, DEFAULT_LON,
    DEFAULT_SERVER_ID,
};
pub use file::{config_directory, config_file_path, ConfigFileError};
pub use servers::{builtin_servers, find_server, ServerConfig};
pub use settings::{AiSettings, ConfigFile, HttpSettings, LoggingSettings, SearchDefaults};
