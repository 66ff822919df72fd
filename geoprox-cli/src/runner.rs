//! CLI runner for common setup and operations.
//!
//! Encapsulates configuration loading, logging initialization and client
//! construction to reduce duplication across command handlers.

use crate::error::CliError;
use geoprox::assist::ChatClient;
use geoprox::config::{ConfigFile, ServerConfig};
use geoprox::logging::{init_logging, split_log_path, LoggingGuard};
use geoprox::wfs::AsyncReqwestClient;
use std::sync::Arc;
use tracing::info;

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    /// Logging guard - keeps logging active while runner exists
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    /// Loaded configuration file
    config: ConfigFile,
}

impl CliRunner {
    /// Create a new CLI runner, loading config and initializing logging.
    ///
    /// # Arguments
    ///
    /// * `verbose` - Mirror log events to stderr
    pub fn new(verbose: bool) -> Result<Self, CliError> {
        // Load config file (or use defaults if not present)
        let config = ConfigFile::load()?;

        let (log_dir, log_file) = split_log_path(&config.logging.file);
        let logging_guard = init_logging(log_dir, log_file, verbose)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        Ok(Self {
            logging_guard,
            config,
        })
    }

    /// Get the loaded configuration.
    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        info!("geoprox v{}", geoprox::VERSION);
        info!("geoprox CLI: {} command", command);
    }

    /// HTTP client honouring the configured timeout.
    pub fn http_client(&self) -> Result<Arc<AsyncReqwestClient>, CliError> {
        Ok(Arc::new(AsyncReqwestClient::with_timeout(
            self.config.http.timeout,
        )?))
    }

    /// Chat client for the AI commands.
    pub fn chat_client(
        &self,
        http: Arc<AsyncReqwestClient>,
    ) -> Result<ChatClient<AsyncReqwestClient>, CliError> {
        Ok(ChatClient::new(http, self.config.assist_config())?)
    }

    /// Server named by `key` (id or URL), or the configured default.
    pub fn resolve_server(&self, key: Option<&str>) -> Result<&ServerConfig, CliError> {
        let key = key.unwrap_or(&self.config.search.default_server);
        self.config.server(key).ok_or_else(|| {
            CliError::Config(format!(
                "Unknown server '{}'. Use 'geoprox servers' to see configured servers.",
                key
            ))
        })
    }
}
