//! Configuration management for azdo-mcp
//!
//! Values are resolved in three layers:
//! 1. Command-line overrides (highest precedence, applied by the CLI)
//! 2. `AZDO_MCP_*` environment variables
//! 3. Defaults (lowest precedence)

use crate::common::env_loader::EnvLoader;
use std::path::PathBuf;

/// Host every organization endpoint hangs off
pub const DEFAULT_SERVICE_HOST: &str = "dev.azure.com";

/// REST api-version sent with every request
pub const DEFAULT_API_VERSION: &str = "7.1";

/// Directory under the home directory holding the credential file and logs
pub const CONFIG_DIR_NAME: &str = ".azdo-mcp";

const CREDENTIALS_FILE_NAME: &str = "config.json";
const DEFAULT_LOG_FILE_NAME: &str = "mcp.log";
const ENV_PREFIX: &str = "AZDO_MCP";

/// Configuration settings for the server
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Location of the organization → PAT mapping
    pub credentials_path: PathBuf,
    /// Host used to derive each organization's base URL
    pub service_host: String,
    /// REST api-version query parameter
    pub api_version: String,
    /// Log file name inside [`ServerConfig::config_dir`] when serving
    pub log_file_name: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            credentials_path: Self::config_dir().join(CREDENTIALS_FILE_NAME),
            service_host: DEFAULT_SERVICE_HOST.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
            log_file_name: DEFAULT_LOG_FILE_NAME.to_string(),
        }
    }
}

impl ServerConfig {
    /// Create a configuration from defaults and environment variables
    pub fn new() -> Self {
        let mut config = Self::default();
        config.apply_env_vars();
        config
    }

    /// The fixed per-user directory, `~/.azdo-mcp`
    ///
    /// Falls back to a relative `.azdo-mcp` when no home directory is known.
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .map(|home| home.join(CONFIG_DIR_NAME))
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR_NAME))
    }

    /// Full path of the server log file
    pub fn log_file_path(&self) -> PathBuf {
        Self::config_dir().join(&self.log_file_name)
    }

    /// Override the credential file location
    pub fn with_credentials_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credentials_path = path.into();
        self
    }

    /// Override the service host
    pub fn with_service_host(mut self, host: impl Into<String>) -> Self {
        self.service_host = host.into();
        self
    }

    fn apply_env_vars(&mut self) {
        let loader = EnvLoader::new(ENV_PREFIX);

        if let Some(path) = loader.load_optional::<PathBuf>("CONFIG") {
            self.credentials_path = path;
        }
        self.service_host = loader.load_string("SERVICE_HOST", &self.service_host);
        self.api_version = loader.load_string("API_VERSION", &self.api_version);
        self.log_file_name = loader.load_string("LOG_FILE", &self.log_file_name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::env;

    fn clear_env() {
        for key in [
            "AZDO_MCP_CONFIG",
            "AZDO_MCP_SERVICE_HOST",
            "AZDO_MCP_API_VERSION",
            "AZDO_MCP_LOG_FILE",
        ] {
            env::remove_var(key);
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear_env();
        let config = ServerConfig::new();

        assert_eq!(config.service_host, "dev.azure.com");
        assert_eq!(config.api_version, "7.1");
        assert!(config.credentials_path.ends_with(".azdo-mcp/config.json"));
        assert!(config.log_file_path().ends_with(".azdo-mcp/mcp.log"));
    }

    #[test]
    #[serial]
    fn test_env_overrides() {
        clear_env();
        env::set_var("AZDO_MCP_CONFIG", "/etc/azdo/orgs.json");
        env::set_var("AZDO_MCP_SERVICE_HOST", "devops.example.com");
        env::set_var("AZDO_MCP_API_VERSION", "7.0");
        env::set_var("AZDO_MCP_LOG_FILE", "custom.log");

        let config = ServerConfig::new();
        clear_env();

        assert_eq!(config.credentials_path, PathBuf::from("/etc/azdo/orgs.json"));
        assert_eq!(config.service_host, "devops.example.com");
        assert_eq!(config.api_version, "7.0");
        assert_eq!(config.log_file_name, "custom.log");
    }

    #[test]
    #[serial]
    fn test_builder_overrides_win() {
        clear_env();
        env::set_var("AZDO_MCP_SERVICE_HOST", "from-env.example.com");

        let config = ServerConfig::new()
            .with_service_host("from-flag.example.com")
            .with_credentials_path("/tmp/flag.json");
        clear_env();

        assert_eq!(config.service_host, "from-flag.example.com");
        assert_eq!(config.credentials_path, PathBuf::from("/tmp/flag.json"));
    }
}
