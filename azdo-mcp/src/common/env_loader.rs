//! Environment variable loading utilities
//!
//! Every setting in [`crate::config::ServerConfig`] can be overridden by an
//! `AZDO_MCP_*` variable; these helpers keep that lookup uniform.

use std::env;
use std::str::FromStr;

/// Load an environment variable, treating empty values as unset
pub fn load_env_string(key: &str, default: &str) -> String {
    load_env_optional(key).unwrap_or_else(|| default.to_string())
}

/// Load an environment variable as an `Option<T>`
pub fn load_env_optional<T>(key: &str) -> Option<T>
where
    T: FromStr,
{
    env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .and_then(|value| value.trim().parse().ok())
}

/// Builder for loading multiple environment variables with consistent prefix
#[derive(Debug)]
pub struct EnvLoader {
    prefix: String,
}

impl EnvLoader {
    /// Create a new environment loader with the given prefix
    pub fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    fn key(&self, suffix: &str) -> String {
        format!("{}_{}", self.prefix, suffix)
    }

    /// Load a string value with default
    pub fn load_string(&self, suffix: &str, default: &str) -> String {
        load_env_string(&self.key(suffix), default)
    }

    /// Load an optional value
    pub fn load_optional<T>(&self, suffix: &str) -> Option<T>
    where
        T: FromStr,
    {
        load_env_optional(&self.key(suffix))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::path::PathBuf;

    #[test]
    #[serial]
    fn test_load_env_string() {
        let key = "AZDO_MCP_TEST_STRING_VAR";

        env::remove_var(key);
        assert_eq!(load_env_string(key, "fallback"), "fallback");

        env::set_var(key, "value");
        assert_eq!(load_env_string(key, "fallback"), "value");

        env::set_var(key, "   ");
        assert_eq!(load_env_string(key, "fallback"), "fallback");

        env::remove_var(key);
    }

    #[test]
    #[serial]
    fn test_env_loader_prefix() {
        let loader = EnvLoader::new("AZDO_MCP_TEST");
        let key = "AZDO_MCP_TEST_PATH";

        env::remove_var(key);
        assert_eq!(loader.load_optional::<PathBuf>("PATH"), None);

        env::set_var(key, "/tmp/orgs.json");
        assert_eq!(
            loader.load_optional::<PathBuf>("PATH"),
            Some(PathBuf::from("/tmp/orgs.json"))
        );

        env::remove_var(key);
    }
}
