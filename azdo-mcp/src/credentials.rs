//! Organization credential store
//!
//! The store is loaded once at startup from a flat JSON object mapping each
//! organization name to its personal access token:
//!
//! ```json
//! { "contoso": "<pat>", "fabrikam": "<pat>" }
//! ```
//!
//! A missing or malformed file never stops the server. It is reported through
//! `tracing` and the store comes up empty, so `list_organizations` reports
//! zero organizations instead of the process failing to start.

use crate::error::{AzdoError, Result};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

/// A personal access token
///
/// `Debug` never prints the token itself.
#[derive(Clone, PartialEq, Eq)]
pub struct Secret(String);

impl Secret {
    /// Wrap a raw token
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// The raw token, for building the authentication header
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Secret(***)")
    }
}

/// Immutable organization → token mapping
#[derive(Debug, Clone, Default)]
pub struct CredentialStore {
    tokens: BTreeMap<String, Secret>,
}

impl CredentialStore {
    /// An empty store
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a store from an in-memory mapping
    pub fn from_map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            tokens: entries
                .into_iter()
                .map(|(org, token)| (org.into(), Secret::new(token)))
                .collect(),
        }
    }

    /// Load the store, falling back to empty on any problem
    pub async fn load(path: &Path) -> Self {
        match Self::try_load(path).await {
            Ok(store) => {
                tracing::info!(
                    "Loaded credentials for {} organization(s) from {}",
                    store.len(),
                    path.display()
                );
                store
            }
            Err(AzdoError::Config { reason, .. }) if !path.exists() => {
                tracing::warn!(
                    "{}. Create {} mapping organization names to PATs.",
                    reason,
                    path.display()
                );
                Self::empty()
            }
            Err(e) => {
                tracing::error!("Error loading credentials: {}", e);
                Self::empty()
            }
        }
    }

    /// Load the store, reporting why it could not be read
    pub async fn try_load(path: &Path) -> Result<Self> {
        let content = match tokio::fs::read_to_string(path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AzdoError::Config {
                    path: path.to_path_buf(),
                    reason: "credential file not found".to_string(),
                });
            }
            Err(e) => {
                return Err(AzdoError::Config {
                    path: path.to_path_buf(),
                    reason: format!("failed to read credential file: {e}"),
                });
            }
        };

        Self::parse(&content).map_err(|reason| AzdoError::Config {
            path: path.to_path_buf(),
            reason,
        })
    }

    /// Parse the file content; anything but a flat string map is rejected whole
    fn parse(content: &str) -> std::result::Result<Self, String> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|e| format!("invalid JSON: {e}"))?;

        let object = value.as_object().ok_or_else(|| {
            format!(
                "expected an object of organization names to PATs, found {}",
                kind_of(&value)
            )
        })?;

        let mut tokens = BTreeMap::new();
        for (org, token) in object {
            let token = token.as_str().ok_or_else(|| {
                format!(
                    "value for organization '{org}' must be a string, found {}",
                    kind_of(token)
                )
            })?;
            tokens.insert(org.clone(), Secret::new(token));
        }

        Ok(Self { tokens })
    }

    /// Token for `organization`, if configured
    pub fn lookup(&self, organization: &str) -> Option<&Secret> {
        self.tokens.get(organization)
    }

    /// Every configured organization, sorted by name
    pub fn list_tenants(&self) -> Vec<String> {
        self.tokens.keys().cloned().collect()
    }

    /// Number of configured organizations
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// Whether no organization is configured
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

fn kind_of(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_config(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_flat_mapping() {
        let file = write_config(r#"{"fabrikam": "pat-2", "contoso": "pat-1"}"#);
        let store = CredentialStore::load(file.path()).await;

        assert_eq!(store.len(), 2);
        assert_eq!(store.list_tenants(), vec!["contoso", "fabrikam"]);
        assert_eq!(store.lookup("contoso").unwrap().expose(), "pat-1");
        assert!(store.lookup("northwind").is_none());
    }

    #[tokio::test]
    async fn test_missing_file_yields_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");

        let store = CredentialStore::load(&path).await;
        assert!(store.is_empty());

        let err = CredentialStore::try_load(&path).await.unwrap_err();
        assert!(matches!(err, AzdoError::Config { .. }));
        assert!(err.to_string().contains("not found"));
    }

    #[tokio::test]
    async fn test_array_is_rejected() {
        let file = write_config(r#"["contoso", "fabrikam"]"#);

        let store = CredentialStore::load(file.path()).await;
        assert!(store.is_empty());

        let err = CredentialStore::try_load(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("found an array"));
    }

    #[tokio::test]
    async fn test_non_string_value_rejects_whole_file() {
        let file = write_config(r#"{"contoso": "pat-1", "fabrikam": 42}"#);

        let store = CredentialStore::load(file.path()).await;
        assert!(store.is_empty(), "no partial acceptance");

        let err = CredentialStore::try_load(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("'fabrikam'"));
    }

    #[tokio::test]
    async fn test_nested_object_is_rejected() {
        let file = write_config(r#"{"contoso": {"pat": "x"}}"#);
        assert!(CredentialStore::load(file.path()).await.is_empty());
    }

    #[tokio::test]
    async fn test_invalid_json_is_rejected() {
        let file = write_config("{ not json");
        let err = CredentialStore::try_load(file.path()).await.unwrap_err();
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[test]
    fn test_secret_debug_is_redacted() {
        let store = CredentialStore::from_map([("contoso", "super-secret")]);
        let rendered = format!("{store:?}");
        assert!(!rendered.contains("super-secret"));
        assert!(rendered.contains("***"));
    }
}
