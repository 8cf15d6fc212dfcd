//! Per-organization session cache
//!
//! The first tool call naming an organization builds its client; every later
//! call gets the same [`Session`] back. There is no eviction and no refresh.
//! A token that stops working shows up as an authentication error from the
//! service, not as a cache error.

use crate::client::{AuthContext, Connector, DevOpsApi, Endpoint};
use crate::credentials::CredentialStore;
use crate::error::{AzdoError, Result};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tokio::sync::Mutex;
use url::Url;

/// An authenticated connection to one organization
pub struct Session {
    organization: String,
    base_url: Url,
    api: Arc<dyn DevOpsApi>,
}

impl Session {
    /// Organization this session is bound to
    pub fn organization(&self) -> &str {
        &self.organization
    }

    /// `https://<service-host>/<organization>`
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// The client for this organization
    pub fn api(&self) -> &dyn DevOpsApi {
        self.api.as_ref()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("organization", &self.organization)
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Lazily built, never evicted map of organization → [`Session`]
pub struct SessionCache {
    credentials: Arc<CredentialStore>,
    connector: Arc<dyn Connector>,
    service_host: String,
    sessions: Mutex<HashMap<String, Arc<Session>>>,
}

impl SessionCache {
    /// Create an empty cache
    pub fn new(
        credentials: Arc<CredentialStore>,
        connector: Arc<dyn Connector>,
        service_host: impl Into<String>,
    ) -> Self {
        Self {
            credentials,
            connector,
            service_host: service_host.into(),
            sessions: Mutex::new(HashMap::new()),
        }
    }

    /// Return the cached session for `organization`, building it on first use
    ///
    /// The lock is held from lookup to insert, so concurrent first calls for
    /// the same organization still construct exactly one client.
    pub async fn get_session(&self, organization: &str) -> Result<Arc<Session>> {
        let mut sessions = self.sessions.lock().await;
        if let Some(session) = sessions.get(organization) {
            return Ok(Arc::clone(session));
        }

        let token = self
            .credentials
            .lookup(organization)
            .ok_or_else(|| AzdoError::UnknownTenant(organization.to_string()))?;

        let endpoint = Endpoint {
            organization: organization.to_string(),
            base_url: self.endpoint_url(organization)?,
            auth: AuthContext::from_pat(token)?,
        };
        let api = self.connector.connect(&endpoint)?;

        let session = Arc::new(Session {
            organization: endpoint.organization,
            base_url: endpoint.base_url,
            api,
        });
        sessions.insert(organization.to_string(), Arc::clone(&session));

        tracing::info!(
            "Created session for organization '{}' at {}",
            organization,
            session.base_url
        );
        Ok(session)
    }

    /// Organizations that have credentials, whether or not they are cached
    pub fn list_available_tenants(&self) -> Vec<String> {
        self.credentials.list_tenants()
    }

    /// Organizations with a live session, sorted
    pub async fn cached_tenants(&self) -> Vec<String> {
        let sessions = self.sessions.lock().await;
        let mut names: Vec<String> = sessions.keys().cloned().collect();
        names.sort();
        names
    }

    fn endpoint_url(&self, organization: &str) -> Result<Url> {
        let mut url = Url::parse(&format!("https://{}", self.service_host)).map_err(|e| {
            AzdoError::Other(format!("invalid service host '{}': {e}", self.service_host))
        })?;
        url.path_segments_mut()
            .map_err(|_| AzdoError::Other(format!("invalid service host '{}'", self.service_host)))?
            .clear()
            .push(organization);
        Ok(url)
    }
}

impl fmt::Debug for SessionCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionCache")
            .field("service_host", &self.service_host)
            .field("tenants", &self.credentials.len())
            .finish_non_exhaustive()
    }
}
