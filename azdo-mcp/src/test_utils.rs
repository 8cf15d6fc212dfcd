//! Test doubles for the Azure DevOps client
//!
//! [`MockDevOpsApi`] answers every call from canned records and remembers
//! what it was asked; [`CountingConnector`] hands it out and counts how many
//! clients were constructed.

use crate::client::{
    BuildQuery, ChangesQuery, Connector, DefinitionQuery, DevOpsApi, Endpoint, ItemQuery,
    LogRange, NewPullRequest, PullRequestSearchCriteria, RunPipelineParameters,
};
use crate::credentials::CredentialStore;
use crate::error::{AzdoError, Result};
use crate::mcp::tool_registry::ToolContext;
use crate::session::SessionCache;
use async_trait::async_trait;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

/// One recorded call to the mock
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCall {
    /// Trait method name
    pub operation: &'static str,
    /// Project argument, empty for organization-level calls
    pub project: String,
    /// Page size the caller asked for, when the operation takes one
    pub top: Option<u32>,
}

#[derive(Debug, Default)]
struct Recorded {
    calls: Vec<RecordedCall>,
    pull_request_criteria: Option<PullRequestSearchCriteria>,
    new_pull_request: Option<NewPullRequest>,
    item_query: Option<ItemQuery>,
    definition_query: Option<DefinitionQuery>,
    build_query: Option<BuildQuery>,
    changes_query: Option<ChangesQuery>,
    log_range: Option<LogRange>,
    run_parameters: Option<(Option<i64>, RunPipelineParameters)>,
}

/// In-memory [`DevOpsApi`]
#[derive(Debug)]
pub struct MockDevOpsApi {
    records: Vec<Value>,
    record: Value,
    failure: Option<(u16, String)>,
    recorded: Mutex<Recorded>,
}

impl Default for MockDevOpsApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockDevOpsApi {
    /// Mock returning no records and an empty object
    pub fn new() -> Self {
        Self {
            records: Vec::new(),
            record: json!({}),
            failure: None,
            recorded: Mutex::new(Recorded::default()),
        }
    }

    /// Records returned by every list operation
    pub fn with_records(mut self, records: Vec<Value>) -> Self {
        self.records = records;
        self
    }

    /// Record returned by every single-record operation
    pub fn with_record(mut self, record: Value) -> Self {
        self.record = record;
        self
    }

    /// Make every call fail the way the service would
    pub fn failing_with(mut self, status: u16, message: &str) -> Self {
        self.failure = Some((status, message.to_string()));
        self
    }

    /// Every call made so far, in order
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.lock().calls.clone()
    }

    /// Last pull request search criteria
    pub fn last_pull_request_criteria(&self) -> Option<PullRequestSearchCriteria> {
        self.lock().pull_request_criteria.clone()
    }

    /// Last pull request creation body
    pub fn last_new_pull_request(&self) -> Option<NewPullRequest> {
        self.lock().new_pull_request.clone()
    }

    /// Last item query
    pub fn last_item_query(&self) -> Option<ItemQuery> {
        self.lock().item_query.clone()
    }

    /// Last definition query
    pub fn last_definition_query(&self) -> Option<DefinitionQuery> {
        self.lock().definition_query.clone()
    }

    /// Last build query
    pub fn last_build_query(&self) -> Option<BuildQuery> {
        self.lock().build_query.clone()
    }

    /// Last build changes query
    pub fn last_changes_query(&self) -> Option<ChangesQuery> {
        self.lock().changes_query.clone()
    }

    /// Last log line range
    pub fn last_log_range(&self) -> Option<LogRange> {
        self.lock().log_range
    }

    /// Last pipeline version and run parameters
    pub fn last_run_parameters(&self) -> Option<(Option<i64>, RunPipelineParameters)> {
        self.lock().run_parameters.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Recorded> {
        self.recorded.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record_call(&self, operation: &'static str, project: &str, top: Option<u32>) -> Result<()> {
        self.lock().calls.push(RecordedCall {
            operation,
            project: project.to_string(),
            top,
        });
        match &self.failure {
            Some((status, message)) => Err(AzdoError::Upstream {
                status: *status,
                message: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DevOpsApi for MockDevOpsApi {
    async fn list_projects(&self) -> Result<Vec<Value>> {
        self.record_call("list_projects", "", None)?;
        Ok(self.records.clone())
    }

    async fn list_repositories(
        &self,
        project: &str,
        _include_hidden: Option<bool>,
    ) -> Result<Vec<Value>> {
        self.record_call("list_repositories", project, None)?;
        Ok(self.records.clone())
    }

    async fn get_pull_requests(
        &self,
        project: &str,
        _repository_id: &str,
        criteria: &PullRequestSearchCriteria,
        top: u32,
    ) -> Result<Vec<Value>> {
        self.lock().pull_request_criteria = Some(criteria.clone());
        self.record_call("get_pull_requests", project, Some(top))?;
        Ok(self.records.clone())
    }

    async fn get_pull_request(&self, project: &str, _pull_request_id: i64) -> Result<Value> {
        self.record_call("get_pull_request", project, None)?;
        Ok(self.record.clone())
    }

    async fn create_pull_request(
        &self,
        project: &str,
        _repository_id: &str,
        pull_request: &NewPullRequest,
    ) -> Result<Value> {
        self.lock().new_pull_request = Some(pull_request.clone());
        self.record_call("create_pull_request", project, None)?;
        Ok(self.record.clone())
    }

    async fn get_item(&self, project: &str, _repository_id: &str, query: &ItemQuery)
        -> Result<Value> {
        self.lock().item_query = Some(query.clone());
        self.record_call("get_item", project, None)?;
        Ok(self.record.clone())
    }

    async fn get_definitions(&self, project: &str, query: &DefinitionQuery) -> Result<Vec<Value>> {
        self.lock().definition_query = Some(query.clone());
        self.record_call("get_definitions", project, Some(query.top))?;
        Ok(self.records.clone())
    }

    async fn get_definition_revisions(
        &self,
        project: &str,
        _definition_id: i64,
    ) -> Result<Vec<Value>> {
        self.record_call("get_definition_revisions", project, None)?;
        Ok(self.records.clone())
    }

    async fn get_builds(&self, project: &str, query: &BuildQuery) -> Result<Vec<Value>> {
        self.lock().build_query = Some(query.clone());
        self.record_call("get_builds", project, Some(query.top))?;
        Ok(self.records.clone())
    }

    async fn get_build(&self, project: &str, _build_id: i64) -> Result<Value> {
        self.record_call("get_build", project, None)?;
        Ok(self.record.clone())
    }

    async fn get_build_logs(&self, project: &str, _build_id: i64) -> Result<Vec<Value>> {
        self.record_call("get_build_logs", project, None)?;
        Ok(self.records.clone())
    }

    async fn get_build_log_lines(
        &self,
        project: &str,
        _build_id: i64,
        _log_id: i64,
        range: LogRange,
    ) -> Result<Vec<String>> {
        self.lock().log_range = Some(range);
        self.record_call("get_build_log_lines", project, None)?;
        Ok(self
            .records
            .iter()
            .filter_map(|line| line.as_str().map(str::to_string))
            .collect())
    }

    async fn get_build_changes(
        &self,
        project: &str,
        _build_id: i64,
        query: &ChangesQuery,
    ) -> Result<Vec<Value>> {
        self.lock().changes_query = Some(query.clone());
        self.record_call("get_build_changes", project, Some(query.top))?;
        Ok(self.records.clone())
    }

    async fn get_run(&self, project: &str, _pipeline_id: i64, _run_id: i64) -> Result<Value> {
        self.record_call("get_run", project, None)?;
        Ok(self.record.clone())
    }

    async fn list_runs(&self, project: &str, _pipeline_id: i64) -> Result<Vec<Value>> {
        self.record_call("list_runs", project, None)?;
        Ok(self.records.clone())
    }

    async fn run_pipeline(
        &self,
        project: &str,
        _pipeline_id: i64,
        pipeline_version: Option<i64>,
        parameters: &RunPipelineParameters,
    ) -> Result<Value> {
        self.lock().run_parameters = Some((pipeline_version, parameters.clone()));
        self.record_call("run_pipeline", project, None)?;
        Ok(self.record.clone())
    }
}

/// Connector that hands out one shared [`MockDevOpsApi`] and counts calls
#[derive(Debug)]
pub struct CountingConnector {
    api: Arc<MockDevOpsApi>,
    connects: AtomicUsize,
    organizations: Mutex<Vec<String>>,
}

impl Default for CountingConnector {
    fn default() -> Self {
        Self::new()
    }
}

impl CountingConnector {
    /// Connector backed by an empty mock
    pub fn new() -> Self {
        Self::with_api(Arc::new(MockDevOpsApi::new()))
    }

    /// Connector backed by `api`
    pub fn with_api(api: Arc<MockDevOpsApi>) -> Self {
        Self {
            api,
            connects: AtomicUsize::new(0),
            organizations: Mutex::new(Vec::new()),
        }
    }

    /// The mock every session talks to
    pub fn api(&self) -> Arc<MockDevOpsApi> {
        Arc::clone(&self.api)
    }

    /// How many clients have been constructed
    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// Organizations connected to, in order
    pub fn connected_organizations(&self) -> Vec<String> {
        self.organizations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl Connector for CountingConnector {
    fn connect(&self, endpoint: &Endpoint) -> Result<Arc<dyn DevOpsApi>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.organizations
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(endpoint.organization.clone());
        Ok(self.api.clone() as Arc<dyn DevOpsApi>)
    }
}

/// Tool context over a mock service with the given organizations configured
pub fn mock_tool_context(
    organizations: &[&str],
    api: MockDevOpsApi,
) -> (ToolContext, Arc<CountingConnector>) {
    let connector = Arc::new(CountingConnector::with_api(Arc::new(api)));
    let credentials = CredentialStore::from_map(
        organizations
            .iter()
            .map(|org| (org.to_string(), format!("pat-for-{org}"))),
    );
    let sessions = SessionCache::new(
        Arc::new(credentials),
        connector.clone(),
        crate::config::DEFAULT_SERVICE_HOST,
    );
    (ToolContext::new(Arc::new(sessions)), connector)
}

/// Tool arguments from a `json!` object literal
pub fn arguments(value: Value) -> serde_json::Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("tool arguments must be a JSON object, got {other}"),
    }
}
