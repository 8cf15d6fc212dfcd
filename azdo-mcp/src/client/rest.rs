//! `reqwest`-backed [`DevOpsApi`] implementation

use super::types::{
    BuildQuery, ChangesQuery, DefinitionQuery, ItemQuery, LogRange, NewPullRequest,
    PullRequestSearchCriteria, RunPipelineParameters,
};
use super::{Connector, DevOpsApi, Endpoint};
use crate::enums::DomainEnum;
use crate::error::{AzdoError, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::header::{self, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use std::sync::Arc;
use url::Url;

/// Upper bound on an error body echoed back to the caller
const MAX_ERROR_BODY_CHARS: usize = 500;

/// Standard `{ "count": n, "value": [...] }` list envelope
#[derive(Debug, Deserialize)]
struct ListEnvelope<T> {
    #[serde(default = "Vec::new")]
    value: Vec<T>,
}

/// Error body returned by Azure DevOps on failures
#[derive(Debug, Deserialize)]
struct ServiceError {
    message: Option<String>,
}

/// Collects query parameters, skipping unset ones
#[derive(Debug, Default)]
struct Query {
    pairs: Vec<(String, String)>,
}

impl Query {
    fn push(mut self, key: &str, value: impl ToString) -> Self {
        self.pairs.push((key.to_string(), value.to_string()));
        self
    }

    fn opt<T: ToString>(self, key: &str, value: Option<T>) -> Self {
        match value {
            Some(value) => self.push(key, value),
            None => self,
        }
    }

    fn enum_opt<E: DomainEnum>(self, key: &str, value: Option<E>) -> Self {
        self.opt(key, value.map(E::query_token))
    }

    fn time_opt(self, key: &str, value: Option<DateTime<Utc>>) -> Self {
        self.opt(
            key,
            value.map(|time| time.to_rfc3339_opts(SecondsFormat::Secs, true)),
        )
    }

    fn list<T: ToString>(self, key: &str, values: &[T]) -> Self {
        if values.is_empty() {
            return self;
        }
        let joined = values
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.push(key, joined)
    }
}

/// REST client bound to one organization
#[derive(Debug, Clone)]
pub struct RestClient {
    http: reqwest::Client,
    base_url: Url,
    api_version: String,
}

impl RestClient {
    /// Build a client whose every request carries the endpoint's credentials
    pub fn new(endpoint: &Endpoint, api_version: impl Into<String>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, endpoint.auth.header().clone());
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(concat!("azdo-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: endpoint.base_url.clone(),
            api_version: api_version.into(),
        })
    }

    /// `<base>/<segments...>?<query>&api-version=<v>`
    fn url(&self, segments: &[&str], query: Query) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| AzdoError::Other(format!("cannot extend base URL {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);

        {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &query.pairs {
                pairs.append_pair(key, value);
            }
            pairs.append_pair("api-version", &self.api_version);
        }
        Ok(url)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let response = Self::check_status(response).await?;
        Ok(response.json::<T>().await?)
    }

    async fn get<T: DeserializeOwned>(&self, segments: &[&str], query: Query) -> Result<T> {
        let url = self.url(segments, query)?;
        tracing::debug!("GET {}", url);
        self.send(self.http.get(url)).await
    }

    async fn get_list<T: DeserializeOwned>(
        &self,
        segments: &[&str],
        query: Query,
    ) -> Result<Vec<T>> {
        let envelope: ListEnvelope<T> = self.get(segments, query).await?;
        Ok(envelope.value)
    }

    async fn post<B: serde::Serialize + ?Sized>(
        &self,
        segments: &[&str],
        query: Query,
        body: &B,
    ) -> Result<Value> {
        let url = self.url(segments, query)?;
        tracing::debug!("POST {}", url);
        self.send(self.http.post(url).json(body)).await
    }

    /// Map a non-success response to [`AzdoError::Upstream`]
    ///
    /// 203 is treated as a failure: the service answers an invalid PAT with a
    /// 203 sign-in page rather than a 401.
    async fn check_status(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() && status != StatusCode::NON_AUTHORITATIVE_INFORMATION {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        Err(AzdoError::Upstream {
            status: status.as_u16(),
            message: error_message(status, &body),
        })
    }
}

/// Best human-readable description of a failed response
fn error_message(status: StatusCode, body: &str) -> String {
    if matches!(status.as_u16(), 203 | 401) {
        return "authentication failed; check the personal access token for this organization"
            .to_string();
    }

    if let Ok(ServiceError {
        message: Some(message),
    }) = serde_json::from_str::<ServiceError>(body)
    {
        return message;
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return status
            .canonical_reason()
            .unwrap_or("unknown error")
            .to_string();
    }
    trimmed.chars().take(MAX_ERROR_BODY_CHARS).collect()
}

#[async_trait]
impl DevOpsApi for RestClient {
    async fn list_projects(&self) -> Result<Vec<Value>> {
        self.get_list(&["_apis", "projects"], Query::default()).await
    }

    async fn list_repositories(
        &self,
        project: &str,
        include_hidden: Option<bool>,
    ) -> Result<Vec<Value>> {
        let query = Query::default().opt("includeHidden", include_hidden);
        self.get_list(&[project, "_apis", "git", "repositories"], query)
            .await
    }

    async fn get_pull_requests(
        &self,
        project: &str,
        repository_id: &str,
        criteria: &PullRequestSearchCriteria,
        top: u32,
    ) -> Result<Vec<Value>> {
        let query = Query::default()
            .enum_opt("searchCriteria.status", criteria.status)
            .opt("searchCriteria.creatorId", criteria.creator_id.as_deref())
            .opt("searchCriteria.reviewerId", criteria.reviewer_id.as_deref())
            .opt(
                "searchCriteria.sourceRefName",
                criteria.source_ref_name.as_deref(),
            )
            .opt(
                "searchCriteria.targetRefName",
                criteria.target_ref_name.as_deref(),
            )
            .push("$top", top);
        self.get_list(
            &[project, "_apis", "git", "repositories", repository_id, "pullrequests"],
            query,
        )
        .await
    }

    async fn get_pull_request(&self, project: &str, pull_request_id: i64) -> Result<Value> {
        let id = pull_request_id.to_string();
        self.get(
            &[project, "_apis", "git", "pullrequests", &id],
            Query::default(),
        )
        .await
    }

    async fn create_pull_request(
        &self,
        project: &str,
        repository_id: &str,
        pull_request: &NewPullRequest,
    ) -> Result<Value> {
        self.post(
            &[project, "_apis", "git", "repositories", repository_id, "pullrequests"],
            Query::default(),
            pull_request,
        )
        .await
    }

    async fn get_item(
        &self,
        project: &str,
        repository_id: &str,
        item: &ItemQuery,
    ) -> Result<Value> {
        let (version, version_type) = match &item.version_descriptor {
            Some(descriptor) => (Some(descriptor.version.as_str()), descriptor.version_type),
            None => (None, None),
        };

        let query = Query::default()
            .push("path", &item.path)
            .opt("scopePath", item.scope_path.as_deref())
            .enum_opt("recursionLevel", item.recursion_level)
            .opt("includeContentMetadata", item.include_content_metadata)
            .opt("latestProcessedChange", item.latest_processed_change)
            .opt("download", item.download)
            .opt("versionDescriptor.version", version)
            .enum_opt("versionDescriptor.versionType", version_type)
            .opt("includeContent", item.include_content)
            .opt("resolveLfs", item.resolve_lfs)
            .opt("sanitize", item.sanitize)
            .push("$format", "json");
        self.get(
            &[project, "_apis", "git", "repositories", repository_id, "items"],
            query,
        )
        .await
    }

    async fn get_definitions(&self, project: &str, query: &DefinitionQuery) -> Result<Vec<Value>> {
        let params = Query::default()
            .opt("name", query.name.as_deref())
            .opt("repositoryId", query.repository_id.as_deref())
            .opt("repositoryType", query.repository_type.as_deref())
            .enum_opt("queryOrder", query.query_order)
            .push("$top", query.top)
            .opt("continuationToken", query.continuation_token.as_deref())
            .list("definitionIds", &query.definition_ids)
            .opt("path", query.path.as_deref())
            .time_opt("builtAfter", query.built_after)
            .time_opt("notBuiltAfter", query.not_built_after)
            .opt("includeLatestBuilds", query.include_latest_builds)
            .opt("yamlFilename", query.yaml_filename.as_deref());
        self.get_list(&[project, "_apis", "build", "definitions"], params)
            .await
    }

    async fn get_definition_revisions(
        &self,
        project: &str,
        definition_id: i64,
    ) -> Result<Vec<Value>> {
        let id = definition_id.to_string();
        self.get_list(
            &[project, "_apis", "build", "definitions", &id, "revisions"],
            Query::default(),
        )
        .await
    }

    async fn get_builds(&self, project: &str, query: &BuildQuery) -> Result<Vec<Value>> {
        let params = Query::default()
            .list("definitions", &query.definitions)
            .opt("buildNumber", query.build_number.as_deref())
            .time_opt("minTime", query.min_time)
            .time_opt("maxTime", query.max_time)
            .opt("requestedFor", query.requested_for.as_deref())
            .enum_opt("reasonFilter", query.reason_filter)
            .enum_opt("statusFilter", query.status_filter)
            .enum_opt("resultFilter", query.result_filter)
            .list("tagFilters", &query.tag_filters)
            .push("$top", query.top)
            .opt("continuationToken", query.continuation_token.as_deref())
            .opt("maxBuildsPerDefinition", query.max_builds_per_definition)
            .enum_opt("deletedFilter", query.deleted_filter)
            .enum_opt("queryOrder", query.query_order)
            .opt("branchName", query.branch_name.as_deref())
            .list("buildIds", &query.build_ids)
            .opt("repositoryId", query.repository_id.as_deref())
            .opt("repositoryType", query.repository_type.as_deref());
        self.get_list(&[project, "_apis", "build", "builds"], params)
            .await
    }

    async fn get_build(&self, project: &str, build_id: i64) -> Result<Value> {
        let id = build_id.to_string();
        self.get(&[project, "_apis", "build", "builds", &id], Query::default())
            .await
    }

    async fn get_build_logs(&self, project: &str, build_id: i64) -> Result<Vec<Value>> {
        let id = build_id.to_string();
        self.get_list(
            &[project, "_apis", "build", "builds", &id, "logs"],
            Query::default(),
        )
        .await
    }

    async fn get_build_log_lines(
        &self,
        project: &str,
        build_id: i64,
        log_id: i64,
        range: LogRange,
    ) -> Result<Vec<String>> {
        let build = build_id.to_string();
        let log = log_id.to_string();
        let query = Query::default()
            .opt("startLine", range.start_line)
            .opt("endLine", range.end_line);
        self.get_list(
            &[project, "_apis", "build", "builds", &build, "logs", &log],
            query,
        )
        .await
    }

    async fn get_build_changes(
        &self,
        project: &str,
        build_id: i64,
        query: &ChangesQuery,
    ) -> Result<Vec<Value>> {
        let id = build_id.to_string();
        let params = Query::default()
            .opt("continuationToken", query.continuation_token.as_deref())
            .push("$top", query.top)
            .opt("includeSourceChange", query.include_source_change);
        self.get_list(
            &[project, "_apis", "build", "builds", &id, "changes"],
            params,
        )
        .await
    }

    async fn get_run(&self, project: &str, pipeline_id: i64, run_id: i64) -> Result<Value> {
        let pipeline = pipeline_id.to_string();
        let run = run_id.to_string();
        self.get(
            &[project, "_apis", "pipelines", &pipeline, "runs", &run],
            Query::default(),
        )
        .await
    }

    async fn list_runs(&self, project: &str, pipeline_id: i64) -> Result<Vec<Value>> {
        let pipeline = pipeline_id.to_string();
        self.get_list(
            &[project, "_apis", "pipelines", &pipeline, "runs"],
            Query::default(),
        )
        .await
    }

    async fn run_pipeline(
        &self,
        project: &str,
        pipeline_id: i64,
        pipeline_version: Option<i64>,
        parameters: &RunPipelineParameters,
    ) -> Result<Value> {
        let pipeline = pipeline_id.to_string();
        let query = Query::default().opt("pipelineVersion", pipeline_version);
        self.post(
            &[project, "_apis", "pipelines", &pipeline, "runs"],
            query,
            parameters,
        )
        .await
    }
}

/// Connector producing [`RestClient`]s
#[derive(Debug, Clone)]
pub struct RestConnector {
    api_version: String,
}

impl RestConnector {
    /// Connector sending `api-version=<api_version>` on every request
    pub fn new(api_version: impl Into<String>) -> Self {
        Self {
            api_version: api_version.into(),
        }
    }
}

impl Connector for RestConnector {
    fn connect(&self, endpoint: &Endpoint) -> Result<Arc<dyn DevOpsApi>> {
        let client = RestClient::new(endpoint, self.api_version.clone())?;
        Ok(Arc::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::AuthContext;
    use crate::credentials::Secret;
    use crate::enums::{BuildQueryOrder, BuildStatus};

    fn client() -> RestClient {
        let endpoint = Endpoint {
            organization: "contoso".to_string(),
            base_url: Url::parse("https://dev.azure.com/contoso").unwrap(),
            auth: AuthContext::from_pat(&Secret::new("pat")).unwrap(),
        };
        RestClient::new(&endpoint, "7.1").unwrap()
    }

    #[test]
    fn test_url_encodes_segments_and_appends_api_version() {
        let url = client()
            .url(&["My Project", "_apis", "git", "repositories"], Query::default())
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://dev.azure.com/contoso/My%20Project/_apis/git/repositories?api-version=7.1"
        );
    }

    #[test]
    fn test_query_skips_unset_values_and_joins_lists() {
        let query = Query::default()
            .opt::<&str>("name", None)
            .list("definitions", &[3_i64, 7])
            .list::<String>("tagFilters", &[])
            .enum_opt("statusFilter", Some(BuildStatus::InProgress))
            .enum_opt::<BuildQueryOrder>("queryOrder", None)
            .push("$top", 20);

        let url = client().url(&["p", "_apis", "build", "builds"], query).unwrap();
        assert_eq!(
            url.query(),
            Some("definitions=3%2C7&statusFilter=inProgress&%24top=20&api-version=7.1")
        );
    }

    #[test]
    fn test_times_are_rfc3339_utc() {
        let time = DateTime::parse_from_rfc3339("2024-05-01T10:00:00+02:00")
            .unwrap()
            .with_timezone(&Utc);
        let query = Query::default().time_opt("minTime", Some(time));
        assert_eq!(query.pairs[0].1, "2024-05-01T08:00:00Z");
    }

    #[test]
    fn test_error_message_prefers_service_message() {
        let body = r#"{"$id":"1","message":"TF401019: The Git repository does not exist."}"#;
        assert_eq!(
            error_message(StatusCode::NOT_FOUND, body),
            "TF401019: The Git repository does not exist."
        );
    }

    #[test]
    fn test_error_message_for_rejected_credentials() {
        let message = error_message(StatusCode::NON_AUTHORITATIVE_INFORMATION, "<html>");
        assert!(message.contains("authentication failed"));
    }

    #[test]
    fn test_error_message_falls_back_to_reason_or_body() {
        assert_eq!(
            error_message(StatusCode::TOO_MANY_REQUESTS, ""),
            "Too Many Requests"
        );
        let long = "x".repeat(MAX_ERROR_BODY_CHARS * 2);
        assert_eq!(
            error_message(StatusCode::CONFLICT, &long).len(),
            MAX_ERROR_BODY_CHARS
        );
    }

    /// Serve one canned HTTP response on a loopback port
    ///
    /// Returns the base URL to point a client at and a handle yielding the raw
    /// request head the client sent.
    async fn one_shot_server(
        status_line: &'static str,
        body: &'static str,
    ) -> (Url, tokio::task::JoinHandle<String>) {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let address = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut stream, _) = listener.accept().await.unwrap();
            let mut head = Vec::new();
            let mut buf = [0_u8; 1024];
            while !head.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = stream.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                head.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            stream.write_all(response.as_bytes()).await.unwrap();
            stream.shutdown().await.unwrap();
            String::from_utf8_lossy(&head).into_owned()
        });

        let base_url = Url::parse(&format!("http://{address}/contoso")).unwrap();
        (base_url, handle)
    }

    fn client_for(base_url: Url) -> RestClient {
        let endpoint = Endpoint {
            organization: "contoso".to_string(),
            base_url,
            auth: AuthContext::from_pat(&Secret::new("pat")).unwrap(),
        };
        RestClient::new(&endpoint, "7.1").unwrap()
    }

    #[tokio::test]
    async fn test_non_authoritative_reply_is_an_authentication_failure() {
        let (base_url, server) =
            one_shot_server("203 Non-Authoritative Information", "<html>Sign in</html>").await;

        let err = client_for(base_url).list_projects().await.unwrap_err();
        server.await.unwrap();

        assert!(err.is_authentication_failure());
        assert!(matches!(err, AzdoError::Upstream { status: 203, .. }));
        assert!(err.to_string().contains("authentication failed"));
    }

    #[tokio::test]
    async fn test_unauthorized_reply_is_an_authentication_failure() {
        let (base_url, server) = one_shot_server("401 Unauthorized", "").await;

        let err = client_for(base_url).list_projects().await.unwrap_err();
        server.await.unwrap();

        assert!(err.is_authentication_failure());
        assert!(matches!(err, AzdoError::Upstream { status: 401, .. }));
    }

    #[tokio::test]
    async fn test_not_found_carries_service_message() {
        let (base_url, server) = one_shot_server(
            "404 Not Found",
            r#"{"message":"TF401019: The Git repository does not exist."}"#,
        )
        .await;

        let err = client_for(base_url)
            .list_repositories("P", None)
            .await
            .unwrap_err();
        server.await.unwrap();

        assert!(!err.is_authentication_failure());
        assert_eq!(
            err.to_string(),
            "Azure DevOps request failed with status 404: TF401019: The Git repository does not exist."
        );
    }

    #[tokio::test]
    async fn test_log_lines_request_path_and_list_unwrapping() {
        let (base_url, server) =
            one_shot_server("200 OK", r#"{"count":2,"value":["a","b"]}"#).await;

        let range = LogRange {
            start_line: Some(1),
            end_line: None,
        };
        let lines = client_for(base_url)
            .get_build_log_lines("P", 1, 2, range)
            .await
            .unwrap();
        let head = server.await.unwrap();

        assert_eq!(lines, vec!["a".to_string(), "b".to_string()]);
        let expected = "GET /contoso/P/_apis/build/builds/1/logs/2?startLine=1&api-version=7.1 ";
        assert!(head.starts_with(expected), "unexpected request: {head}");
        assert!(head.to_ascii_lowercase().contains("authorization: basic "));
    }

    #[test]
    fn test_list_envelope_tolerates_missing_value() {
        let envelope: ListEnvelope<Value> = serde_json::from_str(r#"{"count":0}"#).unwrap();
        assert!(envelope.value.is_empty());
    }
}
