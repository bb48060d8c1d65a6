//! GitLab API client implementation.

use crate::auth::AuthMethod;
use crate::config::{GitLabConfig, GitLabConfigBuilder, RetryConfig};
use crate::errors::{GitLabError, GitLabErrorKind, GitLabResult, RateLimitInfo};
use crate::pagination::Page;
use crate::services::*;
use chrono::DateTime;
use reqwest::header::{HeaderMap, ACCEPT, USER_AGENT};
use reqwest::{Client, Method, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use std::time::Duration;
use tokio::time::sleep;

/// Per-request modifiers applied on top of the client configuration.
///
/// This is the composition point for anything that varies call-to-call:
/// `sudo` impersonation and extra headers.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    sudo: Option<String>,
    headers: Vec<(String, String)>,
}

impl RequestOptions {
    /// Creates empty request options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Performs the request on behalf of another user (admin only).
    pub fn sudo(mut self, user: impl Into<String>) -> Self {
        self.sudo = Some(user.into());
        self
    }

    /// Adds an extra header to the request.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    fn apply(&self, mut request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        if let Some(ref user) = self.sudo {
            request = request.header("Sudo", user);
        }
        for (name, value) in &self.headers {
            request = request.header(name.as_str(), value.as_str());
        }
        request
    }
}

/// Retry executor with exponential backoff, used only by the shared
/// transport. Service methods themselves never retry.
#[derive(Debug, Clone)]
struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    async fn execute<F, Fut, T>(&self, mut operation: F) -> GitLabResult<T>
    where
        F: FnMut() -> Fut,
        Fut: std::future::Future<Output = GitLabResult<T>>,
    {
        if !self.config.enabled {
            return operation().await;
        }

        let mut attempt = 0;
        loop {
            match operation().await {
                Ok(result) => return Ok(result),
                Err(e) => {
                    attempt += 1;

                    if !e.is_retryable() || attempt >= self.config.max_attempts {
                        return Err(e);
                    }

                    let delay = e
                        .retry_after()
                        .map(Duration::from_secs)
                        .unwrap_or_else(|| self.backoff(attempt));

                    tracing::debug!(
                        attempt = attempt,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Retrying after error"
                    );

                    sleep(delay).await;
                }
            }
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        let base = self.config.initial_backoff.as_millis() as f64
            * self.config.multiplier.powi(attempt.saturating_sub(1) as i32);
        let capped = base.min(self.config.max_backoff.as_millis() as f64);

        let jitter_range = capped * self.config.jitter;
        let jitter = rand_jitter() * jitter_range * 2.0 - jitter_range;
        Duration::from_millis((capped + jitter).max(0.0) as u64)
    }
}

/// Simple random jitter (0.0 to 1.0).
fn rand_jitter() -> f64 {
    use std::time::SystemTime;
    let nanos = SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .unwrap_or_default()
        .subsec_nanos();
    f64::from(nanos) / f64::from(u32::MAX)
}

/// GitLab API client.
///
/// Cloning is cheap: the underlying connection pool is shared between
/// clones, which is what the paginators rely on.
#[derive(Clone)]
pub struct GitLabClient {
    /// HTTP client.
    http: Client,
    /// Configuration.
    config: GitLabConfig,
    /// Retry executor.
    retry: RetryExecutor,
}

impl GitLabClient {
    /// Creates a new GitLab client.
    pub fn new(config: GitLabConfig) -> GitLabResult<Self> {
        config.validate()?;

        if config.auth.is_none() {
            return Err(GitLabError::new(
                GitLabErrorKind::MissingAuth,
                "Authentication required",
            ));
        }

        let http = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .pool_max_idle_per_host(config.pool.max_idle_per_host)
            .pool_idle_timeout(config.pool.idle_timeout)
            .build()
            .map_err(|e| {
                GitLabError::new(
                    GitLabErrorKind::InvalidConfiguration,
                    format!("Failed to create HTTP client: {}", e),
                )
            })?;

        let retry = RetryExecutor::new(config.retry.clone());

        Ok(Self {
            http,
            config,
            retry,
        })
    }

    /// Creates a new client builder.
    pub fn builder() -> GitLabClientBuilder {
        GitLabClientBuilder::new()
    }

    /// Gets the base URL.
    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    // Service accessors

    /// Gets the projects service.
    pub fn projects(&self) -> ProjectsService {
        ProjectsService::new(self)
    }

    /// Gets the groups service.
    pub fn groups(&self) -> GroupsService {
        GroupsService::new(self)
    }

    /// Gets the users service.
    pub fn users(&self) -> UsersService {
        UsersService::new(self)
    }

    /// Gets the issues service.
    pub fn issues(&self) -> IssuesService {
        IssuesService::new(self)
    }

    /// Gets the merge requests service.
    pub fn merge_requests(&self) -> MergeRequestsService {
        MergeRequestsService::new(self)
    }

    /// Gets the pipelines service.
    pub fn pipelines(&self) -> PipelinesService {
        PipelinesService::new(self)
    }

    /// Gets the CI/CD variables service.
    pub fn variables(&self) -> VariablesService {
        VariablesService::new(self)
    }

    // HTTP methods

    /// Makes a GET request.
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> GitLabResult<T> {
        self.request(Method::GET, path, Option::<&()>::None, None)
            .await
    }

    /// Makes a GET request with query parameters.
    pub async fn get_with_params<T: DeserializeOwned, P: Serialize>(
        &self,
        path: &str,
        params: &P,
    ) -> GitLabResult<T> {
        let path = self.path_with_query(path, params)?;
        self.request(Method::GET, &path, Option::<&()>::None, None)
            .await
    }

    /// Makes a GET request with query parameters and request options.
    pub async fn get_with_options<T: DeserializeOwned, P: Serialize>(
        &self,
        path: &str,
        params: &P,
        options: &RequestOptions,
    ) -> GitLabResult<T> {
        let path = self.path_with_query(path, params)?;
        self.request(Method::GET, &path, Option::<&()>::None, Some(options))
            .await
    }

    /// Makes a paginated GET request, returning one page plus its cursors.
    pub async fn get_page<T: DeserializeOwned, P: Serialize>(
        &self,
        path: &str,
        params: &P,
        page: Option<u32>,
    ) -> GitLabResult<Page<T>> {
        let mut path = self.path_with_query(path, params)?;
        if let Some(page) = page {
            let separator = if path.contains('?') { '&' } else { '?' };
            path = format!("{}{}page={}", path, separator, page);
        }

        let url = self.build_url(&path);
        self.fetch_page(&url).await
    }

    /// Fetches a page from an absolute URL, as handed out by a keyset
    /// `Link` header. The URL is requested verbatim.
    pub async fn get_page_url<T: DeserializeOwned>(&self, url: &str) -> GitLabResult<Page<T>> {
        self.fetch_page(url).await
    }

    async fn fetch_page<T: DeserializeOwned>(&self, url: &str) -> GitLabResult<Page<T>> {
        let response = self.execute(Method::GET, url, None, None).await?;
        let headers = response.headers().clone();
        let items: Vec<T> = response.json().await.map_err(|e| {
            GitLabError::deserialization(format!("Failed to deserialize response: {}", e))
        })?;

        Ok(Page::from_response(items, &headers))
    }

    /// Makes a POST request.
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> GitLabResult<T> {
        self.request(Method::POST, path, Some(body), None).await
    }

    /// Makes a POST request with request options.
    pub async fn post_with_options<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
        options: &RequestOptions,
    ) -> GitLabResult<T> {
        self.request(Method::POST, path, Some(body), Some(options))
            .await
    }

    /// Makes a POST request without decoding a response body.
    pub async fn post_no_response<B: Serialize>(&self, path: &str, body: &B) -> GitLabResult<()> {
        let url = self.build_url(path);
        self.execute(Method::POST, &url, Some(serialize_body(body)?), None)
            .await?;
        Ok(())
    }

    /// Makes a PUT request.
    pub async fn put<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> GitLabResult<T> {
        self.request(Method::PUT, path, Some(body), None).await
    }

    /// Makes a PUT request without decoding a response body.
    pub async fn put_no_response<B: Serialize>(&self, path: &str, body: &B) -> GitLabResult<()> {
        let url = self.build_url(path);
        self.execute(Method::PUT, &url, Some(serialize_body(body)?), None)
            .await?;
        Ok(())
    }

    /// Makes a DELETE request.
    pub async fn delete(&self, path: &str) -> GitLabResult<()> {
        let url = self.build_url(path);
        self.execute(Method::DELETE, &url, None, None).await?;
        Ok(())
    }

    /// Makes a DELETE request with request options.
    pub async fn delete_with_options(
        &self,
        path: &str,
        options: &RequestOptions,
    ) -> GitLabResult<()> {
        let url = self.build_url(path);
        self.execute(Method::DELETE, &url, None, Some(options))
            .await?;
        Ok(())
    }

    // Internal methods

    async fn request<T: DeserializeOwned, B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
        options: Option<&RequestOptions>,
    ) -> GitLabResult<T> {
        let url = self.build_url(path);
        let body_bytes = body.map(serialize_body).transpose()?;
        let response = self.execute(method, &url, body_bytes, options).await?;

        response.json().await.map_err(|e| {
            GitLabError::deserialization(format!("Failed to deserialize response: {}", e))
        })
    }

    async fn execute(
        &self,
        method: Method,
        url: &str,
        body_bytes: Option<Vec<u8>>,
        options: Option<&RequestOptions>,
    ) -> GitLabResult<Response> {
        // The config is validated at construction; auth is always present.
        let auth = self.config.auth.clone().ok_or_else(|| {
            GitLabError::new(GitLabErrorKind::MissingAuth, "Authentication required")
        })?;
        let options = options.cloned().unwrap_or_default();

        self.retry
            .execute(|| {
                let request = self.prepare_request(
                    method.clone(),
                    url,
                    &auth,
                    body_bytes.clone(),
                    &options,
                );

                async move {
                    tracing::debug!(url = url, "Dispatching request");

                    let response = request.send().await.map_err(|e| {
                        if e.is_timeout() {
                            GitLabError::timeout(format!("Request timed out: {}", e))
                        } else if e.is_connect() {
                            GitLabError::new(
                                GitLabErrorKind::ConnectionFailed,
                                format!("Connection failed: {}", e),
                            )
                        } else {
                            GitLabError::new(
                                GitLabErrorKind::Unknown,
                                format!("Request failed: {}", e),
                            )
                        }
                    })?;

                    let status = response.status();
                    if !status.is_success() {
                        return Err(Self::handle_error_response(response).await);
                    }

                    Ok(response)
                }
            })
            .await
    }

    fn prepare_request(
        &self,
        method: Method,
        url: &str,
        auth: &AuthMethod,
        body_bytes: Option<Vec<u8>>,
        options: &RequestOptions,
    ) -> reqwest::RequestBuilder {
        let (auth_name, auth_value) = auth.header();
        let mut request = self
            .http
            .request(method, url)
            .header(auth_name, auth_value)
            .header(USER_AGENT, &self.config.user_agent)
            .header(ACCEPT, "application/json");

        if let Some(bytes) = body_bytes {
            request = request.header("Content-Type", "application/json").body(bytes);
        }

        options.apply(request)
    }

    fn path_with_query<P: Serialize>(&self, path: &str, params: &P) -> GitLabResult<String> {
        let query = serde_urlencoded::to_string(params).map_err(|e| {
            GitLabError::new(
                GitLabErrorKind::InvalidParameter,
                format!("Failed to serialize parameters: {}", e),
            )
        })?;

        if query.is_empty() {
            Ok(path.to_string())
        } else {
            let separator = if path.contains('?') { '&' } else { '?' };
            Ok(format!("{}{}{}", path, separator, query))
        }
    }

    fn build_url(&self, path: &str) -> String {
        let base = self.config.base_url.trim_end_matches('/');
        let path = path.trim_start_matches('/');
        format!("{}/{}", base, path)
    }

    fn extract_rate_limit(headers: &HeaderMap) -> Option<RateLimitInfo> {
        let limit = header_value(headers, "ratelimit-limit")?;
        let remaining = header_value(headers, "ratelimit-remaining")?;
        let reset_timestamp: i64 = header_value(headers, "ratelimit-reset")?;
        let reset_at = DateTime::from_timestamp(reset_timestamp, 0)?;
        let retry_after = header_value(headers, "retry-after");

        Some(RateLimitInfo {
            limit,
            remaining,
            reset_at,
            retry_after,
        })
    }

    async fn handle_error_response(response: Response) -> GitLabError {
        let status = response.status();
        let request_id = response
            .headers()
            .get("x-request-id")
            .and_then(|v| v.to_str().ok())
            .map(String::from);
        let rate_limit = Self::extract_rate_limit(response.headers());

        let message = match response.json::<GitLabErrorResponse>().await {
            Ok(body) => body.into_message(),
            Err(_) => format!("HTTP {} error", status.as_u16()),
        };

        let mut error = GitLabError::from_response(status.as_u16(), message, request_id);

        if status == StatusCode::TOO_MANY_REQUESTS {
            if let Some(info) = rate_limit {
                error = error.with_rate_limit(info);
            }
        }

        error
    }
}

fn serialize_body<B: Serialize>(body: &B) -> GitLabResult<Vec<u8>> {
    serde_json::to_vec(body).map_err(|e| {
        GitLabError::new(
            GitLabErrorKind::InvalidParameter,
            format!("Failed to serialize request body: {}", e),
        )
    })
}

fn header_value<N: std::str::FromStr>(headers: &HeaderMap, name: &str) -> Option<N> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse().ok())
}

/// GitLab error response format.
///
/// Errors arrive as `{"message": ...}` where the message may be a plain
/// string or a structured map of field errors, or as the legacy
/// `{"error": "..."}` shape.
#[derive(Debug, serde::Deserialize)]
struct GitLabErrorResponse {
    message: Option<serde_json::Value>,
    error: Option<String>,
}

impl GitLabErrorResponse {
    fn into_message(self) -> String {
        if let Some(message) = self.message {
            return match message {
                serde_json::Value::String(s) => s,
                other => other.to_string(),
            };
        }
        self.error.unwrap_or_else(|| "unknown error".to_string())
    }
}

/// Builder for GitLabClient.
pub struct GitLabClientBuilder {
    config_builder: GitLabConfigBuilder,
}

impl GitLabClientBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self {
            config_builder: GitLabConfig::builder(),
        }
    }

    /// Sets the base URL.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.base_url(url);
        self
    }

    /// Sets the authentication method.
    pub fn auth(mut self, auth: AuthMethod) -> Self {
        self.config_builder = self.config_builder.auth(auth);
        self
    }

    /// Sets a private (personal/project) access token.
    pub fn private_token(self, token: impl Into<String>) -> Self {
        self.auth(AuthMethod::private_token(token))
    }

    /// Sets an OAuth2 access token.
    pub fn oauth_token(self, token: impl Into<String>) -> Self {
        self.auth(AuthMethod::oauth(token))
    }

    /// Sets the timeout.
    pub fn timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config_builder = self.config_builder.timeout(timeout);
        self
    }

    /// Sets the User-Agent.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config_builder = self.config_builder.user_agent(ua);
        self
    }

    /// Disables retries.
    pub fn no_retry(mut self) -> Self {
        self.config_builder = self.config_builder.no_retry();
        self
    }

    /// Builds the client.
    pub fn build(self) -> GitLabResult<GitLabClient> {
        let config = self.config_builder.build()?;
        GitLabClient::new(config)
    }
}

impl Default for GitLabClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_client() -> GitLabClient {
        GitLabClient::builder()
            .private_token("glpat-test")
            .build()
            .unwrap()
    }

    #[test]
    fn test_build_url() {
        let client = test_client();

        assert_eq!(
            client.build_url("/projects/42"),
            "https://gitlab.com/api/v4/projects/42"
        );
        assert_eq!(
            client.build_url("projects/42"),
            "https://gitlab.com/api/v4/projects/42"
        );
    }

    #[test]
    fn test_path_with_query() {
        let client = test_client();

        #[derive(Serialize)]
        struct Params {
            search: &'static str,
        }

        let path = client
            .path_with_query("projects", &Params { search: "api" })
            .unwrap();
        assert_eq!(path, "projects?search=api");

        let path = client.path_with_query("projects", &()).unwrap();
        assert_eq!(path, "projects");
    }

    #[test]
    fn test_client_requires_auth() {
        let result = GitLabClient::new(GitLabConfig::default());
        assert!(result.is_err());
    }

    #[test]
    fn test_client_builder() {
        let result = GitLabClient::builder()
            .private_token("glpat-xxxx")
            .user_agent("test-client/1.0")
            .build();

        assert!(result.is_ok());
    }

    #[test]
    fn test_error_response_message_shapes() {
        let plain: GitLabErrorResponse =
            serde_json::from_str(r#"{"message": "404 Project Not Found"}"#).unwrap();
        assert_eq!(plain.into_message(), "404 Project Not Found");

        let structured: GitLabErrorResponse =
            serde_json::from_str(r#"{"message": {"name": ["has already been taken"]}}"#).unwrap();
        assert_eq!(
            structured.into_message(),
            r#"{"name":["has already been taken"]}"#
        );

        let legacy: GitLabErrorResponse =
            serde_json::from_str(r#"{"error": "insufficient_scope"}"#).unwrap();
        assert_eq!(legacy.into_message(), "insufficient_scope");
    }
}
