//! Configuration types for the GitLab client.

use crate::auth::AuthMethod;
use crate::errors::{GitLabError, GitLabErrorKind};
use std::time::Duration;
use url::Url;

/// Default GitLab API base URL (gitlab.com, API v4).
pub const DEFAULT_BASE_URL: &str = "https://gitlab.com/api/v4";

/// Default request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default connect timeout.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Default User-Agent header.
pub const DEFAULT_USER_AGENT: &str = "integrations-gitlab/0.1.0";

/// Retry configuration for the shared transport.
///
/// Individual service methods never retry; this is the only retry policy
/// in the crate.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum retry attempts.
    pub max_attempts: u32,
    /// Initial backoff delay.
    pub initial_backoff: Duration,
    /// Maximum backoff delay.
    pub max_backoff: Duration,
    /// Backoff multiplier.
    pub multiplier: f64,
    /// Jitter factor (0.0 to 1.0).
    pub jitter: f64,
    /// Enable retries.
    pub enabled: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
            max_backoff: Duration::from_secs(60),
            multiplier: 2.0,
            jitter: 0.1,
            enabled: true,
        }
    }
}

/// Connection pool configuration.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Maximum idle connections per host.
    pub max_idle_per_host: usize,
    /// Idle connection timeout.
    pub idle_timeout: Duration,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            max_idle_per_host: 20,
            idle_timeout: Duration::from_secs(90),
        }
    }
}

/// GitLab client configuration.
#[derive(Debug, Clone)]
pub struct GitLabConfig {
    /// API base URL, including the `/api/v4` prefix.
    pub base_url: String,
    /// Authentication method.
    pub auth: Option<AuthMethod>,
    /// Request timeout.
    pub timeout: Duration,
    /// Connect timeout.
    pub connect_timeout: Duration,
    /// User-Agent header.
    pub user_agent: String,
    /// Retry configuration.
    pub retry: RetryConfig,
    /// Connection pool configuration.
    pub pool: PoolConfig,
}

impl Default for GitLabConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            auth: None,
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            retry: RetryConfig::default(),
            pool: PoolConfig::default(),
        }
    }
}

impl GitLabConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> GitLabConfigBuilder {
        GitLabConfigBuilder::new()
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), GitLabError> {
        if self.base_url.is_empty() {
            return Err(GitLabError::new(
                GitLabErrorKind::InvalidBaseUrl,
                "Base URL cannot be empty",
            ));
        }

        let url = Url::parse(&self.base_url).map_err(|e| {
            GitLabError::new(
                GitLabErrorKind::InvalidBaseUrl,
                format!("Invalid base URL: {}", e),
            )
        })?;

        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(GitLabError::new(
                GitLabErrorKind::InvalidBaseUrl,
                "Base URL must use http or https",
            ));
        }

        if self.user_agent.is_empty() {
            return Err(GitLabError::configuration("User-Agent cannot be empty"));
        }

        Ok(())
    }
}

/// Builder for GitLabConfig.
#[derive(Debug, Default)]
pub struct GitLabConfigBuilder {
    base_url: Option<String>,
    auth: Option<AuthMethod>,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    user_agent: Option<String>,
    retry: Option<RetryConfig>,
    pool: Option<PoolConfig>,
}

impl GitLabConfigBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the base URL, e.g. `https://gitlab.example.com/api/v4`.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Sets the authentication method.
    pub fn auth(mut self, auth: AuthMethod) -> Self {
        self.auth = Some(auth);
        self
    }

    /// Sets the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connect timeout.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets the User-Agent header.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Sets the retry configuration.
    pub fn retry(mut self, config: RetryConfig) -> Self {
        self.retry = Some(config);
        self
    }

    /// Disables retries.
    pub fn no_retry(mut self) -> Self {
        self.retry = Some(RetryConfig {
            enabled: false,
            ..Default::default()
        });
        self
    }

    /// Sets the connection pool configuration.
    pub fn pool(mut self, config: PoolConfig) -> Self {
        self.pool = Some(config);
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> Result<GitLabConfig, GitLabError> {
        let config = GitLabConfig {
            base_url: self.base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            auth: self.auth,
            timeout: self.timeout.unwrap_or(DEFAULT_TIMEOUT),
            connect_timeout: self.connect_timeout.unwrap_or(DEFAULT_CONNECT_TIMEOUT),
            user_agent: self.user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
            retry: self.retry.unwrap_or_default(),
            pool: self.pool.unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GitLabConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert!(config.auth.is_none());
        assert!(config.retry.enabled);
    }

    #[test]
    fn test_config_builder() {
        let config = GitLabConfig::builder()
            .base_url("https://gitlab.example.com/api/v4")
            .user_agent("test-client/1.0")
            .timeout(Duration::from_secs(60))
            .build()
            .unwrap();

        assert_eq!(config.base_url, "https://gitlab.example.com/api/v4");
        assert_eq!(config.user_agent, "test-client/1.0");
        assert_eq!(config.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_invalid_base_url() {
        let result = GitLabConfig::builder().base_url("gitlab.example.com").build();
        assert!(result.is_err());
    }
}
