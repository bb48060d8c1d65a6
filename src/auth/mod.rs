//! Authentication mechanisms for the GitLab API.

use crate::errors::{GitLabError, GitLabErrorKind, GitLabResult};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

/// Authentication method for the GitLab API.
#[derive(Debug, Clone)]
pub enum AuthMethod {
    /// Personal or project access token, sent as `PRIVATE-TOKEN`.
    PrivateToken(SecretString),
    /// OAuth2 access token, sent as `Authorization: Bearer`.
    OAuth(SecretString),
    /// CI job token (`CI_JOB_TOKEN`), sent as `JOB-TOKEN`.
    JobToken(SecretString),
}

impl AuthMethod {
    /// Creates a private token authentication method.
    pub fn private_token(token: impl Into<String>) -> Self {
        Self::PrivateToken(SecretString::new(token.into()))
    }

    /// Creates an OAuth authentication method.
    pub fn oauth(token: impl Into<String>) -> Self {
        Self::OAuth(SecretString::new(token.into()))
    }

    /// Creates a CI job token authentication method.
    pub fn job_token(token: impl Into<String>) -> Self {
        Self::JobToken(SecretString::new(token.into()))
    }

    /// Gets a redacted token label for logging.
    pub fn token_prefix(&self) -> &'static str {
        match self {
            Self::PrivateToken(t) => {
                if t.expose_secret().starts_with("glpat-") {
                    "glpat-***"
                } else {
                    "***"
                }
            }
            Self::OAuth(_) => "oauth_***",
            Self::JobToken(_) => "job_***",
        }
    }

    /// Returns the header name and value carrying this credential.
    pub fn header(&self) -> (&'static str, String) {
        match self {
            Self::PrivateToken(token) => ("PRIVATE-TOKEN", token.expose_secret().clone()),
            Self::OAuth(token) => (
                "Authorization",
                format!("Bearer {}", token.expose_secret()),
            ),
            Self::JobToken(token) => ("JOB-TOKEN", token.expose_secret().clone()),
        }
    }
}

/// Credential provider trait for dynamic credential resolution.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Gets the current authentication method.
    async fn get_auth(&self) -> GitLabResult<AuthMethod>;

    /// Checks if credentials are available.
    async fn is_valid(&self) -> bool;
}

/// Static credential provider using fixed credentials.
pub struct StaticCredentialProvider {
    method: AuthMethod,
}

impl StaticCredentialProvider {
    /// Creates a new static credential provider.
    pub fn new(method: AuthMethod) -> Self {
        Self { method }
    }
}

#[async_trait]
impl CredentialProvider for StaticCredentialProvider {
    async fn get_auth(&self) -> GitLabResult<AuthMethod> {
        Ok(self.method.clone())
    }

    async fn is_valid(&self) -> bool {
        true
    }
}

/// Environment variable credential provider.
pub struct EnvCredentialProvider {
    token_var: String,
    as_job_token: bool,
}

impl EnvCredentialProvider {
    /// Creates a provider reading `GITLAB_TOKEN` as a private token.
    pub fn from_gitlab_token() -> Self {
        Self {
            token_var: "GITLAB_TOKEN".to_string(),
            as_job_token: false,
        }
    }

    /// Creates a provider reading `CI_JOB_TOKEN` as a job token.
    pub fn from_ci_job_token() -> Self {
        Self {
            token_var: "CI_JOB_TOKEN".to_string(),
            as_job_token: true,
        }
    }

    /// Creates a provider reading a private token from a custom variable.
    pub fn from_env_var(var_name: impl Into<String>) -> Self {
        Self {
            token_var: var_name.into(),
            as_job_token: false,
        }
    }
}

#[async_trait]
impl CredentialProvider for EnvCredentialProvider {
    async fn get_auth(&self) -> GitLabResult<AuthMethod> {
        let token = std::env::var(&self.token_var).map_err(|_| {
            GitLabError::new(
                GitLabErrorKind::MissingAuth,
                format!("Environment variable {} not set", self.token_var),
            )
        })?;

        if self.as_job_token {
            Ok(AuthMethod::job_token(token))
        } else {
            Ok(AuthMethod::private_token(token))
        }
    }

    async fn is_valid(&self) -> bool {
        std::env::var(&self.token_var).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_token_header() {
        let auth = AuthMethod::private_token("glpat-xxxxxxxxxxxx");
        let (name, value) = auth.header();
        assert_eq!(name, "PRIVATE-TOKEN");
        assert_eq!(value, "glpat-xxxxxxxxxxxx");
        assert_eq!(auth.token_prefix(), "glpat-***");
    }

    #[test]
    fn test_oauth_header() {
        let auth = AuthMethod::oauth("abc123");
        let (name, value) = auth.header();
        assert_eq!(name, "Authorization");
        assert_eq!(value, "Bearer abc123");
    }

    #[test]
    fn test_job_token_header() {
        let auth = AuthMethod::job_token("job-secret");
        let (name, value) = auth.header();
        assert_eq!(name, "JOB-TOKEN");
        assert_eq!(value, "job-secret");
        assert_eq!(auth.token_prefix(), "job_***");
    }

    #[tokio::test]
    async fn test_static_credential_provider() {
        let provider = StaticCredentialProvider::new(AuthMethod::private_token("t"));
        assert!(provider.is_valid().await);
        let (name, _) = provider.get_auth().await.unwrap().header();
        assert_eq!(name, "PRIVATE-TOKEN");
    }
}
