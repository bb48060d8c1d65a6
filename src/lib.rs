//! # GitLab Integration Library
//!
//! A production-ready GitLab REST API (v4) client with:
//! - Typed resource services (projects, groups, users, issues, merge
//!   requests, pipelines, CI/CD variables)
//! - Flexible identifiers: numeric IDs or `namespace/project` paths
//! - Offset and keyset pagination behind one generic pager, with eager
//!   and lazy consumption modes
//! - Multiple authentication methods (private token, OAuth, CI job token)
//! - Retry with exponential backoff in the shared transport
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use integrations_gitlab::{AuthMethod, GitLabClient, GitLabConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GitLabConfig::builder()
//!         .auth(AuthMethod::private_token("glpat-xxxxxxxxxxxx"))
//!         .build()?;
//!
//!     let client = GitLabClient::new(config)?;
//!
//!     // Projects accept numeric IDs or namespace paths.
//!     let project = client.projects().get("gitlab-org/gitlab").await?;
//!     println!("{}", project.path_with_namespace);
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
pub mod config;
pub mod errors;
pub mod ids;
pub mod types;

// Authentication
pub mod auth;

// HTTP client and transport
pub mod client;

// Pagination handling
pub mod pagination;

// API Services
pub mod services;

// Re-exports for convenience
pub use auth::AuthMethod;
pub use client::{GitLabClient, GitLabClientBuilder, RequestOptions};
pub use config::{GitLabConfig, GitLabConfigBuilder};
pub use errors::{GitLabError, GitLabErrorKind, GitLabResult};
pub use ids::ResourceId;
pub use pagination::{Page, PageCursor, PageInfo, Pager, PaginationLinks};
pub use types::*;
