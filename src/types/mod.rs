//! Core data types for the GitLab API.
//!
//! Flat mirrors of the JSON payloads. Nullable keys are `Option`, closed
//! vocabularies are enums, and nothing here carries behavior beyond
//! (de)serialization.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Visibility level of a project or group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Private,
    Internal,
    Public,
}

/// GitLab user (the short form embedded in other resources).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    /// User ID.
    pub id: u64,
    /// Username (login).
    pub username: String,
    /// Display name.
    pub name: String,
    /// Account state (active, blocked, ...).
    pub state: Option<String>,
    /// Avatar URL.
    pub avatar_url: Option<String>,
    /// Profile URL.
    pub web_url: Option<String>,
}

/// The authenticated user, as returned by `GET /user`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentUser {
    /// User ID.
    pub id: u64,
    /// Username.
    pub username: String,
    /// Display name.
    pub name: String,
    /// Primary email address.
    pub email: Option<String>,
    /// Whether the user is an administrator.
    #[serde(default)]
    pub is_admin: bool,
    /// Account creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Whether the account is a bot.
    #[serde(default)]
    pub bot: bool,
}

/// Namespace a project lives in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Namespace {
    /// Namespace ID.
    pub id: u64,
    /// Namespace name.
    pub name: String,
    /// Namespace path.
    pub path: String,
    /// Full path including parent namespaces.
    pub full_path: String,
    /// Kind: `user` or `group`.
    pub kind: String,
}

/// GitLab project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Project ID.
    pub id: u64,
    /// Project name.
    pub name: String,
    /// Project path.
    pub path: String,
    /// Full path including the namespace (`namespace/project`).
    pub path_with_namespace: String,
    /// Project description.
    pub description: Option<String>,
    /// Visibility level.
    pub visibility: Option<Visibility>,
    /// Default branch.
    pub default_branch: Option<String>,
    /// Owning namespace.
    pub namespace: Option<Namespace>,
    /// Web URL.
    pub web_url: Option<String>,
    /// HTTP clone URL.
    pub http_url_to_repo: Option<String>,
    /// SSH clone URL.
    pub ssh_url_to_repo: Option<String>,
    /// Topics assigned to the project.
    #[serde(default)]
    pub topics: Vec<String>,
    /// Star count.
    #[serde(default)]
    pub star_count: u32,
    /// Fork count.
    #[serde(default)]
    pub forks_count: u32,
    /// Open issue count. Absent when issues are disabled.
    pub open_issues_count: Option<u32>,
    /// Whether the project is archived.
    #[serde(default)]
    pub archived: bool,
    /// Last activity time.
    pub last_activity_at: Option<DateTime<Utc>>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
}

/// GitLab group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Group ID.
    pub id: u64,
    /// Group name.
    pub name: String,
    /// Group path.
    pub path: String,
    /// Full path including parent groups.
    pub full_path: String,
    /// Group description.
    pub description: Option<String>,
    /// Visibility level.
    pub visibility: Option<Visibility>,
    /// Parent group ID for subgroups.
    pub parent_id: Option<u64>,
    /// Web URL.
    pub web_url: Option<String>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
}

/// Milestone reference embedded in issues and merge requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Milestone {
    /// Milestone ID.
    pub id: u64,
    /// Milestone IID within its project or group.
    pub iid: u64,
    /// Milestone title.
    pub title: String,
    /// Milestone description.
    pub description: Option<String>,
    /// State: `active` or `closed`.
    pub state: Option<String>,
    /// Due date (date only).
    pub due_date: Option<String>,
}

/// Issue state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueState {
    Opened,
    Closed,
}

/// GitLab issue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Issue ID (globally unique).
    pub id: u64,
    /// Issue IID (unique within the project).
    pub iid: u64,
    /// ID of the project the issue belongs to.
    pub project_id: u64,
    /// Issue title.
    pub title: String,
    /// Issue description.
    pub description: Option<String>,
    /// Issue state.
    pub state: IssueState,
    /// Labels on the issue.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Milestone, if assigned.
    pub milestone: Option<Milestone>,
    /// Issue author.
    pub author: Option<User>,
    /// Assignees.
    #[serde(default)]
    pub assignees: Vec<User>,
    /// Whether the issue is confidential.
    #[serde(default)]
    pub confidential: bool,
    /// Upvote count.
    #[serde(default)]
    pub upvotes: u32,
    /// Note count.
    #[serde(default)]
    pub user_notes_count: u32,
    /// Web URL.
    pub web_url: Option<String>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
    /// Close time.
    pub closed_at: Option<DateTime<Utc>>,
}

/// Merge request state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeRequestState {
    Opened,
    Closed,
    Locked,
    Merged,
}

/// GitLab merge request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MergeRequest {
    /// Merge request ID (globally unique).
    pub id: u64,
    /// Merge request IID (unique within the project).
    pub iid: u64,
    /// ID of the target project.
    pub project_id: u64,
    /// Title.
    pub title: String,
    /// Description.
    pub description: Option<String>,
    /// State.
    pub state: MergeRequestState,
    /// Source branch.
    pub source_branch: String,
    /// Target branch.
    pub target_branch: String,
    /// ID of the source project (differs for cross-project MRs).
    pub source_project_id: Option<u64>,
    /// Author.
    pub author: Option<User>,
    /// Assignees.
    #[serde(default)]
    pub assignees: Vec<User>,
    /// Reviewers.
    #[serde(default)]
    pub reviewers: Vec<User>,
    /// Labels.
    #[serde(default)]
    pub labels: Vec<String>,
    /// Milestone, if assigned.
    pub milestone: Option<Milestone>,
    /// Whether the MR is a draft.
    #[serde(default)]
    pub draft: bool,
    /// Merge status reported by the server (`can_be_merged`, ...).
    pub merge_status: Option<String>,
    /// SHA of the MR head.
    pub sha: Option<String>,
    /// Whether the source branch is removed on merge.
    pub should_remove_source_branch: Option<bool>,
    /// Whether merge is blocked until the pipeline succeeds.
    pub merge_when_pipeline_succeeds: Option<bool>,
    /// Web URL.
    pub web_url: Option<String>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
    /// Merge time.
    pub merged_at: Option<DateTime<Utc>>,
}

/// Status of a pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineStatus {
    Created,
    WaitingForResource,
    Preparing,
    Pending,
    Running,
    Success,
    Failed,
    Canceled,
    Skipped,
    Manual,
    Scheduled,
}

/// Pipeline summary, as returned by list endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Pipeline {
    /// Pipeline ID.
    pub id: u64,
    /// Pipeline IID within the project.
    pub iid: Option<u64>,
    /// Project ID.
    pub project_id: u64,
    /// Pipeline status.
    pub status: PipelineStatus,
    /// Git ref the pipeline ran on.
    #[serde(rename = "ref")]
    pub ref_: String,
    /// Commit SHA.
    pub sha: String,
    /// Pipeline source (`push`, `web`, `schedule`, ...).
    pub source: Option<String>,
    /// Web URL.
    pub web_url: Option<String>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Full pipeline, as returned by single-pipeline endpoints.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineDetail {
    /// Pipeline ID.
    pub id: u64,
    /// Pipeline IID within the project.
    pub iid: Option<u64>,
    /// Project ID.
    pub project_id: u64,
    /// Pipeline status.
    pub status: PipelineStatus,
    /// Git ref the pipeline ran on.
    #[serde(rename = "ref")]
    pub ref_: String,
    /// Commit SHA.
    pub sha: String,
    /// Commit SHA of the previous pipeline on the same ref.
    pub before_sha: Option<String>,
    /// Whether the ref is a tag.
    #[serde(default)]
    pub tag: bool,
    /// User who triggered the pipeline.
    pub user: Option<User>,
    /// Start time.
    pub started_at: Option<DateTime<Utc>>,
    /// Finish time.
    pub finished_at: Option<DateTime<Utc>>,
    /// Duration in seconds.
    pub duration: Option<u64>,
    /// Test coverage percentage, rendered by the server as a string.
    pub coverage: Option<String>,
    /// Web URL.
    pub web_url: Option<String>,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
}

/// Variable passed when triggering a pipeline, and returned by the
/// pipeline variables endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineVariable {
    /// Variable name.
    pub key: String,
    /// Variable value.
    pub value: String,
    /// Variable type: `env_var` or `file`.
    pub variable_type: Option<VariableType>,
}

/// Type of a CI/CD variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VariableType {
    EnvVar,
    File,
}

/// Project- or group-level CI/CD variable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    /// Variable name.
    pub key: String,
    /// Variable value.
    pub value: String,
    /// Variable type.
    pub variable_type: VariableType,
    /// Whether the variable is protected.
    #[serde(default)]
    pub protected: bool,
    /// Whether the variable is masked in job logs.
    #[serde(default)]
    pub masked: bool,
    /// Whether the value is expanded into references.
    #[serde(default)]
    pub raw: bool,
    /// Environment scope the variable applies to.
    pub environment_scope: Option<String>,
}

/// Note (comment) on an issue or merge request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    /// Note ID.
    pub id: u64,
    /// Note body.
    pub body: String,
    /// Note author.
    pub author: Option<User>,
    /// Whether this is a system-generated note.
    #[serde(default)]
    pub system: bool,
    /// Type of the noteable (`Issue`, `MergeRequest`).
    pub noteable_type: Option<String>,
    /// ID of the noteable.
    pub noteable_id: Option<u64>,
    /// IID of the noteable within its project.
    pub noteable_iid: Option<u64>,
    /// Whether the note is internal (confidential).
    #[serde(default)]
    pub internal: bool,
    /// Creation time.
    pub created_at: Option<DateTime<Utc>>,
    /// Last update time.
    pub updated_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_project_decodes_from_fixture() {
        let json = r#"{
            "id": 278964,
            "name": "GitLab",
            "path": "gitlab",
            "path_with_namespace": "gitlab-org/gitlab",
            "description": "GitLab is an open source end-to-end software development platform.",
            "visibility": "public",
            "default_branch": "master",
            "namespace": {
                "id": 9970,
                "name": "GitLab.org",
                "path": "gitlab-org",
                "full_path": "gitlab-org",
                "kind": "group"
            },
            "web_url": "https://gitlab.com/gitlab-org/gitlab",
            "topics": ["devops"],
            "star_count": 23000,
            "forks_count": 5000,
            "archived": false
        }"#;

        let project: Project = serde_json::from_str(json).unwrap();
        assert_eq!(project.id, 278964);
        assert_eq!(project.path_with_namespace, "gitlab-org/gitlab");
        assert_eq!(project.visibility, Some(Visibility::Public));
        assert_eq!(project.namespace.as_ref().unwrap().kind, "group");
        assert_eq!(project.topics, vec!["devops"]);
    }

    #[test]
    fn test_pipeline_status_decodes_snake_case() {
        let status: PipelineStatus = serde_json::from_str(r#""waiting_for_resource""#).unwrap();
        assert_eq!(status, PipelineStatus::WaitingForResource);
    }

    #[test]
    fn test_merge_request_defaults_for_absent_lists() {
        let json = r#"{
            "id": 1,
            "iid": 7,
            "project_id": 3,
            "title": "Fix flaky spec",
            "state": "opened",
            "source_branch": "fix/flaky-spec",
            "target_branch": "main"
        }"#;

        let mr: MergeRequest = serde_json::from_str(json).unwrap();
        assert_eq!(mr.state, MergeRequestState::Opened);
        assert!(mr.assignees.is_empty());
        assert!(mr.labels.is_empty());
        assert!(!mr.draft);
    }

    #[test]
    fn test_variable_decodes() {
        let json = r#"{
            "key": "DEPLOY_KEY",
            "value": "secret",
            "variable_type": "env_var",
            "protected": true,
            "masked": true,
            "environment_scope": "production"
        }"#;

        let var: Variable = serde_json::from_str(json).unwrap();
        assert_eq!(var.variable_type, VariableType::EnvVar);
        assert!(var.protected);
        assert_eq!(var.environment_scope.as_deref(), Some("production"));
    }
}
