//! Issue operations, including issue notes.

use crate::client::GitLabClient;
use crate::errors::GitLabResult;
use crate::ids::ResourceId;
use crate::pagination::Pager;
use crate::types::{Issue, Note};
use serde::Serialize;

/// Service for issue operations.
pub struct IssuesService<'a> {
    client: &'a GitLabClient,
}

impl<'a> IssuesService<'a> {
    /// Creates a new issues service.
    pub fn new(client: &'a GitLabClient) -> Self {
        Self { client }
    }

    /// Lists issues visible to the authenticated user, across projects.
    pub async fn list(&self, params: &ListIssuesParams) -> GitLabResult<Vec<Issue>> {
        self.client.get_with_params("issues", params).await
    }

    /// Lists issues in a project.
    pub async fn list_for_project(
        &self,
        project: impl Into<ResourceId>,
        params: &ListIssuesParams,
    ) -> GitLabResult<Vec<Issue>> {
        self.client
            .get_with_params(
                &format!("projects/{}/issues", project.into().as_path_segment()),
                params,
            )
            .await
    }

    /// Returns a pager over all matching issues in a project.
    pub fn list_for_project_paginated(
        &self,
        project: impl Into<ResourceId>,
        params: ListIssuesParams,
    ) -> Pager<Issue> {
        super::paged(
            self.client,
            format!("projects/{}/issues", project.into().as_path_segment()),
            params,
        )
    }

    /// Gets a single project issue by IID.
    pub async fn get(&self, project: impl Into<ResourceId>, issue_iid: u64) -> GitLabResult<Issue> {
        self.client
            .get(&format!(
                "projects/{}/issues/{}",
                project.into().as_path_segment(),
                issue_iid
            ))
            .await
    }

    /// Creates an issue.
    pub async fn create(
        &self,
        project: impl Into<ResourceId>,
        request: &CreateIssueRequest,
    ) -> GitLabResult<Issue> {
        self.client
            .post(
                &format!("projects/{}/issues", project.into().as_path_segment()),
                request,
            )
            .await
    }

    /// Edits an issue.
    pub async fn edit(
        &self,
        project: impl Into<ResourceId>,
        issue_iid: u64,
        request: &EditIssueRequest,
    ) -> GitLabResult<Issue> {
        self.client
            .put(
                &format!(
                    "projects/{}/issues/{}",
                    project.into().as_path_segment(),
                    issue_iid
                ),
                request,
            )
            .await
    }

    /// Deletes an issue.
    pub async fn delete(
        &self,
        project: impl Into<ResourceId>,
        issue_iid: u64,
    ) -> GitLabResult<()> {
        self.client
            .delete(&format!(
                "projects/{}/issues/{}",
                project.into().as_path_segment(),
                issue_iid
            ))
            .await
    }

    /// Moves an issue to another project.
    pub async fn move_issue(
        &self,
        project: impl Into<ResourceId>,
        issue_iid: u64,
        to_project_id: u64,
    ) -> GitLabResult<Issue> {
        let body = MoveIssueRequest { to_project_id };
        self.client
            .post(
                &format!(
                    "projects/{}/issues/{}/move",
                    project.into().as_path_segment(),
                    issue_iid
                ),
                &body,
            )
            .await
    }

    // Notes

    /// Lists notes on an issue.
    pub async fn list_notes(
        &self,
        project: impl Into<ResourceId>,
        issue_iid: u64,
    ) -> GitLabResult<Vec<Note>> {
        self.client
            .get(&format!(
                "projects/{}/issues/{}/notes",
                project.into().as_path_segment(),
                issue_iid
            ))
            .await
    }

    /// Gets a note on an issue.
    pub async fn get_note(
        &self,
        project: impl Into<ResourceId>,
        issue_iid: u64,
        note_id: u64,
    ) -> GitLabResult<Note> {
        self.client
            .get(&format!(
                "projects/{}/issues/{}/notes/{}",
                project.into().as_path_segment(),
                issue_iid,
                note_id
            ))
            .await
    }

    /// Creates a note on an issue.
    pub async fn create_note(
        &self,
        project: impl Into<ResourceId>,
        issue_iid: u64,
        body: &str,
    ) -> GitLabResult<Note> {
        let request = NoteRequest {
            body: body.to_string(),
        };
        self.client
            .post(
                &format!(
                    "projects/{}/issues/{}/notes",
                    project.into().as_path_segment(),
                    issue_iid
                ),
                &request,
            )
            .await
    }

    /// Updates a note on an issue.
    pub async fn update_note(
        &self,
        project: impl Into<ResourceId>,
        issue_iid: u64,
        note_id: u64,
        body: &str,
    ) -> GitLabResult<Note> {
        let request = NoteRequest {
            body: body.to_string(),
        };
        self.client
            .put(
                &format!(
                    "projects/{}/issues/{}/notes/{}",
                    project.into().as_path_segment(),
                    issue_iid,
                    note_id
                ),
                &request,
            )
            .await
    }

    /// Deletes a note on an issue.
    pub async fn delete_note(
        &self,
        project: impl Into<ResourceId>,
        issue_iid: u64,
        note_id: u64,
    ) -> GitLabResult<()> {
        self.client
            .delete(&format!(
                "projects/{}/issues/{}/notes/{}",
                project.into().as_path_segment(),
                issue_iid,
                note_id
            ))
            .await
    }
}

/// Issue state filter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueStateFilter {
    Opened,
    Closed,
    All,
}

/// Parameters for listing issues.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListIssuesParams {
    /// Filter by state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<IssueStateFilter>,
    /// Filter by labels (comma-separated).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
    /// Filter by milestone title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone: Option<String>,
    /// Filter by assignee ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<u64>,
    /// Filter by author ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<u64>,
    /// Free-text search against title and description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Only issues updated after this time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_after: Option<String>,
    /// Filter confidential issues.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidential: Option<bool>,
    /// Page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Items per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

/// Request to create an issue.
#[derive(Debug, Clone, Serialize)]
pub struct CreateIssueRequest {
    /// Issue title.
    pub title: String,
    /// Issue description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Labels (comma-separated).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
    /// Assignee IDs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_ids: Option<Vec<u64>>,
    /// Milestone ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<u64>,
    /// Whether the issue is confidential.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidential: Option<bool>,
}

/// State transition for an issue edit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueStateEvent {
    Close,
    Reopen,
}

/// Request to edit an issue.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EditIssueRequest {
    /// Issue title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Issue description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Labels (comma-separated), replacing the existing set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
    /// Assignee IDs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_ids: Option<Vec<u64>>,
    /// Milestone ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub milestone_id: Option<u64>,
    /// State transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_event: Option<IssueStateEvent>,
    /// Whether the issue is confidential.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confidential: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
struct MoveIssueRequest {
    to_project_id: u64,
}

#[derive(Debug, Clone, Serialize)]
struct NoteRequest {
    body: String,
}
