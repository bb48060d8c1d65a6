//! Merge request operations, including merge request notes.

use crate::client::GitLabClient;
use crate::errors::GitLabResult;
use crate::ids::ResourceId;
use crate::pagination::Pager;
use crate::types::{MergeRequest, Note};
use serde::Serialize;

/// Service for merge request operations.
pub struct MergeRequestsService<'a> {
    client: &'a GitLabClient,
}

impl<'a> MergeRequestsService<'a> {
    /// Creates a new merge requests service.
    pub fn new(client: &'a GitLabClient) -> Self {
        Self { client }
    }

    /// Lists merge requests visible to the authenticated user, across
    /// projects.
    pub async fn list(&self, params: &ListMergeRequestsParams) -> GitLabResult<Vec<MergeRequest>> {
        self.client.get_with_params("merge_requests", params).await
    }

    /// Lists merge requests in a project.
    pub async fn list_for_project(
        &self,
        project: impl Into<ResourceId>,
        params: &ListMergeRequestsParams,
    ) -> GitLabResult<Vec<MergeRequest>> {
        self.client
            .get_with_params(
                &format!(
                    "projects/{}/merge_requests",
                    project.into().as_path_segment()
                ),
                params,
            )
            .await
    }

    /// Returns a pager over all matching merge requests in a project.
    pub fn list_for_project_paginated(
        &self,
        project: impl Into<ResourceId>,
        params: ListMergeRequestsParams,
    ) -> Pager<MergeRequest> {
        super::paged(
            self.client,
            format!(
                "projects/{}/merge_requests",
                project.into().as_path_segment()
            ),
            params,
        )
    }

    /// Gets a single merge request by IID.
    pub async fn get(
        &self,
        project: impl Into<ResourceId>,
        merge_request_iid: u64,
    ) -> GitLabResult<MergeRequest> {
        self.client
            .get(&format!(
                "projects/{}/merge_requests/{}",
                project.into().as_path_segment(),
                merge_request_iid
            ))
            .await
    }

    /// Creates a merge request.
    pub async fn create(
        &self,
        project: impl Into<ResourceId>,
        request: &CreateMergeRequestRequest,
    ) -> GitLabResult<MergeRequest> {
        self.client
            .post(
                &format!(
                    "projects/{}/merge_requests",
                    project.into().as_path_segment()
                ),
                request,
            )
            .await
    }

    /// Edits a merge request.
    pub async fn edit(
        &self,
        project: impl Into<ResourceId>,
        merge_request_iid: u64,
        request: &EditMergeRequestRequest,
    ) -> GitLabResult<MergeRequest> {
        self.client
            .put(
                &format!(
                    "projects/{}/merge_requests/{}",
                    project.into().as_path_segment(),
                    merge_request_iid
                ),
                request,
            )
            .await
    }

    /// Deletes a merge request.
    pub async fn delete(
        &self,
        project: impl Into<ResourceId>,
        merge_request_iid: u64,
    ) -> GitLabResult<()> {
        self.client
            .delete(&format!(
                "projects/{}/merge_requests/{}",
                project.into().as_path_segment(),
                merge_request_iid
            ))
            .await
    }

    /// Accepts (merges) a merge request.
    pub async fn merge(
        &self,
        project: impl Into<ResourceId>,
        merge_request_iid: u64,
        request: &MergeRequestMergeOptions,
    ) -> GitLabResult<MergeRequest> {
        self.client
            .put(
                &format!(
                    "projects/{}/merge_requests/{}/merge",
                    project.into().as_path_segment(),
                    merge_request_iid
                ),
                request,
            )
            .await
    }

    /// Rebases the source branch of a merge request.
    pub async fn rebase(
        &self,
        project: impl Into<ResourceId>,
        merge_request_iid: u64,
    ) -> GitLabResult<()> {
        self.client
            .put_no_response(
                &format!(
                    "projects/{}/merge_requests/{}/rebase",
                    project.into().as_path_segment(),
                    merge_request_iid
                ),
                &(),
            )
            .await
    }

    // Notes

    /// Lists notes on a merge request.
    pub async fn list_notes(
        &self,
        project: impl Into<ResourceId>,
        merge_request_iid: u64,
    ) -> GitLabResult<Vec<Note>> {
        self.client
            .get(&format!(
                "projects/{}/merge_requests/{}/notes",
                project.into().as_path_segment(),
                merge_request_iid
            ))
            .await
    }

    /// Gets a note on a merge request.
    pub async fn get_note(
        &self,
        project: impl Into<ResourceId>,
        merge_request_iid: u64,
        note_id: u64,
    ) -> GitLabResult<Note> {
        self.client
            .get(&format!(
                "projects/{}/merge_requests/{}/notes/{}",
                project.into().as_path_segment(),
                merge_request_iid,
                note_id
            ))
            .await
    }

    /// Creates a note on a merge request.
    pub async fn create_note(
        &self,
        project: impl Into<ResourceId>,
        merge_request_iid: u64,
        body: &str,
    ) -> GitLabResult<Note> {
        let request = NoteRequest {
            body: body.to_string(),
        };
        self.client
            .post(
                &format!(
                    "projects/{}/merge_requests/{}/notes",
                    project.into().as_path_segment(),
                    merge_request_iid
                ),
                &request,
            )
            .await
    }

    /// Updates a note on a merge request.
    pub async fn update_note(
        &self,
        project: impl Into<ResourceId>,
        merge_request_iid: u64,
        note_id: u64,
        body: &str,
    ) -> GitLabResult<Note> {
        let request = NoteRequest {
            body: body.to_string(),
        };
        self.client
            .put(
                &format!(
                    "projects/{}/merge_requests/{}/notes/{}",
                    project.into().as_path_segment(),
                    merge_request_iid,
                    note_id
                ),
                &request,
            )
            .await
    }

    /// Deletes a note on a merge request.
    pub async fn delete_note(
        &self,
        project: impl Into<ResourceId>,
        merge_request_iid: u64,
        note_id: u64,
    ) -> GitLabResult<()> {
        self.client
            .delete(&format!(
                "projects/{}/merge_requests/{}/notes/{}",
                project.into().as_path_segment(),
                merge_request_iid,
                note_id
            ))
            .await
    }
}

/// Merge request state filter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeRequestStateFilter {
    Opened,
    Closed,
    Locked,
    Merged,
    All,
}

/// Parameters for listing merge requests.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListMergeRequestsParams {
    /// Filter by state.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<MergeRequestStateFilter>,
    /// Filter by source branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_branch: Option<String>,
    /// Filter by target branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_branch: Option<String>,
    /// Filter by labels (comma-separated).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
    /// Filter by author ID.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author_id: Option<u64>,
    /// Free-text search against title and description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Only merge requests updated after this time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_after: Option<String>,
    /// Filter by draft status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub wip: Option<String>,
    /// Page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Items per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

/// Request to create a merge request.
#[derive(Debug, Clone, Serialize)]
pub struct CreateMergeRequestRequest {
    /// Title.
    pub title: String,
    /// Source branch.
    pub source_branch: String,
    /// Target branch.
    pub target_branch: String,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Target project ID, for cross-project merge requests.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_project_id: Option<u64>,
    /// Assignee IDs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_ids: Option<Vec<u64>>,
    /// Reviewer IDs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reviewer_ids: Option<Vec<u64>>,
    /// Labels (comma-separated).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
    /// Remove the source branch on merge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_source_branch: Option<bool>,
    /// Squash commits on merge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub squash: Option<bool>,
}

/// State transition for a merge request edit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MergeRequestStateEvent {
    Close,
    Reopen,
}

/// Request to edit a merge request.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EditMergeRequestRequest {
    /// Title.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Target branch.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_branch: Option<String>,
    /// Assignee IDs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assignee_ids: Option<Vec<u64>>,
    /// Labels (comma-separated), replacing the existing set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub labels: Option<String>,
    /// State transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state_event: Option<MergeRequestStateEvent>,
    /// Remove the source branch on merge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remove_source_branch: Option<bool>,
}

/// Options controlling how a merge request is accepted.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MergeRequestMergeOptions {
    /// Custom merge commit message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_commit_message: Option<String>,
    /// Custom squash commit message.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub squash_commit_message: Option<String>,
    /// Squash commits on merge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub squash: Option<bool>,
    /// Remove the source branch after merging.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub should_remove_source_branch: Option<bool>,
    /// Merge once the pipeline succeeds instead of immediately.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub merge_when_pipeline_succeeds: Option<bool>,
    /// Only merge if the head is at this SHA.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
struct NoteRequest {
    body: String,
}
