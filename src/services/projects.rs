//! Project operations.

use crate::client::GitLabClient;
use crate::errors::GitLabResult;
use crate::ids::ResourceId;
use crate::pagination::Pager;
use crate::types::{Project, Visibility};
use serde::Serialize;

/// Service for project operations.
pub struct ProjectsService<'a> {
    client: &'a GitLabClient,
}

impl<'a> ProjectsService<'a> {
    /// Creates a new projects service.
    pub fn new(client: &'a GitLabClient) -> Self {
        Self { client }
    }

    /// Lists projects visible to the authenticated user.
    pub async fn list(&self) -> GitLabResult<Vec<Project>> {
        self.list_with_params(&ListProjectsParams::default()).await
    }

    /// Lists projects with filter parameters.
    pub async fn list_with_params(&self, params: &ListProjectsParams) -> GitLabResult<Vec<Project>> {
        self.client.get_with_params("projects", params).await
    }

    /// Returns a pager over all matching projects.
    pub fn list_paginated(&self, params: ListProjectsParams) -> Pager<Project> {
        super::paged(self.client, "projects".to_string(), params)
    }

    /// Gets a project by ID or `namespace/path`.
    pub async fn get(&self, project: impl Into<ResourceId>) -> GitLabResult<Project> {
        self.client
            .get(&format!("projects/{}", project.into().as_path_segment()))
            .await
    }

    /// Creates a project.
    pub async fn create(&self, request: &CreateProjectRequest) -> GitLabResult<Project> {
        self.client.post("projects", request).await
    }

    /// Edits a project.
    pub async fn edit(
        &self,
        project: impl Into<ResourceId>,
        request: &EditProjectRequest,
    ) -> GitLabResult<Project> {
        self.client
            .put(
                &format!("projects/{}", project.into().as_path_segment()),
                request,
            )
            .await
    }

    /// Deletes a project.
    pub async fn delete(&self, project: impl Into<ResourceId>) -> GitLabResult<()> {
        self.client
            .delete(&format!("projects/{}", project.into().as_path_segment()))
            .await
    }

    /// Archives a project.
    pub async fn archive(&self, project: impl Into<ResourceId>) -> GitLabResult<Project> {
        self.client
            .post(
                &format!("projects/{}/archive", project.into().as_path_segment()),
                &(),
            )
            .await
    }

    /// Unarchives a project.
    pub async fn unarchive(&self, project: impl Into<ResourceId>) -> GitLabResult<Project> {
        self.client
            .post(
                &format!("projects/{}/unarchive", project.into().as_path_segment()),
                &(),
            )
            .await
    }

    /// Stars a project.
    pub async fn star(&self, project: impl Into<ResourceId>) -> GitLabResult<Project> {
        self.client
            .post(
                &format!("projects/{}/star", project.into().as_path_segment()),
                &(),
            )
            .await
    }

    /// Unstars a project.
    pub async fn unstar(&self, project: impl Into<ResourceId>) -> GitLabResult<Project> {
        self.client
            .post(
                &format!("projects/{}/unstar", project.into().as_path_segment()),
                &(),
            )
            .await
    }
}

/// Field to order project lists by.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ProjectOrderBy {
    Id,
    Name,
    Path,
    CreatedAt,
    UpdatedAt,
    LastActivityAt,
    StarCount,
}

/// Sort direction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Parameters for listing projects.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListProjectsParams {
    /// Free-text search against name and path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Limit to projects owned by the authenticated user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owned: Option<bool>,
    /// Limit to projects the authenticated user is a member of.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub membership: Option<bool>,
    /// Limit to starred projects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starred: Option<bool>,
    /// Limit to archived (or non-archived) projects.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub archived: Option<bool>,
    /// Limit by visibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    /// Order field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<ProjectOrderBy>,
    /// Sort direction.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortDirection>,
    /// Page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Items per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

/// Request to create a project.
#[derive(Debug, Clone, Serialize)]
pub struct CreateProjectRequest {
    /// Project name.
    pub name: String,
    /// Project path; derived from the name when omitted.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Namespace ID to create the project under.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub namespace_id: Option<u64>,
    /// Project description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Visibility level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    /// Default branch name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    /// Whether to initialize the repository with a README.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initialize_with_readme: Option<bool>,
    /// Topics to assign.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,
}

/// Request to edit a project.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EditProjectRequest {
    /// Project name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Project path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Project description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Visibility level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    /// Default branch name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
    /// Topics to assign, replacing the existing set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topics: Option<Vec<String>>,
}
