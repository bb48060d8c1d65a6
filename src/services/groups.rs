//! Group operations.

use crate::client::GitLabClient;
use crate::errors::GitLabResult;
use crate::ids::ResourceId;
use crate::pagination::Pager;
use crate::types::{Group, Project, Visibility};
use serde::Serialize;

/// Service for group operations.
pub struct GroupsService<'a> {
    client: &'a GitLabClient,
}

impl<'a> GroupsService<'a> {
    /// Creates a new groups service.
    pub fn new(client: &'a GitLabClient) -> Self {
        Self { client }
    }

    /// Lists groups visible to the authenticated user.
    pub async fn list(&self) -> GitLabResult<Vec<Group>> {
        self.list_with_params(&ListGroupsParams::default()).await
    }

    /// Lists groups with filter parameters.
    pub async fn list_with_params(&self, params: &ListGroupsParams) -> GitLabResult<Vec<Group>> {
        self.client.get_with_params("groups", params).await
    }

    /// Returns a pager over all matching groups.
    pub fn list_paginated(&self, params: ListGroupsParams) -> Pager<Group> {
        super::paged(self.client, "groups".to_string(), params)
    }

    /// Gets a group by ID or full path.
    pub async fn get(&self, group: impl Into<ResourceId>) -> GitLabResult<Group> {
        self.client
            .get(&format!("groups/{}", group.into().as_path_segment()))
            .await
    }

    /// Creates a group.
    pub async fn create(&self, request: &CreateGroupRequest) -> GitLabResult<Group> {
        self.client.post("groups", request).await
    }

    /// Edits a group.
    pub async fn edit(
        &self,
        group: impl Into<ResourceId>,
        request: &EditGroupRequest,
    ) -> GitLabResult<Group> {
        self.client
            .put(&format!("groups/{}", group.into().as_path_segment()), request)
            .await
    }

    /// Deletes a group.
    pub async fn delete(&self, group: impl Into<ResourceId>) -> GitLabResult<()> {
        self.client
            .delete(&format!("groups/{}", group.into().as_path_segment()))
            .await
    }

    /// Lists the projects in a group.
    pub async fn list_projects(&self, group: impl Into<ResourceId>) -> GitLabResult<Vec<Project>> {
        self.client
            .get(&format!(
                "groups/{}/projects",
                group.into().as_path_segment()
            ))
            .await
    }

    /// Lists the direct subgroups of a group.
    pub async fn list_subgroups(&self, group: impl Into<ResourceId>) -> GitLabResult<Vec<Group>> {
        self.client
            .get(&format!(
                "groups/{}/subgroups",
                group.into().as_path_segment()
            ))
            .await
    }
}

/// Parameters for listing groups.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListGroupsParams {
    /// Free-text search against name and path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Limit to groups the authenticated user owns.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub owned: Option<bool>,
    /// Limit to top-level groups.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_level_only: Option<bool>,
    /// Include statistics (admin only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<bool>,
    /// Page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Items per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

/// Request to create a group.
#[derive(Debug, Clone, Serialize)]
pub struct CreateGroupRequest {
    /// Group name.
    pub name: String,
    /// Group path.
    pub path: String,
    /// Group description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Visibility level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
    /// Parent group ID, for creating a subgroup.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<u64>,
}

/// Request to edit a group.
#[derive(Debug, Clone, Default, Serialize)]
pub struct EditGroupRequest {
    /// Group name.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Group path.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    /// Group description.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Visibility level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<Visibility>,
}
