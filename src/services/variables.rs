//! Project- and group-level CI/CD variable operations.
//!
//! The two variable families share their payload shapes but live under
//! different URL roots, so each method comes in a project and a group
//! flavor.

use crate::client::GitLabClient;
use crate::errors::GitLabResult;
use crate::ids::ResourceId;
use crate::types::{Variable, VariableType};
use serde::Serialize;

/// Service for CI/CD variable operations.
pub struct VariablesService<'a> {
    client: &'a GitLabClient,
}

impl<'a> VariablesService<'a> {
    /// Creates a new variables service.
    pub fn new(client: &'a GitLabClient) -> Self {
        Self { client }
    }

    // Project-level variables

    /// Lists the variables of a project.
    pub async fn list_for_project(
        &self,
        project: impl Into<ResourceId>,
    ) -> GitLabResult<Vec<Variable>> {
        self.client
            .get(&format!(
                "projects/{}/variables",
                project.into().as_path_segment()
            ))
            .await
    }

    /// Gets a project variable by key.
    ///
    /// When several environment scopes define the same key, `filter`
    /// selects among them.
    pub async fn get_for_project(
        &self,
        project: impl Into<ResourceId>,
        key: &str,
        filter: Option<&VariableFilter>,
    ) -> GitLabResult<Variable> {
        let path = format!(
            "projects/{}/variables/{}",
            project.into().as_path_segment(),
            key
        );
        match filter {
            Some(filter) => self.client.get_with_params(&path, filter).await,
            None => self.client.get(&path).await,
        }
    }

    /// Creates a project variable.
    pub async fn create_for_project(
        &self,
        project: impl Into<ResourceId>,
        request: &CreateVariableRequest,
    ) -> GitLabResult<Variable> {
        self.client
            .post(
                &format!("projects/{}/variables", project.into().as_path_segment()),
                request,
            )
            .await
    }

    /// Updates a project variable.
    pub async fn update_for_project(
        &self,
        project: impl Into<ResourceId>,
        key: &str,
        request: &UpdateVariableRequest,
    ) -> GitLabResult<Variable> {
        self.client
            .put(
                &format!(
                    "projects/{}/variables/{}",
                    project.into().as_path_segment(),
                    key
                ),
                request,
            )
            .await
    }

    /// Deletes a project variable.
    pub async fn delete_for_project(
        &self,
        project: impl Into<ResourceId>,
        key: &str,
    ) -> GitLabResult<()> {
        self.client
            .delete(&format!(
                "projects/{}/variables/{}",
                project.into().as_path_segment(),
                key
            ))
            .await
    }

    // Group-level variables

    /// Lists the variables of a group.
    pub async fn list_for_group(&self, group: impl Into<ResourceId>) -> GitLabResult<Vec<Variable>> {
        self.client
            .get(&format!(
                "groups/{}/variables",
                group.into().as_path_segment()
            ))
            .await
    }

    /// Gets a group variable by key.
    pub async fn get_for_group(
        &self,
        group: impl Into<ResourceId>,
        key: &str,
    ) -> GitLabResult<Variable> {
        self.client
            .get(&format!(
                "groups/{}/variables/{}",
                group.into().as_path_segment(),
                key
            ))
            .await
    }

    /// Creates a group variable.
    pub async fn create_for_group(
        &self,
        group: impl Into<ResourceId>,
        request: &CreateVariableRequest,
    ) -> GitLabResult<Variable> {
        self.client
            .post(
                &format!("groups/{}/variables", group.into().as_path_segment()),
                request,
            )
            .await
    }

    /// Updates a group variable.
    pub async fn update_for_group(
        &self,
        group: impl Into<ResourceId>,
        key: &str,
        request: &UpdateVariableRequest,
    ) -> GitLabResult<Variable> {
        self.client
            .put(
                &format!(
                    "groups/{}/variables/{}",
                    group.into().as_path_segment(),
                    key
                ),
                request,
            )
            .await
    }

    /// Deletes a group variable.
    pub async fn delete_for_group(
        &self,
        group: impl Into<ResourceId>,
        key: &str,
    ) -> GitLabResult<()> {
        self.client
            .delete(&format!(
                "groups/{}/variables/{}",
                group.into().as_path_segment(),
                key
            ))
            .await
    }
}

/// Environment scope filter for project variable lookups.
#[derive(Debug, Clone, Serialize)]
pub struct VariableFilter {
    /// Environment scope to select, e.g. `production` or `*`.
    #[serde(rename = "filter[environment_scope]")]
    pub environment_scope: String,
}

/// Request to create a variable.
#[derive(Debug, Clone, Serialize)]
pub struct CreateVariableRequest {
    /// Variable name.
    pub key: String,
    /// Variable value.
    pub value: String,
    /// Variable type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_type: Option<VariableType>,
    /// Whether the variable is protected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protected: Option<bool>,
    /// Whether the variable is masked in job logs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub masked: Option<bool>,
    /// Whether the value is used without expansion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw: Option<bool>,
    /// Environment scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_scope: Option<String>,
}

/// Request to update a variable.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateVariableRequest {
    /// Variable value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    /// Variable type.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variable_type: Option<VariableType>,
    /// Whether the variable is protected.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protected: Option<bool>,
    /// Whether the variable is masked in job logs.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub masked: Option<bool>,
    /// Environment scope.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environment_scope: Option<String>,
}
