//! Pipeline operations.

use crate::client::GitLabClient;
use crate::errors::GitLabResult;
use crate::ids::ResourceId;
use crate::pagination::Pager;
use crate::types::{Pipeline, PipelineDetail, PipelineStatus, PipelineVariable};
use serde::Serialize;

/// Service for pipeline operations.
pub struct PipelinesService<'a> {
    client: &'a GitLabClient,
}

impl<'a> PipelinesService<'a> {
    /// Creates a new pipelines service.
    pub fn new(client: &'a GitLabClient) -> Self {
        Self { client }
    }

    /// Lists pipelines in a project.
    pub async fn list(
        &self,
        project: impl Into<ResourceId>,
        params: &ListPipelinesParams,
    ) -> GitLabResult<Vec<Pipeline>> {
        self.client
            .get_with_params(
                &format!("projects/{}/pipelines", project.into().as_path_segment()),
                params,
            )
            .await
    }

    /// Returns a pager over all matching pipelines in a project.
    pub fn list_paginated(
        &self,
        project: impl Into<ResourceId>,
        params: ListPipelinesParams,
    ) -> Pager<Pipeline> {
        super::paged(
            self.client,
            format!("projects/{}/pipelines", project.into().as_path_segment()),
            params,
        )
    }

    /// Gets a single pipeline.
    pub async fn get(
        &self,
        project: impl Into<ResourceId>,
        pipeline_id: u64,
    ) -> GitLabResult<PipelineDetail> {
        self.client
            .get(&format!(
                "projects/{}/pipelines/{}",
                project.into().as_path_segment(),
                pipeline_id
            ))
            .await
    }

    /// Creates (triggers) a pipeline for a ref.
    pub async fn create(
        &self,
        project: impl Into<ResourceId>,
        request: &CreatePipelineRequest,
    ) -> GitLabResult<PipelineDetail> {
        self.client
            .post(
                &format!("projects/{}/pipeline", project.into().as_path_segment()),
                request,
            )
            .await
    }

    /// Retries the failed jobs of a pipeline.
    pub async fn retry(
        &self,
        project: impl Into<ResourceId>,
        pipeline_id: u64,
    ) -> GitLabResult<PipelineDetail> {
        self.client
            .post(
                &format!(
                    "projects/{}/pipelines/{}/retry",
                    project.into().as_path_segment(),
                    pipeline_id
                ),
                &(),
            )
            .await
    }

    /// Cancels the running jobs of a pipeline.
    pub async fn cancel(
        &self,
        project: impl Into<ResourceId>,
        pipeline_id: u64,
    ) -> GitLabResult<PipelineDetail> {
        self.client
            .post(
                &format!(
                    "projects/{}/pipelines/{}/cancel",
                    project.into().as_path_segment(),
                    pipeline_id
                ),
                &(),
            )
            .await
    }

    /// Deletes a pipeline.
    pub async fn delete(
        &self,
        project: impl Into<ResourceId>,
        pipeline_id: u64,
    ) -> GitLabResult<()> {
        self.client
            .delete(&format!(
                "projects/{}/pipelines/{}",
                project.into().as_path_segment(),
                pipeline_id
            ))
            .await
    }

    /// Lists the variables of a pipeline.
    pub async fn list_variables(
        &self,
        project: impl Into<ResourceId>,
        pipeline_id: u64,
    ) -> GitLabResult<Vec<PipelineVariable>> {
        self.client
            .get(&format!(
                "projects/{}/pipelines/{}/variables",
                project.into().as_path_segment(),
                pipeline_id
            ))
            .await
    }
}

/// Field to order pipeline lists by.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineOrderBy {
    Id,
    Status,
    Ref,
    UpdatedAt,
    UserId,
}

/// Parameters for listing pipelines.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListPipelinesParams {
    /// Filter by status.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<PipelineStatus>,
    /// Filter by ref.
    #[serde(rename = "ref", skip_serializing_if = "Option::is_none")]
    pub ref_: Option<String>,
    /// Filter by commit SHA.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
    /// Filter by pipeline source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Only pipelines updated after this time.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_after: Option<String>,
    /// Order field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_by: Option<PipelineOrderBy>,
    /// Sort direction (`asc` or `desc`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<String>,
    /// Page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Items per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}

/// Request to create a pipeline.
#[derive(Debug, Clone, Serialize)]
pub struct CreatePipelineRequest {
    /// Branch or tag to run the pipeline on.
    #[serde(rename = "ref")]
    pub ref_: String,
    /// Variables passed to the pipeline.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variables: Option<Vec<PipelineVariable>>,
}
