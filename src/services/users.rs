//! User operations.

use crate::client::GitLabClient;
use crate::errors::GitLabResult;
use crate::pagination::Pager;
use crate::types::{CurrentUser, User};
use serde::Serialize;

/// Service for user operations.
pub struct UsersService<'a> {
    client: &'a GitLabClient,
}

impl<'a> UsersService<'a> {
    /// Creates a new users service.
    pub fn new(client: &'a GitLabClient) -> Self {
        Self { client }
    }

    /// Lists users.
    pub async fn list(&self) -> GitLabResult<Vec<User>> {
        self.list_with_params(&ListUsersParams::default()).await
    }

    /// Lists users with filter parameters.
    pub async fn list_with_params(&self, params: &ListUsersParams) -> GitLabResult<Vec<User>> {
        self.client.get_with_params("users", params).await
    }

    /// Returns a pager over all matching users.
    pub fn list_paginated(&self, params: ListUsersParams) -> Pager<User> {
        super::paged(self.client, "users".to_string(), params)
    }

    /// Gets a user by ID.
    pub async fn get(&self, user_id: u64) -> GitLabResult<User> {
        self.client.get(&format!("users/{}", user_id)).await
    }

    /// Gets the authenticated user.
    pub async fn current(&self) -> GitLabResult<CurrentUser> {
        self.client.get("user").await
    }
}

/// Parameters for listing users.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListUsersParams {
    /// Exact username match.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    /// Free-text search against name, username, and email.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    /// Limit to active users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    /// Limit to blocked users.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blocked: Option<bool>,
    /// Page number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Items per page.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<u32>,
}
