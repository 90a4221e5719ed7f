//! User management service: list, CRUD, status, and availability checks.
//!
//! Every operation is a pass-through: the server owns list totals, page
//! counts, and filtering semantics. The only client-side logic is query
//! string construction, which drops absent and empty values.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use url::Url;

use crate::endpoints::{Category, actions};
use crate::http::{ApiClient, ApiResponse, ApiResult};

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    User,
    Vip,
}

/// Account status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Inactive,
    Banned,
}

/// Managed user record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    pub created_at: String,
    pub last_login: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Payload for creating a user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateUserRequest {
    pub username: String,
    pub email: String,
    pub role: Role,
    pub status: UserStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
}

/// Partial update payload; the id selects the record, absent fields are
/// left unchanged server-side.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateUserRequest {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<Role>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<UserStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Sort direction for list queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl SortOrder {
    /// Wire value.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Filter and pagination parameters for the list endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UserListQuery {
    /// 1-based page number.
    pub page: Option<u32>,
    /// Page size.
    pub page_size: Option<u32>,
    /// Free-text search keyword.
    pub keyword: Option<String>,
    /// Status filter.
    pub status: Option<String>,
    /// Role filter.
    pub role: Option<String>,
    /// Sort field.
    pub sort_by: Option<String>,
    /// Sort direction.
    pub sort_order: Option<SortOrder>,
}

impl UserListQuery {
    /// Render to query pairs, dropping absent and empty-string values.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(page) = self.page {
            pairs.push(("page", page.to_string()));
        }
        if let Some(page_size) = self.page_size {
            pairs.push(("pageSize", page_size.to_string()));
        }
        push_text(&mut pairs, "keyword", self.keyword.as_deref());
        push_text(&mut pairs, "status", self.status.as_deref());
        push_text(&mut pairs, "role", self.role.as_deref());
        push_text(&mut pairs, "sortBy", self.sort_by.as_deref());
        if let Some(order) = self.sort_order {
            pairs.push(("sortOrder", order.as_str().to_owned()));
        }
        pairs
    }
}

fn push_text(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: Option<&str>) {
    if let Some(value) = value {
        if !value.is_empty() {
            pairs.push((key, value.to_owned()));
        }
    }
}

fn with_query(mut url: Url, pairs: &[(&'static str, String)]) -> Url {
    if !pairs.is_empty() {
        url.query_pairs_mut()
            .extend_pairs(pairs.iter().map(|(key, value)| (*key, value.as_str())));
    }
    url
}

/// List endpoint payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListResponse {
    pub users: Vec<User>,
    pub total: u64,
    pub page: u32,
    pub page_size: u32,
    pub total_pages: u32,
}

/// Availability-check payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Availability {
    /// Whether the checked name or address is free.
    pub available: bool,
}

/// User management operations over an injected [`ApiClient`].
#[derive(Clone)]
pub struct UserService {
    client: ApiClient,
}

impl UserService {
    /// Wrap `client`.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Fetch a page of users.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn list(&self, query: &UserListQuery) -> ApiResult<ApiResponse<UserListResponse>> {
        let url = self
            .client
            .endpoints()
            .url(Category::User, actions::user::LIST)?;
        self.client.get(with_query(url, &query.query_pairs())).await
    }

    /// Create a user.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn create(&self, request: &CreateUserRequest) -> ApiResult<ApiResponse<User>> {
        let url = self
            .client
            .endpoints()
            .url(Category::User, actions::user::CREATE)?;
        self.client.post(url, request).await
    }

    /// Update a user selected by `request.id`.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn update(&self, request: &UpdateUserRequest) -> ApiResult<ApiResponse<User>> {
        let url = self.client.endpoints().url_with_suffix(
            Category::User,
            actions::user::UPDATE,
            &request.id.to_string(),
        )?;
        self.client.put(url, request).await
    }

    /// Delete one user.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn delete(&self, user_id: i64) -> ApiResult<ApiResponse<Value>> {
        let url = self.client.endpoints().url_with_suffix(
            Category::User,
            actions::user::DELETE,
            &user_id.to_string(),
        )?;
        self.client.delete(url).await
    }

    /// Delete several users in one call.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn batch_delete(&self, user_ids: &[i64]) -> ApiResult<ApiResponse<Value>> {
        let url = self
            .client
            .endpoints()
            .url(Category::User, actions::user::DELETE)?;
        self.client.post(url, &json!({ "userIds": user_ids })).await
    }

    /// Enable or disable a user.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn toggle_status(
        &self,
        user_id: i64,
        status: UserStatus,
    ) -> ApiResult<ApiResponse<Value>> {
        let url = self.client.endpoints().url_with_suffix(
            Category::User,
            actions::user::TOGGLE_STATUS,
            &user_id.to_string(),
        )?;
        self.client.post(url, &json!({ "status": status })).await
    }

    /// Fetch one user's detail record.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn detail(&self, user_id: i64) -> ApiResult<ApiResponse<User>> {
        let url = self.client.endpoints().url_with_suffix(
            Category::User,
            actions::user::PROFILE,
            &user_id.to_string(),
        )?;
        self.client.get(url).await
    }

    /// Reset another user's password (admin operation).
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn reset_password(
        &self,
        user_id: i64,
        new_password: &str,
    ) -> ApiResult<ApiResponse<Value>> {
        let url = self.client.endpoints().url_with_suffix(
            Category::User,
            actions::user::CHANGE_PASSWORD,
            &user_id.to_string(),
        )?;
        self.client
            .post(url, &json!({ "newPassword": new_password }))
            .await
    }

    /// Export users matching `query`.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn export(&self, query: &UserListQuery) -> ApiResult<ApiResponse<Value>> {
        let url = self
            .client
            .endpoints()
            .url(Category::User, actions::user::EXPORT)?;
        self.client.get(with_query(url, &query.query_pairs())).await
    }

    /// Whether `username` is free to register.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn check_username(&self, username: &str) -> ApiResult<ApiResponse<Availability>> {
        let url = self
            .client
            .endpoints()
            .url(Category::User, actions::user::CHECK_USERNAME)?;
        let pairs = [("username", username.to_owned())];
        self.client.get(with_query(url, &pairs)).await
    }

    /// Whether `email` is free to register.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn check_email(&self, email: &str) -> ApiResult<ApiResponse<Availability>> {
        let url = self
            .client
            .endpoints()
            .url(Category::User, actions::user::CHECK_EMAIL)?;
        let pairs = [("email", email.to_owned())];
        self.client.get(with_query(url, &pairs)).await
    }
}
