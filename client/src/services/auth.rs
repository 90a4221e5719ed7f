//! Authentication service: credential operations and token lifecycle.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, warn};

use crate::endpoints::{Category, actions};
use crate::http::{ApiClient, ApiResponse, ApiResult};

/// Login credentials. The API expects `user_name` in snake case.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    /// Account name.
    pub user_name: String,
    /// Plaintext password.
    pub password: String,
}

/// Account summary embedded in the login payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

/// Payload of a successful login.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    /// Bearer token to persist.
    pub token: String,
    /// Account that logged in.
    pub user: LoginUser,
    /// Token lifetime in seconds.
    #[serde(default)]
    pub expires_in: i64,
}

/// Registration payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Profile record returned by the profile endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub created_at: String,
    pub last_login: String,
}

/// Partial profile update; absent fields are left unchanged server-side.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Password change payload for the signed-in account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangePasswordRequest {
    pub old_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Payload of a successful token refresh.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefreshedToken {
    /// Replacement bearer token.
    pub token: String,
}

/// Authentication operations over an injected [`ApiClient`].
#[derive(Clone)]
pub struct AuthService {
    client: ApiClient,
}

impl AuthService {
    /// Wrap `client`.
    #[must_use]
    pub fn new(client: ApiClient) -> Self {
        Self { client }
    }

    /// Log in.
    ///
    /// On HTTP success, envelope success, and a non-empty token in the
    /// payload, the token and the user record are persisted before the
    /// envelope is returned. Any other outcome persists nothing. There is
    /// no automatic retry.
    ///
    /// # Errors
    ///
    /// Propagates transport, status, and session-store failures.
    pub async fn login(&self, request: &LoginRequest) -> ApiResult<ApiResponse<LoginResponse>> {
        let url = self
            .client
            .endpoints()
            .url(Category::User, actions::user::LOGIN)?;
        let response: ApiResponse<LoginResponse> = self.client.post(url, request).await?;

        if response.is_success() {
            if let Some(payload) = &response.data {
                if !payload.token.is_empty() {
                    self.client.store().set_token(payload.token.clone()).await?;
                    if let Ok(user) = serde_json::to_value(&payload.user) {
                        self.client.store().set_user_info(user).await?;
                    }
                    debug!(username = %payload.user.username, "login succeeded; token persisted");
                }
            }
        }

        Ok(response)
    }

    /// Log out.
    ///
    /// The server call is best-effort: a failed or timed-out request is
    /// logged and swallowed. Local token, user record, and remember flag
    /// are always cleared.
    ///
    /// # Errors
    ///
    /// Propagates session-store failures only.
    pub async fn logout(&self) -> ApiResult<()> {
        match self
            .client
            .endpoints()
            .url(Category::User, actions::user::LOGOUT)
        {
            Ok(url) => {
                if let Err(error) = self.client.post_empty::<Value>(url).await {
                    warn!(%error, "logout request failed; clearing local session anyway");
                }
            }
            Err(error) => {
                warn!(%error, "logout endpoint unresolved; clearing local session anyway");
            }
        }
        self.client.store().clear_all().await?;
        Ok(())
    }

    /// Register a new account. Pass-through.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn register(&self, request: &RegisterRequest) -> ApiResult<ApiResponse<Value>> {
        let url = self
            .client
            .endpoints()
            .url(Category::User, actions::user::REGISTER)?;
        self.client.post(url, request).await
    }

    /// Fetch the signed-in account's profile. Pass-through.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn profile(&self) -> ApiResult<ApiResponse<UserProfile>> {
        let url = self
            .client
            .endpoints()
            .url(Category::User, actions::user::PROFILE)?;
        self.client.get(url).await
    }

    /// Update the signed-in account's profile. Pass-through.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn update_profile(
        &self,
        request: &UpdateProfileRequest,
    ) -> ApiResult<ApiResponse<Value>> {
        let url = self
            .client
            .endpoints()
            .url(Category::User, actions::user::UPDATE_PROFILE)?;
        self.client.put(url, request).await
    }

    /// Change the signed-in account's password. Pass-through.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> ApiResult<ApiResponse<Value>> {
        let url = self
            .client
            .endpoints()
            .url(Category::User, actions::user::CHANGE_PASSWORD)?;
        self.client.post(url, request).await
    }

    /// Refresh the session token.
    ///
    /// On envelope success with a non-empty token, the token is persisted
    /// and `true` is returned. Any other outcome is treated as "session
    /// invalid": all local auth state is cleared and `false` is returned.
    ///
    /// # Errors
    ///
    /// Propagates session-store failures; server-side failures are folded
    /// into the `false` outcome.
    pub async fn refresh_token(&self) -> ApiResult<bool> {
        let url = self
            .client
            .endpoints()
            .url(Category::Auth, actions::auth::REFRESH_TOKEN)?;
        match self.client.post_empty::<RefreshedToken>(url).await {
            Ok(response) => {
                if response.is_success() {
                    if let Some(payload) = response.data {
                        if !payload.token.is_empty() {
                            self.client.store().set_token(payload.token).await?;
                            return Ok(true);
                        }
                    }
                }
                self.client.store().clear_all().await?;
                Ok(false)
            }
            Err(error) => {
                warn!(%error, "token refresh failed; clearing local session");
                self.client.store().clear_all().await?;
                Ok(false)
            }
        }
    }

    /// Verify the current token server-side. Pass-through.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn verify_token(&self) -> ApiResult<ApiResponse<Value>> {
        let url = self
            .client
            .endpoints()
            .url(Category::Auth, actions::auth::VERIFY_TOKEN)?;
        self.client.get(url).await
    }

    /// Request a password reset for `email`. Pass-through.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn reset_password(&self, email: &str) -> ApiResult<ApiResponse<Value>> {
        let url = self
            .client
            .endpoints()
            .url(Category::Auth, actions::auth::RESET_PASSWORD)?;
        self.client.post(url, &json!({ "email": email })).await
    }

    /// Send a verification code to `phone`. Pass-through.
    ///
    /// # Errors
    ///
    /// Propagates client failures.
    pub async fn send_verification_code(&self, phone: &str) -> ApiResult<ApiResponse<Value>> {
        let url = self
            .client
            .endpoints()
            .url(Category::Auth, actions::auth::SEND_CODE)?;
        self.client.post(url, &json!({ "phone": phone })).await
    }

    /// Whether a token is currently persisted.
    ///
    /// # Errors
    ///
    /// Propagates session-store failures.
    pub async fn is_authenticated(&self) -> ApiResult<bool> {
        Ok(self.client.store().token().await?.is_some())
    }

    /// Currently persisted token, if any.
    ///
    /// # Errors
    ///
    /// Propagates session-store failures.
    pub async fn token(&self) -> ApiResult<Option<String>> {
        Ok(self.client.store().token().await?)
    }

    /// Set or clear the remember-me flag.
    ///
    /// # Errors
    ///
    /// Propagates session-store failures.
    pub async fn set_remember_me(&self, remember: bool) -> ApiResult<()> {
        Ok(self.client.store().set_remember_me(remember).await?)
    }

    /// Whether the remember-me flag is set.
    ///
    /// # Errors
    ///
    /// Propagates session-store failures.
    pub async fn remember_me(&self) -> ApiResult<bool> {
        Ok(self.client.store().remember_me().await?)
    }

    /// Cached user record, if any.
    ///
    /// # Errors
    ///
    /// Propagates session-store failures.
    pub async fn user_info(&self) -> ApiResult<Option<Value>> {
        Ok(self.client.store().user_info().await?)
    }

    /// Clear token, user record, and remember flag.
    ///
    /// # Errors
    ///
    /// Propagates session-store failures.
    pub async fn clear_auth(&self) -> ApiResult<()> {
        Ok(self.client.store().clear_all().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use crate::config::{Environment, EnvironmentConfig};
    use crate::session::MockSessionStore;

    fn service_with(store: MockSessionStore) -> AuthService {
        let config = EnvironmentConfig::for_environment(Environment::Development);
        let client = ApiClient::new(&config, Arc::new(store)).expect("client builds");
        AuthService::new(client)
    }

    #[tokio::test]
    async fn is_authenticated_reflects_the_store() {
        let mut store = MockSessionStore::new();
        store
            .expect_token()
            .returning(|| Ok(Some("abc123".to_owned())));
        let service = service_with(store);
        assert!(service.is_authenticated().await.expect("store read"));
    }

    #[tokio::test]
    async fn clear_auth_sweeps_the_store() {
        let mut store = MockSessionStore::new();
        store.expect_clear_all().times(1).returning(|| Ok(()));
        let service = service_with(store);
        service.clear_auth().await.expect("store write");
    }
}
