//! Authentication endpoints and the `CredentialService` implementation.

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::client::REFRESH_PATH;
use super::ApiClient;
use crate::models::{AuthResponse, LoginPayload, RegisterPayload, UpdateProfilePayload, UserProfile};
use crate::service::CredentialService;

#[derive(Debug, Default, Deserialize)]
struct RefreshResponse {
    access_token: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct ResetRequestResponse {
    reset_token: Option<String>,
}

#[derive(Serialize)]
struct ResetRequest<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct ResetPassword<'a> {
    token: &'a str,
    new_password: &'a str,
}

impl ApiClient {
    pub async fn authenticate(&self, payload: &LoginPayload) -> Result<AuthResponse> {
        self.post("/auth/login", payload)
            .await
            .context("Login failed")
    }

    pub async fn create_account(&self, payload: &RegisterPayload) -> Result<AuthResponse> {
        self.post("/auth/register", payload)
            .await
            .context("Registration failed")
    }

    /// `None` when the server has no session to renew.
    pub async fn refresh_access_token(&self) -> Result<Option<String>> {
        let response: Option<RefreshResponse> = self.post_empty(REFRESH_PATH).await?;
        Ok(response
            .and_then(|r| r.access_token)
            .filter(|t| !t.is_empty()))
    }

    pub async fn end_session(&self) -> Result<()> {
        let _: Option<serde_json::Value> = self.post_empty("/auth/logout").await?;
        Ok(())
    }

    /// Ask for a password reset. Some deployments return the reset token
    /// directly instead of emailing it.
    pub async fn request_password_reset(&self, email: &str) -> Result<Option<String>> {
        let response: Option<ResetRequestResponse> = self
            .post("/auth/request-reset", &ResetRequest { email })
            .await
            .context("Failed to request password reset")?;
        Ok(response.and_then(|r| r.reset_token))
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<()> {
        let _: Option<serde_json::Value> = self
            .post("/auth/reset", &ResetPassword { token, new_password })
            .await
            .context("Failed to reset password")?;
        Ok(())
    }
}

#[async_trait]
impl CredentialService for ApiClient {
    async fn login(&self, payload: &LoginPayload) -> Result<AuthResponse> {
        self.authenticate(payload).await
    }

    async fn register(&self, payload: &RegisterPayload) -> Result<AuthResponse> {
        self.create_account(payload).await
    }

    async fn refresh_token(&self) -> Result<Option<String>> {
        self.refresh_access_token().await
    }

    async fn get_profile(&self) -> Result<UserProfile> {
        self.fetch_profile().await
    }

    async fn update_profile(&self, payload: &UpdateProfilePayload) -> Result<UserProfile> {
        self.save_profile(payload).await
    }

    async fn notify_logout(&self) -> Result<()> {
        self.end_session().await
    }
}
