//! The credential capability the session manager depends on.
//!
//! `ApiClient` implements it against the backend. The session manager only
//! sees this trait, so tests can drive it with scripted fakes.

use anyhow::Result;
use async_trait::async_trait;

use crate::models::{AuthResponse, LoginPayload, RegisterPayload, UpdateProfilePayload, UserProfile};

#[async_trait]
pub trait CredentialService: Send + Sync {
    async fn login(&self, payload: &LoginPayload) -> Result<AuthResponse>;

    async fn register(&self, payload: &RegisterPayload) -> Result<AuthResponse>;

    /// Exchange the refresh cookie for a new access token.
    /// `Ok(None)` means the server had nothing to refresh.
    async fn refresh_token(&self) -> Result<Option<String>>;

    async fn get_profile(&self) -> Result<UserProfile>;

    async fn update_profile(&self, payload: &UpdateProfilePayload) -> Result<UserProfile>;

    /// Tell the server the session ended.
    async fn notify_logout(&self) -> Result<()>;
}
