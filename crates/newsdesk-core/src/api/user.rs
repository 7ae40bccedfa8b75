//! Profile endpoints.

use anyhow::{Context, Result};

use super::ApiClient;
use crate::models::{UpdateProfilePayload, UserProfile};

impl ApiClient {
    pub async fn fetch_profile(&self) -> Result<UserProfile> {
        self.get("/me", &[]).await.context("Failed to fetch profile")
    }

    /// Update the profile; the server answers with the canonical profile.
    pub async fn save_profile(&self, payload: &UpdateProfilePayload) -> Result<UserProfile> {
        self.put("/me", payload)
            .await
            .context("Failed to update profile")
    }
}
