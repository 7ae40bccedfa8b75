//! News search endpoints.

use anyhow::{Context, Result};
use serde::Deserialize;

use super::ApiClient;
use crate::models::article::RawSearchResponse;
use crate::models::{NewsSearchResult, SearchQuery};

#[derive(Debug, Default, Deserialize)]
struct HistoryResponse {
    #[serde(default)]
    items: Vec<String>,
}

impl ApiClient {
    pub async fn search_news(&self, query: &SearchQuery) -> Result<NewsSearchResult> {
        let raw: Option<RawSearchResponse> = self
            .get("/news/search", &query.to_params())
            .await
            .with_context(|| format!("Failed to search news for '{}'", query.topic))?;
        Ok(raw.unwrap_or_default().into())
    }

    /// Topics the user searched for recently, newest first.
    pub async fn fetch_search_history(&self) -> Result<Vec<String>> {
        let history: Option<HistoryResponse> = self
            .get("/news/history", &[])
            .await
            .context("Failed to fetch search history")?;
        Ok(history.map(|h| h.items).unwrap_or_default())
    }
}
