//! Collection endpoints.

use anyhow::{Context, Result};
use serde::Serialize;

use super::ApiClient;
use crate::models::{Article, Collection, CollectionPayload};

/// Article fields sent when saving into a collection.
#[derive(Debug, Serialize)]
struct SaveArticle<'a> {
    url: &'a str,
    title: &'a str,
    description: Option<&'a str>,
    source: Option<&'a str>,
    author: Option<&'a str>,
    published_at: Option<&'a str>,
    image_url: Option<&'a str>,
}

impl<'a> From<&'a Article> for SaveArticle<'a> {
    fn from(article: &'a Article) -> Self {
        Self {
            url: &article.url,
            title: &article.title,
            description: article.description.as_deref(),
            source: article.source.as_deref(),
            author: article.author.as_deref(),
            published_at: article.published_at.as_deref(),
            image_url: article.image_url.as_deref(),
        }
    }
}

impl ApiClient {
    pub async fn fetch_collections(&self) -> Result<Vec<Collection>> {
        let collections: Option<Vec<Collection>> = self
            .get("/collections", &[])
            .await
            .context("Failed to fetch collections")?;
        Ok(collections.unwrap_or_default())
    }

    pub async fn fetch_collection(&self, collection_id: i64) -> Result<Collection> {
        self.get(&format!("/collections/{}", collection_id), &[])
            .await
            .with_context(|| format!("Failed to fetch collection {}", collection_id))
    }

    pub async fn create_collection(&self, name: &str, description: Option<&str>) -> Result<Collection> {
        let payload = CollectionPayload {
            name: Some(name.to_string()),
            description: description.map(str::to_string),
        };
        self.post("/collections", &payload)
            .await
            .context("Failed to create collection")
    }

    pub async fn update_collection(&self, collection_id: i64, payload: &CollectionPayload) -> Result<Collection> {
        self.put(&format!("/collections/{}", collection_id), payload)
            .await
            .with_context(|| format!("Failed to update collection {}", collection_id))
    }

    pub async fn delete_collection(&self, collection_id: i64) -> Result<()> {
        self.delete(&format!("/collections/{}", collection_id))
            .await
            .with_context(|| format!("Failed to delete collection {}", collection_id))
    }

    /// Save an article; returns the stored copy with its id.
    pub async fn add_article_to_collection(&self, collection_id: i64, article: &Article) -> Result<Article> {
        self.post(
            &format!("/collections/{}/articles", collection_id),
            &SaveArticle::from(article),
        )
        .await
        .with_context(|| format!("Failed to save article to collection {}", collection_id))
    }

    pub async fn remove_article_from_collection(&self, collection_id: i64, article_id: i64) -> Result<()> {
        self.delete(&format!("/collections/{}/articles/{}", collection_id, article_id))
            .await
            .with_context(|| format!("Failed to remove article {} from collection {}", article_id, collection_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_save_article_body() {
        let mut article = Article::new("u", "t");
        article.published_at = Some("2024-01-01".to_string());
        article.content = Some("not sent".to_string());
        article.id = Some(99);

        let body = serde_json::to_value(SaveArticle::from(&article)).unwrap();
        assert_eq!(
            body,
            json!({
                "url": "u",
                "title": "t",
                "description": null,
                "source": null,
                "author": null,
                "published_at": "2024-01-01",
                "image_url": null
            })
        );
    }

    #[test]
    fn test_collection_payload_skips_unset() {
        let payload = CollectionPayload {
            name: Some("c3 updated".to_string()),
            description: None,
        };
        assert_eq!(serde_json::to_value(&payload).unwrap(), json!({"name": "c3 updated"}));
    }
}
