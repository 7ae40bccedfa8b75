use serde::{Deserialize, Serialize};

use super::Article;

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawCollection")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Collection {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub article_count: u64,
    pub articles: Vec<Article>,
}

impl Collection {
    pub fn display_article_count(&self) -> String {
        match self.article_count {
            1 => "1 article".to_string(),
            n => format!("{} articles", n),
        }
    }

    pub fn contains_url(&self, url: &str) -> bool {
        self.articles.iter().any(|a| a.url == url)
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawCollection {
    id: Option<i64>,
    name: Option<String>,
    description: Option<String>,
    article_count: Option<u64>,
    articles: Option<Vec<Article>>,
}

impl From<RawCollection> for Collection {
    fn from(raw: RawCollection) -> Self {
        let articles = raw.articles.unwrap_or_default();
        Self {
            id: raw.id.unwrap_or_default(),
            name: raw.name.unwrap_or_default(),
            description: raw.description,
            article_count: raw.article_count.unwrap_or(articles.len() as u64),
            articles,
        }
    }
}

/// Body for creating or renaming a collection.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CollectionPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}
