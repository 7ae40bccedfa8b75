use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawArticle")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct Article {
    /// Only set once the article has been saved to a collection.
    pub id: Option<i64>,
    pub url: String,
    pub title: String,
    pub description: Option<String>,
    pub content: Option<String>,
    pub source: Option<String>,
    pub author: Option<String>,
    pub published_at: Option<String>,
    pub image_url: Option<String>,
}

impl Article {
    pub fn new(url: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: title.into(),
            ..Self::default()
        }
    }

    pub fn display_source(&self) -> &str {
        self.source.as_deref().unwrap_or("Unknown source")
    }
}

/// The search provider sends `source` either as a name or as `{ "name": .. }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawSource {
    Name(String),
    Object { name: Option<String> },
}

/// Article as returned by either the search or the collections endpoints.
#[derive(Debug, Default, Deserialize)]
struct RawArticle {
    id: Option<i64>,
    url: Option<String>,
    title: Option<String>,
    description: Option<String>,
    content: Option<String>,
    source: Option<RawSource>,
    author: Option<String>,
    #[serde(rename = "publishedAt")]
    published_at_camel: Option<String>,
    published_at: Option<String>,
    #[serde(rename = "urlToImage")]
    url_to_image: Option<String>,
    image_url: Option<String>,
    #[serde(rename = "imageUrl")]
    image_url_camel: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.is_empty())
}

impl From<RawArticle> for Article {
    fn from(raw: RawArticle) -> Self {
        let source = match raw.source {
            Some(RawSource::Name(name)) => Some(name),
            Some(RawSource::Object { name }) => non_empty(name),
            None => None,
        };
        let content = non_empty(raw.content).or_else(|| non_empty(raw.description.clone()));

        Self {
            id: raw.id,
            url: raw.url.unwrap_or_default(),
            title: raw.title.unwrap_or_default(),
            description: raw.description,
            content,
            source,
            author: raw.author,
            published_at: non_empty(raw.published_at_camel).or(non_empty(raw.published_at)),
            image_url: non_empty(raw.url_to_image)
                .or(non_empty(raw.image_url))
                .or(non_empty(raw.image_url_camel)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub enum SortBy {
    #[default]
    #[serde(rename = "relevancy")]
    Relevancy,
    #[serde(rename = "publishedAt")]
    PublishedAt,
}

impl SortBy {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortBy::Relevancy => "relevancy",
            SortBy::PublishedAt => "publishedAt",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "relevancy" | "relevance" => Some(SortBy::Relevancy),
            "publishedat" | "published" | "date" => Some(SortBy::PublishedAt),
            _ => None,
        }
    }
}

/// Parameters for `GET /news/search`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub topic: String,
    pub page: u32,
    pub page_size: u32,
    pub sort_by: SortBy,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl SearchQuery {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            page: 1,
            page_size: 20,
            sort_by: SortBy::default(),
            from: None,
            to: None,
        }
    }

    /// Query string pairs; date bounds are only sent when set.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("topic", self.topic.clone()),
            ("page", self.page.to_string()),
            ("page_size", self.page_size.to_string()),
            ("sort_by", self.sort_by.as_str().to_string()),
        ];
        if let Some(ref from) = self.from {
            params.push(("from_date", from.clone()));
        }
        if let Some(ref to) = self.to {
            params.push(("to_date", to.clone()));
        }
        params
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct NewsSearchResult {
    pub articles: Vec<Article>,
    pub total_results: u64,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawSearchResponse {
    #[serde(default)]
    pub articles: Option<Vec<Article>>,
    #[serde(rename = "totalResults")]
    pub total_results: Option<u64>,
}

impl From<RawSearchResponse> for NewsSearchResult {
    fn from(raw: RawSearchResponse) -> Self {
        let articles = raw.articles.unwrap_or_default();
        let total_results = raw.total_results.unwrap_or(articles.len() as u64);
        Self {
            articles,
            total_results,
        }
    }
}
