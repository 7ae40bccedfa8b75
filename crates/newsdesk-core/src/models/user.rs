use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "RawUser")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct UserProfile {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub country: Option<String>,
    pub languages: Vec<String>,
    pub favorite_topics: Vec<String>,
    /// Key for the third-party news API, stored server side.
    pub news_api_token: Option<String>,
}

impl UserProfile {
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.email
        } else {
            &self.name
        }
    }

    pub fn has_news_api_token(&self) -> bool {
        self.news_api_token.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// User as the backend sends it. Older accounts carry a single `language`.
#[derive(Debug, Default, Deserialize)]
struct RawUser {
    id: Option<i64>,
    email: Option<String>,
    name: Option<String>,
    country: Option<String>,
    language: Option<String>,
    languages: Option<Vec<String>>,
    favorite_topics: Option<Vec<String>>,
    #[serde(rename = "favoriteTopics")]
    favorite_topics_camel: Option<Vec<String>>,
    news_api_token: Option<String>,
}

impl From<RawUser> for UserProfile {
    fn from(raw: RawUser) -> Self {
        let languages = match (raw.languages, raw.language) {
            (Some(languages), _) => languages,
            (None, Some(language)) if !language.is_empty() => vec![language],
            _ => Vec::new(),
        };

        Self {
            id: raw.id.unwrap_or_default(),
            email: raw.email.unwrap_or_default(),
            name: raw.name.unwrap_or_default(),
            country: raw.country,
            languages,
            favorite_topics: raw
                .favorite_topics
                .or(raw.favorite_topics_camel)
                .unwrap_or_default(),
            news_api_token: raw.news_api_token,
        }
    }
}
