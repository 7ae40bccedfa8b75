use serde::{Deserialize, Serialize};

use super::UserProfile;

#[derive(Debug, Clone, Serialize)]
pub struct LoginPayload {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Default, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct RegisterPayload {
    pub email: String,
    pub password: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Partial profile update. Fields left as `None` are not sent.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct UpdateProfilePayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub languages: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub favorite_topics: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub news_api_token: Option<String>,
}

impl UpdateProfilePayload {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Names of the fields this update touches, for logging.
    pub fn fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.name.is_some() {
            fields.push("name");
        }
        if self.country.is_some() {
            fields.push("country");
        }
        if self.languages.is_some() {
            fields.push("languages");
        }
        if self.favorite_topics.is_some() {
            fields.push("favorite_topics");
        }
        if self.news_api_token.is_some() {
            fields.push("news_api_token");
        }
        fields
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AuthTokens {
    pub access_token: String,
    pub token_type: String,
}

/// Login and registration response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawAuthResponse")]
#[cfg_attr(feature = "ts", derive(ts_rs::TS), ts(export))]
pub struct AuthResponse {
    pub user: UserProfile,
    pub tokens: AuthTokens,
}

#[derive(Debug, Default, Deserialize)]
struct RawAuthResponse {
    user: Option<UserProfile>,
    tokens: Option<RawTokens>,
}

#[derive(Debug, Default, Deserialize)]
struct RawTokens {
    access_token: Option<String>,
    token_type: Option<String>,
}

impl From<RawAuthResponse> for AuthResponse {
    fn from(raw: RawAuthResponse) -> Self {
        let tokens = raw.tokens.unwrap_or_default();
        Self {
            user: raw.user.unwrap_or_default(),
            tokens: AuthTokens {
                access_token: tokens.access_token.unwrap_or_default(),
                token_type: tokens.token_type.unwrap_or_else(|| "bearer".to_string()),
            },
        }
    }
}
