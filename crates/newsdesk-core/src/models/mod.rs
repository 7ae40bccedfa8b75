//! Data models for the news service.
//!
//! - `UserProfile`: the signed-in user's profile, including the news API key
//! - `AuthResponse`, `AuthTokens` and the login/register/update payloads
//! - `Article`, `NewsSearchResult`, `SearchQuery`: news search
//! - `Collection`: named groups of saved articles
//!
//! Server payloads are mapped leniently: missing fields take defaults and
//! the camelCase/snake_case variants the backend emits are both accepted.

pub mod article;
pub mod auth;
pub mod collection;
pub mod user;

pub use article::{Article, NewsSearchResult, SearchQuery, SortBy};
pub use auth::{AuthResponse, AuthTokens, LoginPayload, RegisterPayload, UpdateProfilePayload};
pub use collection::{Collection, CollectionPayload};
pub use user::UserProfile;
