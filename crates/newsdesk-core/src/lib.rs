//! Core library for newsdesk.
//!
//! - `auth`: token store and the session lifecycle manager
//! - `api`: REST client, auth interceptor and endpoint wrappers
//! - `service`: the credential capability the session manager calls into
//! - `models`: profile, article and collection types
//! - `search_cache`: last search state kept between runs
//! - `undo`: delayed actions that can be cancelled within a window
//! - `config`: user configuration and directory layout

pub mod api;
pub mod auth;
pub mod config;
pub mod models;
pub mod search_cache;
pub mod service;
pub mod undo;

#[cfg(test)]
mod test_support;

pub use api::{ApiClient, ApiError, AuthHandlers, AuthInterceptor};
pub use auth::{SessionError, SessionManager, SessionState, SessionStatus, TokenStore};
pub use config::Config;
pub use service::CredentialService;
