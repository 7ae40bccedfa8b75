//! REST API client module for the news backend.
//!
//! This module provides the `ApiClient` for the auth, profile, news search
//! and collection endpoints, plus the `AuthInterceptor` that attaches the
//! bearer token and renews it once when a request comes back 401.
//!
//! The refresh token lives in an HTTP-only cookie, so the client keeps a
//! cookie store; the access token travels as `Authorization: Bearer`.

pub mod auth;
pub mod client;
pub mod collections;
pub mod error;
pub mod interceptor;
pub mod news;
pub mod user;

pub use client::ApiClient;
pub use error::ApiError;
pub use interceptor::{refresh_scope, AuthHandlers, AuthInterceptor};
