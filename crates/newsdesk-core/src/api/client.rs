//! HTTP client for the news backend.
//!
//! `ApiClient` owns the connection pool and the [`AuthInterceptor`]; every
//! endpoint wrapper in this module tree goes through [`ApiClient::execute`],
//! so bearer injection and refresh-and-retry apply uniformly.

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client, Method, Response};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use super::interceptor::{AuthHandlers, AuthInterceptor};
use super::ApiError;
use crate::config::Config;

/// Refresh endpoint.
pub(crate) const REFRESH_PATH: &str = "/auth/refresh";

/// Credential endpoints (login, register, refresh, logout, password reset).
/// A 401 from these is an answer, not an expired token, and is never retried.
const CREDENTIAL_PREFIX: &str = "/auth/";

/// Maximum number of retries for rate-limited (429) requests.
const MAX_RATE_LIMIT_RETRIES: u32 = 3;

/// Initial backoff delay in milliseconds for rate limiting.
const INITIAL_BACKOFF_MS: u64 = 1000;

/// API client for the news backend.
/// Clone is cheap - clones share the connection pool, cookies and auth handlers.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    auth: Arc<AuthInterceptor>,
}

impl ApiClient {
    pub fn new(config: &Config) -> Result<Self> {
        Self::with_base_url(config.api_base_url(), config.request_timeout())
    }

    pub fn with_base_url(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            auth: Arc::new(AuthInterceptor::new()),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn interceptor(&self) -> &AuthInterceptor {
        &self.auth
    }

    /// Bind session callbacks to this client (and all of its clones).
    pub fn attach_auth(&self, handlers: Arc<dyn AuthHandlers>) {
        self.auth.attach(handlers);
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn is_credential_call(path: &str) -> bool {
        path.starts_with(CREDENTIAL_PREFIX) || path.contains(REFRESH_PATH)
    }

    /// Check if response is successful, returning an error with body if not.
    /// Returns Ok(Some(response)) for success, Ok(None) for rate limit (should retry),
    /// or Err for other errors.
    async fn check_response_for_retry(response: Response) -> Result<Option<Response>> {
        if response.status().is_success() {
            Ok(Some(response))
        } else if response.status().as_u16() == 429 {
            Ok(None)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body).into())
        }
    }

    /// One attempt at the wire level, with rate-limit backoff.
    async fn send_once(
        &self,
        method: &Method,
        url: &str,
        query: &[(&'static str, String)],
        body: Option<&Value>,
        token: Option<&str>,
    ) -> Result<Response> {
        let mut retries = 0;
        let mut backoff_ms = INITIAL_BACKOFF_MS;

        loop {
            let mut request = self
                .client
                .request(method.clone(), url)
                .header(header::ACCEPT, "application/json");
            if !query.is_empty() {
                request = request.query(query);
            }
            if let Some(body) = body {
                request = request.json(body);
            }
            if let Some(token) = token {
                request = request.bearer_auth(token);
            }

            let response = request
                .send()
                .await
                .with_context(|| format!("Failed to send {} request to {}", method, url))?;

            match Self::check_response_for_retry(response).await? {
                Some(response) => return Ok(response),
                None => {
                    retries += 1;
                    if retries > MAX_RATE_LIMIT_RETRIES {
                        return Err(ApiError::RateLimited.into());
                    }
                    warn!(url = url, retry = retries, backoff_ms = backoff_ms, "Rate limited, backing off");
                    tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
                    backoff_ms *= 2;
                }
            }
        }
    }

    /// Send a request through the auth interceptor.
    pub(crate) async fn execute(
        &self,
        method: Method,
        path: &str,
        query: &[(&'static str, String)],
        body: Option<Value>,
    ) -> Result<Response> {
        let url = self.url(path);
        debug!(%method, path, "API request");

        let (method, url, body) = (&method, &url, body.as_ref());
        self.auth
            .execute(Self::is_credential_call(path), |token| async move {
                self.send_once(method, url, query, body, token.as_deref())
                    .await
            })
            .await
    }

    /// Parse a JSON body. An empty body parses as `null`.
    async fn parse_json<T: DeserializeOwned>(response: Response, path: &str) -> Result<T> {
        let text = response
            .text()
            .await
            .with_context(|| format!("Failed to read response body from {}", path))?;
        let text = if text.trim().is_empty() { "null" } else { text.as_str() };
        serde_json::from_str(text).with_context(|| format!("Failed to parse JSON response from {}", path))
    }

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&'static str, String)],
    ) -> Result<T> {
        let response = self.execute(Method::GET, path, query, None).await?;
        Self::parse_json(response, path).await
    }

    pub(crate) async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let body = serde_json::to_value(body).context("Failed to serialize request body")?;
        let response = self.execute(Method::POST, path, &[], Some(body)).await?;
        Self::parse_json(response, path).await
    }

    /// POST without a request body.
    pub(crate) async fn post_empty<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self.execute(Method::POST, path, &[], None).await?;
        Self::parse_json(response, path).await
    }

    pub(crate) async fn put<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T> {
        let body = serde_json::to_value(body).context("Failed to serialize request body")?;
        let response = self.execute(Method::PUT, path, &[], Some(body)).await?;
        Self::parse_json(response, path).await
    }

    pub(crate) async fn delete(&self, path: &str) -> Result<()> {
        self.execute(Method::DELETE, path, &[], None).await?;
        Ok(())
    }
}
