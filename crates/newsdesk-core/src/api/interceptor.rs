//! Bearer credential injection and refresh-and-retry on 401.
//!
//! Every request goes through [`AuthInterceptor::execute`]. The request is
//! sent with the current token; if the backend answers 401 the interceptor
//! obtains a new token and reissues the request exactly once. Concurrent
//! 401s share one in-flight refresh.

use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use anyhow::Result;
use async_trait::async_trait;
use futures::future::{BoxFuture, FutureExt, Shared};
use tracing::{debug, warn};

use super::ApiError;

/// Callbacks binding a transport to the session that owns the token.
#[async_trait]
pub trait AuthHandlers: Send + Sync {
    fn access_token(&self) -> Option<String>;

    /// New token, `Ok(None)` if the session could not be renewed.
    async fn refresh(&self) -> Result<Option<String>>;

    /// Must not block; the caller is waiting to return its error.
    fn logout(&self);
}

tokio::task_local! {
    static REFRESHING: ();
}

/// Run `fut` as part of a token refresh. A 401 on any request made inside
/// it is returned as is instead of starting another refresh.
pub fn refresh_scope<F: Future>(fut: F) -> impl Future<Output = F::Output> {
    REFRESHING.scope((), fut)
}

fn in_refresh_scope() -> bool {
    REFRESHING.try_with(|_| ()).is_ok()
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum RefreshOutcome {
    Renewed(String),
    Exhausted,
}

type InflightRefresh = Shared<BoxFuture<'static, RefreshOutcome>>;

#[derive(Default)]
pub struct AuthInterceptor {
    handlers: RwLock<Option<Arc<dyn AuthHandlers>>>,
    inflight: Mutex<Option<InflightRefresh>>,
}

impl AuthInterceptor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind handlers. Attaching again replaces the previous ones.
    pub fn attach(&self, handlers: Arc<dyn AuthHandlers>) {
        let mut slot = self.handlers.write().unwrap_or_else(PoisonError::into_inner);
        if slot.is_some() {
            debug!("Replacing auth handlers");
        }
        *slot = Some(handlers);
    }

    pub fn is_attached(&self) -> bool {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    pub fn access_token(&self) -> Option<String> {
        self.handlers().and_then(|h| h.access_token())
    }

    fn handlers(&self) -> Option<Arc<dyn AuthHandlers>> {
        self.handlers
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Send a request through the auth pipeline.
    ///
    /// `send` is called with the bearer token to attach (if any). It is
    /// called at most twice: once normally and once more after a 401 when a
    /// new token could be obtained. `exempt` marks credential endpoints
    /// (refresh, login, ...), whose 401s are never recovered.
    pub async fn execute<T, F, Fut>(&self, exempt: bool, send: F) -> Result<T>
    where
        F: Fn(Option<String>) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let handlers = self.handlers();
        let sent_with = handlers.as_ref().and_then(|h| h.access_token());

        let err = match send(sent_with.clone()).await {
            Ok(value) => return Ok(value),
            Err(e) => e,
        };
        if !ApiError::is_unauthorized(&err) {
            return Err(err);
        }
        let Some(handlers) = handlers else {
            return Err(err);
        };
        if exempt || in_refresh_scope() {
            debug!(exempt, "401 not recoverable here");
            return Err(err);
        }

        let token = match handlers.access_token() {
            Some(current) if sent_with.as_ref() != Some(&current) => {
                debug!("Token changed while request was in flight, retrying with current token");
                current
            }
            _ => match self.refresh_once(&handlers).await {
                RefreshOutcome::Renewed(token) => token,
                RefreshOutcome::Exhausted => {
                    handlers.logout();
                    return Err(err);
                }
            },
        };

        debug!("Retrying request with renewed token");
        send(Some(token)).await
    }

    /// Join the in-flight refresh or start one.
    async fn refresh_once(&self, handlers: &Arc<dyn AuthHandlers>) -> RefreshOutcome {
        let refresh = {
            let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
            match inflight.as_ref() {
                Some(pending) => {
                    debug!("Joining in-flight token refresh");
                    pending.clone()
                }
                None => {
                    let handlers = Arc::clone(handlers);
                    let pending = refresh_scope(async move {
                        match handlers.refresh().await {
                            Ok(Some(token)) => RefreshOutcome::Renewed(token),
                            Ok(None) => {
                                debug!("Refresh returned no token");
                                RefreshOutcome::Exhausted
                            }
                            Err(e) => {
                                warn!(error = %e, "Token refresh failed");
                                RefreshOutcome::Exhausted
                            }
                        }
                    })
                    .boxed()
                    .shared();
                    *inflight = Some(pending.clone());
                    pending
                }
            }
        };

        let outcome = refresh.clone().await;

        let mut inflight = self.inflight.lock().unwrap_or_else(PoisonError::into_inner);
        if inflight.as_ref().is_some_and(|p| p.ptr_eq(&refresh)) {
            *inflight = None;
        }
        outcome
    }
}
