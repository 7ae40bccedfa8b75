//! Session lifecycle.
//!
//! A `SessionManager` is created once per run. Construction spawns the
//! bootstrap step, which tries to restore the session from the persisted
//! token (falling back to a refresh) and then settles `initializing` to
//! false exactly once.
//!
//! State is published through a `tokio::sync::watch` channel. Operations
//! are not serialized against each other: each state change (token and
//! user together) is applied atomically, and the last one to run wins.

use std::sync::{Arc, Weak};

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::{SessionError, TokenStore};
use crate::api::{refresh_scope, ApiClient, AuthHandlers, AuthInterceptor};
use crate::models::{AuthResponse, LoginPayload, RegisterPayload, UpdateProfilePayload, UserProfile};
use crate::service::CredentialService;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    Bootstrapping,
    Anonymous,
    Authenticated,
}

/// Snapshot of the session as seen by the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub user: Option<UserProfile>,
    pub access_token: Option<String>,
    pub initializing: bool,
}

impl SessionState {
    pub fn status(&self) -> SessionStatus {
        if self.initializing {
            SessionStatus::Bootstrapping
        } else if self.user.is_some() {
            SessionStatus::Authenticated
        } else {
            SessionStatus::Anonymous
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

struct Inner {
    service: Arc<dyn CredentialService>,
    tokens: TokenStore,
    state: watch::Sender<SessionState>,
}

#[derive(Clone)]
pub struct SessionManager {
    inner: Arc<Inner>,
}

impl SessionManager {
    /// Create the session and spawn its bootstrap.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(service: Arc<dyn CredentialService>, tokens: TokenStore) -> Self {
        Self::launch(service, tokens, None)
    }

    /// Like [`start`](Self::start), binding the session to `interceptor`
    /// before the bootstrap runs.
    pub fn start_with_interceptor(
        service: Arc<dyn CredentialService>,
        tokens: TokenStore,
        interceptor: &AuthInterceptor,
    ) -> Self {
        Self::launch(service, tokens, Some(interceptor))
    }

    /// Session backed by `client`, with the client's requests carrying and
    /// renewing this session's token.
    pub fn start_with_client(client: &ApiClient, tokens: TokenStore) -> Self {
        Self::launch(Arc::new(client.clone()), tokens, Some(client.interceptor()))
    }

    fn launch(
        service: Arc<dyn CredentialService>,
        tokens: TokenStore,
        interceptor: Option<&AuthInterceptor>,
    ) -> Self {
        let initial = SessionState {
            user: None,
            access_token: tokens.get(),
            initializing: true,
        };
        let (state, _) = watch::channel(initial);
        let session = Self {
            inner: Arc::new(Inner {
                service,
                tokens,
                state,
            }),
        };

        if let Some(interceptor) = interceptor {
            interceptor.attach(session.auth_handlers());
        }

        let bootstrapping = session.clone();
        tokio::spawn(async move {
            bootstrapping.bootstrap().await;
        });

        session
    }

    // =========================================================================
    // Published state
    // =========================================================================

    pub fn state(&self) -> SessionState {
        self.inner.state.borrow().clone()
    }

    pub fn user(&self) -> Option<UserProfile> {
        self.inner.state.borrow().user.clone()
    }

    pub fn access_token(&self) -> Option<String> {
        self.inner.tokens.get()
    }

    pub fn is_initializing(&self) -> bool {
        self.inner.state.borrow().initializing
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.inner.state.subscribe()
    }

    /// Wait for the bootstrap to finish and return the resulting state.
    pub async fn settled(&self) -> SessionState {
        let mut rx = self.subscribe();
        let settled = rx.wait_for(|state| !state.initializing).await.map(|s| s.clone());
        settled.unwrap_or_else(|_| self.state())
    }

    /// Callbacks for an [`AuthInterceptor`]. They hold the session weakly.
    pub fn auth_handlers(&self) -> Arc<dyn AuthHandlers> {
        Arc::new(SessionHandlers {
            session: Arc::downgrade(&self.inner),
        })
    }

    // =========================================================================
    // Operations
    // =========================================================================

    pub async fn login(&self, email: &str, password: &str) -> Result<()> {
        let payload = LoginPayload {
            email: email.to_string(),
            password: password.to_string(),
        };
        let response = self.inner.service.login(&payload).await?;
        self.persist_session(response);
        info!(email, "User logged in");
        Ok(())
    }

    pub async fn register(&self, payload: &RegisterPayload) -> Result<()> {
        let response = self.inner.service.register(payload).await?;
        self.persist_session(response);
        info!(email = %payload.email, "User registered");
        Ok(())
    }

    /// Renew the access token and reload the profile.
    ///
    /// Returns `Ok(None)` (after logging out) when the server has no
    /// session to renew. A profile failure after a successful renewal is
    /// returned as an error; the new token stays persisted.
    pub async fn refresh(&self) -> Result<Option<String>> {
        refresh_scope(self.refresh_session()).await
    }

    async fn refresh_session(&self) -> Result<Option<String>> {
        let token = match self.inner.service.refresh_token().await {
            Ok(Some(token)) => token,
            Ok(None) => {
                debug!("No session to refresh, logging out");
                self.logout();
                return Ok(None);
            }
            Err(e) => {
                warn!(error = %e, "Refresh failed, logging out");
                self.logout();
                return Ok(None);
            }
        };

        self.persist_token(Some(token.clone()));
        let profile = self.inner.service.get_profile().await?;
        self.set_user(Some(profile));
        debug!("Session refreshed");
        Ok(Some(token))
    }

    /// Clear the session locally. The server is told in the background and
    /// the outcome of that call is discarded; the returned handle lets a
    /// short-lived caller give it time to finish.
    pub fn logout(&self) -> Option<JoinHandle<()>> {
        self.clear();
        info!("User logged out");

        let service = Arc::clone(&self.inner.service);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => Some(handle.spawn(async move {
                if let Err(e) = service.notify_logout().await {
                    debug!(error = %e, "Logout notification failed");
                }
            })),
            Err(_) => {
                debug!("No runtime, skipping logout notification");
                None
            }
        }
    }

    /// Update the profile. Only allowed while signed in.
    pub async fn update_user(&self, payload: &UpdateProfilePayload) -> Result<UserProfile> {
        if !self.state().is_authenticated() {
            return Err(SessionError::NotAuthenticated.into());
        }

        let profile = self.inner.service.update_profile(payload).await?;

        // A logout may have happened while the update was in flight
        let applied = self.inner.state.send_if_modified(|state| {
            if state.user.is_some() {
                state.user = Some(profile.clone());
                true
            } else {
                false
            }
        });
        if !applied {
            return Err(SessionError::NotAuthenticated.into());
        }

        info!(fields = ?payload.fields(), "User profile updated");
        Ok(profile)
    }

    async fn bootstrap(&self) {
        if self.inner.tokens.get().is_some() {
            match self.inner.service.get_profile().await {
                Ok(profile) => {
                    self.set_user(Some(profile));
                    self.settle();
                    info!("Session restored from stored token");
                    return;
                }
                Err(e) => warn!(error = %e, "Stored token invalid, attempting refresh"),
            }
        } else {
            debug!("No stored token, attempting refresh");
        }

        if let Err(e) = self.refresh().await {
            warn!(error = %e, "Startup refresh could not load the profile");
        }
        self.settle();
    }

    // =========================================================================
    // State mutation
    // =========================================================================

    fn persist_token(&self, token: Option<String>) {
        let tokens = &self.inner.tokens;
        self.inner.state.send_modify(|state| {
            tokens.set(token);
            state.access_token = tokens.get();
        });
    }

    fn persist_session(&self, auth: AuthResponse) {
        let tokens = &self.inner.tokens;
        self.inner.state.send_modify(|state| {
            tokens.set(Some(auth.tokens.access_token));
            state.access_token = tokens.get();
            state.user = Some(auth.user);
        });
    }

    fn set_user(&self, user: Option<UserProfile>) {
        self.inner.state.send_modify(|state| state.user = user);
    }

    fn clear(&self) {
        let tokens = &self.inner.tokens;
        self.inner.state.send_modify(|state| {
            tokens.clear();
            state.access_token = None;
            state.user = None;
        });
    }

    fn settle(&self) {
        self.inner.state.send_if_modified(|state| {
            let was_initializing = state.initializing;
            state.initializing = false;
            was_initializing
        });
    }
}

/// Interceptor callbacks. Weak so the transport does not keep the session alive.
struct SessionHandlers {
    session: Weak<Inner>,
}

impl SessionHandlers {
    fn session(&self) -> Option<SessionManager> {
        self.session.upgrade().map(|inner| SessionManager { inner })
    }
}

#[async_trait]
impl AuthHandlers for SessionHandlers {
    fn access_token(&self) -> Option<String> {
        self.session().and_then(|s| s.access_token())
    }

    async fn refresh(&self) -> Result<Option<String>> {
        match self.session() {
            Some(session) => session.refresh().await,
            None => Ok(None),
        }
    }

    fn logout(&self) {
        let Some(session) = self.session() else {
            return;
        };
        let state = session.state();
        // A failed refresh has already signed the session out
        if state.user.is_none() && state.access_token.is_none() {
            debug!("Session already signed out");
            return;
        }
        let _ = session.logout();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::auth::MemoryTokenStorage;
    use crate::test_support::{auth, user, FakeService};

    fn start(service: &Arc<FakeService>, storage: &Arc<MemoryTokenStorage>) -> SessionManager {
        SessionManager::start(service.clone(), TokenStore::open(storage.clone()))
    }

    async fn wait_for_logout_notifications(service: &FakeService, expected: usize) {
        for _ in 0..50 {
            if service.logout_notifications() >= expected {
                return;
            }
            tokio::task::yield_now().await;
        }
    }

    // -------------------------------------------------------------------------
    // Bootstrap
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_bootstrap_without_token_tries_refresh() {
        let service = Arc::new(FakeService::default());
        let storage = Arc::new(MemoryTokenStorage::new());
        let session = start(&service, &storage);
        assert!(session.is_initializing());

        let state = session.settled().await;
        assert!(!state.initializing);
        assert!(state.user.is_none());
        assert!(state.access_token.is_none());
        assert!(storage.stored().is_none());
        assert_eq!(service.refreshes(), 1);
        assert_eq!(service.profile_fetches(), 0);
        assert_eq!(state.status(), SessionStatus::Anonymous);
    }

    #[tokio::test]
    async fn test_bootstrap_with_valid_token() {
        let profile = user(1, "p", "P");
        let service = Arc::new(FakeService::with_profile(profile.clone()));
        let storage = Arc::new(MemoryTokenStorage::with_token("stored"));
        let session = start(&service, &storage);

        let state = session.settled().await;
        assert_eq!(state.user, Some(profile));
        assert_eq!(state.access_token.as_deref(), Some("stored"));
        assert_eq!(storage.stored().as_deref(), Some("stored"));
        assert_eq!(service.refreshes(), 0);
        assert_eq!(state.status(), SessionStatus::Authenticated);
    }

    #[tokio::test]
    async fn test_bootstrap_invalid_token_refresh_succeeds() {
        let service = Arc::new(FakeService::with_profile(user(1, "p", "P")));
        service.fail_profile(1);
        service.push_refresh(Ok(Some("newtoken".to_string())));
        let storage = Arc::new(MemoryTokenStorage::with_token("stored"));
        let session = start(&service, &storage);

        let state = session.settled().await;
        assert_eq!(storage.stored().as_deref(), Some("newtoken"));
        assert_eq!(state.access_token.as_deref(), Some("newtoken"));
        assert_eq!(state.user.map(|u| u.email).as_deref(), Some("p"));
        assert_eq!(service.profile_fetches(), 2);
    }

    #[tokio::test]
    async fn test_bootstrap_invalid_token_refresh_fails() {
        let service = Arc::new(FakeService::with_profile(user(1, "p", "P")));
        service.fail_profile(1);
        service.push_refresh(Ok(None));
        let storage = Arc::new(MemoryTokenStorage::with_token("bad"));
        let session = start(&service, &storage);

        let state = session.settled().await;
        assert!(storage.stored().is_none());
        assert!(state.user.is_none());
        assert!(state.access_token.is_none());
        assert!(!state.initializing);
    }

    #[tokio::test]
    async fn test_bootstrap_refresh_error_settles_anonymous() {
        let service = Arc::new(FakeService::default());
        service.push_refresh(Err(anyhow::anyhow!("offline")));
        let storage = Arc::new(MemoryTokenStorage::new());
        let session = start(&service, &storage);

        let state = session.settled().await;
        assert_eq!(state.status(), SessionStatus::Anonymous);
    }

    #[tokio::test]
    async fn test_bootstrap_settles_when_profile_keeps_failing() {
        let service = Arc::new(FakeService::with_profile(user(1, "p", "P")));
        service.fail_profile(2);
        service.push_refresh(Ok(Some("newtoken".to_string())));
        let storage = Arc::new(MemoryTokenStorage::with_token("stored"));
        let session = start(&service, &storage);

        let state = session.settled().await;
        assert!(!state.initializing);
        assert!(state.user.is_none());
        // Renewed token is kept for a later profile fetch
        assert_eq!(storage.stored().as_deref(), Some("newtoken"));
    }

    #[tokio::test]
    async fn test_initializing_never_returns() {
        let service = Arc::new(FakeService::with_profile(user(1, "p", "P")));
        service.push_refresh(Ok(Some("again".to_string())));
        let storage = Arc::new(MemoryTokenStorage::with_token("stored"));
        let session = start(&service, &storage);
        session.settled().await;

        session.refresh().await.unwrap();
        session.logout();
        assert!(!session.is_initializing());
        assert_eq!(session.state().status(), SessionStatus::Anonymous);
    }

    // -------------------------------------------------------------------------
    // Login / register / logout
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_login_then_logout() {
        let service = Arc::new(FakeService::default());
        *service.login_response.lock().unwrap() = Some(auth(user(1, "a", "A"), "t"));
        let storage = Arc::new(MemoryTokenStorage::new());
        let session = start(&service, &storage);
        session.settled().await;

        session.login("a", "pass").await.unwrap();
        let state = session.state();
        assert_eq!(state.user.as_ref().map(|u| u.email.as_str()), Some("a"));
        assert_eq!(state.access_token.as_deref(), Some("t"));
        assert_eq!(storage.stored().as_deref(), Some("t"));

        session.logout();
        let state = session.state();
        assert!(state.user.is_none());
        assert!(state.access_token.is_none());
        assert!(session.access_token().is_none());
        assert!(storage.stored().is_none());

        wait_for_logout_notifications(&service, 2).await;
        // One from the startup refresh finding no session, one from this logout
        assert_eq!(service.logout_notifications(), 2);
    }

    #[tokio::test]
    async fn test_login_failure_leaves_state() {
        let service = Arc::new(FakeService::with_profile(user(1, "p", "P")));
        let storage = Arc::new(MemoryTokenStorage::with_token("stored"));
        let session = start(&service, &storage);
        let before = session.settled().await;

        let err = session.login("a", "wrong").await.unwrap_err();
        assert!(ApiError::is_unauthorized(&err));
        assert_eq!(session.state(), before);
        assert_eq!(storage.stored().as_deref(), Some("stored"));
    }

    #[tokio::test]
    async fn test_register_authenticates() {
        let service = Arc::new(FakeService::default());
        *service.register_response.lock().unwrap() = Some(auth(user(2, "b", "B"), "t2"));
        let storage = Arc::new(MemoryTokenStorage::new());
        let session = start(&service, &storage);
        session.settled().await;

        let payload = RegisterPayload {
            email: "b".to_string(),
            password: "p".to_string(),
            name: "B".to_string(),
            ..Default::default()
        };
        session.register(&payload).await.unwrap();
        assert_eq!(session.user().map(|u| u.email).as_deref(), Some("b"));
        assert_eq!(storage.stored().as_deref(), Some("t2"));
    }

    #[tokio::test]
    async fn test_register_failure_propagates() {
        let service = Arc::new(FakeService::default());
        let storage = Arc::new(MemoryTokenStorage::new());
        let session = start(&service, &storage);
        session.settled().await;

        let err = session.register(&RegisterPayload::default()).await.unwrap_err();
        assert!(matches!(err.downcast_ref::<ApiError>(), Some(ApiError::BadRequest(_))));
        assert!(session.user().is_none());
    }

    #[tokio::test]
    async fn test_logout_notification_failure_is_swallowed() {
        let service = Arc::new(FakeService {
            notify_logout_fails: true,
            ..FakeService::with_profile(user(1, "p", "P"))
        });
        let storage = Arc::new(MemoryTokenStorage::with_token("stored"));
        let session = start(&service, &storage);
        session.settled().await;

        session.logout();
        wait_for_logout_notifications(&service, 1).await;
        assert_eq!(service.logout_notifications(), 1);
        assert!(session.user().is_none());
        assert!(storage.stored().is_none());
    }

    // -------------------------------------------------------------------------
    // Refresh
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_refresh_renews_token_and_profile() {
        let service = Arc::new(FakeService::with_profile(user(1, "p", "P")));
        let storage = Arc::new(MemoryTokenStorage::with_token("stored"));
        let session = start(&service, &storage);
        session.settled().await;

        service.push_refresh(Ok(Some("fresh".to_string())));
        let token = session.refresh().await.unwrap();
        assert_eq!(token.as_deref(), Some("fresh"));
        assert_eq!(storage.stored().as_deref(), Some("fresh"));
        assert!(session.user().is_some());
    }

    #[tokio::test]
    async fn test_refresh_error_logs_out() {
        let service = Arc::new(FakeService::with_profile(user(1, "p", "P")));
        let storage = Arc::new(MemoryTokenStorage::with_token("stored"));
        let session = start(&service, &storage);
        session.settled().await;

        service.push_refresh(Err(anyhow::anyhow!("refresh cookie expired")));
        assert_eq!(session.refresh().await.unwrap(), None);
        assert_eq!(session.state().status(), SessionStatus::Anonymous);
        assert!(storage.stored().is_none());
    }

    #[tokio::test]
    async fn test_refresh_profile_failure_keeps_token() {
        let service = Arc::new(FakeService::with_profile(user(1, "p", "P")));
        let storage = Arc::new(MemoryTokenStorage::with_token("stored"));
        let session = start(&service, &storage);
        session.settled().await;

        service.push_refresh(Ok(Some("fresh".to_string())));
        service.fail_profile(1);
        let err = session.refresh().await.unwrap_err();
        assert!(ApiError::is_unauthorized(&err));
        assert_eq!(storage.stored().as_deref(), Some("fresh"));
        assert_eq!(session.access_token().as_deref(), Some("fresh"));
    }

    // -------------------------------------------------------------------------
    // Profile update
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_update_user_keeps_token() {
        let service = Arc::new(FakeService::with_profile(user(1, "p", "P")));
        let mut updated = user(1, "p", "P");
        updated.country = Some("BR".to_string());
        *service.update_response.lock().unwrap() = Some(updated.clone());
        let storage = Arc::new(MemoryTokenStorage::with_token("stored"));
        let session = start(&service, &storage);
        session.settled().await;

        let payload = UpdateProfilePayload {
            country: Some("BR".to_string()),
            ..Default::default()
        };
        let before = session.access_token();
        let profile = session.update_user(&payload).await.unwrap();

        assert_eq!(profile, updated);
        assert_eq!(session.user(), Some(updated));
        assert_eq!(session.access_token(), before);
        assert_eq!(storage.stored().as_deref(), Some("stored"));
    }

    #[tokio::test]
    async fn test_update_user_requires_login() {
        let service = Arc::new(FakeService::default());
        let storage = Arc::new(MemoryTokenStorage::new());
        let session = start(&service, &storage);
        session.settled().await;

        let err = session
            .update_user(&UpdateProfilePayload::default())
            .await
            .unwrap_err();
        assert_eq!(err.downcast_ref::<SessionError>(), Some(&SessionError::NotAuthenticated));
        assert_eq!(service.updates(), 0);
    }

    #[tokio::test]
    async fn test_update_user_failure_leaves_profile() {
        let profile = user(1, "p", "P");
        let service = Arc::new(FakeService::with_profile(profile.clone()));
        let storage = Arc::new(MemoryTokenStorage::with_token("stored"));
        let session = start(&service, &storage);
        session.settled().await;

        assert!(session.update_user(&UpdateProfilePayload::default()).await.is_err());
        assert_eq!(session.user(), Some(profile));
    }

    // -------------------------------------------------------------------------
    // Interceptor wiring
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_interceptor_renews_through_session() {
        let service = Arc::new(FakeService::with_profile(user(1, "p", "P")));
        let storage = Arc::new(MemoryTokenStorage::with_token("stored"));
        let interceptor = AuthInterceptor::new();
        let session =
            SessionManager::start_with_interceptor(service.clone(), TokenStore::open(storage.clone()), &interceptor);
        session.settled().await;
        assert_eq!(interceptor.access_token().as_deref(), Some("stored"));

        // Backend expired "stored" and only accepts the renewed token
        service.push_refresh(Ok(Some("renewed".to_string())));
        let result = interceptor
            .execute(false, |token: Option<String>| async move {
                match token.as_deref() {
                    Some("renewed") => Ok("articles"),
                    _ => Err(ApiError::Unauthorized.into()),
                }
            })
            .await
            .unwrap();

        assert_eq!(result, "articles");
        assert_eq!(storage.stored().as_deref(), Some("renewed"));
        assert_eq!(session.state().status(), SessionStatus::Authenticated);
    }

    #[tokio::test]
    async fn test_interceptor_failed_renewal_logs_out() {
        let service = Arc::new(FakeService::with_profile(user(1, "p", "P")));
        let storage = Arc::new(MemoryTokenStorage::with_token("stored"));
        let interceptor = AuthInterceptor::new();
        let session =
            SessionManager::start_with_interceptor(service.clone(), TokenStore::open(storage.clone()), &interceptor);
        session.settled().await;

        let err = interceptor
            .execute(false, |_token| async { Err::<(), _>(ApiError::Unauthorized.into()) })
            .await
            .unwrap_err();

        assert!(ApiError::is_unauthorized(&err));
        assert_eq!(session.state().status(), SessionStatus::Anonymous);
        assert!(storage.stored().is_none());

        // The refresh signed out once; the interceptor must not do it again
        wait_for_logout_notifications(&service, 1).await;
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
        assert_eq!(service.logout_notifications(), 1);
    }

    #[tokio::test]
    async fn test_interceptor_refresh_error_logs_out_once() {
        let service = Arc::new(FakeService::with_profile(user(1, "p", "P")));
        let storage = Arc::new(MemoryTokenStorage::with_token("stored"));
        let interceptor = AuthInterceptor::new();
        let session =
            SessionManager::start_with_interceptor(service.clone(), TokenStore::open(storage.clone()), &interceptor);
        session.settled().await;

        service.push_refresh(Err(anyhow::anyhow!("refresh cookie expired")));
        let result = interceptor
            .execute(false, |_token| async { Err::<(), _>(ApiError::Unauthorized.into()) })
            .await;

        assert!(result.is_err());
        wait_for_logout_notifications(&service, 1).await;
        for _ in 0..20 {
            tokio::task::yield_now().await;
        }
        assert_eq!(service.logout_notifications(), 1);
        assert_eq!(session.state().status(), SessionStatus::Anonymous);
    }

    #[tokio::test]
    async fn test_handlers_do_not_keep_session_alive() {
        let service = Arc::new(FakeService::with_profile(user(1, "p", "P")));
        let storage = Arc::new(MemoryTokenStorage::with_token("stored"));
        let session = start(&service, &storage);
        session.settled().await;

        let handlers = session.auth_handlers();
        assert_eq!(handlers.access_token().as_deref(), Some("stored"));

        drop(session);
        assert!(handlers.access_token().is_none());
        assert_eq!(handlers.refresh().await.unwrap(), None);
    }
}
