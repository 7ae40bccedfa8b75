//! Scripted `CredentialService` for session tests.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::api::ApiError;
use crate::models::{AuthResponse, AuthTokens, LoginPayload, RegisterPayload, UpdateProfilePayload, UserProfile};
use crate::service::CredentialService;

pub fn user(id: i64, email: &str, name: &str) -> UserProfile {
    UserProfile {
        id,
        email: email.to_string(),
        name: name.to_string(),
        ..UserProfile::default()
    }
}

pub fn auth(user: UserProfile, token: &str) -> AuthResponse {
    AuthResponse {
        user,
        tokens: AuthTokens {
            access_token: token.to_string(),
            token_type: "bearer".to_string(),
        },
    }
}

#[derive(Default)]
pub struct FakeService {
    pub profile: Mutex<UserProfile>,
    /// Number of upcoming `get_profile` calls that answer 401.
    pub profile_failures: AtomicUsize,
    /// Consumed in order; once empty, refresh answers `Ok(None)`.
    pub refresh_results: Mutex<VecDeque<Result<Option<String>>>>,
    pub login_response: Mutex<Option<AuthResponse>>,
    pub register_response: Mutex<Option<AuthResponse>>,
    pub update_response: Mutex<Option<UserProfile>>,
    pub notify_logout_fails: bool,

    pub refresh_calls: AtomicUsize,
    pub profile_calls: AtomicUsize,
    pub update_calls: AtomicUsize,
    pub logout_calls: AtomicUsize,
}

impl FakeService {
    pub fn with_profile(profile: UserProfile) -> Self {
        Self {
            profile: Mutex::new(profile),
            ..Self::default()
        }
    }

    pub fn fail_profile(&self, times: usize) {
        self.profile_failures.store(times, Ordering::SeqCst);
    }

    pub fn push_refresh(&self, result: Result<Option<String>>) {
        self.refresh_results.lock().unwrap().push_back(result);
    }

    pub fn refreshes(&self) -> usize {
        self.refresh_calls.load(Ordering::SeqCst)
    }

    pub fn profile_fetches(&self) -> usize {
        self.profile_calls.load(Ordering::SeqCst)
    }

    pub fn updates(&self) -> usize {
        self.update_calls.load(Ordering::SeqCst)
    }

    pub fn logout_notifications(&self) -> usize {
        self.logout_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialService for FakeService {
    async fn login(&self, _payload: &LoginPayload) -> Result<AuthResponse> {
        self.login_response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ApiError::Unauthorized.into())
    }

    async fn register(&self, _payload: &RegisterPayload) -> Result<AuthResponse> {
        self.register_response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| ApiError::BadRequest("email already registered".to_string()).into())
    }

    async fn refresh_token(&self) -> Result<Option<String>> {
        self.refresh_calls.fetch_add(1, Ordering::SeqCst);
        self.refresh_results
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Ok(None))
    }

    async fn get_profile(&self) -> Result<UserProfile> {
        self.profile_calls.fetch_add(1, Ordering::SeqCst);
        let remaining = self.profile_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.profile_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(ApiError::Unauthorized.into());
        }
        Ok(self.profile.lock().unwrap().clone())
    }

    async fn update_profile(&self, _payload: &UpdateProfilePayload) -> Result<UserProfile> {
        self.update_calls.fetch_add(1, Ordering::SeqCst);
        self.update_response
            .lock()
            .unwrap()
            .clone()
            .ok_or_else(|| anyhow!("update rejected"))
    }

    async fn notify_logout(&self) -> Result<()> {
        self.logout_calls.fetch_add(1, Ordering::SeqCst);
        if self.notify_logout_fails {
            return Err(anyhow!("server unreachable"));
        }
        Ok(())
    }
}
