//! Authentication module for managing the user session.
//!
//! This module provides:
//! - `TokenStore`: the access token, held in memory and written through to
//!   a durable `TokenStorage` (file, OS keychain, or memory)
//! - `SessionManager`: the session lifecycle (bootstrap, login, register,
//!   refresh, logout, profile update)
//!
//! Only the token survives a restart. The profile is always fetched again.

pub mod credentials;
pub mod error;
pub mod session;
pub mod token_store;

pub use credentials::KeyringTokenStorage;
pub use error::SessionError;
pub use session::{SessionManager, SessionState, SessionStatus};
pub use token_store::{FileTokenStorage, MemoryTokenStorage, TokenStorage, TokenStore, TOKEN_KEY};
