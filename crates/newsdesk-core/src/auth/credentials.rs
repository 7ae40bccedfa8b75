use anyhow::{bail, Context, Result};
use keyring::Entry;

use super::token_store::{TokenStorage, TOKEN_KEY};

const SERVICE_NAME: &str = "newsdesk";

/// Access token kept in the OS keychain.
pub struct KeyringTokenStorage {
    service: String,
}

impl KeyringTokenStorage {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
        }
    }

    /// Use a separate keychain service, e.g. one per backend.
    pub fn with_service(service: impl Into<String>) -> Self {
        Self {
            service: service.into(),
        }
    }

    fn entry(&self) -> Result<Entry> {
        Entry::new(&self.service, TOKEN_KEY).context("Failed to create keyring entry")
    }
}

impl Default for KeyringTokenStorage {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStorage for KeyringTokenStorage {
    fn load(&self) -> Result<Option<String>> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e).context("Failed to retrieve token from keychain"),
        }
    }

    fn save(&self, token: &str) -> Result<()> {
        self.entry()?
            .set_password(token)
            .context("Failed to store token in keychain")?;

        // A store without a real backend accepts the write and forgets it
        match self.entry()?.get_password() {
            Ok(stored) if stored == token => Ok(()),
            Ok(_) | Err(keyring::Error::NoEntry) => bail!("Keychain did not persist the token"),
            Err(e) => Err(e).context("Failed to verify token in keychain"),
        }
    }

    fn remove(&self) -> Result<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e).context("Failed to delete token from keychain"),
        }
    }
}
