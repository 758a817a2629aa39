use keyring::Entry;
use tracing::info;

use pollen_common::error::{PollenError, PollenResult};

/// Keyring service name. Every stored session token lives under it.
const KEYRING_SERVICE: &str = "pollen_client";

/// Session token persisted in the OS keyring, one entry per backend.
///
/// Tokens never touch the config file. The API client itself stays
/// stateless across runs; only the CLI reads and writes this store.
pub struct TokenStore {
    account: String,
}

impl TokenStore {
    /// Store for the backend at `api_url`.
    pub fn for_url(api_url: &str) -> Self {
        Self {
            account: format!("token@{}", api_url.trim().trim_end_matches('/')),
        }
    }

    /// Keyring account name used for this backend.
    pub fn account(&self) -> &str {
        &self.account
    }

    fn entry(&self) -> PollenResult<Entry> {
        Entry::new(KEYRING_SERVICE, &self.account)
            .map_err(|e| PollenError::Keyring(format!("Failed to open keyring entry: {e}")))
    }

    /// Persist `token`, replacing any previous one.
    pub fn save(&self, token: &str) -> PollenResult<()> {
        self.entry()?
            .set_password(token)
            .map_err(|e| PollenError::Keyring(format!("Failed to store token: {e}")))?;
        info!(account = %self.account, "session token stored");
        Ok(())
    }

    /// Stored token, or `None` if nobody logged in yet.
    pub fn load(&self) -> PollenResult<Option<String>> {
        match self.entry()?.get_password() {
            Ok(token) => Ok(Some(token)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(PollenError::Keyring(format!("Failed to read token: {e}"))),
        }
    }

    /// Remove the stored token. Returns whether one existed.
    pub fn clear(&self) -> PollenResult<bool> {
        match self.entry()?.delete_credential() {
            Ok(()) => {
                info!(account = %self.account, "session token cleared");
                Ok(true)
            }
            Err(keyring::Error::NoEntry) => Ok(false),
            Err(e) => Err(PollenError::Keyring(format!("Failed to clear token: {e}"))),
        }
    }
}
