//! CLI credential persistence in the OS keychain.

#[cfg(test)]
use std::collections::HashMap;
#[cfg(test)]
use std::sync::{Mutex, OnceLock};

#[cfg(not(test))]
use keyring::Entry;

use solvetrack_core::session::{AuthError, AuthResult, Credential, CredentialStore};
use solvetrack_core::SessionGuard;

#[cfg(not(test))]
const KEYRING_SERVICE_NAME: &str = "solvetrack-cli";

/// One keychain entry per CLI profile.
#[derive(Debug, Clone)]
pub struct KeyringCredentialStore {
    username: String,
}

impl KeyringCredentialStore {
    pub fn new(profile_name: &str) -> Self {
        Self {
            username: format!("credential:{profile_name}"),
        }
    }

    #[cfg(test)]
    fn test_store() -> &'static Mutex<HashMap<String, String>> {
        static STORE: OnceLock<Mutex<HashMap<String, String>>> = OnceLock::new();
        STORE.get_or_init(|| Mutex::new(HashMap::new()))
    }

    #[cfg(not(test))]
    fn entry(&self) -> AuthResult<Entry> {
        Entry::new(KEYRING_SERVICE_NAME, &self.username)
            .map_err(|error| AuthError::SecureStorage(error.to_string()))
    }
}

impl CredentialStore for KeyringCredentialStore {
    #[cfg(not(test))]
    fn load_credential(&self) -> AuthResult<Option<Credential>> {
        match self.entry()?.get_password() {
            Ok(raw) => Credential::new(raw).map(Some),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(error) => Err(AuthError::SecureStorage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn load_credential(&self) -> AuthResult<Option<Credential>> {
        let guard = Self::test_store()
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        guard.get(&self.username).map(Credential::new).transpose()
    }

    #[cfg(not(test))]
    fn save_credential(&self, credential: &Credential) -> AuthResult<()> {
        self.entry()?
            .set_password(credential.token())
            .map_err(|error| AuthError::SecureStorage(error.to_string()))
    }

    #[cfg(test)]
    fn save_credential(&self, credential: &Credential) -> AuthResult<()> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        guard.insert(self.username.clone(), credential.token().to_string());
        Ok(())
    }

    #[cfg(not(test))]
    fn clear_credential(&self) -> AuthResult<()> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(error) => Err(AuthError::SecureStorage(error.to_string())),
        }
    }

    #[cfg(test)]
    fn clear_credential(&self) -> AuthResult<()> {
        let mut guard = Self::test_store()
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        guard.remove(&self.username);
        Ok(())
    }
}

pub fn session_guard(profile_name: &str) -> SessionGuard<KeyringCredentialStore> {
    SessionGuard::new(KeyringCredentialStore::new(profile_name))
}
