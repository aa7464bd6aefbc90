//! Session guard: credential access, header normalization, and outcome
//! classification for authenticated calls.

use std::fmt;
use std::sync::{Arc, Mutex};

use reqwest::StatusCode;
use thiserror::Error;

const BEARER_PREFIX: &str = "Bearer ";

/// Opaque token proving the signed-in identity. Stored without a scheme prefix.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    token: String,
}

impl Credential {
    /// Accepts a token with or without a `Bearer ` prefix.
    pub fn new(raw: impl AsRef<str>) -> AuthResult<Self> {
        let token = strip_scheme(raw.as_ref());
        if token.is_empty() {
            return Err(AuthError::InvalidCredential("token must not be empty"));
        }
        if token.chars().any(char::is_whitespace) {
            return Err(AuthError::InvalidCredential(
                "token must not contain whitespace",
            ));
        }
        Ok(Self {
            token: token.to_string(),
        })
    }

    #[must_use]
    pub fn token(&self) -> &str {
        &self.token
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Credential")
            .field("token", &"[REDACTED]")
            .finish()
    }
}

/// Classification of a remote call's HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessOutcome {
    Ok,
    Unauthenticated,
    Forbidden,
    Other,
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Invalid credential: {0}")]
    InvalidCredential(&'static str),
    #[error("Secure storage error: {0}")]
    SecureStorage(String),
}

pub type AuthResult<T> = Result<T, AuthError>;

/// Where the credential lives between sessions.
pub trait CredentialStore: Clone + Send + Sync + 'static {
    fn load_credential(&self) -> AuthResult<Option<Credential>>;
    fn save_credential(&self, credential: &Credential) -> AuthResult<()>;
    fn clear_credential(&self) -> AuthResult<()>;
}

/// In-process store. Clones share the same slot.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    slot: Arc<Mutex<Option<Credential>>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn with_credential(credential: Credential) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(credential))),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn load_credential(&self) -> AuthResult<Option<Credential>> {
        let guard = self
            .slot
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        Ok(guard.clone())
    }

    fn save_credential(&self, credential: &Credential) -> AuthResult<()> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        *guard = Some(credential.clone());
        Ok(())
    }

    fn clear_credential(&self) -> AuthResult<()> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|error| AuthError::SecureStorage(error.to_string()))?;
        *guard = None;
        Ok(())
    }
}

/// Single owner of credential reads and clears, shared by every component
/// that talks to authenticated endpoints.
#[derive(Debug, Clone)]
pub struct SessionGuard<S: CredentialStore> {
    store: S,
}

impl<S: CredentialStore> SessionGuard<S> {
    pub const fn new(store: S) -> Self {
        Self { store }
    }

    /// Current credential, or `None` when signed out.
    ///
    /// Storage failures are logged and treated as signed out.
    pub fn credential(&self) -> Option<Credential> {
        match self.store.load_credential() {
            Ok(credential) => credential,
            Err(error) => {
                tracing::warn!("Failed to read stored credential: {}", error);
                None
            }
        }
    }

    pub fn is_signed_in(&self) -> bool {
        self.credential().is_some()
    }

    pub fn sign_in(&self, raw_token: &str) -> AuthResult<Credential> {
        let credential = Credential::new(raw_token)?;
        self.store.save_credential(&credential)?;
        tracing::debug!("Stored new credential");
        Ok(credential)
    }

    pub fn sign_out(&self) -> AuthResult<()> {
        self.store.clear_credential()
    }

    /// `Authorization` header value for `credential`.
    pub fn authorization_header(&self, credential: &Credential) -> String {
        normalize(credential.token())
    }

    /// Classify `status`; an unauthenticated response clears the stored
    /// credential so every later caller sees a signed-out session.
    pub fn observe(&self, status: StatusCode) -> AccessOutcome {
        let outcome = classify(status);
        match outcome {
            AccessOutcome::Unauthenticated => {
                tracing::warn!("Remote rejected credential ({}); clearing session", status);
                if let Err(error) = self.store.clear_credential() {
                    tracing::warn!("Failed to clear stored credential: {}", error);
                }
            }
            AccessOutcome::Forbidden => {
                tracing::warn!("Remote denied access ({}); keeping session", status);
            }
            AccessOutcome::Ok | AccessOutcome::Other => {}
        }
        outcome
    }
}

/// Canonical `Bearer <token>` header value for a token stored with or
/// without its scheme.
pub fn normalize(raw: &str) -> String {
    format!("{BEARER_PREFIX}{}", strip_scheme(raw))
}

pub fn classify(status: StatusCode) -> AccessOutcome {
    if status.is_success() {
        AccessOutcome::Ok
    } else if status == StatusCode::UNAUTHORIZED {
        AccessOutcome::Unauthenticated
    } else if status == StatusCode::FORBIDDEN {
        AccessOutcome::Forbidden
    } else {
        AccessOutcome::Other
    }
}

/// Drops a leading `bearer` word (any case) followed by whitespace or the end
/// of input. `"Bearer"` alone strips to an empty token.
fn strip_scheme(raw: &str) -> &str {
    let trimmed = raw.trim();
    let scheme = BEARER_PREFIX.trim_end();
    match trimmed.get(..scheme.len()) {
        Some(head) if head.eq_ignore_ascii_case(scheme) => {
            let rest = &trimmed[scheme.len()..];
            if rest.is_empty() || rest.starts_with(char::is_whitespace) {
                rest.trim_start()
            } else {
                trimmed
            }
        }
        _ => trimmed,
    }
}
