//! Profile lookup for the signed-in user.

use thiserror::Error;

use crate::models::UserProfile;
use crate::remote::RemoteStore;
use crate::session::{AccessOutcome, CredentialStore, SessionGuard};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProfileError {
    #[error("Please log in to view your profile.")]
    SignedOut,
    #[error("Session expired. Please log in again.")]
    SessionExpired,
    #[error("Access denied. Please check your permissions.")]
    Forbidden,
    #[error("Could not load your profile: {0}")]
    Unavailable(String),
}

pub struct ProfileFetcher<'a, R, S: CredentialStore> {
    remote: &'a R,
    guard: &'a SessionGuard<S>,
}

impl<'a, R: RemoteStore, S: CredentialStore> ProfileFetcher<'a, R, S> {
    pub const fn new(remote: &'a R, guard: &'a SessionGuard<S>) -> Self {
        Self { remote, guard }
    }

    /// No network call is made without a stored credential. A 401 clears it.
    pub async fn fetch_profile(&self) -> Result<UserProfile, ProfileError> {
        let Some(credential) = self.guard.credential() else {
            return Err(ProfileError::SignedOut);
        };
        let authorization = self.guard.authorization_header(&credential);
        let error = match self.remote.fetch_profile(&authorization).await {
            Ok(profile) => return Ok(profile),
            Err(error) => error,
        };

        match error.status().map(|status| self.guard.observe(status)) {
            Some(AccessOutcome::Unauthenticated) => Err(ProfileError::SessionExpired),
            Some(AccessOutcome::Forbidden) => Err(ProfileError::Forbidden),
            _ => {
                tracing::warn!("Profile fetch failed: {}", error);
                Err(ProfileError::Unavailable(error.to_string()))
            }
        }
    }
}
