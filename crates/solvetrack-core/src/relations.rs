//! Relation fetch: the signed-in user's solved and bookmarked sets.

use crate::models::UserRelationSets;
use crate::remote::{RemoteError, RemoteStore};
use crate::session::{AccessOutcome, Credential, CredentialStore, SessionGuard};

/// Tagged result of a relation fetch. Failures are values, not errors, so the
/// caller can tell "not signed in" apart from "temporarily unknown".
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RelationOutcome {
    Loaded(UserRelationSets),
    Unauthenticated,
    Forbidden,
    TransientFailure(String),
}

pub struct RelationFetcher<'a, R, S: CredentialStore> {
    remote: &'a R,
    guard: &'a SessionGuard<S>,
}

impl<'a, R: RemoteStore, S: CredentialStore> RelationFetcher<'a, R, S> {
    pub const fn new(remote: &'a R, guard: &'a SessionGuard<S>) -> Self {
        Self { remote, guard }
    }

    /// Requires a credential; callers without one skip the call entirely.
    pub async fn fetch_relations(&self, credential: &Credential) -> RelationOutcome {
        tracing::debug!("Fetching user relations");
        let authorization = self.guard.authorization_header(credential);
        match self.remote.fetch_relations(&authorization).await {
            Ok(sets) => {
                tracing::debug!(
                    solved = sets.solved.len(),
                    bookmarked = sets.bookmarked.len(),
                    "Fetched user relations"
                );
                RelationOutcome::Loaded(sets)
            }
            Err(error) => self.classify_failure(&error),
        }
    }

    fn classify_failure(&self, error: &RemoteError) -> RelationOutcome {
        let Some(status) = error.status() else {
            tracing::warn!("Relation fetch failed: {}", error);
            return RelationOutcome::TransientFailure(error.to_string());
        };
        match self.guard.observe(status) {
            AccessOutcome::Unauthenticated => RelationOutcome::Unauthenticated,
            AccessOutcome::Forbidden => RelationOutcome::Forbidden,
            AccessOutcome::Ok | AccessOutcome::Other => {
                tracing::warn!("Relation fetch failed: {}", error);
                RelationOutcome::TransientFailure(error.to_string())
            }
        }
    }
}
