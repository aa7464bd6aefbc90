//! Load-then-toggle orchestration handed to the presentation layer.

use std::rc::Rc;

use crate::catalog::{CatalogFetcher, CatalogUnavailable};
use crate::models::{Problem, ProblemId, RelationKind, UserProfile};
use crate::profile::{ProfileError, ProfileFetcher};
use crate::relations::{RelationFetcher, RelationOutcome};
use crate::remote::RemoteStore;
use crate::session::{CredentialStore, SessionGuard};
use crate::state::{LoadError, Notice, ProblemBoard, SharedBoard};
use crate::toggle::{ToggleController, ToggleError, ToggleOutcome};
use crate::view::GroupedView;

/// Owns the remote, the session guard, and the board they feed.
pub struct Problemset<R, S: CredentialStore> {
    remote: R,
    guard: SessionGuard<S>,
    board: SharedBoard,
}

impl<R: RemoteStore, S: CredentialStore> Problemset<R, S> {
    pub fn new(remote: R, guard: SessionGuard<S>) -> Self {
        Self {
            remote,
            guard,
            board: ProblemBoard::shared(),
        }
    }

    pub fn board(&self) -> SharedBoard {
        Rc::clone(&self.board)
    }

    pub const fn guard(&self) -> &SessionGuard<S> {
        &self.guard
    }

    pub fn is_loading(&self) -> bool {
        self.board.borrow().is_loading
    }

    pub fn error_message(&self) -> Option<String> {
        self.board.borrow().error_message()
    }

    /// Fetch catalog and relations concurrently and rebuild the view once.
    ///
    /// Only a catalog failure is returned as an error; relation problems are
    /// recorded on the board next to a still-rendered, unpersonalized view.
    pub async fn load(&self) -> Result<(), LoadError> {
        {
            let mut board = self.board.borrow_mut();
            board.is_loading = true;
            board.error = None;
        }

        let catalog_fetcher = CatalogFetcher::new(&self.remote);
        let relation_fetcher = RelationFetcher::new(&self.remote, &self.guard);
        let credential = self.guard.credential();
        let relations = async {
            match credential.as_ref() {
                Some(credential) => Some(relation_fetcher.fetch_relations(credential).await),
                None => {
                    tracing::debug!("No credential; skipping relation fetch");
                    None
                }
            }
        };

        let (catalog, relations) = tokio::join!(catalog_fetcher.fetch_catalog(), relations);
        let (view, error) = combine(catalog, relations);
        tracing::debug!(
            ratings = view.ratings().count(),
            problems = view.problem_count(),
            error = ?error,
            "Load finished"
        );

        let mut board = self.board.borrow_mut();
        board.view = view;
        board.error.clone_from(&error);
        board.is_loading = false;
        match error {
            Some(error) if error.is_fatal() => Err(error),
            _ => Ok(()),
        }
    }

    pub async fn toggle_solved(&self, problem_id: &ProblemId) -> Result<ToggleOutcome, ToggleError> {
        self.toggle(RelationKind::Solved, problem_id).await
    }

    pub async fn toggle_bookmarked(
        &self,
        problem_id: &ProblemId,
    ) -> Result<ToggleOutcome, ToggleError> {
        self.toggle(RelationKind::Bookmarked, problem_id).await
    }

    /// Toggle `kind` away from the value currently shown on the board.
    pub async fn toggle(
        &self,
        kind: RelationKind,
        problem_id: &ProblemId,
    ) -> Result<ToggleOutcome, ToggleError> {
        if !self.guard.is_signed_in() {
            return Err(ToggleError::RequiresAuth);
        }
        let current_value = self
            .board
            .borrow()
            .view
            .find(problem_id)
            .map(|entry| entry.relation(kind).value())
            .ok_or_else(|| ToggleError::UnknownProblem(problem_id.clone()))?;

        ToggleController::new(&self.remote, &self.guard)
            .toggle(&Rc::downgrade(&self.board), kind, problem_id, current_value)
            .await
    }

    /// Identity of the signed-in user. Does not touch the board.
    pub async fn profile(&self) -> Result<UserProfile, ProfileError> {
        ProfileFetcher::new(&self.remote, &self.guard)
            .fetch_profile()
            .await
    }

    /// Flip one rating group between expanded and collapsed.
    pub fn toggle_rating(&self, rating: u32) -> bool {
        self.board.borrow_mut().expansion.toggle(rating)
    }

    pub fn take_notices(&self) -> Vec<Notice> {
        self.board.borrow_mut().take_notices()
    }
}

/// Merge the two independently settled fetches.
///
/// `relations` is `None` when the fetch was skipped for lack of a credential.
pub fn combine(
    catalog: Result<Vec<Problem>, CatalogUnavailable>,
    relations: Option<RelationOutcome>,
) -> (GroupedView, Option<LoadError>) {
    let catalog = match catalog {
        Ok(catalog) => catalog,
        Err(unavailable) => return (GroupedView::default(), Some(unavailable.into())),
    };

    match relations {
        Some(RelationOutcome::Loaded(sets)) => (GroupedView::build(&catalog, Some(&sets)), None),
        Some(RelationOutcome::Unauthenticated) => (
            GroupedView::build(&catalog, None),
            Some(LoadError::SessionExpired),
        ),
        Some(RelationOutcome::Forbidden) => {
            (GroupedView::build(&catalog, None), Some(LoadError::Forbidden))
        }
        Some(RelationOutcome::TransientFailure(reason)) => (
            GroupedView::build(&catalog, None),
            Some(LoadError::RelationsUnavailable(reason)),
        ),
        None => (GroupedView::build(&catalog, None), Some(LoadError::SignedOut)),
    }
}
