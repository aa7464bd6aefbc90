//! Optimistic relation toggles.
//!
//! A toggle flips one relation cell on the board before the remote write is
//! issued, then commits or rolls back that cell once the write settles. Both
//! relation kinds go through the same path.

use thiserror::Error;

use crate::models::{BeginRefused, ProblemId, RelationKind};
use crate::remote::RemoteStore;
use crate::session::{CredentialStore, SessionGuard};
use crate::state::{Notice, WeakBoard};

/// Toggles refused before any state change or network call.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ToggleError {
    #[error("Please log in")]
    RequiresAuth,
    #[error("Problem {0} is not on the board")]
    UnknownProblem(ProblemId),
    #[error("A {kind} update for problem {problem_id} is still in flight")]
    AlreadyPending {
        kind: RelationKind,
        problem_id: ProblemId,
    },
    #[error("Problem {problem_id} changed since it was read ({kind} is now {actual})")]
    StaleValue {
        kind: RelationKind,
        problem_id: ProblemId,
        actual: bool,
    },
}

/// How a started toggle settled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToggleOutcome {
    /// The remote accepted the write; the optimistic value stays.
    Committed { value: bool },
    /// The remote write failed; the captured prior value was restored and a
    /// notice raised.
    RolledBack { restored: bool, reason: String },
    /// The board (or the entry) went away before the write settled.
    Discarded,
}

pub struct ToggleController<'a, R, S: CredentialStore> {
    remote: &'a R,
    guard: &'a SessionGuard<S>,
}

impl<'a, R: RemoteStore, S: CredentialStore> ToggleController<'a, R, S> {
    pub const fn new(remote: &'a R, guard: &'a SessionGuard<S>) -> Self {
        Self { remote, guard }
    }

    /// Toggle `kind` for `problem_id` away from `current_value`.
    ///
    /// `current_value` must match the settled cell; a mismatch is refused as
    /// `StaleValue` with no state change. Exactly one remote call is made: a
    /// removal when the captured value is `true`, an addition otherwise. The
    /// board is held weakly across the call, so dropping it mid-flight
    /// discards the result.
    pub async fn toggle(
        &self,
        board: &WeakBoard,
        kind: RelationKind,
        problem_id: &ProblemId,
        current_value: bool,
    ) -> Result<ToggleOutcome, ToggleError> {
        let Some(credential) = self.guard.credential() else {
            return Err(ToggleError::RequiresAuth);
        };
        let Some(shared) = board.upgrade() else {
            return Ok(ToggleOutcome::Discarded);
        };

        {
            let mut state = shared.borrow_mut();
            let entry = state
                .view
                .find_mut(problem_id)
                .ok_or_else(|| ToggleError::UnknownProblem(problem_id.clone()))?;
            let cell = entry.relation_mut(kind);
            *cell = cell.begin(current_value).map_err(|refused| match refused {
                BeginRefused::Pending => ToggleError::AlreadyPending {
                    kind,
                    problem_id: problem_id.clone(),
                },
                BeginRefused::Stale { actual } => ToggleError::StaleValue {
                    kind,
                    problem_id: problem_id.clone(),
                    actual,
                },
            })?;
        }
        drop(shared);

        tracing::debug!(%problem_id, %kind, value = !current_value, "Optimistic toggle applied");
        let authorization = self.guard.authorization_header(&credential);
        let result = if current_value {
            self.remote
                .remove_relation(&authorization, kind, problem_id)
                .await
        } else {
            self.remote
                .add_relation(&authorization, kind, problem_id)
                .await
        };

        let Some(shared) = board.upgrade() else {
            tracing::debug!(%problem_id, %kind, "Board dropped before toggle settled");
            return Ok(ToggleOutcome::Discarded);
        };
        let mut state = shared.borrow_mut();
        let Some(entry) = state.view.find_mut(problem_id) else {
            tracing::debug!(%problem_id, %kind, "Entry left the board before toggle settled");
            return Ok(ToggleOutcome::Discarded);
        };
        let cell = entry.relation_mut(kind);

        match result {
            Ok(()) => {
                *cell = cell.commit();
                let value = cell.value();
                tracing::debug!(%problem_id, %kind, value, "Toggle committed");
                Ok(ToggleOutcome::Committed { value })
            }
            Err(error) => {
                *cell = cell.rollback();
                let restored = cell.value();
                if let Some(status) = error.status() {
                    self.guard.observe(status);
                }
                tracing::warn!(%problem_id, %kind, "Toggle failed, reverted: {}", error);
                state.push_notice(Notice {
                    kind,
                    problem_id: problem_id.clone(),
                    message: kind.failure_message().to_string(),
                });
                Ok(ToggleOutcome::RolledBack {
                    restored,
                    reason: error.to_string(),
                })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use pretty_assertions::assert_eq;
    use reqwest::StatusCode;

    use super::*;
    use crate::models::RelationState;
    use crate::session::MemoryCredentialStore;
    use crate::state::{ProblemBoard, SharedBoard};
    use crate::testing::{problem, signed_in_guard, Call, FakeRemote};
    use crate::view::GroupedView;

    fn board_with(ids: &[&str]) -> SharedBoard {
        let catalog: Vec<_> = ids.iter().map(|id| problem(id, Some(800))).collect();
        let board = ProblemBoard::shared();
        board.borrow_mut().view = GroupedView::build(&catalog, None);
        board
    }

    fn cell(board: &SharedBoard, id: &str, kind: RelationKind) -> RelationState {
        board
            .borrow()
            .view
            .find(&ProblemId::from(id))
            .unwrap()
            .relation(kind)
    }

    #[tokio::test(flavor = "current_thread")]
    async fn optimistic_value_is_visible_before_remote_call() {
        let board = board_with(&["A"]);
        let remote = FakeRemote::new(Vec::new());
        remote.watch(&board);
        let guard = signed_in_guard("tok");

        let outcome = ToggleController::new(&remote, &guard)
            .toggle(
                &Rc::downgrade(&board),
                RelationKind::Solved,
                &ProblemId::from("A"),
                false,
            )
            .await
            .unwrap();

        assert_eq!(remote.seen_during_mutation(), vec![Some(true)]);
        assert_eq!(outcome, ToggleOutcome::Committed { value: true });
        assert_eq!(
            cell(&board, "A", RelationKind::Solved),
            RelationState::Settled(true)
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn failure_restores_prior_value_and_raises_one_notice() {
        let board = board_with(&["A"]);
        let remote = FakeRemote::new(Vec::new());
        remote.watch(&board);
        remote.fail_mutations(StatusCode::INTERNAL_SERVER_ERROR);
        let guard = signed_in_guard("tok");

        let outcome = ToggleController::new(&remote, &guard)
            .toggle(
                &Rc::downgrade(&board),
                RelationKind::Solved,
                &ProblemId::from("A"),
                false,
            )
            .await
            .unwrap();

        assert_eq!(remote.seen_during_mutation(), vec![Some(true)]);
        assert!(matches!(
            outcome,
            ToggleOutcome::RolledBack { restored: false, .. }
        ));
        assert_eq!(
            cell(&board, "A", RelationKind::Solved),
            RelationState::Settled(false)
        );
        let notices = board.borrow_mut().take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].kind, RelationKind::Solved);
        assert_eq!(notices[0].message, "Failed to update solved status.");
        assert!(guard.is_signed_in());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn current_value_selects_exactly_one_call() {
        let board = board_with(&["A"]);
        let remote = FakeRemote::new(Vec::new());
        let guard = signed_in_guard("tok");
        let controller = ToggleController::new(&remote, &guard);
        let weak = Rc::downgrade(&board);
        let id = ProblemId::from("A");

        controller
            .toggle(&weak, RelationKind::Bookmarked, &id, false)
            .await
            .unwrap();
        controller
            .toggle(&weak, RelationKind::Bookmarked, &id, true)
            .await
            .unwrap();

        assert_eq!(
            remote.mutations(),
            vec![
                Call::Add(RelationKind::Bookmarked, id.clone()),
                Call::Remove(RelationKind::Bookmarked, id),
            ]
        );
        assert_eq!(
            cell(&board, "A", RelationKind::Bookmarked),
            RelationState::Settled(false)
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn out_of_date_value_is_refused_without_call() {
        let board = board_with(&["A"]);
        board
            .borrow_mut()
            .view
            .find_mut(&ProblemId::from("A"))
            .unwrap()
            .solved = RelationState::Settled(true);
        let remote = FakeRemote::new(Vec::new());
        let guard = signed_in_guard("tok");

        let error = ToggleController::new(&remote, &guard)
            .toggle(
                &Rc::downgrade(&board),
                RelationKind::Solved,
                &ProblemId::from("A"),
                false,
            )
            .await
            .unwrap_err();

        assert_eq!(
            error,
            ToggleError::StaleValue {
                kind: RelationKind::Solved,
                problem_id: ProblemId::from("A"),
                actual: true,
            }
        );
        assert!(remote.mutations().is_empty());
        assert_eq!(
            cell(&board, "A", RelationKind::Solved),
            RelationState::Settled(true)
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn signed_out_toggle_is_rejected_without_side_effects() {
        let board = board_with(&["A"]);
        let remote = FakeRemote::new(Vec::new());
        let guard = SessionGuard::new(MemoryCredentialStore::default());

        let error = ToggleController::new(&remote, &guard)
            .toggle(
                &Rc::downgrade(&board),
                RelationKind::Solved,
                &ProblemId::from("A"),
                false,
            )
            .await
            .unwrap_err();

        assert_eq!(error, ToggleError::RequiresAuth);
        assert!(remote.mutations().is_empty());
        assert_eq!(
            cell(&board, "A", RelationKind::Solved),
            RelationState::Settled(false)
        );
    }

    #[tokio::test(flavor = "current_thread")]
    async fn unknown_problem_makes_no_call() {
        let board = board_with(&["A"]);
        let remote = FakeRemote::new(Vec::new());
        let guard = signed_in_guard("tok");

        let error = ToggleController::new(&remote, &guard)
            .toggle(
                &Rc::downgrade(&board),
                RelationKind::Solved,
                &ProblemId::from("missing"),
                false,
            )
            .await
            .unwrap_err();

        assert_eq!(error, ToggleError::UnknownProblem(ProblemId::from("missing")));
        assert!(remote.mutations().is_empty());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn second_toggle_on_pending_pair_is_refused() {
        let board = board_with(&["A"]);
        let remote = FakeRemote::new(Vec::new());
        remote.yield_on_mutation();
        let guard = signed_in_guard("tok");
        let controller = ToggleController::new(&remote, &guard);
        let weak = Rc::downgrade(&board);
        let id = ProblemId::from("A");

        let (first, second) = tokio::join!(
            controller.toggle(&weak, RelationKind::Solved, &id, false),
            controller.toggle(&weak, RelationKind::Solved, &id, true),
        );

        assert_eq!(first.unwrap(), ToggleOutcome::Committed { value: true });
        assert!(matches!(
            second.unwrap_err(),
            ToggleError::AlreadyPending { .. }
        ));
        assert_eq!(remote.mutations().len(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn pairs_settle_independently() {
        let board = board_with(&["A", "B"]);
        let remote = FakeRemote::new(Vec::new());
        remote.yield_on_mutation();
        let guard = signed_in_guard("tok");
        let controller = ToggleController::new(&remote, &guard);
        let weak = Rc::downgrade(&board);
        let a = ProblemId::from("A");
        let b = ProblemId::from("B");

        let (solved_a, bookmarked_a, solved_b) = tokio::join!(
            controller.toggle(&weak, RelationKind::Solved, &a, false),
            controller.toggle(&weak, RelationKind::Bookmarked, &a, false),
            controller.toggle(&weak, RelationKind::Solved, &b, false),
        );

        assert!(solved_a.is_ok() && bookmarked_a.is_ok() && solved_b.is_ok());
        assert!(board.borrow().view.find(&a).unwrap().is_solved());
        assert!(board.borrow().view.find(&a).unwrap().is_bookmarked());
        assert!(board.borrow().view.find(&b).unwrap().is_solved());
        assert!(!board.borrow().view.find(&b).unwrap().is_bookmarked());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn dropped_board_discards_result() {
        let board = board_with(&["A"]);
        let weak = Rc::downgrade(&board);
        let remote = FakeRemote::new(Vec::new());
        remote.yield_on_mutation();
        let guard = signed_in_guard("tok");
        let controller = ToggleController::new(&remote, &guard);
        let id = ProblemId::from("A");

        let (outcome, ()) = tokio::join!(
            controller.toggle(&weak, RelationKind::Solved, &id, false),
            async move { drop(board) },
        );

        assert_eq!(outcome.unwrap(), ToggleOutcome::Discarded);
        assert_eq!(remote.mutations().len(), 1);
    }

    #[tokio::test(flavor = "current_thread")]
    async fn unauthorized_write_reverts_and_signs_out() {
        let board = board_with(&["A"]);
        let remote = FakeRemote::new(Vec::new());
        remote.fail_mutations(StatusCode::UNAUTHORIZED);
        let guard = signed_in_guard("tok");

        let outcome = ToggleController::new(&remote, &guard)
            .toggle(
                &Rc::downgrade(&board),
                RelationKind::Bookmarked,
                &ProblemId::from("A"),
                false,
            )
            .await
            .unwrap();

        assert!(matches!(outcome, ToggleOutcome::RolledBack { restored: false, .. }));
        assert!(!guard.is_signed_in());
        assert_eq!(
            board.borrow().notices()[0].message,
            "Failed to update bookmark status."
        );
    }
}
