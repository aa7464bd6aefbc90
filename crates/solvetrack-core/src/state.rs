//! Shared board read by the presentation layer.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use thiserror::Error;

use crate::catalog::CatalogUnavailable;
use crate::models::{ProblemId, RelationKind};
use crate::view::{ExpansionState, GroupedView};

pub type SharedBoard = Rc<RefCell<ProblemBoard>>;
pub type WeakBoard = Weak<RefCell<ProblemBoard>>;

/// Load-phase problems, at most one per load.
///
/// `CatalogUnavailable` is fatal for the load; the others still render the
/// catalog without personalized state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoadError {
    #[error(transparent)]
    CatalogUnavailable(#[from] CatalogUnavailable),
    #[error("Please log in to track solved and bookmarked problems.")]
    SignedOut,
    #[error("Session expired. Please log in again.")]
    SessionExpired,
    #[error("Access denied. Please check your permissions.")]
    Forbidden,
    #[error("Could not load your solved and bookmarked problems: {0}")]
    RelationsUnavailable(String),
}

impl LoadError {
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::CatalogUnavailable(_))
    }

    pub const fn is_unauthenticated(&self) -> bool {
        matches!(self, Self::SignedOut | Self::SessionExpired)
    }
}

/// User-visible notification raised when a toggle is reverted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub kind: RelationKind,
    pub problem_id: ProblemId,
    pub message: String,
}

#[derive(Debug, Default)]
pub struct ProblemBoard {
    pub view: GroupedView,
    pub expansion: ExpansionState,
    pub is_loading: bool,
    pub error: Option<LoadError>,
    notices: Vec<Notice>,
}

impl ProblemBoard {
    pub fn shared() -> SharedBoard {
        Rc::new(RefCell::new(Self::default()))
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    pub(crate) fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }
}
