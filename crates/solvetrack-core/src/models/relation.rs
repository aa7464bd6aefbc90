//! Per-user relations between the signed-in user and catalog problems.

use std::collections::HashSet;
use std::fmt;

use serde::{Serialize, Serializer};

use super::ProblemId;

/// The two relations a user can hold against a problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RelationKind {
    Solved,
    Bookmarked,
}

impl RelationKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Solved => "solved",
            Self::Bookmarked => "bookmarked",
        }
    }

    /// Path segment of the remote collection holding this relation.
    #[must_use]
    pub const fn route_segment(self) -> &'static str {
        match self {
            Self::Solved => "solve",
            Self::Bookmarked => "bookmark",
        }
    }

    /// Message shown to the user when a toggle of this kind is reverted.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Solved => "Failed to update solved status.",
            Self::Bookmarked => "Failed to update bookmark status.",
        }
    }
}

impl fmt::Display for RelationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Sync state of one (problem, relation) pair.
///
/// `Settled(v)` -> `Pending { optimistic: !v, previous: v }` -> either
/// `Settled(optimistic)` on commit or `Settled(previous)` on rollback.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationState {
    Settled(bool),
    Pending { optimistic: bool, previous: bool },
}

impl Default for RelationState {
    fn default() -> Self {
        Self::Settled(false)
    }
}

impl RelationState {
    /// Value shown to readers; a pending pair shows its optimistic value.
    #[must_use]
    pub const fn value(self) -> bool {
        match self {
            Self::Settled(value) | Self::Pending { optimistic: value, .. } => value,
        }
    }

    /// Start an optimistic flip away from the settled value `expected`.
    pub const fn begin(self, expected: bool) -> Result<Self, BeginRefused> {
        match self {
            Self::Settled(previous) if previous == expected => Ok(Self::Pending {
                optimistic: !previous,
                previous,
            }),
            Self::Settled(actual) => Err(BeginRefused::Stale { actual }),
            Self::Pending { .. } => Err(BeginRefused::Pending),
        }
    }

    #[must_use]
    pub const fn commit(self) -> Self {
        match self {
            Self::Pending { optimistic, .. } => Self::Settled(optimistic),
            settled @ Self::Settled(_) => settled,
        }
    }

    /// Restore the value captured when the write began.
    #[must_use]
    pub const fn rollback(self) -> Self {
        match self {
            Self::Pending { previous, .. } => Self::Settled(previous),
            settled @ Self::Settled(_) => settled,
        }
    }
}

/// Why a pair could not start a new write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BeginRefused {
    Pending,
    /// The caller's view of the pair is out of date.
    Stale { actual: bool },
}

impl Serialize for RelationState {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bool(self.value())
    }
}

/// Relation sets of the signed-in user, replaced wholesale on every fetch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserRelationSets {
    pub solved: HashSet<ProblemId>,
    pub bookmarked: HashSet<ProblemId>,
}

impl UserRelationSets {
    #[must_use]
    pub fn contains(&self, kind: RelationKind, id: &ProblemId) -> bool {
        match kind {
            RelationKind::Solved => self.solved.contains(id),
            RelationKind::Bookmarked => self.bookmarked.contains(id),
        }
    }
}
