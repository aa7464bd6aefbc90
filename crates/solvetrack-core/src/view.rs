//! Grouped, capped, annotated view of the catalog.

use std::collections::BTreeMap;

use crate::models::{Problem, ProblemId, RelationKind, RelationState, UserRelationSets};

/// Maximum number of problems kept per rating bucket.
pub const MAX_PER_RATING: usize = 5;

/// A catalog problem plus the signed-in user's relation cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnnotatedProblem {
    pub problem: Problem,
    pub solved: RelationState,
    pub bookmarked: RelationState,
}

impl AnnotatedProblem {
    fn annotate(problem: Problem, relations: Option<&UserRelationSets>) -> Self {
        let settled = |kind| {
            RelationState::Settled(relations.is_some_and(|sets| sets.contains(kind, &problem.id)))
        };
        let solved = settled(RelationKind::Solved);
        let bookmarked = settled(RelationKind::Bookmarked);
        Self {
            problem,
            solved,
            bookmarked,
        }
    }

    pub const fn id(&self) -> &ProblemId {
        &self.problem.id
    }

    pub const fn relation(&self, kind: RelationKind) -> RelationState {
        match kind {
            RelationKind::Solved => self.solved,
            RelationKind::Bookmarked => self.bookmarked,
        }
    }

    pub fn relation_mut(&mut self, kind: RelationKind) -> &mut RelationState {
        match kind {
            RelationKind::Solved => &mut self.solved,
            RelationKind::Bookmarked => &mut self.bookmarked,
        }
    }

    pub const fn is_solved(&self) -> bool {
        self.solved.value()
    }

    pub const fn is_bookmarked(&self) -> bool {
        self.bookmarked.value()
    }
}

/// Rating -> bucket of at most [`MAX_PER_RATING`] problems, ascending by rating.
///
/// Built once per load. Later writes only flip single relation cells in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedView {
    groups: BTreeMap<u32, Vec<AnnotatedProblem>>,
}

impl GroupedView {
    /// Single pass over `catalog` in order. Unrated problems are skipped and
    /// full buckets ignore later entries. Without `relations` every cell
    /// settles to `false`.
    pub fn build(catalog: &[Problem], relations: Option<&UserRelationSets>) -> Self {
        let mut groups: BTreeMap<u32, Vec<AnnotatedProblem>> = BTreeMap::new();
        for problem in catalog {
            let Some(rating) = problem.bucket_rating() else {
                continue;
            };
            let bucket = groups.entry(rating).or_default();
            if bucket.len() < MAX_PER_RATING {
                bucket.push(AnnotatedProblem::annotate(problem.clone(), relations));
            }
        }
        Self { groups }
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Number of problems across all buckets.
    pub fn problem_count(&self) -> usize {
        self.groups.values().map(Vec::len).sum()
    }

    pub fn ratings(&self) -> impl Iterator<Item = u32> + '_ {
        self.groups.keys().copied()
    }

    pub fn bucket(&self, rating: u32) -> Option<&[AnnotatedProblem]> {
        self.groups.get(&rating).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (u32, &[AnnotatedProblem])> + '_ {
        self.groups
            .iter()
            .map(|(rating, bucket)| (*rating, bucket.as_slice()))
    }

    pub fn find(&self, id: &ProblemId) -> Option<&AnnotatedProblem> {
        self.groups.values().flatten().find(|entry| entry.id() == id)
    }

    pub(crate) fn find_mut(&mut self, id: &ProblemId) -> Option<&mut AnnotatedProblem> {
        self.groups
            .values_mut()
            .flatten()
            .find(|entry| entry.id() == id)
    }
}

/// Expanded/collapsed flag per rating. Unknown ratings are collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpansionState {
    expanded: BTreeMap<u32, bool>,
}

impl ExpansionState {
    pub fn is_expanded(&self, rating: u32) -> bool {
        self.expanded.get(&rating).copied().unwrap_or(false)
    }

    /// Flip one rating and return its new state.
    pub fn toggle(&mut self, rating: u32) -> bool {
        let flag = self.expanded.entry(rating).or_insert(false);
        *flag = !*flag;
        *flag
    }

    pub fn set(&mut self, rating: u32, expanded: bool) {
        self.expanded.insert(rating, expanded);
    }
}
