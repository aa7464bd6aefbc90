//! Data models for solvetrack

mod problem;
mod profile;
mod relation;

pub use problem::{Problem, ProblemId};
pub use profile::UserProfile;
pub use relation::{BeginRefused, RelationKind, RelationState, UserRelationSets};
