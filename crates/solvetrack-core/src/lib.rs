//! solvetrack-core - Core library for solvetrack
//!
//! Merges the global problem catalog with the signed-in user's relation sets
//! into a rating-bucketed view, and applies solved/bookmarked toggles
//! optimistically against a remote store with rollback on failure.

pub mod catalog;
pub mod config;
pub mod error;
pub mod models;
pub mod problemset;
pub mod profile;
pub mod relations;
pub mod remote;
pub mod session;
pub mod state;
pub mod toggle;
pub mod view;

#[cfg(test)]
mod testing;

pub use error::{Error, Result};
pub use models::{Problem, ProblemId, RelationKind, RelationState, UserProfile, UserRelationSets};
pub use problemset::Problemset;
pub use session::{Credential, CredentialStore, SessionGuard};
