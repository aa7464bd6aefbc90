use std::io;

use solvetrack_core::config::ConfigError;
use solvetrack_core::profile::ProfileError;
use solvetrack_core::remote::RemoteError;
use solvetrack_core::session::AuthError;
use solvetrack_core::state::LoadError;
use solvetrack_core::toggle::ToggleError;
use solvetrack_core::RelationKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Core(#[from] solvetrack_core::Error),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    #[error("Problem ID cannot be empty")]
    EmptyProblemId,
    #[error("No access token provided")]
    EmptyToken,
    #[error("No rating group {0} in the problem list")]
    UnknownRating(u32),
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Remote {kind} update failed: {reason}")]
    ToggleFailed { kind: RelationKind, reason: String },
}

macro_rules! impl_from_core {
    ($($source:ty),+ $(,)?) => {
        $(
            impl From<$source> for CliError {
                fn from(error: $source) -> Self {
                    Self::Core(error.into())
                }
            }
        )+
    };
}

impl_from_core!(
    ConfigError,
    AuthError,
    RemoteError,
    LoadError,
    ProfileError,
    ToggleError,
);
