//! Error types for solvetrack-core

use thiserror::Error;

use crate::catalog::CatalogUnavailable;
use crate::config::ConfigError;
use crate::profile::ProfileError;
use crate::remote::RemoteError;
use crate::session::AuthError;
use crate::state::LoadError;
use crate::toggle::ToggleError;

/// Result type alias using solvetrack-core's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in solvetrack-core operations
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Credential storage or validation error
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// Remote store error
    #[error(transparent)]
    Remote(#[from] RemoteError),

    /// Catalog could not be loaded
    #[error(transparent)]
    Catalog(#[from] CatalogUnavailable),

    /// Load phase failed
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Profile lookup failed
    #[error(transparent)]
    Profile(#[from] ProfileError),

    /// Toggle was refused
    #[error(transparent)]
    Toggle(#[from] ToggleError),
}
