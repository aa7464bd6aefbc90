//! Catalog fetch: the global, user-independent problem list.

use thiserror::Error;

use crate::models::Problem;
use crate::remote::RemoteStore;

const EMPTY_CATALOG_REASON: &str = "No problems found in database";

/// The catalog could not be used for this load. Fatal to the load phase.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Problem catalog unavailable: {reason}")]
pub struct CatalogUnavailable {
    pub reason: String,
}

pub struct CatalogFetcher<'a, R> {
    remote: &'a R,
}

impl<'a, R: RemoteStore> CatalogFetcher<'a, R> {
    pub const fn new(remote: &'a R) -> Self {
        Self { remote }
    }

    /// Unauthenticated fetch. Empty, malformed, and failed responses all
    /// surface as [`CatalogUnavailable`]; nothing is retried.
    pub async fn fetch_catalog(&self) -> Result<Vec<Problem>, CatalogUnavailable> {
        tracing::debug!("Fetching problem catalog");
        let catalog = self.remote.fetch_catalog().await.map_err(|error| {
            tracing::warn!("Catalog fetch failed: {}", error);
            CatalogUnavailable {
                reason: error.to_string(),
            }
        })?;

        if catalog.is_empty() {
            tracing::warn!("Catalog fetch returned no problems");
            return Err(CatalogUnavailable {
                reason: EMPTY_CATALOG_REASON.to_string(),
            });
        }

        tracing::debug!(count = catalog.len(), "Fetched problem catalog");
        Ok(catalog)
    }
}
