//! Client configuration.
//!
//! A `ClientConfig` names the remote problem store and the site used to build
//! external problem links. Front ends resolve it from flags, environment, or a
//! config file and hand the normalized result to the core.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Link base used when a config does not override it.
pub const DEFAULT_PROBLEM_LINK_BASE: &str = "https://codeforces.com";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("API base URL is not configured")]
    MissingBaseUrl,
    #[error("{field} must include http:// or https:// (got '{value}')")]
    InvalidUrl { field: &'static str, value: String },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub problem_link_base: Option<String>,
}

impl ClientConfig {
    /// Returns the validated API base URL without a trailing slash.
    pub fn api_base_url(&self) -> Result<String, ConfigError> {
        let raw = normalize_text_option(self.api_base_url.clone())
            .ok_or(ConfigError::MissingBaseUrl)?;
        normalize_base_url("api_base_url", &raw)
    }

    /// Returns the link base for external problem pages.
    ///
    /// Falls back to [`DEFAULT_PROBLEM_LINK_BASE`] when unset.
    pub fn problem_link_base(&self) -> Result<String, ConfigError> {
        match normalize_text_option(self.problem_link_base.clone()) {
            Some(raw) => normalize_base_url("problem_link_base", &raw),
            None => Ok(DEFAULT_PROBLEM_LINK_BASE.to_string()),
        }
    }

    /// Layers `other` over `self`, field by field; set values in `other` win.
    #[must_use]
    pub fn overlay(self, other: Self) -> Self {
        Self {
            api_base_url: normalize_text_option(other.api_base_url)
                .or_else(|| normalize_text_option(self.api_base_url)),
            problem_link_base: normalize_text_option(other.problem_link_base)
                .or_else(|| normalize_text_option(self.problem_link_base)),
        }
    }
}

/// Trim whitespace and map blank strings to `None`.
pub fn normalize_text_option(value: Option<String>) -> Option<String> {
    let value = value?;
    let value = value.trim();
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

pub fn is_http_url(value: &str) -> bool {
    value.starts_with("http://") || value.starts_with("https://")
}

pub fn normalize_base_url(field: &'static str, raw: &str) -> Result<String, ConfigError> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigError::MissingBaseUrl);
    }
    if !is_http_url(trimmed) {
        return Err(ConfigError::InvalidUrl {
            field,
            value: trimmed.to_string(),
        });
    }
    Ok(trimmed.to_string())
}
