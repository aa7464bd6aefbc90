//! Persistent CLI profile configuration.
//!
//! Each profile is a `ClientConfig`. The API base URL resolves from the
//! `--api-url` flag, then `SOLVETRACK_API_URL`, then the active profile.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use solvetrack_core::config::{normalize_text_option, ClientConfig};

use crate::error::CliError;

const CONFIG_FILE_NAME: &str = "cli-config.json";
const DEFAULT_PROFILE: &str = "default";
pub const API_URL_ENV: &str = "SOLVETRACK_API_URL";
pub const PROFILE_ENV: &str = "SOLVETRACK_PROFILE";

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct CliProfilesConfig {
    #[serde(default = "default_config_version")]
    pub version: u32,
    #[serde(default)]
    pub active_profile: Option<String>,
    #[serde(default)]
    pub profiles: BTreeMap<String, ClientConfig>,
}

const fn default_config_version() -> u32 {
    1
}

pub fn default_config_path() -> Result<PathBuf, CliError> {
    dirs::config_dir()
        .map(|dir| dir.join("solvetrack").join(CONFIG_FILE_NAME))
        .ok_or_else(|| CliError::Config("Failed to resolve CLI config directory".to_string()))
}

impl CliProfilesConfig {
    pub fn load() -> Result<Self, CliError> {
        Self::load_from_path(&default_config_path()?)
    }

    pub fn load_from_path(path: &Path) -> Result<Self, CliError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = std::fs::read_to_string(path).map_err(|error| {
            CliError::Config(format!(
                "Failed to read config at {}: {error}",
                path.display()
            ))
        })?;
        let mut config = serde_json::from_str::<Self>(&raw).map_err(|error| {
            CliError::Config(format!(
                "Failed to parse config at {}: {error}",
                path.display()
            ))
        })?;
        config.normalize();
        Ok(config)
    }

    pub fn save(&self) -> Result<PathBuf, CliError> {
        let path = default_config_path()?;
        self.save_to_path(&path)?;
        Ok(path)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), CliError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let mut normalized = self.clone();
        normalized.normalize();
        let serialized = serde_json::to_string_pretty(&normalized)?;
        std::fs::write(path, serialized)?;
        Ok(())
    }

    pub fn resolve_profile_name(&self, explicit: Option<&str>) -> String {
        normalize_text_option(explicit.map(ToString::to_string))
            .or_else(|| normalize_text_option(std::env::var(PROFILE_ENV).ok()))
            .or_else(|| normalize_text_option(self.active_profile.clone()))
            .unwrap_or_else(|| DEFAULT_PROFILE.to_string())
    }

    /// Profile settings layered under the environment and the flag override.
    pub fn resolve_client_config(&self, profile_name: &str, api_url_flag: Option<String>) -> ClientConfig {
        let from_file = self.profiles.get(profile_name).cloned().unwrap_or_default();
        let from_env = ClientConfig {
            api_base_url: std::env::var(API_URL_ENV).ok(),
            problem_link_base: None,
        };
        let from_flag = ClientConfig {
            api_base_url: api_url_flag,
            problem_link_base: None,
        };
        from_file.overlay(from_env).overlay(from_flag)
    }

    pub fn profile_mut_or_default(&mut self, name: &str) -> &mut ClientConfig {
        self.profiles.entry(name.to_string()).or_default()
    }

    fn normalize(&mut self) {
        self.active_profile = normalize_text_option(self.active_profile.take());
        for profile in self.profiles.values_mut() {
            *profile = ClientConfig::default().overlay(std::mem::take(profile));
        }
    }
}

/// Trim pasted token input; blank input yields `None`.
pub fn normalize_token_input(raw: &str) -> Option<String> {
    normalize_text_option(Some(raw.to_string()))
}
