//! Problem model

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Identifier assigned to a problem by the remote store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProblemId(String);

impl ProblemId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProblemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ProblemId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for ProblemId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// A catalog entry. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Problem {
    #[serde(rename = "_id")]
    pub id: ProblemId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    /// Difficulty tier. `0` on the wire means unrated.
    #[serde(default)]
    pub rating: Option<u32>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, rename = "contestId")]
    pub contest_id: Option<u32>,
    #[serde(default)]
    pub index: Option<String>,
}

impl Problem {
    /// Rating used for grouping; unrated and zero-rated problems have none.
    #[must_use]
    pub fn bucket_rating(&self) -> Option<u32> {
        self.rating.filter(|rating| *rating > 0)
    }

    /// External problem page, when the contest reference is complete.
    #[must_use]
    pub fn external_url(&self, link_base: &str) -> Option<String> {
        let contest_id = self.contest_id?;
        let index = self.index.as_deref().map(str::trim).filter(|i| !i.is_empty())?;
        Some(format!(
            "{}/contest/{contest_id}/problem/{index}",
            link_base.trim_end_matches('/')
        ))
    }
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
