//! HTTP boundary to the remote problem and relation store.
//!
//! `RemoteStore` is the seam the engine is written against; `HttpRemoteStore`
//! is the production implementation over the `/api/v1` REST routes.

use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Response, StatusCode};
use serde::Deserialize;
use thiserror::Error;

use crate::config::{normalize_base_url, normalize_text_option, ConfigError};
use crate::models::{Problem, ProblemId, RelationKind, UserProfile, UserRelationSets};

const HTTP_TIMEOUT_SECS: u64 = 15;

#[derive(Debug, Error)]
pub enum RemoteError {
    #[error("Invalid remote configuration: {0}")]
    InvalidConfiguration(#[from] ConfigError),
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Remote returned HTTP {status}: {message}")]
    Status { status: StatusCode, message: String },
    #[error("Malformed response: {0}")]
    Malformed(String),
}

impl RemoteError {
    /// HTTP status of a non-2xx response, if that is what failed.
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }
}

pub type RemoteResult<T> = Result<T, RemoteError>;

/// Remote operations the engine depends on.
///
/// `authorization` is a ready-to-send header value (see
/// [`crate::session::normalize`]).
#[allow(async_fn_in_trait)]
pub trait RemoteStore {
    async fn fetch_catalog(&self) -> RemoteResult<Vec<Problem>>;

    async fn fetch_relations(&self, authorization: &str) -> RemoteResult<UserRelationSets>;

    /// Identity fields from the same user details route as the relations.
    async fn fetch_profile(&self, authorization: &str) -> RemoteResult<UserProfile>;

    async fn add_relation(
        &self,
        authorization: &str,
        kind: RelationKind,
        problem_id: &ProblemId,
    ) -> RemoteResult<()>;

    async fn remove_relation(
        &self,
        authorization: &str,
        kind: RelationKind,
        problem_id: &ProblemId,
    ) -> RemoteResult<()>;
}

#[derive(Debug, Clone)]
pub struct HttpRemoteStore {
    api_url: String,
    client: reqwest::Client,
}

impl HttpRemoteStore {
    pub fn new(base_url: impl AsRef<str>) -> RemoteResult<Self> {
        let base_url = normalize_base_url("api_base_url", base_url.as_ref())?;
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            api_url: format!("{base_url}/api/v1"),
            client,
        })
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    fn relation_collection_url(&self, kind: RelationKind) -> String {
        format!("{}/{}/", self.api_url, kind.route_segment())
    }

    async fn fetch_user_details(&self, authorization: &str) -> RemoteResult<String> {
        let response = self
            .client
            .get(format!("{}/user/details", self.api_url))
            .header(AUTHORIZATION, authorization)
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        read_success_body(response).await
    }

    fn relation_item_url(&self, kind: RelationKind, problem_id: &ProblemId) -> String {
        format!(
            "{}/{}/{}",
            self.api_url,
            kind.route_segment(),
            urlencoding::encode(problem_id.as_str())
        )
    }
}

impl RemoteStore for HttpRemoteStore {
    async fn fetch_catalog(&self) -> RemoteResult<Vec<Problem>> {
        let response = self
            .client
            .get(format!("{}/problem/bulk", self.api_url))
            .header(ACCEPT, "application/json")
            .send()
            .await?;
        let body = read_success_body(response).await?;
        parse_catalog(&body)
    }

    async fn fetch_relations(&self, authorization: &str) -> RemoteResult<UserRelationSets> {
        let body = self.fetch_user_details(authorization).await?;
        parse_user_details(&body).map(UserDetails::into_relations)
    }

    async fn fetch_profile(&self, authorization: &str) -> RemoteResult<UserProfile> {
        let body = self.fetch_user_details(authorization).await?;
        parse_user_details(&body).map(UserDetails::into_profile)
    }

    async fn add_relation(
        &self,
        authorization: &str,
        kind: RelationKind,
        problem_id: &ProblemId,
    ) -> RemoteResult<()> {
        let response = self
            .client
            .post(self.relation_collection_url(kind))
            .header(AUTHORIZATION, authorization)
            .json(&serde_json::json!({ "problemId": problem_id }))
            .send()
            .await?;
        read_success_body(response).await.map(drop)
    }

    async fn remove_relation(
        &self,
        authorization: &str,
        kind: RelationKind,
        problem_id: &ProblemId,
    ) -> RemoteResult<()> {
        let response = self
            .client
            .delete(self.relation_item_url(kind, problem_id))
            .header(AUTHORIZATION, authorization)
            .send()
            .await?;
        read_success_body(response).await.map(drop)
    }
}

async fn read_success_body(response: Response) -> RemoteResult<String> {
    let status = response.status();
    let body = response.text().await?;
    if status.is_success() {
        Ok(body)
    } else {
        Err(RemoteError::Status {
            status,
            message: parse_api_error(status, &body),
        })
    }
}

pub(crate) fn parse_catalog(body: &str) -> RemoteResult<Vec<Problem>> {
    serde_json::from_str::<Vec<Problem>>(body)
        .map_err(|error| RemoteError::Malformed(format!("catalog payload: {error}")))
}

pub(crate) fn parse_user_details(body: &str) -> RemoteResult<UserDetails> {
    let payload = serde_json::from_str::<UserDetailsResponse>(body)
        .map_err(|error| RemoteError::Malformed(format!("user details payload: {error}")))?;
    Ok(payload.user.unwrap_or(payload.inline))
}

/// `/user/details` answers either `{ "user": {...} }` or the user object itself.
#[derive(Debug, Deserialize)]
struct UserDetailsResponse {
    #[serde(default)]
    user: Option<UserDetails>,
    #[serde(flatten)]
    inline: UserDetails,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct UserDetails {
    #[serde(default)]
    username: Option<String>,
    #[serde(default)]
    codeforces_handle: Option<String>,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    solved_problems: Option<Vec<ProblemId>>,
    #[serde(default)]
    bookmarked_problems: Option<Vec<ProblemId>>,
}

impl UserDetails {
    fn into_relations(self) -> UserRelationSets {
        UserRelationSets {
            solved: self.solved_problems.unwrap_or_default().into_iter().collect(),
            bookmarked: self
                .bookmarked_problems
                .unwrap_or_default()
                .into_iter()
                .collect(),
        }
    }

    fn into_profile(self) -> UserProfile {
        UserProfile {
            username: normalize_text_option(self.username),
            codeforces_handle: normalize_text_option(self.codeforces_handle),
            email: normalize_text_option(self.email),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
    error: Option<String>,
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        if let Some(message) = payload.message.or(payload.error) {
            return compact_text(&message);
        }
    }

    let trimmed = compact_text(body);
    if trimmed.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    } else {
        trimmed
    }
}

/// Truncate text to at most 180 characters for error messages.
pub fn compact_text(value: &str) -> String {
    value.trim().chars().take(180).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn ids(values: &[&str]) -> std::collections::HashSet<ProblemId> {
        values.iter().copied().map(ProblemId::from).collect()
    }

    #[test]
    fn new_rejects_invalid_base_url() {
        assert!(matches!(
            HttpRemoteStore::new("example.com"),
            Err(RemoteError::InvalidConfiguration(_))
        ));
        assert!(HttpRemoteStore::new("").is_err());
    }

    #[test]
    fn routes_are_built_under_api_prefix() {
        let store = HttpRemoteStore::new("https://api.example.com/").unwrap();
        assert_eq!(store.api_url(), "https://api.example.com/api/v1");
        assert_eq!(
            store.relation_collection_url(RelationKind::Solved),
            "https://api.example.com/api/v1/solve/"
        );
        assert_eq!(
            store.relation_item_url(RelationKind::Bookmarked, &ProblemId::from("a/b")),
            "https://api.example.com/api/v1/bookmark/a%2Fb"
        );
    }

    #[test]
    fn user_details_accepts_wrapped_payload() {
        let sets = parse_user_details(
            r#"{"user":{"username":"u","solvedProblems":["a","b"],"bookmarkedProblems":["c"]}}"#,
        )
        .unwrap()
        .into_relations();
        assert_eq!(sets.solved, ids(&["a", "b"]));
        assert_eq!(sets.bookmarked, ids(&["c"]));
    }

    #[test]
    fn user_details_accepts_bare_payload_and_missing_lists() {
        let sets = parse_user_details(r#"{"solvedProblems":["a"]}"#)
            .unwrap()
            .into_relations();
        assert_eq!(sets.solved, ids(&["a"]));
        assert!(sets.bookmarked.is_empty());
    }

    #[test]
    fn user_details_carry_profile_fields() {
        let profile = parse_user_details(
            r#"{"user":{"username":"ana","codeforcesHandle":"ana_cf","email":"  ","solvedProblems":[]}}"#,
        )
        .unwrap()
        .into_profile();
        assert_eq!(
            profile,
            UserProfile {
                username: Some("ana".to_string()),
                codeforces_handle: Some("ana_cf".to_string()),
                email: None,
            }
        );
    }

    #[test]
    fn malformed_bodies_are_reported() {
        assert!(matches!(
            parse_catalog("<html>oops</html>"),
            Err(RemoteError::Malformed(_))
        ));
        assert!(matches!(
            parse_user_details("[]"),
            Err(RemoteError::Malformed(_))
        ));
    }

    #[test]
    fn api_error_prefers_message_field() {
        assert_eq!(
            parse_api_error(StatusCode::BAD_REQUEST, r#"{"message":"Invalid problem"}"#),
            "Invalid problem"
        );
        assert_eq!(
            parse_api_error(StatusCode::BAD_GATEWAY, "   "),
            "Bad Gateway"
        );
    }

    #[test]
    fn status_is_exposed_for_non_success_errors() {
        let error = RemoteError::Status {
            status: StatusCode::FORBIDDEN,
            message: "nope".to_string(),
        };
        assert_eq!(error.status(), Some(StatusCode::FORBIDDEN));
        assert_eq!(error.to_string(), "Remote returned HTTP 403 Forbidden: nope");
        assert_eq!(RemoteError::Malformed("x".to_string()).status(), None);
    }
}
