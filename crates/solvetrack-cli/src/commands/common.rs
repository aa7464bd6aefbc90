use serde::Serialize;
use solvetrack_core::config::ClientConfig;
use solvetrack_core::remote::HttpRemoteStore;
use solvetrack_core::state::{Notice, ProblemBoard};
use solvetrack_core::toggle::ToggleOutcome;
use solvetrack_core::view::AnnotatedProblem;
use solvetrack_core::{Problemset, ProblemId, RelationKind, RelationState};

use crate::auth::{session_guard, KeyringCredentialStore};
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

pub type CliProblemset = Problemset<HttpRemoteStore, KeyringCredentialStore>;

/// Resolved per-invocation context shared by the data commands.
pub struct Session {
    pub profile_name: String,
    pub config: ClientConfig,
}

impl Session {
    pub fn resolve(
        global_profile: Option<&str>,
        api_url_flag: Option<String>,
    ) -> Result<Self, CliError> {
        let profiles = CliProfilesConfig::load()?;
        let profile_name = profiles.resolve_profile_name(global_profile);
        let config = profiles.resolve_client_config(&profile_name, api_url_flag);
        Ok(Self {
            profile_name,
            config,
        })
    }

    pub fn open_problemset(&self) -> Result<CliProblemset, CliError> {
        let base_url = self.config.api_base_url().map_err(|error| {
            CliError::Config(format!(
                "{error}. Pass --api-url, set SOLVETRACK_API_URL, or run `solvetrack config set --api-url URL`."
            ))
        })?;
        let remote = HttpRemoteStore::new(base_url)?;
        Ok(Problemset::new(remote, session_guard(&self.profile_name)))
    }
}

#[derive(Debug, Serialize)]
pub struct ProblemListItem {
    pub id: String,
    pub name: String,
    pub rating: u32,
    pub tags: Vec<String>,
    pub url: Option<String>,
    pub solved: RelationState,
    pub bookmarked: RelationState,
}

#[derive(Debug, Serialize)]
pub struct RatingGroupItem {
    pub rating: u32,
    pub problems: Vec<ProblemListItem>,
}

pub fn problem_to_list_item(
    rating: u32,
    entry: &AnnotatedProblem,
    link_base: &str,
) -> ProblemListItem {
    ProblemListItem {
        id: entry.id().to_string(),
        name: entry.problem.name.clone(),
        rating,
        tags: entry.problem.tags.clone(),
        url: entry.problem.external_url(link_base),
        solved: entry.solved,
        bookmarked: entry.bookmarked,
    }
}

pub fn board_to_groups(
    board: &ProblemBoard,
    rating: Option<u32>,
    link_base: &str,
) -> Vec<RatingGroupItem> {
    board
        .view
        .iter()
        .filter(|(group_rating, _)| rating.map_or(true, |wanted| wanted == *group_rating))
        .map(|(group_rating, bucket)| RatingGroupItem {
            rating: group_rating,
            problems: bucket
                .iter()
                .map(|entry| problem_to_list_item(group_rating, entry, link_base))
                .collect(),
        })
        .collect()
}

pub fn format_problem_line(entry: &AnnotatedProblem, link_base: &str) -> String {
    let solved = if entry.is_solved() { "[x]" } else { "[ ]" };
    let bookmarked = if entry.is_bookmarked() { " *" } else { "" };
    let tags = if entry.problem.tags.is_empty() {
        String::new()
    } else {
        format!(" ({})", entry.problem.tags.join(", "))
    };
    let url = entry
        .problem
        .external_url(link_base)
        .map(|url| format!("\n      {url}"))
        .unwrap_or_default();
    format!(
        "  {solved} {}  {}{bookmarked}{tags}{url}",
        entry.id(),
        entry.problem.name
    )
}

/// Text rendering; collapsed groups show only their header.
pub fn format_board_lines(board: &ProblemBoard, rating: Option<u32>, link_base: &str) -> Vec<String> {
    if board.view.is_empty() {
        return vec!["No problems found".to_string()];
    }
    let mut lines = Vec::new();
    for (group_rating, bucket) in board.view.iter() {
        if rating.is_some_and(|wanted| wanted != group_rating) {
            continue;
        }
        let expanded = board.expansion.is_expanded(group_rating);
        let marker = if expanded { "v" } else { ">" };
        let solved = bucket.iter().filter(|entry| entry.is_solved()).count();
        lines.push(format!(
            "{marker} Rating {group_rating} ({solved}/{} solved)",
            bucket.len()
        ));
        if expanded {
            lines.extend(
                bucket
                    .iter()
                    .map(|entry| format_problem_line(entry, link_base)),
            );
        }
    }
    lines
}

pub fn format_notice(notice: &Notice) -> String {
    format!("{} [{}]", notice.message, notice.problem_id)
}

pub fn format_toggle_outcome(
    kind: RelationKind,
    problem_id: &ProblemId,
    outcome: &ToggleOutcome,
) -> String {
    match outcome {
        ToggleOutcome::Committed { value } => {
            let state = match (kind, value) {
                (RelationKind::Solved, true) => "marked as solved",
                (RelationKind::Solved, false) => "marked as unsolved",
                (RelationKind::Bookmarked, true) => "bookmarked",
                (RelationKind::Bookmarked, false) => "removed from bookmarks",
            };
            format!("Problem {problem_id} {state}")
        }
        ToggleOutcome::RolledBack { restored, .. } => {
            format!("Problem {problem_id} left {kind}={restored}")
        }
        ToggleOutcome::Discarded => format!("Update for problem {problem_id} was discarded"),
    }
}

pub fn normalize_problem_id(raw: &str) -> Result<ProblemId, CliError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        Err(CliError::EmptyProblemId)
    } else {
        Ok(ProblemId::from(trimmed))
    }
}
