use solvetrack_core::toggle::ToggleOutcome;
use solvetrack_core::RelationKind;

use crate::commands::common::{format_notice, format_toggle_outcome, normalize_problem_id, Session};
use crate::error::CliError;

pub async fn run_toggle(session: &Session, kind: RelationKind, raw_id: &str) -> Result<(), CliError> {
    let problem_id = normalize_problem_id(raw_id)?;
    let problemset = session.open_problemset()?;

    problemset.load().await?;
    if let Some(message) = problemset.error_message() {
        tracing::debug!("Load finished with: {}", message);
    }

    let outcome = problemset.toggle(kind, &problem_id).await?;
    for notice in problemset.take_notices() {
        eprintln!("{}", format_notice(&notice));
    }

    match outcome {
        ToggleOutcome::RolledBack { reason, .. } => Err(CliError::ToggleFailed { kind, reason }),
        outcome => {
            println!("{}", format_toggle_outcome(kind, &problem_id, &outcome));
            Ok(())
        }
    }
}
