use solvetrack_core::state::LoadError;

use crate::commands::common::{board_to_groups, format_board_lines, Session};
use crate::error::CliError;

pub struct ListOptions {
    pub rating: Option<u32>,
    pub expand: Vec<u32>,
    pub all: bool,
    pub json: bool,
}

pub async fn run_list(session: &Session, options: ListOptions) -> Result<(), CliError> {
    let problemset = session.open_problemset()?;
    let link_base = session.config.problem_link_base()?;

    problemset.load().await?;
    if let Some(message) = problemset.error_message() {
        eprintln!("{message}");
    }
    if problemset
        .board()
        .borrow()
        .error
        .as_ref()
        .is_some_and(LoadError::is_unauthenticated)
    {
        eprintln!("Run `solvetrack auth login` to see your marks.");
    }

    let board = problemset.board();
    {
        let mut board = board.borrow_mut();
        let ratings: Vec<u32> = board.view.ratings().collect();
        if let Some(rating) = options.rating {
            if !ratings.contains(&rating) {
                return Err(CliError::UnknownRating(rating));
            }
        }
        for rating in ratings {
            let expanded = options.all
                || options.expand.contains(&rating)
                || options.rating == Some(rating);
            board.expansion.set(rating, expanded);
        }
    }

    let board = board.borrow();
    if options.json {
        let groups = board_to_groups(&board, options.rating, &link_base);
        println!("{}", serde_json::to_string_pretty(&groups)?);
    } else {
        for line in format_board_lines(&board, options.rating, &link_base) {
            println!("{line}");
        }
    }

    Ok(())
}
