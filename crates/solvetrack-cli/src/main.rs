//! solvetrack CLI - browse rated problems and track solved/bookmarked marks
//!
//! Loads the catalog and the signed-in user's marks, renders them grouped by
//! rating, and toggles marks optimistically against the remote store.

mod auth;
mod cli;
mod commands;
mod config_profiles;
mod error;


use clap::Parser;
use solvetrack_core::RelationKind;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::auth_cmd::run_auth;
use crate::commands::common::Session;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::list::{run_list, ListOptions};
use crate::commands::toggle::run_toggle;
use crate::commands::whoami::run_whoami;
use crate::error::CliError;

#[tokio::main(flavor = "current_thread")]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("solvetrack=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::List {
            rating,
            expand,
            all,
            json,
        } => {
            let session = Session::resolve(profile, cli.api_url)?;
            run_list(
                &session,
                ListOptions {
                    rating,
                    expand,
                    all,
                    json,
                },
            )
            .await?;
        }
        Commands::Solve { id } => {
            let session = Session::resolve(profile, cli.api_url)?;
            run_toggle(&session, RelationKind::Solved, &id).await?;
        }
        Commands::Bookmark { id } => {
            let session = Session::resolve(profile, cli.api_url)?;
            run_toggle(&session, RelationKind::Bookmarked, &id).await?;
        }
        Commands::Whoami { json } => {
            let session = Session::resolve(profile, cli.api_url)?;
            run_whoami(&session, json).await?;
        }
        Commands::Auth { command } => run_auth(command, profile)?,
        Commands::Config { command } => run_config(command, profile, cli.api_url)?,
        Commands::Completions { shell, output } => {
            run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}
