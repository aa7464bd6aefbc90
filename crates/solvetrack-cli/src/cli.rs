use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "solvetrack")]
#[command(about = "Browse rated problems and track what you solved from the command line")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// API base URL for this invocation (overrides env and profile config)
    #[arg(long, global = true, value_name = "URL")]
    pub api_url: Option<String>,

    /// CLI profile name for server and credential selection
    #[arg(long, global = true, value_name = "NAME")]
    pub profile: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List problems grouped by rating
    List {
        /// Only show this rating group
        #[arg(short, long)]
        rating: Option<u32>,
        /// Expand a rating group (repeatable)
        #[arg(short, long, value_name = "RATING")]
        expand: Vec<u32>,
        /// Expand every rating group
        #[arg(long)]
        all: bool,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Toggle the solved mark on a problem
    Solve {
        /// Problem ID
        id: String,
    },
    /// Toggle the bookmark on a problem
    Bookmark {
        /// Problem ID
        id: String,
    },
    /// Show the profile of the signed-in user
    Whoami {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Manage the stored credential
    Auth {
        #[command(subcommand)]
        command: AuthCommands,
    },
    /// Configure CLI profiles
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// Generate shell completion scripts
    Completions {
        /// Target shell
        #[arg(value_enum)]
        shell: CompletionShell,
        /// Optional output path (stdout when omitted)
        #[arg(short, long, value_name = "PATH")]
        output: Option<PathBuf>,
    },
}

#[derive(Clone, Copy, Debug, Eq, PartialEq, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    #[value(name = "powershell")]
    PowerShell,
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Store an access token in the OS keychain
    Login {
        /// Access token, with or without a `Bearer ` prefix (read from stdin when omitted)
        #[arg(long, value_name = "TOKEN")]
        token: Option<String>,
    },
    /// Show whether the profile has a stored credential
    Status,
    /// Clear the stored credential
    Logout,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Create or update a profile
    Set {
        /// API base URL (e.g. <https://api.example.com>)
        #[arg(long, value_name = "URL")]
        api_url: Option<String>,
        /// Base URL for external problem links
        #[arg(long, value_name = "URL")]
        problem_link_base: Option<String>,
        /// Keep current active profile instead of activating this one
        #[arg(long)]
        no_activate: bool,
    },
    /// Print the resolved configuration
    Show,
}
