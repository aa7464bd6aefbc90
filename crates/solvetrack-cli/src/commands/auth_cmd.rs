use std::io::{self, BufRead, IsTerminal};

use crate::auth::session_guard;
use crate::cli::AuthCommands;
use crate::config_profiles::{normalize_token_input, CliProfilesConfig};
use crate::error::CliError;

pub fn run_auth(command: AuthCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load()?;
    let profile_name = config.resolve_profile_name(global_profile);
    let guard = session_guard(&profile_name);

    match command {
        AuthCommands::Login { token } => {
            let raw = match token {
                Some(token) => token,
                None => read_token_from_stdin()?,
            };
            let raw = normalize_token_input(&raw).ok_or(CliError::EmptyToken)?;
            guard.sign_in(&raw)?;
            println!("Stored credential for profile '{profile_name}'");
        }
        AuthCommands::Status => {
            if guard.is_signed_in() {
                println!("Profile '{profile_name}' has a stored credential.");
            } else {
                println!("Profile '{profile_name}' is not signed in.");
            }
        }
        AuthCommands::Logout => {
            guard.sign_out()?;
            println!("Signed out profile '{profile_name}'");
        }
    }
    Ok(())
}

fn read_token_from_stdin() -> Result<String, CliError> {
    let stdin = io::stdin();
    if stdin.is_terminal() {
        eprintln!("Paste access token and press Enter:");
    }
    let mut line = String::new();
    stdin.lock().read_line(&mut line)?;
    Ok(line)
}
