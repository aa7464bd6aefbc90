use solvetrack_core::UserProfile;

use crate::commands::common::Session;
use crate::error::CliError;

pub async fn run_whoami(session: &Session, json: bool) -> Result<(), CliError> {
    let problemset = session.open_problemset()?;
    let profile = problemset.profile().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        for line in format_profile_lines(&profile) {
            println!("{line}");
        }
    }
    Ok(())
}

pub fn format_profile_lines(profile: &UserProfile) -> Vec<String> {
    let field = |value: Option<&str>| value.unwrap_or("-").to_string();
    vec![
        format!("Signed in as {}", field(profile.display_name())),
        format!("username: {}", field(profile.username.as_deref())),
        format!("handle:   {}", field(profile.codeforces_handle.as_deref())),
        format!("email:    {}", field(profile.email.as_deref())),
    ]
}
