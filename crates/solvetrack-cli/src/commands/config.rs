use solvetrack_core::config::{normalize_text_option, ClientConfig};

use crate::cli::ConfigCommands;
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

pub fn run_config(
    command: ConfigCommands,
    global_profile: Option<&str>,
    api_url_flag: Option<String>,
) -> Result<(), CliError> {
    match command {
        ConfigCommands::Set {
            api_url,
            problem_link_base,
            no_activate,
        } => run_config_set(global_profile, api_url, problem_link_base, no_activate),
        ConfigCommands::Show => run_config_show(global_profile, api_url_flag),
    }
}

pub fn run_config_set(
    profile_name: Option<&str>,
    api_url: Option<String>,
    problem_link_base: Option<String>,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load()?;
    let profile_name = config.resolve_profile_name(profile_name);

    let update = ClientConfig {
        api_base_url: normalize_text_option(api_url),
        problem_link_base: normalize_text_option(problem_link_base),
    };
    let merged = config
        .profiles
        .get(&profile_name)
        .cloned()
        .unwrap_or_default()
        .overlay(update);
    validate_profile(&merged)?;

    *config.profile_mut_or_default(&profile_name) = merged;
    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }
    let path = config.save()?;

    println!("Saved profile '{profile_name}' to {}", path.display());
    Ok(())
}

pub fn run_config_show(
    profile_name: Option<&str>,
    api_url_flag: Option<String>,
) -> Result<(), CliError> {
    let config = CliProfilesConfig::load()?;
    let profile_name = config.resolve_profile_name(profile_name);
    let resolved = config.resolve_client_config(&profile_name, api_url_flag);

    println!("profile: {profile_name}");
    match resolved.api_base_url() {
        Ok(url) => println!("api_base_url: {url}"),
        Err(error) => println!("api_base_url: <{error}>"),
    }
    match resolved.problem_link_base() {
        Ok(url) => println!("problem_link_base: {url}"),
        Err(error) => println!("problem_link_base: <{error}>"),
    }
    Ok(())
}

/// Reject URLs that are set but malformed. An unset API URL is allowed so the
/// environment can supply it later.
pub fn validate_profile(profile: &ClientConfig) -> Result<(), CliError> {
    if profile.api_base_url.is_some() {
        profile.api_base_url()?;
    }
    profile.problem_link_base()?;
    Ok(())
}
