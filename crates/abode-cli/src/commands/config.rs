use abode_core::config::ENV_API_BASE_URL;
use abode_core::util::normalize_text_option;
use abode_core::AuthScheme;

use crate::cli::{AuthSchemeArg, ConfigCommands};
use crate::config_profiles::{resolve_client_config, validate_api_base_url, CliProfilesConfig};
use crate::error::CliError;

pub fn run_config(command: ConfigCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            profile,
            api_base_url,
            auth_scheme,
            no_activate,
        } => run_config_init(
            profile.as_deref().or(global_profile),
            api_base_url,
            auth_scheme,
            no_activate,
        ),
        ConfigCommands::Show => run_config_show(global_profile),
    }
}

#[allow(clippy::needless_pass_by_value)]
pub fn run_config_init(
    profile_name: Option<&str>,
    api_base_url: Option<String>,
    auth_scheme: Option<AuthSchemeArg>,
    no_activate: bool,
) -> Result<(), CliError> {
    let mut config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(profile_name);
    let existing_profile = config.profile(&profile_name).cloned().unwrap_or_default();

    let merged_api_base_url = resolve_api_base_url(
        normalize_text_option(api_base_url),
        normalize_text_option(std::env::var(ENV_API_BASE_URL).ok()),
        existing_profile.api_base_url(),
    )?;

    let profile = config.profile_mut_or_default(&profile_name);
    profile.api_base_url = merged_api_base_url;
    if let Some(scheme) = auth_scheme {
        profile.auth_scheme = Some(AuthScheme::from(scheme));
    }

    if !no_activate {
        config.active_profile = Some(profile_name.clone());
    }

    let path = config.save().map_err(CliError::Config)?;
    println!(
        "Profile '{}' initialized at {}",
        profile_name,
        path.display()
    );

    let ready = config
        .profile(&profile_name)
        .and_then(|profile| profile.api_base_url())
        .is_some();
    if ready {
        println!(
            "Profile '{profile_name}' is ready. Run `abode auth login --email <email> --password <password>`."
        );
    } else {
        println!("Profile '{profile_name}' is missing: api_base_url");
    }

    Ok(())
}

/// Explicit flag, then `ABODE_API_BASE_URL`, then the value already stored.
pub fn resolve_api_base_url(
    explicit: Option<String>,
    from_env: Option<String>,
    existing: Option<String>,
) -> Result<Option<String>, CliError> {
    explicit
        .or(from_env)
        .or(existing)
        .map(|url| validate_api_base_url(&url))
        .transpose()
}

fn run_config_show(global_profile: Option<&str>) -> Result<(), CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    let profile_name = config.resolve_profile_name(global_profile);
    let profile = config.profile(&profile_name);
    if profile.is_none() {
        println!("Profile '{profile_name}' is not configured.");
    }

    match resolve_client_config(profile) {
        Ok(client) => {
            println!("profile:         {profile_name}");
            println!("api_base_url:    {}", client.api_base_url);
            println!("auth_scheme:     {}", client.auth_scheme);
            println!("timeout_secs:    {}", client.request_timeout_secs);
            println!("blog_page_size:  {}", client.blog_page_size);
            Ok(())
        }
        Err(CliError::NotConfigured) => {
            println!("Profile '{profile_name}' has no API base URL.");
            Ok(())
        }
        Err(error) => Err(error),
    }
}
