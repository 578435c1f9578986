use abode_core::auth::TokenStore;

use crate::auth::KeyringTokenStore;
use crate::cli::AuthCommands;
use crate::commands::common::open_session;
use crate::config_profiles::CliProfilesConfig;
use crate::error::CliError;

pub async fn run_auth(command: AuthCommands, global_profile: Option<&str>) -> Result<(), CliError> {
    match command {
        AuthCommands::Login { email, password } => {
            let context = open_session(global_profile)?;
            let user = context
                .session
                .auth
                .login(&email, &password)
                .await
                .map_err(|error| CliError::Auth(error.to_string()))?;
            let label = user.email.as_deref().unwrap_or(&user.name);
            println!(
                "Signed in profile '{}' as {}",
                context.profile_name, label
            );
            Ok(())
        }
        AuthCommands::Token { token } => {
            let profile_name = resolve_profile_name(global_profile)?;
            KeyringTokenStore::new(&profile_name).save_token(&token)?;
            println!("Stored token for profile '{profile_name}'");
            Ok(())
        }
        AuthCommands::Status => {
            let context = open_session(global_profile)?;
            if !context.session.auth.is_signed_in()? {
                println!("Profile '{}' is not signed in.", context.profile_name);
                return Ok(());
            }

            match context.session.auth.current_user().await {
                Ok(user) => {
                    let label = user.email.as_deref().unwrap_or(&user.name);
                    println!(
                        "Profile '{}' is signed in as {} (id={})",
                        context.profile_name, label, user.id
                    );
                }
                Err(abode_core::Error::Unauthorized) => {
                    println!(
                        "Profile '{}' token was rejected and has been cleared.",
                        context.profile_name
                    );
                }
                Err(error) => return Err(error.into()),
            }
            Ok(())
        }
        AuthCommands::Logout => {
            let profile_name = resolve_profile_name(global_profile)?;
            KeyringTokenStore::new(&profile_name).clear_token()?;
            println!("Signed out profile '{profile_name}'");
            Ok(())
        }
    }
}

fn resolve_profile_name(global_profile: Option<&str>) -> Result<String, CliError> {
    let config = CliProfilesConfig::load().map_err(CliError::Config)?;
    Ok(config.resolve_profile_name(global_profile))
}
