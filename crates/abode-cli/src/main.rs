//! Abode CLI - browse and manage property, gym, parking and blog listings
//! from the terminal.

mod auth;
mod cli;
mod commands;
mod config_profiles;
mod error;

use clap::Parser;
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};
use crate::commands::auth_cmd::run_auth;
use crate::commands::blogs::run_blogs;
use crate::commands::completions::run_completions;
use crate::commands::config::run_config;
use crate::commands::gyms::run_gyms;
use crate::commands::parking::run_parking;
use crate::commands::properties::run_properties;
use crate::error::CliError;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("Error: {error}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), CliError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();
    let profile = cli.profile.as_deref();

    match cli.command {
        Commands::Config { command } => run_config(command, profile)?,
        Commands::Auth { command } => run_auth(command, profile).await?,
        Commands::Properties { command } => run_properties(command, profile).await?,
        Commands::Gyms { command } => run_gyms(command, profile).await?,
        Commands::Parking { command } => run_parking(command, profile).await?,
        Commands::Blogs { command } => run_blogs(command, profile).await?,
        Commands::Completions { shell, output } => {
            run_completions(shell, output.as_deref())?;
        }
    }

    Ok(())
}

fn init_tracing() {
    let mut filter = EnvFilter::from_default_env();
    for directive in ["abode=info", "abode_core=info", "abode_cli=info"] {
        if let Ok(directive) = directive.parse::<Directive>() {
            filter = filter.add_directive(directive);
        }
    }

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
