#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

mod commands;
mod config;
mod logging;
mod state;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use litellm_user::LiteLlmUserClient;

use crate::config::{CliConfig, CliOverrides};
use crate::state::StateStore;

/// Manage LiteLLM proxy users from a local state file
#[derive(Parser)]
#[command(name = "litellm-user")]
#[command(about = "Manage LiteLLM proxy users from a local state file")]
#[command(version)]
struct Cli {
    /// Path to configuration file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// State file (overrides config)
    #[arg(short, long)]
    state: Option<PathBuf>,

    /// Proxy base URL (overrides config and environment)
    #[arg(long)]
    base_url: Option<String>,

    /// Log verbosity level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a user and start tracking it under NAME
    Create {
        #[arg(long)]
        name: String,
        /// JSON file with the desired user attributes
        #[arg(long)]
        attributes: PathBuf,
    },
    /// Refresh a tracked user from the proxy
    Read {
        #[arg(long)]
        name: String,
    },
    /// Push new desired attributes for a tracked user
    Update {
        #[arg(long)]
        name: String,
        #[arg(long)]
        attributes: PathBuf,
    },
    /// Delete a tracked user and forget it
    Delete {
        #[arg(long)]
        name: String,
    },
    /// Start tracking an existing proxy user
    Import {
        #[arg(long)]
        name: String,
        /// Identifier of the user on the proxy
        #[arg(long)]
        id: String,
    },
    /// Print the tracked state
    Show,
    /// Validate configuration and print it
    Check,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let overrides = CliOverrides {
        base_url: cli.base_url.clone(),
        state_file: cli.state.clone(),
    };
    let config = CliConfig::load(cli.config.as_deref(), &overrides)?;
    logging::init_logging(&config.logging, cli.verbose);

    let store = StateStore::new(&config.state_file);
    tracing::debug!(state_file = %store.path().display(), "configuration loaded");

    match cli.command {
        Commands::Create { name, attributes } => {
            commands::create(&client(&config)?, &store, &name, &attributes).await
        }
        Commands::Read { name } => commands::read(&client(&config)?, &store, &name).await,
        Commands::Update { name, attributes } => {
            commands::update(&client(&config)?, &store, &name, &attributes).await
        }
        Commands::Delete { name } => commands::delete(&client(&config)?, &store, &name).await,
        Commands::Import { name, id } => {
            commands::import(&client(&config)?, &store, &name, &id).await
        }
        Commands::Show => commands::show(&store),
        Commands::Check => check_config(&config),
    }
}

fn client(config: &CliConfig) -> Result<LiteLlmUserClient> {
    Ok(LiteLlmUserClient::from_config(config.provider()?)?)
}

fn check_config(config: &CliConfig) -> Result<()> {
    config.provider()?;
    println!("Configuration is valid");
    println!("{}", config.to_yaml()?);
    Ok(())
}
