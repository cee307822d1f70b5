//! Schema and configuration commands

use std::path::PathBuf;

use bidledger_engine::Settings;
use bidledger_store::migrations;
use clap::{Args, Subcommand};
use serde_json::json;

use super::print_json;
use crate::error::CliError;

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Write the effective configuration to a TOML file
    Init(InitArgs),
    /// Print the effective configuration
    Show,
}

#[derive(Debug, Args)]
pub struct InitArgs {
    #[arg(long, default_value = bidledger_engine::config::CONFIG_FILE)]
    pub path: PathBuf,

    /// Overwrite an existing file
    #[arg(long)]
    pub force: bool,
}

pub fn execute(args: ConfigArgs, settings: &Settings) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Init(init) => {
            if init.path.exists() && !init.force {
                return Err(CliError::Usage(format!(
                    "{} already exists; pass --force to overwrite",
                    init.path.display()
                )));
            }
            settings.save_to_file(&init.path)?;
            print_json(&json!({ "written": init.path }))
        }
        ConfigCommand::Show => print_json(settings),
    }
}

pub fn migrate(settings: &Settings) -> Result<(), CliError> {
    let mut conn = settings.connect()?;
    migrations::apply_migrations(&mut conn)?;
    let applied = migrations::applied_migrations(&conn)?;
    tracing::info!(count = applied.len(), "schema up to date");
    print_json(&json!({ "applied": applied }))
}
