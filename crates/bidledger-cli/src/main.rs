//! BidLedger CLI
//!
//! Command-line interface for tenders, bids and the directory behind them.
//! Results are printed to stdout as JSON; logs go to stderr.

use std::path::PathBuf;

use bidledger_core::logging_facility;
use bidledger_engine::Settings;
use clap::{Parser, Subcommand};

mod commands;
mod error;

use error::CliError;

#[derive(Debug, Parser)]
#[command(name = "bidledger")]
#[command(about = "BidLedger - versioned tenders and bids", long_about = None)]
struct Cli {
    /// Database file, overriding `database_path` from configuration
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Bring the database schema up to date
    Migrate,
    /// Configuration file operations
    Config(commands::admin::ConfigArgs),
    /// Employees, organizations and responsibilities
    Directory(commands::directory::DirectoryArgs),
    /// Tender operations
    Tender(commands::tender::TenderArgs),
    /// Bid operations, including decisions and feedback
    Bid(commands::bid::BidArgs),
}

fn main() {
    // Usage errors exit with 1 so that 2 stays reserved for Unauthorized.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    if let Err(e) = run(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let mut settings = Settings::load()?;
    if let Some(db) = cli.db {
        settings.database_path = db;
    }
    logging_facility::init(settings.log_profile);

    match cli.command {
        Commands::Migrate => commands::admin::migrate(&settings),
        Commands::Config(args) => commands::admin::execute(args, &settings),
        Commands::Directory(args) => commands::directory::execute(args, &settings),
        Commands::Tender(args) => commands::tender::execute(args, &settings),
        Commands::Bid(args) => commands::bid::execute(args, &settings),
    }
}
