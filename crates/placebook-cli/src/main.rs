//! placebook CLI
//!
//! Command-line transport for the placebook engine. Every command prints a
//! JSON body on stdout; failures print the public message and error code on
//! stderr and exit with status 1.

use clap::{Parser, Subcommand};
use placebook_core::errors::Result;
use placebook_core::logging_facility::{self, Profile};
use placebook_engine::{Engine, EngineConfig};
use std::path::PathBuf;

mod commands;

#[derive(Debug, Parser)]
#[command(name = "placebook")]
#[command(about = "placebook - places and the users who own them", long_about = None)]
struct Cli {
    /// Optional TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Signup, login and user listing
    User(commands::user::UserArgs),
    /// Place operations
    Place(commands::place::PlaceArgs),
    /// Verify that every place is listed by its creator and nobody else
    Check,
}

fn run(cli: Cli) -> Result<()> {
    let config = EngineConfig::load(cli.config.as_deref())?;
    let profile = config
        .logging
        .profile
        .parse()
        .unwrap_or(Profile::Development);
    logging_facility::init(profile);

    let engine = Engine::open(&config)?;
    match cli.command {
        Commands::User(args) => commands::user::execute(args, &engine),
        Commands::Place(args) => commands::place::execute(args, &engine),
        Commands::Check => commands::check::execute(&engine),
    }
}

fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        match e.request_id() {
            Some(request_id) => eprintln!(
                "Error: {} [{}] (request {})",
                e.public_message(),
                e.code(),
                request_id
            ),
            None => eprintln!("Error: {} [{}]", e.public_message(), e.code()),
        }
        std::process::exit(1);
    }
}
