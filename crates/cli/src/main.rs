//! shopyZ CLI - Database migrations and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # Run storefront database migrations
//! shopyz-cli migrate
//!
//! # Seed the bundled catalog into an empty, never-seeded store
//! shopyz-cli seed
//!
//! # List the products currently in the store
//! shopyz-cli seed --list
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "shopyz-cli")]
#[command(author, version, about = "shopyZ CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run storefront database migrations
    Migrate,
    /// Seed the bundled catalog on first run
    Seed {
        /// Only list the stored products, do not seed
        #[arg(short, long)]
        list: bool,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Migrate => commands::migrate::storefront().await?,
        Commands::Seed { list: true } => commands::seed::list().await?,
        Commands::Seed { list: false } => commands::seed::catalog().await?,
    }
    Ok(())
}
