//! Bodega CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run database migrations
//! bodega-cli migrate
//!
//! # Seed the master catalog from a YAML file
//! bodega-cli seed catalog catalog.yaml
//!
//! # Create a reviewer account
//! bodega-cli admin create -e reviewer@example.com -n "Review Team" -m +14155550123
//! ```
//!
//! # Commands
//!
//! - `migrate` - Run database migrations
//! - `seed catalog` - Seed master categories and products
//! - `admin create` - Create reviewer accounts

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "bodega-cli")]
#[command(author, version, about = "Bodega CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Seed database content
    Seed {
        #[command(subcommand)]
        target: SeedTarget,
    },
    /// Manage reviewer accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum SeedTarget {
    /// Seed master categories and products from a YAML file
    Catalog {
        /// Path to the YAML catalog file
        file: String,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new reviewer account
    Create {
        /// Reviewer email address
        #[arg(short, long)]
        email: String,

        /// Reviewer display name
        #[arg(short, long)]
        name: String,

        /// Reviewer mobile number
        #[arg(short, long)]
        mobile: String,

        /// Password for the account
        #[arg(short, long)]
        password: String,
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
        Commands::Migrate => commands::migrate::run().await?,
        Commands::Seed { target } => match target {
            SeedTarget::Catalog { file } => commands::seed::catalog(&file).await?,
        },
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                mobile,
                password,
            } => {
                commands::admin::create_reviewer(&email, &name, &mobile, &password).await?;
            }
        },
    }
    Ok(())
}
