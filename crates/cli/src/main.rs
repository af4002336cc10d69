//! Civic Desk CLI - Database migrations and management tools.
//!
//! # Usage
//!
//! ```bash
//! # Run portal database migrations
//! civic-cli migrate
//!
//! # Load demo officers, issues and messages
//! civic-cli seed
//!
//! # Add an officer to the directory
//! civic-cli officer add -e roads1@oi.com -n "Sam Lee" -d public_works
//!
//! # Move an officer to another department
//! civic-cli officer assign -e roads1@oi.com -d transport
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "civic-cli")]
#[command(author, version, about = "Civic Desk CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run portal database migrations
    Migrate,
    /// Seed the database with demo data
    Seed,
    /// Manage the officer directory
    Officer {
        #[command(subcommand)]
        action: OfficerAction,
    },
}

#[derive(Subcommand)]
enum OfficerAction {
    /// Add an officer
    Add {
        /// Officer email address (must end with @oi.com)
        #[arg(short, long)]
        email: String,

        /// Officer display name
        #[arg(short, long)]
        name: String,

        /// Department slug or name, e.g. `sanitation` or "Public Works"
        #[arg(short, long)]
        department: Option<String>,
    },
    /// Assign an officer to a department
    Assign {
        /// Officer email address
        #[arg(short, long)]
        email: String,

        /// Department slug or name
        #[arg(short, long)]
        department: String,
    },
    /// List all officers
    List,
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
        Commands::Migrate => commands::migrate::portal().await?,
        Commands::Seed => commands::seed::demo_data().await?,
        Commands::Officer { action } => match action {
            OfficerAction::Add {
                email,
                name,
                department,
            } => {
                commands::officer::add(&email, &name, department.as_deref()).await?;
            }
            OfficerAction::Assign { email, department } => {
                commands::officer::assign(&email, &department).await?;
            }
            OfficerAction::List => commands::officer::list().await?,
        },
    }
    Ok(())
}
