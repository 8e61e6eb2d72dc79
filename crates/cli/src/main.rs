//! Gift Grove CLI - seeding and account management tools.
//!
//! # Usage
//!
//! ```bash
//! # Seed the catalog with sample products
//! gg-cli seed
//!
//! # Create an admin user
//! gg-cli admin create -u casey -p 'a-long-password' -e casey@example.com
//!
//! # Promote an existing user to admin
//! gg-cli admin promote -u casey
//! ```
//!
//! # Commands
//!
//! - `seed` - Populate the catalog with sample products
//! - `admin create` - Create an admin user
//! - `admin promote` - Grant the admin flag to an existing user
//!
//! All commands operate on the same JSON data directory the storefront
//! serves from (`--data-dir`, or `STOREFRONT_DATA_DIR`, default `data`).

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "gg-cli")]
#[command(author, version, about = "Gift Grove CLI tools")]
struct Cli {
    /// Data directory holding the JSON files (default: $STOREFRONT_DATA_DIR or "data")
    #[arg(long, global = true)]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Seed the catalog with sample products
    Seed {
        /// Seed even if the catalog already has products
        #[arg(long)]
        force: bool,
    },
    /// Manage admin users
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin user
    Create {
        /// Username
        #[arg(short, long)]
        username: String,

        /// Password
        #[arg(short, long)]
        password: String,

        /// Contact email
        #[arg(short, long)]
        email: Option<String>,
    },
    /// Promote an existing user to admin
    Promote {
        /// Username
        #[arg(short, long)]
        username: String,
    },
}

// Deliberately synchronous: without a runtime the store's collection
// writes happen inline, so every file is on disk before the process exits.
fn main() {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let data_dir = cli.data_dir.unwrap_or_else(|| {
        PathBuf::from(std::env::var("STOREFRONT_DATA_DIR").unwrap_or_else(|_| "data".to_owned()))
    });

    let result: Result<(), Box<dyn std::error::Error>> = run(cli.command, data_dir);

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(command: Commands, data_dir: PathBuf) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Seed { force } => commands::seed::run(&data_dir, force)?,
        Commands::Admin { action } => match action {
            AdminAction::Create {
                username,
                password,
                email,
            } => {
                commands::admin::create_admin(&data_dir, &username, &password, email.as_deref())?;
            }
            AdminAction::Promote { username } => {
                commands::admin::promote(&data_dir, &username)?;
            }
        },
    }
    Ok(())
}
