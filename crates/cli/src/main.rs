//! La Comanda CLI - Ordering flag, order previews and migrations.
//!
//! # Usage
//!
//! ```bash
//! # Read the ordering flag
//! lc-cli status
//!
//! # Log in and pause ordering
//! TOKEN=$(lc-cli login -u operador -p '...')
//! lc-cli set --enabled false --token "$TOKEN"
//!
//! # Follow the flag
//! lc-cli watch --interval 10
//!
//! # Render an order file offline
//! lc-cli preview --file order.json
//!
//! # Run storefront database migrations
//! lc-cli migrate
//! ```
//!
//! The storefront URL comes from `--url` or `STOREFRONT_URL`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use secrecy::SecretString;

mod client;
mod commands;

use client::StorefrontClient;

#[derive(Parser)]
#[command(name = "lc-cli")]
#[command(author, version, about = "La Comanda CLI tools")]
struct Cli {
    /// Storefront base URL
    #[arg(
        long,
        global = true,
        env = "STOREFRONT_URL",
        default_value = "http://127.0.0.1:3000"
    )]
    url: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show whether ordering is enabled
    Status,
    /// Log in and print an admin token
    Login {
        #[arg(short, long, env = "ADMIN_USERNAME")]
        username: String,

        #[arg(short, long, env = "ADMIN_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Enable or pause ordering
    Set {
        #[arg(long, action = clap::ArgAction::Set)]
        enabled: bool,

        /// Token from `login`
        #[arg(long, env = "ADMIN_TOKEN", hide_env_values = true)]
        token: String,
    },
    /// Poll the ordering flag and log changes
    Watch {
        /// Seconds between polls
        #[arg(long, default_value_t = 10)]
        interval: u64,

        /// Stop after this many polls
        #[arg(long)]
        count: Option<u64>,
    },
    /// Render the message and ticket for an order file
    Preview {
        #[arg(short, long)]
        file: PathBuf,

        #[arg(long, env = "BUSINESS_NAME", default_value = "LA COMANDA")]
        business: String,

        /// Also print the click-to-chat URL for this number
        #[arg(long)]
        whatsapp: Option<String>,
    },
    /// Run storefront database migrations
    Migrate,
}

#[tokio::main]
async fn main() {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lc_cli=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Status => {
            let client = StorefrontClient::new(&cli.url)?;
            commands::status::show(&client).await?;
        }
        Commands::Login { username, password } => {
            let client = StorefrontClient::new(&cli.url)?;
            commands::status::login(&client, &username, &SecretString::from(password)).await?;
        }
        Commands::Set { enabled, token } => {
            let client = StorefrontClient::new(&cli.url)?;
            commands::status::set(&client, enabled, &SecretString::from(token)).await?;
        }
        Commands::Watch { interval, count } => {
            let client = StorefrontClient::new(&cli.url)?;
            let interval = Duration::from_secs(interval.max(1));
            commands::status::watch(&client, interval, count).await;
        }
        Commands::Preview {
            file,
            business,
            whatsapp,
        } => commands::preview::run(&file, &business, whatsapp.as_deref())?,
        Commands::Migrate => commands::migrate::storefront().await?,
    }
    Ok(())
}
