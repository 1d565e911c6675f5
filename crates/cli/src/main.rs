//! Order Proxy CLI - credential and upstream connection checks.
//!
//! # Usage
//!
//! ```bash
//! # Report which credential variables are set
//! op-cli env
//!
//! # Fetch orders and show the first three, masked
//! op-cli check orders --limit 3
//!
//! # Fetch products matching a keyword
//! op-cli check products --limit 5 --keyword mango
//!
//! # Fetch one product and report the envelope shape used
//! op-cli check product --id 4470988
//! ```
//!
//! # Commands
//!
//! - `env` - Report credential presence (never values)
//! - `check` - Call the upstream exactly as the server does

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "op-cli")]
#[command(author, version, about = "Order proxy operator tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Report SET/MISSING for each credential variable
    Env,
    /// Call the upstream API with the configured credentials
    Check {
        #[command(subcommand)]
        target: CheckTarget,
    },
}

#[derive(Subcommand)]
enum CheckTarget {
    /// Fetch paid, non-cancelled orders
    Orders {
        /// Number of orders to print
        #[arg(short, long, default_value_t = 3)]
        limit: usize,
    },
    /// Fetch the product list
    Products {
        /// Page size requested from the upstream
        #[arg(short, long, default_value_t = 20)]
        limit: u32,

        /// Keyword filter
        #[arg(short, long)]
        keyword: Option<String>,
    },
    /// Fetch one product by id
    Product {
        /// Upstream product id
        #[arg(short, long)]
        id: String,
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
        Commands::Env => commands::env::report()?,
        Commands::Check { target } => match target {
            CheckTarget::Orders { limit } => commands::check::orders(limit).await?,
            CheckTarget::Products { limit, keyword } => {
                commands::check::products(limit, keyword.as_deref()).await?;
            }
            CheckTarget::Product { id } => commands::check::product(&id).await?,
        },
    }
    Ok(())
}
