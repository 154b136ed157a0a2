//! GoMarketplace CLI - Inspect and edit the persisted cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart
//! gm-cart show
//!
//! # Show the raw persisted record
//! gm-cart show --json
//!
//! # Add one unit of a product
//! gm-cart add --id p1 --title "Shirt" --image-url https://cdn/shirt.png --price 10
//!
//! # Change quantities
//! gm-cart increment p1
//! gm-cart decrement p1
//! ```
//!
//! # Environment Variables
//!
//! - `CART_STORAGE_DIR` - Directory holding the cart file
//! - `CART_STORAGE_NAMESPACE` - Namespace of the storage key
//! - `RUST_LOG` - Log filter (logs go to stderr)

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use gomarketplace_cart::CartConfig;
use gomarketplace_core::{NewLineItem, ProductId, UnitPrice};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "gm-cart")]
#[command(author, version, about = "GoMarketplace cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the cart
    Show {
        /// Print the persisted JSON record instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Add one unit of a product
    Add {
        /// Product ID
        #[arg(long)]
        id: String,

        /// Display name
        #[arg(short, long)]
        title: String,

        /// Product image reference
        #[arg(long)]
        image_url: String,

        /// Unit price (e.g. 19.99)
        #[arg(short, long)]
        price: UnitPrice,
    },
    /// Add one unit to a product already in the cart
    Increment {
        /// Product ID
        id: String,
    },
    /// Remove one unit, dropping the product when none are left
    Decrement {
        /// Product ID
        id: String,
    },
}

#[tokio::main]
async fn main() {
    // Logs go to stderr so stdout stays clean for cart output.
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "gomarketplace_cart=warn,gm_cart=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let config = CartConfig::from_env()?;

    match cli.command {
        Commands::Show { json } => commands::show(&config, json).await,
        Commands::Add {
            id,
            title,
            image_url,
            price,
        } => {
            commands::add(
                &config,
                NewLineItem {
                    id: ProductId::new(id),
                    title,
                    image_url,
                    price,
                },
            )
            .await
        }
        Commands::Increment { id } => commands::increment(&config, &ProductId::new(id)).await,
        Commands::Decrement { id } => commands::decrement(&config, &ProductId::new(id)).await,
    }
}
