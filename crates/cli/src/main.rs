//! `ChinoEffy` CLI - Cart and catalog tools.
//!
//! # Usage
//!
//! ```bash
//! # Browse the catalog
//! ce-cli catalog list --category presets --sort price-high
//!
//! # Work with a cart stored under the data directory
//! ce-cli cart add --id 1
//! ce-cli cart update --id 1 --quantity 3
//! ce-cli cart show
//! ce-cli --data-dir /tmp/cart cart clear
//! ```
//!
//! # Environment Variables
//!
//! - `CHINOEFFY_DATA_DIR` - Directory holding `local_storage.json` (default `.chinoeffy`)
//! - `CHINOEFFY_CATALOG` - Catalog JSON file (default `crates/storefront/content/catalog.json`)

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use chinoeffy_core::{PriceSort, ProductId};
use clap::{Parser, Subcommand};

mod commands;
mod file_storage;

#[derive(Parser)]
#[command(name = "ce-cli")]
#[command(author, version, about = "ChinoEffy CLI tools")]
struct Cli {
    /// Directory where the cart is stored
    #[arg(long, global = true, env = "CHINOEFFY_DATA_DIR", default_value = ".chinoeffy")]
    data_dir: PathBuf,

    /// Product catalog file
    #[arg(
        long,
        global = true,
        env = "CHINOEFFY_CATALOG",
        default_value = "crates/storefront/content/catalog.json"
    )]
    catalog: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage the stored cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Browse the product catalog
    Catalog {
        #[command(subcommand)]
        action: CatalogAction,
    },
}

#[derive(Subcommand)]
enum CartAction {
    /// Show items, count and total
    Show,
    /// Add one unit of a product
    Add {
        /// Product id
        #[arg(long)]
        id: ProductId,

        /// Product name (skips the catalog lookup together with --price)
        #[arg(long, requires = "price")]
        name: Option<String>,

        /// Display price, e.g. "$19.99"
        #[arg(long, requires = "name")]
        price: Option<String>,

        /// Image URL
        #[arg(long)]
        image: Option<String>,
    },
    /// Remove a product line
    Remove {
        /// Product id
        #[arg(long)]
        id: ProductId,
    },
    /// Set a product's quantity (values below 1 become 1)
    Update {
        /// Product id
        #[arg(long)]
        id: ProductId,

        /// New quantity
        #[arg(long, allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Remove every item
    Clear,
}

#[derive(Subcommand)]
enum CatalogAction {
    /// List products
    List {
        /// Category to show (`all` for every category)
        #[arg(long, default_value = "all")]
        category: String,

        /// Sort order (`featured`, `price-low`, `price-high`)
        #[arg(long, default_value = "featured")]
        sort: PriceSort,
    },
}

fn main() {
    // Values in a local `.env` are picked up like the storefront does
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "chinoeffy_cli=info,chinoeffy_core=warn".into()),
        )
        .with_target(false)
        .without_time()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let data_dir = cli.data_dir.as_path();
    match cli.command {
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart::show(data_dir),
            CartAction::Add {
                id,
                name,
                price,
                image,
            } => {
                let args = commands::cart::ProductArgs { name, price, image };
                commands::cart::add(data_dir, &cli.catalog, id, args)?;
            }
            CartAction::Remove { id } => commands::cart::remove(data_dir, id),
            CartAction::Update { id, quantity } => {
                commands::cart::update(data_dir, id, quantity);
            }
            CartAction::Clear => commands::cart::clear(data_dir),
        },
        Commands::Catalog { action } => match action {
            CatalogAction::List { category, sort } => {
                commands::catalog::list(&cli.catalog, &category, sort)?;
            }
        },
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_update_with_negative_quantity() {
        let cli = Cli::try_parse_from(["ce-cli", "cart", "update", "--id", "2", "--quantity", "-3"]);
        assert!(matches!(
            cli.map(|c| c.command),
            Ok(Commands::Cart {
                action: CartAction::Update { quantity: -3, .. }
            })
        ));
    }
}
