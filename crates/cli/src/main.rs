//! Satwa CLI - browse the catalog, manage the cart and wishlist, check out.
//!
//! # Usage
//!
//! ```bash
//! # Search and sort the catalog
//! satwa products --search gold --sort price-low
//!
//! # Product detail with related products
//! satwa product 4
//!
//! # Cart and wishlist (persisted under SATWA_DATA_DIR)
//! satwa cart add 1 -q 2
//! satwa wishlist toggle 5
//!
//! # Place the order with the Order Service at SATWA_ORDER_SERVICE_URL
//! satwa checkout --first-name Asha --last-name Rao ...
//! ```
//!
//! # Commands
//!
//! - `products` - List products with search, filters and sort
//! - `product` - Show one product
//! - `cart` - Show or change the cart
//! - `wishlist` - Show or change the wishlist
//! - `checkout` - Place an order

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use satwa_core::ProductId;

mod commands;

use commands::Session;
use commands::cart::CartAction;
use commands::catalog::ProductsArgs;
use commands::checkout::CheckoutArgs;
use commands::wishlist::WishlistAction;

#[derive(Parser)]
#[command(name = "satwa")]
#[command(author, version, about = "Satwa jewellery shop")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List products
    Products(ProductsArgs),
    /// Show a product
    Product {
        /// Product id
        id: ProductId,
    },
    /// Manage the cart
    Cart {
        #[command(subcommand)]
        action: Option<CartAction>,
    },
    /// Manage the wishlist
    Wishlist {
        #[command(subcommand)]
        action: Option<WishlistAction>,
    },
    /// Place an order for the cart
    Checkout(Box<CheckoutArgs>),
}

#[tokio::main]
async fn main() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "warn,satwa_storefront=info".into());
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
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
    let session = Session::open()?;

    let output = match cli.command {
        Commands::Products(args) => commands::catalog::products(&session, &args)?,
        Commands::Product { id } => commands::catalog::product(&session, id)?,
        Commands::Cart { action } => {
            commands::cart::run(&session, &action.unwrap_or(CartAction::Show))?
        }
        Commands::Wishlist { action } => {
            commands::wishlist::run(&session, &action.unwrap_or(WishlistAction::Show))?
        }
        Commands::Checkout(args) => commands::checkout::checkout(&session, *args).await?,
    };

    #[allow(clippy::print_stdout)]
    {
        println!("{output}");
    }
    Ok(())
}
