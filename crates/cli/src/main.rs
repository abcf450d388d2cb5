//! Terp Haus CLI - Flowhub catalog, inventory, order and specials tools.
//!
//! # Usage
//!
//! ```bash
//! # Browse the menu
//! th-cli products list --category flower --limit 10
//! th-cli products get prod_123
//!
//! # Stock levels
//! th-cli inventory get
//! th-cli inventory set prod_123 42
//!
//! # Orders
//! th-cli orders list --status pending
//! th-cli orders status ord_456 ready
//!
//! # Customers
//! th-cli customers get cus_789
//! th-cli customers create --first-name Mary --last-name Jane \
//!     --email mary@example.com --phone 555-0100 --date-of-birth 1990-04-20
//!
//! # Sales for June
//! th-cli reports sales --start-date 2024-06-01 --end-date 2024-06-30
//!
//! # Publish specials to a running storefront
//! th-cli specials publish data/specials.json --url http://localhost:3000
//! ```
//!
//! # Commands
//!
//! - `products` - List and inspect products
//! - `inventory` - Read and set stock levels
//! - `orders` - List, inspect and move orders
//! - `customers` - Look up and register customers
//! - `reports` - Sales reports
//! - `specials` - Publish the specials list
//!
//! Flowhub commands read the same `FLOWHUB_*` environment variables as the
//! storefront.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use terp_haus_core::checkout::CustomerSubmission;

mod commands;

#[derive(Parser)]
#[command(name = "th-cli")]
#[command(author, version, about = "Terp Haus CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Browse the Flowhub catalog
    Products {
        #[command(subcommand)]
        action: ProductsAction,
    },
    /// Read and set stock levels
    Inventory {
        #[command(subcommand)]
        action: InventoryAction,
    },
    /// Manage pickup orders
    Orders {
        #[command(subcommand)]
        action: OrdersAction,
    },
    /// Look up and register customers
    Customers {
        #[command(subcommand)]
        action: CustomersAction,
    },
    /// Sales reporting
    Reports {
        #[command(subcommand)]
        action: ReportsAction,
    },
    /// Manage the specials list
    Specials {
        #[command(subcommand)]
        action: SpecialsAction,
    },
}

#[derive(Subcommand)]
enum ProductsAction {
    /// List products
    List {
        /// Category filter (e.g. flower, edibles)
        #[arg(short, long)]
        category: Option<String>,

        /// Free-text search
        #[arg(short, long)]
        search: Option<String>,

        /// Page size
        #[arg(short, long)]
        limit: Option<u32>,

        /// Records to skip
        #[arg(short, long)]
        offset: Option<u32>,
    },
    /// Show one product
    Get {
        /// Flowhub product ID
        id: String,
    },
}

#[derive(Subcommand)]
enum InventoryAction {
    /// Show stock for one product, or for the whole location
    Get {
        /// Flowhub product ID
        product_id: Option<String>,
    },
    /// Set the stock level of a product
    Set {
        /// Flowhub product ID
        product_id: String,

        /// New stock level
        quantity: f64,
    },
}

#[derive(Subcommand)]
enum OrdersAction {
    /// List orders
    List {
        /// Status filter (pending, confirmed, ready, picked-up, cancelled)
        #[arg(short, long)]
        status: Option<String>,

        /// Page size
        #[arg(short, long)]
        limit: Option<u32>,

        /// Records to skip
        #[arg(short, long)]
        offset: Option<u32>,
    },
    /// Show one order
    Get {
        /// Flowhub order ID
        id: String,
    },
    /// Request a status change
    Status {
        /// Flowhub order ID
        id: String,

        /// New status
        status: String,
    },
}

#[derive(Subcommand)]
enum CustomersAction {
    /// Show one customer
    Get {
        /// Flowhub customer ID
        id: String,
    },
    /// Register a customer (must be 21 or older)
    Create {
        #[arg(long)]
        first_name: String,

        #[arg(long)]
        last_name: String,

        #[arg(long)]
        email: String,

        #[arg(long)]
        phone: String,

        /// YYYY-MM-DD
        #[arg(long)]
        date_of_birth: String,
    },
}

#[derive(Subcommand)]
enum ReportsAction {
    /// Sales totals
    Sales {
        /// First day included (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<NaiveDate>,

        /// Last day included (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<NaiveDate>,

        /// Category filter
        #[arg(short, long)]
        category: Option<String>,
    },
}

#[derive(Subcommand)]
enum SpecialsAction {
    /// Replace the specials list on a running storefront
    Publish {
        /// JSON file shaped `{"items": [...]}`
        file: PathBuf,

        /// Storefront base URL (defaults to `STOREFRONT_BASE_URL`, then
        /// `http://localhost:3000`)
        #[arg(short, long)]
        url: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), commands::CliError> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CliError> {
    match cli.command {
        Commands::Products { action } => match action {
            ProductsAction::List {
                category,
                search,
                limit,
                offset,
            } => commands::products::list(category, search, limit, offset).await?,
            ProductsAction::Get { id } => commands::products::get(&id).await?,
        },
        Commands::Inventory { action } => match action {
            InventoryAction::Get { product_id } => {
                commands::inventory::get(product_id.as_deref()).await?;
            }
            InventoryAction::Set {
                product_id,
                quantity,
            } => commands::inventory::set(&product_id, quantity).await?,
        },
        Commands::Orders { action } => match action {
            OrdersAction::List {
                status,
                limit,
                offset,
            } => commands::orders::list(status, limit, offset).await?,
            OrdersAction::Get { id } => commands::orders::get(&id).await?,
            OrdersAction::Status { id, status } => commands::orders::status(&id, &status).await?,
        },
        Commands::Customers { action } => match action {
            CustomersAction::Get { id } => commands::customers::get(&id).await?,
            CustomersAction::Create {
                first_name,
                last_name,
                email,
                phone,
                date_of_birth,
            } => {
                let submission = CustomerSubmission {
                    first_name: Some(first_name),
                    last_name: Some(last_name),
                    email: Some(email),
                    phone: Some(phone),
                    date_of_birth: Some(date_of_birth),
                };
                commands::customers::create(submission).await?;
            }
        },
        Commands::Reports { action } => match action {
            ReportsAction::Sales {
                start_date,
                end_date,
                category,
            } => commands::reports::sales(start_date, end_date, category).await?,
        },
        Commands::Specials { action } => match action {
            SpecialsAction::Publish { file, url } => {
                commands::specials::publish(&file, url).await?;
            }
        },
    }
    Ok(())
}
