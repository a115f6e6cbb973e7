use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

mod cli;
mod migrate;

/// aisleron - Shopping lists sorted the way you walk the shop
#[derive(Parser)]
#[command(name = "aisleron")]
#[command(about = "Shopping lists organised by location and aisle", long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run database migrations
    Migrate,
    /// Drop database if exists and recreate with migrations
    Reset,
    /// Write a timestamped copy of the database
    Backup {
        /// Target folder (overrides config file)
        #[arg(long)]
        folder: Option<PathBuf>,
    },
    /// Replace the database content with a backup
    Restore { file: PathBuf },
    /// List shops
    Shops {
        /// Only pinned shops
        #[arg(long)]
        pinned: bool,
    },
    /// Print the shopping list of a location, home by default
    List {
        location_id: Option<i64>,

        /// Products to show (defaults to the location filter)
        #[arg(long, value_enum)]
        filter: Option<cli::Filter>,
    },
    /// Add a product to every location
    AddProduct {
        name: String,

        #[arg(long)]
        in_stock: bool,
    },
    /// Add a shop
    AddShop {
        name: String,

        #[arg(long)]
        pinned: bool,
    },
    /// Add an aisle to a location
    AddAisle { location_id: i64, name: String },
    /// Flip a product between in stock and needed
    Toggle { product_id: i64 },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = aisleron::config::Config::load(cli.config.clone())?;
    config.validate().map_err(|e| anyhow::anyhow!(e))?;

    aisleron::observability::init_observability(
        "aisleron",
        env!("CARGO_PKG_VERSION"),
        &config.observability.log_level,
    )?;

    match cli.command {
        Commands::Migrate => migrate_command(config).await,
        Commands::Reset => reset_command(config).await,
        Commands::Backup { folder } => cli::backup(config, folder).await,
        Commands::Restore { file } => cli::restore(config, file).await,
        Commands::Shops { pinned } => cli::shops(config, pinned).await,
        Commands::List {
            location_id,
            filter,
        } => cli::list(config, location_id, filter).await,
        Commands::AddProduct { name, in_stock } => cli::add_product(config, name, in_stock).await,
        Commands::AddShop { name, pinned } => cli::add_shop(config, name, pinned).await,
        Commands::AddAisle { location_id, name } => cli::add_aisle(config, location_id, name).await,
        Commands::Toggle { product_id } => cli::toggle(config, product_id).await,
    }
}

#[tracing::instrument(skip(config))]
async fn migrate_command(config: aisleron::config::Config) -> Result<()> {
    migrate::migrate(&config).await?;

    tracing::info!("Migrations completed successfully");

    Ok(())
}

#[tracing::instrument(skip(config))]
async fn reset_command(config: aisleron::config::Config) -> Result<()> {
    migrate::reset(&config).await?;

    tracing::info!("Database reset completed successfully");

    Ok(())
}
