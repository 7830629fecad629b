//! Flash-sale Application CLI

use std::{process, sync::Arc, time::Duration};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use flashsale_app::{
    context::{AppContext, AppSettings},
    domain::products::data::NewProduct,
    money,
    sweeper::Sweeper,
};

#[derive(Debug, Parser)]
#[command(name = "flashsale-app", about = "Flash-sale CLI", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Create a product with its opening stock
    Seed(SeedArgs),

    /// Release expired holds back to stock
    Sweep(SweepArgs),
}

#[derive(Debug, Args)]
struct SeedArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Product display name
    #[arg(long)]
    name: String,

    /// Product description
    #[arg(long, default_value = "")]
    description: String,

    /// Unit price as a decimal string, e.g. 99.99
    #[arg(long)]
    price: String,

    /// Opening stock
    #[arg(long)]
    stock: i64,
}

#[derive(Debug, Args)]
struct SweepArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    /// Seconds between sweep passes
    #[arg(long, env = "SWEEP_INTERVAL_SECONDS", default_value_t = 30)]
    interval_seconds: u64,

    /// Run a single pass and exit
    #[arg(long)]
    once: bool,
}

#[tokio::main]
pub async fn main() {
    let _env = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    if let Err(error) = run(cli).await {
        eprintln!("{error}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), String> {
    match cli.command {
        Commands::Seed(args) => seed(args).await,
        Commands::Sweep(args) => sweep(args).await,
    }
}

async fn seed(args: SeedArgs) -> Result<(), String> {
    let price = money::parse_decimal(&args.price)
        .map_err(|error| format!("invalid price {:?}: {error}", args.price))?;

    if args.stock < 0 {
        return Err("stock cannot be negative".to_string());
    }

    let context = AppContext::from_database_url(&args.database_url, AppSettings::default())
        .await
        .map_err(|error| format!("failed to initialise application: {error}"))?;

    let product = context
        .products
        .seed_product(NewProduct {
            name: args.name,
            description: args.description,
            price,
            stock: args.stock,
        })
        .await
        .map_err(|error| format!("failed to seed product: {error}"))?;

    println!("product_id: {}", product.id);
    println!("name: {}", product.name);
    println!("price: {}", money::format_minor(product.price));
    println!("stock: {}", product.stock);

    Ok(())
}

async fn sweep(args: SweepArgs) -> Result<(), String> {
    let context = AppContext::from_database_url(&args.database_url, AppSettings::default())
        .await
        .map_err(|error| format!("failed to initialise application: {error}"))?;

    let sweeper = Sweeper::new(
        Arc::clone(&context.holds),
        Duration::from_secs(args.interval_seconds),
    );

    if args.once {
        let released = sweeper
            .sweep_once()
            .await
            .map_err(|error| format!("sweep failed: {error}"))?;

        println!("released_holds: {released}");

        return Ok(());
    }

    sweeper.run().await;

    Ok(())
}
