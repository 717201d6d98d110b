use std::sync::Arc;

use clap::{Parser, Subcommand};
use phonecat_scraper::{AvailabilityCache, Storefront, StorefrontSettings};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

const DEFAULT_LOCALE: &str = "us";

#[derive(Debug, Parser)]
#[command(name = "phonecat-cli")]
#[command(about = "Query the phone storefront catalog from the command line")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Print the normalized model catalog for a locale
    Models {
        /// Storefront locale path segment, e.g. `uk` or `ca/fr`
        #[arg(long, default_value = DEFAULT_LOCALE)]
        locale: String,
    },
    /// Print the locale directory, minus locales whose store is disabled
    Locales,
    /// Print the configuration summary of one locale
    Config {
        /// Storefront locale path segment
        locale: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let Some(command) = cli.command else {
        println!("phonecat-cli: run with --help to list commands");
        return Ok(());
    };

    dotenvy::dotenv().ok();
    let config = phonecat_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let storefront = Storefront::new(
        StorefrontSettings::from_app_config(&config),
        Arc::new(AvailabilityCache::default()),
    )?;

    tracing::debug!(?command, "running command");
    match command {
        Commands::Models { locale } => print_json(&storefront.get_models(&locale).await?),
        Commands::Locales => print_json(&storefront.get_locales().await?),
        Commands::Config { locale } => print_json(&storefront.get_config(&locale).await?),
    }
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
