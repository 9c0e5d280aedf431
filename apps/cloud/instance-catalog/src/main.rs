//! Instance Catalog
//!
//! Downloads the AWS EC2 price list for one region and prints every Linux
//! on-demand instance type sorted by annual cost. Can also list and verify the
//! built-in instance family taxonomy.

use clap::{Args, Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{Environment, FromEnv};
use domain_pricing::{NormalizeOptions, Taxonomy};
use eyre::Result;
use std::io;
use std::path::PathBuf;
use tracing::{info, warn};

mod collector;
mod config;
mod providers;
mod render;

use collector::{CatalogCollector, CatalogReport};
use config::Config;
use providers::AwsPriceListClient;
use render::OutputFormat;

#[derive(Parser)]
#[command(name = "instance-catalog")]
#[command(about = "Cost-sorted EC2 instance catalog from the AWS price list")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch prices and print the instance table
    List {
        #[command(flatten)]
        fetch: FetchArgs,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Col)]
        format: OutputFormat,

        /// Abbreviate size names (large -> l, metal -> ⛁, ...)
        #[arg(long)]
        short_type: bool,

        /// Check discovered families against the taxonomy after the table
        #[arg(long)]
        check_family: bool,
    },

    /// Print the built-in instance family taxonomy
    Families,

    /// Fetch prices and print only the family check
    Check {
        #[command(flatten)]
        fetch: FetchArgs,
    },
}

#[derive(Args)]
struct FetchArgs {
    /// AWS region. Defaults to AWS_REGION or us-east-1.
    #[arg(short, long)]
    region: Option<String>,

    /// Copy the raw price list documents to DIR while downloading
    #[arg(
        long,
        value_name = "DIR",
        num_args = 0..=1,
        default_missing_value = "/tmp"
    )]
    fetch_offers: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();

    let cli = Cli::parse();
    init_tracing(&Environment::from_env());

    let taxonomy = Taxonomy::builtin();
    if let Err(e) = taxonomy.validate() {
        warn!(error = %e, "Built-in family taxonomy is inconsistent");
    }

    match cli.command {
        Commands::Families => {
            render::write_families(io::stdout().lock(), io::stderr().lock(), taxonomy.entries())?;
        }

        Commands::List {
            fetch,
            format,
            short_type,
            check_family,
        } => {
            let config = Config::from_env()?;
            let options = NormalizeOptions {
                short_names: short_type,
            };
            let report = collect(&config, fetch, taxonomy, options).await?;

            let mut stdout = io::stdout().lock();
            render::write_instances(&mut stdout, format, &report.snapshot.instances)?;
            if check_family {
                render::write_checks(&mut stdout, &report.checks)?;
            }
        }

        Commands::Check { fetch } => {
            let config = Config::from_env()?;
            let report = collect(&config, fetch, taxonomy, NormalizeOptions::default()).await?;
            render::write_checks(io::stdout().lock(), &report.checks)?;
        }
    }

    Ok(())
}

async fn collect(
    config: &Config,
    fetch: FetchArgs,
    taxonomy: Taxonomy,
    options: NormalizeOptions,
) -> Result<CatalogReport> {
    let region = fetch.region.unwrap_or_else(|| config.region.clone());

    let mut price_list = config.price_list.clone();
    if fetch.fetch_offers.is_some() {
        price_list.tee_dir = fetch.fetch_offers;
    }

    info!(
        region = %region,
        base_url = %price_list.base_url,
        tee_dir = ?price_list.tee_dir,
        "Starting catalog collection"
    );

    let source = AwsPriceListClient::new(&price_list)?;
    let collector = CatalogCollector::new(source, taxonomy, options);
    let report = collector.collect(&region).await?;

    info!(
        region = %report.region,
        publication_date = %report.snapshot.publication_date,
        collected_at = %report.collected_at,
        skipped = report.snapshot.products_skipped,
        parse_warnings = report.snapshot.parse_warnings,
        "Catalog ready"
    );

    Ok(report)
}
