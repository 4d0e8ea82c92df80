use anyhow::Result;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use sizectl::catalog::{CatalogClient, CatalogSource};
use sizectl::config::{self, Config};
use sizectl::output;
use sizectl::pricing::{PriceSource, PricingClient};
use sizectl::sizer::ClusterSizer;
use sizectl::types::ResourceRequirement;

#[derive(Parser)]
#[command(name = "sizectl")]
#[command(
    about = "Cluster sizing CLI for cost-optimal AWS spot capacity",
    long_about = "sizectl recommends a cost-optimal cluster configuration for a resource requirement.\n\nGiven required CPU cores, memory, and storage, it fetches qualifying instance\ntypes and their per-region spot prices, then reports two recommendations:\n  - the cheapest configuration overall\n  - the configuration using the fewest physical instances"
)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Configuration file path
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Base URL of the catalog/pricing backend (overrides config)
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output format (text, json); defaults to the configured format
    #[arg(long, global = true)]
    output: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Compute the cost-optimal cluster for a resource requirement
    Plan {
        /// Required CPU cores
        #[arg(long)]
        cpu: Option<u64>,
        /// Required memory in GB
        #[arg(long)]
        memory: Option<u64>,
        /// Required storage in GB
        #[arg(long)]
        storage: Option<u64>,
    },
    /// List instance types qualifying for a requirement
    Types {
        /// Required CPU cores
        #[arg(long)]
        cpu: Option<u64>,
        /// Required memory in GB
        #[arg(long)]
        memory: Option<u64>,
        /// Required storage in GB
        #[arg(long)]
        storage: Option<u64>,
    },
    /// Show the full catalog entry for one instance type
    Describe {
        /// Instance type name (e.g. m1.small)
        instance_type: String,
    },
    /// Show current regional spot prices for instance types
    Prices {
        /// Instance type names
        #[arg(required = true)]
        instance_types: Vec<String>,
    },
    /// Initialize sizectl configuration
    Init {
        /// Path to write the config file to
        #[arg(short, long, default_value = ".sizectl.toml")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging - suppress INFO by default, only show warnings and errors
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load config
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
    }
    let output_format = cli.output.unwrap_or_else(|| config.output.format.clone());

    // Execute command
    match cli.command {
        Commands::Plan { cpu, memory, storage } => {
            let requirement = ResourceRequirement::new(cpu, memory, storage);
            plan_cluster(&requirement, &config, &output_format).await?;
        }
        Commands::Types { cpu, memory, storage } => {
            let requirement = ResourceRequirement::new(cpu, memory, storage);
            let specs = catalog_client(&config)
                .list_instance_types(&requirement)
                .await?;
            output::print_instance_types(&specs, &output_format)?;
        }
        Commands::Describe { instance_type } => {
            match catalog_client(&config)
                .describe_instance_type(&instance_type)
                .await?
            {
                Some(spec) => output::print_instance_detail(&spec, &output_format)?,
                None => anyhow::bail!("Unknown instance type: {}", instance_type),
            }
        }
        Commands::Prices { instance_types } => {
            let prices = pricing_client(&config)
                .get_spot_prices(&instance_types)
                .await?;
            output::print_spot_prices(&prices, &output_format)?;
        }
        Commands::Init { path } => {
            config::init_config(&path)?;
        }
    }

    Ok(())
}

fn catalog_client(config: &Config) -> CatalogClient {
    CatalogClient::new(
        config.api.base_url.clone(),
        Duration::from_secs(config.api.timeout_secs),
    )
}

fn pricing_client(config: &Config) -> PricingClient {
    PricingClient::new(
        config.api.base_url.clone(),
        Duration::from_secs(config.api.timeout_secs),
    )
    .with_chunk_size(config.api.price_chunk_size)
}

async fn plan_cluster(
    requirement: &ResourceRequirement,
    config: &Config,
    output_format: &str,
) -> Result<()> {
    let sizer = Arc::new(ClusterSizer::new(
        catalog_client(config),
        pricing_client(config),
    ));

    let result = if output_format != "json" && config.output.show_spinner {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .expect("Progress bar template should be valid"),
        );
        pb.set_message("Computing optimal cluster...");

        let run = tokio::spawn({
            let sizer = sizer.clone();
            let requirement = requirement.clone();
            async move { sizer.compute_optimal_cluster(&requirement).await }
        });

        // The spinner follows the sizer's observable loading state.
        while !run.is_finished() {
            if sizer.is_loading() {
                pb.tick();
            }
            tokio::time::sleep(Duration::from_millis(80)).await;
        }
        pb.finish_and_clear();
        run.await??
    } else {
        sizer.compute_optimal_cluster(requirement).await?
    };

    output::print_sizing_result(&result, output_format)?;
    Ok(())
}
