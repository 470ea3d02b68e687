use anyhow::Context;
use clap::Parser;
use rpc_shrinkage::io::{plots, reporting};
use rpc_shrinkage::{annotate_shrinkage_rate, simulate, SimulationConfig};
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "rpc-shrinkage")]
#[command(about = "Simulate returnable container rentals and report shrinkage", long_about = None)]
struct Args {
    /// JSON configuration file with a top-level "params" object
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Random seed; a fresh one is drawn and logged when omitted
    #[arg(short, long)]
    seed: Option<u64>,

    /// Directory for the generated charts
    #[arg(short, long, default_value = "figures")]
    output_dir: PathBuf,

    /// Also export the annotated batch table to this CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Skip chart generation
    #[arg(long)]
    no_plots: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "rpc_shrinkage=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // 1. SETUP CONFIGURATION
    let config = match &args.config {
        Some(path) => SimulationConfig::from_path(path)
            .with_context(|| format!("loading configuration from {}", path.display()))?,
        None => {
            warn!("no configuration file given, using built-in defaults");
            SimulationConfig::default()
        }
    };
    let seed = args.seed.unwrap_or_else(rand::random);
    info!(seed, "random seed");

    // 2. RUN SIMULATION
    let batches = simulate(&config, seed)?;

    // 3. DERIVE SHRINKAGE RATES
    let rows = annotate_shrinkage_rate(&batches)?;
    reporting::print_table(&rows);

    // 4. EXPORT RESULTS
    if let Some(path) = &args.csv {
        reporting::write_batch_log(path, &rows)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    if !args.no_plots {
        plots::plot_shrinkage_rate(&rows, &args.output_dir)?;
        plots::plot_shrinkage_rates_by_sc(&rows, &args.output_dir)?;
        plots::plot_pool_size(&rows, &args.output_dir)?;
    }

    Ok(())
}
