//! Dish Dispatcher simulation binary.
//!
//! Loads the shelf configuration and order definitions, runs the kitchen
//! simulation until the orders drain, the duration cap elapses or Ctrl+C,
//! and prints the final statistics.

use std::path::PathBuf;
use std::process;

use anyhow::Context;
use clap::Parser;
use dish_core::ManagerStats;
use dish_sim::{load_orders, report, SimConfig, Simulator};
use tracing::{error, info};

/// Dish Dispatcher: route perishable orders onto temperature shelves.
#[derive(Parser, Debug)]
#[command(
    name = "dish-dispatcher",
    version,
    about = "Simulate shelf allocation and courier delivery for perishable orders"
)]
struct Args {
    /// Shelf configuration file (JSON). Defaults are used if it is missing.
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// Order definitions file (JSON array)
    #[arg(long, default_value = "orders.json")]
    orders: PathBuf,

    /// Override the hot shelf capacity
    #[arg(long)]
    hot: Option<usize>,

    /// Override the cold shelf capacity
    #[arg(long)]
    cold: Option<usize>,

    /// Override the frozen shelf capacity
    #[arg(long)]
    frozen: Option<usize>,

    /// Override the overflow shelf capacity
    #[arg(long)]
    overflow: Option<usize>,

    /// Override the order ingestion rate
    #[arg(long)]
    orders_per_second: Option<f64>,

    /// Override the maximum run time in seconds (0 = until drained)
    #[arg(long)]
    duration: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Log output format ("text" or "json")
    #[arg(long, default_value = "text")]
    log_format: String,

    /// Print the final statistics as JSON instead of the text summary
    #[arg(long)]
    stats_json: bool,
}

impl Args {
    /// Apply command-line overrides on top of the loaded configuration.
    fn apply(&self, mut config: SimConfig) -> SimConfig {
        if let Some(hot) = self.hot {
            config.hot_shelf_capacity = hot;
        }
        if let Some(cold) = self.cold {
            config.cold_shelf_capacity = cold;
        }
        if let Some(frozen) = self.frozen {
            config.frozen_shelf_capacity = frozen;
        }
        if let Some(overflow) = self.overflow {
            config.overflow_capacity = overflow;
        }
        if let Some(rate) = self.orders_per_second {
            config.orders_per_second = rate;
        }
        if let Some(duration) = self.duration {
            config.simulation_duration = duration;
        }
        config
    }
}

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_logging(&args.log_level, &args.log_format);

    info!("Dish Dispatcher v{}", env!("CARGO_PKG_VERSION"));

    match run(args).await {
        Ok(()) => info!("Dish Dispatcher shutdown complete"),
        Err(e) => {
            error!("{:#}", e);
            process::exit(1);
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = SimConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    let config = args.apply(config);
    let specs = load_orders(&args.orders)
        .with_context(|| format!("loading {}", args.orders.display()))?;

    info!(config = %args.config.display(), orders = %args.orders.display(), "inputs loaded");

    let simulator = Simulator::new(config, specs).context("invalid configuration")?;

    let stats = simulator.run(shutdown_signal()).await?;
    print_stats(&stats, args.stats_json)
}

/// Resolves on Ctrl+C or, on unix, SIGTERM.
///
/// A handler that cannot be installed never fires; the run then ends on its
/// own.
async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => info!("received Ctrl+C, shutting down..."),
            Err(e) => {
                error!("failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
                info!("received SIGTERM, shutting down...");
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}

fn print_stats(stats: &ManagerStats, as_json: bool) -> anyhow::Result<()> {
    if as_json {
        let json = serde_json::to_string_pretty(stats).context("serializing stats")?;
        println!("{json}");
    } else {
        println!("{}", report::final_summary(stats));
    }
    Ok(())
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Pass `format = "json"` for structured JSON output. Any other value
/// defaults to human-readable text.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(true)
                    .with_level(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
