use anyhow::Context;
use clap::Parser;
use log::{info, warn};
use std::path::PathBuf;

mod config;
mod models;
mod analysis;
mod simulation;
mod output;
mod error;

use crate::config::Config;
use crate::simulation::MonitorSession;

#[derive(Parser)]
#[command(name = "vitals_insight")]
#[command(about = "Vital-sign monitoring session with anomaly detection, risk scoring and forecasting")]
struct Cli {
    /// Configuration file path (built-in demo subjects when omitted)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output directory
    #[arg(short, long)]
    output: PathBuf,

    /// Number of ticks to run (overrides the configuration)
    #[arg(short, long)]
    ticks: Option<usize>,

    /// Random seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Sleep the tick interval between ticks
    #[arg(short, long)]
    follow: bool,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if cli.verbose {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Debug)
            .init();
    } else {
        env_logger::Builder::from_default_env()
            .filter_level(log::LevelFilter::Info)
            .init();
    }

    let mut config = match &cli.config {
        Some(path) => {
            let config = Config::from_file(path)
                .with_context(|| format!("failed to load configuration from {:?}", path))?;
            info!("Loaded configuration from {:?}", path);
            config
        }
        None => {
            warn!("No configuration given, using built-in demo subjects");
            Config::default()
        }
    };
    if let Some(ticks) = cli.ticks {
        config.session.ticks = ticks;
    }

    match cli.seed {
        Some(seed) => info!("Monitoring {} subjects (seed: {})", config.subjects.len(), seed),
        None => info!("Monitoring {} subjects (random seed)", config.subjects.len()),
    }

    let mut session = MonitorSession::new(config, cli.seed)
        .context("invalid monitoring configuration")?;
    session.run(cli.follow)?;
    let outcome = session.finish();

    std::fs::create_dir_all(&cli.output)
        .with_context(|| format!("failed to create output directory {:?}", cli.output))?;
    crate::output::save_results(&outcome, &cli.output)?;
    info!("Results saved to {:?}", cli.output);

    Ok(())
}
