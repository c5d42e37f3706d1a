use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::net::{IpAddr, SocketAddr};

use emergency_detector_rs::models::{ForestConfig, IsolationConfig};
use emergency_detector_rs::server::{self, AppState};
use emergency_detector_rs::{AccidentDetector, DetectorConfig};

#[derive(Parser, Debug)]
#[command(name = "emergency_detector")]
#[command(about = "Accident detection and driving-risk inference service", long_about = None)]
struct Args {
    /// Address to bind
    #[arg(long, default_value = "0.0.0.0")]
    host: IpAddr,

    /// Port to serve on
    #[arg(long, default_value = "8000")]
    port: u16,

    /// Synthetic training samples (half normal, half accident)
    #[arg(long, default_value = "10000")]
    samples: usize,

    /// Trees per random forest
    #[arg(long, default_value = "100")]
    trees: usize,

    /// Seed for data generation and model training
    #[arg(long, default_value = "42")]
    seed: u64,
}

impl Args {
    fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            n_samples: self.samples,
            seed: self.seed,
            forest: ForestConfig {
                n_trees: self.trees,
                seed: self.seed,
                ..ForestConfig::default()
            },
            isolation: IsolationConfig {
                seed: self.seed,
                ..IsolationConfig::default()
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    info!(
        "Emergency detector starting (samples={}, trees={}, seed={})",
        args.samples, args.trees, args.seed
    );

    let config = args.detector_config();
    let detector = tokio::task::spawn_blocking(move || AccidentDetector::new(&config))
        .await
        .context("model training task panicked")?;

    let addr = SocketAddr::new(args.host, args.port);
    server::serve(AppState::new(detector), addr)
        .await
        .with_context(|| format!("server on {addr} failed"))
}
