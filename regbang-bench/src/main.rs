use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use log::{error, info};
use regbang_bench::{Bench, BenchConfig};

#[derive(Parser)]
#[command(name = "regbang-bench", about = "Loopback bench for the regbang register bus")]
struct Cli {
    /// Bench configuration; the SoC bring-up sequence runs without one
    config: Option<PathBuf>,

    /// Override the configured baud rate
    #[arg(long)]
    baud: Option<u32>,

    /// Override the receiver oversampling factor
    #[arg(long)]
    oversample: Option<u32>,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => BenchConfig::load(path),
        None => Ok(BenchConfig::default()),
    };
    let result = config.and_then(|mut config| {
        if let Some(baud) = cli.baud {
            config.link.baud = baud;
        }
        if let Some(oversample) = cli.oversample {
            config.link.oversample = oversample;
        }
        Bench::new(config)?.run()
    });

    match result {
        Ok(report) => {
            for outcome in &report.outcomes {
                info!(
                    "#{:<3} {:?} ({} bytes, {} ns)",
                    outcome.index,
                    outcome.decoded,
                    outcome.frame_len,
                    outcome.duration_ps / 1000
                );
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
