//! netcli-exporter - Prometheus exporter for network device CLIs
//!
//! Polls devices over their CLI and renders environment and facts metrics.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use netcli_core::{extract, CommandFamily, OsType};
use netcli_exporter::config::{Config, DEFAULT_CONFIG_PATH};
use netcli_exporter::metrics::CollectorMetrics;
use netcli_exporter::poll::{poll_all, Transport};
use std::io::Read;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "netcli-exporter")]
#[command(about = "Collect environment and facts metrics from network device CLIs", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll every configured device once and print the metrics
    Poll {
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,

        /// Write the exposition to a file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Replay recorded transcripts from <DIR>/<target>/ instead of running commands
        #[arg(long, value_name = "DIR")]
        replay: Option<PathBuf>,
    },

    /// Extract metric items from a saved transcript
    Parse {
        /// ios, iosxe or nxos
        #[arg(long)]
        os: OsType,

        /// version, version_detailed, memory, cpu or environment
        #[arg(long)]
        family: CommandFamily,

        /// Transcript file (stdin when omitted)
        #[arg(short, long)]
        file: Option<PathBuf>,
    },

    /// Load and validate a configuration file
    CheckConfig {
        #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Poll {
            config,
            output,
            replay,
        } => poll(config, output, replay).await,
        Commands::Parse { os, family, file } => parse(os, family, file),
        Commands::CheckConfig { config } => check_config(config),
    }
}

async fn poll(config: PathBuf, output: Option<PathBuf>, replay: Option<PathBuf>) -> Result<()> {
    let config = Config::load_from_path(&config)?;
    let metrics = Arc::new(
        CollectorMetrics::new(
            &config.exporter.prefix_environment,
            &config.exporter.prefix_facts,
        )
        .context("registering metrics")?,
    );

    let transport = match replay {
        Some(dir) => Transport::Replay(dir),
        None => Transport::Shell,
    };

    info!("netcli-exporter v{} polling {} devices", env!("CARGO_PKG_VERSION"), config.devices.len());
    let summaries = poll_all(&config, Arc::clone(&metrics), transport).await?;

    let text = metrics.render()?;
    match output {
        Some(path) => {
            std::fs::write(&path, text).with_context(|| format!("writing {}", path.display()))?;
            info!("Wrote metrics to {}", path.display());
        }
        None => print!("{}", text),
    }

    let failed: usize = summaries.iter().map(|s| s.failed_families()).sum();
    if failed > 0 {
        info!("{} sub-collections failed; see warnings above", failed);
    }
    Ok(())
}

fn parse(os: OsType, family: CommandFamily, file: Option<PathBuf>) -> Result<()> {
    let transcript = match file {
        Some(path) => std::fs::read_to_string(&path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .context("reading stdin")?;
            buf
        }
    };

    let items = extract(os, family, &transcript)?;
    println!("{}", serde_json::to_string_pretty(&items)?);
    Ok(())
}

fn check_config(path: PathBuf) -> Result<()> {
    let config = Config::load_from_path(&path)?;
    for device in &config.devices {
        let families: Vec<String> = device
            .families()
            .into_iter()
            .filter(|f| netcli_core::supports(device.os, *f))
            .map(|f| f.to_string())
            .collect();
        println!("{} ({}, {}): {}", device.target, device.os, device.host(), families.join(", "));
    }
    println!("OK: {} devices", config.devices.len());
    Ok(())
}
