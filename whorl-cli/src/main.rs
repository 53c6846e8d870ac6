use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use colored::Colorize;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;
use whorl_core::output::{get_formatter, OutputFormat};
use whorl_core::{WhoisClient, WhoisConfig};

#[derive(Parser)]
#[command(name = "whorl")]
#[command(about = "WHOIS client for domains, IP addresses and AS numbers")]
#[command(version)]
struct Cli {
    /// Domain, IP address or AS number (e.g. example.com, 8.8.8.8, AS15169)
    target: String,

    /// Output format (human or json)
    #[arg(short, long, default_value = "human")]
    format: OutputFormat,

    /// Keep regional registry answers separate instead of one summary
    #[arg(short, long)]
    structured: bool,

    /// Query this WHOIS server instead of the one picked for the TLD.
    /// IP and AS targets go to this server alone, skipping the registry sweep.
    #[arg(long, conflicts_with = "structured")]
    server: Option<String>,

    /// Only check DNS for signs of registration
    #[arg(short, long, conflicts_with_all = ["structured", "server"])]
    available: bool,

    /// Config file (defaults to the platform config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Per-operation network timeout in seconds
    #[arg(short, long, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => WhoisConfig::load(path),
        None => WhoisConfig::load_default(),
    }
    .context("Failed to load configuration")?;

    let cancel = CancellationToken::new();
    let mut client = WhoisClient::new()
        .with_config(&config)
        .with_cancellation(cancel.clone());
    if let Some(secs) = cli.timeout {
        client = client.with_timeout(Duration::from_secs(secs));
    }

    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });

    let formatter = get_formatter(cli.format);

    let output = match (&cli.server, cli.structured) {
        _ if cli.available => client
            .is_available(&cli.target)
            .await
            .map(|available| formatter.format_availability(&cli.target, available)),
        (Some(server), _) => client
            .lookup_with_server(&cli.target, server)
            .await
            .map(|record| formatter.format_record(&record)),
        (None, true) => client
            .lookup_structured(&cli.target)
            .await
            .map(|lookup| formatter.format_lookup(&lookup)),
        (None, false) => client
            .lookup(&cli.target)
            .await
            .map(|record| formatter.format_record(&record)),
    };

    match output {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("{} {}", "Error:".red().bold(), e);
            std::process::exit(1);
        }
    }

    Ok(())
}
