//! Dataport gateway
//!
//! Serves the invocation endpoint over HTTP, or runs a single invocation
//! read from a JSON file and prints the result.
//!
//! Usage:
//!   dataport-gateway --port 8080
//!   dataport-gateway run invocation.json

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use dataport_gateway::{Invocation, build_router, invoke};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "dataport-gateway")]
#[command(about = "Replicate catalog packages between CKAN instances")]
struct Args {
    /// Address to bind the HTTP listener to
    #[arg(long, default_value = "0.0.0.0")]
    host: String,

    /// Port for the invocation endpoint
    #[arg(short, long, default_value = "8080")]
    port: u16,

    /// Enable verbose debug logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Run one invocation from a JSON file and exit
    Run {
        /// Path to the invocation body
        file: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let filter = log_filter(args.verbose);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();

    match args.command {
        Some(Command::Run { file }) => run_once(file).await,
        None => serve(&args.host, args.port).await,
    }
}

/// `--verbose` wins over `RUST_LOG`, which wins over the INFO default.
fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        return EnvFilter::new("debug");
    }
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

async fn run_once(file: PathBuf) -> Result<()> {
    let raw = tokio::fs::read_to_string(&file)
        .await
        .with_context(|| format!("Failed to read invocation {}", file.display()))?;
    let invocation: Invocation = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse invocation {}", file.display()))?;

    let response = invoke(invocation).await?;
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn serve(host: &str, port: u16) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Dataport gateway listening on {}", addr);

    axum::serve(listener, build_router())
        .await
        .context("HTTP server failed")?;
    Ok(())
}
