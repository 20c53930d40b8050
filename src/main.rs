//! approval-sync command-line entry point

mod cli;

use anstream::{eprintln, println};
use approval_sync::config::Overrides;
use approval_sync::types::Transport;
use clap::Parser;
use cli::style::Stylize;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, fmt};

/// Record a change's current approvals in its commit message and push a new patchset
#[derive(Parser, Debug)]
#[command(name = "approval-sync", version, about)]
struct Cli {
    /// Change number or Change-Id
    change: String,

    /// Account to use instead of the configured one (defaults to $USER)
    #[arg(short, long)]
    user: Option<String>,

    /// Review server host
    #[arg(long)]
    host: Option<String>,

    /// Review server SSH port
    #[arg(long)]
    port: Option<u16>,

    /// Query transport: ssh or http
    #[arg(long)]
    transport: Option<Transport>,

    /// REST API base URL (http transport)
    #[arg(long)]
    http_url: Option<String>,

    /// Config file (defaults to ~/.config/approval-sync/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr))
        .try_init()
        .ok();
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let overrides = Overrides {
        host: cli.host,
        port: cli.port,
        user: cli.user,
        transport: cli.transport,
        http_url: cli.http_url,
    };

    match cli::run_sync(&cli.change, cli.config.as_deref(), overrides).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if e.is_clean_stop() => {
            println!("{}", e.to_string().muted());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{} {e}", "error:".error());
            ExitCode::FAILURE
        }
    }
}
