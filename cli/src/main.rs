//! # remo
//!
//! Command-line front end for the Nature Remo cloud API.
//!
//! ```bash
//! export REMO_TOKEN=...
//! remo devices
//! remo aircon-settings <APPLIANCE> --mode cool --temperature 26
//! remo send-signal <SIGNAL>
//! ```

mod commands;

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use remo_core::{Config, Remo};
use tracing_subscriber::filter::Directive;
use tracing_subscriber::EnvFilter;

use crate::commands::Command;

#[derive(Debug, Parser)]
#[command(name = "remo")]
#[command(about = "Talk to the Nature Remo cloud API", long_about = None)]
#[command(version)]
struct Cli {
    /// Access token (defaults to $REMO_TOKEN)
    #[arg(long, global = true)]
    token: Option<String>,
    /// API origin (defaults to $REMO_ENDPOINT or https://api.nature.global)
    #[arg(long, global = true)]
    endpoint: Option<String>,
    /// API version path segment (defaults to $REMO_API_VERSION or 1)
    #[arg(long, global = true)]
    api_version: Option<u32>,
    /// Log requests and responses to stderr
    #[arg(long, short = 'v', global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Command,
}

impl Cli {
    fn config(&self) -> Result<Config> {
        let mut config = Config::from_env_with_token(self.token.as_deref())?;
        if let Some(endpoint) = &self.endpoint {
            config.endpoint = endpoint.clone();
        }
        if let Some(version) = self.api_version {
            config.version = version;
        }
        Ok(config)
    }
}

/// `RUST_LOG` (or `warn`), plus client debug output when `-v` is given.
fn log_filter(verbose: bool) -> EnvFilter {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    if !verbose {
        return filter;
    }
    match "remo_core=debug".parse::<Directive>() {
        Ok(directive) => filter.add_directive(directive),
        Err(_) => filter,
    }
}

fn init_logger(verbose: bool) {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(verbose))
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let remo = Remo::from_config(&cli.config()?);
    let output = commands::run(&remo, cli.command)?;
    if !output.is_null() {
        println!("{}", serde_json::to_string_pretty(&output)?);
    }
    Ok(())
}
