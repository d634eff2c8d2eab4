//! # Bayesball - command-line entry point
//!
//! 1. Parse arguments
//! 2. Load the optional TOML config
//! 3. Initialize tracing (`RUST_LOG` wins over the config's `log_filter`)
//! 4. Run the command and print its output
//!
//! Errors are printed in the requested format and mapped to a semantic exit
//! code.

#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used)]
#![deny(clippy::panic)]
#![deny(clippy::expect_used)]

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

use bayesball::Error;
use bayesball::cli::Cli;
use bayesball::commands::execute_command;
use bayesball::config::{Config, OutputFormat};
use bayesball::json::{ErrorDetail, JsonError};

fn main() -> ExitCode {
    let cli = Cli::parse();
    let format_flag = cli.format;

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            init_tracing("warn");
            return report(&err, format_flag.unwrap_or_default());
        }
    };
    init_tracing(&config.log_filter);

    let format = format_flag.unwrap_or(config.format);
    match run(cli, &config, format) {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(err) => report(&err, format),
    }
}

fn run(cli: Cli, config: &Config, format: OutputFormat) -> anyhow::Result<String> {
    let model = cli
        .model
        .clone()
        .unwrap_or_else(|| config.default_model.clone());
    info!(command = ?cli.command, "running");

    let output = execute_command(cli.command, &model, format, config)?;
    Ok(output)
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    match cli.config.as_deref() {
        Some(path) => Config::load(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(Config::default()),
    }
}

/// Initialize tracing subscriber with environment filter.
fn init_tracing(fallback: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(fallback)))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

/// Print the error in the requested format and map it to an exit code.
fn report(err: &anyhow::Error, format: OutputFormat) -> ExitCode {
    let typed = err.downcast_ref::<Error>();
    let code = typed.map_or("UNKNOWN", Error::code);
    let exit_code = typed.map_or(1, Error::exit_code);
    error!(code, "{err:#}");

    match format {
        OutputFormat::Text => eprintln!("error: {err:#}"),
        OutputFormat::Json => {
            let body = typed.map_or_else(
                || JsonError {
                    success: false,
                    error: ErrorDetail {
                        code: code.to_string(),
                        message: format!("{err:#}"),
                        exit_code,
                    },
                },
                JsonError::from,
            );
            match serde_json::to_string_pretty(&body) {
                Ok(json) => println!("{json}"),
                Err(json_err) => eprintln!("error: {err:#} (JSON rendering failed: {json_err})"),
            }
        }
    }
    ExitCode::from(u8::try_from(exit_code).unwrap_or(1))
}
