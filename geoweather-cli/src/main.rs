//! Binary crate for the `geoweather` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Logging setup
//! - Mapping failures to process exit codes

use clap::Parser;
use geoweather_core::WeatherError;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

mod cli;

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cmd = match cli::Cli::try_parse() {
        Ok(cmd) => cmd,
        Err(err) => {
            // --help and --version are reported as errors by clap too.
            let code = if err.use_stderr() { 1 } else { 0 };
            // Nothing is left to report to if stdout/stderr are gone.
            let _ = err.print();
            return ExitCode::from(code);
        }
    };

    match cmd.run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("{err}");
            let code = err.downcast_ref::<WeatherError>().map_or(1, WeatherError::exit_code);
            ExitCode::from(code)
        }
    }
}
