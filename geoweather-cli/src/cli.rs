use clap::Parser;
use geoweather_core::{Config, HttpFetcher, Orchestrator, PlaceName, WeatherError};
use std::{io, path::PathBuf};
use tracing::debug;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "geoweather", version, about = "Current weather for a place name")]
pub struct Cli {
    /// Place name; several words are joined with single spaces.
    #[arg(required = true, num_args = 1..)]
    pub city: Vec<String>,

    /// Settings file. Defaults to config.toml in the platform config directory.
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Do not print a notice for every received chunk.
    #[arg(long, short)]
    pub quiet: bool,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        let mut config = Config::load(self.config.as_deref())
            .map_err(|e| WeatherError::Config(one_line(&format!("{e:#}"))))?
            .with_api_key_from_env();
        if self.quiet {
            config.progress = false;
        }

        let place = PlaceName::from_words(&self.city);
        debug!(%place, progress = config.progress, "starting lookup");
        let fetcher = HttpFetcher::from_config(&config);

        let mut orchestrator =
            Orchestrator::new(&config, &fetcher, place, io::stdin().lock(), io::stdout());
        orchestrator.run().await?;

        Ok(())
    }
}

/// toml parse errors span several lines; stderr gets one line per failure.
fn one_line(message: &str) -> String {
    message
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}
