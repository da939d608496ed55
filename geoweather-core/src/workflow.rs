//! The lookup workflow: geocode the place, fetch its weather, report.
//!
//! Stages run strictly one after another; a failure at any stage ends the
//! run in `State::Failed` and no later request is issued.

use std::io::{BufRead, Write};
use tracing::{debug, info, warn};

use crate::{
    config::Config,
    error::WeatherError,
    fetch::Fetcher,
    geocode::{self, geocode_url},
    model::{PlaceName, WeatherQuery},
    report::format_report,
    weather::{parse_weather, weather_url},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Start,
    GeocodeRequested,
    GeocodeParsed,
    WeatherRequested,
    WeatherParsed,
    Reported,
}

impl Stage {
    /// Stage in which `err` is raised.
    pub fn of(err: &WeatherError) -> Stage {
        match err {
            WeatherError::Usage(_) | WeatherError::MissingApiKey | WeatherError::Config(_) => {
                Stage::Start
            }
            WeatherError::GeocodeTransport(_) => Stage::GeocodeRequested,
            WeatherError::GeocodeParse(_) => Stage::GeocodeParsed,
            WeatherError::WeatherTransport(_) => Stage::WeatherRequested,
            WeatherError::WeatherParse(_) => Stage::WeatherParsed,
            WeatherError::Output(_) => Stage::Reported,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum State {
    /// Last stage completed.
    Active(Stage),
    Failed { stage: Stage, reason: String },
}

/// Drives one query through every stage.
///
/// `input` feeds the disambiguation prompt; `output` receives the prompt,
/// the auto-selection notice and the final report.
#[derive(Debug)]
pub struct Orchestrator<'a, F: ?Sized, R, W> {
    config: &'a Config,
    fetcher: &'a F,
    input: R,
    output: W,
    query: WeatherQuery,
    state: State,
}

impl<'a, F, R, W> Orchestrator<'a, F, R, W>
where
    F: Fetcher + ?Sized,
    R: BufRead,
    W: Write,
{
    pub fn new(config: &'a Config, fetcher: &'a F, place: PlaceName, input: R, output: W) -> Self {
        Self {
            config,
            fetcher,
            input,
            output,
            query: WeatherQuery::new(place),
            state: State::Active(Stage::Start),
        }
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn query(&self) -> &WeatherQuery {
        &self.query
    }

    pub fn into_parts(self) -> (WeatherQuery, W) {
        (self.query, self.output)
    }

    pub async fn run(&mut self) -> Result<(), WeatherError> {
        let result = self.advance().await;

        if let Err(err) = &result {
            let stage = Stage::of(err);
            let reason = err.to_string();
            warn!(?stage, %reason, "lookup failed");

            self.query.last_error = Some(reason.clone());
            self.state = State::Failed { stage, reason };
        }

        result
    }

    async fn advance(&mut self) -> Result<(), WeatherError> {
        if self.query.place.is_blank() {
            return Err(WeatherError::Usage("a place name is required".to_string()));
        }
        let config = self.config;
        let api_key = config.api_key().ok_or(WeatherError::MissingApiKey)?;

        let url = geocode_url(&config.endpoints.geocode, &self.query.place, api_key);
        debug!(place = %self.query.place, endpoint = %config.endpoints.geocode, "geocode request");
        self.enter(Stage::GeocodeRequested);
        let body = self.fetcher.get(&url).await.map_err(WeatherError::GeocodeTransport)?;

        let location = geocode::resolve(&self.query.place, body, &mut self.input, &mut self.output)
            .map_err(WeatherError::GeocodeParse)?;
        info!(
            label = %location.label,
            lat = location.coordinates.latitude,
            lon = location.coordinates.longitude,
            "location resolved"
        );
        self.query.label = Some(location.label);
        self.query.coordinates = Some(location.coordinates);
        self.enter(Stage::GeocodeParsed);

        let url = weather_url(&config.endpoints.weather, location.coordinates);
        debug!(%url, "weather request");
        self.enter(Stage::WeatherRequested);
        let body = self.fetcher.get(&url).await.map_err(WeatherError::WeatherTransport)?;

        let reading = parse_weather(body).map_err(WeatherError::WeatherParse)?;
        self.query.temperature_c = reading.temperature_c;
        self.query.humidity_pct = reading.humidity_pct;
        self.query.observed_at = reading.observed_at;
        self.enter(Stage::WeatherParsed);

        self.output
            .write_all(format_report(&self.query).as_bytes())
            .and_then(|()| self.output.flush())
            .map_err(|e| WeatherError::Output(e.to_string()))?;
        self.enter(Stage::Reported);

        Ok(())
    }

    fn enter(&mut self, stage: Stage) {
        info!(?stage, "stage reached");
        self.state = State::Active(stage);
    }
}
