//! Open-Meteo current conditions.

use chrono::NaiveDateTime;
use serde::Deserialize;
use tracing::debug;

use crate::{accumulator::ResponseBody, error::ParseError, json::lenient, model::Coordinates};

const CURRENT_FIELDS: &str = "temperature_2m,relative_humidity_2m";
const TIME_FORMAT: &str = "%Y-%m-%dT%H:%M";

#[derive(Debug, Deserialize)]
struct OpenMeteoResponse {
    #[serde(default, deserialize_with = "lenient")]
    current: Option<OmCurrent>,
}

#[derive(Debug, Deserialize)]
struct OmCurrent {
    #[serde(default, deserialize_with = "lenient")]
    time: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    temperature_2m: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    relative_humidity_2m: Option<f64>,
}

/// Values read from the `current` block. Any of them may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherReading {
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<i32>,
    /// Observation time in the location's reported time zone.
    pub observed_at: Option<NaiveDateTime>,
}

pub fn weather_url(endpoint: &str, at: Coordinates) -> String {
    format!(
        "{}?latitude={:.6}&longitude={:.6}&current={}",
        endpoint, at.latitude, at.longitude, CURRENT_FIELDS
    )
}

/// Only malformed JSON or a missing `current` object is an error; absent or
/// mistyped readings are left unset. Humidity is truncated to whole percent.
pub fn parse_weather(body: ResponseBody) -> Result<WeatherReading, ParseError> {
    let parsed: OpenMeteoResponse = serde_json::from_slice(body.as_bytes())
        .inspect_err(|_| debug!(body = %body.snippet(), "unparsable weather response"))?;
    let current = parsed.current.ok_or(ParseError::MissingField("current"))?;

    Ok(WeatherReading {
        temperature_c: current.temperature_2m,
        humidity_pct: current.relative_humidity_2m.map(|h| h as i32),
        observed_at: current
            .time
            .and_then(|t| NaiveDateTime::parse_from_str(&t, TIME_FORMAT).ok()),
    })
}
