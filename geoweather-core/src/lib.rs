//! Core library for the `geoweather` CLI.
//!
//! This crate defines:
//! - Response body accumulation and the HTTP fetcher
//! - Geoapify geocoding with interactive disambiguation
//! - Open-Meteo current-weather parsing
//! - The lookup workflow and its error taxonomy
//!
//! It is used by `geoweather-cli`, but can also be driven by other binaries
//! through the `Fetcher` trait.

pub mod accumulator;
pub mod config;
pub mod error;
pub mod fetch;
pub mod geocode;
mod json;
pub mod model;
pub mod report;
pub mod weather;
pub mod workflow;

pub use accumulator::{ResponseAccumulator, ResponseBody};
pub use config::Config;
pub use error::{FetchError, ParseError, WeatherError};
pub use fetch::{Fetcher, HttpFetcher};
pub use geocode::{GeocodeCandidate, ResolvedLocation};
pub use model::{Coordinates, PlaceName, WeatherQuery};
pub use weather::WeatherReading;
pub use workflow::{Orchestrator, Stage, State};
