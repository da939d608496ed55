//! Geoapify forward geocoding: request URL, response parsing and the
//! operator prompt used when a name matches several places.

use serde::Deserialize;
use serde_json::Value;
use std::io::{BufRead, Write};
use tracing::{debug, info};

use crate::{
    accumulator::ResponseBody,
    error::ParseError,
    json::lenient,
    model::{Coordinates, PlaceName},
};

const UNNAMED_LABEL: &str = "(unnamed location)";

/// One place matching the searched name.
#[derive(Debug, Clone, PartialEq)]
pub struct GeocodeCandidate {
    pub label: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl GeocodeCandidate {
    /// Both coordinates, if the entry provided them.
    pub fn coordinates(&self) -> Option<Coordinates> {
        Some(Coordinates {
            latitude: self.latitude?,
            longitude: self.longitude?,
        })
    }
}

/// The match picked for the weather lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedLocation {
    pub label: String,
    pub coordinates: Coordinates,
}

#[derive(Debug, Deserialize)]
struct GeoapifyResponse {
    #[serde(default, deserialize_with = "lenient")]
    features: Option<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
struct GeoFeature {
    #[serde(default, deserialize_with = "lenient")]
    properties: Option<GeoProperties>,
    #[serde(default, deserialize_with = "lenient")]
    geometry: Option<GeoGeometry>,
}

#[derive(Debug, Deserialize)]
struct GeoProperties {
    #[serde(default, deserialize_with = "lenient")]
    lat: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    lon: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    formatted: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GeoGeometry {
    // GeoJSON nests this array differently per geometry type, so it is
    // inspected by hand rather than typed.
    coordinates: Option<Value>,
}

/// Build the search URL. Both the place text and the key are percent-encoded.
pub fn geocode_url(endpoint: &str, place: &PlaceName, api_key: &str) -> String {
    format!(
        "{}?text={}&apiKey={}",
        endpoint,
        urlencoding::encode(place.as_str()),
        urlencoding::encode(api_key),
    )
}

/// Parse a geocoding response into its candidates, in response order.
///
/// An empty result set is `ParseError::NoResults`, never an empty list.
pub fn parse_candidates(body: ResponseBody) -> Result<Vec<GeocodeCandidate>, ParseError> {
    let parsed: GeoapifyResponse = serde_json::from_slice(body.as_bytes())
        .inspect_err(|_| debug!(body = %body.snippet(), "unparsable geocoding response"))?;
    let features = parsed.features.ok_or(ParseError::MissingField("features"))?;

    if features.is_empty() {
        return Err(ParseError::NoResults);
    }

    Ok(features
        .into_iter()
        // A feature that is not an object still takes its place in the list.
        .map(|entry| serde_json::from_value::<GeoFeature>(entry).unwrap_or_default())
        .map(to_candidate)
        .collect())
}

fn to_candidate(feature: GeoFeature) -> GeocodeCandidate {
    let mut latitude = None;
    let mut longitude = None;
    let mut label = None;

    if let Some(props) = feature.properties {
        if let (Some(lat), Some(lon)) = (props.lat, props.lon) {
            latitude = Some(lat);
            longitude = Some(lon);
        }
        label = props.formatted.or(props.name);
    }

    // GeoJSON order is [longitude, latitude].
    if latitude.is_none() {
        let coords = feature
            .geometry
            .and_then(|g| g.coordinates)
            .and_then(|c| c.as_array().cloned())
            .filter(|c| c.len() >= 2);

        if let Some(coords) = coords {
            longitude = coords[0].as_f64();
            latitude = coords[1].as_f64();
        }
    }

    GeocodeCandidate {
        label: label.unwrap_or_else(|| UNNAMED_LABEL.to_string()),
        latitude,
        longitude,
    }
}

/// Pick one candidate. A single match is taken as is; several matches are
/// listed on `output` and the operator's 1-based choice is read from `input`.
pub fn select_candidate<R, W>(
    place: &PlaceName,
    mut candidates: Vec<GeocodeCandidate>,
    input: &mut R,
    output: &mut W,
) -> Result<GeocodeCandidate, ParseError>
where
    R: BufRead,
    W: Write,
{
    match candidates.len() {
        0 => Err(ParseError::NoResults),
        1 => {
            let only = candidates.remove(0);
            writeln!(output, "Found: {}", only.label).map_err(prompt_error)?;
            Ok(only)
        }
        count => {
            show_choices(place, &candidates, output).map_err(prompt_error)?;

            let mut line = String::new();
            let read = input.read_line(&mut line).map_err(prompt_error)?;
            if read == 0 {
                return Err(ParseError::InvalidSelection("no input".to_string()));
            }

            let index = parse_choice(line.trim(), count)?;
            debug!(index, count, "operator selected candidate");
            Ok(candidates.swap_remove(index - 1))
        }
    }
}

fn show_choices<W: Write>(
    place: &PlaceName,
    candidates: &[GeocodeCandidate],
    output: &mut W,
) -> std::io::Result<()> {
    writeln!(output, "Multiple locations match \"{place}\":")?;
    for (i, candidate) in candidates.iter().enumerate() {
        writeln!(output, "  {}) {}", i + 1, candidate.label)?;
    }
    write!(output, "Select a location [1-{}]: ", candidates.len())?;
    output.flush()
}

fn parse_choice(text: &str, count: usize) -> Result<usize, ParseError> {
    let index: usize = text
        .parse()
        .map_err(|_| ParseError::InvalidSelection(format!("{text:?} is not a number")))?;

    if index == 0 || index > count {
        return Err(ParseError::InvalidSelection(format!(
            "{index} is outside 1-{count}"
        )));
    }

    Ok(index)
}

fn prompt_error(err: std::io::Error) -> ParseError {
    ParseError::Prompt(err.to_string())
}

/// Parse, disambiguate and require usable coordinates for the chosen match.
pub fn resolve<R, W>(
    place: &PlaceName,
    body: ResponseBody,
    input: &mut R,
    output: &mut W,
) -> Result<ResolvedLocation, ParseError>
where
    R: BufRead,
    W: Write,
{
    let candidates = parse_candidates(body)?;
    info!(count = candidates.len(), "geocoding candidates found");

    let chosen = select_candidate(place, candidates, input, output)?;
    let coordinates = chosen
        .coordinates()
        .ok_or_else(|| ParseError::MissingCoordinates(chosen.label.clone()))?;

    Ok(ResolvedLocation { label: chosen.label, coordinates })
}
