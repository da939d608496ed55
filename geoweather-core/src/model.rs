use chrono::NaiveDateTime;
use std::fmt;

/// Longest place name kept by a query, in characters. Longer input is cut.
pub const MAX_PLACE_NAME_CHARS: usize = 31;

/// Free-text place name bounded to `MAX_PLACE_NAME_CHARS`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlaceName(String);

impl PlaceName {
    /// Truncates at a character boundary when `raw` is too long.
    pub fn new(raw: &str) -> Self {
        Self(raw.chars().take(MAX_PLACE_NAME_CHARS).collect())
    }

    /// Join command-line words with single spaces, then bound the result.
    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let joined = words
            .into_iter()
            .map(|w| w.as_ref().to_owned())
            .collect::<Vec<_>>()
            .join(" ");
        Self::new(&joined)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for PlaceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// One lookup session. Fields stay `None` until the stage that owns them
/// succeeds.
#[derive(Debug, Clone, Default)]
pub struct WeatherQuery {
    pub place: PlaceName,
    /// Label of the geocoding match that was used.
    pub label: Option<String>,
    pub coordinates: Option<Coordinates>,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<i32>,
    pub observed_at: Option<NaiveDateTime>,
    pub last_error: Option<String>,
}

impl WeatherQuery {
    pub fn new(place: PlaceName) -> Self {
        Self { place, ..Self::default() }
    }
}
