use thiserror::Error;

/// Failure while exchanging a request/response with a remote service.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The HTTP client could not be configured.
    #[error("could not build HTTP client: {0}")]
    Client(String),

    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("redirect failed: {0}")]
    Redirect(String),

    /// The server answered with a non-2xx status.
    #[error("server returned HTTP {status}")]
    Status { status: u16 },

    #[error("request failed: {0}")]
    Request(String),

    /// The body stream broke off mid-transfer.
    #[error("failed to read response body: {0}")]
    Body(String),

    /// The response buffer refused a chunk, either for lack of memory or
    /// because the configured size limit was reached.
    #[error("response buffer could not grow after {received} bytes")]
    Accumulate { received: usize },
}

/// Failure while interpreting a successfully received body.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed JSON: {0}")]
    Malformed(String),

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("no results")]
    NoResults,

    #[error("invalid selection: {0}")]
    InvalidSelection(String),

    #[error("location `{0}` has no usable coordinates")]
    MissingCoordinates(String),

    #[error("could not read selection: {0}")]
    Prompt(String),
}

impl From<serde_json::Error> for ParseError {
    fn from(err: serde_json::Error) -> Self {
        ParseError::Malformed(err.to_string())
    }
}

/// Workflow-level failure. Each variant maps to its own process exit code.
#[derive(Error, Debug)]
pub enum WeatherError {
    #[error("usage: {0}")]
    Usage(String),

    #[error("missing GEOAPIFY_API_KEY environment variable")]
    MissingApiKey,

    #[error("configuration error: {0}")]
    Config(String),

    #[error("failed to fetch geocoding data: {0}")]
    GeocodeTransport(#[source] FetchError),

    #[error("failed to parse geocoding data: {0}")]
    GeocodeParse(#[source] ParseError),

    #[error("failed to fetch weather data: {0}")]
    WeatherTransport(#[source] FetchError),

    #[error("failed to parse weather data: {0}")]
    WeatherParse(#[source] ParseError),

    #[error("failed to write report: {0}")]
    Output(String),
}

impl WeatherError {
    pub fn exit_code(&self) -> u8 {
        match self {
            WeatherError::Usage(_) | WeatherError::Output(_) => 1,
            WeatherError::MissingApiKey | WeatherError::Config(_) => 2,
            WeatherError::GeocodeTransport(_) => 3,
            WeatherError::GeocodeParse(_) => 4,
            WeatherError::WeatherTransport(_) => 5,
            WeatherError::WeatherParse(_) => 6,
        }
    }
}
