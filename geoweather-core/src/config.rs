use anyhow::{Context, Result, anyhow, bail};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

/// Environment variable holding the Geoapify API key.
pub const API_KEY_ENV: &str = "GEOAPIFY_API_KEY";

pub const DEFAULT_GEOCODE_ENDPOINT: &str = "https://api.geoapify.com/v1/geocode/search";
pub const DEFAULT_WEATHER_ENDPOINT: &str = "https://api.open-meteo.com/v1/forecast";
pub const DEFAULT_USER_AGENT: &str = "weather_app/1.0";
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

/// Base URLs of the two remote services.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Endpoints {
    pub geocode: String,
    pub weather: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            geocode: DEFAULT_GEOCODE_ENDPOINT.to_string(),
            weather: DEFAULT_WEATHER_ENDPOINT.to_string(),
        }
    }
}

/// Request policy applied to every outbound call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpSettings {
    pub timeout_secs: u64,
    pub max_redirects: usize,
    pub user_agent: String,
    /// Largest accepted response body in bytes. Unbounded when unset.
    pub max_body_bytes: Option<usize>,
}

impl HttpSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            max_body_bytes: None,
        }
    }
}

/// Runtime configuration.
///
/// Example TOML:
/// [endpoints]
/// geocode = "http://127.0.0.1:8080/geocode"
///
/// [http]
/// timeout_secs = 5
///
/// The API key is never read from the file, only from the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Print a notice on stdout for every received body chunk.
    pub progress: bool,
    pub endpoints: Endpoints,
    pub http: HttpSettings,

    #[serde(skip)]
    api_key: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            progress: true,
            endpoints: Endpoints::default(),
            http: HttpSettings::default(),
            api_key: None,
        }
    }
}

impl Config {
    /// Load settings from `path`, or from the platform config file when no
    /// path is given. A missing platform file yields defaults; a missing
    /// explicit file is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => {
                if !path.exists() {
                    bail!("Config file not found: {}", path.display());
                }
                path.to_path_buf()
            }
            None => {
                let path = Self::config_file_path()?;
                if !path.exists() {
                    return Ok(Self::default());
                }
                path
            }
        };

        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::from_toml(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        let cfg: Config = toml::from_str(contents)?;

        if cfg.http.timeout_secs == 0 {
            bail!("http.timeout_secs must be greater than zero");
        }
        if cfg.endpoints.geocode.trim().is_empty() || cfg.endpoints.weather.trim().is_empty() {
            bail!("endpoint URLs must not be empty");
        }

        Ok(cfg)
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "geoweather", "geoweather")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Pick up the API key from `GEOAPIFY_API_KEY`.
    pub fn with_api_key_from_env(self) -> Self {
        let raw = std::env::var(API_KEY_ENV).ok();
        self.with_raw_api_key(raw)
    }

    pub fn with_api_key(self, key: impl Into<String>) -> Self {
        self.with_raw_api_key(Some(key.into()))
    }

    fn with_raw_api_key(mut self, raw: Option<String>) -> Self {
        self.api_key = raw
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        self
    }

    /// Returns the API key, if one was supplied and is not blank.
    pub fn api_key(&self) -> Option<&str> {
        self.api_key.as_deref()
    }
}
