//! Runtime settings for the opentrack site.
//!
//! Settings come from an optional `opentrack.toml` in the working directory,
//! with `OPENTRACK_*` environment variables layered on top (nested keys use
//! `__`, e.g. `OPENTRACK_GEOCODER__USER_AGENT`). Everything has a default,
//! so running with no configuration at all works.

use std::path::PathBuf;

use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::{OpenTrackError, OpenTrackResult};

const CONFIG_FILE: &str = "opentrack.toml";
const ENV_PREFIX: &str = "OPENTRACK";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Root of the content tree holding events and reference records.
    pub data_dir: PathBuf,
    /// JSON file the geocoding cache persists to.
    pub cache_file: PathBuf,
    /// Port the HTTP server binds on.
    pub port: u16,
    pub geocoder: GeocoderSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GeocoderSettings {
    /// Base URL of a Nominatim-compatible search endpoint.
    pub base_url: String,
    /// User-Agent sent with geocoding requests, as Nominatim requires.
    pub user_agent: String,
    /// How many geocoding requests may run at once.
    pub max_concurrent_requests: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            data_dir: PathBuf::from("data"),
            cache_file: PathBuf::from(".cache/geocoding_cache.json"),
            port: 8000,
            geocoder: GeocoderSettings::default(),
        }
    }
}

impl Default for GeocoderSettings {
    fn default() -> Self {
        GeocoderSettings {
            base_url: "https://nominatim.openstreetmap.org".to_string(),
            user_agent: "opentrack/0.1 (+https://opentrack.dev)".to_string(),
            max_concurrent_requests: 1,
        }
    }
}

impl Settings {
    pub fn load() -> OpenTrackResult<Self> {
        Config::builder()
            .add_source(File::from(PathBuf::from(CONFIG_FILE)).required(false))
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()
            .map_err(|err| OpenTrackError::Config(err.to_string()))?
            .try_deserialize()
            .map_err(|err| OpenTrackError::Config(err.to_string()))
    }

    pub fn events_dir(&self) -> PathBuf {
        self.data_dir.join("events")
    }

    pub fn organizers_dir(&self) -> PathBuf {
        self.data_dir.join("organizers")
    }

    pub fn languages_dir(&self) -> PathBuf {
        self.data_dir.join("languages")
    }

    pub fn currencies_dir(&self) -> PathBuf {
        self.data_dir.join("currencies")
    }

    pub fn countries_dir(&self) -> PathBuf {
        self.data_dir.join("countries")
    }
}
