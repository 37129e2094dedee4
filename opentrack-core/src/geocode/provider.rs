//! Geocoding backends.

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::OpenTrackResult;
use crate::geocode::Coordinates;
use crate::settings::GeocoderSettings;

/// A service that resolves a free-text query into coordinates.
///
/// Behind a trait so the rest of the crate never talks to the network
/// directly and tests can substitute a scripted backend.
#[async_trait]
pub trait GeocodeProvider: Send + Sync {
    /// Resolve a query. `Ok(None)` means the service had no match.
    async fn geocode(&self, query: &str) -> OpenTrackResult<Option<Coordinates>>;
}

/// Client for a Nominatim-compatible `/search` endpoint.
pub struct Nominatim {
    client: reqwest::Client,
    base_url: String,
}

impl Nominatim {
    pub fn new(settings: &GeocoderSettings) -> OpenTrackResult<Self> {
        let client = reqwest::Client::builder()
            .user_agent(settings.user_agent.as_str())
            .build()?;
        Ok(Nominatim {
            client,
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }
}

/// One search hit. Nominatim returns coordinates as strings.
#[derive(Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

#[async_trait]
impl GeocodeProvider for Nominatim {
    async fn geocode(&self, query: &str) -> OpenTrackResult<Option<Coordinates>> {
        let places: Vec<Place> = self
            .client
            .get(format!("{}/search", self.base_url))
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        Ok(places.into_iter().next().and_then(|place| {
            let latitude = place.lat.parse().ok()?;
            let longitude = place.lon.parse().ok()?;
            Some(Coordinates { latitude, longitude })
        }))
    }
}
