//! Opportunistic geocoding of event locations.
//!
//! Events without explicit coordinates get them resolved from their location
//! text. Resolution is slow (the public Nominatim service allows roughly one
//! request per second), so the page-serving path never waits for it: a cache
//! miss schedules a background fetch and the coordinates show up on a later
//! load. Resolved coordinates persist in a JSON cache file, keyed by the
//! full location text.

mod cache;
mod provider;

pub use cache::{Coordinates, GeocodeCache};
pub use provider::{GeocodeProvider, Nominatim};

use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::Semaphore;
use tracing::{debug, warn};

use crate::event::Location;

/// Pause after every request to the geocoding service, per its usage policy.
const RATE_LIMIT_PAUSE: Duration = Duration::from_secs(1);

/// The query derived from an event location.
///
/// `text` is both what gets sent to the service and the cache key. The
/// fallback drops the street address for a coarser city-level search and is
/// only tried when the full query finds nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationQuery {
    pub text: String,
    pub fallback: Option<String>,
}

impl LocationQuery {
    /// Build the query for a location; `None` when there is nothing to send.
    pub fn from_location(location: &Location) -> Option<LocationQuery> {
        let text = location.text();
        if text.is_empty() {
            return None;
        }
        let fallback = Location { address: None, ..location.clone() }.text();
        let fallback = (!fallback.is_empty() && fallback != text).then_some(fallback);
        Some(LocationQuery { text, fallback })
    }
}

/// Shared geocoding service: a persistent cache in front of a rate-limited
/// provider.
///
/// Cloning is cheap; clones share the cache, the in-flight set and the
/// fetch permits.
#[derive(Clone)]
pub struct Geocoder {
    inner: Arc<GeocoderInner>,
}

struct GeocoderInner {
    provider: Box<dyn GeocodeProvider>,
    cache: GeocodeCache,
    in_flight: Mutex<HashSet<String>>,
    permits: Semaphore,
}

impl Geocoder {
    pub fn new(
        provider: Box<dyn GeocodeProvider>,
        cache: GeocodeCache,
        max_concurrent_requests: usize,
    ) -> Geocoder {
        Geocoder {
            inner: Arc::new(GeocoderInner {
                provider,
                cache,
                in_flight: Mutex::new(HashSet::new()),
                permits: Semaphore::new(max_concurrent_requests.max(1)),
            }),
        }
    }

    /// Cache-only lookup. On a miss a background fetch is scheduled, unless
    /// one is already underway for the same query, and `None` is returned
    /// right away; a later call may find the cache populated.
    pub fn lookup(&self, query: &LocationQuery) -> Option<Coordinates> {
        if let Some(found) = self.inner.cache.get(&query.text) {
            return Some(found);
        }
        self.schedule_fetch(query);
        None
    }

    /// Lookup that performs the fetch inline on a cache miss.
    pub async fn lookup_blocking(&self, query: &LocationQuery) -> Option<Coordinates> {
        if let Some(found) = self.inner.cache.get(&query.text) {
            return Some(found);
        }
        self.fetch(query).await
    }

    fn schedule_fetch(&self, query: &LocationQuery) {
        {
            let mut in_flight = self.inner.in_flight.lock().unwrap();
            if !in_flight.insert(query.text.clone()) {
                return;
            }
        }
        let geocoder = self.clone();
        let query = query.clone();
        tokio::spawn(async move {
            if geocoder.fetch(&query).await.is_none() {
                debug!("geocoding found nothing for '{}'", query.text);
            }
            geocoder.inner.in_flight.lock().unwrap().remove(&query.text);
        });
    }

    /// Resolve via the provider, first with the full query and then with the
    /// coarser fallback. A success is persisted under the full query; a
    /// double failure is not cached, so the query is retried on a later
    /// miss.
    async fn fetch(&self, query: &LocationQuery) -> Option<Coordinates> {
        let _permit = self.inner.permits.acquire().await.ok()?;

        // Another fetch may have landed while we waited for a permit.
        if let Some(found) = self.inner.cache.get(&query.text) {
            return Some(found);
        }

        for attempt in std::iter::once(query.text.as_str()).chain(query.fallback.as_deref()) {
            let resolved = self.inner.provider.geocode(attempt).await;
            tokio::time::sleep(RATE_LIMIT_PAUSE).await;
            match resolved {
                Ok(Some(coordinates)) => {
                    if let Err(err) = self.inner.cache.put(&query.text, coordinates) {
                        warn!("failed to persist geocoding result for '{}': {}", query.text, err);
                    }
                    return Some(coordinates);
                }
                Ok(None) => {}
                Err(err) => {
                    warn!("geocoding request for '{}' failed: {}", attempt, err);
                }
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MockProvider;
    use std::sync::atomic::Ordering;
    use tempfile::TempDir;

    fn query(text: &str) -> LocationQuery {
        LocationQuery { text: text.to_string(), fallback: None }
    }

    /// Poll the cache until a background fetch lands.
    async fn wait_for(geocoder: &Geocoder, query: &LocationQuery) -> Option<Coordinates> {
        for _ in 0..50 {
            tokio::time::sleep(Duration::from_millis(100)).await;
            if let Some(found) = geocoder.inner.cache.get(&query.text) {
                return Some(found);
            }
        }
        None
    }

    #[test]
    fn location_query_includes_a_coarser_fallback() {
        let location = Location {
            address: Some("Luckenwalder Str. 4-6".to_string()),
            city: Some("Berlin".to_string()),
            country: Some("Germany".to_string()),
            ..Location::default()
        };
        let query = LocationQuery::from_location(&location).unwrap();
        assert_eq!(query.text, "Luckenwalder Str. 4-6, Berlin, Germany");
        assert_eq!(query.fallback.as_deref(), Some("Berlin, Germany"));
    }

    #[test]
    fn location_query_skips_redundant_fallback() {
        let location = Location {
            city: Some("Berlin".to_string()),
            country: Some("Germany".to_string()),
            ..Location::default()
        };
        let query = LocationQuery::from_location(&location).unwrap();
        assert_eq!(query.text, "Berlin, Germany");
        assert_eq!(query.fallback, None);
    }

    #[test]
    fn location_query_is_none_for_empty_locations() {
        assert_eq!(LocationQuery::from_location(&Location::default()), None);
    }

    #[tokio::test(start_paused = true)]
    async fn cached_query_never_touches_the_provider() {
        let dir = TempDir::new().unwrap();
        let cache = GeocodeCache::new(dir.path().join("cache.json"));
        cache.put("Berlin, Germany", Coordinates { latitude: 52.52, longitude: 13.405 }).unwrap();

        let provider = MockProvider::new();
        let calls = provider.call_counter();
        let geocoder = Geocoder::new(Box::new(provider), cache, 1);

        let found = geocoder.lookup(&query("Berlin, Germany")).unwrap();
        assert_eq!(found.latitude, 52.52);
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let found = geocoder.lookup_blocking(&query("Berlin, Germany")).await.unwrap();
        assert_eq!(found.longitude, 13.405);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn miss_schedules_a_background_fetch() {
        let dir = TempDir::new().unwrap();
        let provider = MockProvider::new().with_answer("Berlin, Germany", 52.52, 13.405);
        let calls = provider.call_counter();
        let geocoder = Geocoder::new(
            Box::new(provider),
            GeocodeCache::new(dir.path().join("cache.json")),
            1,
        );

        let berlin = query("Berlin, Germany");
        assert_eq!(geocoder.lookup(&berlin), None);

        let found = wait_for(&geocoder, &berlin).await.unwrap();
        assert_eq!(found.latitude, 52.52);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(geocoder.lookup(&berlin).unwrap().longitude, 13.405);
    }

    #[tokio::test(start_paused = true)]
    async fn repeated_misses_share_one_fetch() {
        let dir = TempDir::new().unwrap();
        let provider = MockProvider::new().with_answer("Berlin, Germany", 52.52, 13.405);
        let calls = provider.call_counter();
        let geocoder = Geocoder::new(
            Box::new(provider),
            GeocodeCache::new(dir.path().join("cache.json")),
            1,
        );

        let berlin = query("Berlin, Germany");
        assert_eq!(geocoder.lookup(&berlin), None);
        assert_eq!(geocoder.lookup(&berlin), None);
        assert_eq!(geocoder.lookup(&berlin), None);

        wait_for(&geocoder, &berlin).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn blocking_lookup_fetches_and_caches() {
        let dir = TempDir::new().unwrap();
        let provider = MockProvider::new().with_answer("Lisbon, Portugal", 38.72, -9.14);
        let calls = provider.call_counter();
        let geocoder = Geocoder::new(
            Box::new(provider),
            GeocodeCache::new(dir.path().join("cache.json")),
            1,
        );

        let lisbon = query("Lisbon, Portugal");
        let found = geocoder.lookup_blocking(&lisbon).await.unwrap();
        assert_eq!(found.latitude, 38.72);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        geocoder.lookup_blocking(&lisbon).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn fallback_result_is_cached_under_the_full_query() {
        let dir = TempDir::new().unwrap();
        let provider = MockProvider::new().with_answer("Berlin, Germany", 52.52, 13.405);
        let calls = provider.call_counter();
        let geocoder = Geocoder::new(
            Box::new(provider),
            GeocodeCache::new(dir.path().join("cache.json")),
            1,
        );

        let full = LocationQuery {
            text: "Luckenwalder Str. 4-6, Berlin, Germany".to_string(),
            fallback: Some("Berlin, Germany".to_string()),
        };
        let found = geocoder.lookup_blocking(&full).await.unwrap();
        assert_eq!(found.latitude, 52.52);
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        // The next lookup hits the cache under the full text.
        assert_eq!(geocoder.lookup(&full).unwrap().latitude, 52.52);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn failures_are_not_cached() {
        let dir = TempDir::new().unwrap();
        let provider = MockProvider::failing();
        let calls = provider.call_counter();
        let geocoder = Geocoder::new(
            Box::new(provider),
            GeocodeCache::new(dir.path().join("cache.json")),
            1,
        );

        let atlantis = query("Atlantis");
        assert_eq!(geocoder.lookup_blocking(&atlantis).await, None);
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        // No negative entry was written; the query goes out again.
        assert_eq!(geocoder.lookup_blocking(&atlantis).await, None);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }
}
