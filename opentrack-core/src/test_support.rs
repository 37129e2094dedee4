//! Shared helpers for the test suite.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::error::{OpenTrackError, OpenTrackResult};
use crate::geocode::{Coordinates, GeocodeCache, GeocodeProvider, Geocoder};
use crate::settings::Settings;

/// Write a file, creating parent directories as needed.
pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).unwrap();
    }
    std::fs::write(path, content).unwrap();
}

/// Settings pointed at a test data directory.
pub fn test_settings(data_dir: &Path) -> Settings {
    Settings {
        data_dir: data_dir.to_path_buf(),
        cache_file: data_dir.join(".cache/geocoding_cache.json"),
        ..Settings::default()
    }
}

/// Geocoder wired to a mock provider, with its cache file under `dir`.
pub fn test_geocoder(dir: &Path, provider: MockProvider) -> Geocoder {
    Geocoder::new(Box::new(provider), GeocodeCache::new(dir.join("geocoding_cache.json")), 1)
}

/// Scripted geocode backend that counts every request it receives.
pub struct MockProvider {
    answers: HashMap<String, Coordinates>,
    calls: Arc<AtomicUsize>,
    fail: bool,
}

impl MockProvider {
    pub fn new() -> MockProvider {
        MockProvider { answers: HashMap::new(), calls: Arc::new(AtomicUsize::new(0)), fail: false }
    }

    /// A provider whose every request errors out.
    pub fn failing() -> MockProvider {
        MockProvider { fail: true, ..MockProvider::new() }
    }

    pub fn with_answer(mut self, query: &str, latitude: f64, longitude: f64) -> MockProvider {
        self.answers.insert(query.to_string(), Coordinates { latitude, longitude });
        self
    }

    /// Handle onto the request counter, usable after the provider is boxed.
    pub fn call_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl GeocodeProvider for MockProvider {
    async fn geocode(&self, query: &str) -> OpenTrackResult<Option<Coordinates>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(OpenTrackError::Provider("scripted failure".to_string()));
        }
        Ok(self.answers.get(query).copied())
    }
}
