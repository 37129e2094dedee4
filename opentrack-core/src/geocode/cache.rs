//! File-backed geocoding cache.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{OpenTrackError, OpenTrackResult};

/// A resolved latitude/longitude pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

/// Persistent query → coordinates map, stored as one flat JSON object.
///
/// The file is the source of truth: every operation re-reads it under the
/// lock, so edits made while the server runs are picked up and concurrent
/// read-modify-write cycles cannot interleave. Entries never expire.
pub struct GeocodeCache {
    path: PathBuf,
    lock: Mutex<()>,
}

impl GeocodeCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        GeocodeCache { path: path.into(), lock: Mutex::new(()) }
    }

    /// Look up a previously cached query.
    pub fn get(&self, query: &str) -> Option<Coordinates> {
        let _guard = self.lock.lock().unwrap();
        read_entries(&self.path).get(query).copied()
    }

    /// Merge one entry into the cache file, creating it if needed.
    pub fn put(&self, query: &str, coordinates: Coordinates) -> OpenTrackResult<()> {
        let _guard = self.lock.lock().unwrap();
        let mut entries = read_entries(&self.path);
        entries.insert(query.to_string(), coordinates);

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&entries)
            .map_err(|err| OpenTrackError::Serialization(err.to_string()))?;
        let temp_path = self.path.with_extension("json.tmp");
        std::fs::write(&temp_path, content)?;
        std::fs::rename(&temp_path, &self.path)?;
        Ok(())
    }
}

/// Read the whole cache map; a missing or unreadable file is an empty cache.
fn read_entries(path: &Path) -> BTreeMap<String, Coordinates> {
    let Ok(content) = std::fs::read_to_string(path) else {
        return BTreeMap::new();
    };
    match serde_json::from_str(&content) {
        Ok(entries) => entries,
        Err(err) => {
            warn!("treating corrupt geocoding cache {} as empty: {}", path.display(), err);
            BTreeMap::new()
        }
    }
}
