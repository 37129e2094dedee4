//! Directory loaders for events and reference data.
//!
//! Every record lives in its own subdirectory holding a YAML descriptor and
//! an optional Markdown description (`data/events/rustconf/event.yaml`,
//! `data/organizers/ferrous/organizer.yaml`, and so on). Loaders degrade
//! per record: a malformed descriptor is logged and skipped, a missing root
//! directory yields no records, and nothing is cached between calls.

mod events;
mod reference;

pub use events::load_events;
pub use reference::{
    ReferenceData, load_countries, load_currencies, load_languages, load_organizers,
};

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use tracing::warn;

/// Markdown sidecar carrying the long-form description.
const DESCRIPTION_FILE: &str = "description.md";

/// Immediate subdirectories of `root`, skipping hidden entries.
fn subdirectories(root: &Path) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(root) else {
        return Vec::new();
    };
    let mut dirs: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .filter(|path| !dir_name(path).starts_with('.'))
        .collect();
    dirs.sort();
    dirs
}

/// Final path component as a string.
fn dir_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parse a YAML descriptor, logging and discarding files that do not parse.
fn parse_descriptor<T: DeserializeOwned>(path: &Path) -> Option<T> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) => {
            warn!("skipping unreadable descriptor {}: {}", path.display(), err);
            return None;
        }
    };
    match serde_yaml::from_str(&content) {
        Ok(record) => Some(record),
        Err(err) => {
            warn!("skipping malformed descriptor {}: {}", path.display(), err);
            None
        }
    }
}

/// The record's long-form description, if the sidecar file exists.
fn read_description(dir: &Path) -> Option<String> {
    std::fs::read_to_string(dir.join(DESCRIPTION_FILE)).ok()
}
