//! Event loading and enrichment.

use std::path::{Path, PathBuf};

use crate::event::Event;
use crate::geocode::{Geocoder, LocationQuery};
use crate::loader::reference::ReferenceData;
use crate::loader::{dir_name, parse_descriptor, read_description, subdirectories};
use crate::settings::Settings;

/// Descriptor file marking a directory as an event.
const EVENT_DESCRIPTOR: &str = "event.yaml";

/// Directories directly under the data root that are never events.
const RESERVED_DATA_DIRS: &[&str] = &[
    "events",
    "organizers",
    "languages",
    "currencies",
    "countries",
    "static",
    "templates",
];

/// Load every event under the data directory, enriched with reference data
/// and cached coordinates, sorted by date (ties broken by id).
///
/// The listing is recomputed from disk on every call. An event whose
/// coordinates are not cached yet triggers a background geocode and shows
/// up without them until a later load finds the cache populated.
pub fn load_events(settings: &Settings, reference: &ReferenceData, geocoder: &Geocoder) -> Vec<Event> {
    let mut events: Vec<Event> = candidate_dirs(settings)
        .into_iter()
        .filter_map(|dir| load_event(&dir, reference, geocoder))
        .collect();
    events.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.id.cmp(&b.id)));
    events
}

/// Event directories: everything under `data/events`, plus legacy sibling
/// directories directly under the data root that carry an event descriptor.
fn candidate_dirs(settings: &Settings) -> Vec<PathBuf> {
    let mut dirs = subdirectories(&settings.events_dir());
    for dir in subdirectories(&settings.data_dir) {
        let name = dir_name(&dir);
        if RESERVED_DATA_DIRS.contains(&name.as_str()) {
            continue;
        }
        if dir.join(EVENT_DESCRIPTOR).exists() {
            dirs.push(dir);
        }
    }
    dirs
}

fn load_event(dir: &Path, reference: &ReferenceData, geocoder: &Geocoder) -> Option<Event> {
    let descriptor = dir.join(EVENT_DESCRIPTOR);
    if !descriptor.exists() {
        return None;
    }
    let mut event: Event = parse_descriptor(&descriptor)?;
    event.id = dir_name(dir);
    if let Some(text) = read_description(dir) {
        event.description = Some(text);
    }

    if let Some(name) = &event.organizer {
        event.organizer_details = reference.organizers.get(&name.to_lowercase()).cloned();
    }
    if let Some(language) = &event.language {
        event.language_details = reference.languages.get(&language.to_lowercase()).cloned();
    }
    if let Some(country) = &event.location.country {
        event.country_details = reference.countries.get(&country.to_lowercase()).cloned();
    }
    if let Some(currency) = event.price.as_ref().and_then(|price| price.currency()) {
        event.currency_details = reference.currencies.get(&currency.to_lowercase()).cloned();
    }

    if !event.location.has_coordinates() {
        if let Some(query) = LocationQuery::from_location(&event.location) {
            if let Some(coordinates) = geocoder.lookup(&query) {
                event.location.latitude = Some(coordinates.latitude);
                event.location.longitude = Some(coordinates.longitude);
            }
        }
    }

    Some(event)
}
