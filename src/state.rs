use std::sync::Arc;

use opentrack_core::event::Event;
use opentrack_core::geocode::Geocoder;
use opentrack_core::loader::{self, ReferenceData};
use opentrack_core::settings::Settings;

/// Shared application state: the settings plus the geocoding service.
///
/// Event and reference data are deliberately not part of the state; they
/// are re-read from disk on every request so content edits show up without
/// a restart. The data set is small enough that this stays cheap.
#[derive(Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub geocoder: Geocoder,
}

impl AppState {
    pub fn new(settings: Settings, geocoder: Geocoder) -> AppState {
        AppState { settings: Arc::new(settings), geocoder }
    }

    pub fn load_reference(&self) -> ReferenceData {
        ReferenceData::load(&self.settings)
    }

    pub fn load_events(&self) -> Vec<Event> {
        let reference = self.load_reference();
        loader::load_events(&self.settings, &reference, &self.geocoder)
    }
}
