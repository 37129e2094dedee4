//! JSON API endpoints.

use std::collections::BTreeMap;

use axum::{Json, Router, extract::State, routing::get};

use opentrack_core::event::Event;
use opentrack_core::geocode::{Coordinates, LocationQuery};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/events", get(events))
        .route("/api/coordinates", get(coordinates))
}

/// GET /api/events - the full enriched event list.
async fn events(State(state): State<AppState>) -> Json<Vec<Event>> {
    Json(state.load_events())
}

/// GET /api/coordinates - event id to coordinates, resolving uncached
/// locations inline. This is the one endpoint that waits for geocoding, so
/// map views get a complete answer.
async fn coordinates(State(state): State<AppState>) -> Json<BTreeMap<String, Coordinates>> {
    let mut resolved = BTreeMap::new();
    for event in state.load_events() {
        let coordinates = match (event.location.latitude, event.location.longitude) {
            (Some(latitude), Some(longitude)) => Some(Coordinates { latitude, longitude }),
            _ => match LocationQuery::from_location(&event.location) {
                Some(query) => state.geocoder.lookup_blocking(&query).await,
                None => None,
            },
        };
        if let Some(coordinates) = coordinates {
            resolved.insert(event.id, coordinates);
        }
    }
    Json(resolved)
}
