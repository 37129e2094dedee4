//! iCalendar download endpoints.

use axum::{
    Router,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
};

use opentrack_core::ics::{event_to_ics, events_feed};

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/event/{file}", get(event_ics))
        .route("/events.ics", get(feed))
}

/// GET /event/{id}.ics - calendar download for a single event.
async fn event_ics(
    State(state): State<AppState>,
    Path(file): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = file.strip_suffix(".ics").ok_or(AppError::NotFound)?;
    let event = state
        .load_events()
        .into_iter()
        .find(|event| event.id == id)
        .ok_or(AppError::NotFound)?;

    Ok(ics_response(event_to_ics(&event), &format!("{id}.ics")))
}

/// GET /events.ics - every event in one subscribable feed.
async fn feed(State(state): State<AppState>) -> impl IntoResponse {
    ics_response(events_feed(&state.load_events()), "events.ics")
}

fn ics_response(content: String, filename: &str) -> impl IntoResponse + use<> {
    (
        [
            (header::CONTENT_TYPE, "text/calendar".to_string()),
            (header::CONTENT_DISPOSITION, format!("attachment; filename={filename}")),
        ],
        content,
    )
}
