//! Organizer asset endpoints.

use axum::{
    Router,
    extract::{Path, State},
    http::header,
    response::IntoResponse,
    routing::get,
};

use opentrack_core::loader::load_organizers;

use crate::routes::AppError;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/organizer/{id}/image.png", get(image))
}

/// GET /organizer/{id}/image.png - the organizer's logo.
async fn image(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let organizers = load_organizers(&state.settings.organizers_dir());
    let organizer = organizers.get(&id.to_lowercase()).ok_or(AppError::NotFound)?;
    let image_path = organizer
        .directory
        .as_ref()
        .ok_or(AppError::NotFound)?
        .join("image.png");
    let bytes = std::fs::read(&image_path).map_err(|_| AppError::NotFound)?;

    Ok(([(header::CONTENT_TYPE, "image/png")], bytes))
}
