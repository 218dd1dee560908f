//! QR display handlers.

use axum::{
    Json,
    extract::State,
    http::{StatusCode, header},
    response::IntoResponse,
};
use std::sync::Arc;

use crate::render::QrDisplay;

use super::super::state::AppState;

/// GET /api/qr - What the QR image element shows right now.
pub async fn display(State(state): State<Arc<AppState>>) -> Json<QrDisplay> {
    Json(state.controller.display())
}

/// GET /api/qr.png - The displayed image as PNG.
pub async fn png(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, StatusCode> {
    let display = state.controller.display();
    if display.hidden {
        return Err(StatusCode::NOT_FOUND);
    }
    let image = display.image.ok_or(StatusCode::NOT_FOUND)?;

    Ok((
        [
            (header::CONTENT_TYPE, "image/png"),
            (header::CACHE_CONTROL, "no-store"),
        ],
        image.png.clone(),
    ))
}
