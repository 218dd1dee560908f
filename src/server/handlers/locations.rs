//! Location API handlers.

use axum::{Json, extract::State};
use std::sync::Arc;

use crate::controller::Cards;

use super::super::state::AppState;

/// GET /api/locations - Location cards.
pub async fn list(State(state): State<Arc<AppState>>) -> Json<Cards> {
    Json(state.controller.cards())
}
