//! Form API handlers.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::clipboard::CopyOutcome;
use crate::controller::{FieldsView, SubmitForm, ViewState};

use super::super::state::AppState;

/// GET /api/state - Everything the UI renders.
pub async fn state(State(state): State<Arc<AppState>>) -> Json<ViewState> {
    Json(state.controller.view().await)
}

/// Request body for a selector change.
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    /// Selector value: a location name, `__custom__`, or empty
    #[serde(default)]
    pub name: String,
}

/// POST /api/selection - Change the active location.
pub async fn select(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SelectRequest>,
) -> Json<FieldsView> {
    Json(state.controller.select_location(&req.name).await)
}

/// POST /api/generate - Submit the form.
///
/// Answers 204 when BON or operator is missing. Render failures are not
/// surfaced: the returned display is simply still hidden.
pub async fn generate(
    State(state): State<Arc<AppState>>,
    Json(form): Json<SubmitForm>,
) -> Response {
    match state.controller.submit(form).await {
        Some(submission) => Json(submission).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

/// Response body for a copy action.
#[derive(Debug, Serialize)]
pub struct CopyResponse {
    pub outcome: CopyOutcome,
    pub label: &'static str,
}

/// POST /api/copy - Copy the last payload to the clipboard.
pub async fn copy(State(state): State<Arc<AppState>>) -> Json<CopyResponse> {
    let outcome = state.controller.copy().await;
    Json(CopyResponse {
        outcome,
        label: state.controller.copy_label().await,
    })
}
