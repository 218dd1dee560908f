//! Static file serving for the frontend.

use axum::{
    extract::{Path, State},
    http::{StatusCode, header},
    response::{Html, IntoResponse, Response},
};
use include_dir::{Dir, include_dir};
use std::sync::Arc;

use super::state::AppState;

/// Embedded frontend distribution files.
static FRONTEND_DIST: Dir = include_dir!("$CARGO_MANIFEST_DIR/frontend/dist");

/// Serve index.html with a cache-busting parameter and the initial view
/// state injected.
pub async fn index_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let Some(file) = FRONTEND_DIST.get_file("index.html") else {
        return (StatusCode::NOT_FOUND, "Frontend not built").into_response();
    };

    let contents = String::from_utf8_lossy(file.contents());
    // Inject cache-busting parameter into script/link tags
    let cache_bust = format!("?v={}", state.boot_time);
    let busted = contents
        .replace(".js\"", &format!(".js{}\"", cache_bust))
        .replace(".css\"", &format!(".css{}\"", cache_bust));

    // Inject the view state so the first paint needs no API round-trip
    let view = state.controller.view().await;
    let view_json = match serde_json::to_string(&view) {
        // Payloads are user text; keep them from closing the script tag
        Ok(json) => json.replace('<', "\\u003c"),
        Err(e) => {
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to serialize state: {}", e),
            )
                .into_response();
        }
    };
    let script = format!("<script>window.__BONQR_STATE={}</script></head>", view_json);
    let busted = busted.replace("</head>", &script);

    Html(busted).into_response()
}

/// Cache policy for fingerprinted assets; `index.html` busts it per boot.
const ASSET_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// GET /assets/*path - Embedded stylesheet and script.
pub async fn asset_handler(Path(path): Path<String>) -> Response {
    let name = path.split_once('?').map_or(path.as_str(), |(name, _)| name);
    let Some(file) = FRONTEND_DIST.get_dir("assets").and_then(|dir| {
        dir.files()
            .find(|f| f.path().file_name().is_some_and(|n| n == name))
    }) else {
        tracing::debug!(asset = name, "unknown asset requested");
        return StatusCode::NOT_FOUND.into_response();
    };

    let content_type = mime_guess::from_path(name).first_or_octet_stream();
    (
        [
            (header::CONTENT_TYPE, content_type.essence_str().to_string()),
            (header::CACHE_CONTROL, ASSET_CACHE_CONTROL.to_string()),
        ],
        file.contents(),
    )
        .into_response()
}
