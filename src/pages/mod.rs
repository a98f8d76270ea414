/*
 * Responsibility
 * - gate の下流にあるページ描画の stand-in (本物の renderer は別システム)
 * - gate が通したリクエストの path と viewer を返す
 */
mod viewer;

use axum::{Json, http::Uri, response::IntoResponse};
use serde_json::json;

pub use viewer::Viewer;

pub async fn render(uri: Uri, Viewer(viewer): Viewer) -> impl IntoResponse {
    Json(json!({
        "path": uri.path(),
        "viewer": viewer,
    }))
}
