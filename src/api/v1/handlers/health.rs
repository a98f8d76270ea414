/*
 * Responsibility
 * - GET /api/v1/health (疎通用)
 * - /api 配下なので gate を通らないことの確認にも使う
 */
use axum::{Json, http::StatusCode, response::IntoResponse};
use serde_json::json;

pub async fn health() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({"status": "ok"})))
}
