/*
 * Responsibility
 * - v1 の公開ポイント (routes() の re-export など)
 * - /api 配下は gate の対象外 (path 分類で Excluded)
 */
pub mod handlers;
mod routes;

pub use routes::routes;
