//! ページリクエストの gate → Allow なら Identity を extensions に入れて次へ、それ以外は redirect
//!
//! - 判定そのものは `services::gate::Gateway` が行う (ここは HTTP への変換だけ)
//! - Reject も `/unauthorized?reason=...` への redirect として返す
//! - gate は失敗しない。どの経路でも Decision が 1 つ決まる

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, StatusCode, header},
    middleware::{self, Next},
    response::{IntoResponse, Response},
};

use crate::services::gate::GateRequest;
use crate::state::AppState;

/// Router 全体に gate を掛ける。
///
/// 例：
/// ```ignore
/// let router = Router::new().fallback(pages::render);
/// let router = middleware::gate::apply(router, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 の from_fn は State extractor を受け取れないため、`from_fn_with_state` で明示的に state を渡す
    router.layer(middleware::from_fn_with_state(state, gate_middleware))
}

async fn gate_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Response {
    let verdict = state.gate.evaluate(GateRequest {
        path: req.uri().path(),
        query: req.uri().query(),
        headers: req.headers(),
    });

    match verdict.decision.location(state.gate.routes()) {
        None => {
            // middleware → extractor への受け渡し
            if let Some(identity) = verdict.identity {
                req.extensions_mut().insert(identity);
            }
            next.run(req).await
        }
        Some(location) => {
            tracing::info!(
                path = %req.uri().path(),
                decision = verdict.decision.kind(),
                location = %location,
                "request redirected by gate"
            );
            redirect(location)
        }
    }
}

fn redirect(location: String) -> Response {
    (
        StatusCode::TEMPORARY_REDIRECT,
        [
            (header::LOCATION, location),
            (header::CACHE_CONTROL, "no-store".to_string()),
        ],
    )
        .into_response()
}
