//! Redirect loop heuristic.
//!
//! Trips when a request for the login page was itself referred by the login page. The
//! `Referer` header is client-supplied and may be missing or forged, so this only breaks
//! accidental bounces; it is not a security boundary.

use axum::http::{HeaderMap, header};
use url::Url;

use super::paths::{GateRoutes, canonical_path};

pub fn is_looping(routes: &GateRoutes, path: &str, headers: &HeaderMap) -> bool {
    if !routes.is_login(path) {
        return false;
    }
    referer_path(headers).is_some_and(|referer| routes.is_login(&referer))
}

/// Path component of the `Referer` header. Accepts absolute URLs and bare paths.
fn referer_path(headers: &HeaderMap) -> Option<String> {
    let raw = headers.get(header::REFERER)?.to_str().ok()?.trim();
    if raw.is_empty() {
        return None;
    }

    match Url::parse(raw) {
        Ok(url) => Some(canonical_path(url.path())),
        Err(_) if raw.starts_with('/') => {
            let path = raw.split(['?', '#']).next().unwrap_or(raw);
            Some(canonical_path(path))
        }
        Err(_) => None,
    }
}
