//! Finds the access token a request carries.
//!
//! Resolution order, first hit wins:
//! 1. debug query parameter (only when debug tokens are enabled)
//! 2. `Authorization: Bearer <token>`
//! 3. access-token cookie
//!
//! Nothing found is not an error: the request is simply anonymous.

use axum::http::{HeaderMap, header};
use url::form_urlencoded;

use super::paths::GateRoutes;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenSource {
    DebugQuery,
    AuthorizationHeader,
    Cookie,
}

impl TokenSource {
    pub fn as_str(self) -> &'static str {
        match self {
            TokenSource::DebugQuery => "debug_query",
            TokenSource::AuthorizationHeader => "authorization_header",
            TokenSource::Cookie => "cookie",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedToken {
    pub source: TokenSource,
    pub token: String,
}

#[derive(Debug, Clone)]
pub struct TokenLocator {
    debug_param: &'static str,
    cookie_name: &'static str,
    allow_debug: bool,
}

impl TokenLocator {
    pub fn new(routes: &GateRoutes, allow_debug: bool) -> Self {
        Self {
            debug_param: routes.debug_token_param,
            cookie_name: routes.access_cookie,
            allow_debug,
        }
    }

    pub fn locate(&self, headers: &HeaderMap, query: Option<&str>) -> Option<LocatedToken> {
        let debug = self
            .allow_debug
            .then(|| query.and_then(|q| query_param(q, self.debug_param)))
            .flatten()
            .map(|token| (TokenSource::DebugQuery, token));

        debug
            .or_else(|| bearer(headers).map(|t| (TokenSource::AuthorizationHeader, t)))
            .or_else(|| cookie(headers, self.cookie_name).map(|t| (TokenSource::Cookie, t)))
            .map(|(source, token)| LocatedToken { source, token })
    }
}

fn query_param(query: &str, name: &str) -> Option<String> {
    form_urlencoded::parse(query.as_bytes())
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

/// Anything that is not `Bearer <token>` is ignored rather than treated as an error.
fn bearer(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let token = value.strip_prefix("Bearer ")?.trim();
    (!token.is_empty()).then(|| token.to_string())
}

fn cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| k.trim() == name)
        .map(|(_, v)| v.trim().trim_matches('"').to_string())
        .filter(|v| !v.is_empty())
}
