use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::services::gate::Identity;

/// Identity the gate attached to this request, if any.
///
/// Public pages are never looked at by the gate, so they always see `None`.
pub struct Viewer(pub Option<Identity>);

impl<S> FromRequestParts<S> for Viewer
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Viewer(parts.extensions.get::<Identity>().cloned()))
    }
}
