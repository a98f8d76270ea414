use axum::http::HeaderMap;
use tracing::{debug, warn};

use super::decision::{self, Decision, RejectReason};
use super::identity::Identity;
use super::locator::{TokenLocator, TokenSource};
use super::loop_guard;
use super::paths::{self, GateRoutes, PathClass};
use super::verifier::TokenVerifier;

/// What the gateway sees of a request.
#[derive(Debug, Clone, Copy)]
pub struct GateRequest<'a> {
    /// Path as the client sent it. Canonicalized before any stage looks at it.
    pub path: &'a str,
    pub query: Option<&'a str>,
    pub headers: &'a HeaderMap,
}

/// Result of one gateway pass.
#[derive(Debug, Clone)]
pub struct Verdict {
    pub decision: Decision,
    /// Identity resolved on the way, if a token was found and accepted.
    pub identity: Option<Identity>,
    pub source: Option<TokenSource>,
}

impl Verdict {
    fn bare(decision: Decision) -> Self {
        Self {
            decision,
            identity: None,
            source: None,
        }
    }
}

/// Per-request authentication and role gate.
///
/// Holds only read-only state, so one instance is shared by every request.
#[derive(Debug, Clone)]
pub struct Gateway {
    routes: GateRoutes,
    locator: TokenLocator,
    verifier: TokenVerifier,
}

impl Gateway {
    pub fn new(routes: GateRoutes, verifier: TokenVerifier, debug_tokens: bool) -> Self {
        let locator = TokenLocator::new(&routes, debug_tokens);
        Self {
            routes,
            locator,
            verifier,
        }
    }

    pub fn routes(&self) -> &GateRoutes {
        &self.routes
    }

    /// canonicalize → classify → locate → verify → decide.
    ///
    /// The loop guard runs on requests for the login page, which is where every login
    /// redirect lands. Restricted paths are never the login path, so it has nothing to do
    /// there.
    pub fn evaluate(&self, req: GateRequest<'_>) -> Verdict {
        let path = paths::canonical_path(req.path);

        let required = match self.routes.classify(&path) {
            PathClass::Excluded | PathClass::Public => return Verdict::bare(Decision::Allow),
            PathClass::Login => return Verdict::bare(self.guard_loop(&path, req.headers)),
            PathClass::Restricted(role) => role,
        };

        let located = self.locator.locate(req.headers, req.query);
        let source = located.as_ref().map(|l| l.source);

        let identity = located.and_then(|l| match self.verifier.verify(&l.token) {
            Ok(identity) => Some(identity),
            Err(err) => {
                warn!(
                    path = %path,
                    source = l.source.as_str(),
                    error = %err,
                    "access token rejected"
                );
                None
            }
        });

        let decision = decision::decide(&self.routes, Some(required), identity.as_ref(), &path);

        debug!(
            path = %path,
            required = %required,
            role = identity.as_ref().map(|i| i.role.as_str()),
            source = source.map(TokenSource::as_str),
            decision = decision.kind(),
            "gate decision"
        );

        Verdict {
            decision,
            identity,
            source,
        }
    }

    fn guard_loop(&self, path: &str, headers: &HeaderMap) -> Decision {
        if loop_guard::is_looping(&self.routes, path, headers) {
            warn!(path = %path, "login redirect loop detected");
            return Decision::Reject(RejectReason::AuthError);
        }
        Decision::Allow
    }
}
