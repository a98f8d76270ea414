/// Factory: build `Gateway` from application `Config`.
use std::sync::Arc;

use crate::config::Config;
use crate::services::gate::{GateRoutes, Gateway, TokenVerifier};

pub fn build_gateway(config: &Config) -> Arc<Gateway> {
    let verifier = TokenVerifier::new(
        config.jwt_secret.as_bytes(),
        config.access_token_leeway_seconds,
        config.unverified_fallback,
    );

    // Debug query tokens never reach a production build.
    let debug_tokens = !config.app_env.is_production();

    Arc::new(Gateway::new(GateRoutes::default(), verifier, debug_tokens))
}
