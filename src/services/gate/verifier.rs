use base64::{
    Engine,
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, errors::ErrorKind};
use tracing::warn;

use super::identity::{Identity, TokenClaims, TrustLevel};

/// base64url, padded or not. Issuers disagree on padding.
const PAYLOAD_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Why a credential did not produce an identity.
#[derive(Debug, thiserror::Error)]
pub enum VerifyError {
    #[error("malformed token")]
    Malformed,
    #[error("token expired")]
    Expired,
    #[error("token not yet valid")]
    Immature,
    #[error("signature mismatch")]
    SignatureMismatch,
    #[error("signature mismatch, unverified decode failed: {0}")]
    Fallback(#[from] FallbackError),
    #[error("invalid claims: {0}")]
    Claims(String),
    #[error("jwt verification failed: {0}")]
    Other(jsonwebtoken::errors::Error),
}

impl VerifyError {
    pub fn is_signature_mismatch(&self) -> bool {
        matches!(self, VerifyError::SignatureMismatch)
    }
}

impl From<jsonwebtoken::errors::Error> for VerifyError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::InvalidSignature => VerifyError::SignatureMismatch,
            ErrorKind::ExpiredSignature => VerifyError::Expired,
            ErrorKind::ImmatureSignature => VerifyError::Immature,
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Utf8(_) => {
                VerifyError::Malformed
            }
            ErrorKind::Json(inner) => VerifyError::Claims(inner.to_string()),
            _ => VerifyError::Other(e),
        }
    }
}

/// Failure of the unverified payload decode.
#[derive(Debug, thiserror::Error)]
pub enum FallbackError {
    #[error("expected 3 segments, got {0}")]
    Segments(usize),
    #[error("payload is not base64url: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("payload is not a claims object: {0}")]
    Claims(#[from] serde_json::Error),
}

/// HS256 access-token verifier.
///
/// On a signature mismatch, and only then, it can fall back to decoding the payload
/// without any signature check and trust the result. Every other failure is final.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    unverified_fallback: bool,
}

impl std::fmt::Debug for TokenVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenVerifier")
            .field("validation", &self.validation)
            .field("unverified_fallback", &self.unverified_fallback)
            .finish()
    }
}

impl TokenVerifier {
    pub fn new(secret: &[u8], leeway_seconds: u64, unverified_fallback: bool) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = leeway_seconds;
        // `exp` is checked when present but tokens without one are accepted.
        validation.required_spec_claims.clear();
        validation.validate_aud = false;

        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            unverified_fallback,
        }
    }

    pub fn unverified_fallback(&self) -> bool {
        self.unverified_fallback
    }

    /// Verify `token` and build the identity it asserts.
    pub fn verify(&self, token: &str) -> Result<Identity, VerifyError> {
        match jsonwebtoken::decode::<TokenClaims>(token, &self.decoding_key, &self.validation) {
            Ok(data) => Ok(Identity::from_claims(data.claims, TrustLevel::Verified)),
            Err(e) => {
                let err = VerifyError::from(e);
                if !(err.is_signature_mismatch() && self.unverified_fallback) {
                    return Err(err);
                }

                let claims = decode_unverified(token)?;
                warn!(
                    subject = %claims.id,
                    role = %claims.role,
                    "signature mismatch, trusting unverified token payload"
                );
                Ok(Identity::from_claims(claims, TrustLevel::Unverified))
            }
        }
    }
}

/// Decode the claims segment of `header.payload.signature` without checking anything
/// but its shape.
pub fn decode_unverified(token: &str) -> Result<TokenClaims, FallbackError> {
    let segments: Vec<&str> = token.split('.').collect();
    let [_, payload, _] = segments.as_slice() else {
        return Err(FallbackError::Segments(segments.len()));
    };

    let bytes = PAYLOAD_ENGINE.decode(payload)?;
    Ok(serde_json::from_slice(&bytes)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::gate::identity::SubjectId;
    use crate::services::gate::role::Role;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use jsonwebtoken::{EncodingKey, Header};
    use serde_json::json;

    const SECRET: &[u8] = b"test-secret";

    fn sign(claims: &serde_json::Value, secret: &[u8]) -> String {
        jsonwebtoken::encode(
            &Header::new(Algorithm::HS256),
            claims,
            &EncodingKey::from_secret(secret),
        )
        .unwrap()
    }

    fn future_exp() -> i64 {
        chrono::Utc::now().timestamp() + 3600
    }

    fn claims(role: &str) -> serde_json::Value {
        json!({
            "id": 7,
            "email": "someone@example.com",
            "role": role,
            "name": "Someone",
            "status": "active",
            "exp": future_exp(),
        })
    }

    /// Keep header and signature, swap in a different payload.
    fn with_payload(token: &str, payload: &serde_json::Value) -> String {
        let parts: Vec<&str> = token.split('.').collect();
        let encoded = URL_SAFE_NO_PAD.encode(serde_json::to_vec(payload).unwrap());
        format!("{}.{}.{}", parts[0], encoded, parts[2])
    }

    #[test]
    fn valid_token_is_verified() {
        let verifier = TokenVerifier::new(SECRET, 0, true);
        let identity = verifier.verify(&sign(&claims("admin"), SECRET)).unwrap();
        assert_eq!(identity.role, Role::Admin);
        assert_eq!(identity.subject, SubjectId::Numeric(7));
        assert!(identity.is_verified());
    }

    #[test]
    fn token_without_exp_is_accepted() {
        let verifier = TokenVerifier::new(SECRET, 0, false);
        let token = sign(&json!({"id": "a", "role": "user", "status": true}), SECRET);
        assert!(verifier.verify(&token).is_ok());
    }

    #[test]
    fn tampered_payload_falls_back_to_unverified_identity() {
        let verifier = TokenVerifier::new(SECRET, 0, true);
        let token = sign(&claims("salesperson"), SECRET);
        let tampered = with_payload(&token, &claims("admin"));

        let identity = verifier.verify(&tampered).unwrap();
        assert_eq!(identity.role, Role::Admin);
        assert_eq!(identity.trust, TrustLevel::Unverified);
    }

    #[test]
    fn wrong_secret_falls_back_too() {
        let verifier = TokenVerifier::new(SECRET, 0, true);
        let token = sign(&claims("salesperson"), b"some-other-secret");
        let identity = verifier.verify(&token).unwrap();
        assert_eq!(identity.role, Role::Salesperson);
        assert!(!identity.is_verified());
    }

    #[test]
    fn fallback_disabled_reports_mismatch() {
        let verifier = TokenVerifier::new(SECRET, 0, false);
        let token = sign(&claims("admin"), b"some-other-secret");
        assert!(matches!(
            verifier.verify(&token),
            Err(VerifyError::SignatureMismatch)
        ));
    }

    #[test]
    fn mismatch_with_bad_payload_is_invalid() {
        let verifier = TokenVerifier::new(SECRET, 0, true);
        let token = sign(&claims("admin"), SECRET);
        // signature no longer matches and payload lacks a role
        let tampered = with_payload(&token, &json!({"id": 1, "status": "active"}));
        assert!(matches!(
            verifier.verify(&tampered),
            Err(VerifyError::Fallback(FallbackError::Claims(_)))
        ));
    }

    #[test]
    fn expired_token_never_falls_back() {
        let verifier = TokenVerifier::new(SECRET, 0, true);
        let mut expired = claims("admin");
        expired["exp"] = json!(chrono::Utc::now().timestamp() - 3600);
        let token = sign(&expired, SECRET);
        assert!(matches!(verifier.verify(&token), Err(VerifyError::Expired)));
    }

    #[test]
    fn leeway_tolerates_small_skew() {
        let verifier = TokenVerifier::new(SECRET, 120, false);
        let mut recent = claims("admin");
        recent["exp"] = json!(chrono::Utc::now().timestamp() - 30);
        assert!(verifier.verify(&sign(&recent, SECRET)).is_ok());
    }

    #[test]
    fn malformed_token_is_hard_failure() {
        let verifier = TokenVerifier::new(SECRET, 0, true);
        assert!(matches!(
            verifier.verify("not-a-jwt"),
            Err(VerifyError::Malformed)
        ));
    }

    #[test]
    fn decode_unverified_checks_shape() {
        assert!(matches!(
            decode_unverified("a.b"),
            Err(FallbackError::Segments(2))
        ));
        assert!(matches!(
            decode_unverified("a.!!!.c"),
            Err(FallbackError::Base64(_))
        ));

        let payload = URL_SAFE_NO_PAD.encode(br#"{"sub":"x","role":"user","status":"active"}"#);
        let claims = decode_unverified(&format!("h.{payload}.s")).unwrap();
        assert_eq!(claims.id, SubjectId::Text("x".into()));
    }
}
