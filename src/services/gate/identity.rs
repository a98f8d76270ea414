/*
 * Responsibility
 * - Access token claims の型 (検証済み / 未検証 decode の両方でこの型を通す)
 * - handler に渡す Identity への変換
 *
 * Notes
 * - 必須: subject / role / status。欠けていれば decode 失敗として扱う
 * - 未知のフィールド (iat, iss など) は無視する
 */
use std::fmt;

use serde::{Deserialize, Serialize};

use super::role::Role;

/// Stable subject identifier. Issuers emit either a numeric id or a string id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SubjectId {
    Numeric(i64),
    Text(String),
}

impl fmt::Display for SubjectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubjectId::Numeric(n) => write!(f, "{}", n),
            SubjectId::Text(s) => f.write_str(s),
        }
    }
}

/// Account status flag. Either a boolean (`active: true`) or a label (`"active"`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AccountStatus {
    Flag(bool),
    Label(String),
}

#[derive(Debug, Deserialize)]
struct RawClaims {
    #[serde(default)]
    id: Option<SubjectId>,
    #[serde(default)]
    sub: Option<SubjectId>,
    // A role outside `Role` fails decoding, so the request is treated as anonymous.
    role: Role,
    status: AccountStatus,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    exp: Option<u64>,
}

/// Claims payload of an access token.
///
/// The subject is read from `id`, or from the registered `sub` claim when `id` is absent.
#[derive(Debug, Clone, Deserialize)]
#[serde(try_from = "RawClaims")]
pub struct TokenClaims {
    pub id: SubjectId,
    pub role: Role,
    pub status: AccountStatus,
    pub email: Option<String>,
    pub name: Option<String>,
    pub exp: Option<u64>,
}

impl TryFrom<RawClaims> for TokenClaims {
    type Error = &'static str;

    fn try_from(raw: RawClaims) -> Result<Self, Self::Error> {
        let id = raw.id.or(raw.sub).ok_or("missing subject claim (`id` or `sub`)")?;
        Ok(Self {
            id,
            role: raw.role,
            status: raw.status,
            email: raw.email,
            name: raw.name,
            exp: raw.exp,
        })
    }
}

/// How much the gateway trusts an identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustLevel {
    /// Signature checked against the configured secret.
    Verified,
    /// Payload decoded after a signature mismatch; the signature was never checked.
    Unverified,
}

/// Identity resolved for a single request. Rebuilt on every request, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub subject: SubjectId,
    pub email: Option<String>,
    pub role: Role,
    pub name: Option<String>,
    pub status: AccountStatus,
    pub trust: TrustLevel,
}

impl Identity {
    pub fn from_claims(claims: TokenClaims, trust: TrustLevel) -> Self {
        Self {
            subject: claims.id,
            email: claims.email,
            role: claims.role,
            name: claims.name,
            status: claims.status,
            trust,
        }
    }

    pub fn is_verified(&self) -> bool {
        matches!(self.trust, TrustLevel::Verified)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_numeric_or_string_subject() {
        let claims: TokenClaims =
            serde_json::from_str(r#"{"id":42,"role":"admin","status":"active"}"#).unwrap();
        assert_eq!(claims.id, SubjectId::Numeric(42));

        let claims: TokenClaims =
            serde_json::from_str(r#"{"sub":"u-42","role":"user","status":true}"#).unwrap();
        assert_eq!(claims.id, SubjectId::Text("u-42".into()));
        assert_eq!(claims.status, AccountStatus::Flag(true));
    }

    #[test]
    fn missing_required_field_fails() {
        // no status
        assert!(serde_json::from_str::<TokenClaims>(r#"{"id":1,"role":"admin"}"#).is_err());
        // no role
        assert!(serde_json::from_str::<TokenClaims>(r#"{"id":1,"status":"active"}"#).is_err());
        // no subject
        assert!(
            serde_json::from_str::<TokenClaims>(r#"{"role":"admin","status":"active"}"#).is_err()
        );
    }

    #[test]
    fn extra_fields_are_ignored() {
        let claims: TokenClaims = serde_json::from_str(
            r#"{"id":7,"sub":"7","role":"salesperson","status":"active","email":"s@example.com","iat":1,"iss":"x"}"#,
        )
        .unwrap();
        let identity = Identity::from_claims(claims, TrustLevel::Verified);
        assert_eq!(identity.email.as_deref(), Some("s@example.com"));
        assert_eq!(identity.role, Role::Salesperson);
        assert!(identity.is_verified());
    }
}
