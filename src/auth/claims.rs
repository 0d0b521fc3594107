//! Expiry checking for the session bearer token.
//!
//! Tokens are compact JWTs. Only the payload segment is decoded here,
//! and the signature is never verified: this is a usability check that
//! lets the console skip doomed requests, not a security boundary. The
//! server re-validates every request and the executor treats its 401 as
//! authoritative regardless of what this module concluded.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use serde::Deserialize;

use super::TokenStore;

/// Claims the console cares about. Anything else in the payload is
/// ignored at decode time.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenClaims {
    /// Expiry, seconds since epoch
    pub exp: i64,
    /// Subject (user id), when the server includes one
    #[serde(default)]
    pub sub: Option<String>,
}

impl TokenClaims {
    /// A token is live only while its expiry is strictly in the future.
    pub fn is_expired(&self) -> bool {
        self.exp * 1000 <= Utc::now().timestamp_millis()
    }
}

/// Decode the payload segment of a compact JWT without verifying the
/// signature. Returns `None` for anything that is not three dot-joined
/// segments of base64url JSON carrying an `exp` claim.
pub fn decode(token: &str) -> Option<TokenClaims> {
    let payload = token.split('.').nth(1)?;
    let bytes = URL_SAFE_NO_PAD.decode(payload).ok()?;
    serde_json::from_slice(&bytes).ok()
}

/// Whether the stored token is present and not yet expired.
///
/// Side-effect free and safe to call before every request; a malformed
/// or claim-less token reads as invalid rather than erroring.
pub fn is_token_valid(store: &TokenStore) -> bool {
    match store.get() {
        Some(token) => decode(&token).map(|c| !c.is_expired()).unwrap_or(false),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::store::{FileTokenBackend, TokenStore};
    use tempfile::TempDir;

    /// Build an unsigned JWT with the given payload JSON.
    pub(crate) fn fake_jwt(payload: &serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let body = URL_SAFE_NO_PAD.encode(payload.to_string().as_bytes());
        format!("{}.{}.sig", header, body)
    }

    fn store_in(dir: &TempDir) -> TokenStore {
        TokenStore::with_backends(
            Box::new(FileTokenBackend::new(dir.path().to_path_buf())),
            Box::new(FileTokenBackend::new(dir.path().join("fb"))),
        )
    }

    #[test]
    fn future_expiry_is_valid() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let exp = Utc::now().timestamp() + 3600;
        store.set(&fake_jwt(&serde_json::json!({ "exp": exp })));
        assert!(is_token_valid(&store));
    }

    #[test]
    fn past_expiry_is_invalid() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        let exp = Utc::now().timestamp() - 3600;
        store.set(&fake_jwt(&serde_json::json!({ "exp": exp })));
        assert!(!is_token_valid(&store));
    }

    #[test]
    fn absent_token_is_invalid() {
        let dir = TempDir::new().unwrap();
        assert!(!is_token_valid(&store_in(&dir)));
    }

    #[test]
    fn malformed_tokens_are_invalid_not_fatal() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);

        for junk in ["", "abc", "a.b.c", "a.!!!.c", "just one segment"] {
            store.set(junk);
            assert!(!is_token_valid(&store), "token {:?} treated as valid", junk);
        }
    }

    #[test]
    fn missing_exp_claim_is_invalid() {
        let dir = TempDir::new().unwrap();
        let store = store_in(&dir);
        store.set(&fake_jwt(&serde_json::json!({ "sub": "42" })));
        assert!(!is_token_valid(&store));
    }

    #[test]
    fn decode_exposes_subject() {
        let exp = Utc::now().timestamp() + 60;
        let token = fake_jwt(&serde_json::json!({ "exp": exp, "sub": "7" }));
        let claims = decode(&token).unwrap();
        assert_eq!(claims.sub.as_deref(), Some("7"));
        assert!(!claims.is_expired());
    }
}
