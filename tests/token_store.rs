//! Session token storage and validity, exercised through real file
//! backends in temporary directories. Two file-backed slots stand in
//! for the file + keychain pair so the tests stay hermetic.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::Utc;
use tempfile::TempDir;

use fitdesk::auth::claims::is_token_valid;
use fitdesk::auth::store::{FileTokenBackend, TokenBackend, TokenStore};

/// Build an unsigned JWT with the given expiry (seconds since epoch).
fn jwt_with_exp(exp: i64) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(format!(r#"{{"exp":{},"sub":"1"}}"#, exp).as_bytes());
    format!("{}.{}.sig", header, payload)
}

struct Fixture {
    store: TokenStore,
    primary_dir: TempDir,
    #[allow(dead_code)]
    fallback_dir: TempDir,
}

fn fixture() -> Fixture {
    let primary_dir = TempDir::new().unwrap();
    let fallback_dir = TempDir::new().unwrap();
    let store = TokenStore::with_backends(
        Box::new(FileTokenBackend::new(primary_dir.path().to_path_buf())),
        Box::new(FileTokenBackend::new(fallback_dir.path().to_path_buf())),
    );
    Fixture {
        store,
        primary_dir,
        fallback_dir,
    }
}

#[test]
fn future_expiry_is_valid_past_is_not() {
    let f = fixture();
    let now = Utc::now().timestamp();

    f.store.set(&jwt_with_exp(now + 600));
    assert!(is_token_valid(&f.store));

    f.store.set(&jwt_with_exp(now - 600));
    assert!(!is_token_valid(&f.store));

    // Expiry equal to (or just behind) now is not strictly in the future
    f.store.set(&jwt_with_exp(now));
    assert!(!is_token_valid(&f.store));
}

#[test]
fn malformed_tokens_read_as_invalid() {
    let f = fixture();
    f.store.set("definitely-not-a-jwt");
    assert!(!is_token_valid(&f.store));

    f.store.set("seg1.%%%.seg3");
    assert!(!is_token_valid(&f.store));
}

#[test]
fn set_then_get_roundtrips() {
    let f = fixture();
    f.store.set("tok-abc");
    assert_eq!(f.store.get().as_deref(), Some("tok-abc"));
}

#[test]
fn remove_clears_everything_regardless_of_prior_state() {
    let f = fixture();

    // Clearing an empty store is fine
    f.store.clear();
    assert!(f.store.get().is_none());

    f.store.set(&jwt_with_exp(Utc::now().timestamp() + 600));
    f.store.clear();
    assert!(f.store.get().is_none());
    assert!(!is_token_valid(&f.store));
}

#[test]
fn fallback_serves_reads_after_primary_is_cleared() {
    let f = fixture();
    f.store.set("tok-abc");

    // Simulate the primary slot expiring out from under the store
    FileTokenBackend::new(f.primary_dir.path().to_path_buf()).clear();

    assert!(!f.store.primary_present());
    assert_eq!(f.store.get().as_deref(), Some("tok-abc"));
}
