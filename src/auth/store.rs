//! Redundant storage for the session bearer token.
//!
//! The platform issues one opaque bearer token per login. It is kept in
//! two places at once so that losing either does not end the session:
//!
//! - a token file in the cache directory, read back only within a fixed
//!   24-hour time-to-live (the primary slot)
//! - an OS keychain entry with no expiry (the fallback slot)
//!
//! Reads always consult the primary slot first; when both slots disagree
//! the primary wins. Staleness of the fallback is caught later by the
//! expiry claim check in [`crate::auth::claims`].
//!
//! None of these operations surface errors. A slot that cannot be read
//! or written behaves as if it were empty.

use std::path::PathBuf;

use chrono::{DateTime, Duration, Utc};
use keyring::Entry;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Token file name in the cache directory
const TOKEN_FILE: &str = "auth_token.json";

/// Keyring service name
const SERVICE_NAME: &str = "fitdesk";

/// Keyring entry name for the session token
const TOKEN_ENTRY: &str = "auth_token";

/// Time-to-live of the primary slot, in seconds (24 hours)
const PRIMARY_TTL_SECS: i64 = 86_400;

/// One storage slot for the bearer token.
///
/// Implementations must be infallible from the caller's perspective:
/// a failed read is `None`, a failed write or clear is a no-op.
pub trait TokenBackend: Send + Sync {
    fn load(&self) -> Option<String>;
    fn store(&self, token: &str);
    fn clear(&self);
}

/// On-disk record for the file-backed slot.
#[derive(Debug, Serialize, Deserialize)]
struct StoredToken {
    token: String,
    stored_at: DateTime<Utc>,
}

/// File-backed slot with a fixed time-to-live enforced at read time.
pub struct FileTokenBackend {
    path: PathBuf,
    ttl: Duration,
}

impl FileTokenBackend {
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            path: cache_dir.join(TOKEN_FILE),
            ttl: Duration::seconds(PRIMARY_TTL_SECS),
        }
    }

    #[cfg(test)]
    pub fn with_ttl(cache_dir: PathBuf, ttl: Duration) -> Self {
        Self {
            path: cache_dir.join(TOKEN_FILE),
            ttl,
        }
    }
}

impl TokenBackend for FileTokenBackend {
    fn load(&self) -> Option<String> {
        let contents = std::fs::read_to_string(&self.path).ok()?;
        let stored: StoredToken = match serde_json::from_str(&contents) {
            Ok(s) => s,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "Unreadable token file");
                return None;
            }
        };
        if Utc::now() >= stored.stored_at + self.ttl {
            debug!(path = %self.path.display(), "Token file past its time-to-live");
            return None;
        }
        Some(stored.token)
    }

    fn store(&self, token: &str) {
        let stored = StoredToken {
            token: token.to_string(),
            stored_at: Utc::now(),
        };
        if let Some(parent) = self.path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                debug!(path = %parent.display(), error = %e, "Failed to create token directory");
                return;
            }
        }
        match serde_json::to_string_pretty(&stored) {
            Ok(contents) => {
                if let Err(e) = std::fs::write(&self.path, contents) {
                    debug!(path = %self.path.display(), error = %e, "Failed to write token file");
                }
            }
            Err(e) => debug!(error = %e, "Failed to serialize token"),
        }
    }

    fn clear(&self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                debug!(path = %self.path.display(), error = %e, "Failed to remove token file");
            }
        }
    }
}

/// Keychain-backed slot. No expiry of its own.
pub struct KeyringTokenBackend {
    service: String,
    entry: String,
}

impl KeyringTokenBackend {
    pub fn new() -> Self {
        Self {
            service: SERVICE_NAME.to_string(),
            entry: TOKEN_ENTRY.to_string(),
        }
    }

    fn entry(&self) -> Option<Entry> {
        match Entry::new(&self.service, &self.entry) {
            Ok(entry) => Some(entry),
            Err(e) => {
                debug!(error = %e, "Keychain unavailable");
                None
            }
        }
    }
}

impl Default for KeyringTokenBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenBackend for KeyringTokenBackend {
    fn load(&self) -> Option<String> {
        self.entry()?.get_password().ok()
    }

    fn store(&self, token: &str) {
        if let Some(entry) = self.entry() {
            if let Err(e) = entry.set_password(token) {
                debug!(error = %e, "Failed to store token in keychain");
            }
        }
    }

    fn clear(&self) {
        if let Some(entry) = self.entry() {
            if let Err(e) = entry.delete_credential() {
                debug!(error = %e, "Failed to clear token from keychain");
            }
        }
    }
}

/// The one logical bearer token, stored redundantly across two slots.
pub struct TokenStore {
    primary: Box<dyn TokenBackend>,
    fallback: Box<dyn TokenBackend>,
}

impl TokenStore {
    /// Default wiring: token file in the cache dir, keychain fallback.
    pub fn new(cache_dir: PathBuf) -> Self {
        Self {
            primary: Box::new(FileTokenBackend::new(cache_dir)),
            fallback: Box::new(KeyringTokenBackend::new()),
        }
    }

    pub fn with_backends(
        primary: Box<dyn TokenBackend>,
        fallback: Box<dyn TokenBackend>,
    ) -> Self {
        Self { primary, fallback }
    }

    /// Write the token to both slots. Best-effort; never fails.
    pub fn set(&self, token: &str) {
        self.primary.store(token);
        self.fallback.store(token);
    }

    /// Read the token. Primary slot wins when both are populated.
    pub fn get(&self) -> Option<String> {
        self.primary.load().or_else(|| self.fallback.load())
    }

    /// Clear both slots unconditionally.
    pub fn clear(&self) {
        self.primary.clear();
        self.fallback.clear();
    }

    /// Whether the primary slot currently holds a live token.
    pub fn primary_present(&self) -> bool {
        self.primary.load().is_some()
    }

    /// Rewrite the primary slot only. Used by the request executor to
    /// heal the primary after it expired while the fallback survived.
    pub fn restore_primary(&self, token: &str) {
        self.primary.store(token);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn file_store(dir: &TempDir) -> FileTokenBackend {
        FileTokenBackend::new(dir.path().to_path_buf())
    }

    /// Two file-backed slots in separate directories stand in for the
    /// file + keychain pair, which keeps these tests hermetic.
    fn two_slot_store(primary: &TempDir, fallback: &TempDir) -> TokenStore {
        TokenStore::with_backends(
            Box::new(file_store(primary)),
            Box::new(file_store(fallback)),
        )
    }

    #[test]
    fn set_then_get_roundtrips() {
        let (a, b) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let store = two_slot_store(&a, &b);

        store.set("tok-123");
        assert_eq!(store.get().as_deref(), Some("tok-123"));
    }

    #[test]
    fn clear_empties_both_slots() {
        let (a, b) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let store = two_slot_store(&a, &b);

        store.set("tok-123");
        store.clear();
        assert_eq!(store.get(), None);

        // Clearing an already-empty store is fine
        store.clear();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn fallback_survives_primary_loss() {
        let (a, b) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let store = two_slot_store(&a, &b);

        store.set("tok-123");
        file_store(&a).clear();

        assert!(!store.primary_present());
        assert_eq!(store.get().as_deref(), Some("tok-123"));
    }

    #[test]
    fn primary_wins_when_slots_disagree() {
        let (a, b) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let store = two_slot_store(&a, &b);

        file_store(&a).store("fresh");
        file_store(&b).store("stale");
        assert_eq!(store.get().as_deref(), Some("fresh"));
    }

    #[test]
    fn expired_primary_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let backend = FileTokenBackend::with_ttl(dir.path().to_path_buf(), Duration::seconds(0));
        backend.store("tok-123");
        assert_eq!(backend.load(), None);
    }

    #[test]
    fn restore_primary_heals_only_the_primary() {
        let (a, b) = (TempDir::new().unwrap(), TempDir::new().unwrap());
        let store = two_slot_store(&a, &b);

        store.restore_primary("tok-123");
        assert!(store.primary_present());
        assert_eq!(file_store(&b).load(), None);
    }

    #[test]
    fn unreadable_token_file_is_empty() {
        let dir = TempDir::new().unwrap();
        let backend = file_store(&dir);
        std::fs::write(dir.path().join(TOKEN_FILE), "not json").unwrap();
        assert_eq!(backend.load(), None);
    }
}
