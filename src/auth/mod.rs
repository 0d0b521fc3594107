//! Authentication module for session tokens and login credentials.
//!
//! This module provides:
//! - `TokenStore`: the session bearer token, stored redundantly in a
//!   TTL-bearing token file plus an OS keychain entry
//! - `claims`: expiry checking via the token's decoded (unverified) payload
//! - `CredentialStore`: remembered login passwords via keyring
//!
//! The token is destroyed on logout, on password change, and on any
//! authentication failure observed by the API client.

pub mod claims;
pub mod credentials;
pub mod store;

pub use claims::is_token_valid;
pub use credentials::CredentialStore;
pub use store::{TokenBackend, TokenStore};
