//! REST API client module for the fitness content platform.
//!
//! This module provides the `ApiClient` all console screens go through,
//! plus the `MediaStore` used to upload images to object storage.
//!
//! The API uses JWT bearer token authentication; `ApiClient` enforces
//! the session contract (pre-flight expiry check, 401 handling with
//! credential teardown) on every call.

pub mod client;
pub mod error;
pub mod media;

pub use client::{ApiClient, RequestAuth};
pub use error::ApiError;
pub use media::MediaStore;
