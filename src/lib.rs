//! fitdesk library: the platform API client, token/session handling,
//! data models, and the terminal UI. The `fitdesk` binary in `main.rs`
//! is a thin bootstrap over this.

pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod models;
pub mod ui;
pub mod utils;
