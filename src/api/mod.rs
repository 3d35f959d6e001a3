//! Authenticated JSON-over-HTTP request gateway.

pub mod client;
pub mod refresh;

pub use client::ApiClient;
pub use refresh::RefreshOnUnauthorized;
