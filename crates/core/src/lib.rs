// ── From pollen-common ──
pub use pollen_common::{constants, error, traits, types};

// ── From pollen-types ──
pub use pollen_types::{config, output};

// ── Core modules ──
pub mod auth;
pub mod client;
pub mod heatmap;
pub mod routes;
pub mod transport;
pub mod workspace;

#[cfg(test)]
mod mock;

pub use auth::TokenStore;
pub use client::ApiClient;
pub use transport::ReqwestTransport;
pub use workspace::init_workspace;
