//! Shared building blocks for the pollen client crates: the error model,
//! wire constants, response types and the HTTP transport seam.

pub mod constants;
pub mod error;
pub mod traits;
pub mod types;
