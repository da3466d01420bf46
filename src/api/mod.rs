//! Remote association API
//!
//! Thin `reqwest` wrapper shared by the transfer, match and reprogram
//! adapters. It owns URL building, the request-id header and the mapping from
//! HTTP outcomes to [`ApiError`].

pub mod client;
pub mod endpoints;
pub mod error;
pub mod wire;

pub use client::ApiClient;
pub use error::ApiError;
