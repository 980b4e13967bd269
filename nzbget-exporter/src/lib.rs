//! Prometheus exporter for NZBGet.
//!
//! Each scrape of `/metrics` fetches the upstream JSON-RPC methods in parallel
//! and renders the result in the Prometheus text format.

pub mod api;
pub mod collector;
pub mod config;
pub mod error;
pub mod history;
pub mod logging;
pub mod metrics;
pub mod server;
pub mod wire;

pub use error::{DecodeError, Error, Result};
