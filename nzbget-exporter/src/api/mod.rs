//! NZBGet JSON-RPC access.
//!
//! [`NzbgetApi`] is the seam the collector depends on; [`ApiClient`] is the
//! HTTP implementation.

mod client;
mod http_client;

pub use client::ApiClient;
pub use http_client::build_http_client;

use async_trait::async_trait;

use crate::Result;
use crate::wire::{HistoryRecord, NzbgetConfig, ServerVolume, Status};

/// Named JSON-RPC method, used as the final URL path segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum RpcMethod {
    Version,
    Status,
    Config,
    ServerVolumes,
    History,
}

/// Typed access to the upstream methods the exporter needs.
#[async_trait]
pub trait NzbgetApi: Send + Sync {
    async fn version(&self) -> Result<String>;

    async fn status(&self) -> Result<Status>;

    async fn config(&self) -> Result<NzbgetConfig>;

    /// Per-server volumes; element 0 is the all-servers total.
    async fn server_volumes(&self) -> Result<Vec<ServerVolume>>;

    async fn history(&self) -> Result<Vec<HistoryRecord>>;
}
