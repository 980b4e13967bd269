//! HTTP implementation of [`NzbgetApi`].

use async_trait::async_trait;
use reqwest::StatusCode;
use tracing::debug;
use url::Url;

use super::http_client::build_http_client;
use super::{NzbgetApi, RpcMethod};
use crate::config::UpstreamConfig;
use crate::wire::{Envelope, FromPayload, HistoryRecord, NzbgetConfig, ServerVolume, Status};
use crate::{Error, Result};

/// JSON-RPC client bound to one NZBGet instance.
#[derive(Debug, Clone)]
pub struct ApiClient {
    client: reqwest::Client,
    /// Base URL without trailing slashes.
    base: String,
    credentials: Option<(String, String)>,
}

impl ApiClient {
    /// Create a client for `config.host`.
    pub fn new(config: &UpstreamConfig) -> Result<Self> {
        let client = build_http_client(config.timeout)?;
        Self::with_client(client, config)
    }

    /// Create a client that reuses an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client, config: &UpstreamConfig) -> Result<Self> {
        // NZBGet answers 404 for `//jsonrpc`
        let base = config.host.trim_end_matches('/').to_string();
        Url::parse(&base)
            .map_err(|e| Error::config(format!("invalid nzbget host {:?}: {e}", config.host)))?;

        let credentials = match (&config.username, &config.password) {
            (Some(username), Some(password)) if !username.is_empty() && !password.is_empty() => {
                Some((username.clone(), password.clone()))
            }
            _ => None,
        };

        Ok(Self {
            client,
            base,
            credentials,
        })
    }

    /// Full URL of an RPC method.
    pub fn endpoint(&self, method: RpcMethod) -> String {
        format!("{}/jsonrpc/{}", self.base, method)
    }

    /// Call `method` and decode the envelope's `result` as `T`.
    pub async fn fetch<T: FromPayload>(&self, method: RpcMethod) -> Result<T> {
        let url = self.endpoint(method);
        debug!(url = %url, "GET api");

        let mut request = self.client.get(&url);
        if let Some((username, password)) = &self.credentials {
            request = request.basic_auth(username, Some(password));
        }

        let response = request.send().await.map_err(Error::Transport)?;
        let status = response.status();
        if status != StatusCode::OK {
            return Err(Error::HttpStatus(status));
        }

        let body = response.bytes().await.map_err(Error::Transport)?;
        let envelope: Envelope =
            serde_json::from_slice(&body).map_err(|e| Error::malformed(method, e))?;

        T::from_payload(envelope.result).map_err(|e| Error::malformed(method, e))
    }
}

#[async_trait]
impl NzbgetApi for ApiClient {
    async fn version(&self) -> Result<String> {
        self.fetch(RpcMethod::Version).await
    }

    async fn status(&self) -> Result<Status> {
        self.fetch(RpcMethod::Status).await
    }

    async fn config(&self) -> Result<NzbgetConfig> {
        self.fetch(RpcMethod::Config).await
    }

    async fn server_volumes(&self) -> Result<Vec<ServerVolume>> {
        self.fetch(RpcMethod::ServerVolumes).await
    }

    async fn history(&self) -> Result<Vec<HistoryRecord>> {
        self.fetch(RpcMethod::History).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn upstream(host: &str, username: Option<&str>, password: Option<&str>) -> UpstreamConfig {
        UpstreamConfig {
            host: host.to_string(),
            username: username.map(str::to_string),
            password: password.map(str::to_string),
            timeout: Duration::from_secs(1),
        }
    }

    #[test]
    fn test_endpoint_strips_trailing_slashes() {
        let client = ApiClient::new(&upstream("http://nzbget:6789///", None, None)).unwrap();
        assert_eq!(
            client.endpoint(RpcMethod::ServerVolumes),
            "http://nzbget:6789/jsonrpc/servervolumes"
        );
    }

    #[test]
    fn test_credentials_require_both_parts() {
        let client = ApiClient::new(&upstream("http://nzbget", Some("nzbget"), None)).unwrap();
        assert!(client.credentials.is_none());

        let client = ApiClient::new(&upstream("http://nzbget", Some("nzbget"), Some(""))).unwrap();
        assert!(client.credentials.is_none());

        let client =
            ApiClient::new(&upstream("http://nzbget", Some("nzbget"), Some("tegbzn6789"))).unwrap();
        assert_eq!(
            client.credentials,
            Some(("nzbget".to_string(), "tegbzn6789".to_string()))
        );
    }

    #[test]
    fn test_invalid_host_rejected() {
        let err = ApiClient::new(&upstream("not a url", None, None)).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
