//! Exporter configuration from command-line flags and environment variables.

use std::time::Duration;

use clap::Parser;

/// Default listen address, matching the port registered for this exporter.
pub const DEFAULT_LISTEN: &str = ":9452";

/// Command-line options. Every flag can also be set from the environment.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "NZBGet Exporter Options", long_about = None)]
pub struct ExporterConfig {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,

    /// Metric name prefix
    #[arg(long, env = "NZBGET_METRIC_NAMESPACE", default_value = "nzbget")]
    pub namespace: String,

    /// host:port to listen on
    #[arg(short, long, env = "NZBGET_LISTEN", default_value = DEFAULT_LISTEN)]
    pub listen: String,

    /// NZBGet host to export metrics for, e.g. http://localhost:6789
    #[arg(short = 'H', long, env = "NZBGET_HOST")]
    pub host: String,

    /// NZBGet username for basic auth
    #[arg(short, long, env = "NZBGET_USERNAME")]
    pub username: Option<String>,

    /// NZBGet password for basic auth
    #[arg(short, long, env = "NZBGET_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,

    /// Upstream request timeout in seconds (0 disables)
    #[arg(long, env = "NZBGET_TIMEOUT", default_value_t = 10)]
    pub timeout: u64,
}

/// Connection settings for the upstream NZBGet instance.
#[derive(Debug, Clone)]
pub struct UpstreamConfig {
    pub host: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
}

impl ExporterConfig {
    pub fn upstream(&self) -> UpstreamConfig {
        UpstreamConfig {
            host: self.host.clone(),
            username: self.username.clone(),
            password: self.password.clone(),
            timeout: Duration::from_secs(self.timeout),
        }
    }

    /// Address to bind; a bare `:port` listens on all interfaces.
    pub fn bind_address(&self) -> String {
        if self.listen.starts_with(':') {
            format!("0.0.0.0{}", self.listen)
        } else {
            self.listen.clone()
        }
    }
}
