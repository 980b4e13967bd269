//! Metric declarations and export.

mod prometheus;
mod registry;
mod sink;

pub use prometheus::{CONTENT_TYPE, TextEncoder};
pub use registry::{MetricDesc, MetricId, MetricKind, MetricRegistry, fq_name};
pub use sink::MetricSink;

use std::sync::Arc;

use crate::collector::{Collector, Observation};

/// Binds the metric registry to a collector.
#[derive(Clone)]
pub struct Exporter {
    registry: Arc<MetricRegistry>,
    collector: Collector,
}

impl Exporter {
    pub fn new(registry: Arc<MetricRegistry>, collector: Collector) -> Self {
        Self {
            registry,
            collector,
        }
    }

    pub fn registry(&self) -> &MetricRegistry {
        &self.registry
    }

    /// Every declared metric, without contacting the upstream.
    pub fn describe(&self) -> impl Iterator<Item = &MetricDesc> {
        self.registry.describe()
    }

    /// Run one collection cycle and forward its output to `sink`.
    pub async fn collect(&self, sink: &mut (dyn MetricSink + Send)) {
        let fault_desc = self.registry.desc(MetricId::CollectSuccess);

        for observation in self.collector.collect().await {
            match observation {
                Observation::Sample {
                    metric,
                    value,
                    labels,
                } => sink.sample(self.registry.desc(metric), &labels, value),
                Observation::Fault { unit, error } => sink.fault(fault_desc, unit, &error),
            }
        }
    }

    /// Run one collection cycle and render it as Prometheus text.
    pub async fn render(&self) -> String {
        let mut encoder = TextEncoder::new();
        self.collect(&mut encoder).await;
        encoder.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::NzbgetApi;
    use crate::collector::FetchUnit;
    use crate::wire::{HistoryRecord, NzbgetConfig, ServerVolume, Status};
    use crate::{Error, Result};
    use async_trait::async_trait;

    /// Upstream that only answers the version call.
    struct VersionOnly;

    #[async_trait]
    impl NzbgetApi for VersionOnly {
        async fn version(&self) -> Result<String> {
            Ok("21.1".to_string())
        }

        async fn status(&self) -> Result<Status> {
            Err(Error::HttpStatus(reqwest::StatusCode::BAD_GATEWAY))
        }

        async fn config(&self) -> Result<NzbgetConfig> {
            Err(Error::HttpStatus(reqwest::StatusCode::BAD_GATEWAY))
        }

        async fn server_volumes(&self) -> Result<Vec<ServerVolume>> {
            Err(Error::HttpStatus(reqwest::StatusCode::BAD_GATEWAY))
        }

        async fn history(&self) -> Result<Vec<HistoryRecord>> {
            Err(Error::HttpStatus(reqwest::StatusCode::BAD_GATEWAY))
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        samples: Vec<(String, Vec<String>, f64)>,
        faults: Vec<(String, FetchUnit)>,
    }

    impl MetricSink for RecordingSink {
        fn sample(&mut self, desc: &MetricDesc, labels: &[String], value: f64) {
            self.samples.push((desc.name.clone(), labels.to_vec(), value));
        }

        fn fault(&mut self, desc: &MetricDesc, unit: FetchUnit, _error: &Error) {
            self.faults.push((desc.name.clone(), unit));
        }
    }

    fn exporter(namespace: &str) -> Exporter {
        Exporter::new(
            Arc::new(MetricRegistry::new(namespace)),
            Collector::new(Arc::new(VersionOnly)),
        )
    }

    #[test]
    fn test_describe_does_not_fetch() {
        let exporter = exporter("nzbget");
        assert!(
            exporter
                .describe()
                .any(|desc| desc.name == "nzbget_history_par_repair_time_seconds")
        );
    }

    #[tokio::test]
    async fn test_collect_forwards_samples_and_faults() {
        let exporter = exporter("nzbget");
        let mut sink = RecordingSink::default();
        exporter.collect(&mut sink).await;

        assert!(sink.samples.contains(&(
            "nzbget_version".to_string(),
            vec!["21.1".to_string()],
            1.0
        )));
        assert_eq!(sink.faults.len(), 4);
        assert!(
            sink.faults
                .iter()
                .all(|(name, _)| name == "nzbget_collect_success")
        );
    }

    #[tokio::test]
    async fn test_render_marks_failed_units() {
        let output = exporter("usenet").render().await;

        assert!(output.contains("usenet_version{version=\"21.1\"} 1\n"));
        assert!(output.contains("usenet_collect_success{unit=\"version\"} 1\n"));
        assert!(output.contains("usenet_collect_success{unit=\"status\"} 0\n"));
        assert!(output.contains("# ERROR collecting status: NZBGet API response 502 Bad Gateway\n"));
        assert!(!output.contains("usenet_disk_free_bytes"));
    }
}
