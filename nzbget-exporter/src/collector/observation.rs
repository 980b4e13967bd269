use std::sync::Arc;

use tokio::sync::mpsc;

use crate::Error;
use crate::metrics::MetricId;

/// An independent fetch unit of one scrape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum FetchUnit {
    Config,
    Version,
    Status,
    ServerVolumes,
    History,
}

/// One value produced during a scrape.
#[derive(Debug, Clone)]
pub enum Observation {
    Sample {
        metric: MetricId,
        value: f64,
        /// Label values in the order of the metric's label schema.
        labels: Vec<String>,
    },
    /// The unit could not be fetched this cycle.
    Fault { unit: FetchUnit, error: Arc<Error> },
}

impl Observation {
    pub fn metric(&self) -> Option<MetricId> {
        match self {
            Self::Sample { metric, .. } => Some(*metric),
            Self::Fault { .. } => None,
        }
    }
}

/// Sending half handed to each fetch unit.
#[derive(Debug, Clone)]
pub struct Emitter {
    tx: mpsc::UnboundedSender<Observation>,
}

impl Emitter {
    pub fn new(tx: mpsc::UnboundedSender<Observation>) -> Self {
        Self { tx }
    }

    fn send(&self, observation: Observation) {
        // The receiver outlives every unit of a scrape.
        let _ = self.tx.send(observation);
    }

    pub fn sample(&self, metric: MetricId, value: f64) {
        self.labeled(metric, value, Vec::new());
    }

    pub fn flag(&self, metric: MetricId, flag: bool) {
        self.sample(metric, if flag { 1.0 } else { 0.0 });
    }

    pub fn labeled(&self, metric: MetricId, value: f64, labels: Vec<String>) {
        self.send(Observation::Sample {
            metric,
            value,
            labels,
        });
    }

    /// Mark `unit` as fetched.
    pub fn success(&self, unit: FetchUnit) {
        self.labeled(MetricId::CollectSuccess, 1.0, vec![unit.to_string()]);
    }

    pub fn fault(&self, unit: FetchUnit, error: Error) {
        self.send(Observation::Fault {
            unit,
            error: Arc::new(error),
        });
    }
}
