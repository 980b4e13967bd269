//! Per-scrape collection.
//!
//! Every scrape spawns one task per [`FetchUnit`]. Units report through a
//! shared channel and never wait on each other's data. The only dependency is
//! the config fetch: the status and server-volumes units need server names
//! for their per-server series, so they wait on a [`ConfigSignal`] after they
//! have emitted everything else. [`Collector::collect`] returns once every
//! unit has finished.

mod observation;
mod signal;
mod units;

pub use observation::{Emitter, FetchUnit, Observation};
pub use signal::{ConfigOutcome, ConfigPublisher, ConfigSignal};

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinSet;
use tracing::{debug, error, warn};

use crate::Error;
use crate::api::NzbgetApi;
use crate::history::summarize;

/// Runs collection cycles against one upstream.
#[derive(Clone)]
pub struct Collector {
    api: Arc<dyn NzbgetApi>,
}

impl Collector {
    pub fn new(api: Arc<dyn NzbgetApi>) -> Self {
        Self { api }
    }

    /// Run one collection cycle.
    ///
    /// Failures surface as [`Observation::Fault`], one per failed unit.
    pub async fn collect(&self) -> Vec<Observation> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let emit = Emitter::new(tx);
        let signal = Arc::new(ConfigSignal::new());

        let mut tasks = JoinSet::new();
        let mut units = HashMap::new();

        let publisher = ConfigPublisher::new(signal.clone());
        let handle = tasks.spawn(config_unit(self.api.clone(), emit.clone(), publisher));
        units.insert(handle.id(), FetchUnit::Config);

        let handle = tasks.spawn(version_unit(self.api.clone(), emit.clone()));
        units.insert(handle.id(), FetchUnit::Version);

        let handle = tasks.spawn(status_unit(self.api.clone(), emit.clone(), signal.clone()));
        units.insert(handle.id(), FetchUnit::Status);

        let handle = tasks.spawn(volumes_unit(self.api.clone(), emit.clone(), signal));
        units.insert(handle.id(), FetchUnit::ServerVolumes);

        let handle = tasks.spawn(history_unit(self.api.clone(), emit.clone()));
        units.insert(handle.id(), FetchUnit::History);

        while let Some(joined) = tasks.join_next_with_id().await {
            if let Err(e) = joined {
                let Some(unit) = units.get(&e.id()).copied() else {
                    continue;
                };
                report(&emit, unit, Error::Task(e.to_string()));
            }
        }

        // Every task has dropped its sender; only ours is left.
        drop(emit);

        let mut observations = Vec::new();
        while let Some(observation) = rx.recv().await {
            observations.push(observation);
        }
        observations
    }
}

fn report(emit: &Emitter, unit: FetchUnit, error: Error) {
    error!(unit = %unit, kind = error.kind(), error = %error, "Failed to collect");
    emit.fault(unit, error);
}

async fn config_unit(api: Arc<dyn NzbgetApi>, emit: Emitter, publisher: ConfigPublisher) {
    match api.config().await {
        Ok(config) => {
            let config = Arc::new(config);
            publisher.publish(Some(config.clone()));
            units::emit_config(&emit, &config);
            emit.success(FetchUnit::Config);
        }
        Err(e) => {
            publisher.publish(None);
            report(&emit, FetchUnit::Config, e);
        }
    }
}

async fn version_unit(api: Arc<dyn NzbgetApi>, emit: Emitter) {
    match api.version().await {
        Ok(version) => {
            units::emit_version(&emit, &version);
            emit.success(FetchUnit::Version);
        }
        Err(e) => report(&emit, FetchUnit::Version, e),
    }
}

async fn status_unit(api: Arc<dyn NzbgetApi>, emit: Emitter, signal: Arc<ConfigSignal>) {
    let status = match api.status().await {
        Ok(status) => status,
        Err(e) => return report(&emit, FetchUnit::Status, e),
    };

    units::emit_status(&emit, &status);

    match signal.wait().await {
        Some(config) => units::emit_server_activity(&emit, &status, &config),
        None => debug!("No server config this cycle, skipping news_server_active"),
    }
    emit.success(FetchUnit::Status);
}

async fn volumes_unit(api: Arc<dyn NzbgetApi>, emit: Emitter, signal: Arc<ConfigSignal>) {
    let volumes = match api.server_volumes().await {
        Ok(volumes) => volumes,
        Err(e) => return report(&emit, FetchUnit::ServerVolumes, e),
    };

    match signal.wait().await {
        Some(config) => units::emit_server_volumes(&emit, &volumes, &config),
        None => debug!("No server config this cycle, skipping server volume series"),
    }
    emit.success(FetchUnit::ServerVolumes);
}

async fn history_unit(api: Arc<dyn NzbgetApi>, emit: Emitter) {
    let records = match api.history().await {
        Ok(records) => records,
        Err(e) => return report(&emit, FetchUnit::History, e),
    };

    let summary = summarize(&records);
    if summary.unparsed_status > 0 {
        warn!(
            records = summary.unparsed_status,
            "History records without a status/reason separator"
        );
    }

    units::emit_history(&emit, &summary);
    emit.success(FetchUnit::History);
}
