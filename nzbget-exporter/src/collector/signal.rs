//! One-shot completion signal for the config fetch.
//!
//! The status and server-volumes units wait on it before emitting per-server
//! series. It is written once per scrape and read-only afterwards.

use std::sync::Arc;

use tokio::sync::{Notify, OnceCell};

use crate::wire::NzbgetConfig;

/// `None` when the config fetch failed.
pub type ConfigOutcome = Option<Arc<NzbgetConfig>>;

#[derive(Debug, Default)]
pub struct ConfigSignal {
    result: OnceCell<ConfigOutcome>,
    notify: Notify,
}

impl ConfigSignal {
    pub fn new() -> Self {
        Self::default()
    }

    fn set_result(&self, result: ConfigOutcome) {
        let _ = self.result.set(result);
        self.notify.notify_waiters();
    }

    /// Wait until the config unit has finished.
    pub async fn wait(&self) -> ConfigOutcome {
        loop {
            if let Some(result) = self.result.get() {
                return result.clone();
            }

            let notified = self.notify.notified();
            if let Some(result) = self.result.get() {
                return result.clone();
            }

            notified.await;
        }
    }

    pub fn is_set(&self) -> bool {
        self.result.initialized()
    }
}

/// Write side of a [`ConfigSignal`], owned by the config unit.
///
/// Dropping it unpublished resolves the signal as failed, so waiters are
/// released even if the config unit panics.
#[derive(Debug)]
pub struct ConfigPublisher {
    signal: Arc<ConfigSignal>,
}

impl ConfigPublisher {
    pub fn new(signal: Arc<ConfigSignal>) -> Self {
        Self { signal }
    }

    pub fn publish(self, outcome: ConfigOutcome) {
        self.signal.set_result(outcome);
    }
}

impl Drop for ConfigPublisher {
    fn drop(&mut self) {
        // no-op if publish() already ran
        self.signal.set_result(None);
    }
}
