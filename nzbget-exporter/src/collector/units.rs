//! Observations emitted by each fetch unit once its data is available.

use tracing::warn;

use super::observation::Emitter;
use crate::history::HistorySummary;
use crate::metrics::MetricId;
use crate::wire::{NzbgetConfig, ServerVolume, Status};

pub fn emit_config(emit: &Emitter, config: &NzbgetConfig) {
    emit.sample(MetricId::DiskSpaceMin, config.disk_space_bytes() as f64);
}

pub fn emit_version(emit: &Emitter, version: &str) {
    emit.labeled(MetricId::Version, 1.0, vec![version.to_string()]);
}

/// Status values that don't need server names.
pub fn emit_status(emit: &Emitter, status: &Status) {
    emit.sample(MetricId::ArticleCache, status.article_cache as f64);
    emit.sample(MetricId::DiskSpaceFree, status.free_disk_space as f64);
    emit.sample(MetricId::DownloadLimit, status.download_limit as f64);
    emit.flag(MetricId::DownloadPaused, status.download_paused);
    emit.sample(MetricId::DownloadTime, status.download_time_sec as f64);
    emit.sample(MetricId::DownloadedSize, status.downloaded_size as f64);
    emit.sample(MetricId::ForcedSize, status.forced_size as f64);
    emit.sample(MetricId::PostJobCount, status.post_job_count as f64);
    emit.flag(MetricId::PostActive, !status.post_paused);
    emit.sample(MetricId::QuotaDay, status.day_size as f64);
    emit.sample(MetricId::QuotaMonth, status.month_size as f64);
    emit.flag(MetricId::QuotaReached, status.quota_reached);
    emit.sample(MetricId::RemainingSize, status.remaining_size as f64);
    emit.sample(MetricId::ResumeTime, status.resume_time.timestamp() as f64);
    emit.flag(MetricId::ScanActive, !status.scan_paused);
    emit.flag(MetricId::ServerStandBy, status.server_stand_by);
    emit.sample(MetricId::StartTime, status.start_time.timestamp() as f64);
    emit.sample(MetricId::ThreadCount, status.thread_count as f64);
    emit.sample(MetricId::UrlCount, status.url_count as f64);
}

/// `news_server_active`, driven by the server list of the status payload.
pub fn emit_server_activity(emit: &Emitter, status: &Status, config: &NzbgetConfig) {
    for server in &status.news_servers {
        let name = match config.servers.get(server.id) {
            Ok(slot) => &slot.name,
            Err(e) => {
                warn!(error = %e, "skipping news_server_active series");
                continue;
            }
        };
        emit.labeled(
            MetricId::NewsServerActive,
            if server.active { 1.0 } else { 0.0 },
            vec![server.id.to_string(), name.clone()],
        );
    }
}

/// Per-server volume series. The all-servers total row is skipped.
pub fn emit_server_volumes(emit: &Emitter, volumes: &[ServerVolume], config: &NzbgetConfig) {
    for volume in volumes.iter().filter(|volume| !volume.is_total()) {
        let name = match config.servers.get(volume.id) {
            Ok(slot) => &slot.name,
            Err(e) => {
                warn!(error = %e, "skipping news_server volume series");
                continue;
            }
        };
        let labels = vec![volume.id.to_string(), name.clone()];

        emit.labeled(
            MetricId::NewsServerBytes,
            volume.total_bytes as f64,
            labels.clone(),
        );
        emit.labeled(
            MetricId::NewsServerArticleSuccess,
            volume.total_article_success as f64,
            labels.clone(),
        );
        emit.labeled(
            MetricId::NewsServerArticleFailed,
            volume.total_article_failed as f64,
            labels,
        );
    }
}

pub fn emit_history(emit: &Emitter, summary: &HistorySummary) {
    emit.sample(MetricId::HistoryFileSize, summary.file_size as f64);
    emit.sample(MetricId::HistoryFileCount, summary.file_count as f64);
    emit.sample(
        MetricId::HistoryRemainingFileCount,
        summary.remaining_file_count as f64,
    );
    emit.sample(MetricId::HistoryArticleCount, summary.article_count as f64);
    emit.sample(
        MetricId::HistoryArticleSuccessCount,
        summary.article_success_count as f64,
    );
    emit.sample(
        MetricId::HistoryArticleFailedCount,
        summary.article_failed_count as f64,
    );
    emit.sample(MetricId::HistoryDownloadTime, summary.download_time_sec as f64);
    emit.sample(MetricId::HistoryDownloadSize, summary.downloaded_size as f64);
    emit.sample(MetricId::HistoryPostTime, summary.post_time_sec as f64);
    emit.sample(MetricId::HistoryParTime, summary.par_time_sec as f64);
    emit.sample(MetricId::HistoryRepairTime, summary.repair_time_sec as f64);
    emit.sample(MetricId::HistoryUnpackTime, summary.unpack_time_sec as f64);

    for (category, count) in &summary.by_category {
        emit.labeled(
            MetricId::HistoryCategoryCount,
            *count as f64,
            vec![category.clone()],
        );
    }
    for (status, reasons) in &summary.by_status {
        for (reason, count) in reasons {
            emit.labeled(
                MetricId::HistoryStatusCount,
                *count as f64,
                vec![status.clone(), reason.clone()],
            );
        }
    }
    for (status, count) in &summary.by_par_status {
        emit.labeled(
            MetricId::HistoryParStatusCount,
            *count as f64,
            vec![status.clone()],
        );
    }
    for (status, count) in &summary.by_unpack_status {
        emit.labeled(
            MetricId::HistoryUnpackStatusCount,
            *count as f64,
            vec![status.clone()],
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collector::Observation;
    use tokio::sync::mpsc;

    fn capture(run: impl FnOnce(&Emitter)) -> Vec<(MetricId, f64, Vec<String>)> {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let emit = Emitter::new(tx);
        run(&emit);
        drop(emit);

        let mut samples = Vec::new();
        while let Ok(observation) = rx.try_recv() {
            if let Observation::Sample {
                metric,
                value,
                labels,
            } = observation
            {
                samples.push((metric, value, labels));
            }
        }
        samples
    }

    fn config_with_servers(names: &[&str]) -> NzbgetConfig {
        let mut config = NzbgetConfig::default();
        for (index, name) in names.iter().enumerate() {
            config.apply(&format!("Server{}.Name", index + 1), name);
        }
        config
    }

    fn volume(id: i64, bytes: u64) -> ServerVolume {
        ServerVolume {
            id,
            total_bytes: bytes,
            total_article_success: 10 * id as u64,
            total_article_failed: id as u64,
        }
    }

    #[test]
    fn test_total_volume_row_is_skipped() {
        let config = config_with_servers(&["alpha", "beta"]);
        let samples = capture(|emit| {
            emit_server_volumes(emit, &[volume(0, 999), volume(2, 200)], &config)
        });

        let bytes: Vec<_> = samples
            .iter()
            .filter(|(metric, _, _)| *metric == MetricId::NewsServerBytes)
            .collect();
        assert_eq!(bytes.len(), 1);
        assert_eq!(bytes[0].1, 200.0);
        assert_eq!(bytes[0].2, vec!["2".to_string(), "beta".to_string()]);
        assert_eq!(samples.len(), 3);
    }

    #[test]
    fn test_out_of_range_volume_skips_only_that_series() {
        let config = config_with_servers(&["alpha"]);
        let samples = capture(|emit| {
            emit_server_volumes(emit, &[volume(0, 1), volume(1, 100), volume(5, 500)], &config)
        });

        assert!(samples.iter().all(|(_, _, labels)| labels[0] == "1"));
        assert_eq!(samples.len(), 3);
    }

    #[test]
    fn test_server_activity_uses_status_ids() {
        let config = config_with_servers(&["alpha", "beta"]);
        let status = Status::decode_at(
            serde_json::json!({
                "NewsServers": [
                    { "ID": 2, "Active": true },
                    { "ID": 3, "Active": true },
                    { "ID": 1, "Active": false }
                ]
            }),
            chrono::Utc::now(),
        )
        .unwrap();

        let samples = capture(|emit| emit_server_activity(emit, &status, &config));
        assert_eq!(
            samples,
            vec![
                (
                    MetricId::NewsServerActive,
                    1.0,
                    vec!["2".to_string(), "beta".to_string()]
                ),
                (
                    MetricId::NewsServerActive,
                    0.0,
                    vec!["1".to_string(), "alpha".to_string()]
                ),
            ]
        );
    }

    #[test]
    fn test_paused_flags_are_inverted_for_active_gauges() {
        let status = Status::decode_at(
            serde_json::json!({ "PostPaused": true, "ScanPaused": false }),
            chrono::Utc::now(),
        )
        .unwrap();
        let samples = capture(|emit| emit_status(emit, &status));

        let value = |id| {
            samples
                .iter()
                .find(|(metric, _, _)| *metric == id)
                .map(|(_, value, _)| *value)
        };
        assert_eq!(value(MetricId::PostActive), Some(0.0));
        assert_eq!(value(MetricId::ScanActive), Some(1.0));
        assert_eq!(samples.len(), 19);
    }

    #[test]
    fn test_history_status_labels_in_schema_order() {
        let mut summary = HistorySummary::default();
        summary
            .by_status
            .entry("success".into())
            .or_default()
            .insert("health".into(), 3);

        let samples = capture(|emit| emit_history(emit, &summary));
        let status: Vec<_> = samples
            .iter()
            .filter(|(metric, _, _)| *metric == MetricId::HistoryStatusCount)
            .collect();
        assert_eq!(status.len(), 1);
        assert_eq!(status[0].2, vec!["success".to_string(), "health".to_string()]);
        assert_eq!(status[0].1, 3.0);
    }
}
