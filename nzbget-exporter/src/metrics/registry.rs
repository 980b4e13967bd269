//! Static declaration of every exported metric.

use strum::IntoEnumIterator;

/// Prometheus value type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum MetricKind {
    Gauge,
    Counter,
}

const NO_LABELS: &[&str] = &[];
const SERVER_LABELS: &[&str] = &["id", "server"];
const STATUS_LABEL: &[&str] = &["status"];

/// Identifier of a declared metric family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, strum::EnumIter)]
pub enum MetricId {
    Version,
    CollectSuccess,

    DiskSpaceMin,

    ArticleCache,
    DiskSpaceFree,
    DownloadLimit,
    DownloadPaused,
    DownloadTime,
    DownloadedSize,
    ForcedSize,
    PostJobCount,
    PostActive,
    QuotaDay,
    QuotaMonth,
    QuotaReached,
    RemainingSize,
    ResumeTime,
    ScanActive,
    ServerStandBy,
    StartTime,
    ThreadCount,
    UrlCount,

    NewsServerActive,
    NewsServerBytes,
    NewsServerArticleSuccess,
    NewsServerArticleFailed,

    HistoryCategoryCount,
    HistoryFileSize,
    HistoryFileCount,
    HistoryRemainingFileCount,
    HistoryArticleCount,
    HistoryArticleSuccessCount,
    HistoryArticleFailedCount,
    HistoryDownloadTime,
    HistoryDownloadSize,
    HistoryPostTime,
    HistoryParTime,
    HistoryRepairTime,
    HistoryUnpackTime,
    HistoryStatusCount,
    HistoryParStatusCount,
    HistoryUnpackStatusCount,
}

struct Declaration {
    subsystem: &'static str,
    name: &'static str,
    help: &'static str,
    labels: &'static [&'static str],
    kind: MetricKind,
}

const fn gauge(subsystem: &'static str, name: &'static str, help: &'static str) -> Declaration {
    Declaration {
        subsystem,
        name,
        help,
        labels: NO_LABELS,
        kind: MetricKind::Gauge,
    }
}

const fn counter(subsystem: &'static str, name: &'static str, help: &'static str) -> Declaration {
    Declaration {
        subsystem,
        name,
        help,
        labels: NO_LABELS,
        kind: MetricKind::Counter,
    }
}

impl Declaration {
    const fn labeled(self, labels: &'static [&'static str]) -> Self {
        Self { labels, ..self }
    }
}

impl MetricId {
    fn declaration(self) -> Declaration {
        use MetricId::*;
        match self {
            Version => gauge("", "version", "always 1. label 'version' contains nzbget server version")
                .labeled(&["version"]),
            CollectSuccess => gauge(
                "collect",
                "success",
                "1 if the last fetch of the named api unit succeeded, 0 if it failed",
            )
            .labeled(&["unit"]),

            DiskSpaceMin => gauge(
                "disk",
                "min_bytes",
                "Disk space limit before pausing the download queue",
            ),

            ArticleCache => gauge("article_cache", "bytes", "Current usage of article cache"),
            DiskSpaceFree => gauge("disk", "free_bytes", "Free disk space on 'DestDir'"),
            DownloadLimit => gauge(
                "download",
                "limit",
                "Current download limit, in bytes per second",
            ),
            DownloadPaused => gauge(
                "download",
                "paused",
                "1 if the download queue is paused, 0 otherwise",
            ),
            DownloadTime => gauge("download", "time_seconds", "Server download time in seconds"),
            DownloadedSize => counter(
                "downloaded",
                "total_bytes",
                "Total data downloaded since server start",
            ),
            ForcedSize => gauge(
                "forced",
                "bytes",
                "Remaining size of entries with FORCE priority",
            ),
            PostJobCount => gauge(
                "post",
                "job_count",
                "Number of Par-Jobs or Post-processing script jobs in the post-processing queue",
            ),
            PostActive => gauge(
                "post",
                "active",
                "1 if post-processor queue is currently active, 0 if paused",
            ),
            QuotaDay => gauge("quota", "day_bytes", "Daily quota in bytes"),
            QuotaMonth => gauge("quota", "month_bytes", "Monthly quota in bytes"),
            QuotaReached => gauge("quota", "reached", "1 if quota has been hit, 0 otherwise"),
            RemainingSize => gauge(
                "queue",
                "remaining_bytes",
                "Remaining size of all entries in download queue",
            ),
            ResumeTime => gauge(
                "resume",
                "time",
                "Time to resume if set with method \"scheduleresume\"",
            ),
            ScanActive => gauge(
                "scan",
                "active",
                "1 if the scanning of incoming nzb-directory is currently active, 0 if paused",
            ),
            ServerStandBy => gauge(
                "",
                "standby",
                "1 if no downloads in progress (server paused or all jobs completed), otherwise 0 if there are currently downloads running",
            ),
            StartTime => gauge("start_time", "seconds", "Server start time, in unixtime"),
            ThreadCount => gauge("thread", "count", "Number of threads running"),
            UrlCount => gauge(
                "url",
                "count",
                "Number of URLs in the URL-queue (including current file)",
            ),

            NewsServerActive => gauge(
                "news_server",
                "active",
                "News server used for obtaining articles, 1 if active",
            )
            .labeled(SERVER_LABELS),
            NewsServerBytes => gauge(
                "news_server",
                "total_bytes",
                "Total bytes downloaded from this news server",
            )
            .labeled(SERVER_LABELS),
            NewsServerArticleSuccess => counter(
                "news_server",
                "total_article_success",
                "Total successful articles from this news server",
            )
            .labeled(SERVER_LABELS),
            NewsServerArticleFailed => counter(
                "news_server",
                "total_article_failed",
                "Total failed articles from this news server",
            )
            .labeled(SERVER_LABELS),

            HistoryCategoryCount => counter(
                "history_category",
                "count",
                "Number of history items in each category",
            )
            .labeled(&["category"]),
            HistoryFileSize => counter(
                "history_file_size",
                "total_bytes",
                "Total bytes of all files in history",
            ),
            HistoryFileCount => counter("history_file", "count", "Number of files in history"),
            HistoryRemainingFileCount => counter(
                "history_file",
                "remaining_count",
                "Number of remaining files parked in history",
            ),
            HistoryArticleCount => {
                counter("history_article", "count", "Number of articles in history")
            }
            HistoryArticleSuccessCount => counter(
                "history_article",
                "success_count",
                "Number of successful articles in history",
            ),
            HistoryArticleFailedCount => counter(
                "history_article",
                "failed_count",
                "Number of failed articles in history",
            ),
            HistoryDownloadTime => {
                counter("history_download", "time_seconds", "Download time in seconds")
            }
            HistoryDownloadSize => counter(
                "history_download",
                "size_bytes",
                "Total downloaded size in history, in bytes",
            ),
            HistoryPostTime => counter(
                "history_post_process",
                "time_seconds",
                "Total post-processing time in seconds in history",
            ),
            HistoryParTime => counter(
                "history_par",
                "time_seconds",
                "Total par-check time in seconds in history",
            ),
            HistoryRepairTime => counter(
                "history_par_repair",
                "time_seconds",
                "Par-repair time in seconds in history",
            ),
            HistoryUnpackTime => counter(
                "history_unpack",
                "time_seconds",
                "Unpack time in seconds in history",
            ),
            HistoryStatusCount => counter(
                "history_status",
                "count",
                "Number of history items per status",
            )
            .labeled(&["status", "reason"]),
            HistoryParStatusCount => counter(
                "history_par_status",
                "count",
                "Number of history items per par status",
            )
            .labeled(STATUS_LABEL),
            HistoryUnpackStatusCount => counter(
                "history_unpack_status",
                "count",
                "Number of history items per unpack status",
            )
            .labeled(STATUS_LABEL),
        }
    }
}

/// Join the non-empty parts of a metric name with `_`.
pub fn fq_name(namespace: &str, subsystem: &str, name: &str) -> String {
    [namespace, subsystem, name]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("_")
}

/// A fully-qualified metric description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetricDesc {
    pub id: MetricId,
    pub name: String,
    pub help: &'static str,
    pub labels: &'static [&'static str],
    pub kind: MetricKind,
}

/// The immutable set of metric descriptions for one namespace.
#[derive(Debug, Clone)]
pub struct MetricRegistry {
    namespace: String,
    descs: Vec<MetricDesc>,
}

impl MetricRegistry {
    pub fn new(namespace: impl Into<String>) -> Self {
        let namespace = namespace.into();
        let descs = MetricId::iter()
            .map(|id| {
                let decl = id.declaration();
                MetricDesc {
                    id,
                    name: fq_name(&namespace, decl.subsystem, decl.name),
                    help: decl.help,
                    labels: decl.labels,
                    kind: decl.kind,
                }
            })
            .collect();

        Self { namespace, descs }
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Description of `id`.
    pub fn desc(&self, id: MetricId) -> &MetricDesc {
        // descs is built from MetricId::iter(), so position == discriminant
        &self.descs[id as usize]
    }

    /// Enumerate every declared metric without fetching anything.
    pub fn describe(&self) -> impl Iterator<Item = &MetricDesc> {
        self.descs.iter()
    }
}
