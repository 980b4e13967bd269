//! `status` payload: live queue and server snapshot.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::Record;
use super::split::{epoch_seconds, join_halves, started_at};
use crate::error::DecodeError;

/// Activity flag of one configured news server.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct NewsServer {
    #[serde(rename = "ID")]
    pub id: i64,
    #[serde(rename = "Active", default)]
    pub active: bool,
}

/// Decoded server status.
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub article_cache: u64,
    pub day_size: u64,
    pub downloaded_size: u64,
    pub forced_size: u64,
    pub free_disk_space: u64,
    pub month_size: u64,
    pub remaining_size: u64,

    pub average_download_rate: i64,
    pub download_limit: i64,
    pub download_rate: i64,
    pub download_time_sec: i64,
    pub par_job_count: i64,
    pub post_job_count: i64,
    pub thread_count: i64,
    pub url_count: i64,
    pub queue_script_count: i64,

    pub server_paused: bool,
    pub download_paused: bool,
    pub download2_paused: bool,
    pub server_stand_by: bool,
    pub post_paused: bool,
    pub scan_paused: bool,
    pub quota_reached: bool,
    pub feed_active: bool,

    pub server_time: DateTime<Utc>,
    pub resume_time: DateTime<Utc>,
    /// Computed from `UpTimeSec` at decode time.
    pub start_time: DateTime<Utc>,

    pub news_servers: Vec<NewsServer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct RawStatus {
    article_cache_lo: i64,
    article_cache_hi: u32,
    day_size_lo: i64,
    day_size_hi: u32,
    downloaded_size_lo: i64,
    downloaded_size_hi: u32,
    forced_size_lo: i64,
    forced_size_hi: u32,
    free_disk_space_lo: i64,
    free_disk_space_hi: u32,
    month_size_lo: i64,
    month_size_hi: u32,
    remaining_size_lo: i64,
    remaining_size_hi: u32,

    average_download_rate: i64,
    download_limit: i64,
    download_rate: i64,
    download_time_sec: i64,
    par_job_count: i64,
    post_job_count: i64,
    thread_count: i64,
    #[serde(rename = "UrlCount")]
    url_count: i64,
    queue_script_count: i64,

    server_paused: bool,
    download_paused: bool,
    download2_paused: bool,
    #[serde(rename = "ServerStandBy")]
    server_stand_by: bool,
    post_paused: bool,
    scan_paused: bool,
    quota_reached: bool,
    feed_active: bool,

    server_time: i64,
    resume_time: i64,
    #[serde(rename = "UpTimeSec")]
    up_time_sec: i64,

    news_servers: Vec<Record<NewsServer>>,
}

impl Status {
    /// Decode a `status` result relative to the given clock reading.
    pub fn decode_at(payload: serde_json::Value, now: DateTime<Utc>) -> Result<Self, DecodeError> {
        let Record(raw): Record<RawStatus> = serde_json::from_value(payload)?;

        Ok(Self {
            article_cache: join_halves("ArticleCache", raw.article_cache_lo, raw.article_cache_hi)?,
            day_size: join_halves("DaySize", raw.day_size_lo, raw.day_size_hi)?,
            downloaded_size: join_halves(
                "DownloadedSize",
                raw.downloaded_size_lo,
                raw.downloaded_size_hi,
            )?,
            forced_size: join_halves("ForcedSize", raw.forced_size_lo, raw.forced_size_hi)?,
            free_disk_space: join_halves(
                "FreeDiskSpace",
                raw.free_disk_space_lo,
                raw.free_disk_space_hi,
            )?,
            month_size: join_halves("MonthSize", raw.month_size_lo, raw.month_size_hi)?,
            remaining_size: join_halves(
                "RemainingSize",
                raw.remaining_size_lo,
                raw.remaining_size_hi,
            )?,

            average_download_rate: raw.average_download_rate,
            download_limit: raw.download_limit,
            download_rate: raw.download_rate,
            download_time_sec: raw.download_time_sec,
            par_job_count: raw.par_job_count,
            post_job_count: raw.post_job_count,
            thread_count: raw.thread_count,
            url_count: raw.url_count,
            queue_script_count: raw.queue_script_count,

            server_paused: raw.server_paused,
            download_paused: raw.download_paused,
            download2_paused: raw.download2_paused,
            server_stand_by: raw.server_stand_by,
            post_paused: raw.post_paused,
            scan_paused: raw.scan_paused,
            quota_reached: raw.quota_reached,
            feed_active: raw.feed_active,

            server_time: epoch_seconds("ServerTime", raw.server_time)?,
            resume_time: epoch_seconds("ResumeTime", raw.resume_time)?,
            start_time: started_at(now, raw.up_time_sec)?,

            news_servers: raw
                .news_servers
                .into_iter()
                .map(|Record(server)| server)
                .collect(),
        })
    }
}
