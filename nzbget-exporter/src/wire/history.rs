//! `history` payload: completed download jobs.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::Deserialize;

use super::codes::{
    DeleteStatus, ExParStatus, HistoryKind, MarkStatus, MoveStatus, ParStatus, RawCode,
    ScriptStatus, UnpackStatus, UrlStatus, decode_code,
};
use super::Record;
use super::split::{epoch_seconds, join_halves};
use crate::error::DecodeError;

/// A `"<status>/<reason>"` pair such as `SUCCESS/HEALTH`, lower-cased.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CompositeStatus {
    pub status: String,
    pub reason: String,
}

impl FromStr for CompositeStatus {
    type Err = DecodeError;

    /// Splits on the first `/`; anything after it belongs to the reason.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.to_lowercase();
        let (status, reason) = lower
            .split_once('/')
            .ok_or_else(|| DecodeError::CompositeStatus(s.to_string()))?;
        Ok(Self {
            status: status.to_string(),
            reason: reason.to_string(),
        })
    }
}

/// One history entry.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryRecord {
    pub nzb_id: i64,
    pub name: String,
    pub kind: HistoryKind,
    pub category: String,

    /// Raw `Status` field as sent by the server.
    pub raw_status: String,
    /// Decoded `Status`; `None` when the raw value has no separator.
    pub status: Option<CompositeStatus>,
    pub par_status: ParStatus,
    pub ex_par_status: ExParStatus,
    pub unpack_status: UnpackStatus,
    pub url_status: UrlStatus,
    pub move_status: MoveStatus,
    pub script_status: ScriptStatus,
    pub delete_status: DeleteStatus,
    pub mark_status: MarkStatus,

    pub file_size: u64,
    pub downloaded_size: u64,
    pub file_count: u64,
    pub remaining_file_count: u64,
    pub total_articles: u64,
    pub success_articles: u64,
    pub failed_articles: u64,
    pub health: i64,
    pub critical_health: i64,

    pub download_time_sec: u64,
    pub post_total_time_sec: u64,
    pub par_time_sec: u64,
    pub repair_time_sec: u64,
    pub unpack_time_sec: u64,

    pub history_time: DateTime<Utc>,
    pub min_post_time: DateTime<Utc>,
    pub max_post_time: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct RawHistory {
    #[serde(rename = "NZBID")]
    nzb_id: i64,
    name: String,
    kind: RawCode,
    category: String,

    status: String,
    par_status: RawCode,
    ex_par_status: RawCode,
    unpack_status: RawCode,
    url_status: RawCode,
    move_status: RawCode,
    script_status: RawCode,
    delete_status: RawCode,
    mark_status: RawCode,

    file_size_lo: i64,
    file_size_hi: u32,
    downloaded_size_lo: i64,
    downloaded_size_hi: u32,
    file_count: u64,
    remaining_file_count: u64,
    total_articles: u64,
    success_articles: u64,
    failed_articles: u64,
    health: i64,
    critical_health: i64,

    download_time_sec: u64,
    post_total_time_sec: u64,
    par_time_sec: u64,
    repair_time_sec: u64,
    unpack_time_sec: u64,

    history_time: i64,
    min_post_time: i64,
    max_post_time: i64,
}

impl TryFrom<RawHistory> for HistoryRecord {
    type Error = DecodeError;

    fn try_from(raw: RawHistory) -> Result<Self, Self::Error> {
        Ok(Self {
            nzb_id: raw.nzb_id,
            name: raw.name,
            kind: decode_code(&raw.kind),
            category: raw.category,

            status: raw.status.parse().ok(),
            raw_status: raw.status,
            par_status: decode_code(&raw.par_status),
            ex_par_status: decode_code(&raw.ex_par_status),
            unpack_status: decode_code(&raw.unpack_status),
            url_status: decode_code(&raw.url_status),
            move_status: decode_code(&raw.move_status),
            script_status: decode_code(&raw.script_status),
            delete_status: decode_code(&raw.delete_status),
            mark_status: decode_code(&raw.mark_status),

            file_size: join_halves("FileSize", raw.file_size_lo, raw.file_size_hi)?,
            downloaded_size: join_halves(
                "DownloadedSize",
                raw.downloaded_size_lo,
                raw.downloaded_size_hi,
            )?,
            file_count: raw.file_count,
            remaining_file_count: raw.remaining_file_count,
            total_articles: raw.total_articles,
            success_articles: raw.success_articles,
            failed_articles: raw.failed_articles,
            health: raw.health,
            critical_health: raw.critical_health,

            download_time_sec: raw.download_time_sec,
            post_total_time_sec: raw.post_total_time_sec,
            par_time_sec: raw.par_time_sec,
            repair_time_sec: raw.repair_time_sec,
            unpack_time_sec: raw.unpack_time_sec,

            history_time: epoch_seconds("HistoryTime", raw.history_time)?,
            min_post_time: epoch_seconds("MinPostTime", raw.min_post_time)?,
            max_post_time: epoch_seconds("MaxPostTime", raw.max_post_time)?,
        })
    }
}

/// Decode the full `history` list.
pub fn decode_history(payload: serde_json::Value) -> Result<Vec<HistoryRecord>, DecodeError> {
    let raw: Vec<Record<RawHistory>> = serde_json::from_value(payload)?;
    raw.into_iter()
        .map(|Record(row)| HistoryRecord::try_from(row))
        .collect()
}
