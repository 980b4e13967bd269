//! `servervolumes` payload: cumulative transfer statistics per news server.

use serde::Deserialize;

use super::Record;
use super::split::join_halves;
use crate::error::DecodeError;

/// Cumulative statistics of one server. `id == 0` is the all-servers total.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerVolume {
    pub id: i64,
    pub total_bytes: u64,
    pub total_article_success: u64,
    pub total_article_failed: u64,
}

impl ServerVolume {
    /// Whether this row is the synthetic cross-server total.
    pub fn is_total(&self) -> bool {
        self.id == 0
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct RawArticlesPerDay {
    success: u64,
    failed: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "PascalCase", default)]
struct RawServerVolume {
    #[serde(rename = "ServerID")]
    server_id: i64,
    total_size_lo: i64,
    total_size_hi: u32,
    articles_per_days: Vec<Record<RawArticlesPerDay>>,
}

impl TryFrom<RawServerVolume> for ServerVolume {
    type Error = DecodeError;

    fn try_from(raw: RawServerVolume) -> Result<Self, Self::Error> {
        let (success, failed) = raw
            .articles_per_days
            .iter()
            .fold((0u64, 0u64), |(success, failed), Record(day)| {
                (
                    success.saturating_add(day.success),
                    failed.saturating_add(day.failed),
                )
            });

        Ok(Self {
            id: raw.server_id,
            total_bytes: join_halves("TotalSize", raw.total_size_lo, raw.total_size_hi)?,
            total_article_success: success,
            total_article_failed: failed,
        })
    }
}

/// Decode the full `servervolumes` list.
pub fn decode_volumes(payload: serde_json::Value) -> Result<Vec<ServerVolume>, DecodeError> {
    let raw: Vec<Record<RawServerVolume>> = serde_json::from_value(payload)?;
    raw.into_iter()
        .map(|Record(row)| ServerVolume::try_from(row))
        .collect()
}
