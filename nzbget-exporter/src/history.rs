//! Reduction of history records into per-scrape summary counters.

use std::collections::BTreeMap;

use crate::wire::{CategoricalCode, HistoryRecord};

/// Totals and groupings over all history records of one scrape.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HistorySummary {
    pub file_size: u64,
    pub file_count: u64,
    pub remaining_file_count: u64,
    pub article_count: u64,
    pub article_success_count: u64,
    pub article_failed_count: u64,
    pub downloaded_size: u64,

    pub download_time_sec: u64,
    pub post_time_sec: u64,
    pub par_time_sec: u64,
    pub repair_time_sec: u64,
    pub unpack_time_sec: u64,

    pub by_category: BTreeMap<String, u64>,
    /// status -> reason -> count
    pub by_status: BTreeMap<String, BTreeMap<String, u64>>,
    pub by_par_status: BTreeMap<String, u64>,
    pub by_unpack_status: BTreeMap<String, u64>,

    /// Records whose status had no `status/reason` separator.
    pub unparsed_status: u64,
}

impl HistorySummary {
    fn add(&mut self, record: &HistoryRecord) {
        self.file_size = self.file_size.saturating_add(record.file_size);
        self.file_count = self.file_count.saturating_add(record.file_count);
        self.remaining_file_count = self
            .remaining_file_count
            .saturating_add(record.remaining_file_count);
        self.article_count = self.article_count.saturating_add(record.total_articles);
        self.article_success_count = self
            .article_success_count
            .saturating_add(record.success_articles);
        self.article_failed_count = self
            .article_failed_count
            .saturating_add(record.failed_articles);
        self.downloaded_size = self.downloaded_size.saturating_add(record.downloaded_size);

        self.download_time_sec = self
            .download_time_sec
            .saturating_add(record.download_time_sec);
        self.post_time_sec = self.post_time_sec.saturating_add(record.post_total_time_sec);
        self.par_time_sec = self.par_time_sec.saturating_add(record.par_time_sec);
        self.repair_time_sec = self.repair_time_sec.saturating_add(record.repair_time_sec);
        self.unpack_time_sec = self.unpack_time_sec.saturating_add(record.unpack_time_sec);

        *self.by_category.entry(record.category.clone()).or_default() += 1;
        *self
            .by_par_status
            .entry(record.par_status.label())
            .or_default() += 1;
        *self
            .by_unpack_status
            .entry(record.unpack_status.label())
            .or_default() += 1;

        match &record.status {
            Some(status) => {
                *self
                    .by_status
                    .entry(status.status.clone())
                    .or_default()
                    .entry(status.reason.clone())
                    .or_default() += 1;
            }
            None => self.unparsed_status += 1,
        }
    }

    /// Number of records that contributed to this summary.
    pub fn record_count(&self) -> u64 {
        self.by_category.values().sum()
    }
}

/// Fold history records into a [`HistorySummary`].
///
/// The result does not depend on record order.
pub fn summarize<'a, I>(records: I) -> HistorySummary
where
    I: IntoIterator<Item = &'a HistoryRecord>,
{
    records
        .into_iter()
        .fold(HistorySummary::default(), |mut summary, record| {
            summary.add(record);
            summary
        })
}
