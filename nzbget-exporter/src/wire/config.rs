//! `config` payload: a flat list of `{Name, Value}` option pairs.
//!
//! Option names are either plain (`DiskSpace`) or address an indexed group
//! (`Server3.Active`, `Category1.Name`). Every value arrives as a string and is
//! coerced to the type of the destination field through a static setter table.

use serde::Deserialize;

use super::Record;
use crate::error::{DecodeError, Error};

/// Upper bound on an indexed group position (`Server<N>`).
const MAX_SLOT_INDEX: usize = 4096;

/// Assigns one raw option value to a field of `T`.
type Setter<T> = fn(&mut T, &str);

/// Conversion of an option string to a typed field value.
///
/// `None` leaves the destination untouched.
pub trait Coerce: Sized {
    fn coerce(raw: &str) -> Option<Self>;
}

impl Coerce for i64 {
    fn coerce(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

impl Coerce for u16 {
    fn coerce(raw: &str) -> Option<Self> {
        raw.trim().parse().ok()
    }
}

impl Coerce for bool {
    fn coerce(raw: &str) -> Option<Self> {
        Some(parse_bool(raw))
    }
}

impl Coerce for String {
    fn coerce(raw: &str) -> Option<Self> {
        Some(raw.to_string())
    }
}

impl<T: Coerce + Default> Coerce for Vec<T> {
    fn coerce(raw: &str) -> Option<Self> {
        Some(
            raw.split(',')
                .map(|item| T::coerce(item.trim()).unwrap_or_default())
                .collect(),
        )
    }
}

/// Tolerant boolean: true/t/yes/y are truthy, everything else is false.
pub fn parse_bool(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "true" | "t" | "yes" | "y"
    )
}

fn assign<T: Coerce>(slot: &mut T, raw: &str) {
    if let Some(value) = T::coerce(raw) {
        *slot = value;
    }
}

macro_rules! field_setters {
    ($target:ty { $($key:literal => $field:ident),* $(,)? }) => {
        &[$(($key, (|target: &mut $target, raw: &str| assign(&mut target.$field, raw)) as Setter<$target>)),*]
    };
}

/// Growable list of 1-based slots for an indexed option group.
#[derive(Debug, Clone, PartialEq)]
pub struct SlotArena<T> {
    slots: Vec<T>,
}

impl<T> Default for SlotArena<T> {
    fn default() -> Self {
        Self { slots: Vec::new() }
    }
}

impl<T: Default> SlotArena<T> {
    /// Mutable access to slot `index` (1-based), growing the arena if needed.
    ///
    /// Capacity doubles rather than growing one slot at a time, since group
    /// options arrive in index order.
    pub fn slot_mut(&mut self, index: usize) -> &mut T {
        debug_assert!(index >= 1);
        if index > self.slots.len() {
            if index > self.slots.capacity() {
                let mut capacity = self.slots.capacity().max(2);
                while capacity < index {
                    capacity *= 2;
                }
                self.slots.reserve_exact(capacity - self.slots.len());
            }
            self.slots.resize_with(index, T::default);
        }
        &mut self.slots[index - 1]
    }
}

impl<T> SlotArena<T> {
    /// Look up slot `id` (1-based), rejecting references outside the arena.
    pub fn get(&self, id: i64) -> Result<&T, Error> {
        usize::try_from(id)
            .ok()
            .and_then(|id| id.checked_sub(1))
            .and_then(|index| self.slots.get(index))
            .ok_or(Error::OutOfRange {
                id,
                len: self.slots.len(),
            })
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.slots.capacity()
    }
}

/// One `ServerN.*` option group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigServer {
    pub active: bool,
    pub name: String,
    pub level: i64,
    pub optional: bool,
    pub group: i64,
    pub host: String,
    pub port: u16,
    pub username: String,
    pub encryption: bool,
    pub cipher: String,
    pub connections: i64,
    pub retention: i64,
    pub ip_version: String,
    pub join_group: bool,
    pub notes: String,
}

impl ConfigServer {
    const FIELDS: &'static [(&'static str, Setter<Self>)] = field_setters!(ConfigServer {
        "Active" => active,
        "Name" => name,
        "Level" => level,
        "Optional" => optional,
        "Group" => group,
        "Host" => host,
        "Port" => port,
        "Username" => username,
        "Encryption" => encryption,
        "Cipher" => cipher,
        "Connections" => connections,
        "Retention" => retention,
        "IpVersion" => ip_version,
        "JoinGroup" => join_group,
        "Notes" => notes,
    });
}

/// One `CategoryN.*` option group.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigCategory {
    pub name: String,
    pub dest_dir: String,
    pub unpack: bool,
    pub extensions: Vec<String>,
    pub aliases: Vec<String>,
}

impl ConfigCategory {
    const FIELDS: &'static [(&'static str, Setter<Self>)] = field_setters!(ConfigCategory {
        "Name" => name,
        "DestDir" => dest_dir,
        "Unpack" => unpack,
        "Extensions" => extensions,
        "Aliases" => aliases,
    });
}

/// Decoded NZBGet configuration.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NzbgetConfig {
    pub main_dir: String,
    pub dest_dir: String,
    pub inter_dir: String,
    pub nzb_dir: String,
    pub queue_dir: String,
    pub temp_dir: String,
    pub script_dir: String,
    pub control_ip: String,
    pub control_port: i64,
    pub secure_control: bool,
    pub append_category_dir: bool,
    pub article_cache: i64,
    pub article_retries: i64,
    pub article_interval: i64,
    pub article_timeout: i64,
    pub url_connections: i64,
    pub url_retries: i64,
    pub url_timeout: i64,
    pub download_rate: i64,
    pub write_buffer: i64,
    pub cert_check: bool,
    pub continue_partial: bool,
    pub crc_check: bool,
    pub direct_rename: bool,
    pub direct_unpack: bool,
    pub direct_write: bool,
    pub dupe_check: bool,
    pub flush_queue: bool,
    pub raw_article: bool,
    pub skip_write: bool,
    pub unpack: bool,
    pub par_repair: bool,
    pub par_rename: bool,
    pub par_quick: bool,
    /// Minimum free disk space in MiB before downloads pause.
    pub disk_space: i64,
    pub daily_quota: i64,
    pub monthly_quota: i64,
    pub quota_start_day: i64,
    pub keep_history: i64,
    pub feed_history: i64,
    pub par_threads: i64,
    pub par_buffer: i64,
    pub par_check: String,
    pub par_scan: String,
    pub post_strategy: String,
    pub health_check: String,
    pub file_naming: String,
    pub update_check: String,
    pub version: String,
    pub par_ignore_ext: Vec<String>,
    pub ext_cleanup_disk: Vec<String>,
    pub extensions: Vec<String>,
    pub script_order: Vec<String>,
    pub servers: SlotArena<ConfigServer>,
    pub categories: SlotArena<ConfigCategory>,
}

impl NzbgetConfig {
    const FIELDS: &'static [(&'static str, Setter<Self>)] = field_setters!(NzbgetConfig {
        "MainDir" => main_dir,
        "DestDir" => dest_dir,
        "InterDir" => inter_dir,
        "NzbDir" => nzb_dir,
        "QueueDir" => queue_dir,
        "TempDir" => temp_dir,
        "ScriptDir" => script_dir,
        "ControlIP" => control_ip,
        "ControlPort" => control_port,
        "SecureControl" => secure_control,
        "AppendCategoryDir" => append_category_dir,
        "ArticleCache" => article_cache,
        "ArticleRetries" => article_retries,
        "ArticleInterval" => article_interval,
        "ArticleTimeout" => article_timeout,
        "UrlConnections" => url_connections,
        "UrlRetries" => url_retries,
        "UrlTimeout" => url_timeout,
        "DownloadRate" => download_rate,
        "WriteBuffer" => write_buffer,
        "CertCheck" => cert_check,
        "ContinuePartial" => continue_partial,
        "CrcCheck" => crc_check,
        "DirectRename" => direct_rename,
        "DirectUnpack" => direct_unpack,
        "DirectWrite" => direct_write,
        "DupeCheck" => dupe_check,
        "FlushQueue" => flush_queue,
        "RawArticle" => raw_article,
        "SkipWrite" => skip_write,
        "Unpack" => unpack,
        "ParRepair" => par_repair,
        "ParRename" => par_rename,
        "ParQuick" => par_quick,
        "DiskSpace" => disk_space,
        "DailyQuota" => daily_quota,
        "MonthlyQuota" => monthly_quota,
        "QuotaStartDay" => quota_start_day,
        "KeepHistory" => keep_history,
        "FeedHistory" => feed_history,
        "ParThreads" => par_threads,
        "ParBuffer" => par_buffer,
        "ParCheck" => par_check,
        "ParScan" => par_scan,
        "PostStrategy" => post_strategy,
        "HealthCheck" => health_check,
        "FileNaming" => file_naming,
        "UpdateCheck" => update_check,
        "Version" => version,
        "ParIgnoreExt" => par_ignore_ext,
        "ExtCleanupDisk" => ext_cleanup_disk,
        "Extensions" => extensions,
        "ScriptOrder" => script_order,
    });

    /// Decode a `config` result.
    pub fn decode(payload: serde_json::Value) -> Result<Self, DecodeError> {
        let entries: Vec<Record<ConfigEntry>> = serde_json::from_value(payload)?;
        let mut config = Self::default();
        for Record(entry) in &entries {
            config.apply(&entry.name, &entry.value);
        }
        Ok(config)
    }

    /// Apply a single option. Unknown names are ignored.
    pub fn apply(&mut self, name: &str, value: &str) {
        let Some((group, field)) = name.split_once('.') else {
            apply_field(self, Self::FIELDS, name, value);
            return;
        };

        let Some((prefix, index)) = split_group(group) else {
            return;
        };

        match prefix {
            "Server" => apply_field(
                self.servers.slot_mut(index),
                ConfigServer::FIELDS,
                field,
                value,
            ),
            "Category" => apply_field(
                self.categories.slot_mut(index),
                ConfigCategory::FIELDS,
                field,
                value,
            ),
            _ => {}
        }
    }

    /// Minimum free disk space in bytes.
    pub fn disk_space_bytes(&self) -> i64 {
        self.disk_space.saturating_mul(1024 * 1024)
    }
}

#[derive(Debug, Deserialize)]
struct ConfigEntry {
    #[serde(rename = "Name")]
    name: String,
    #[serde(rename = "Value", default)]
    value: String,
}

fn apply_field<T>(target: &mut T, fields: &[(&str, Setter<T>)], name: &str, value: &str) {
    if let Some((_, setter)) = fields.iter().find(|(key, _)| *key == name) {
        setter(target, value);
    }
}

/// Split `Server12` into (`Server`, 12). The prefix must be digit-free and the
/// index between 1 and [`MAX_SLOT_INDEX`].
fn split_group(group: &str) -> Option<(&str, usize)> {
    let prefix = group.trim_end_matches(|c: char| c.is_ascii_digit());
    let digits = &group[prefix.len()..];
    if prefix.is_empty() || digits.is_empty() || prefix.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let index: usize = digits.parse().ok()?;
    (1..=MAX_SLOT_INDEX).contains(&index).then_some((prefix, index))
}
