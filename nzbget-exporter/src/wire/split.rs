//! 64-bit magnitudes transported as two 32-bit JSON fields.
//!
//! NZBGet serialises large sizes as `<Field>Lo` / `<Field>Hi`. The low half is
//! written through a signed 32-bit integer on the server side, so values above
//! `i32::MAX` arrive negative. Both encodings of the low half are accepted and
//! the bit pattern is reinterpreted as unsigned before combining.

use chrono::{DateTime, TimeDelta, Utc};

use crate::error::DecodeError;

/// Combine a split 64-bit value.
///
/// `lo` may be any value representable as either `i32` or `u32`.
pub fn join_halves(field: &'static str, lo: i64, hi: u32) -> Result<u64, DecodeError> {
    if lo < i64::from(i32::MIN) || lo > i64::from(u32::MAX) {
        return Err(DecodeError::SplitHalf { field, value: lo });
    }
    Ok((u64::from(hi) << 32) | u64::from(lo as u32))
}

/// Convert epoch seconds to an absolute timestamp.
pub fn epoch_seconds(field: &'static str, secs: i64) -> Result<DateTime<Utc>, DecodeError> {
    DateTime::from_timestamp(secs, 0).ok_or(DecodeError::Timestamp { field, value: secs })
}

/// Derive the start time from an uptime counter, relative to `now`.
pub fn started_at(now: DateTime<Utc>, uptime_secs: i64) -> Result<DateTime<Utc>, DecodeError> {
    TimeDelta::try_seconds(uptime_secs)
        .and_then(|uptime| now.checked_sub_signed(uptime))
        .ok_or(DecodeError::Timestamp {
            field: "UpTimeSec",
            value: uptime_secs,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_negative_low_half() {
        assert_eq!(join_halves("TotalSize", -1059258586, 3).unwrap(), 16120610598);
    }

    #[test]
    fn test_positive_low_half() {
        assert_eq!(
            join_halves("TotalSize", 330321954, 762).unwrap(),
            3273095401506
        );
    }

    #[test]
    fn test_low_half_out_of_range() {
        assert!(join_halves("FileSize", i64::from(u32::MAX) + 1, 0).is_err());
        assert!(join_halves("FileSize", i64::from(i32::MIN) - 1, 0).is_err());
    }

    #[test]
    fn test_started_at() {
        let now = DateTime::from_timestamp(1_600_000_000, 0).unwrap();
        let start = started_at(now, 3600).unwrap();
        assert_eq!(start.timestamp(), 1_599_996_400);
    }

    proptest! {
        #[test]
        fn signed_low_half_matches_unsigned(lo in any::<i32>(), hi in any::<u32>()) {
            let expected = (u64::from(hi) << 32) | u64::from(lo as u32);
            prop_assert_eq!(join_halves("x", i64::from(lo), hi).unwrap(), expected);
            // the unsigned spelling of the same bits decodes identically
            prop_assert_eq!(join_halves("x", i64::from(lo as u32), hi).unwrap(), expected);
        }
    }
}
