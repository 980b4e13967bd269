//! Categorical status codes reported per history item.
//!
//! Codes normally arrive as upper-case strings (`"SUCCESS"`, `"REPAIR_POSSIBLE"`)
//! but older servers emit the numeric enum index. Anything unrecognised maps to
//! `Unknown` so new upstream states never break a whole record.

use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

/// Raw code as found on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum RawCode {
    Text(String),
    Index(i64),
}

impl Default for RawCode {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

/// A closed set of upstream status codes with an `Unknown` fallback.
pub trait CategoricalCode: FromStr + Default + Copy + fmt::Display {
    fn from_index(index: i16) -> Option<Self>;

    /// Lower-cased form used as a metric label value.
    fn label(&self) -> String {
        self.to_string().to_ascii_lowercase()
    }
}

/// Decode a raw code, falling back to the `Unknown` variant.
pub fn decode_code<T: CategoricalCode>(raw: &RawCode) -> T {
    match raw {
        RawCode::Text(text) => text.trim().parse().unwrap_or_default(),
        RawCode::Index(index) => i16::try_from(*index)
            .ok()
            .filter(|index| *index >= 0)
            .and_then(T::from_index)
            .unwrap_or_default(),
    }
}

macro_rules! categorical {
    ($(#[$meta:meta])* $name:ident { $($variant:ident = $index:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, Default,
            strum::Display, strum::EnumString, strum::FromRepr,
        )]
        #[strum(serialize_all = "SCREAMING_SNAKE_CASE", ascii_case_insensitive)]
        #[repr(i16)]
        pub enum $name {
            $($variant = $index,)+
            #[default]
            Unknown = -1,
        }

        impl CategoricalCode for $name {
            fn from_index(index: i16) -> Option<Self> {
                Self::from_repr(index)
            }
        }
    };
}

categorical!(
    /// Kind of history entry.
    HistoryKind { Nzb = 0, Url = 1, Dup = 2 }
);

categorical!(
    /// Result of par-check.
    ParStatus { None = 0, Failure = 1, Success = 2, RepairPossible = 3, Manual = 4 }
);

categorical!(
    /// Role of the item in a multi-item par repair.
    ExParStatus { None = 0, Recipient = 1, Donor = 2 }
);

categorical!(
    /// Result of unpack.
    UnpackStatus { None = 0, Failure = 1, Success = 2, Space = 3, Password = 4 }
);

categorical!(
    /// Result of moving files from the intermediate directory.
    MoveStatus { None = 0, Failure = 1, Success = 2 }
);

categorical!(
    /// Accumulated result of all post-processing scripts.
    ScriptStatus { None = 0, Failure = 1, Success = 2 }
);

categorical!(
    /// Why the item was deleted, if at all.
    DeleteStatus {
        None = 0,
        Manual = 1,
        Health = 2,
        Dupe = 3,
        Bad = 4,
        Good = 5,
        Copy = 6,
        Scan = 7,
    }
);

categorical!(
    /// Manual mark set by the user.
    MarkStatus { None = 0, Bad = 1, Good = 2, Success = 3 }
);

categorical!(
    /// Result of fetching an URL item.
    UrlStatus { None = 0, Success = 1, Failure = 2, ScanSkipped = 3, ScanFailure = 4 }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_text_codes() {
        let par: ParStatus = decode_code(&RawCode::Text("REPAIR_POSSIBLE".into()));
        assert_eq!(par, ParStatus::RepairPossible);
        assert_eq!(par.label(), "repair_possible");

        let unpack: UnpackStatus = decode_code(&RawCode::Text("password".into()));
        assert_eq!(unpack, UnpackStatus::Password);
    }

    #[test]
    fn test_decode_index_codes() {
        let kind: HistoryKind = decode_code(&RawCode::Index(1));
        assert_eq!(kind, HistoryKind::Url);
        let delete: DeleteStatus = decode_code(&RawCode::Index(7));
        assert_eq!(delete, DeleteStatus::Scan);
    }

    #[test]
    fn test_unrecognised_codes_are_unknown() {
        let par: ParStatus = decode_code(&RawCode::Text("QUANTUM".into()));
        assert_eq!(par, ParStatus::Unknown);
        assert_eq!(par.label(), "unknown");

        let unpack: UnpackStatus = decode_code(&RawCode::Index(42));
        assert_eq!(unpack, UnpackStatus::Unknown);

        let mark: MarkStatus = decode_code(&RawCode::Index(-1));
        assert_eq!(mark, MarkStatus::Unknown);

        let url: UrlStatus = decode_code(&RawCode::default());
        assert_eq!(url, UrlStatus::Unknown);
    }
}
