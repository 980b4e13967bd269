//! Decoding of NZBGet JSON-RPC payloads into typed records.
//!
//! Handles the upstream conventions that plain serde derives can't:
//! split 64-bit integers, epoch timestamps, categorical status codes with an
//! `Unknown` fallback, composite `status/reason` strings and the flat
//! `{Name, Value}` configuration list.

mod codes;
mod config;
mod history;
mod split;
mod status;
mod volume;

pub use codes::{
    CategoricalCode, DeleteStatus, ExParStatus, HistoryKind, MarkStatus, MoveStatus, ParStatus,
    RawCode, ScriptStatus, UnpackStatus, UrlStatus, decode_code,
};
pub use config::{Coerce, ConfigCategory, ConfigServer, NzbgetConfig, SlotArena, parse_bool};
pub use history::{CompositeStatus, HistoryRecord, decode_history};
pub use split::{epoch_seconds, join_halves, started_at};
pub use status::{NewsServer, Status};
pub use volume::{ServerVolume, decode_volumes};

#[cfg(test)]
pub(crate) use history::fixtures;

use chrono::Utc;
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::error::DecodeError;

/// The `{version, result}` wrapper around every JSON-RPC response.
#[derive(Debug, Deserialize)]
pub struct Envelope {
    pub version: String,
    pub result: serde_json::Value,
}

/// A record that only decodes from a JSON object.
///
/// Derived struct deserializers also accept a sequence and fill fields by
/// position, which would turn an array payload into made-up values.
#[derive(Debug)]
pub(crate) struct Record<T>(pub T);

impl<'de, T: DeserializeOwned> Deserialize<'de> for Record<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let object = Map::<String, Value>::deserialize(deserializer)?;
        T::deserialize(Value::Object(object))
            .map(Record)
            .map_err(de::Error::custom)
    }
}

/// A record shape that can be decoded from an envelope's `result`.
pub trait FromPayload: Sized {
    fn from_payload(payload: serde_json::Value) -> Result<Self, DecodeError>;
}

impl FromPayload for String {
    fn from_payload(payload: serde_json::Value) -> Result<Self, DecodeError> {
        Ok(serde_json::from_value(payload)?)
    }
}

impl FromPayload for Status {
    fn from_payload(payload: serde_json::Value) -> Result<Self, DecodeError> {
        Status::decode_at(payload, Utc::now())
    }
}

impl FromPayload for NzbgetConfig {
    fn from_payload(payload: serde_json::Value) -> Result<Self, DecodeError> {
        NzbgetConfig::decode(payload)
    }
}

impl FromPayload for Vec<ServerVolume> {
    fn from_payload(payload: serde_json::Value) -> Result<Self, DecodeError> {
        decode_volumes(payload)
    }
}

impl FromPayload for Vec<HistoryRecord> {
    fn from_payload(payload: serde_json::Value) -> Result<Self, DecodeError> {
        decode_history(payload)
    }
}
