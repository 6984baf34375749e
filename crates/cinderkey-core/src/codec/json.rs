//! Self-describing encoding (JSON).
//!
//! A key is `{"id": .., "note": .., "status": .., "k": ..}`. A keyring is
//! `{"M": [..]}` where each entry is a key's JSON bytes as base64 text.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::{Deserialize, Serialize};

use super::{Codec, KeyRecord, RingRecord};
use crate::error::KeyringError;

#[derive(Serialize, Deserialize)]
struct JsonKey {
    id: String,
    note: String,
    status: u64,
    k: String,
}

#[derive(Serialize, Deserialize)]
struct JsonRing {
    #[serde(rename = "M")]
    m: Vec<String>,
}

/// JSON codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct Json;

impl Codec for Json {
    const NAME: &'static str = "json";

    fn encode_key(record: &KeyRecord) -> Result<Vec<u8>, KeyringError> {
        let key = JsonKey {
            id: record.id.clone(),
            note: record.note.clone(),
            status: record.status.to_wire(),
            k: record.k(),
        };
        serde_json::to_vec(&key).map_err(KeyringError::serialization)
    }

    fn decode_key(bytes: &[u8]) -> Result<KeyRecord, KeyringError> {
        let key: JsonKey = serde_json::from_slice(bytes).map_err(KeyringError::serialization)?;
        KeyRecord::from_wire(key.id, key.note, key.status, &key.k)
    }

    fn encode_ring(record: &RingRecord) -> Result<Vec<u8>, KeyringError> {
        let ring = JsonRing { m: record.keys.iter().map(|key| STANDARD.encode(key)).collect() };
        serde_json::to_vec(&ring).map_err(KeyringError::serialization)
    }

    fn decode_ring(bytes: &[u8]) -> Result<RingRecord, KeyringError> {
        let ring: JsonRing = serde_json::from_slice(bytes).map_err(KeyringError::serialization)?;

        let keys = ring
            .m
            .iter()
            .map(|entry| {
                STANDARD.decode(entry).map_err(|e| {
                    KeyringError::serialization(format!("invalid base64 keyring entry: {e}"))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RingRecord { keys })
    }
}
