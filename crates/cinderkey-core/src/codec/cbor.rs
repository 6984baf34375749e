//! Structured encoding (CBOR via ciborium).
//!
//! A key is a four-element CBOR array `[id, note, status, k]`. A keyring is a
//! map `{"M": [bstr, ...]}` with each entry a CBOR-encoded key.
//!
//! Decoding is strict: the input must be exactly one CBOR item, and a key must
//! have exactly four fields.

use ciborium::Value;
use serde::{Deserialize, Serialize, de::DeserializeOwned};

use super::{Codec, KeyRecord, RingRecord};
use crate::error::KeyringError;

/// Positional key fields: id, note, status, k.
type CborKey = (String, String, u64, String);

const KEY_FIELDS: usize = 4;

#[derive(Serialize, Deserialize)]
struct CborRing {
    #[serde(rename = "M")]
    m: Vec<Value>,
}

/// CBOR codec.
#[derive(Debug, Clone, Copy, Default)]
pub struct Cbor;

impl Codec for Cbor {
    const NAME: &'static str = "cbor";

    fn encode_key(record: &KeyRecord) -> Result<Vec<u8>, KeyringError> {
        let fields: CborKey =
            (record.id.clone(), record.note.clone(), record.status.to_wire(), record.k());

        let mut bytes = Vec::new();
        ciborium::into_writer(&fields, &mut bytes).map_err(KeyringError::serialization)?;
        Ok(bytes)
    }

    fn decode_key(bytes: &[u8]) -> Result<KeyRecord, KeyringError> {
        let fields = match from_slice::<Value>(bytes)? {
            Value::Array(fields) if fields.len() == KEY_FIELDS => fields,
            Value::Array(fields) => {
                return Err(KeyringError::serialization(format!(
                    "key record has {} fields, expected {KEY_FIELDS}",
                    fields.len()
                )));
            },
            _ => return Err(KeyringError::serialization("key record is not a CBOR array")),
        };

        let (id, note, status, k): CborKey =
            Value::Array(fields).deserialized().map_err(KeyringError::serialization)?;

        KeyRecord::from_wire(id, note, status, &k)
    }

    fn encode_ring(record: &RingRecord) -> Result<Vec<u8>, KeyringError> {
        let ring = CborRing { m: record.keys.iter().cloned().map(Value::Bytes).collect() };

        let mut bytes = Vec::new();
        ciborium::into_writer(&ring, &mut bytes).map_err(KeyringError::serialization)?;
        Ok(bytes)
    }

    fn decode_ring(bytes: &[u8]) -> Result<RingRecord, KeyringError> {
        let ring: CborRing = from_slice(bytes)?;

        let keys = ring
            .m
            .into_iter()
            .map(|entry| match entry {
                Value::Bytes(key) => Ok(key),
                _ => Err(KeyringError::serialization("keyring entry is not a byte string")),
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RingRecord { keys })
    }
}

/// Decode exactly one CBOR item, rejecting trailing bytes.
fn from_slice<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, KeyringError> {
    let mut reader = bytes;
    let value = ciborium::from_reader(&mut reader).map_err(KeyringError::serialization)?;

    if !reader.is_empty() {
        return Err(KeyringError::serialization(format!(
            "{} trailing bytes after CBOR item",
            reader.len()
        )));
    }
    Ok(value)
}
