//! Serialization formats for keys and keyrings.
//!
//! Two interchangeable encodings carry the same logical record:
//!
//! - [`Cbor`]: structured encoding. A key is the ordered sequence
//!   `[id, note, status, k]`.
//! - [`Json`]: self-describing encoding. A key is the object
//!   `{"id", "note", "status", "k"}`.
//!
//! In both, `k` is the wrapped ciphertext (`IV ‖ CBC ciphertext`) as padded
//! standard base64. A keyring is a record with a single field `M` holding
//! each key's encoded bytes, all in the same format.
//!
//! Core logic only talks to the [`Codec`] trait, so a format can be removed
//! without touching `Key` or `Keyring`.

mod cbor;
mod json;

use base64::{Engine as _, engine::general_purpose::STANDARD};
pub use cbor::Cbor;
pub use json::Json;

use crate::{error::KeyringError, status::KeyStatus};

/// Encode and decode key and keyring records in one format.
pub trait Codec {
    /// Short format name for logs.
    const NAME: &'static str;

    /// Encode one key record.
    fn encode_key(record: &KeyRecord) -> Result<Vec<u8>, KeyringError>;

    /// Decode one key record.
    fn decode_key(bytes: &[u8]) -> Result<KeyRecord, KeyringError>;

    /// Encode a keyring container.
    fn encode_ring(record: &RingRecord) -> Result<Vec<u8>, KeyringError>;

    /// Decode a keyring container.
    fn decode_ring(bytes: &[u8]) -> Result<RingRecord, KeyringError>;
}

/// Snapshot of a key's persistent fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyRecord {
    /// Key id (never empty)
    pub id: String,
    /// Free-form note
    pub note: String,
    /// Lifecycle status
    pub status: KeyStatus,
    /// Wrapped key material (`IV ‖ CBC ciphertext`)
    pub ciphertext: Vec<u8>,
}

impl KeyRecord {
    /// Build a record from raw wire fields.
    ///
    /// # Errors
    ///
    /// - `SerializationFailure`: empty id, unknown status, or `k` is not
    ///   valid base64
    pub fn from_wire(id: String, note: String, status: u64, k: &str) -> Result<Self, KeyringError> {
        if id.is_empty() {
            return Err(KeyringError::serialization("key id must not be empty"));
        }

        let status = KeyStatus::from_wire(status)?;
        let ciphertext = STANDARD
            .decode(k)
            .map_err(|e| KeyringError::serialization(format!("invalid base64 in k: {e}")))?;

        Ok(Self { id, note, status, ciphertext })
    }

    /// Ciphertext as it appears in the `k` field.
    pub fn k(&self) -> String {
        STANDARD.encode(&self.ciphertext)
    }
}

/// A keyring container: one encoded key record per entry.
///
/// Entry order follows map iteration and carries no meaning.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RingRecord {
    /// Encoded key records
    pub keys: Vec<Vec<u8>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> KeyRecord {
        KeyRecord {
            id: "test".to_string(),
            note: "a test key".to_string(),
            status: KeyStatus::Used,
            ciphertext: (0u8..48).collect(),
        }
    }

    #[test]
    fn k_is_standard_padded_base64() {
        let record = KeyRecord { ciphertext: vec![0xFB, 0xFF], ..record() };
        assert_eq!(record.k(), "+/8=");
    }

    #[test]
    fn from_wire_accepts_valid_fields() {
        let original = record();
        let parsed =
            KeyRecord::from_wire("test".to_string(), "a test key".to_string(), 2, &original.k())
                .unwrap();
        assert_eq!(parsed, original);
    }

    #[test]
    fn from_wire_rejects_empty_id() {
        let result = KeyRecord::from_wire(String::new(), String::new(), 1, "");
        assert!(matches!(result, Err(KeyringError::SerializationFailure { .. })));
    }

    #[test]
    fn from_wire_rejects_unknown_status() {
        let result = KeyRecord::from_wire("a".to_string(), String::new(), 0, "");
        assert!(matches!(result, Err(KeyringError::SerializationFailure { .. })));
    }

    #[test]
    fn from_wire_rejects_bad_base64() {
        let result = KeyRecord::from_wire("a".to_string(), String::new(), 1, "not*base64");
        assert!(matches!(
            result,
            Err(KeyringError::SerializationFailure { reason }) if reason.contains("base64")
        ));
    }

    #[test]
    fn formats_carry_identical_information() {
        let original = record();

        let from_cbor = Cbor::decode_key(&Cbor::encode_key(&original).unwrap()).unwrap();
        let from_json = Json::decode_key(&Json::encode_key(&original).unwrap()).unwrap();

        assert_eq!(from_cbor, original);
        assert_eq!(from_json, original);
    }
}
