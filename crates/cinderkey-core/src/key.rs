//! A single managed secondary key.
//!
//! The raw key never lives in a `Key`: only the wrapped form (`IV ‖ CBC
//! ciphertext` under the master cipher) is stored. Raw bytes exist only
//! inside [`Key::decrypt`] and the write path, and are zeroized on drop.
//!
//! # Concurrency
//!
//! Mutable fields sit behind one `RwLock`. Readers (`note`, `status`,
//! `serialize`) share it; `set_note`, `disable`, and `decrypt` take it
//! exclusively. `decrypt` mutates status, so the whole
//! decrypt-and-mark-used sequence runs under the write lock.

#![allow(clippy::expect_used, reason = "Lock poisoning should cause a panic")]

use std::{
    fmt,
    sync::{RwLock, RwLockReadGuard, RwLockWriteGuard},
};

use cinderkey_crypto::{BlockSize, Entropy, MasterCipher, cbc, pad, unpad};
use zeroize::Zeroizing;

use crate::{
    codec::{Codec, KeyRecord},
    error::KeyringError,
    status::KeyStatus,
};

/// An encrypted-at-rest secondary key with a lifecycle status.
///
/// `Debug` output carries the id and status only.
pub struct Key {
    /// Immutable after construction, so it lives outside the lock
    id: String,
    state: RwLock<KeyState>,
}

struct KeyState {
    note: String,
    status: KeyStatus,
    /// `IV ‖ CBC ciphertext` of the padded raw key
    ciphertext: Vec<u8>,
}

impl Key {
    /// Wrap `raw` under `cipher` into a new key with status `New`.
    pub(crate) fn seal<C, E>(
        id: String,
        note: String,
        raw: &[u8],
        cipher: &C,
        entropy: &E,
    ) -> Result<Self, KeyringError>
    where
        C: MasterCipher + ?Sized,
        E: Entropy + ?Sized,
    {
        let key = Self {
            id,
            state: RwLock::new(KeyState { note, status: KeyStatus::New, ciphertext: Vec::new() }),
        };
        key.write_secret(raw, cipher, entropy)?;
        Ok(key)
    }

    fn from_record(record: KeyRecord) -> Self {
        let KeyRecord { id, note, status, ciphertext } = record;
        Self { id, state: RwLock::new(KeyState { note, status, ciphertext }) }
    }

    /// Key id. Never empty.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Current note.
    pub fn note(&self) -> String {
        self.read().note.clone()
    }

    /// Replace the note.
    pub fn set_note(&self, note: impl Into<String>) {
        self.write().note = note.into();
    }

    /// Current lifecycle status.
    pub fn status(&self) -> KeyStatus {
        self.read().status
    }

    /// Pad and wrap `raw`, replacing the stored ciphertext wholesale.
    ///
    /// Only used when a key is created. Rotation means creating a new key.
    pub(crate) fn write_secret<C, E>(
        &self,
        raw: &[u8],
        cipher: &C,
        entropy: &E,
    ) -> Result<(), KeyringError>
    where
        C: MasterCipher + ?Sized,
        E: Entropy + ?Sized,
    {
        let block_size = BlockSize::of(cipher)?;
        let padded = Zeroizing::new(pad(raw, block_size));
        let ciphertext = cbc::encrypt(cipher, &padded, entropy)?;

        self.write().ciphertext = ciphertext;
        Ok(())
    }

    /// Unwrap the raw key.
    ///
    /// Every successful decryption marks the key `Used`, unless it is
    /// `Disabled`, which never changes. A disabled key still decrypts.
    ///
    /// # Errors
    ///
    /// - `MalformedCiphertext`: stored ciphertext has an impossible length
    /// - `InvalidPadding`: wrong master cipher or corrupted ciphertext
    /// - `InvalidBlockSize`: the cipher reports an unusable block size
    pub fn decrypt<C>(&self, cipher: &C) -> Result<Zeroizing<Vec<u8>>, KeyringError>
    where
        C: MasterCipher + ?Sized,
    {
        let mut state = self.write();

        let padded = cbc::decrypt(cipher, &state.ciphertext).inspect_err(|e| {
            tracing::warn!(id = %self.id, error = %e, "key decryption failed");
        })?;
        state.status = state.status.after_decrypt();

        let raw = unpad(&padded, BlockSize::of(cipher)?).inspect_err(|e| {
            tracing::warn!(id = %self.id, error = %e, "key padding invalid after decryption");
        })?;

        Ok(Zeroizing::new(raw.to_vec()))
    }

    /// Mark the key `Disabled`. Idempotent and irreversible.
    pub fn disable(&self) {
        let mut state = self.write();
        if !state.status.is_disabled() {
            tracing::info!(id = %self.id, from = %state.status, "key disabled");
        }
        state.status = KeyStatus::Disabled;
    }

    /// Consistent snapshot of all persistent fields.
    pub fn record(&self) -> KeyRecord {
        let state = self.read();
        KeyRecord {
            id: self.id.clone(),
            note: state.note.clone(),
            status: state.status,
            ciphertext: state.ciphertext.clone(),
        }
    }

    /// Encode this key with codec `F`.
    pub fn serialize<F: Codec>(&self) -> Result<Vec<u8>, KeyringError> {
        F::encode_key(&self.record())
    }

    /// Decode a key encoded with codec `F`.
    ///
    /// Builds a new key; nothing is constructed unless every field decodes.
    ///
    /// # Errors
    ///
    /// - `SerializationFailure`: malformed bytes, missing fields, empty id,
    ///   unknown status, or invalid base64 ciphertext
    pub fn deserialize<F: Codec>(bytes: &[u8]) -> Result<Self, KeyringError> {
        F::decode_key(bytes).map(Self::from_record)
    }

    fn read(&self) -> RwLockReadGuard<'_, KeyState> {
        self.state.read().expect("Key lock poisoned")
    }

    fn write(&self) -> RwLockWriteGuard<'_, KeyState> {
        self.state.write().expect("Key lock poisoned")
    }
}

impl fmt::Debug for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let status = self.state.read().map(|state| state.status).ok();
        f.debug_struct("Key")
            .field("id", &self.id)
            .field("status", &status)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use aes::{Aes256, cipher::KeyInit};
    use cinderkey_crypto::{OsEntropy, TransformError};

    use super::*;
    use crate::codec::{Cbor, Json};

    const SECRET: [u8; 32] = [0x5Cu8; 32];

    fn master() -> Aes256 {
        Aes256::new_from_slice(&[0x13u8; 32]).unwrap()
    }

    fn sealed() -> Key {
        Key::seal("test".to_string(), "a test key".to_string(), &SECRET, &master(), &OsEntropy)
            .unwrap()
    }

    struct Offline;

    impl Entropy for Offline {
        fn fill(&self, _buf: &mut [u8]) -> Result<(), TransformError> {
            Err(TransformError::Randomness { reason: "offline".to_string() })
        }
    }

    #[test]
    fn sealed_key_starts_new() {
        let key = sealed();

        assert_eq!(key.id(), "test");
        assert_eq!(key.note(), "a test key");
        assert_eq!(key.status(), KeyStatus::New);
    }

    #[test]
    fn raw_key_is_not_stored() {
        let record = sealed().record();

        assert_eq!(record.ciphertext.len(), 16 + 48);
        assert!(!record.ciphertext.windows(SECRET.len()).any(|w| w == SECRET.as_slice()));
    }

    #[test]
    fn decrypt_returns_secret_and_marks_used() {
        let key = sealed();

        let raw = key.decrypt(&master()).unwrap();

        assert_eq!(raw.as_slice(), SECRET.as_slice());
        assert_eq!(key.status(), KeyStatus::Used);
    }

    #[test]
    fn repeated_decrypt_is_stable() {
        let key = sealed();
        let before = key.record().ciphertext;

        for _ in 0..3 {
            assert_eq!(key.decrypt(&master()).unwrap().as_slice(), SECRET.as_slice());
        }

        assert_eq!(key.record().ciphertext, before, "decrypt must not rewrite ciphertext");
        assert_eq!(key.status(), KeyStatus::Used);
    }

    #[test]
    fn disabled_key_stays_disabled_after_decrypt() {
        let key = sealed();
        key.disable();

        let raw = key.decrypt(&master()).unwrap();

        assert_eq!(raw.as_slice(), SECRET.as_slice());
        assert_eq!(key.status(), KeyStatus::Disabled);
    }

    #[test]
    fn disable_is_idempotent() {
        let key = sealed();
        key.disable();
        key.disable();
        assert_eq!(key.status(), KeyStatus::Disabled);
    }

    #[test]
    fn set_note_replaces_note() {
        let key = sealed();
        key.set_note("rotated out");
        assert_eq!(key.note(), "rotated out");
    }

    #[test]
    fn rewrite_changes_ciphertext_but_not_secret() {
        let key = sealed();
        let before = key.record().ciphertext;

        key.write_secret(&SECRET, &master(), &OsEntropy).unwrap();

        assert_ne!(key.record().ciphertext, before, "fresh IV on every write");
        assert_eq!(key.decrypt(&master()).unwrap().as_slice(), SECRET.as_slice());
    }

    #[test]
    fn seal_surfaces_randomness_failure() {
        let result = Key::seal("test".to_string(), String::new(), &SECRET, &master(), &Offline);
        assert!(matches!(result, Err(KeyringError::RandomnessFailure { .. })));
    }

    #[test]
    fn truncated_ciphertext_leaves_status_alone() {
        let mut record = sealed().record();
        record.ciphertext.pop();
        let key = Key::from_record(record);

        let result = key.decrypt(&master());

        assert!(matches!(result, Err(KeyringError::MalformedCiphertext { len: 63, .. })));
        assert_eq!(key.status(), KeyStatus::New);
    }

    #[test]
    fn serialize_roundtrip_both_formats() {
        let key = sealed();
        key.decrypt(&master()).unwrap();
        let original = key.record();

        let via_cbor = Key::deserialize::<Cbor>(&key.serialize::<Cbor>().unwrap()).unwrap();
        let via_json = Key::deserialize::<Json>(&key.serialize::<Json>().unwrap()).unwrap();

        assert_eq!(via_cbor.record(), original);
        assert_eq!(via_json.record(), original);
        assert_eq!(via_json.decrypt(&master()).unwrap().as_slice(), SECRET.as_slice());
    }

    #[test]
    fn debug_hides_note_and_ciphertext() {
        let key = sealed();
        let k = key.record().k();

        let rendered = format!("{key:?}");

        assert!(rendered.contains("\"test\""));
        assert!(rendered.contains("New"));
        assert!(!rendered.contains("a test key"));
        assert!(!rendered.contains("ciphertext"));
        assert!(!rendered.contains(&k));
    }

    #[test]
    fn deserialize_rejects_malformed() {
        assert!(Key::deserialize::<Json>(b"{\"id\":\"x\"").is_err());
        assert!(Key::deserialize::<Cbor>(b"").is_err());
    }
}
