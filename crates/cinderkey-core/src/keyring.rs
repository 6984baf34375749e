//! Keyring: the set of managed keys, indexed by id.
//!
//! Keys are never removed. Disabling a key is a soft delete: it stays in the
//! map (and in serialized output) but [`Keyring::get`] stops returning it.
//!
//! # Concurrency
//!
//! The map has its own `RwLock`, independent of each key's lock. Inserts take
//! it exclusively, lookups share it. Handles are `Arc<Key>`, so a caller can
//! work with a fetched key while other threads insert unrelated keys.
//!
//! No atomicity is promised across calls: `get` followed by `disable` can
//! interleave with other writers. Two inserts under the same id resolve as
//! last-writer-wins.

#![allow(clippy::expect_used, reason = "Lock poisoning should cause a panic")]

use std::{
    collections::HashMap,
    fmt,
    sync::{Arc, RwLock},
};

use cinderkey_crypto::{Entropy, MasterCipher, OsEntropy};
use zeroize::Zeroizing;

use crate::{
    codec::{Codec, RingRecord},
    error::KeyringError,
    key::Key,
};

/// Concurrent map from key id to [`Key`].
///
/// `E` supplies IV randomness for newly created keys. Production code uses
/// the default, [`OsEntropy`].
pub struct Keyring<E = OsEntropy> {
    entries: RwLock<HashMap<String, Arc<Key>>>,
    entropy: E,
}

impl Keyring<OsEntropy> {
    /// Create an empty keyring backed by OS randomness.
    pub fn new() -> Self {
        Self::with_entropy(OsEntropy)
    }

    /// Rebuild a keyring from bytes produced by [`Keyring::serialize_all`].
    ///
    /// Disabled keys are restored as disabled.
    ///
    /// # Errors
    ///
    /// - `SerializationFailure`: the container or any key record is malformed.
    ///   No partially populated keyring is ever returned.
    pub fn restore_all<F: Codec>(bytes: &[u8]) -> Result<Self, KeyringError> {
        Self::restore_all_with::<F>(bytes, OsEntropy)
    }
}

impl Default for Keyring<OsEntropy> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Entropy> Keyring<E> {
    /// Create an empty keyring drawing IVs from `entropy`.
    pub fn with_entropy(entropy: E) -> Self {
        Self { entries: RwLock::new(HashMap::new()), entropy }
    }

    /// Like [`Keyring::restore_all`], with a custom entropy source.
    pub fn restore_all_with<F: Codec>(bytes: &[u8], entropy: E) -> Result<Self, KeyringError> {
        let ring = F::decode_ring(bytes)?;

        let mut entries = HashMap::with_capacity(ring.keys.len());
        for record in &ring.keys {
            let key = Key::deserialize::<F>(record)?;
            entries.insert(key.id().to_string(), Arc::new(key));
        }

        tracing::info!(format = F::NAME, count = entries.len(), "keyring restored");

        Ok(Self { entries: RwLock::new(entries), entropy })
    }

    /// Generate, wrap, and store a new key.
    ///
    /// The id is checked before `generator` runs. Any existing key with the
    /// same id is replaced.
    ///
    /// # Errors
    ///
    /// - `InvalidIdentifier`: `id` is empty
    /// - `GenerationFailure`: `generator` failed
    /// - `RandomnessFailure`: no IV could be drawn
    /// - `InvalidBlockSize`: `cipher` reports an unusable block size
    ///
    /// Nothing is inserted on error.
    pub fn create<C, G, GE>(
        &self,
        id: &str,
        note: &str,
        cipher: &C,
        generator: G,
    ) -> Result<Arc<Key>, KeyringError>
    where
        C: MasterCipher + ?Sized,
        G: FnOnce() -> Result<Vec<u8>, GE>,
        GE: fmt::Display,
    {
        if id.is_empty() {
            return Err(KeyringError::InvalidIdentifier);
        }

        let raw = generator()
            .map(Zeroizing::new)
            .map_err(|e| KeyringError::GenerationFailure { reason: e.to_string() })?;

        let key = Arc::new(Key::seal(
            id.to_string(),
            note.to_string(),
            &raw,
            cipher,
            &self.entropy,
        )?);
        self.insert(Arc::clone(&key));

        tracing::info!(id, "key created");
        Ok(key)
    }

    /// Look up a key that is not disabled.
    ///
    /// Missing and disabled ids are indistinguishable: both return `None`.
    pub fn get(&self, id: &str) -> Option<Arc<Key>> {
        let entries = self.entries.read().expect("Keyring lock poisoned");
        entries.get(id).filter(|key| !key.status().is_disabled()).map(Arc::clone)
    }

    /// Decode a single key record and store it, replacing any key with the
    /// same id. Disabled keys are stored as-is.
    ///
    /// # Errors
    ///
    /// - `SerializationFailure`: the record is malformed. Nothing is stored.
    pub fn add_from_serialized<F: Codec>(&self, bytes: &[u8]) -> Result<Arc<Key>, KeyringError> {
        let key = Arc::new(Key::deserialize::<F>(bytes)?);
        self.insert(Arc::clone(&key));

        tracing::debug!(id = key.id(), status = %key.status(), format = F::NAME, "key added");
        Ok(key)
    }

    /// Encode every key, disabled ones included, into a keyring container.
    ///
    /// Entry order is unspecified.
    pub fn serialize_all<F: Codec>(&self) -> Result<Vec<u8>, KeyringError> {
        let entries = self.entries.read().expect("Keyring lock poisoned");

        let keys =
            entries.values().map(|key| key.serialize::<F>()).collect::<Result<Vec<_>, _>>()?;
        drop(entries);

        tracing::debug!(format = F::NAME, count = keys.len(), "keyring serialized");
        F::encode_ring(&RingRecord { keys })
    }

    /// Number of stored keys, disabled ones included.
    pub fn len(&self) -> usize {
        self.entries.read().expect("Keyring lock poisoned").len()
    }

    /// True if no keys are stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Ids of every stored key, disabled ones included, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> =
            self.entries.read().expect("Keyring lock poisoned").keys().cloned().collect();
        ids.sort_unstable();
        ids
    }

    fn insert(&self, key: Arc<Key>) {
        let id = key.id().to_string();
        let previous = self.entries.write().expect("Keyring lock poisoned").insert(id.clone(), key);

        if previous.is_some() {
            tracing::debug!(id = %id, "existing key replaced");
        }
    }
}

impl<E> fmt::Debug for Keyring<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let count = self.entries.read().map(|entries| entries.len()).unwrap_or_default();
        f.debug_struct("Keyring").field("keys", &count).finish_non_exhaustive()
    }
}
