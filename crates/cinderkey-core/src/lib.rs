//! Cinderkey Keyring
//!
//! A keyring of secondary keys that are always stored encrypted under a
//! caller-supplied master cipher, with per-key lifecycle tracking.
//!
//! # Architecture
//!
//! ```text
//! Keyring ── RwLock<HashMap<id, Arc<Key>>>
//!    │
//!    │ create(id, note, cipher, generator)
//!    ▼
//! Key ── RwLock<{ note, status, IV ‖ ciphertext }>
//!    │
//!    │ write_secret / decrypt
//!    ▼
//! cinderkey-crypto: pad + CBC under the master cipher
//! ```
//!
//! The master cipher and the key generator are collaborators: the keyring
//! never derives, stores, or rotates the master key, and has no opinion on
//! where raw key material comes from.
//!
//! # Lifecycle
//!
//! Keys start `New`, become `Used` on decrypt, and can be `Disabled`.
//! Disabled keys are kept (and persisted) but hidden from [`Keyring::get`].
//!
//! # Persistence
//!
//! Keys and keyrings encode to bytes through a [`Codec`]: [`Cbor`] for the
//! structured encoding, [`Json`] for the self-describing one. Where the bytes
//! are stored is up to the caller.
//!
//! # Example
//!
//! ```
//! use aes::{Aes256, cipher::KeyInit};
//! use cinderkey_core::{Json, KeyStatus, Keyring};
//! use cinderkey_crypto::{DEFAULT_KEY_LEN, random_key};
//!
//! let master = Aes256::new_from_slice(&[7u8; 32]).unwrap();
//! let ring = Keyring::new();
//!
//! let key = ring.create("db", "primary database", &master, || random_key(DEFAULT_KEY_LEN))?;
//! let secret = key.decrypt(&master)?;
//! assert_eq!(secret.len(), DEFAULT_KEY_LEN);
//! assert_eq!(key.status(), KeyStatus::Used);
//!
//! let saved = ring.serialize_all::<Json>()?;
//! let restored = Keyring::restore_all::<Json>(&saved)?;
//! assert!(restored.get("db").is_some());
//! # Ok::<(), cinderkey_core::KeyringError>(())
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]

pub mod codec;
pub mod error;
pub mod key;
pub mod keyring;
pub mod status;

pub use codec::{Cbor, Codec, Json, KeyRecord, RingRecord};
pub use error::KeyringError;
pub use key::Key;
pub use keyring::Keyring;
pub use status::{KeyStatus, STATUS_UNKNOWN};
