//! Property-based tests for the keyring
//!
//! These tests verify the invariants persistence and lookup rely on:
//!
//! 1. **Round-trip**: any keyring survives serialize → restore in both formats
//! 2. **Visibility**: `get` returns exactly the keys that are not disabled
//! 3. **Upsert**: the last write for an id wins
//! 4. **Malformed input**: decoders return errors, never panic

use std::collections::HashMap;

use aes::{Aes256, cipher::KeyInit};
use cinderkey_core::{Cbor, Codec, Json, Key, KeyStatus, Keyring};
use cinderkey_crypto::TransformError;
use proptest::prelude::*;

fn master() -> Aes256 {
    Aes256::new_from_slice(&[0x3Cu8; 32]).unwrap()
}

/// One key to create: id, note, secret, and what to do with it afterwards.
#[derive(Debug, Clone)]
struct Spec {
    id: String,
    note: String,
    secret: Vec<u8>,
    decrypt: bool,
    disable: bool,
}

fn key_spec() -> impl Strategy<Value = Spec> {
    (
        "[a-z0-9-]{1,12}",
        ".{0,24}",
        prop::collection::vec(any::<u8>(), 0..64),
        any::<bool>(),
        any::<bool>(),
    )
        .prop_map(|(id, note, secret, decrypt, disable)| Spec {
            id,
            note,
            secret,
            decrypt,
            disable,
        })
}

fn build(specs: &[Spec]) -> (Keyring, HashMap<String, Spec>) {
    let ring = Keyring::new();
    let cipher = master();
    let mut expected = HashMap::new();

    for spec in specs {
        let secret = spec.secret.clone();
        let key = ring
            .create(&spec.id, &spec.note, &cipher, move || Ok::<_, TransformError>(secret))
            .unwrap();
        if spec.decrypt {
            key.decrypt(&cipher).unwrap();
        }
        if spec.disable {
            key.disable();
        }
        expected.insert(spec.id.clone(), spec.clone());
    }

    (ring, expected)
}

fn expected_status(spec: &Spec) -> KeyStatus {
    if spec.disable {
        KeyStatus::Disabled
    } else if spec.decrypt {
        KeyStatus::Used
    } else {
        KeyStatus::New
    }
}

fn check_restored<F: Codec>(specs: &[Spec]) -> Result<(), TestCaseError> {
    let (ring, expected) = build(specs);
    let cipher = master();

    let restored = Keyring::restore_all::<F>(&ring.serialize_all::<F>().unwrap()).unwrap();

    prop_assert_eq!(restored.len(), expected.len());
    prop_assert_eq!(restored.ids(), ring.ids());

    for (id, spec) in &expected {
        match restored.get(id) {
            Some(key) => {
                prop_assert!(!spec.disable, "disabled key {} must be hidden", id);
                prop_assert_eq!(key.note(), spec.note.clone());
                prop_assert_eq!(key.status(), expected_status(spec));
                let secret = key.decrypt(&cipher).unwrap();
                prop_assert_eq!(secret.as_slice(), spec.secret.as_slice());
            },
            None => prop_assert!(spec.disable, "visible key {} went missing", id),
        }
    }
    Ok(())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn prop_restore_roundtrip_cbor(specs in prop::collection::vec(key_spec(), 0..8)) {
        check_restored::<Cbor>(&specs)?;
    }

    #[test]
    fn prop_restore_roundtrip_json(specs in prop::collection::vec(key_spec(), 0..8)) {
        check_restored::<Json>(&specs)?;
    }

    #[test]
    fn prop_visibility_matches_status(specs in prop::collection::vec(key_spec(), 1..8)) {
        let (ring, expected) = build(&specs);

        for (id, spec) in &expected {
            prop_assert_eq!(ring.get(id).is_some(), !spec.disable);
        }
        prop_assert!(ring.get("not-a-key-id-because-too-long").is_none());
    }

    #[test]
    fn prop_last_write_wins(
        notes in prop::collection::vec(".{0,16}", 1..6),
    ) {
        let ring = Keyring::new();
        let cipher = master();

        for note in &notes {
            ring.create("same", note, &cipher, || Ok::<_, TransformError>(vec![1u8; 32])).unwrap();
        }

        prop_assert_eq!(ring.len(), 1);
        prop_assert_eq!(ring.get("same").unwrap().note(), notes[notes.len() - 1].clone());
    }

    #[test]
    fn prop_key_formats_agree(spec in key_spec()) {
        let ring = Keyring::new();
        let cipher = master();
        let secret = spec.secret.clone();
        let key = ring
            .create(&spec.id, &spec.note, &cipher, move || Ok::<_, TransformError>(secret))
            .unwrap();
        if spec.disable {
            key.disable();
        }

        let from_cbor = Key::deserialize::<Cbor>(&key.serialize::<Cbor>().unwrap()).unwrap();
        let from_json = Key::deserialize::<Json>(&key.serialize::<Json>().unwrap()).unwrap();

        prop_assert_eq!(from_cbor.record(), key.record());
        prop_assert_eq!(from_json.record(), key.record());
        let secret = from_json.decrypt(&cipher).unwrap();
        prop_assert_eq!(secret.as_slice(), spec.secret.as_slice());
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(256))]

    #[test]
    fn prop_decoders_reject_garbage(bytes in prop::collection::vec(any::<u8>(), 0..128)) {
        // Must return (almost always Err) without panicking
        let _ = Key::deserialize::<Cbor>(&bytes);
        let _ = Key::deserialize::<Json>(&bytes);
        let _ = Keyring::restore_all::<Cbor>(&bytes);
        let _ = Keyring::restore_all::<Json>(&bytes);
    }
}
