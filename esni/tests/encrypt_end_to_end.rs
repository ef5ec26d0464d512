//! End-to-end tests driving the real `RingCryptoProvider` through
//! `EsniHandle::from_base64` and `esni::encrypt`, rather than exercising the
//! engine's internal helpers directly (see `esni/src/engine.rs`'s own
//! `#[cfg(test)]` block for those).

use esni::crypto::CryptoProvider;
use esni::{encrypt, EncryptArgs, EsniHandle, RingCryptoProvider};
use esni_wire::Writer;

const VERSION: u16 = 0xFF01;

/// Builds a syntactically valid, checksummed `ESNIKeys` record with one
/// x25519 key share and one supported cipher suite, base64-encoded.
fn sample_record_base64(provider: &dyn CryptoProvider, padded_length: u16) -> String {
    let mut w = Writer::new();
    w.write_u16(VERSION);
    w.write_bytes(&[0, 0, 0, 0]);
    w.write_length_prefixed_u16(|ks| {
        ks.write_u16(0x001d);
        ks.write_length_prefixed_u16(|pk| pk.write_bytes(&[0x24; 32]));
    });
    w.write_length_prefixed_u16(|cs| cs.write_u16(0x1301));
    w.write_u16(padded_length);
    w.write_u64(0);
    w.write_u64(0x7FFF_FFFF_FFFF_FFFF);
    w.write_u16(0);

    let mut bytes = w.into_bytes();
    let mut zeroed = bytes.clone();
    zeroed[2..6].fill(0);
    let digest = provider.sha256(&zeroed);
    bytes[2..6].copy_from_slice(&digest[0..4]);

    base64::encode(&bytes)
}

#[test]
fn s4_encrypt_produces_correctly_sized_client_esni() {
    let provider = RingCryptoProvider::new();
    let record = sample_record_base64(&provider, 260);
    let mut handle = EsniHandle::from_base64(&record).unwrap();

    let args = EncryptArgs {
        protected_name: "secret.example",
        front_name: "cdn.example",
        client_random: [0xAA; 32],
    };
    encrypt(&mut handle, &provider, &args).unwrap();

    let client = handle.client().unwrap();
    // x25519 public keys are 32 bytes.
    assert_eq!(client.client_key_share.len(), 32);
    // TLS_AES_128_GCM_SHA256 -> SHA-256 -> 32-byte digest.
    assert_eq!(client.record_digest.len(), 32);
    // inner plaintext = nonce(16) + u16(len) + padded_length, sealed with a
    // 16-byte AEAD tag.
    assert_eq!(client.encrypted_sni.len(), 2 + 16 + 260 + 16);
}

#[test]
fn s5_encrypt_is_one_shot_per_handle() {
    let provider = RingCryptoProvider::new();
    let record = sample_record_base64(&provider, 260);
    let mut handle = EsniHandle::from_base64(&record).unwrap();

    let args = EncryptArgs {
        protected_name: "secret.example",
        front_name: "cdn.example",
        client_random: [0xAA; 32],
    };
    encrypt(&mut handle, &provider, &args).unwrap();
    let first_digest = handle.client().unwrap().record_digest.clone();
    let first_ciphertext = handle.client().unwrap().encrypted_sni.clone();

    let err = encrypt(&mut handle, &provider, &args).unwrap_err();
    assert!(matches!(err, esni::EsniError::AlreadyEncrypted));

    // the first result must be left untouched by the rejected second call.
    assert_eq!(handle.client().unwrap().record_digest, first_digest);
    assert_eq!(handle.client().unwrap().encrypted_sni, first_ciphertext);
}

#[test]
fn changing_client_random_changes_the_ciphertext() {
    let provider = RingCryptoProvider::new();
    let record = sample_record_base64(&provider, 260);

    let mut handle_a = EsniHandle::from_base64(&record).unwrap();
    encrypt(&mut handle_a, &provider, &EncryptArgs {
        protected_name: "secret.example",
        front_name: "cdn.example",
        client_random: [0xAA; 32],
    }).unwrap();

    let mut handle_b = EsniHandle::from_base64(&record).unwrap();
    encrypt(&mut handle_b, &provider, &EncryptArgs {
        protected_name: "secret.example",
        front_name: "cdn.example",
        client_random: [0xBB; 32],
    }).unwrap();

    assert_ne!(
        handle_a.client().unwrap().encrypted_sni,
        handle_b.client().unwrap().encrypted_sni,
    );
}

#[test]
fn name_too_long_is_rejected_before_any_crypto_runs() {
    let provider = RingCryptoProvider::new();
    let record = sample_record_base64(&provider, 20);
    let mut handle = EsniHandle::from_base64(&record).unwrap();

    let err = encrypt(&mut handle, &provider, &EncryptArgs {
        protected_name: "this-name-does-not-fit-in-twenty-bytes",
        front_name: "cdn.example",
        client_random: [0; 32],
    }).unwrap_err();

    assert!(matches!(err, esni::EsniError::NameTooLong));
    assert!(!handle.is_encrypted());
}
