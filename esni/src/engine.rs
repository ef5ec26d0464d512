//! The encryption engine: turns an [`EsniHandle`] plus a protected server
//! name into a [`ClientEsni`]. See spec §4.4 for the algorithm this mirrors
//! step for step.

use esni_wire::{CipherSuite, EsniRecord, KeyShareEntry};

use crate::crypto::CryptoProvider;
use crate::error::EsniError;
use crate::handle::{ClientEsni, ClientEsniInner, CryptoVars, EsniHandle};

/// The maximum length of either the protected or front server name, in
/// bytes (draft-02's `ServerNameList` framing caps a single name at 255).
const MAX_NAME_LEN: usize = 255;

/// The AEAD tag length this crate assumes for every suite it supports
/// (true of AES-GCM and ChaCha20-Poly1305 alike).
const TAG_LEN: usize = 16;

/// Inputs to one call of the encryption engine. See spec §6's option table.
pub struct EncryptArgs<'a> {

    /// The true server name to hide.
    pub protected_name: &'a str,

    /// The cleartext SNI the outer ClientHello will carry. Not
    /// cryptographically bound; kept for printing and name-length sanity.
    pub front_name: &'a str,

    /// The 32-byte ClientHello random of the outer handshake. Becomes both
    /// the `ESNIContents` random and the AEAD associated data.
    pub client_random: [u8; 32],
}

/// Runs the encryption engine against `handle`'s chosen record, storing the
/// resulting `ClientEsni` on the handle. Fails `AlreadyEncrypted` if this
/// handle has already been encrypted once.
pub fn encrypt(handle: &mut EsniHandle, provider: &dyn CryptoProvider, args: &EncryptArgs<'_>) -> Result<(), EsniError> {
    if handle.is_encrypted() {
        return Err(EsniError::AlreadyEncrypted);
    }

    check_name_len(args.protected_name)?;
    check_name_len(args.front_name)?;

    let records = handle.records();
    if records.is_empty() {
        return Err(EsniError::CryptoFailure("encrypt: no records"));
    }
    if records.len() > 1 {
        log_not_implemented("multiple records");
    }
    let record = &records[0];

    let suite = choose_suite(record)?;
    let key_share = choose_key_share(record)?;
    let hash = provider.hash_for_suite(suite)?;

    log::info!("Encrypting ESNI for suite {suite} in group {}", key_share.group);

    // Step 2: client key share.
    let (client_priv, client_pub) = provider.ecdh_generate(key_share.group)?;

    // Step 3: shared secret.
    let shared_secret = provider.ecdh_derive(&client_priv, &key_share.public_key)?;
    drop(client_priv);

    // Step 4: inner plaintext.
    let mut nonce = [0u8; 16];
    provider.random_bytes(&mut nonce);
    let padded_sni = pad_server_name(args.protected_name, record.padded_length)?;
    let inner = build_inner(nonce, &padded_sni, record.padded_length);

    // Step 5: record_digest and ESNIContents.
    let record_digest = provider.hash(hash, &record.encoded[2..]);
    let esni_contents = build_esni_contents(&record_digest, &client_pub, &args.client_random);
    let digest_contents = provider.hash(hash, &esni_contents);

    // Step 6: key schedule.
    let zx = provider.hkdf_extract(hash, &[], &shared_secret);
    let key_len = suite.key_len().ok_or(EsniError::CryptoFailure("key_len_for_suite"))?;
    let key = provider.hkdf_expand_label(hash, &zx, "esni keys", &digest_contents, key_len)?;
    let iv = provider.hkdf_expand_label(hash, &zx, "esni iv", &digest_contents, 12)?;

    // Step 7: AEAD.
    let aad = args.client_random.to_vec();
    let plaintext = inner_plaintext_bytes(&inner);
    let encrypted_sni = provider.aead_gcm_seal(suite, &key, &iv, &aad, &plaintext)?;
    debug_assert_eq!(encrypted_sni.len(), plaintext.len() + TAG_LEN);

    let crypto_vars = CryptoVars {
        shared_secret,
        zx,
        key,
        iv,
        aad,
        digest_contents,
        inner,
    };

    let client_esni = ClientEsni {
        cipher_suite: suite,
        client_key_share: client_pub,
        record_digest,
        encrypted_sni,
        crypto_vars,
    };

    handle.set_client(client_esni)
}

fn choose_suite(record: &EsniRecord) -> Result<CipherSuite, EsniError> {
    if record.cipher_suites.len() > 1 {
        log_not_implemented("multiple cipher suites");
    }
    record.cipher_suites.first().copied().ok_or(EsniError::CryptoFailure("no cipher suite"))
}

fn choose_key_share(record: &EsniRecord) -> Result<&KeyShareEntry, EsniError> {
    if record.key_shares.len() > 1 {
        log_not_implemented("multiple key shares");
    }
    record.key_shares.first().ok_or(EsniError::CryptoFailure("no key share"))
}

fn log_not_implemented(what: &'static str) {
    log::warn!("not implemented: multi-option selection ({what}); defaulting to index 0");
}

fn check_name_len(name: &str) -> Result<(), EsniError> {
    if name.is_empty() || name.len() > MAX_NAME_LEN {
        return Err(EsniError::BadName);
    }
    Ok(())
}

/// Builds the padded `ServerNameList` encoding: `u16(n+5) || 0x00 ||
/// u16(n) || name || zeros`, right-padded to exactly `padded_length` bytes.
fn pad_server_name(name: &str, padded_length: u16) -> Result<Vec<u8>, EsniError> {
    let n = name.len().min(MAX_NAME_LEN);
    let padded_length = usize::from(padded_length);
    if n + 5 >= padded_length {
        return Err(EsniError::NameTooLong);
    }

    let mut buf = vec![0u8; padded_length];
    let list_len = u16::try_from(n + 5).expect("n + 5 <= padded_length fits in u16");
    buf[0..2].copy_from_slice(&list_len.to_be_bytes());
    buf[2] = 0x00;
    let name_len = u16::try_from(n).expect("n <= MAX_NAME_LEN fits in u16");
    buf[3..5].copy_from_slice(&name_len.to_be_bytes());
    buf[5..5 + n].copy_from_slice(&name.as_bytes()[..n]);
    // buf[5+n..] is already zero.
    Ok(buf)
}

/// Assembles the inner plaintext in the source encoder's field order:
/// `nonce(16) || u16(padded_length) || padded_server_name_list`. Pinned in
/// `SPEC_FULL.md` §9 item 8 against `SSL_ESNI_enc`; this differs from a
/// literal reading of the draft text, which puts a redundant length field
/// ahead of the nonce instead.
fn build_inner(nonce: [u8; 16], padded_sni: &[u8], padded_length: u16) -> ClientEsniInner {
    debug_assert_eq!(padded_sni.len(), usize::from(padded_length));
    ClientEsniInner { nonce, padded_server_name_list: padded_sni.to_vec() }
}

fn inner_plaintext_bytes(inner: &ClientEsniInner) -> Vec<u8> {
    let mut buf = Vec::with_capacity(2 + inner.nonce.len() + inner.padded_server_name_list.len());
    buf.extend_from_slice(&inner.nonce);
    let len = u16::try_from(inner.padded_server_name_list.len())
        .expect("padded_length fits in u16 (checked at parse time)");
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(&inner.padded_server_name_list);
    buf
}

/// `ESNIContents = u16(len(record_digest)) || record_digest ||
/// u16(len(client_pub)) || client_pub || u16(32) || client_random`.
fn build_esni_contents(record_digest: &[u8], client_pub: &[u8], client_random: &[u8; 32]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(6 + record_digest.len() + client_pub.len() + client_random.len());
    push_u16_prefixed(&mut buf, record_digest);
    push_u16_prefixed(&mut buf, client_pub);
    push_u16_prefixed(&mut buf, client_random);
    buf
}

fn push_u16_prefixed(buf: &mut Vec<u8>, bytes: &[u8]) {
    let len = u16::try_from(bytes.len()).expect("ESNIContents field longer than a u16 length prefix can encode");
    buf.extend_from_slice(&len.to_be_bytes());
    buf.extend_from_slice(bytes);
}


#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn pad_server_name_produces_exact_length_and_zero_tail() {
        let padded = pad_server_name("secret.example", 260).unwrap();
        assert_eq!(padded.len(), 260);
        let n = "secret.example".len();
        assert_eq!(&padded[0..2], &u16::try_from(n + 5).unwrap().to_be_bytes());
        assert_eq!(padded[2], 0x00);
        assert_eq!(&padded[3..5], &u16::try_from(n).unwrap().to_be_bytes());
        assert_eq!(&padded[5..5 + n], "secret.example".as_bytes());
        assert!(padded[5 + n..].iter().all(|&b| b == 0));
    }

    #[test]
    fn pad_server_name_rejects_names_that_do_not_fit() {
        // name (14) + overhead (5) = 19, not < padded_length of 19.
        assert!(matches!(pad_server_name("secret.example", 19), Err(EsniError::NameTooLong)));
    }

    #[test]
    fn esni_contents_layout_matches_three_length_prefixed_fields() {
        let digest = vec![0xAA; 32];
        let pub_key = vec![0xBB; 65];
        let random = [0xCCu8; 32];
        let contents = build_esni_contents(&digest, &pub_key, &random);
        assert_eq!(contents.len(), 6 + 32 + 65 + 32);
        assert_eq!(&contents[0..2], &32u16.to_be_bytes());
        assert_eq!(&contents[2..34], &digest[..]);
        assert_eq!(&contents[34..36], &65u16.to_be_bytes());
        assert_eq!(&contents[36..101], &pub_key[..]);
        assert_eq!(&contents[101..103], &32u16.to_be_bytes());
        assert_eq!(&contents[103..135], &random[..]);
    }

    #[test]
    fn inner_plaintext_length_matches_spec_invariant() {
        let padded_sni = pad_server_name("secret.example", 260).unwrap();
        let inner = build_inner([0x11; 16], &padded_sni, 260);
        let bytes = inner_plaintext_bytes(&inner);
        assert_eq!(bytes.len(), 2 + 16 + 260);
    }
}
