//! The `ring` + `x25519-dalek` + `p256`/`p384` backend: this crate's only
//! [`CryptoProvider`](crate::crypto::CryptoProvider) implementation.

use esni_wire::{CipherSuite, NamedGroup};
use p256::elliptic_curve::sec1::ToEncodedPoint;
use rand::rngs::OsRng;
use ring::rand::SecureRandom;
use x25519_dalek::{PublicKey as X25519PublicKey, StaticSecret as X25519Secret};

use crate::crypto::{CryptoProvider, Hash, PrivateKey};
use crate::error::EsniError;

/// The default [`CryptoProvider`] for this crate, backed by `ring` for
/// digests/HKDF/AEAD/randomness and by `x25519-dalek`/`p256`/`p384` for the
/// three named groups the draft recognizes.
pub struct RingCryptoProvider {
    rng: ring::rand::SystemRandom,
}

impl Default for RingCryptoProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl RingCryptoProvider {

    /// Builds a new provider backed by `ring`'s `SystemRandom`.
    #[must_use]
    pub fn new() -> Self {
        Self { rng: ring::rand::SystemRandom::new() }
    }

    fn hmac_algorithm(hash: Hash) -> ring::hmac::Algorithm {
        match hash {
            Hash::Sha256 => ring::hmac::HMAC_SHA256,
            Hash::Sha384 => ring::hmac::HMAC_SHA384,
        }
    }

    fn aead_algorithm(suite: CipherSuite) -> Result<&'static ring::aead::Algorithm, EsniError> {
        match suite {
            CipherSuite::Aes128GcmSha256 => Ok(&ring::aead::AES_128_GCM),
            CipherSuite::Aes256GcmSha384 => Ok(&ring::aead::AES_256_GCM),
            CipherSuite::Chacha20Poly1305Sha256 => Ok(&ring::aead::CHACHA20_POLY1305),
            CipherSuite::Unknown(_) => Err(EsniError::CryptoFailure("aead_gcm_seal")),
        }
    }
}

/// `HKDF-Expand(prk, info, len)` per RFC 5869 §2.3, built directly on
/// `ring::hmac` rather than `ring::hkdf::Prk` — the latter's output is
/// deliberately opaque, but this crate's [`CryptoProvider`] contract needs
/// the raw `Zx` bytes so `hkdf_extract` and `hkdf_expand_label` can be
/// called as two separate steps (see spec §4.2/§4.4).
fn hkdf_expand(hash: Hash, algorithm: ring::hmac::Algorithm, prk: &[u8], info: &[u8], out_len: usize) -> Vec<u8> {
    let key = ring::hmac::Key::new(algorithm, prk);
    let mut okm = Vec::with_capacity(out_len + hash.output_len());
    let mut previous: Vec<u8> = Vec::new();
    let mut counter: u8 = 1;
    while okm.len() < out_len {
        let mut ctx = ring::hmac::Context::with_key(&key);
        ctx.update(&previous);
        ctx.update(info);
        ctx.update(&[counter]);
        let t = ctx.sign();
        previous = t.as_ref().to_vec();
        okm.extend_from_slice(&previous);
        counter = counter.checked_add(1).expect("HKDF-Expand output length exceeds 255 * hash_len");
    }
    okm.truncate(out_len);
    okm
}

impl CryptoProvider for RingCryptoProvider {

    fn sha256(&self, bytes: &[u8]) -> [u8; 32] {
        let digest = ring::digest::digest(&ring::digest::SHA256, bytes);
        let mut out = [0u8; 32];
        out.copy_from_slice(digest.as_ref());
        out
    }

    fn hash(&self, which: Hash, bytes: &[u8]) -> Vec<u8> {
        let algorithm = match which {
            Hash::Sha256 => &ring::digest::SHA256,
            Hash::Sha384 => &ring::digest::SHA384,
        };
        ring::digest::digest(algorithm, bytes).as_ref().to_vec()
    }

    fn hash_for_suite(&self, suite: CipherSuite) -> Result<Hash, EsniError> {
        match suite {
            CipherSuite::Aes128GcmSha256 | CipherSuite::Chacha20Poly1305Sha256 => Ok(Hash::Sha256),
            CipherSuite::Aes256GcmSha384 => Ok(Hash::Sha384),
            CipherSuite::Unknown(_) => Err(EsniError::CryptoFailure("hash_for_suite")),
        }
    }

    fn ecdh_generate(&self, group: NamedGroup) -> Result<(PrivateKey, Vec<u8>), EsniError> {
        match group {
            NamedGroup::X25519 => {
                let secret = X25519Secret::random_from_rng(OsRng);
                let public = X25519PublicKey::from(&secret);
                Ok((PrivateKey::X25519(secret), public.as_bytes().to_vec()))
            }
            NamedGroup::Secp256r1 => {
                let secret = p256::ecdh::EphemeralSecret::random(&mut OsRng);
                let public = secret.public_key().to_encoded_point(false);
                Ok((PrivateKey::P256(secret), public.as_bytes().to_vec()))
            }
            NamedGroup::Secp384r1 => {
                let secret = p384::ecdh::EphemeralSecret::random(&mut OsRng);
                let public = secret.public_key().to_encoded_point(false);
                Ok((PrivateKey::P384(secret), public.as_bytes().to_vec()))
            }
            NamedGroup::Unknown(_) => Err(EsniError::CryptoFailure("ecdh_generate")),
        }
    }

    fn ecdh_derive(&self, private: &PrivateKey, peer_public_bytes: &[u8]) -> Result<Vec<u8>, EsniError> {
        match private {
            PrivateKey::X25519(secret) => {
                let mut peer = [0u8; 32];
                if peer_public_bytes.len() != 32 {
                    return Err(EsniError::CryptoFailure("ecdh_derive"));
                }
                peer.copy_from_slice(peer_public_bytes);
                let shared = secret.diffie_hellman(&X25519PublicKey::from(peer));
                Ok(shared.as_bytes().to_vec())
            }
            PrivateKey::P256(secret) => {
                let peer = p256::PublicKey::from_sec1_bytes(peer_public_bytes)
                    .map_err(|_| EsniError::CryptoFailure("ecdh_derive"))?;
                let shared = secret.diffie_hellman(&peer);
                Ok(shared.raw_secret_bytes().to_vec())
            }
            PrivateKey::P384(secret) => {
                let peer = p384::PublicKey::from_sec1_bytes(peer_public_bytes)
                    .map_err(|_| EsniError::CryptoFailure("ecdh_derive"))?;
                let shared = secret.diffie_hellman(&peer);
                Ok(shared.raw_secret_bytes().to_vec())
            }
        }
    }

    fn hkdf_extract(&self, hash: Hash, salt: &[u8], ikm: &[u8]) -> Vec<u8> {
        // RFC 5869 §2.2: an empty salt is treated as a zero-filled string
        // of HashLen bytes.
        let algorithm = Self::hmac_algorithm(hash);
        let zero_salt = vec![0u8; hash.output_len()];
        let salt_bytes: &[u8] = if salt.is_empty() { &zero_salt } else { salt };
        let key = ring::hmac::Key::new(algorithm, salt_bytes);
        ring::hmac::sign(&key, ikm).as_ref().to_vec()
    }

    fn hkdf_expand_label(&self, hash: Hash, prk: &[u8], label: &str, context: &[u8], out_len: usize) -> Result<Vec<u8>, EsniError> {
        // This draft's "esni keys"/"esni iv" labels carry no structured
        // HkdfLabel framing (see the design notes): `info` is simply the
        // literal label bytes followed by the context bytes.
        let mut info = Vec::with_capacity(label.len() + context.len());
        info.extend_from_slice(label.as_bytes());
        info.extend_from_slice(context);

        Ok(hkdf_expand(hash, Self::hmac_algorithm(hash), prk, &info, out_len))
    }

    fn aead_gcm_seal(&self, suite: CipherSuite, key: &[u8], iv: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, EsniError> {
        let algorithm = Self::aead_algorithm(suite)?;
        let unbound = ring::aead::UnboundKey::new(algorithm, key)
            .map_err(|_| EsniError::CryptoFailure("aead_gcm_seal"))?;
        let key = ring::aead::LessSafeKey::new(unbound);
        let nonce = ring::aead::Nonce::try_assume_unique_for_key(iv)
            .map_err(|_| EsniError::CryptoFailure("aead_gcm_seal"))?;

        let mut buffer = plaintext.to_vec();
        key.seal_in_place_append_tag(nonce, ring::aead::Aad::from(aad), &mut buffer)
            .map_err(|_| EsniError::CryptoFailure("aead_gcm_seal"))?;
        Ok(buffer)
    }

    fn random_bytes(&self, out: &mut [u8]) {
        self.rng.fill(out).expect("system CSPRNG failed");
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn sha256_matches_known_digest() {
        let provider = RingCryptoProvider::new();
        let digest = provider.sha256(b"abc");
        assert_eq!(hex::encode(digest), "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad");
    }

    #[test]
    fn hkdf_extract_matches_rfc5869_test_case_1() {
        // RFC 5869 Appendix A.1.
        let provider = RingCryptoProvider::new();
        let ikm = [0x0bu8; 22];
        let salt = hex::decode("000102030405060708090a0b0c").unwrap();
        let prk = provider.hkdf_extract(Hash::Sha256, &salt, &ikm);
        assert_eq!(hex::encode(prk), "077709362c2e32df0ddc3f0dc47bba6390b6c73bb50f9c3122ec844ad7c2b3e5");
    }

    #[test]
    fn ecdh_round_trips_in_every_supported_group() {
        let provider = RingCryptoProvider::new();
        for group in [NamedGroup::X25519, NamedGroup::Secp256r1, NamedGroup::Secp384r1] {
            let (alice_priv, alice_pub) = provider.ecdh_generate(group).unwrap();
            let (bob_priv, bob_pub) = provider.ecdh_generate(group).unwrap();

            let alice_shared = provider.ecdh_derive(&alice_priv, &bob_pub).unwrap();
            let bob_shared = provider.ecdh_derive(&bob_priv, &alice_pub).unwrap();
            assert_eq!(alice_shared, bob_shared, "{group} shared secrets disagree");
            assert!(!alice_shared.iter().all(|&b| b == 0), "{group} shared secret should not be all-zero");
        }
    }

    #[test]
    fn ecdh_derive_rejects_an_unknown_group() {
        let provider = RingCryptoProvider::new();
        assert!(provider.ecdh_generate(NamedGroup::Unknown(0x00aa)).is_err());
    }

    #[test]
    fn aead_gcm_seal_round_trips_through_an_independent_open() {
        // Exercises spec.md §8's round-trip law: aead_open(key, iv, aad,
        // ciphertext||tag) == inner_plaintext, verified against ring's own
        // `open_in_place` rather than the sealing call this crate uses.
        let provider = RingCryptoProvider::new();
        let key = [0x42u8; 16];
        let iv = [0x24u8; 12];
        let aad = b"associated data";
        let plaintext = b"esni client inner plaintext";

        let sealed = provider
            .aead_gcm_seal(CipherSuite::Aes128GcmSha256, &key, &iv, aad, plaintext)
            .unwrap();
        assert_eq!(sealed.len(), plaintext.len() + 16);

        let unbound = ring::aead::UnboundKey::new(&ring::aead::AES_128_GCM, &key).unwrap();
        let opening_key = ring::aead::LessSafeKey::new(unbound);
        let nonce = ring::aead::Nonce::try_assume_unique_for_key(&iv).unwrap();
        let mut buffer = sealed;
        let opened = opening_key.open_in_place(nonce, ring::aead::Aad::from(aad), &mut buffer).unwrap();
        assert_eq!(opened, &plaintext[..]);
    }

    #[test]
    fn aead_gcm_seal_rejects_an_unrecognized_suite() {
        let provider = RingCryptoProvider::new();
        let result = provider.aead_gcm_seal(CipherSuite::Unknown(0x9999), &[0u8; 16], &[0u8; 12], b"", b"");
        assert!(result.is_err());
    }

    #[test]
    fn hash_for_suite_binds_the_expected_hash() {
        let provider = RingCryptoProvider::new();
        assert_eq!(provider.hash_for_suite(CipherSuite::Aes128GcmSha256).unwrap(), Hash::Sha256);
        assert_eq!(provider.hash_for_suite(CipherSuite::Chacha20Poly1305Sha256).unwrap(), Hash::Sha256);
        assert_eq!(provider.hash_for_suite(CipherSuite::Aes256GcmSha384).unwrap(), Hash::Sha384);
        assert!(provider.hash_for_suite(CipherSuite::Unknown(0x9999)).is_err());
    }

    #[test]
    fn random_bytes_fills_the_whole_buffer_and_varies() {
        let provider = RingCryptoProvider::new();
        let mut a = [0u8; 16];
        let mut b = [0u8; 16];
        provider.random_bytes(&mut a);
        provider.random_bytes(&mut b);
        assert_ne!(a, b);
    }
}
