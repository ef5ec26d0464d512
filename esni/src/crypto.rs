//! The small capability interface the encryption engine is built against.
//!
//! The source this draft is distilled from couples its key schedule
//! directly to OpenSSL's EVP API. Here that coupling becomes a trait: any
//! backend that implements these eight operations can drive the engine.
//! [`RingCryptoProvider`](crate::RingCryptoProvider) is the only backend
//! this crate ships, built from `ring`, `x25519-dalek`, `p256`, and `p384`.

use esni_wire::{CipherSuite, NamedGroup};

use crate::error::EsniError;

/// The hash function bound to a cipher suite, used both for
/// `HKDF-Extract`/`HKDF-Expand-Label` and for `record_digest`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Hash {
    /// SHA-256, 32-byte output.
    Sha256,
    /// SHA-384, 48-byte output.
    Sha384,
}

impl Hash {
    /// The digest length this hash produces, in bytes.
    #[must_use]
    pub fn output_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
        }
    }
}

/// An ephemeral ECDH private key, tagged by the named group it was
/// generated in. Each backend's concrete key type is responsible for
/// zeroizing itself on drop; this crate adds no zeroizing wrapper of its
/// own around it.
pub enum PrivateKey {
    /// An X25519 scalar.
    X25519(x25519_dalek::StaticSecret),
    /// A P-256 scalar.
    P256(p256::ecdh::EphemeralSecret),
    /// A P-384 scalar.
    P384(p384::ecdh::EphemeralSecret),
}

/// The eight crypto operations the encryption engine needs. See spec §4.2.
pub trait CryptoProvider {

    /// `sha256(bytes) -> 32 bytes`.
    fn sha256(&self, bytes: &[u8]) -> [u8; 32];

    /// A hash keyed by [`Hash`], used for `record_digest` and anywhere
    /// else the suite's bound hash function is needed directly.
    fn hash(&self, which: Hash, bytes: &[u8]) -> Vec<u8>;

    /// The hash function a cipher suite is bound to (draft-02: both
    /// `TLS_AES_128_GCM_SHA256` and `TLS_CHACHA20_POLY1305_SHA256` use
    /// SHA-256; `TLS_AES_256_GCM_SHA384` uses SHA-384).
    fn hash_for_suite(&self, suite: CipherSuite) -> Result<Hash, EsniError>;

    /// Generates an ephemeral key in the given named group, returning the
    /// private key and the group's wire-format public point encoding.
    fn ecdh_generate(&self, group: NamedGroup) -> Result<(PrivateKey, Vec<u8>), EsniError>;

    /// Derives the ECDH shared secret against a peer's wire-format public
    /// point.
    fn ecdh_derive(&self, private: &PrivateKey, peer_public_bytes: &[u8]) -> Result<Vec<u8>, EsniError>;

    /// `HKDF-Extract(hash, salt, ikm) -> prk`. An empty `salt` is expanded
    /// to a zero string of the hash's output length, per RFC 5869.
    fn hkdf_extract(&self, hash: Hash, salt: &[u8], ikm: &[u8]) -> Vec<u8>;

    /// `HKDF-Expand-Label(hash, prk, label, context, out_len) -> bytes`,
    /// with `info` equal to the literal ASCII `label` bytes followed by
    /// `context` — deliberately not TLS 1.3's structured `HkdfLabel`
    /// framing (see the design notes).
    fn hkdf_expand_label(&self, hash: Hash, prk: &[u8], label: &str, context: &[u8], out_len: usize) -> Result<Vec<u8>, EsniError>;

    /// `AEAD-GCM-Seal(suite, key, iv, aad, plaintext) -> ciphertext || tag`.
    fn aead_gcm_seal(&self, suite: CipherSuite, key: &[u8], iv: &[u8], aad: &[u8], plaintext: &[u8]) -> Result<Vec<u8>, EsniError>;

    /// Fills `out` with CSPRNG output.
    fn random_bytes(&self, out: &mut [u8]);
}
