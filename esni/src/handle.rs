//! The data model a caller actually holds: [`EsniHandle`] owns the parsed
//! records and, once [`crate::engine::encrypt`] has run, the one
//! [`ClientEsni`] it produced.

use esni_wire::{CipherSuite, EsniRecord};

use crate::error::EsniError;

/// Overwrites every byte of `buf` with zero. Plain assignment rather than a
/// dependency on the `zeroize` crate — the teacher workspace carries none,
/// and this is a direct translation of `esni.c`'s `CLIENT_ESNI_free` walking
/// each field and clearing it before release.
fn clear(buf: &mut [u8]) {
    for byte in buf.iter_mut() {
        *byte = 0;
    }
}

/// The plaintext the encryption engine seals: a random nonce followed by
/// the protected name, padded to the record's `padded_length`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientEsniInner {

    /// 16 random bytes, distinct from the AEAD IV.
    pub nonce: [u8; 16],

    /// Exactly `padded_length` bytes: a `ServerNameList` encoding of
    /// `protected_name` followed by zero padding.
    pub padded_server_name_list: Vec<u8>,
}

impl Drop for ClientEsniInner {
    fn drop(&mut self) {
        clear(&mut self.nonce);
        clear(&mut self.padded_server_name_list);
    }
}

/// The intermediate secrets derived while producing one [`ClientEsni`],
/// kept around for tests and diagnostics. Every field here is sensitive key
/// material or its direct derivative and is wiped on drop.
pub struct CryptoVars {

    /// The raw Diffie-Hellman shared secret, `Z`.
    pub shared_secret: Vec<u8>,

    /// `Zx = HKDF-Extract(H, salt=empty, ikm=Z)`.
    pub zx: Vec<u8>,

    /// The AEAD key derived from `Zx`.
    pub key: Vec<u8>,

    /// The AEAD IV derived from `Zx`.
    pub iv: Vec<u8>,

    /// The associated data passed to the AEAD (`client_random`).
    pub aad: Vec<u8>,

    /// `H(ESNIContents)`, the context fed to both `HKDF-Expand-Label` calls.
    pub digest_contents: Vec<u8>,

    /// The sealed plaintext, prior to encryption.
    pub inner: ClientEsniInner,
}

impl Drop for CryptoVars {
    fn drop(&mut self) {
        clear(&mut self.shared_secret);
        clear(&mut self.zx);
        clear(&mut self.key);
        clear(&mut self.iv);
        clear(&mut self.aad);
        clear(&mut self.digest_contents);
        // `self.inner` clears itself via its own `Drop` impl.
    }
}

/// The result of encrypting one [`EsniRecord`] against a protected name: the
/// logical contents of the `ClientEncryptedSNI` extension (see spec §6 for
/// how a caller serializes this as a TLS extension body).
pub struct ClientEsni {

    /// The AEAD cipher suite this `ClientEsni` was sealed under — the first
    /// entry of the chosen record's `cipher_suites`.
    pub cipher_suite: CipherSuite,

    /// The client's ephemeral public key, encoded in the same named group
    /// as the server's chosen key share.
    pub client_key_share: Vec<u8>,

    /// `H(record.encoded[2..])`, binding the ciphertext to the exact
    /// published record (see the design notes on this choice).
    pub record_digest: Vec<u8>,

    /// `AEAD-Seal(...) = ciphertext || tag`.
    pub encrypted_sni: Vec<u8>,

    /// The intermediate secrets computed along the way; zeroized on drop.
    pub crypto_vars: CryptoVars,
}

/// What a caller holds: the records parsed from one or more `ESNIKeys` DNS
/// answers, plus — after a single call to [`crate::engine::encrypt`] — the
/// `ClientEsni` produced from the chosen one.
pub struct EsniHandle {
    records: Vec<EsniRecord>,
    chosen: usize,
    client: Option<ClientEsni>,
}

impl EsniHandle {

    /// Wraps already-parsed records. `chosen` is always `0`: this draft
    /// defines no selection policy beyond "pick the first acceptable one".
    #[must_use]
    pub fn new(records: Vec<EsniRecord>) -> Self {
        Self { records, chosen: 0, client: None }
    }

    /// Parses one base64 `ESNIKeys` string into a single-record handle.
    pub fn from_base64(input: &str) -> Result<Self, EsniError> {
        let record = EsniRecord::from_base64(input)?;
        Ok(Self::new(vec![record]))
    }

    /// Parses several base64 `ESNIKeys` strings (e.g. multiple DNS answers)
    /// into one handle. Fails on the first record that does not parse;
    /// as with [`Self::from_base64`], a malformed input never produces a
    /// handle with a partial record list.
    pub fn from_base64_records<'s>(inputs: impl IntoIterator<Item = &'s str>) -> Result<Self, EsniError> {
        let mut records = Vec::new();
        for input in inputs {
            records.push(EsniRecord::from_base64(input)?);
        }
        Ok(Self::new(records))
    }

    /// The parsed records, in the order they were supplied.
    #[must_use]
    pub fn records(&self) -> &[EsniRecord] {
        &self.records
    }

    /// The record selected for encryption: `records()[0]`, or `None` if no
    /// record was parsed.
    #[must_use]
    pub fn chosen_record(&self) -> Option<&EsniRecord> {
        self.records.get(self.chosen)
    }

    /// The `ClientEsni` produced by a prior call to the encryption engine,
    /// if any.
    #[must_use]
    pub fn client(&self) -> Option<&ClientEsni> {
        self.client.as_ref()
    }

    /// Whether this handle already holds a `ClientEsni` (encryption is
    /// one-shot per handle).
    #[must_use]
    pub fn is_encrypted(&self) -> bool {
        self.client.is_some()
    }

    pub(crate) fn set_client(&mut self, client: ClientEsni) -> Result<(), EsniError> {
        if self.client.is_some() {
            return Err(EsniError::AlreadyEncrypted);
        }
        self.client = Some(client);
        Ok(())
    }
}
