//! The `ESNIKeys` record itself: parsing a base64 string into a validated,
//! checksummed `EsniRecord`.

use sha2::{Digest, Sha256};

use crate::codec::Reader;
use crate::error::WireError;
use crate::types::{CipherSuite, NamedGroup};

/// The only recognized `version` value for this draft.
pub const VERSION: u16 = 0xFF01;

/// One entry in an `EsniRecord`'s `key_shares` list: a named group plus the
/// server's wire-format-encoded public key point in that group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyShareEntry {

    /// The named group this key share's point lies in.
    pub group: NamedGroup,

    /// The group's wire-format point encoding.
    pub public_key: Vec<u8>,
}

/// A single parsed, checksum-verified `ESNIKeys` record — one server
/// offering.
#[derive(Debug, Clone, PartialEq)]
pub struct EsniRecord {

    /// Always `VERSION` after a successful parse.
    pub version: u16,

    /// The first 4 bytes of `SHA-256` over the record with this field
    /// zeroed; verified during parsing.
    pub checksum: [u8; 4],

    /// The server's published key shares, in the order they appeared. Never
    /// empty after a successful parse.
    pub key_shares: Vec<KeyShareEntry>,

    /// The server's supported AEAD cipher suites, filtered to those this
    /// crate recognizes. Never empty after a successful parse.
    pub cipher_suites: Vec<CipherSuite>,

    /// The fixed plaintext length of the padded inner SNI.
    pub padded_length: u16,

    /// Seconds since the Unix epoch; start of this record's validity window.
    pub not_before: u64,

    /// Seconds since the Unix epoch; end of this record's validity window.
    ///
    /// Neither bound is enforced by this crate — callers that care compare
    /// against wall-clock time themselves.
    pub not_after: u64,

    /// The verbatim decoded bytes this record was parsed from, kept so that
    /// `record_digest` can later be computed over exactly what the server
    /// published.
    pub encoded: Vec<u8>,
}

impl EsniRecord {

    /// Decodes a base64 `ESNIKeys` string and parses it into a record.
    pub fn from_base64(input: &str) -> Result<Self, WireError> {
        log::info!("Parsing ESNIKeys record from base64 ({} chars)", input.len());
        let decoded = base64::decode(input).map_err(|e| WireError::BadBase64(e.to_string()))?;
        log::trace!("Decoded {} byte(s)", decoded.len());
        Self::from_bytes(&decoded)
    }

    fn from_bytes(b: &[u8]) -> Result<Self, WireError> {
        // A record shorter than this can't possibly hold a checksum plus
        // the rest of the fixed-width fields.
        if b.len() < 10 {
            log::error!("Record too short to check ({} byte(s))", b.len());
            return Err(WireError::ShortRead);
        }

        verify_checksum(b)?;

        let mut r = Reader::new(b);

        let version = r.read_u16()?;
        log::trace!("version -> 0x{version:04x}");
        if version != VERSION {
            return Err(WireError::BadVersion(version));
        }

        let mut checksum = [0u8; 4];
        checksum.copy_from_slice(&r.read_bytes(4)?);

        let key_shares = r.read_length_prefixed_u16(|sub| {
            let mut shares = Vec::new();
            while sub.remaining() > 0 {
                let group = NamedGroup::from_u16(sub.read_u16()?);
                log::trace!("key share group -> {group}");
                let public_key = sub.read_length_prefixed_u16(|ks| {
                    let n = ks.remaining();
                    ks.read_bytes(n)
                })?;
                if public_key.is_empty() || !group.is_supported() {
                    return Err(WireError::BadGroup(group.to_u16()));
                }
                shares.push(KeyShareEntry { group, public_key });
            }
            Ok(shares)
        })?;
        if key_shares.is_empty() {
            return Err(WireError::BadGroup(0));
        }
        log::debug!("Read {} key share(s)", key_shares.len());

        let cipher_suites = r.read_length_prefixed_u16(|sub| {
            if sub.remaining() % 2 != 0 {
                return Err(WireError::NoCipherSuite);
            }
            let mut suites = Vec::new();
            while sub.remaining() > 0 {
                let suite = CipherSuite::from_u16(sub.read_u16()?);
                if suite.is_supported() {
                    suites.push(suite);
                } else {
                    log::debug!("Skipping unrecognized cipher suite {suite}");
                }
            }
            Ok(suites)
        })?;
        if cipher_suites.is_empty() {
            return Err(WireError::NoCipherSuite);
        }
        log::debug!("Read {} supported cipher suite(s)", cipher_suites.len());

        let padded_length = r.read_u16()?;
        log::trace!("padded_length -> {padded_length}");

        let not_before = r.read_u64()?;
        let not_after = r.read_u64()?;
        log::trace!("validity window -> {not_before}..{not_after}");

        let extensions_len = r.read_u16()?;
        if extensions_len != 0 {
            return Err(WireError::UnsupportedExtensions);
        }

        if r.remaining() != 0 {
            return Err(WireError::TrailingBytes { consumed: b.len() - r.remaining(), total: b.len() });
        }

        Ok(Self {
            version,
            checksum,
            key_shares,
            cipher_suites,
            padded_length,
            not_before,
            not_after,
            encoded: b.to_vec(),
        })
    }
}

fn verify_checksum(b: &[u8]) -> Result<(), WireError> {
    let mut zeroed = b.to_vec();
    zeroed[2..6].fill(0);
    let digest = Sha256::digest(&zeroed);
    if digest[0..4] != b[2..6] {
        return Err(WireError::BadChecksum);
    }
    Ok(())
}
