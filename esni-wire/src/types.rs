use std::fmt;

/// A TLS 1.3 named group identifier, as carried in a key share entry.
///
/// Only the groups this codebase's crypto backend can actually perform ECDH
/// in are named; every other wire value decodes to `Unknown`.
#[derive(PartialEq, Eq, Debug, Copy, Clone, Hash)]
pub enum NamedGroup {

    /// NIST P-256 (secp256r1).
    Secp256r1,

    /// NIST P-384 (secp384r1).
    Secp384r1,

    /// Curve25519 in Montgomery form, as used by X25519 ECDH.
    X25519,

    /// A group number this crate does not recognize.
    Unknown(u16),
}

impl NamedGroup {

    pub(crate) fn from_u16(uu: u16) -> Self {
        match uu {
            0x0017 => Self::Secp256r1,
            0x0018 => Self::Secp384r1,
            0x001d => Self::X25519,
                 _ => Self::Unknown(uu),
        }
    }

    pub(crate) fn to_u16(self) -> u16 {
        match self {
            Self::Secp256r1 => 0x0017,
            Self::Secp384r1 => 0x0018,
            Self::X25519    => 0x001d,
            Self::Unknown(uu) => uu,
        }
    }

    /// Whether this crate's crypto backend can generate and derive ECDH
    /// keys in this group.
    pub fn is_supported(self) -> bool {
        !matches!(self, Self::Unknown(_))
    }
}

impl fmt::Display for NamedGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Secp256r1   => write!(f, "secp256r1"),
            Self::Secp384r1   => write!(f, "secp384r1"),
            Self::X25519      => write!(f, "x25519"),
            Self::Unknown(uu) => write!(f, "unknown(0x{uu:04x})"),
        }
    }
}


/// A TLS 1.3 AEAD cipher suite identifier.
#[derive(PartialEq, Eq, Debug, Copy, Clone, Hash)]
pub enum CipherSuite {

    /// `TLS_AES_128_GCM_SHA256` — AES-128-GCM, SHA-256 transcript hash.
    Aes128GcmSha256,

    /// `TLS_AES_256_GCM_SHA384` — AES-256-GCM, SHA-384 transcript hash.
    Aes256GcmSha384,

    /// `TLS_CHACHA20_POLY1305_SHA256` — ChaCha20-Poly1305, SHA-256 transcript hash.
    Chacha20Poly1305Sha256,

    /// A suite number this crate does not recognize.
    Unknown(u16),
}

impl CipherSuite {

    pub(crate) fn from_u16(uu: u16) -> Self {
        match uu {
            0x1301 => Self::Aes128GcmSha256,
            0x1302 => Self::Aes256GcmSha384,
            0x1303 => Self::Chacha20Poly1305Sha256,
                 _ => Self::Unknown(uu),
        }
    }

    pub(crate) fn to_u16(self) -> u16 {
        match self {
            Self::Aes128GcmSha256         => 0x1301,
            Self::Aes256GcmSha384         => 0x1302,
            Self::Chacha20Poly1305Sha256  => 0x1303,
            Self::Unknown(uu)             => uu,
        }
    }

    /// Whether this crate's crypto backend implements this suite.
    pub fn is_supported(self) -> bool {
        !matches!(self, Self::Unknown(_))
    }

    /// The AEAD key length this suite requires, in bytes.
    ///
    /// The source this draft was distilled from requests a blanket 32-byte
    /// key regardless of suite; that's a bug (see the design notes), fixed
    /// here by keying off the actual suite.
    pub fn key_len(self) -> Option<usize> {
        match self {
            Self::Aes128GcmSha256        => Some(16),
            Self::Chacha20Poly1305Sha256 => Some(32),
            Self::Aes256GcmSha384        => Some(32),
            Self::Unknown(_)             => None,
        }
    }
}

impl fmt::Display for CipherSuite {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Aes128GcmSha256        => write!(f, "TLS_AES_128_GCM_SHA256"),
            Self::Aes256GcmSha384        => write!(f, "TLS_AES_256_GCM_SHA384"),
            Self::Chacha20Poly1305Sha256 => write!(f, "TLS_CHACHA20_POLY1305_SHA256"),
            Self::Unknown(uu)            => write!(f, "unknown(0x{uu:04x})"),
        }
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn named_group_round_trips() {
        for &g in &[NamedGroup::Secp256r1, NamedGroup::Secp384r1, NamedGroup::X25519] {
            assert_eq!(NamedGroup::from_u16(g.to_u16()), g);
            assert!(g.is_supported());
        }
        assert!(!NamedGroup::from_u16(0x00aa).is_supported());
    }

    #[test]
    fn cipher_suite_round_trips_and_key_lens() {
        assert_eq!(CipherSuite::Aes128GcmSha256.key_len(), Some(16));
        assert_eq!(CipherSuite::Aes256GcmSha384.key_len(), Some(32));
        assert_eq!(CipherSuite::Chacha20Poly1305Sha256.key_len(), Some(32));
        assert_eq!(CipherSuite::from_u16(0x1301), CipherSuite::Aes128GcmSha256);
        assert_eq!(CipherSuite::Unknown(0x9999).key_len(), None);
    }
}
