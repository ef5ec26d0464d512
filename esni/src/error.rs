use std::fmt;

use esni_wire::WireError;

/// Something that can go wrong validating a record or running the
/// encryption engine.
#[derive(Debug)]
pub enum EsniError {

    /// The record failed to decode or checksum-verify.
    Wire(WireError),

    /// `protected_name` or `front_name` was empty, or otherwise not a
    /// usable server name.
    BadName,

    /// `protected_name` does not fit inside the record's `padded_length`
    /// (the name plus 5 bytes of `ServerNameList` framing must be strictly
    /// less than `padded_length`), or either name exceeded 255 bytes.
    NameTooLong,

    /// A crypto primitive refused; carries the operation name (e.g.
    /// `"ecdh_derive"`, `"aead_gcm_seal"`).
    CryptoFailure(&'static str),

    /// `encrypt` was called a second time on a handle that already holds a
    /// `ClientEsni`.
    AlreadyEncrypted,
}

impl From<WireError> for EsniError {
    fn from(inner: WireError) -> Self {
        Self::Wire(inner)
    }
}

impl fmt::Display for EsniError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Wire(inner) => write!(f, "{inner}"),
            Self::BadName => write!(f, "server name was empty or otherwise unusable"),
            Self::NameTooLong => write!(f, "server name does not fit in the record's padded_length"),
            Self::CryptoFailure(op) => write!(f, "crypto primitive failed: {op}"),
            Self::AlreadyEncrypted => write!(f, "this handle has already been encrypted once"),
        }
    }
}

impl std::error::Error for EsniError {}


#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn wraps_wire_error() {
        let e: EsniError = WireError::BadChecksum.into();
        assert!(matches!(e, EsniError::Wire(WireError::BadChecksum)));
        assert_eq!(e.to_string(), WireError::BadChecksum.to_string());
    }

    #[test]
    fn displays_without_panicking() {
        let errs: Vec<EsniError> = vec![
            EsniError::BadName,
            EsniError::NameTooLong,
            EsniError::CryptoFailure("ecdh_derive"),
            EsniError::AlreadyEncrypted,
        ];
        for e in errs {
            assert!(!e.to_string().is_empty());
        }
    }
}
