use std::fmt;
use std::io;

/// Something that can go wrong decoding an `ESNIKeys` record.
#[derive(PartialEq, Eq, Debug, Clone)]
pub enum WireError {

    /// There was an IO error reading from the cursor.
    /// Almost all the time, this means that the buffer was too short.
    ShortRead,
    // (io::Error is not PartialEq so we don't propagate it)

    /// The base64 input was not decodable, or carried more than two `=`
    /// padding bytes.
    BadBase64(String),

    /// The decoded record's 4-byte checksum did not match
    /// `SHA-256(record_with_checksum_zeroed)[0..4]`.
    BadChecksum,

    /// The record had bytes left over after every field was decoded.
    TrailingBytes {

        /// How many bytes of the decoded record were consumed by fields.
        consumed: usize,

        /// The total length of the decoded record.
        total: usize,
    },

    /// The `version` field was not `0xFF01` (draft-02).
    BadVersion(u16),

    /// A key share referenced a named group this crate does not support,
    /// or carried an empty `public_key_bytes`.
    BadGroup(u16),

    /// After filtering unrecognized cipher suite identifiers, none
    /// remained — or the `cipher_suites` field had an odd byte length.
    NoCipherSuite,

    /// This draft recognizes no record extensions; the `extensions` field
    /// was non-empty.
    UnsupportedExtensions,
}

impl From<io::Error> for WireError {
    fn from(ioe: io::Error) -> Self {
        log::error!("IO error -> {:?}", ioe);
        Self::ShortRead
    }
}

impl fmt::Display for WireError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ShortRead => write!(f, "record ended before all fields were read"),
            Self::BadBase64(msg) => write!(f, "invalid base64: {msg}"),
            Self::BadChecksum => write!(f, "checksum does not match record contents"),
            Self::TrailingBytes { consumed, total } =>
                write!(f, "record had {} trailing byte(s) after {consumed} were consumed (of {total})", total - consumed),
            Self::BadVersion(v) => write!(f, "unrecognized version 0x{v:04x}"),
            Self::BadGroup(g) => write!(f, "unsupported or invalid named group 0x{g:04x}"),
            Self::NoCipherSuite => write!(f, "no recognized cipher suite remained after filtering"),
            Self::UnsupportedExtensions => write!(f, "record carried extensions, which this draft does not support"),
        }
    }
}

impl std::error::Error for WireError {}


#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn io_error_becomes_short_read() {
        let ioe = io::Error::new(io::ErrorKind::UnexpectedEof, "eof");
        assert_eq!(WireError::from(ioe), WireError::ShortRead);
    }

    #[test]
    fn displays_without_panicking() {
        let errs = vec![
            WireError::ShortRead,
            WireError::BadBase64("bad".into()),
            WireError::BadChecksum,
            WireError::TrailingBytes { consumed: 10, total: 14 },
            WireError::BadVersion(0x0301),
            WireError::BadGroup(0x0099),
            WireError::NoCipherSuite,
            WireError::UnsupportedExtensions,
        ];
        for e in errs {
            assert!(!e.to_string().is_empty());
        }
    }
}
