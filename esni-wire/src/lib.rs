//! Binary wire format for the `ESNIKeys` DNS record (draft-ietf-tls-esni-02):
//! a byte-oriented codec, the named-group and cipher-suite identifiers, and
//! the record parser with its self-referential checksum check.

#![warn(deprecated_in_future)]
#![warn(future_incompatible)]
#![warn(missing_copy_implementations)]
#![warn(missing_docs)]
#![warn(nonstandard_style)]
#![warn(rust_2018_compatibility)]
#![warn(rust_2018_idioms)]
#![warn(single_use_lifetimes)]
#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unused)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::upper_case_acronyms)]
#![deny(clippy::cast_possible_truncation)]
#![deny(clippy::cast_lossless)]
#![deny(clippy::cast_possible_wrap)]
#![deny(clippy::cast_sign_loss)]
#![deny(unsafe_code)]

mod codec;
pub use self::codec::{CursorExt, Reader, Writer};

mod types;
pub use self::types::{CipherSuite, NamedGroup};

mod record;
pub use self::record::{EsniRecord, KeyShareEntry};

mod error;
pub use self::error::WireError;
