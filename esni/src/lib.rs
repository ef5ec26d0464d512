//! The client side of Encrypted Server Name Indication (ESNI),
//! draft-ietf-tls-esni-02: given a server's published `ESNIKeys` record,
//! derive the key schedule and produce the `ClientEncryptedSNI` extension
//! body that conceals the real server name inside an outer TLS 1.3
//! ClientHello.

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
#![deny(clippy::cast_possible_truncation)]
#![deny(clippy::cast_lossless)]
#![deny(clippy::cast_possible_wrap)]
#![deny(clippy::cast_sign_loss)]
#![deny(unsafe_code)]

pub use esni_wire::{CipherSuite, EsniRecord, KeyShareEntry, NamedGroup, WireError};

mod error;
pub use self::error::EsniError;

pub mod crypto;

mod backend;
pub use self::backend::RingCryptoProvider;

mod handle;
pub use self::handle::{ClientEsni, ClientEsniInner, CryptoVars, EsniHandle};

mod engine;
pub use self::engine::{encrypt, EncryptArgs};

pub mod printer;
