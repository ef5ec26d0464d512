//! A small demonstration binary: builds a syntactically valid `ESNIKeys`
//! record in-process, parses it back through the real parser, runs the
//! encryption engine against it, and prints the result. Takes no
//! arguments and does no DNS lookups or socket work — the library's own
//! test suite is the thing actually worth trusting; this exists only so
//! the workspace has something runnable to point at.

#![warn(deprecated_in_future)]
#![warn(future_incompatible)]
#![warn(nonstandard_style)]
#![warn(rust_2018_compatibility)]
#![warn(rust_2018_idioms)]
#![warn(trivial_casts, trivial_numeric_casts)]
#![warn(unused)]
#![deny(unsafe_code)]

use log::info;

use esni::crypto::CryptoProvider;
use esni::{printer, EncryptArgs, EsniHandle, RingCryptoProvider};
use esni_wire::Writer;

/// The only recognized `version` value for draft-ietf-tls-esni-02.
const VERSION: u16 = 0xFF01;

fn main() {
    env_logger::init();

    let provider = RingCryptoProvider::new();
    let base64_record = build_sample_record_base64(&provider);
    info!("Built sample ESNIKeys record ({} base64 chars)", base64_record.len());

    let mut handle = EsniHandle::from_base64(&base64_record)
        .expect("the record we just built should parse cleanly");
    println!("{}", printer::dump(&handle));

    let args = EncryptArgs {
        protected_name: "secret.example.com",
        front_name: "cdn.example.com",
        client_random: [0xAA; 32],
    };
    esni::encrypt(&mut handle, &provider, &args)
        .expect("encryption should succeed against a well-formed record");

    println!("{}", printer::dump(&handle));
}

/// Builds a single x25519 key share, `TLS_AES_128_GCM_SHA256` record with a
/// wide-open validity window, patches in its self-referential checksum, and
/// base64-encodes it — a synthetic stand-in for what a real client would
/// fetch from DNS.
fn build_sample_record_base64(provider: &dyn CryptoProvider) -> String {
    let mut w = Writer::new();
    w.write_u16(VERSION);
    w.write_bytes(&[0, 0, 0, 0]); // checksum placeholder, patched below

    w.write_length_prefixed_u16(|ks| {
        ks.write_u16(0x001d); // x25519
        ks.write_length_prefixed_u16(|pk| pk.write_bytes(&[0x42; 32]));
    });

    w.write_length_prefixed_u16(|cs| cs.write_u16(0x1301)); // TLS_AES_128_GCM_SHA256

    w.write_u16(260); // padded_length
    w.write_u64(0); // not_before
    w.write_u64(0x7FFF_FFFF_FFFF_FFFF); // not_after
    w.write_u16(0); // extensions

    let mut bytes = w.into_bytes();
    let digest = provider.sha256(&with_checksum_zeroed(&bytes));
    bytes[2..6].copy_from_slice(&digest[0..4]);

    base64::encode(&bytes)
}

fn with_checksum_zeroed(bytes: &[u8]) -> Vec<u8> {
    let mut zeroed = bytes.to_vec();
    zeroed[2..6].fill(0);
    zeroed
}
