//! A diagnostic dump of an [`EsniHandle`]'s parsed and derived state. Output
//! format is not a stability surface (spec §4.5); tests compare structural
//! fields, not this text.

use std::fmt;
use std::fmt::Write as _;

use crate::handle::EsniHandle;

/// Renders a labeled, hex-dumped summary of `handle`: every parsed record's
/// fields, and — if present — the `ClientEsni` produced from it.
#[must_use]
pub fn dump(handle: &EsniHandle) -> String {
    let mut out = String::new();
    for (i, record) in handle.records().iter().enumerate() {
        let _ = writeln!(out, "record[{i}]:");
        let _ = writeln!(out, "  version:       0x{:04x}", record.version);
        let _ = writeln!(out, "  checksum:      {}", hex::encode(record.checksum));
        let _ = writeln!(out, "  padded_length: {}", record.padded_length);
        let _ = writeln!(out, "  not_before:    {}", record.not_before);
        let _ = writeln!(out, "  not_after:     {}", record.not_after);
        let _ = writeln!(out, "  key_shares:");
        for ks in &record.key_shares {
            let _ = writeln!(out, "    {} -> {}", ks.group, hex::encode(&ks.public_key));
        }
        let _ = writeln!(out, "  cipher_suites:");
        for suite in &record.cipher_suites {
            let _ = writeln!(out, "    {suite}");
        }
    }

    if let Some(client) = handle.client() {
        let _ = writeln!(out, "client_esni:");
        let _ = writeln!(out, "  cipher_suite:     {}", client.cipher_suite);
        let _ = writeln!(out, "  client_key_share: {}", hex::encode(&client.client_key_share));
        let _ = writeln!(out, "  record_digest:    {}", hex::encode(&client.record_digest));
        let _ = writeln!(out, "  encrypted_sni:    {} ({} bytes)", hex::encode(&client.encrypted_sni), client.encrypted_sni.len());
        let _ = writeln!(out, "  crypto_vars:");
        let _ = writeln!(out, "    shared_secret:    {}", hex::encode(&client.crypto_vars.shared_secret));
        let _ = writeln!(out, "    zx:               {}", hex::encode(&client.crypto_vars.zx));
        let _ = writeln!(out, "    key:              {}", hex::encode(&client.crypto_vars.key));
        let _ = writeln!(out, "    iv:               {}", hex::encode(&client.crypto_vars.iv));
        let _ = writeln!(out, "    aad:              {}", hex::encode(&client.crypto_vars.aad));
        let _ = writeln!(out, "    digest_contents:  {}", hex::encode(&client.crypto_vars.digest_contents));
    } else {
        let _ = writeln!(out, "client_esni: (not yet encrypted)");
    }

    out
}

/// Wraps [`dump`] so an `EsniHandle` can be logged or printed directly with
/// `{}`.
pub struct Printer<'h>(pub &'h EsniHandle);

impl fmt::Display for Printer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", dump(self.0))
    }
}
