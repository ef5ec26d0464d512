//! Reading and writing the big-endian, length-prefixed encoding used by
//! `ESNIKeys` records.

use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Cursor, Read, Seek, SeekFrom};

use crate::error::WireError;

/// A kinda hacky but alright way to bound a sub-read without copying the
/// whole buffer.
pub trait CursorExt {

    /// The unread tail of the cursor's buffer.
    fn std_remaining_slice(&self) -> &[u8];

    /// A new cursor over the next `length` bytes of this one, not advancing
    /// this cursor's own position.
    fn truncated(&self, length: u64) -> Self;

    /// Runs `f` against a cursor truncated to `length` bytes, then advances
    /// this cursor by exactly `length` bytes regardless of how much of that
    /// the closure actually read.
    fn with_truncated<T>(&mut self, length: u64, f: impl FnOnce(&mut Self, usize) -> T) -> T;
}

impl CursorExt for Cursor<&[u8]> {
    fn std_remaining_slice(&self) -> &[u8] {
        let inner = self.get_ref();
        let len = self.position().min(inner.len() as u64);
        &inner[(len as usize)..]
    }

    fn truncated(&self, to_length: u64) -> Self {
        let inner = self.get_ref();
        let len = inner.len() as u64;
        let start = self.position().min(len);
        let end = (start + to_length).min(len);
        Cursor::new(&inner[(start as usize) .. (end as usize)])
    }

    fn with_truncated<T>(&mut self, length: u64, f: impl FnOnce(&mut Self, usize) -> T) -> T {
        let mut trunc = self.truncated(length);
        let len_hint = trunc.get_ref().len();
        let ret = f(&mut trunc, len_hint);
        self.seek(SeekFrom::Current(trunc.position() as i64))
            .expect("seeking within an in-memory cursor cannot fail");
        ret
    }
}


/// A forward-only reader over a decoded record's bytes.
pub struct Reader<'b> {
    cursor: Cursor<&'b [u8]>,
}

impl<'b> Reader<'b> {

    /// Wraps a decoded byte slice for field-by-field reading.
    pub fn new(bytes: &'b [u8]) -> Self {
        Self { cursor: Cursor::new(bytes) }
    }

    /// How many bytes are left to read.
    pub fn remaining(&self) -> usize {
        self.cursor.std_remaining_slice().len()
    }

    /// Reads one byte.
    pub fn read_u8(&mut self) -> Result<u8, WireError> {
        Ok(self.cursor.read_u8()?)
    }

    /// Reads a big-endian 16-bit value.
    pub fn read_u16(&mut self) -> Result<u16, WireError> {
        Ok(self.cursor.read_u16::<BigEndian>()?)
    }

    /// Reads a big-endian 64-bit value.
    pub fn read_u64(&mut self) -> Result<u64, WireError> {
        Ok(self.cursor.read_u64::<BigEndian>()?)
    }

    /// Copies exactly `n` bytes out of the buffer.
    pub fn read_bytes(&mut self, n: usize) -> Result<Vec<u8>, WireError> {
        let mut buf = vec![0u8; n];
        self.cursor.read_exact(&mut buf)?;
        Ok(buf)
    }

    /// Reads a 16-bit length `L`, then calls `f` with a reader bounded to
    /// exactly the next `L` bytes. Advances past all `L` bytes, whether or
    /// not `f` consumed every one of them — a short read inside `f` still
    /// leaves the parent cursor correctly positioned for the next field.
    pub fn read_length_prefixed_u16<T>(
        &mut self,
        f: impl FnOnce(&mut Reader<'b>) -> Result<T, WireError>,
    ) -> Result<T, WireError> {
        let len = self.read_u16()?;
        if usize::from(len) > self.remaining() {
            return Err(WireError::ShortRead);
        }
        self.cursor.with_truncated(u64::from(len), |trunc, _len_hint| {
            let mut sub = Reader { cursor: trunc.clone() };
            f(&mut sub)
        })
    }
}


/// A growable, big-endian writer — the encoding-side counterpart of `Reader`.
pub struct Writer {
    bytes: Vec<u8>,
}

impl Writer {

    /// Starts a new, empty buffer.
    pub fn new() -> Self {
        Self { bytes: Vec::new() }
    }

    /// Consumes the writer, returning the bytes written so far.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }

    /// Writes one byte.
    pub fn write_u8(&mut self, value: u8) {
        self.bytes.write_u8(value).expect("writing to a Vec<u8> cannot fail");
    }

    /// Writes a big-endian 16-bit value.
    pub fn write_u16(&mut self, value: u16) {
        self.bytes.write_u16::<BigEndian>(value).expect("writing to a Vec<u8> cannot fail");
    }

    /// Writes a big-endian 64-bit value.
    pub fn write_u64(&mut self, value: u64) {
        self.bytes.write_u64::<BigEndian>(value).expect("writing to a Vec<u8> cannot fail");
    }

    /// Appends raw bytes verbatim.
    pub fn write_bytes(&mut self, data: &[u8]) {
        self.bytes.extend_from_slice(data);
    }

    /// Builds a sub-buffer with `f`, then writes its length as a 16-bit
    /// prefix followed by the sub-buffer itself.
    pub fn write_length_prefixed_u16(&mut self, f: impl FnOnce(&mut Writer)) {
        let mut sub = Writer::new();
        f(&mut sub);
        let body = sub.into_bytes();
        let len = u16::try_from(body.len()).expect("sub-buffer longer than a u16 length prefix can encode");
        self.write_u16(len);
        self.write_bytes(&body);
    }
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}


#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reads_fixed_width_fields() {
        let buf = [0x01, 0xFF, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x7B];
        let mut r = Reader::new(&buf);
        assert_eq!(r.read_u8().unwrap(), 0x01);
        assert_eq!(r.read_u16().unwrap(), 0xFF01);
        assert_eq!(r.read_u64().unwrap(), 0x7B);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn short_read_on_empty_buffer() {
        let buf: [u8; 0] = [];
        let mut r = Reader::new(&buf);
        assert_eq!(r.read_u8(), Err(WireError::ShortRead));
    }

    #[test]
    fn length_prefixed_sub_reader_is_bounded() {
        // length = 2, body = [0xAA, 0xBB], then one trailing byte
        let buf = [0x00, 0x02, 0xAA, 0xBB, 0xCC];
        let mut r = Reader::new(&buf);
        let inner: Vec<u8> = r.read_length_prefixed_u16(|sub| {
            let b = sub.read_bytes(2)?;
            assert_eq!(sub.remaining(), 0);
            Ok(b)
        }).unwrap();
        assert_eq!(inner, vec![0xAA, 0xBB]);
        assert_eq!(r.read_u8().unwrap(), 0xCC);
    }

    #[test]
    fn length_prefix_exceeding_buffer_is_short_read() {
        let buf = [0x00, 0x05, 0xAA];
        let mut r = Reader::new(&buf);
        let result: Result<(), WireError> = r.read_length_prefixed_u16(|_| Ok(()));
        assert_eq!(result, Err(WireError::ShortRead));
    }

    #[test]
    fn writer_round_trips_fixed_width_fields() {
        let mut w = Writer::new();
        w.write_u8(0x01);
        w.write_u16(0xFF01);
        w.write_u64(123);
        let bytes = w.into_bytes();

        let mut r = Reader::new(&bytes);
        assert_eq!(r.read_u8().unwrap(), 0x01);
        assert_eq!(r.read_u16().unwrap(), 0xFF01);
        assert_eq!(r.read_u64().unwrap(), 123);
    }

    #[test]
    fn writer_length_prefixes_sub_buffers() {
        let mut w = Writer::new();
        w.write_length_prefixed_u16(|sub| {
            sub.write_bytes(&[0xAA, 0xBB, 0xCC]);
        });
        let bytes = w.into_bytes();
        assert_eq!(bytes, vec![0x00, 0x03, 0xAA, 0xBB, 0xCC]);
    }
}
