// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Payload codec layer: the conventions for encoding non-key data as
//! suffixes of an automaton's keys, and recovering it at query time.
//!
//! Three codecs, expressed as one tagged enum rather than a class
//! hierarchy (spec.md §9's design note): `None` (plain membership),
//! `Integer` (value lives in the Dictionary's own leaf cell), `Bytes` and
//! `Record` (value lives after a `0xFF` separator, base64-encoded).

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use byteorder::{BigEndian, ByteOrder as _, LittleEndian, NativeEndian};

use crate::error::{malformed, Error, Result};

/// Separates a key from its base64-encoded payload suffix.
pub const SEP: u8 = 0xFF;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ByteOrder {
    Little,
    Big,
    Native,
    /// Network order is big-endian; kept distinct so the format string
    /// round-trips for display.
    Network,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldType {
    U8,
    U16,
    U32,
    I8,
    I16,
    I32,
}

impl FieldType {
    fn size(self) -> usize {
        match self {
            FieldType::U8 | FieldType::I8 => 1,
            FieldType::U16 | FieldType::I16 => 2,
            FieldType::U32 | FieldType::I32 => 4,
        }
    }

    fn from_char(c: char) -> Option<Self> {
        match c {
            'B' => Some(FieldType::U8),
            'H' => Some(FieldType::U16),
            'I' => Some(FieldType::U32),
            'b' => Some(FieldType::I8),
            'h' => Some(FieldType::I16),
            'i' => Some(FieldType::I32),
            _ => None,
        }
    }
}

/// A parsed record format string, e.g. `">3H"` or `"=H"`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordFormat {
    pub byte_order: ByteOrder,
    pub fields: Vec<FieldType>,
}

impl RecordFormat {
    pub fn parse(format: &str) -> Result<Self> {
        let mut chars = format.chars();
        let byte_order = match chars.next() {
            Some('<') => ByteOrder::Little,
            Some('>') => ByteOrder::Big,
            Some('=') => ByteOrder::Native,
            Some('!') => ByteOrder::Network,
            _ => return Err(malformed("record-format", format!("missing byte-order prefix in {format:?}"))),
        };

        let mut fields = Vec::new();
        let mut count_buf = String::new();
        for c in chars {
            if c.is_ascii_digit() {
                count_buf.push(c);
                continue;
            }
            let field = FieldType::from_char(c)
                .ok_or_else(|| malformed("record-format", format!("unsupported field type {c:?} in {format:?}")))?;
            let count: usize = if count_buf.is_empty() {
                1
            } else {
                count_buf
                    .parse()
                    .map_err(|_| malformed("record-format", format!("bad repeat count in {format:?}")))?
            };
            count_buf.clear();
            for _ in 0..count {
                fields.push(field);
            }
        }
        if !count_buf.is_empty() {
            return Err(malformed("record-format", format!("trailing count with no type in {format:?}")));
        }
        if fields.is_empty() {
            return Err(malformed("record-format", format!("no fields in {format:?}")));
        }

        Ok(Self { byte_order, fields })
    }

    pub fn packed_len(&self) -> usize {
        self.fields.iter().map(|f| f.size()).sum()
    }

    /// Pack `values` (one per field, widened to `i64`) per this format.
    pub fn pack(&self, values: &[i64]) -> Result<Vec<u8>> {
        if values.len() != self.fields.len() {
            return Err(malformed(
                "record-format",
                format!("expected {} values, got {}", self.fields.len(), values.len()),
            ));
        }
        let mut buf = vec![0u8; self.packed_len()];
        let mut pos = 0;
        for (&field, &value) in self.fields.iter().zip(values) {
            let slot = &mut buf[pos..pos + field.size()];
            self.write_field(slot, field, value);
            pos += field.size();
        }
        Ok(buf)
    }

    fn write_field(&self, slot: &mut [u8], field: FieldType, value: i64) {
        match (self.byte_order, field) {
            (ByteOrder::Little, FieldType::U8 | FieldType::I8) => slot[0] = value as u8,
            (ByteOrder::Little, FieldType::U16 | FieldType::I16) => LittleEndian::write_u16(slot, value as u16),
            (ByteOrder::Little, FieldType::U32 | FieldType::I32) => LittleEndian::write_u32(slot, value as u32),
            (ByteOrder::Big | ByteOrder::Network, FieldType::U8 | FieldType::I8) => slot[0] = value as u8,
            (ByteOrder::Big | ByteOrder::Network, FieldType::U16 | FieldType::I16) => BigEndian::write_u16(slot, value as u16),
            (ByteOrder::Big | ByteOrder::Network, FieldType::U32 | FieldType::I32) => BigEndian::write_u32(slot, value as u32),
            (ByteOrder::Native, FieldType::U8 | FieldType::I8) => slot[0] = value as u8,
            (ByteOrder::Native, FieldType::U16 | FieldType::I16) => NativeEndian::write_u16(slot, value as u16),
            (ByteOrder::Native, FieldType::U32 | FieldType::I32) => NativeEndian::write_u32(slot, value as u32),
        }
    }

    /// Unpack a byte buffer into one `i64` per field.
    pub fn unpack(&self, bytes: &[u8]) -> Result<Vec<i64>> {
        if bytes.len() != self.packed_len() {
            return Err(malformed(
                "record-format",
                format!("expected {} packed bytes, got {}", self.packed_len(), bytes.len()),
            ));
        }
        let mut values = Vec::with_capacity(self.fields.len());
        let mut pos = 0;
        for &field in &self.fields {
            let slot = &bytes[pos..pos + field.size()];
            values.push(self.read_field(slot, field));
            pos += field.size();
        }
        Ok(values)
    }

    fn read_field(&self, slot: &[u8], field: FieldType) -> i64 {
        match (self.byte_order, field) {
            (ByteOrder::Little, FieldType::U8) => slot[0] as i64,
            (ByteOrder::Little, FieldType::I8) => slot[0] as i8 as i64,
            (ByteOrder::Little, FieldType::U16) => LittleEndian::read_u16(slot) as i64,
            (ByteOrder::Little, FieldType::I16) => LittleEndian::read_i16(slot) as i64,
            (ByteOrder::Little, FieldType::U32) => LittleEndian::read_u32(slot) as i64,
            (ByteOrder::Little, FieldType::I32) => LittleEndian::read_i32(slot) as i64,
            (ByteOrder::Big | ByteOrder::Network, FieldType::U8) => slot[0] as i64,
            (ByteOrder::Big | ByteOrder::Network, FieldType::I8) => slot[0] as i8 as i64,
            (ByteOrder::Big | ByteOrder::Network, FieldType::U16) => BigEndian::read_u16(slot) as i64,
            (ByteOrder::Big | ByteOrder::Network, FieldType::I16) => BigEndian::read_i16(slot) as i64,
            (ByteOrder::Big | ByteOrder::Network, FieldType::U32) => BigEndian::read_u32(slot) as i64,
            (ByteOrder::Big | ByteOrder::Network, FieldType::I32) => BigEndian::read_i32(slot) as i64,
            (ByteOrder::Native, FieldType::U8) => slot[0] as i64,
            (ByteOrder::Native, FieldType::I8) => slot[0] as i8 as i64,
            (ByteOrder::Native, FieldType::U16) => NativeEndian::read_u16(slot) as i64,
            (ByteOrder::Native, FieldType::I16) => NativeEndian::read_i16(slot) as i64,
            (ByteOrder::Native, FieldType::U32) => NativeEndian::read_u32(slot) as i64,
            (ByteOrder::Native, FieldType::I32) => NativeEndian::read_i32(slot) as i64,
        }
    }
}

/// What lives past an automaton's keys, per spec.md §9's tagged-variant
/// design note.
#[derive(Debug, Clone)]
pub enum PayloadCodec {
    /// Membership only; no value to decode.
    None,
    /// Value lives in the Dictionary's own leaf cell.
    Integer,
    /// Value is an opaque byte string, base64-encoded after `key || SEP`.
    Bytes,
    /// Value is a fixed-layout record, base64-encoded after `key || SEP`.
    Record(RecordFormat),
}

impl PayloadCodec {
    /// Does this codec store its value as a suffix of the key (as opposed
    /// to the Dictionary's leaf cell)?
    pub fn is_suffix_encoded(&self) -> bool {
        matches!(self, PayloadCodec::Bytes | PayloadCodec::Record(_))
    }

    /// Split a raw stored key at the first `SEP` byte, returning the
    /// user-visible key. A no-op for codecs that don't use a separator.
    pub fn strip_key<'a>(&self, raw_key: &'a [u8]) -> &'a [u8] {
        if !self.is_suffix_encoded() {
            return raw_key;
        }
        match raw_key.iter().position(|&b| b == SEP) {
            Some(pos) => &raw_key[..pos],
            None => raw_key,
        }
    }

    /// Decode the base64 suffix following `SEP` in a raw stored key.
    pub fn decode_suffix(&self, raw_key: &[u8]) -> Result<Vec<u8>> {
        let pos = raw_key
            .iter()
            .position(|&b| b == SEP)
            .ok_or_else(|| malformed("payload", "stored key is missing the separator byte"))?;
        BASE64
            .decode(&raw_key[pos + 1..])
            .map_err(|e| malformed("payload", format!("invalid base64 payload suffix: {e}")))
    }

    /// Decode a record payload suffix into its field values.
    pub fn decode_record(&self, raw_key: &[u8]) -> Result<Vec<i64>> {
        let PayloadCodec::Record(fmt) = self else {
            return Err(Error::StructuralMismatch { index: 0 });
        };
        let bytes = self.decode_suffix(raw_key)?;
        fmt.unpack(&bytes)
    }
}

/// Build the composite stored key for a byte/record payload:
/// `key || SEP || base64(payload)`. Used by the test fixture builder —
/// this crate's reader never constructs an automaton, but exercising the
/// decode path requires encoding a suffix somewhere.
pub(crate) fn encode_suffix(key: &[u8], payload: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(key.len() + 1 + (payload.len() * 4 / 3 + 4));
    out.extend_from_slice(key);
    out.push(SEP);
    BASE64.encode_string(payload, &mut EncodeAdapter(&mut out));
    out
}

/// Lets `base64::Engine::encode_string` append directly onto a `Vec<u8>`
/// key buffer (it wants a `String`, we want raw bytes — base64 output is
/// ASCII, so the conversion is lossless).
struct EncodeAdapter<'a>(&'a mut Vec<u8>);

impl<'a> std::fmt::Write for EncodeAdapter<'a> {
    fn write_str(&mut self, s: &str) -> std::fmt::Result {
        self.0.extend_from_slice(s.as_bytes());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_format_roundtrip() {
        let fmt = RecordFormat::parse(">3H").unwrap();
        let packed = fmt.pack(&[3, 2, 256]).unwrap();
        assert_eq!(packed, vec![0, 3, 0, 2, 1, 0]);
        assert_eq!(fmt.unpack(&packed).unwrap(), vec![3, 2, 256]);
    }

    #[test]
    fn record_format_default_count_is_one() {
        let fmt = RecordFormat::parse("=H").unwrap();
        assert_eq!(fmt.fields, vec![FieldType::U16]);
    }

    #[test]
    fn record_format_rejects_missing_prefix() {
        assert!(RecordFormat::parse("3H").is_err());
    }

    #[test]
    fn strip_key_splits_on_separator() {
        let codec = PayloadCodec::Bytes;
        let stored = encode_suffix(b"foo", b"data1");
        assert_eq!(codec.strip_key(&stored), b"foo");
        assert_eq!(codec.decode_suffix(&stored).unwrap(), b"data1");
    }

    #[test]
    fn strip_key_is_noop_for_plain_codecs() {
        assert_eq!(PayloadCodec::None.strip_key(b"foo"), b"foo");
        assert_eq!(PayloadCodec::Integer.strip_key(b"foo"), b"foo");
    }
}
