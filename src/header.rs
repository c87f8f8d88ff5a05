// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! File container headers: Dictionary image, Guide image, and the record
//! wrapper that precedes both for record-valued automata.
//!
//! This is the single source of truth for where each image starts and how
//! big it is — every walker consults these offsets instead of re-deriving
//! them, the way `SectionOffsets` is the single source of truth for the
//! teacher's own binary format.

use crate::error::{malformed, Result};
use crate::source::ByteSource;

/// A Dictionary image's location within the file: the cell array starts
/// right after its own 4-byte `base_size` header.
#[derive(Debug, Clone, Copy)]
pub struct DictionaryImage {
    pub base_size: u32,
    pub cells_offset: u64,
}

impl DictionaryImage {
    /// Parse a Dictionary image header starting at `start`, validating
    /// that the declared cell array fits within the source.
    pub fn parse(source: &dyn ByteSource, start: u64) -> Result<Self> {
        let base_size = source
            .read_u32_le_at(start)
            .map_err(|e| malformed("dictionary", format!("failed to read base_size: {e}")))?;
        let cells_offset = start + 4;
        let end = cells_offset
            .checked_add(base_size as u64 * 4)
            .ok_or_else(|| malformed("dictionary", "base_size overflows file offset"))?;
        let len = source
            .len()
            .map_err(|e| malformed("dictionary", format!("failed to stat source: {e}")))?;
        if end > len {
            return Err(malformed(
                "dictionary",
                format!("cell array ({base_size} cells) extends past end of file"),
            ));
        }
        Ok(Self {
            base_size,
            cells_offset,
        })
    }

    /// Byte offset one past the end of this image.
    pub fn end_offset(&self) -> u64 {
        self.cells_offset + self.base_size as u64 * 4
    }
}

/// A Guide image's location within the file: two bytes (child label,
/// sibling label) per node, right after its own 4-byte `base_size`.
#[derive(Debug, Clone, Copy)]
pub struct GuideImage {
    pub base_size: u32,
    pub entries_offset: u64,
}

impl GuideImage {
    pub fn parse(source: &dyn ByteSource, start: u64) -> Result<Self> {
        let base_size = source
            .read_u32_le_at(start)
            .map_err(|e| malformed("guide", format!("failed to read base_size: {e}")))?;
        let entries_offset = start + 4;
        let end = entries_offset
            .checked_add(base_size as u64 * 2)
            .ok_or_else(|| malformed("guide", "base_size overflows file offset"))?;
        let len = source
            .len()
            .map_err(|e| malformed("guide", format!("failed to stat source: {e}")))?;
        if end > len {
            return Err(malformed(
                "guide",
                format!("entry array ({base_size} nodes) extends past end of file"),
            ));
        }
        Ok(Self {
            base_size,
            entries_offset,
        })
    }

    pub fn end_offset(&self) -> u64 {
        self.entries_offset + self.base_size as u64 * 2
    }

    pub fn is_empty(&self) -> bool {
        self.base_size == 0
    }
}

/// The leading wrapper prepended to record-valued automata:
/// `u16 LE format_len` followed by `format_len` ASCII bytes.
#[derive(Debug, Clone)]
pub struct RecordWrapper {
    pub format: String,
    pub end_offset: u64,
}

impl RecordWrapper {
    pub fn parse(source: &dyn ByteSource, start: u64) -> Result<Self> {
        let mut len_buf = [0u8; 2];
        source
            .read_exact_at(start, &mut len_buf)
            .map_err(|e| malformed("record-wrapper", format!("failed to read format_len: {e}")))?;
        let format_len = u16::from_le_bytes(len_buf) as u64;

        let str_start = start + 2;
        let str_end = str_start + format_len;
        let len = source
            .len()
            .map_err(|e| malformed("record-wrapper", format!("failed to stat source: {e}")))?;
        if str_end > len {
            return Err(malformed(
                "record-wrapper",
                "format string extends past end of file",
            ));
        }

        let mut buf = vec![0u8; format_len as usize];
        source
            .read_exact_at(str_start, &mut buf)
            .map_err(|e| malformed("record-wrapper", format!("failed to read format string: {e}")))?;
        let format = String::from_utf8(buf)
            .map_err(|_| malformed("record-wrapper", "format string is not valid ASCII/UTF-8"))?;

        Ok(Self {
            format,
            end_offset: str_end,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::MemorySource;

    fn le_u32(v: u32) -> [u8; 4] {
        v.to_le_bytes()
    }

    #[test]
    fn parses_dictionary_image() {
        let mut bytes = le_u32(2).to_vec();
        bytes.extend_from_slice(&[0u8; 8]);
        let src = MemorySource::new(bytes);
        let img = DictionaryImage::parse(&src, 0).unwrap();
        assert_eq!(img.base_size, 2);
        assert_eq!(img.cells_offset, 4);
        assert_eq!(img.end_offset(), 12);
    }

    #[test]
    fn rejects_truncated_dictionary_image() {
        let bytes = le_u32(5).to_vec(); // claims 5 cells, provides 0
        let src = MemorySource::new(bytes);
        assert!(DictionaryImage::parse(&src, 0).is_err());
    }

    #[test]
    fn parses_record_wrapper() {
        let format = ">3H";
        let mut bytes = (format.len() as u16).to_le_bytes().to_vec();
        bytes.extend_from_slice(format.as_bytes());
        let src = MemorySource::new(bytes);
        let wrapper = RecordWrapper::parse(&src, 0).unwrap();
        assert_eq!(wrapper.format, ">3H");
        assert_eq!(wrapper.end_offset, 2 + 3);
    }
}
