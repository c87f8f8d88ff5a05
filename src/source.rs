// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Keyed random-access reads over the underlying bytes.
//!
//! The Python original reseeks a shared file handle before every read
//! (`FilePointer` in `wrapper.py`), which works but ties every walker to a
//! mutable cursor. We prefer keyed reads (`read_u32_le_at(offset)`) over
//! stateful seeks: there's no implicit shared-position hazard, and every
//! query is trivially safe to interleave with others on the same handle.

use std::cell::RefCell;
use std::fs::File;
use std::io::{self, Read, Seek, SeekFrom};
use std::sync::Arc;

/// A byte-addressable source the Dictionary and Guide walkers read from.
///
/// Implementors must not cache reads — callers already avoid re-reading
/// the same cell where possible, and an in-memory mirror would defeat the
/// "no data structure grows with the size of the automaton" guarantee.
pub trait ByteSource {
    fn read_u8_at(&self, offset: u64) -> io::Result<u8>;
    fn read_u32_le_at(&self, offset: u64) -> io::Result<u32>;
    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()>;
    /// Total size of the underlying byte range, used for bounds-checking
    /// declared section lengths against the real file size at open time.
    fn len(&self) -> io::Result<u64>;
}

/// A source backed by bytes already resident in memory.
///
/// Useful for callers who've `mmap`'d the file themselves, for embedded
/// automata, and for tests.
#[derive(Clone)]
pub struct MemorySource {
    bytes: Arc<[u8]>,
}

impl MemorySource {
    pub fn new(bytes: impl Into<Arc<[u8]>>) -> Self {
        Self { bytes: bytes.into() }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl ByteSource for MemorySource {
    fn read_u8_at(&self, offset: u64) -> io::Result<u8> {
        let i = offset as usize;
        self.bytes
            .get(i)
            .copied()
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "read past end of buffer"))
    }

    fn read_u32_le_at(&self, offset: u64) -> io::Result<u32> {
        let i = offset as usize;
        let bytes = self
            .bytes
            .get(i..i + 4)
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "read past end of buffer"))?;
        Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
    }

    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        let i = offset as usize;
        let src = self
            .bytes
            .get(i..i + buf.len())
            .ok_or_else(|| io::Error::new(io::ErrorKind::UnexpectedEof, "read past end of buffer"))?;
        buf.copy_from_slice(src);
        Ok(())
    }

    fn len(&self) -> io::Result<u64> {
        Ok(self.bytes.len() as u64)
    }
}

/// A source backed by an open file handle, read on demand.
///
/// `RefCell`, not a `Mutex`: the reader is single-threaded and synchronous
/// by contract (no suspension points, no concurrent writers), so there is
/// no need for cross-thread synchronization, only single-owner interior
/// mutability of the seek position.
pub struct FileSource {
    file: RefCell<File>,
}

impl FileSource {
    pub fn new(file: File) -> Self {
        Self {
            file: RefCell::new(file),
        }
    }
}

impl ByteSource for FileSource {
    fn read_u8_at(&self, offset: u64) -> io::Result<u8> {
        let mut buf = [0u8; 1];
        self.read_exact_at(offset, &mut buf)?;
        Ok(buf[0])
    }

    fn read_u32_le_at(&self, offset: u64) -> io::Result<u32> {
        let mut buf = [0u8; 4];
        self.read_exact_at(offset, &mut buf)?;
        Ok(u32::from_le_bytes(buf))
    }

    fn read_exact_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<()> {
        let mut file = self.file.borrow_mut();
        file.seek(SeekFrom::Start(offset))?;
        file.read_exact(buf)
    }

    fn len(&self) -> io::Result<u64> {
        Ok(self.file.borrow().metadata()?.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_source_reads_u32_le() {
        let src = MemorySource::new(vec![0x01, 0x02, 0x03, 0x04, 0xFF]);
        assert_eq!(src.read_u32_le_at(0).unwrap(), 0x0403_0201);
        assert_eq!(src.read_u8_at(4).unwrap(), 0xFF);
    }

    #[test]
    fn memory_source_errors_past_end() {
        let src = MemorySource::new(vec![0u8; 3]);
        assert!(src.read_u32_le_at(0).is_err());
        assert!(src.read_u8_at(3).is_err());
    }

    #[test]
    fn file_source_reads_match_memory_source() {
        let bytes: Vec<u8> = (0..16u8).collect();
        let mut tmp = tempfile::NamedTempFile::new().unwrap();
        use std::io::Write;
        tmp.write_all(&bytes).unwrap();
        let file = File::open(tmp.path()).unwrap();
        let fs_src = FileSource::new(file);
        let mem_src = MemorySource::new(bytes);

        for off in 0..12u64 {
            assert_eq!(
                fs_src.read_u32_le_at(off).unwrap(),
                mem_src.read_u32_le_at(off).unwrap()
            );
        }
    }
}
