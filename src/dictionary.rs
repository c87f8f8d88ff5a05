// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The double-array Dictionary walker: root, follow-transition, has-leaf,
//! leaf-value extraction. Every operation performs a bounded number of
//! 4-byte reads, independent of the automaton's size, and never caches a
//! transition.

use std::rc::Rc;

use crate::error::{Error, Result};
use crate::header::DictionaryImage;
use crate::source::ByteSource;
use crate::units;

/// Root node index, for any Dictionary.
pub const ROOT: u32 = 0;

pub struct Dictionary {
    source: Rc<dyn ByteSource>,
    image: DictionaryImage,
}

impl Dictionary {
    pub fn new(source: Rc<dyn ByteSource>, image: DictionaryImage) -> Self {
        Self { source, image }
    }

    pub fn base_size(&self) -> u32 {
        self.image.base_size
    }

    pub fn root(&self) -> u32 {
        ROOT
    }

    fn cell_at(&self, index: u32) -> Result<u32> {
        if index >= self.image.base_size {
            return Err(Error::StructuralMismatch { index });
        }
        let offset = self.image.cells_offset + index as u64 * 4;
        Ok(self.source.read_u32_le_at(offset)?)
    }

    /// Follow one transition labeled `label` from `index`. Returns the
    /// next node index, or `None` on a miss.
    pub fn follow_char(&self, label: u8, index: u32) -> Result<Option<u32>> {
        let base = self.cell_at(index)?;
        let off = units::offset(base);
        let candidate = (index ^ off ^ label as u32) & units::PRECISION_MASK;
        let candidate_cell = match self.cell_at(candidate) {
            Ok(c) => c,
            Err(Error::StructuralMismatch { .. }) => return Ok(None),
            Err(e) => return Err(e),
        };
        if units::label(candidate_cell) == label {
            Ok(Some(candidate))
        } else {
            Ok(None)
        }
    }

    /// Follow a full byte string from `index`. Returns the terminal node
    /// index, or `None` if any step misses.
    pub fn follow_bytes(&self, bytes: &[u8], index: u32) -> Result<Option<u32>> {
        let mut cur = index;
        for &b in bytes {
            match self.follow_char(b, cur)? {
                Some(next) => cur = next,
                None => return Ok(None),
            }
        }
        Ok(Some(cur))
    }

    pub fn has_value(&self, index: u32) -> Result<bool> {
        Ok(units::has_leaf(self.cell_at(index)?))
    }

    /// The leaf value associated with `index`. Caller must have already
    /// confirmed `has_value(index)`.
    pub fn value(&self, index: u32) -> Result<u32> {
        let base = self.cell_at(index)?;
        let leaf_index = (index ^ units::offset(base)) & units::PRECISION_MASK;
        Ok(units::value(self.cell_at(leaf_index)?))
    }

    /// Exact membership: does `key` name a terminal node?
    pub fn contains(&self, key: &[u8]) -> Result<bool> {
        match self.follow_bytes(key, self.root())? {
            Some(index) => self.has_value(index),
            None => Ok(false),
        }
    }

    /// Exact lookup of the leaf value for `key`, if any.
    pub fn find(&self, key: &[u8]) -> Result<Option<u32>> {
        match self.follow_bytes(key, self.root())? {
            Some(index) if self.has_value(index)? => Ok(Some(self.value(index)?)),
            _ => Ok(None),
        }
    }
}
