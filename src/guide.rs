// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The Guide walker: first-child and next-sibling transition labels,
//! enabling lexicographic enumeration without touching the Dictionary's
//! leaf-value machinery.

use std::rc::Rc;

use crate::header::GuideImage;
use crate::source::ByteSource;

pub struct Guide {
    source: Rc<dyn ByteSource>,
    image: GuideImage,
}

impl Guide {
    pub fn new(source: Rc<dyn ByteSource>, image: GuideImage) -> Self {
        Self { source, image }
    }

    pub fn is_empty(&self) -> bool {
        self.image.is_empty()
    }

    /// First child's transition label from `index`, or 0 if it has none.
    /// Returns 0 (no out-of-bounds read) for indices beyond the guide's
    /// own `base_size`, per spec.md §4.3.
    pub fn child(&self, index: u32) -> u8 {
        self.read_byte(self.image.entries_offset + index as u64 * 2, index)
    }

    /// Next sibling's transition label after `index`, or 0 if none.
    pub fn sibling(&self, index: u32) -> u8 {
        self.read_byte(self.image.entries_offset + index as u64 * 2 + 1, index)
    }

    fn read_byte(&self, offset: u64, index: u32) -> u8 {
        if index >= self.image.base_size {
            return 0;
        }
        self.source.read_u8_at(offset).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::make_dict_and_guide;

    #[test]
    fn child_and_sibling_labels() {
        let (dict, guide) = make_dict_and_guide(&["f", "bar", "foo", "foobar"]);
        let root = dict.root();
        // root has children 'b' and 'f'
        assert_eq!(guide.child(root), b'b');

        let after_b = dict.follow_char(b'b', root).unwrap().unwrap();
        assert_eq!(guide.sibling(after_b), b'f');
    }

    #[test]
    fn out_of_bounds_index_is_zero() {
        let (_dict, guide) = make_dict_and_guide(&["a"]);
        assert_eq!(guide.child(1_000_000), 0);
        assert_eq!(guide.sibling(1_000_000), 0);
    }
}
