// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The Completer: a stateful cursor that enumerates keys in lexicographic
//! order under a subtree, by walking the Dictionary and consulting the
//! Guide for ordering. Expressed as an `Iterator` — the idiomatic Rust
//! shape for "repeatedly call next, read off a result" — rather than the
//! source's `next() -> bool` plus a side-channel `key` field; the sequence
//! of yielded keys is unchanged (see DESIGN.md).

use crate::dictionary::Dictionary;
use crate::error::{Error, Result};
use crate::guide::Guide;

pub struct Completer<'a> {
    dict: &'a Dictionary,
    guide: &'a Guide,
    key: Vec<u8>,
    index_stack: Vec<u32>,
    started: bool,
    last_index: Option<u32>,
}

impl<'a> Completer<'a> {
    /// Start enumeration at `start_index`, with `prefix` as the key built
    /// so far. Yields nothing if the Guide is empty (no completion data).
    pub fn start(dict: &'a Dictionary, guide: &'a Guide, start_index: u32, prefix: &[u8]) -> Self {
        let index_stack = if guide.is_empty() { Vec::new() } else { vec![start_index] };
        Self {
            dict,
            guide,
            key: prefix.to_vec(),
            index_stack,
            started: false,
            last_index: None,
        }
    }

    /// Dictionary node the most recently yielded key terminated at.
    pub fn last_index(&self) -> Option<u32> {
        self.last_index
    }

    fn follow_and_push(&mut self, label: u8, index: u32) -> Result<bool> {
        match self.dict.follow_char(label, index)? {
            Some(next) => {
                self.index_stack.push(next);
                self.key.push(label);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Advance past the current node to the next one to consider, per
    /// spec.md §4.4 step 2. Returns `Ok(false)` only when enumeration is
    /// over; a structural miss is reported as `Err`.
    fn advance(&mut self) -> Result<bool> {
        let i = *self.index_stack.last().expect("advance called with empty stack");
        let child_label = self.guide.child(i);
        if child_label != 0 {
            if !self.follow_and_push(child_label, i)? {
                return Err(Error::StructuralMismatch { index: i });
            }
            return Ok(true);
        }

        loop {
            let cur = *self.index_stack.last().unwrap();
            let sibling_label = self.guide.sibling(cur);
            if !self.key.is_empty() {
                self.key.pop();
            }
            self.index_stack.pop();
            let Some(&parent) = self.index_stack.last() else {
                return Ok(false);
            };
            if sibling_label != 0 {
                if !self.follow_and_push(sibling_label, parent)? {
                    return Err(Error::StructuralMismatch { index: parent });
                }
                return Ok(true);
            }
        }
    }

    /// Descend the leftmost path from the current node until a terminal
    /// (has-value) node is reached, per spec.md §4.4 step 3.
    fn descend_to_terminal(&mut self) -> Result<()> {
        loop {
            let i = *self.index_stack.last().expect("descend called with empty stack");
            if self.dict.has_value(i)? {
                self.last_index = Some(i);
                return Ok(());
            }
            let label = self.guide.child(i);
            if !self.follow_and_push(label, i)? {
                return Err(Error::StructuralMismatch { index: i });
            }
        }
    }
}

impl<'a> Iterator for Completer<'a> {
    type Item = Result<Vec<u8>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.index_stack.is_empty() {
            return None;
        }

        if self.started {
            match self.advance() {
                Ok(true) => {}
                Ok(false) => return None,
                Err(e) => return Some(Err(e)),
            }
        }
        self.started = true;

        match self.descend_to_terminal() {
            Ok(()) => Some(Ok(self.key.clone())),
            Err(e) => Some(Err(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::make_dict_and_guide;

    #[test]
    fn enumerates_in_lexicographic_order() {
        let (dict, guide) = make_dict_and_guide(&["f", "bar", "foo", "foobar"]);
        let keys: Vec<Vec<u8>> = Completer::start(&dict, &guide, dict.root(), b"")
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(
            keys,
            vec![b"bar".to_vec(), b"f".to_vec(), b"foo".to_vec(), b"foobar".to_vec()]
        );
    }

    #[test]
    fn enumerates_under_a_prefix() {
        let (dict, guide) = make_dict_and_guide(&["f", "bar", "foo", "foobar"]);
        let node = dict.follow_bytes(b"foo", dict.root()).unwrap().unwrap();
        let keys: Vec<Vec<u8>> = Completer::start(&dict, &guide, node, b"foo")
            .collect::<Result<Vec<_>>>()
            .unwrap();
        assert_eq!(keys, vec![b"foo".to_vec(), b"foobar".to_vec()]);
    }

    #[test]
    fn empty_automaton_yields_nothing() {
        let (dict, guide) = make_dict_and_guide(&[]);
        let keys: Vec<_> = Completer::start(&dict, &guide, dict.root(), b"").collect();
        assert!(keys.is_empty());
    }
}
