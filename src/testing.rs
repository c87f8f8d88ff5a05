// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Test utilities shared across unit and integration tests.
//!
//! This module is always compiled but hidden from documentation. It is the
//! canonical way to build a double-array Dictionary/Guide image in a test
//! without a production build-side dependency (the reader never builds an
//! automaton — see spec.md's explicit non-goal), by constructing the
//! minimal double array directly from the bit layout the reader consumes.

#![doc(hidden)]

use std::collections::HashMap;
use std::rc::Rc;

use crate::dictionary::Dictionary;
use crate::guide::Guide;
use crate::header::{DictionaryImage, GuideImage};
use crate::source::MemorySource;
use crate::units::PRECISION_MASK;

/// A built double-array image: packed cells plus the paired guide arrays.
pub struct TrieImage {
    pub cells: Vec<u32>,
    pub guide_child: Vec<u8>,
    pub guide_sibling: Vec<u8>,
}

fn pack_cell(label: u8, has_leaf: bool, raw_offset: u32) -> u32 {
    assert!(raw_offset < (1 << 22), "test offsets must fit without indirection");
    (raw_offset << 10) | ((has_leaf as u32) << 8) | label as u32
}

struct Node {
    terminal: bool,
    leaf_value: u32,
    children: std::collections::BTreeMap<u8, Box<Node>>,
}

impl Node {
    fn new() -> Self {
        Self {
            terminal: false,
            leaf_value: 0,
            children: Default::default(),
        }
    }
}

fn insert(root: &mut Node, key: &[u8], value: u32) {
    let mut cur = root;
    for &b in key {
        assert_ne!(b, 0, "test keys must not contain a NUL byte (reserved for leaf slot)");
        cur = cur.children.entry(b).or_insert_with(|| Box::new(Node::new()));
    }
    cur.terminal = true;
    cur.leaf_value = value;
}

/// Build a double-array image (cells + guide) from `(key, value)` pairs.
/// `value` is only observable through `Dictionary::value` for integer-style
/// automata; other codecs ignore it.
pub fn build_trie(entries: &[(Vec<u8>, u32)]) -> TrieImage {
    let mut root = Node::new();
    for (key, value) in entries {
        insert(&mut root, key, *value);
    }

    let mut cells: Vec<u32> = vec![0];
    let mut used: std::collections::HashSet<u32> = std::collections::HashSet::new();
    used.insert(0);
    let mut children_of: HashMap<u32, Vec<(u8, u32)>> = HashMap::new();

    let ensure_len = |cells: &mut Vec<u32>, index: u32| {
        let needed = index as usize + 1;
        if cells.len() < needed {
            cells.resize(needed, 0);
        }
    };

    // BFS queue of (node_index, path-from-root) — the trie itself stays
    // owned by `root`; we re-walk the path to find each node's data.
    let mut queue: std::collections::VecDeque<(u32, Vec<u8>)> = std::collections::VecDeque::new();
    queue.push_back((0, Vec::new()));

    let root_terminal = root.terminal;
    let root_leaf_value = root.leaf_value;

    while let Some((node_index, path)) = queue.pop_front() {
        let node = {
            let mut cur = &root;
            for b in &path {
                cur = cur.children.get(b).expect("path must resolve");
            }
            cur
        };

        let mut labels: Vec<u8> = node.children.keys().copied().collect();
        labels.sort_unstable();

        if labels.is_empty() && !node.terminal {
            continue;
        }

        // Search for an offset placing every child (and the pseudo leaf
        // slot, label 0, if this node is terminal) in a currently-free cell.
        let mut offset = 1u32;
        let targets: Vec<(u8, u32)> = loop {
            let mut candidate_targets = Vec::new();
            let mut ok = true;
            if node.terminal {
                let t = (node_index ^ offset ^ 0) & PRECISION_MASK;
                if used.contains(&t) {
                    ok = false;
                } else {
                    candidate_targets.push((0u8, t));
                }
            }
            if ok {
                for &l in &labels {
                    let t = (node_index ^ offset ^ l as u32) & PRECISION_MASK;
                    if used.contains(&t) || candidate_targets.iter().any(|&(_, x)| x == t) {
                        ok = false;
                        break;
                    }
                    candidate_targets.push((l, t));
                }
            }
            if ok {
                break candidate_targets;
            }
            offset += 1;
        };

        // Patch this node's own cell with the chosen offset (label/has_leaf
        // were already written by the parent, except for the root).
        ensure_len(&mut cells, node_index);
        let existing = cells[node_index as usize];
        let label = (existing & 0xFF) as u8;
        let has_leaf = if node_index == 0 {
            root_terminal
        } else {
            (existing >> 8) & 1 == 1
        };
        cells[node_index as usize] = pack_cell(label, has_leaf, offset);

        for (l, target) in targets {
            used.insert(target);
            ensure_len(&mut cells, target);
            if l == 0 {
                let v = if node_index == 0 {
                    root_leaf_value
                } else {
                    node.leaf_value
                };
                cells[target as usize] = v;
            } else {
                let mut child_path = path.clone();
                child_path.push(l);
                let child = node.children.get(&l).unwrap();
                cells[target as usize] = pack_cell(l, child.terminal, 0);
                children_of.entry(node_index).or_default().push((l, target));
                queue.push_back((target, child_path));
            }
        }
    }

    let base_size = cells.len() as u32;
    let mut guide_child = vec![0u8; base_size as usize];
    let mut guide_sibling = vec![0u8; base_size as usize];

    for (node_index, mut kids) in children_of {
        kids.sort_by_key(|&(l, _)| l);
        if let Some(&(first_label, _)) = kids.first() {
            guide_child[node_index as usize] = first_label;
        }
        for window in kids.windows(2) {
            let (_, idx_a) = window[0];
            let (label_b, _) = window[1];
            guide_sibling[idx_a as usize] = label_b;
        }
    }

    TrieImage {
        cells,
        guide_child,
        guide_sibling,
    }
}

/// Build the composite stored key for a byte/record payload, the way a
/// byte/record automaton's builder would: `key || SEP || base64(payload)`.
pub fn encode_suffix(key: &[u8], payload: &[u8]) -> Vec<u8> {
    crate::payload::encode_suffix(key, payload)
}

pub fn dictionary_image_bytes(img: &TrieImage) -> Vec<u8> {
    let mut buf = Vec::with_capacity(4 + img.cells.len() * 4);
    buf.extend_from_slice(&(img.cells.len() as u32).to_le_bytes());
    for &cell in &img.cells {
        buf.extend_from_slice(&cell.to_le_bytes());
    }
    buf
}

pub fn guide_image_bytes(img: &TrieImage) -> Vec<u8> {
    let n = img.guide_child.len();
    let mut buf = Vec::with_capacity(4 + n * 2);
    buf.extend_from_slice(&(n as u32).to_le_bytes());
    for i in 0..n {
        buf.push(img.guide_child[i]);
        buf.push(img.guide_sibling[i]);
    }
    buf
}

/// Serialize a full container: optional record-format wrapper, dictionary
/// image, and (if `with_guide`) guide image — matching spec.md §3/§6.
pub fn container_bytes(img: &TrieImage, with_guide: bool, record_format: Option<&str>) -> Vec<u8> {
    let mut buf = Vec::new();
    if let Some(fmt) = record_format {
        buf.extend_from_slice(&(fmt.len() as u16).to_le_bytes());
        buf.extend_from_slice(fmt.as_bytes());
    }
    buf.extend_from_slice(&dictionary_image_bytes(img));
    if with_guide {
        buf.extend_from_slice(&guide_image_bytes(img));
    }
    buf
}

fn str_entries(keys: &[&str]) -> Vec<(Vec<u8>, u32)> {
    keys.iter().map(|k| (k.as_bytes().to_vec(), 0)).collect()
}

pub fn make_dictionary(keys: &[&str]) -> Dictionary {
    let img = build_trie(&str_entries(keys));
    let bytes = dictionary_image_bytes(&img);
    let source: Rc<dyn crate::source::ByteSource> = Rc::new(MemorySource::new(bytes));
    let image = DictionaryImage::parse(source.as_ref(), 0).unwrap();
    Dictionary::new(source, image)
}

pub fn make_dictionary_with_values(pairs: &[(&str, u32)]) -> Dictionary {
    let entries: Vec<(Vec<u8>, u32)> = pairs.iter().map(|(k, v)| (k.as_bytes().to_vec(), *v)).collect();
    let img = build_trie(&entries);
    let bytes = dictionary_image_bytes(&img);
    let source: Rc<dyn crate::source::ByteSource> = Rc::new(MemorySource::new(bytes));
    let image = DictionaryImage::parse(source.as_ref(), 0).unwrap();
    Dictionary::new(source, image)
}

pub fn make_dict_and_guide(keys: &[&str]) -> (Dictionary, Guide) {
    let img = build_trie(&str_entries(keys));
    build_dict_and_guide_from_image(&img)
}

pub fn make_dict_and_guide_with_entries(entries: &[(Vec<u8>, u32)]) -> (Dictionary, Guide) {
    let img = build_trie(entries);
    build_dict_and_guide_from_image(&img)
}

fn build_dict_and_guide_from_image(img: &TrieImage) -> (Dictionary, Guide) {
    let dict_bytes = dictionary_image_bytes(img);
    let dict_end = dict_bytes.len() as u64;
    let mut all = dict_bytes;
    all.extend_from_slice(&guide_image_bytes(img));
    let source: Rc<dyn crate::source::ByteSource> = Rc::new(MemorySource::new(all));
    let dict_image = DictionaryImage::parse(source.as_ref(), 0).unwrap();
    let guide_image = GuideImage::parse(source.as_ref(), dict_end).unwrap();
    (
        Dictionary::new(source.clone(), dict_image),
        Guide::new(source, guide_image),
    )
}
