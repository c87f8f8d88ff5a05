// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The fuzzy walker: replacement-table compilation and the backtracking
//! search that enumerates all keys matching an input string under that
//! table (spec.md §4.6).
//!
//! The search is expressed with an explicit work stack rather than
//! recursion — depth equals query length plus replacement expansions,
//! and an explicit stack bounds that the same way the Completer's own
//! `index_stack` does, without relying on the host's call-stack depth.

use std::collections::{HashMap, HashSet};

use crate::dictionary::Dictionary;
use crate::error::{Error, Result};

/// A compiled replacement table: `from` byte sequences grouped by their
/// first byte, longest-`from`-first within each group.
pub struct ReplaceTable {
    groups: HashMap<u8, Vec<(Vec<u8>, Vec<u8>)>>,
}

impl ReplaceTable {
    /// Compile `{from -> to}` pairs, rejecting any table whose value set
    /// overlaps its key set (spec.md §3 invariant (a); this is S6).
    pub fn compile(pairs: &[(Vec<u8>, Vec<u8>)]) -> Result<Self> {
        let froms: HashSet<&Vec<u8>> = pairs.iter().map(|(f, _)| f).collect();
        for (from, to) in pairs {
            if froms.contains(to) {
                return Err(Error::InvalidReplaceTable {
                    from: from.clone(),
                    to: to.clone(),
                });
            }
        }

        let mut groups: HashMap<u8, Vec<(Vec<u8>, Vec<u8>)>> = HashMap::new();
        for (from, to) in pairs {
            let Some(&first) = from.first() else { continue };
            groups.entry(first).or_default().push((from.clone(), to.clone()));
        }
        for group in groups.values_mut() {
            group.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
        }
        Ok(Self { groups })
    }

    /// Compile from a `{str -> str}` mapping, the shape a caller actually
    /// has on hand (table entries are UTF-8 encodings of characters).
    pub fn compile_str(pairs: &[(&str, &str)]) -> Result<Self> {
        let owned: Vec<(Vec<u8>, Vec<u8>)> = pairs
            .iter()
            .map(|(f, t)| (f.as_bytes().to_vec(), t.as_bytes().to_vec()))
            .collect();
        Self::compile(&owned)
    }
}

struct Frame {
    index: u32,
    qpos: usize,
    out_prefix: Vec<u8>,
}

/// Backtracking search over `dict` following `query` under `table`,
/// substituting table entries or the literal byte at each position.
/// `terminal` decides, for a fully-consumed query at a given node, whether
/// a match occurred and which Dictionary index holds (or roots) its
/// value(s); callers supply a codec-appropriate check (`has_value` for
/// plain/integer automata, `follow_char(SEP, _)` for byte/record ones).
///
/// Returns `(matched_key, value_index)` pairs, deduplicated by key with
/// first-seen order preserved, in depth-first, literal-first-then-table
/// order (see DESIGN.md for why this is the literal order rather than
/// the table-first order the prose describes).
pub fn backtrack(
    dict: &Dictionary,
    table: &ReplaceTable,
    query: &[u8],
    terminal: impl Fn(&Dictionary, u32) -> Result<Option<u32>>,
) -> Result<Vec<(Vec<u8>, u32)>> {
    let mut stack = vec![Frame {
        index: dict.root(),
        qpos: 0,
        out_prefix: Vec::new(),
    }];
    let mut seen = HashSet::new();
    let mut results = Vec::new();

    while let Some(frame) = stack.pop() {
        if frame.qpos == query.len() {
            if let Some(value_index) = terminal(dict, frame.index)? {
                if seen.insert(frame.out_prefix.clone()) {
                    results.push((frame.out_prefix, value_index));
                }
            }
            continue;
        }

        // Visit order is literal-first, then table alternatives
        // longest-`from`-first. This is the order that reproduces the
        // worked replacement-table example: a table substitution earlier
        // in the query that leads nowhere must not suppress the literal
        // continuation, and where both the literal and a substituted key
        // exist, the literal form is reported first.
        let mut children: Vec<Frame> = Vec::new();

        let literal = query[frame.qpos];
        if let Some(next) = dict.follow_char(literal, frame.index)? {
            let mut out_prefix = frame.out_prefix.clone();
            out_prefix.push(literal);
            children.push(Frame {
                index: next,
                qpos: frame.qpos + 1,
                out_prefix,
            });
        }

        if let Some(group) = table.groups.get(&query[frame.qpos]) {
            for (from, to) in group {
                if query[frame.qpos..].starts_with(from.as_slice()) {
                    if let Some(next) = dict.follow_bytes(to, frame.index)? {
                        let mut out_prefix = frame.out_prefix.clone();
                        out_prefix.extend_from_slice(to);
                        children.push(Frame {
                            index: next,
                            qpos: frame.qpos + from.len(),
                            out_prefix,
                        });
                    }
                }
            }
        }

        // Push in reverse so the stack pops children in visit order.
        for child in children.into_iter().rev() {
            stack.push(child);
        }
    }

    Ok(results)
}
