// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The top-level reader: combines a Dictionary, an optional Guide, and a
//! payload codec behind one tagged struct, the way spec.md §9's design
//! note collapses the source's per-automaton-class inheritance
//! (`DAWG`/`CompletionDAWG`/`BytesDAWG`/`RecordDAWG`/`IntDAWG`/
//! `IntCompletionDAWG`) into a single reader parameterized by `Kind`.

use std::fs::File;
use std::path::Path;
use std::rc::Rc;
use std::sync::Arc;

use crate::completer::Completer;
use crate::dictionary::Dictionary;
use crate::error::{malformed, Error, Result};
use crate::fuzzy::{backtrack, ReplaceTable};
use crate::guide::Guide;
use crate::header::{DictionaryImage, GuideImage, RecordWrapper};
use crate::payload::{PayloadCodec, RecordFormat, SEP};
use crate::source::{ByteSource, FileSource, MemorySource};

/// Which of the source's automaton classes a reader was opened as.
#[derive(Debug, Clone)]
pub enum Kind {
    /// `DAWG`: membership only, no completion, no payload.
    Plain,
    /// `CompletionDAWG`: membership plus lexicographic key enumeration.
    Completion,
    /// `IntDAWG`: membership plus a single integer value per key.
    Int,
    /// `IntCompletionDAWG`: `Int` plus key enumeration.
    IntCompletion,
    /// `BytesDAWG`: one or more opaque byte-string values per key.
    Bytes,
    /// `RecordDAWG`: one or more fixed-layout records per key.
    Record(RecordFormat),
}

impl Kind {
    fn has_guide(&self) -> bool {
        matches!(self, Kind::Completion | Kind::IntCompletion | Kind::Bytes | Kind::Record(_))
    }

    fn codec(&self) -> PayloadCodec {
        match self {
            Kind::Plain | Kind::Completion => PayloadCodec::None,
            Kind::Int | Kind::IntCompletion => PayloadCodec::Integer,
            Kind::Bytes => PayloadCodec::Bytes,
            Kind::Record(fmt) => PayloadCodec::Record(fmt.clone()),
        }
    }

    fn has_record_wrapper(&self) -> bool {
        matches!(self, Kind::Record(_))
    }
}

/// A decoded leaf value, tagged by which codec produced it — the runtime
/// counterpart of `Kind`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    None,
    Int(i64),
    Bytes(Vec<u8>),
    Record(Vec<i64>),
}

struct Inner {
    dict: Dictionary,
    guide: Option<Guide>,
    codec: PayloadCodec,
}

/// An open automaton reader. `close()` (or `Drop`) releases the
/// underlying handle; queries after that return `Error::NotLoaded`.
pub struct Dawg {
    inner: Option<Inner>,
}

impl Dawg {
    pub fn open(path: impl AsRef<Path>, kind: Kind) -> Result<Self> {
        let file = File::open(path)?;
        let source: Rc<dyn ByteSource> = Rc::new(FileSource::new(file));
        Self::from_source(source, kind)
    }

    pub fn open_bytes(bytes: impl Into<Arc<[u8]>>, kind: Kind) -> Result<Self> {
        let source: Rc<dyn ByteSource> = Rc::new(MemorySource::new(bytes));
        Self::from_source(source, kind)
    }

    fn from_source(source: Rc<dyn ByteSource>, kind: Kind) -> Result<Self> {
        let mut cursor = 0u64;
        if kind.has_record_wrapper() {
            let wrapper = RecordWrapper::parse(source.as_ref(), cursor)?;
            if let Kind::Record(fmt) = &kind {
                let declared = RecordFormat::parse(&wrapper.format)?;
                if declared != *fmt {
                    return Err(malformed(
                        "record-wrapper",
                        format!("file declares format {:?}, reader was opened with {fmt:?}", wrapper.format),
                    ));
                }
            }
            cursor = wrapper.end_offset;
        }

        let dict_image = DictionaryImage::parse(source.as_ref(), cursor)?;
        cursor = dict_image.end_offset();
        let dict = Dictionary::new(source.clone(), dict_image);

        let guide = if kind.has_guide() {
            let guide_image = GuideImage::parse(source.as_ref(), cursor)?;
            Some(Guide::new(source.clone(), guide_image))
        } else {
            None
        };

        Ok(Self {
            inner: Some(Inner {
                dict,
                guide,
                codec: kind.codec(),
            }),
        })
    }

    /// Release the underlying handle. Idempotent; further queries on a
    /// closed reader return `Error::NotLoaded`.
    pub fn close(&mut self) {
        self.inner = None;
    }

    pub fn is_loaded(&self) -> bool {
        self.inner.is_some()
    }

    fn inner(&self) -> Result<&Inner> {
        self.inner.as_ref().ok_or(Error::NotLoaded)
    }

    fn guide(&self, inner: &Inner) -> Result<&Guide> {
        inner.guide.as_ref().ok_or(Error::NotLoaded)
    }

    /// Exact membership.
    pub fn contains(&self, key: &[u8]) -> Result<bool> {
        let inner = self.inner()?;
        if inner.codec.is_suffix_encoded() {
            let mut probe = key.to_vec();
            probe.push(SEP);
            Ok(inner.dict.follow_bytes(&probe, inner.dict.root())?.is_some())
        } else {
            inner.dict.contains(key)
        }
    }

    /// Integer lookup; `-1` is the boundary sentinel for absence
    /// (spec.md §8 S4), matching the source's `IntDAWG.get(key, -1)`.
    pub fn find(&self, key: &[u8]) -> Result<i64> {
        let inner = self.inner()?;
        Ok(inner.dict.find(key)?.map(i64::from).unwrap_or(-1))
    }

    /// Integer lookup with a caller-supplied default (spec.md §8 S4:
    /// `get("missing", 42) == 42`).
    pub fn get_or(&self, key: &[u8], default: i64) -> Result<i64> {
        let inner = self.inner()?;
        Ok(inner.dict.find(key)?.map(i64::from).unwrap_or(default))
    }

    /// All values stored for `key` in a byte/record automaton; empty if
    /// the key is absent. Plain/Int automata have at most one leaf per
    /// key and never reach here with more than zero or one entries.
    pub fn get(&self, key: &[u8]) -> Result<Vec<Payload>> {
        let inner = self.inner()?;
        let mut probe = key.to_vec();
        probe.push(SEP);
        let Some(subtree_root) = inner.dict.follow_bytes(&probe, inner.dict.root())? else {
            return Ok(Vec::new());
        };
        let guide = self.guide(inner)?;
        let mut out = Vec::new();
        for raw_key in Completer::start(&inner.dict, guide, subtree_root, &probe) {
            out.push(self.decode_payload(inner, &raw_key?)?);
        }
        Ok(out)
    }

    /// Source-set keys that are byte-prefixes of `query`, shortest first.
    pub fn prefixes(&self, query: &[u8]) -> Result<Vec<Vec<u8>>> {
        let inner = self.inner()?;
        let mut out = Vec::new();
        let mut index = inner.dict.root();
        for (i, &b) in query.iter().enumerate() {
            if inner.dict.has_value(index)? {
                out.push(query[..i].to_vec());
            }
            match inner.dict.follow_char(b, index)? {
                Some(next) => index = next,
                None => return Ok(out),
            }
        }
        if inner.dict.has_value(index)? {
            out.push(query.to_vec());
        }
        Ok(out)
    }

    /// Keys beginning with `prefix`, lexicographically ordered. For
    /// byte/record automata, yields each stored key stripped at `SEP`.
    pub fn keys(&self, prefix: &[u8]) -> Result<Vec<Vec<u8>>> {
        let inner = self.inner()?;
        let guide = self.guide(inner)?;
        let Some(start) = inner.dict.follow_bytes(prefix, inner.dict.root())? else {
            return Ok(Vec::new());
        };
        let mut out = Vec::new();
        for raw_key in Completer::start(&inner.dict, guide, start, prefix) {
            out.push(inner.codec.strip_key(&raw_key?).to_vec());
        }
        Ok(out)
    }

    /// `(key, value)` pairs beginning with `prefix`, lexicographically
    /// ordered by the raw stored key.
    pub fn items(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, Payload)>> {
        let inner = self.inner()?;
        let guide = self.guide(inner)?;
        let Some(start) = inner.dict.follow_bytes(prefix, inner.dict.root())? else {
            return Ok(Vec::new());
        };
        let mut out = Vec::new();
        let mut completer = Completer::start(&inner.dict, guide, start, prefix);
        while let Some(raw_key) = completer.next() {
            let raw_key = raw_key?;
            let value = match &inner.codec {
                PayloadCodec::Integer => {
                    let index = completer.last_index().expect("completer just yielded a key");
                    Payload::Int(inner.dict.value(index)? as i64)
                }
                _ => self.decode_payload(inner, &raw_key)?,
            };
            out.push((inner.codec.strip_key(&raw_key).to_vec(), value));
        }
        Ok(out)
    }

    /// Keys matching `query` once any table substitution is applied,
    /// per spec.md §4.6.
    pub fn similar_keys(&self, query: &[u8], table: &ReplaceTable) -> Result<Vec<Vec<u8>>> {
        let inner = self.inner()?;
        let hits = backtrack(&inner.dict, table, query, |d, i| self.fuzzy_terminal(inner, d, i))?;
        Ok(hits.into_iter().map(|(key, _)| key).collect())
    }

    /// `similar_keys`, paired with every value stored for each match.
    pub fn similar_items(&self, query: &[u8], table: &ReplaceTable) -> Result<Vec<(Vec<u8>, Vec<Payload>)>> {
        let inner = self.inner()?;
        let hits = backtrack(&inner.dict, table, query, |d, i| self.fuzzy_terminal(inner, d, i))?;
        hits.into_iter()
            .map(|(key, index)| Ok((key, self.leaf_values(inner, index)?)))
            .collect()
    }

    /// `similar_items` without the keys.
    pub fn similar_item_values(&self, query: &[u8], table: &ReplaceTable) -> Result<Vec<Vec<Payload>>> {
        Ok(self
            .similar_items(query, table)?
            .into_iter()
            .map(|(_, values)| values)
            .collect())
    }

    fn fuzzy_terminal(&self, inner: &Inner, dict: &Dictionary, index: u32) -> Result<Option<u32>> {
        if inner.codec.is_suffix_encoded() {
            dict.follow_char(SEP, index)
        } else {
            Ok(if dict.has_value(index)? { Some(index) } else { None })
        }
    }

    /// All decoded values stored at or under `index` (a subtree root for
    /// byte/record automata, a single leaf otherwise).
    fn leaf_values(&self, inner: &Inner, index: u32) -> Result<Vec<Payload>> {
        if !inner.codec.is_suffix_encoded() {
            return Ok(vec![self.decode_leaf(inner, index)?]);
        }
        let guide = self.guide(inner)?;
        let mut out = Vec::new();
        // Seed the key buffer with the separator itself (already consumed
        // via `follow_char(SEP, ...)` to reach `index`) so `decode_payload`
        // can still locate it in the reconstructed key.
        for raw_key in Completer::start(&inner.dict, guide, index, &[SEP]) {
            out.push(self.decode_payload(inner, &raw_key?)?);
        }
        Ok(out)
    }

    fn decode_leaf(&self, inner: &Inner, index: u32) -> Result<Payload> {
        match &inner.codec {
            PayloadCodec::None => Ok(Payload::None),
            PayloadCodec::Integer => Ok(Payload::Int(inner.dict.value(index)? as i64)),
            PayloadCodec::Bytes | PayloadCodec::Record(_) => {
                unreachable!("suffix-encoded codecs decode via decode_payload")
            }
        }
    }

    fn decode_payload(&self, inner: &Inner, raw_key: &[u8]) -> Result<Payload> {
        match &inner.codec {
            PayloadCodec::None => Ok(Payload::None),
            PayloadCodec::Integer => {
                let stripped = inner.codec.strip_key(raw_key);
                let index = inner
                    .dict
                    .follow_bytes(stripped, inner.dict.root())?
                    .ok_or(Error::NotFound)?;
                Ok(Payload::Int(inner.dict.value(index)? as i64))
            }
            PayloadCodec::Bytes => Ok(Payload::Bytes(inner.codec.decode_suffix(raw_key)?)),
            PayloadCodec::Record(_) => Ok(Payload::Record(inner.codec.decode_record(raw_key)?)),
        }
    }
}

impl Drop for Dawg {
    fn drop(&mut self) {
        self.close();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::container_bytes;

    fn build(keys: &[&str], with_guide: bool) -> Dawg {
        let entries: Vec<(Vec<u8>, u32)> = keys.iter().map(|k| (k.as_bytes().to_vec(), 0)).collect();
        let img = crate::testing::build_trie(&entries);
        let bytes = container_bytes(&img, with_guide, None);
        let kind = if with_guide { Kind::Completion } else { Kind::Plain };
        Dawg::open_bytes(bytes, kind).unwrap()
    }

    fn build_int(pairs: &[(&str, u32)]) -> Dawg {
        let entries: Vec<(Vec<u8>, u32)> = pairs.iter().map(|(k, v)| (k.as_bytes().to_vec(), *v)).collect();
        let img = crate::testing::build_trie(&entries);
        let bytes = container_bytes(&img, false, None);
        Dawg::open_bytes(bytes, Kind::Int).unwrap()
    }

    fn build_bytes(pairs: &[(&str, &[u8])]) -> Dawg {
        let entries: Vec<(Vec<u8>, u32)> = pairs
            .iter()
            .map(|(k, v)| (crate::payload::encode_suffix(k.as_bytes(), v), 0))
            .collect();
        let img = crate::testing::build_trie(&entries);
        let bytes = container_bytes(&img, true, None);
        Dawg::open_bytes(bytes, Kind::Bytes).unwrap()
    }

    #[test]
    fn s1_plain_and_completion() {
        let d = build(&["f", "bar", "foo", "foobar"], true);
        assert!(d.contains(b"foo").unwrap());
        assert!(!d.contains(b"fo").unwrap());
        assert_eq!(
            d.prefixes(b"foobarz").unwrap(),
            vec![b"f".to_vec(), b"foo".to_vec(), b"foobar".to_vec()]
        );
        assert_eq!(
            d.keys(b"foo").unwrap(),
            vec![b"foo".to_vec(), b"foobar".to_vec()]
        );
    }

    #[test]
    fn s4_integer_automaton() {
        let d = build_int(&[("foo", 1), ("bar", 5), ("foobar", 3)]);
        assert_eq!(d.find(b"foo").unwrap(), 1);
        assert_eq!(d.find(b"missing").unwrap(), -1);
        assert_eq!(d.get_or(b"missing", 42).unwrap(), 42);
    }

    #[test]
    fn s2_bytes_automaton_multivalue() {
        let d = build_bytes(&[("foo", b"data1"), ("bar", b"data2"), ("foo", b"data3")]);
        let got = d.get(b"foo").unwrap();
        assert_eq!(
            got,
            vec![Payload::Bytes(b"data1".to_vec()), Payload::Bytes(b"data3".to_vec())]
        );
        assert_eq!(d.get(b"bar").unwrap(), vec![Payload::Bytes(b"data2".to_vec())]);
    }

    #[test]
    fn close_makes_queries_fail() {
        let mut d = build(&["a"], false);
        d.close();
        assert!(matches!(d.contains(b"a"), Err(Error::NotLoaded)));
        d.close(); // idempotent
    }
}
