//! The literal scenarios S1-S6, run end-to-end through `Dawg::open_bytes`
//! rather than against the individual walkers.

use dawg_reader::payload::RecordFormat;
use dawg_reader::testing::{build_trie, container_bytes, encode_suffix};
use dawg_reader::{Dawg, Error, Kind, Payload, ReplaceTable};

fn open_plain(keys: &[&str], with_guide: bool) -> Dawg {
    let entries: Vec<(Vec<u8>, u32)> = keys.iter().map(|k| (k.as_bytes().to_vec(), 0)).collect();
    let img = build_trie(&entries);
    let bytes = container_bytes(&img, with_guide, None);
    let kind = if with_guide { Kind::Completion } else { Kind::Plain };
    Dawg::open_bytes(bytes, kind).unwrap()
}

#[test]
fn s1_plain_and_completion_dawg() {
    let d = open_plain(&["f", "bar", "foo", "foobar"], true);
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
fn s2_bytes_dawg_multivalue() {
    let entries = [
        ("foo", b"data1".as_slice()),
        ("bar", b"data2".as_slice()),
        ("foo", b"data3".as_slice()),
        ("foobar", b"data4".as_slice()),
    ];
    let keyed: Vec<(Vec<u8>, u32)> = entries
        .iter()
        .map(|(k, v)| (encode_suffix(k.as_bytes(), v), 0))
        .collect();
    let img = build_trie(&keyed);
    let bytes = container_bytes(&img, true, None);
    let d = Dawg::open_bytes(bytes, Kind::Bytes).unwrap();

    assert_eq!(
        d.get(b"foo").unwrap(),
        vec![Payload::Bytes(b"data1".to_vec()), Payload::Bytes(b"data3".to_vec())]
    );
    assert_eq!(d.get(b"bar").unwrap(), vec![Payload::Bytes(b"data2".to_vec())]);
    assert_eq!(
        d.keys(b"fo").unwrap(),
        vec![b"foo".to_vec(), b"foo".to_vec(), b"foobar".to_vec()]
    );
}

#[test]
fn s3_record_dawg_sorted_by_packed_form() {
    let fmt = RecordFormat::parse(">3H").unwrap();
    let entries = [
        ("foo", vec![3i64, 2, 256]),
        ("bar", vec![3, 1, 0]),
        ("foo", vec![3, 2, 1]),
        ("foobar", vec![6, 3, 0]),
    ];
    let keyed: Vec<(Vec<u8>, u32)> = entries
        .iter()
        .map(|(k, v)| (encode_suffix(k.as_bytes(), &fmt.pack(v).unwrap()), 0))
        .collect();
    let img = build_trie(&keyed);
    let bytes = container_bytes(&img, true, Some(">3H"));
    let d = Dawg::open_bytes(bytes, Kind::Record(fmt)).unwrap();

    let got = d.get(b"foo").unwrap();
    assert_eq!(
        got,
        vec![Payload::Record(vec![3, 2, 1]), Payload::Record(vec![3, 2, 256])]
    );
}

#[test]
fn s4_int_dawg() {
    let pairs = [("foo", 1u32), ("bar", 5), ("foobar", 3)];
    let entries: Vec<(Vec<u8>, u32)> = pairs.iter().map(|(k, v)| (k.as_bytes().to_vec(), *v)).collect();
    let img = build_trie(&entries);
    let bytes = container_bytes(&img, false, None);
    let d = Dawg::open_bytes(bytes, Kind::Int).unwrap();

    assert_eq!(d.find(b"foo").unwrap(), 1);
    assert_eq!(d.find(b"missing").unwrap(), -1);
    assert_eq!(d.get_or(b"missing", 42).unwrap(), 42);
}

#[test]
fn s5_similar_keys_over_replacement_table() {
    let keys = [
        "ЁЖИК", "ЁЖИКЕ", "ЁЖ", "ДЕРЕВНЯ", "ДЕРЁВНЯ", "ЕМ", "ОЗЕРА", "ОЗЁРА", "ОЗЕРО",
    ];
    let d = open_plain(&keys, false);
    let table = ReplaceTable::compile_str(&[("Е", "Ё")]).unwrap();

    let to_strings = |keys: Vec<Vec<u8>>| -> Vec<String> {
        keys.into_iter().map(|k| String::from_utf8(k).unwrap()).collect()
    };

    assert_eq!(
        to_strings(d.similar_keys("ДЕРЕВНЯ".as_bytes(), &table).unwrap()),
        vec!["ДЕРЕВНЯ".to_string(), "ДЕРЁВНЯ".to_string()]
    );
    assert_eq!(
        to_strings(d.similar_keys("ЕЖ".as_bytes(), &table).unwrap()),
        vec!["ЁЖ".to_string()]
    );
    assert!(d.similar_keys("УЖ".as_bytes(), &table).unwrap().is_empty());
}

#[test]
fn s6_compile_replaces_rejects_key_value_overlap() {
    let err = ReplaceTable::compile_str(&[("air", "bear"), ("bear", "air")]).unwrap_err();
    assert!(matches!(err, Error::InvalidReplaceTable { .. }));
}

#[test]
fn invariant_close_then_query_is_not_loaded() {
    let mut d = open_plain(&["a"], false);
    d.close();
    assert!(matches!(d.contains(b"a"), Err(Error::NotLoaded)));
    d.close();
}

#[test]
fn large_int_dawg_roundtrip() {
    let words: Vec<String> = (0..2000).map(|i| format!("word{i:05}")).collect();
    let entries: Vec<(Vec<u8>, u32)> = words.iter().map(|w| (w.as_bytes().to_vec(), w.len() as u32)).collect();
    let img = build_trie(&entries);
    let bytes = container_bytes(&img, false, None);
    let d = Dawg::open_bytes(bytes, Kind::Int).unwrap();

    for w in &words {
        assert_eq!(d.find(w.as_bytes()).unwrap(), w.len() as i64);
    }
    assert_eq!(d.find(b"not-present").unwrap(), -1);
    assert_eq!(d.find(b"word99999").unwrap(), -1);
}
