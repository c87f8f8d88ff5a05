//! Integration tests for the Dictionary walker against the in-test double
//! array builder, independent of the higher-level `Dawg` façade.

use dawg_reader::testing::{make_dictionary, make_dictionary_with_values};

#[test]
fn contains_reports_exact_membership_only() {
    let dict = make_dictionary(&["f", "bar", "foo", "foobar"]);
    assert!(dict.contains(b"foo").unwrap());
    assert!(dict.contains(b"bar").unwrap());
    assert!(!dict.contains(b"fo").unwrap());
    assert!(!dict.contains(b"foob").unwrap());
    assert!(!dict.contains(b"").unwrap());
}

#[test]
fn find_recovers_the_stored_integer_value() {
    let dict = make_dictionary_with_values(&[("foo", 1), ("bar", 5), ("foobar", 3)]);
    assert_eq!(dict.find(b"foo").unwrap(), Some(1));
    assert_eq!(dict.find(b"bar").unwrap(), Some(5));
    assert_eq!(dict.find(b"missing").unwrap(), None);
}

#[test]
fn follow_char_past_a_dead_end_returns_none_not_an_error() {
    let dict = make_dictionary(&["foo"]);
    let root = dict.root();
    let after_f = dict.follow_char(b'f', root).unwrap().unwrap();
    let after_fo = dict.follow_char(b'o', after_f).unwrap().unwrap();
    let after_foo = dict.follow_char(b'o', after_fo).unwrap().unwrap();
    assert!(dict.has_value(after_foo).unwrap());
    assert_eq!(dict.follow_char(b'x', after_foo).unwrap(), None);
}

#[test]
fn empty_dictionary_contains_nothing() {
    let dict = make_dictionary(&[]);
    assert!(!dict.contains(b"anything").unwrap());
}
