//! Integration tests for the Guide walker and Completer against the
//! in-test double array builder.

use dawg_reader::testing::make_dict_and_guide;
use dawg_reader::Completer;

fn keys_under(dict_guide: &(dawg_reader::Dictionary, dawg_reader::Guide), prefix: &[u8]) -> Vec<String> {
    let (dict, guide) = dict_guide;
    let Some(start) = dict.follow_bytes(prefix, dict.root()).unwrap() else {
        return Vec::new();
    };
    Completer::start(dict, guide, start, prefix)
        .map(|r| String::from_utf8(r.unwrap()).unwrap())
        .collect()
}

#[test]
fn enumerates_every_key_in_lexicographic_order() {
    let dg = make_dict_and_guide(&["foobar", "foo", "bar", "f"]);
    assert_eq!(
        keys_under(&dg, b""),
        vec!["bar".to_string(), "f".to_string(), "foo".to_string(), "foobar".to_string()]
    );
}

#[test]
fn enumerates_only_keys_under_a_prefix() {
    let dg = make_dict_and_guide(&["foobar", "foo", "bar", "f"]);
    assert_eq!(
        keys_under(&dg, b"foo"),
        vec!["foo".to_string(), "foobar".to_string()]
    );
}

#[test]
fn a_prefix_with_no_matches_yields_nothing() {
    let dg = make_dict_and_guide(&["foo", "bar"]);
    assert!(keys_under(&dg, b"zzz").is_empty());
}

#[test]
fn single_key_automaton_yields_exactly_itself() {
    let dg = make_dict_and_guide(&["only"]);
    assert_eq!(keys_under(&dg, b""), vec!["only".to_string()]);
}
