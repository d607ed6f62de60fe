//! Query language edge cases, observed through search results.

use crate::common::{clue_index, refs};
use noctua::Error;

#[test]
fn queries_are_case_insensitive() {
    let index = clue_index();
    assert_eq!(
        refs(&index.search("SCARLETT").unwrap()),
        refs(&index.search("scarlett").unwrap())
    );
}

#[test]
fn hyphenated_input_is_two_terms() {
    // "green-plant" lexes as two separate clauses
    let index = clue_index();
    let hyphenated = index.search("green-plant").unwrap();
    let spaced = index.search("green plant").unwrap();
    assert_eq!(refs(&hyphenated), refs(&spaced));
}

#[test]
fn escaped_separator_stays_in_the_term() {
    // an escaped hyphen is part of the term, which matches nothing here
    let index = clue_index();
    assert!(index.search(r"green\-plant").unwrap().is_empty());
}

#[test]
fn multiple_presence_operators_combine() {
    let index = clue_index();
    let results = index.search("+green -candlestick").unwrap();
    let mut found = refs(&results);
    found.sort_unstable();
    assert_eq!(found, ["b", "c"]);
}

#[test]
fn non_numeric_boost_is_a_parse_error() {
    let err = clue_index().search("plant^").unwrap_err();
    assert!(matches!(err, Error::QueryParse { .. }));
}

#[test]
fn non_numeric_edit_distance_is_a_parse_error() {
    let err = clue_index().search("plant~").unwrap_err();
    assert!(matches!(err, Error::QueryParse { .. }));
}

#[test]
fn unknown_field_names_the_known_ones() {
    let err = clue_index().search("author:green").unwrap_err();
    let message = err.to_string();
    assert!(message.contains("author"));
    assert!(message.contains("title"));
}

#[test]
fn fuzzy_distance_is_a_hard_cutoff() {
    let index = clue_index();
    // "plint" is one substitution from "plant"
    assert!(!index.search("plint~1").unwrap().is_empty());
    // "ploni" is two substitutions away: out of reach at 1, found at 2
    assert!(index.search("ploni~1").unwrap().is_empty());
    assert!(!index.search("ploni~2").unwrap().is_empty());
}

#[test]
fn wildcard_terms_bypass_the_search_pipeline() {
    // "studies*" would stem to "studi" if piped; unpiped it matches nothing
    let index = clue_index();
    assert!(index.search("studies*").unwrap().is_empty());
    // while the stemmed vocabulary term with a wildcard does match
    assert!(!index.search("studi*").unwrap().is_empty());
}
