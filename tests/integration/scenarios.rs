//! The canonical search scenarios: every operator of the query language
//! exercised against the whodunit corpus.

use crate::common::{clue_index, refs, sorted_refs};
use noctua::Clause;

#[test]
fn plain_term_finds_its_document() {
    let results = clue_index().search("scarlett").unwrap();
    assert_eq!(refs(&results), ["c"]);
    assert_eq!(results[0].match_data.terms(), ["scarlett"]);
}

#[test]
fn shared_term_ranks_by_field_length() {
    let results = clue_index().search("plant").unwrap();
    assert_eq!(refs(&results), ["b", "c"]);
}

#[test]
fn query_terms_are_stemmed_like_the_corpus() {
    // "study" stems to "studi"; both study-mentioning documents match, the
    // shorter body first.
    let results = clue_index().search("study").unwrap();
    assert_eq!(refs(&results), ["b", "a"]);
}

#[test]
fn disabling_the_pipeline_skips_stemming() {
    let index = clue_index();
    let mut query = index.create_query(None).unwrap();
    query.clause(Clause {
        term: "study".to_string(),
        use_pipeline: false,
        ..Clause::default()
    });
    assert!(index.query(&query).unwrap().is_empty());
}

#[test]
fn independent_terms_accumulate_into_one_result() {
    let results = clue_index().search("fellow candlestick").unwrap();
    assert_eq!(refs(&results), ["a"]);
    let data = &results[0].match_data;
    assert!(data.metadata["fellow"].contains_key("body"));
    assert!(data.metadata["candlestick"].contains_key("body"));
}

#[test]
fn trailing_wildcard_expands_over_the_vocabulary() {
    let results = clue_index().search("pl*").unwrap();
    assert_eq!(sorted_refs(&results), ["b", "c"]);
    for result in &results {
        let mut terms = result.match_data.terms();
        terms.sort_unstable();
        assert_eq!(terms, ["plant", "plumb"]);
    }
}

#[test]
fn fuzzy_term_reaches_misspellings() {
    let results = clue_index().search("plont~1").unwrap();
    assert_eq!(sorted_refs(&results), ["b", "c"]);
}

#[test]
fn prohibited_term_excludes_matching_documents() {
    let results = clue_index().search("-candlestick green").unwrap();
    assert_eq!(sorted_refs(&results), ["b", "c"]);
}

#[test]
fn required_clauses_must_all_match() {
    let results = clue_index().search("+title:plant +green").unwrap();
    assert_eq!(refs(&results), ["b"]);
}

#[test]
fn prohibited_terms_contribute_no_match_data() {
    let results = clue_index().search("-title:plant plumb").unwrap();
    assert_eq!(refs(&results), ["c"]);
    assert_eq!(results[0].match_data.terms(), ["plumb"]);
}

#[test]
fn boost_reweights_clauses() {
    let results = clue_index().search("green study^10").unwrap();
    assert_eq!(results[0].doc_ref, "b");
}

#[test]
fn field_scoping_limits_matches() {
    let results = clue_index().search("title:plant").unwrap();
    assert_eq!(refs(&results), ["b"]);
}

#[test]
fn negated_query_returns_the_complement_scored_zero() {
    let results = clue_index().search("-plant").unwrap();
    assert_eq!(refs(&results), ["a"]);
    assert_eq!(results[0].score, 0.0);
}

#[test]
fn unknown_query_field_is_an_error() {
    assert!(clue_index().search("author:green").is_err());
}

#[test]
fn empty_query_returns_no_results() {
    assert!(clue_index().search("").unwrap().is_empty());
}
