//! Shared test fixtures.

#![allow(dead_code)]

use noctua::{build, Document, Index, SearchResult};
use serde_json::Value;

/// Unwrap a `json!` object into a [`Document`].
pub fn object(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected a JSON object, got {other}"),
    }
}

/// The three-document whodunit corpus used across the end-to-end tests.
pub fn clue_corpus() -> Vec<Document> {
    [
        serde_json::json!({
            "id": "a",
            "title": "Mr. Green kills Colonel Mustard",
            "body": "Mr. Green killed Colonel Mustard in the study with the candlestick. \
                     Mr. Green is not a very nice fellow.",
        }),
        serde_json::json!({
            "id": "b",
            "title": "Plumb waters plant",
            "body": "Professor Plumb has a green plant in his study",
        }),
        serde_json::json!({
            "id": "c",
            "title": "Scarlett helps Professor",
            "body": "Miss Scarlett watered Professor Plumbs green plant while he was away \
                     from his office last week.",
        }),
    ]
    .into_iter()
    .map(object)
    .collect()
}

pub fn clue_index() -> Index {
    build("id", ["title", "body"], &clue_corpus()).expect("corpus builds")
}

pub fn refs(results: &[SearchResult]) -> Vec<&str> {
    results.iter().map(|r| r.doc_ref.as_str()).collect()
}

pub fn sorted_refs(results: &[SearchResult]) -> Vec<&str> {
    let mut refs = refs(results);
    refs.sort_unstable();
    refs
}
