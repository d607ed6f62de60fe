//! Per-language builders.

use crate::common::object;
use noctua::{build_for_language, Document};

fn french_corpus() -> Vec<Document> {
    [
        serde_json::json!({ "id": "a", "texte": "les jardiniers arrosent continuellement" }),
        serde_json::json!({ "id": "b", "texte": "le chat dort sur le canapé" }),
    ]
    .into_iter()
    .map(object)
    .collect()
}

#[test]
fn french_queries_meet_french_stems() {
    let index = build_for_language("fr", "id", ["texte"], &french_corpus()).unwrap();
    // "arrosent" and "arroser" share the stem "arros"
    let results = index.search("arroser").unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].doc_ref, "a");
}

#[test]
fn french_pipeline_serializes_under_its_language_label() {
    let index = build_for_language("fr", "id", ["texte"], &french_corpus()).unwrap();
    let serialized = index.serialize();
    assert_eq!(serialized["pipeline"], serde_json::json!(["stemmer-fr"]));

    // the label is registered, so the index loads back
    let reloaded = noctua::Index::load(&serialized.to_string()).unwrap();
    assert_eq!(reloaded.search("arroser").unwrap().len(), 1);
}

#[test]
fn unsupported_language_is_rejected() {
    let err = build_for_language("xx", "id", ["texte"], &french_corpus()).unwrap_err();
    assert!(matches!(err, noctua::Error::UnknownLanguage { .. }));
}
