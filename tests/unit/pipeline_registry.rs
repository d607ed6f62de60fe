//! The process-wide pipeline registry, exercised through custom functions.

use crate::common::object;
use noctua::{Builder, Index, Pipeline, PipelineFunction, Token};
use serde_json::json;

/// A metaphone-ish toy: strips vowels after the first character.
fn devowel() -> PipelineFunction {
    PipelineFunction::new("devowel", |mut token: Token, _, _: &[Token]| {
        token.update(|s, _| {
            let mut out = String::new();
            for (i, c) in s.chars().enumerate() {
                if i == 0 || !"aeiou".contains(c) {
                    out.push(c);
                }
            }
            out
        });
        vec![token]
    })
}

#[test]
fn custom_functions_round_trip_through_serialization() {
    Pipeline::register_function(devowel());

    let mut builder = Builder::new();
    builder.ref_field("id");
    builder.field("body").unwrap();
    builder.pipeline.add(devowel());
    builder.search_pipeline.add(devowel());
    builder
        .add(&object(json!({ "id": "a", "body": "nocturnal searching" })))
        .unwrap();
    let index = builder.build().unwrap();

    // the devoweled query meets the devoweled vocabulary
    assert_eq!(index.search("nocturnal").unwrap().len(), 1);

    let reloaded = Index::load(&index.serialize().to_string()).unwrap();
    assert_eq!(reloaded.pipeline().serialize(), ["devowel"]);
    assert_eq!(reloaded.search("nocturnal").unwrap().len(), 1);
}

#[test]
fn unregistered_functions_still_run_but_warn() {
    // adding an unregistered function works; only serialization suffers
    let anonymous = PipelineFunction::new("anonymous-fn", |token: Token, _, _: &[Token]| {
        vec![token]
    });
    let mut pipeline = Pipeline::new();
    pipeline.add(anonymous);
    assert_eq!(pipeline.len(), 1);
}

#[test]
fn skip_lists_are_per_field() {
    let mut builder = Builder::new();
    builder.ref_field("id");
    builder.field("title").unwrap();
    builder.field("body").unwrap();
    builder.pipeline.add(devowel());
    builder.pipeline.skip("devowel", ["title"]);
    builder
        .add(&object(json!({ "id": "a", "title": "noctua", "body": "noctua" })))
        .unwrap();
    let index = builder.build().unwrap();

    // body was devoweled, title was not
    assert!(index.inverted_index().contains_key("noctua"));
    assert!(index.inverted_index().contains_key("nct"));
    assert_eq!(
        index.inverted_index()["noctua"].fields["title"].len(),
        1
    );
    assert!(index.inverted_index()["noctua"].fields["body"].is_empty());
}
