//! Metadata whitelisting: positions recorded at build time surface in
//! search results.

use crate::common::object;
use noctua::default_builder;
use serde_json::json;

#[test]
fn whitelisted_positions_flow_into_match_data() {
    let mut builder = default_builder();
    builder.metadata_whitelist.push("position".to_string());
    builder.ref_field("id");
    builder.field("body").unwrap();
    builder
        .add(&object(json!({ "id": "a", "body": "green plants and green walls" })))
        .unwrap();
    let index = builder.build().unwrap();

    let results = index.search("green").unwrap();
    let positions = &results[0].match_data.metadata["green"]["body"]["position"];
    assert_eq!(
        positions,
        &vec![
            serde_json::Value::from(vec![0, 5]),
            serde_json::Value::from(vec![17, 5])
        ]
    );
}

#[test]
fn positions_survive_serialization() {
    let mut builder = default_builder();
    builder.metadata_whitelist.push("position".to_string());
    builder.ref_field("id");
    builder.field("body").unwrap();
    builder
        .add(&object(json!({ "id": "a", "body": "a lonely word" })))
        .unwrap();
    let index = builder.build().unwrap();

    let reloaded = noctua::Index::load(&index.serialize().to_string()).unwrap();
    let before = index.search("lonely").unwrap();
    let after = reloaded.search("lonely").unwrap();
    assert_eq!(before[0].match_data, after[0].match_data);
}

#[test]
fn no_whitelist_means_no_recorded_metadata() {
    let mut builder = default_builder();
    builder.ref_field("id");
    builder.field("body").unwrap();
    builder
        .add(&object(json!({ "id": "a", "body": "green walls" })))
        .unwrap();
    let index = builder.build().unwrap();

    let results = index.search("green").unwrap();
    assert!(results[0].match_data.metadata["green"]["body"].is_empty());
}
