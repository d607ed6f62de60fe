// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The stable JSON form of an index.
//!
//! ```json
//! {
//!   "version": "0.3.1",
//!   "fields": ["title", "body"],
//!   "fieldVectors": [["body/a", [0, 0.476, 3, 1.128]]],
//!   "invertedIndex": [["plant", {"_index": 3, "title": {}, "body": {"a": {}}}]],
//!   "pipeline": ["stemmer"]
//! }
//! ```
//!
//! `invertedIndex` entries are sorted by term - required, because loading
//! feeds them straight into the incremental token-set builder. Vector
//! values are rounded to 3 decimals on the way out, which is why scores
//! only survive a round trip to about that precision. A version mismatch on
//! load is a warning, not an error; the schema is carried by shape, not by
//! version.

use std::collections::BTreeMap;

use log::warn;
use serde_json::{json, Map, Value};

use crate::error::{Error, Result};
use crate::index::Index;
use crate::inverted::{FieldPostings, InvertedIndex, Posting, TermMetadata};
use crate::pipeline::Pipeline;
use crate::token_set_builder::TokenSetBuilder;
use crate::vector::Vector;

/// The version stamped into serialized indexes.
pub const INDEX_VERSION: &str = env!("CARGO_PKG_VERSION");

fn malformed(reason: impl Into<String>) -> Error {
    Error::MalformedIndex {
        reason: reason.into(),
    }
}

fn posting_to_value(posting: &Posting) -> Value {
    let mut map = Map::new();
    map.insert("_index".to_string(), Value::from(posting.term_ordinal));
    for (field, docs) in &posting.fields {
        let mut docs_map = Map::new();
        for (doc_ref, metadata) in docs {
            let mut metadata_map = Map::new();
            for (key, values) in metadata {
                metadata_map.insert(key.clone(), Value::Array(values.clone()));
            }
            docs_map.insert(doc_ref.clone(), Value::Object(metadata_map));
        }
        map.insert(field.clone(), Value::Object(docs_map));
    }
    Value::Object(map)
}

fn posting_from_value(term: &str, value: &Value) -> Result<Posting> {
    let map = value
        .as_object()
        .ok_or_else(|| malformed(format!("posting for {:?} is not an object", term)))?;

    let term_ordinal = map
        .get("_index")
        .and_then(Value::as_u64)
        .ok_or_else(|| malformed(format!("posting for {:?} has no _index", term)))?
        as usize;

    let mut fields = BTreeMap::new();
    for (field, docs_value) in map {
        if field == "_index" {
            continue;
        }
        let docs = docs_value
            .as_object()
            .ok_or_else(|| malformed(format!("field posting {:?}/{:?} is not an object", term, field)))?;
        let mut field_postings = FieldPostings::new();
        for (doc_ref, metadata_value) in docs {
            let metadata_map = metadata_value.as_object().ok_or_else(|| {
                malformed(format!(
                    "metadata for {:?}/{:?}/{:?} is not an object",
                    term, field, doc_ref
                ))
            })?;
            let mut metadata = TermMetadata::new();
            for (key, values) in metadata_map {
                let values = values.as_array().ok_or_else(|| {
                    malformed(format!(
                        "metadata values for {:?} under {:?} are not an array",
                        key, term
                    ))
                })?;
                metadata.insert(key.clone(), values.clone());
            }
            field_postings.insert(doc_ref.clone(), metadata);
        }
        fields.insert(field.clone(), field_postings);
    }

    Ok(Posting {
        term_ordinal,
        fields,
    })
}

fn vector_from_value(field_ref: &str, value: &Value) -> Result<Vector> {
    let flat = value
        .as_array()
        .ok_or_else(|| malformed(format!("field vector {:?} is not an array", field_ref)))?;
    if flat.len() % 2 != 0 {
        return Err(malformed(format!(
            "field vector {:?} has an odd element count",
            field_ref
        )));
    }

    let mut pairs = Vec::with_capacity(flat.len() / 2);
    for chunk in flat.chunks_exact(2) {
        let ordinal = chunk[0]
            .as_u64()
            .ok_or_else(|| malformed(format!("non-integer ordinal in vector {:?}", field_ref)))?
            as usize;
        let weight = chunk[1]
            .as_f64()
            .ok_or_else(|| malformed(format!("non-numeric weight in vector {:?}", field_ref)))?;
        pairs.push((ordinal, weight));
    }

    Vector::from_pairs(pairs)
}

impl Index {
    /// Serialize to the stable JSON schema.
    pub fn serialize(&self) -> Value {
        let inverted_index: Vec<Value> = self
            .inverted_index
            .iter()
            .map(|(term, posting)| json!([term, posting_to_value(posting)]))
            .collect();

        let field_vectors: Vec<Value> = self
            .field_vectors
            .iter()
            .map(|(field_ref, vector)| json!([field_ref, vector.serialize()]))
            .collect();

        json!({
            "version": INDEX_VERSION,
            "fields": self.fields,
            "fieldVectors": field_vectors,
            "invertedIndex": inverted_index,
            "pipeline": self.pipeline.serialize(),
        })
    }

    /// Parse and load a serialized index from its JSON text.
    pub fn load(serialized: &str) -> Result<Index> {
        let value: Value =
            serde_json::from_str(serialized).map_err(|e| malformed(e.to_string()))?;
        Self::from_value(&value)
    }

    /// Load a serialized index from an already-parsed JSON value.
    pub fn from_value(value: &Value) -> Result<Index> {
        let map = value
            .as_object()
            .ok_or_else(|| malformed("serialized index is not an object"))?;

        match map.get("version").and_then(Value::as_str) {
            Some(version) if version != INDEX_VERSION => {
                warn!(
                    "version mismatch when loading serialized index: expected {}, got {}",
                    INDEX_VERSION, version
                );
            }
            Some(_) => {}
            None => warn!("serialized index carries no version"),
        }

        let fields: Vec<String> = map
            .get("fields")
            .and_then(Value::as_array)
            .ok_or_else(|| malformed("missing fields array"))?
            .iter()
            .map(|field| {
                field
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| malformed("non-string field name"))
            })
            .collect::<Result<_>>()?;

        let mut field_vectors = BTreeMap::new();
        for entry in map
            .get("fieldVectors")
            .and_then(Value::as_array)
            .ok_or_else(|| malformed("missing fieldVectors array"))?
        {
            let pair = entry
                .as_array()
                .filter(|pair| pair.len() == 2)
                .ok_or_else(|| malformed("fieldVectors entry is not a [ref, elements] pair"))?;
            let field_ref = pair[0]
                .as_str()
                .ok_or_else(|| malformed("non-string field ref"))?;
            field_vectors.insert(field_ref.to_string(), vector_from_value(field_ref, &pair[1])?);
        }

        let mut token_set_builder = TokenSetBuilder::new();
        let mut inverted_index = InvertedIndex::new();
        for entry in map
            .get("invertedIndex")
            .and_then(Value::as_array)
            .ok_or_else(|| malformed("missing invertedIndex array"))?
        {
            let pair = entry
                .as_array()
                .filter(|pair| pair.len() == 2)
                .ok_or_else(|| malformed("invertedIndex entry is not a [term, posting] pair"))?;
            let term = pair[0]
                .as_str()
                .ok_or_else(|| malformed("non-string term"))?;
            token_set_builder.insert(term)?;
            inverted_index.insert(term.to_string(), posting_from_value(term, &pair[1])?);
        }
        let token_set = token_set_builder.finish();

        let labels: Vec<String> = map
            .get("pipeline")
            .and_then(Value::as_array)
            .ok_or_else(|| malformed("missing pipeline array"))?
            .iter()
            .map(|label| {
                label
                    .as_str()
                    .map(str::to_string)
                    .ok_or_else(|| malformed("non-string pipeline label"))
            })
            .collect::<Result<_>>()?;
        let pipeline = Pipeline::load(&labels)?;

        Ok(Index::new(
            inverted_index,
            field_vectors,
            token_set,
            fields,
            pipeline,
        ))
    }
}
