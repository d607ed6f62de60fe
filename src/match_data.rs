// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Match metadata carried on every search result.
//!
//! During query execution one accumulator is created per matching
//! `(field, document)` pair; when results are assembled the per-field
//! accumulators of a document are combined into one, so the caller sees
//! term → field → metadata-key → occurrences.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::inverted::TermMetadata;

/// Accumulates which terms matched a document, in which fields, and the
/// whitelisted metadata recorded for each occurrence.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct MatchData {
    /// term → field → metadata key → values.
    pub metadata: BTreeMap<String, BTreeMap<String, TermMetadata>>,
}

impl MatchData {
    /// An accumulator seeded with a single term/field observation.
    pub fn new(term: &str, field: &str, metadata: TermMetadata) -> Self {
        let mut fields = BTreeMap::new();
        fields.insert(field.to_string(), metadata);
        let mut terms = BTreeMap::new();
        terms.insert(term.to_string(), fields);
        MatchData { metadata: terms }
    }

    /// The matched terms, in sorted order.
    pub fn terms(&self) -> Vec<&str> {
        self.metadata.keys().map(String::as_str).collect()
    }

    /// Record another observation of `term` in `field`.
    pub fn add(&mut self, term: &str, field: &str, metadata: &TermMetadata) {
        let fields = self.metadata.entry(term.to_string()).or_default();
        match fields.get_mut(field) {
            None => {
                fields.insert(field.to_string(), metadata.clone());
            }
            Some(existing) => {
                for (key, values) in metadata {
                    existing
                        .entry(key.clone())
                        .and_modify(|v| v.extend(values.iter().cloned()))
                        .or_insert_with(|| values.clone());
                }
            }
        }
    }

    /// Fold another accumulator into this one, concatenating metadata
    /// values where both saw the same term/field/key.
    pub fn combine(&mut self, other: &MatchData) {
        for (term, other_fields) in &other.metadata {
            let fields = self.metadata.entry(term.clone()).or_default();
            for (field, other_metadata) in other_fields {
                let metadata = fields.entry(field.clone()).or_default();
                for (key, values) in other_metadata {
                    metadata
                        .entry(key.clone())
                        .and_modify(|v| v.extend(values.iter().cloned()))
                        .or_insert_with(|| values.clone());
                }
            }
        }
    }
}
