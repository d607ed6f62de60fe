// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The inverted index: term → posting.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **ORDINAL_UNIQUE**: every posting's `term_ordinal` is unique and less
//!    than the vocabulary size
//! 2. **FIELDS_COMPLETE**: a posting carries an entry (possibly empty) for
//!    every field registered at the time the term was first seen
//! 3. **VOCABULARY_MATCHES_AUTOMATON**: the key set of the index equals the
//!    language accepted by the index's token set
//!
//! Ordinals are assigned in first-seen order during the build and are the
//! keys of every [`Vector`](crate::Vector). The serialized form re-sorts
//! terms lexicographically; ordinals travel inside the postings, so the
//! in-memory assignment survives a round trip.

use std::collections::BTreeMap;

use serde_json::Value;

/// Whitelisted metadata recorded for one `(term, field, document)` triple:
/// metadata key → one value per occurrence.
pub type TermMetadata = BTreeMap<String, Vec<Value>>;

/// Per-field occurrences of a term: document ref → metadata.
pub type FieldPostings = BTreeMap<String, TermMetadata>;

/// The index entry for one vocabulary term.
#[derive(Debug, Clone, PartialEq)]
pub struct Posting {
    /// Dense ordinal of the term, assigned in first-seen order.
    pub term_ordinal: usize,
    /// field name → document ref → metadata occurrences.
    pub fields: BTreeMap<String, FieldPostings>,
}

impl Posting {
    /// A fresh posting carrying an empty entry for each known field.
    pub fn new(term_ordinal: usize, field_names: impl IntoIterator<Item = String>) -> Self {
        Posting {
            term_ordinal,
            fields: field_names
                .into_iter()
                .map(|name| (name, FieldPostings::new()))
                .collect(),
        }
    }
}

/// term → posting, ordered so vocabulary iteration is already sorted for
/// the token-set builder.
pub type InvertedIndex = BTreeMap<String, Posting>;
