// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! BM25 term weighting.
//!
//! Two knobs, both set on the builder: `k1` controls how quickly repeated
//! occurrences of a term saturate, `b` how strongly scores are normalized by
//! field length. The defaults (1.2 and 0.75) are the conventional ones.

use crate::inverted::Posting;

/// Log-scaled inverse document frequency of a term.
///
/// `df` counts `(field, document)` occurrences across all of the posting's
/// fields, so a term present in two fields of the same document counts
/// twice. The `1 +` and the absolute value keep the result positive even
/// when a term appears in more than half the corpus.
pub fn inverse_document_frequency(posting: &Posting, document_count: usize) -> f64 {
    let documents_with_term: usize = posting.fields.values().map(|docs| docs.len()).sum();
    let x = (document_count as f64 - documents_with_term as f64 + 0.5)
        / (documents_with_term as f64 + 0.5);
    (1.0 + x.abs()).ln()
}

/// The BM25 weight of a term occurrence, before field and document boosts.
pub fn bm25_weight(
    idf: f64,
    term_frequency: f64,
    k1: f64,
    b: f64,
    field_length: f64,
    average_field_length: f64,
) -> f64 {
    idf * ((k1 + 1.0) * term_frequency)
        / (k1 * (1.0 - b + b * (field_length / average_field_length)) + term_frequency)
}

/// Round to 3 decimal places, the precision of the serialized form.
pub(crate) fn round3(value: f64) -> f64 {
    (value * 1000.0).round() / 1000.0
}
