// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Sparse vectors over term ordinals.
//!
//! One vector exists per `(document, field)` pair, holding BM25 weights
//! keyed by term ordinal; queries build their own vectors the same way and
//! score candidates by similarity.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **ORDINALS_SORTED**: element ordinals are strictly increasing
//! 2. **MAGNITUDE_FRESH**: any mutation invalidates the memoized magnitude
//!
//! # Similarity is one-sided
//!
//! [`Vector::similarity`] divides the dot product by the *left* operand's
//! magnitude only. This is not a true cosine, and it is deliberate: ranking
//! must match the established behavior of the index format, where the query
//! vector's magnitude is the only normalizer. Do not "fix" it.

use std::sync::OnceLock;

use crate::error::{Error, Result};
use crate::scoring::round3;

/// A sparse numeric vector stored as ordinal-sorted `(ordinal, value)`
/// pairs.
#[derive(Debug, Clone, Default)]
pub struct Vector {
    elements: Vec<(usize, f64)>,
    magnitude: OnceLock<f64>,
}

impl PartialEq for Vector {
    fn eq(&self, other: &Self) -> bool {
        self.elements == other.elements
    }
}

impl Vector {
    pub fn new() -> Self {
        Vector::default()
    }

    /// Build a vector from already-sorted pairs, as found in a serialized
    /// index. Rejects out-of-order or duplicate ordinals.
    pub fn from_pairs(elements: Vec<(usize, f64)>) -> Result<Self> {
        for window in elements.windows(2) {
            if window[0].0 >= window[1].0 {
                return Err(Error::MalformedIndex {
                    reason: format!(
                        "vector ordinals not strictly increasing: {} then {}",
                        window[0].0, window[1].0
                    ),
                });
            }
        }
        Ok(Vector {
            elements,
            magnitude: OnceLock::new(),
        })
    }

    pub fn elements(&self) -> &[(usize, f64)] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// The pair offset where `index` resides, or where it would be
    /// spliced in: an exact hit returns the hit, otherwise the first
    /// position whose ordinal exceeds `index` (possibly the end).
    fn position_for_index(&self, index: usize) -> usize {
        if self.elements.is_empty() {
            return 0;
        }

        let mut start = 0;
        let mut end = self.elements.len();
        let mut slice_length = end - start;
        let mut pivot = slice_length / 2;
        let mut pivot_index = self.elements[pivot].0;

        while slice_length > 1 {
            if pivot_index < index {
                start = pivot;
            } else if pivot_index > index {
                end = pivot;
            } else {
                break;
            }
            slice_length = end - start;
            pivot = start + slice_length / 2;
            pivot_index = self.elements[pivot].0;
        }

        if pivot_index >= index {
            pivot
        } else {
            pivot + 1
        }
    }

    /// Insert a value at an ordinal, failing if the ordinal is occupied.
    pub fn insert(&mut self, index: usize, value: f64) -> Result<()> {
        self.magnitude = OnceLock::new();
        let position = self.position_for_index(index);
        if position < self.elements.len() && self.elements[position].0 == index {
            return Err(Error::DuplicateIndex { index });
        }
        self.elements.insert(position, (index, value));
        Ok(())
    }

    /// Insert a value at an ordinal, merging with any existing value via
    /// `merge(current, incoming)`.
    pub fn upsert(&mut self, index: usize, value: f64, merge: impl FnOnce(f64, f64) -> f64) {
        self.magnitude = OnceLock::new();
        let position = self.position_for_index(index);
        if position < self.elements.len() && self.elements[position].0 == index {
            self.elements[position].1 = merge(self.elements[position].1, value);
        } else {
            self.elements.insert(position, (index, value));
        }
    }

    /// Euclidean magnitude, memoized until the next mutation.
    pub fn magnitude(&self) -> f64 {
        *self.magnitude.get_or_init(|| {
            self.elements
                .iter()
                .map(|&(_, value)| value * value)
                .sum::<f64>()
                .sqrt()
        })
    }

    /// Dot product via a merge walk over the two sorted element lists.
    pub fn dot(&self, other: &Vector) -> f64 {
        let mut product = 0.0;
        let mut i = 0;
        let mut j = 0;
        let a = &self.elements;
        let b = &other.elements;

        while i < a.len() && j < b.len() {
            if a[i].0 < b[j].0 {
                i += 1;
            } else if a[i].0 > b[j].0 {
                j += 1;
            } else {
                product += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }

        product
    }

    /// One-sided cosine similarity: `dot / |self|`, or 0 when either vector
    /// is empty of weight. See the module docs for why the right magnitude
    /// is ignored.
    pub fn similarity(&self, other: &Vector) -> f64 {
        if self.magnitude() == 0.0 || other.magnitude() == 0.0 {
            return 0.0;
        }
        self.dot(other) / self.magnitude()
    }

    /// The flat `[ordinal, value, ordinal, value, ...]` sequence of the
    /// serialized form, values rounded to 3 decimal places.
    pub fn serialize(&self) -> Vec<serde_json::Value> {
        let mut flat = Vec::with_capacity(self.elements.len() * 2);
        for &(index, value) in &self.elements {
            flat.push(serde_json::Value::from(index));
            flat.push(serde_json::Value::from(round3(value)));
        }
        flat
    }
}
