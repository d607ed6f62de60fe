// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Document sets with a universe sentinel.
//!
//! Presence filtering folds per-field match sets with intersection, and the
//! fold needs an identity: a set containing *every* document. Materializing
//! such a set would defeat the point, so the universe is a distinguished
//! variant with the obvious algebra: `Universe ∪ x = Universe`,
//! `Universe ∩ x = x`, and `Universe` contains everything.

use std::collections::BTreeSet;

/// Either every document, or a concrete finite set of document refs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocSet {
    Universe,
    Finite(BTreeSet<String>),
}

impl DocSet {
    /// The empty finite set: the identity of union, the absorbing element
    /// of intersection.
    pub fn empty() -> Self {
        DocSet::Finite(BTreeSet::new())
    }

    pub fn contains(&self, doc_ref: &str) -> bool {
        match self {
            DocSet::Universe => true,
            DocSet::Finite(refs) => refs.contains(doc_ref),
        }
    }

    /// Add concrete refs to the set. The universe absorbs them.
    pub fn extend<I: IntoIterator<Item = String>>(&mut self, refs: I) {
        if let DocSet::Finite(existing) = self {
            existing.extend(refs);
        }
    }

    pub fn union(&self, other: &DocSet) -> DocSet {
        match (self, other) {
            (DocSet::Universe, _) | (_, DocSet::Universe) => DocSet::Universe,
            (DocSet::Finite(a), DocSet::Finite(b)) => {
                DocSet::Finite(a.union(b).cloned().collect())
            }
        }
    }

    pub fn intersect(&self, other: &DocSet) -> DocSet {
        match (self, other) {
            (DocSet::Universe, x) | (x, DocSet::Universe) => x.clone(),
            (DocSet::Finite(a), DocSet::Finite(b)) => {
                DocSet::Finite(a.intersection(b).cloned().collect())
            }
        }
    }
}

impl<S: Into<String>> FromIterator<S> for DocSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        DocSet::Finite(iter.into_iter().map(Into::into).collect())
    }
}
