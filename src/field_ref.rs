// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The `field/doc_ref` pair that keys field vectors and match data.

use std::fmt;

use crate::error::{Error, Result};

/// Separator between the field name and document ref in the canonical
/// string form. Field names must not contain it; document refs may.
pub const JOINER: char = '/';

/// A `(document ref, field name)` pair.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FieldRef {
    pub doc_ref: String,
    pub field_name: String,
}

impl FieldRef {
    pub fn new(doc_ref: impl Into<String>, field_name: impl Into<String>) -> Self {
        FieldRef {
            doc_ref: doc_ref.into(),
            field_name: field_name.into(),
        }
    }

    /// Parse the canonical `field/doc_ref` form. The split happens on the
    /// *first* separator only, so document refs containing `/` round-trip.
    pub fn from_string(value: &str) -> Result<Self> {
        let (field_name, doc_ref) =
            value
                .split_once(JOINER)
                .ok_or_else(|| Error::MalformedFieldRef {
                    value: value.to_string(),
                })?;
        Ok(FieldRef::new(doc_ref, field_name))
    }
}

impl fmt::Display for FieldRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.field_name, JOINER, self.doc_ref)
    }
}
