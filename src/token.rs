// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The unit of text that flows through a pipeline.
//!
//! A [`Token`] is a string plus a metadata bag. The tokenizer stamps every
//! token with its source position and running ordinal; pipeline functions
//! rewrite the string in place through [`Token::update`] and may read the
//! metadata while doing so. Whitelisted metadata keys end up in the inverted
//! index, which is how match positions survive all the way to search
//! results.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

/// Metadata attached to a token: the well-known keys the tokenizer writes,
/// plus an open bag for anything callers layer on top.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Metadata {
    /// `[start_offset, length]` of the token in the source text, in
    /// characters.
    pub position: Option<[usize; 2]>,
    /// Running ordinal of the token within its source value.
    pub index: Option<usize>,
    /// Caller-supplied entries, e.g. the `fields` a query clause is scoped
    /// to.
    pub extras: HashMap<String, Value>,
}

impl Metadata {
    /// Look up a metadata key, resolving the well-known keys first.
    ///
    /// Returns an owned [`Value`] so whitelisted entries can be appended to
    /// the inverted index without further conversion.
    pub fn get(&self, key: &str) -> Option<Value> {
        match key {
            "position" => self
                .position
                .map(|[start, length]| Value::from(vec![start, length])),
            "index" => self.index.map(Value::from),
            _ => self.extras.get(key).cloned(),
        }
    }

    /// Overlay `other` onto `self`; entries in `other` win on collision.
    pub fn overlay(&mut self, other: &Metadata) {
        if other.position.is_some() {
            self.position = other.position;
        }
        if other.index.is_some() {
            self.index = other.index;
        }
        for (key, value) in &other.extras {
            self.extras.insert(key.clone(), value.clone());
        }
    }
}

/// A string carrier with an attached metadata bag.
///
/// Tokens only exist while a document is being indexed or a query executed;
/// what survives is the strings they carry and the whitelisted metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Token {
    string: String,
    pub metadata: Metadata,
}

impl Token {
    pub fn new(string: impl Into<String>, metadata: Metadata) -> Self {
        Token {
            string: string.into(),
            metadata,
        }
    }

    pub fn as_str(&self) -> &str {
        &self.string
    }

    /// Replace the token's string with the result of `f`, which receives the
    /// current string and may consult the metadata.
    pub fn update(&mut self, f: impl FnOnce(&str, &Metadata) -> String) -> &mut Self {
        self.string = f(&self.string, &self.metadata);
        self
    }

    /// Clone the token, transforming the string on the way out. The metadata
    /// bag is copied, so the clone is independent of the original.
    pub fn clone_with(&self, f: impl FnOnce(&str, &Metadata) -> String) -> Token {
        Token {
            string: f(&self.string, &self.metadata),
            metadata: self.metadata.clone(),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.string)
    }
}
