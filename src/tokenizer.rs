// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Splitting field values into tokens.
//!
//! Offsets recorded in token metadata are **character offsets**, not byte
//! offsets, so positions line up with what other implementations of the
//! index format store for the same text.

use serde_json::Value;

use crate::token::{Metadata, Token};

/// The default separator: whitespace (including the no-break space) and
/// hyphen.
pub fn default_separator(c: char) -> bool {
    c.is_whitespace() || c == '-'
}

/// The string rendering used for non-string field values and document refs:
/// nulls are empty, booleans are `true`/`false`, numbers their decimal form.
pub(crate) fn value_to_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Tokenize a field value with the default separator and no caller metadata.
pub fn tokenize(value: &Value) -> Vec<Token> {
    tokenize_with(value, &Metadata::default(), default_separator)
}

/// Tokenize a field value, cloning `metadata` onto every produced token.
///
/// An array yields one lowercased token per element, skipping the scan. Any
/// scalar is rendered to a string, lowercased, and split on `is_separator`
/// characters; each token carries `position` and `index` metadata, overlaid
/// with the caller's (the caller wins on collision). Null yields no tokens.
pub fn tokenize_with(
    value: &Value,
    metadata: &Metadata,
    is_separator: impl Fn(char) -> bool,
) -> Vec<Token> {
    if value.is_null() {
        return Vec::new();
    }

    if let Value::Array(elements) = value {
        return elements
            .iter()
            .map(|element| Token::new(value_to_string(element).to_lowercase(), metadata.clone()))
            .collect();
    }

    let string = value_to_string(value).to_lowercase();
    let chars: Vec<char> = string.chars().collect();
    let mut tokens: Vec<Token> = Vec::new();
    let mut slice_start = 0;

    for slice_end in 0..=chars.len() {
        if slice_end == chars.len() || is_separator(chars[slice_end]) {
            let slice_length = slice_end - slice_start;
            if slice_length > 0 {
                let mut token_metadata = Metadata {
                    position: Some([slice_start, slice_length]),
                    index: Some(tokens.len()),
                    ..Metadata::default()
                };
                token_metadata.overlay(metadata);
                tokens.push(Token::new(
                    chars[slice_start..slice_end].iter().collect::<String>(),
                    token_metadata,
                ));
            }
            slice_start = slice_end + 1;
        }
    }

    tokens
}
