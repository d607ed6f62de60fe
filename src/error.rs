// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Everything that can go wrong, as one enum.
//!
//! Errors are raised by the component that detects them and propagate
//! unchanged; nothing in this crate catches and rewraps another component's
//! error. Malformed *documents* are deliberately not represented here - a
//! missing or null field is tolerated during indexing so one bad record
//! never sinks a corpus build.

use std::fmt;

/// Error type covering configuration, query parsing, index loading and
/// internal invariant violations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// A field name registered on the builder contains the reserved `/`
    /// separator.
    IllegalFieldName { name: String },
    /// A query was scoped to fields the index does not carry.
    UnknownFields {
        fields: Vec<String>,
        available: Vec<String>,
    },
    /// No stemmer is registered for this language code.
    UnknownLanguage { code: String },
    /// A document is missing its reference field.
    MissingDocumentRef { ref_field: String },
    /// The query string violates the query grammar.
    QueryParse { message: String },
    /// A serialized pipeline names a label absent from the registry.
    UnregisteredFunction { label: String },
    /// A pipeline edit anchored on a function not present in the stack.
    AnchorNotFound { label: String },
    /// The serialized index does not match the expected schema.
    MalformedIndex { reason: String },
    /// `Vector::insert` hit an ordinal that is already occupied.
    DuplicateIndex { index: usize },
    /// A field-ref string without the `/` separator.
    MalformedFieldRef { value: String },
    /// Words were fed to the token-set builder out of lexicographic order.
    OutOfOrderInsertion { word: String, previous: String },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::IllegalFieldName { name } => {
                write!(f, "field {:?} contains illegal character '/'", name)
            }
            Error::UnknownFields { fields, available } => {
                write!(
                    f,
                    "unknown fields [{}], index has [{}]",
                    fields.join(", "),
                    available.join(", ")
                )
            }
            Error::UnknownLanguage { code } => {
                write!(f, "no stemmer registered for language {:?}", code)
            }
            Error::MissingDocumentRef { ref_field } => {
                write!(f, "document has no {:?} reference field", ref_field)
            }
            Error::QueryParse { message } => write!(f, "query parse error: {}", message),
            Error::UnregisteredFunction { label } => {
                write!(f, "cannot load unregistered pipeline function {:?}", label)
            }
            Error::AnchorNotFound { label } => {
                write!(f, "pipeline function {:?} is not in the stack", label)
            }
            Error::MalformedIndex { reason } => {
                write!(f, "malformed serialized index: {}", reason)
            }
            Error::DuplicateIndex { index } => {
                write!(f, "duplicate index {} in vector", index)
            }
            Error::MalformedFieldRef { value } => {
                write!(f, "malformed field ref string {:?}", value)
            }
            Error::OutOfOrderInsertion { word, previous } => {
                write!(
                    f,
                    "out of order word insertion: {:?} after {:?}",
                    word, previous
                )
            }
        }
    }
}

impl std::error::Error for Error {}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
