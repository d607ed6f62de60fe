//! In-memory full-text search with BM25 scoring, wildcards and fuzzy
//! matching.
//!
//! Documents go in as field → text records; what comes out is an immutable,
//! serializable [`Index`] answering free-text queries with ranked,
//! metadata-carrying results. The query language supports fielded terms
//! (`title:plant`), trailing/leading wildcards (`pl*`), fuzzy matching
//! (`plont~1`), boosts (`plant^10`) and presence operators (`+required`,
//! `-prohibited`).
//!
//! # Architecture
//!
//! ```text
//! ┌───────────┐    ┌──────────┐    ┌───────────┐    ┌───────────┐
//! │ tokenizer │───▶│ pipeline │───▶│  builder  │───▶│   index   │
//! │ (Token)   │    │ (stems,  │    │ (BM25     │    │ (query    │
//! │           │    │  stops)  │    │  vectors) │    │  engine)  │
//! └───────────┘    └──────────┘    └───────────┘    └───────────┘
//!                                        │                │
//!                                        ▼                ▼
//!                                  ┌───────────┐    ┌───────────┐
//!                                  │ token_set │    │ query /   │
//!                                  │ (minimal  │    │ lexer /   │
//!                                  │  DFA)     │    │ parser    │
//!                                  └───────────┘    └───────────┘
//! ```
//!
//! The vocabulary lives twice: as the inverted index (term → postings) and
//! as a minimal DFA ([`TokenSet`]). Query terms become automata too -
//! wildcards self-loop, fuzzy terms accept everything within the edit
//! budget - and vocabulary expansion is automaton intersection.
//!
//! # Usage
//!
//! ```
//! use serde_json::json;
//!
//! let documents: Vec<noctua::Document> = [
//!     json!({ "id": "a", "title": "Grow lights", "body": "Green plants need light" }),
//!     json!({ "id": "b", "title": "Watering", "body": "Water your plants weekly" }),
//! ]
//! .into_iter()
//! .map(|doc| match doc {
//!     serde_json::Value::Object(map) => map,
//!     _ => unreachable!(),
//! })
//! .collect();
//!
//! let index = noctua::build("id", ["title", "body"], &documents)?;
//!
//! let results = index.search("plant")?;
//! assert_eq!(results.len(), 2);
//!
//! let serialized = index.serialize().to_string();
//! let reloaded = noctua::Index::load(&serialized)?;
//! assert_eq!(reloaded.search("plant")?.len(), 2);
//! # Ok::<(), noctua::Error>(())
//! ```
//!
//! # Concurrency
//!
//! A built [`Index`] is plain data: share it behind an `Arc` and search
//! from as many threads as you like. A [`Builder`] is single-owner. The
//! only process-wide state is the pipeline function registry, which is
//! insert-mostly and lock-protected.

mod builder;
mod doc_set;
mod error;
mod field_ref;
mod filters;
mod index;
mod inverted;
mod lang;
mod match_data;
mod pipeline;
mod query;
mod query_lexer;
mod query_parser;
mod scoring;
mod serialization;
mod token;
mod token_set;
mod token_set_builder;
mod tokenizer;
mod vector;

pub use builder::{
    build, build_for_language, builder_for_language, default_builder, BuildAttributes, Builder,
    Document, DocumentEntry, FieldConfig, FieldExtractor,
};
pub use doc_set::DocSet;
pub use error::{Error, Result};
pub use field_ref::FieldRef;
pub use filters::{stemmer, stop_word_filter, trimmer, STOP_WORDS};
pub use index::{Index, SearchResult};
pub use inverted::{FieldPostings, InvertedIndex, Posting, TermMetadata};
pub use lang::{language_stemmer, SUPPORTED_LANGUAGES};
pub use match_data::MatchData;
pub use pipeline::{Pipeline, PipelineFunction};
pub use query::{Clause, Presence, Query, Wildcard};
pub use query_lexer::{Lexeme, LexemeKind};
pub use scoring::{bm25_weight, inverse_document_frequency};
pub use serialization::INDEX_VERSION;
pub use token::{Metadata, Token};
pub use token_set::{TokenSet, WILDCARD};
pub use token_set_builder::TokenSetBuilder;
pub use tokenizer::{default_separator, tokenize, tokenize_with};
pub use vector::Vector;
