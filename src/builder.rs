// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Index construction.
//!
//! The builder is configured first - reference field, indexed fields,
//! pipelines, scoring parameters - then fed documents, then consumed by
//! [`Builder::build`], which computes the BM25 field vectors, assembles the
//! vocabulary automaton and emits an immutable [`Index`].
//!
//! Ingestion is tolerant: a document missing a registered field (or
//! carrying `null` there) indexes as empty rather than failing the corpus
//! build. The document *ref* is mandatory, and coerced to its string
//! rendering on the way in.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::field_ref::{FieldRef, JOINER};
use crate::filters;
use crate::index::Index;
use crate::inverted::{InvertedIndex, Posting};
use crate::lang::language_stemmer;
use crate::pipeline::Pipeline;
use crate::scoring::{bm25_weight, inverse_document_frequency, round3};
use crate::token_set_builder::TokenSetBuilder;
use crate::tokenizer::{tokenize, value_to_string};
use crate::vector::Vector;

/// A document: named fields to JSON values. Anything with a string
/// rendering indexes; nested objects are not special-cased.
pub type Document = serde_json::Map<String, Value>;

/// Pulls a field's value out of a document when plain key lookup is not
/// enough.
pub type FieldExtractor = Arc<dyn Fn(&Document) -> Option<Value> + Send + Sync>;

/// Per-document build attributes.
#[derive(Debug, Clone, Copy)]
pub struct BuildAttributes {
    /// Multiplies every term weight of the document.
    pub boost: f64,
}

impl Default for BuildAttributes {
    fn default() -> Self {
        BuildAttributes { boost: 1.0 }
    }
}

/// A registered field: name, boost, optional extractor.
#[derive(Clone)]
struct Field {
    name: String,
    boost: f64,
    extractor: Option<FieldExtractor>,
}

impl std::fmt::Debug for Field {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Field")
            .field("name", &self.name)
            .field("boost", &self.boost)
            .field("extractor", &self.extractor.as_ref().map(|_| "<fn>"))
            .finish()
    }
}

/// Field configuration accepted by the [`build`] front-end.
#[derive(Clone, Default)]
pub struct FieldConfig {
    pub name: String,
    pub boost: f64,
    pub extractor: Option<FieldExtractor>,
}

impl FieldConfig {
    pub fn new(name: impl Into<String>) -> Self {
        FieldConfig {
            name: name.into(),
            boost: 1.0,
            extractor: None,
        }
    }

    pub fn boost(mut self, boost: f64) -> Self {
        self.boost = boost;
        self
    }

    pub fn extractor(
        mut self,
        extractor: impl Fn(&Document) -> Option<Value> + Send + Sync + 'static,
    ) -> Self {
        self.extractor = Some(Arc::new(extractor));
        self
    }
}

impl From<&str> for FieldConfig {
    fn from(name: &str) -> Self {
        FieldConfig::new(name)
    }
}

/// A document plus its build attributes. The `From` impls let [`build`]
/// accept plain documents and `(document, attributes)` pairs alike.
#[derive(Debug, Clone, Default)]
pub struct DocumentEntry {
    pub document: Document,
    pub attributes: BuildAttributes,
}

impl From<Document> for DocumentEntry {
    fn from(document: Document) -> Self {
        DocumentEntry {
            document,
            attributes: BuildAttributes::default(),
        }
    }
}

impl From<&Document> for DocumentEntry {
    fn from(document: &Document) -> Self {
        document.clone().into()
    }
}

impl From<(Document, BuildAttributes)> for DocumentEntry {
    fn from((document, attributes): (Document, BuildAttributes)) -> Self {
        DocumentEntry {
            document,
            attributes,
        }
    }
}

impl From<&(Document, BuildAttributes)> for DocumentEntry {
    fn from(entry: &(Document, BuildAttributes)) -> Self {
        entry.clone().into()
    }
}

/// Accumulates documents and emits an [`Index`].
#[derive(Debug)]
pub struct Builder {
    ref_field: String,
    fields: Vec<Field>,
    /// Runs over documents on their way into the index.
    pub pipeline: Pipeline,
    /// Runs over query terms; serialized with the index.
    pub search_pipeline: Pipeline,
    /// Token metadata keys recorded into the inverted index.
    pub metadata_whitelist: Vec<String>,
    inverted_index: InvertedIndex,
    field_term_frequencies: BTreeMap<String, BTreeMap<String, usize>>,
    field_lengths: BTreeMap<String, usize>,
    documents: BTreeMap<String, BuildAttributes>,
    document_count: usize,
    b: f64,
    k1: f64,
    term_index: usize,
}

impl Default for Builder {
    fn default() -> Self {
        Self::new()
    }
}

impl Builder {
    /// A builder with empty pipelines. [`default_builder`] wires up the
    /// standard English processing.
    pub fn new() -> Self {
        Builder {
            ref_field: "id".to_string(),
            fields: Vec::new(),
            pipeline: Pipeline::new(),
            search_pipeline: Pipeline::new(),
            metadata_whitelist: Vec::new(),
            inverted_index: InvertedIndex::new(),
            field_term_frequencies: BTreeMap::new(),
            field_lengths: BTreeMap::new(),
            documents: BTreeMap::new(),
            document_count: 0,
            b: 0.75,
            k1: 1.2,
            term_index: 0,
        }
    }

    /// Set the document field used as the reference. Set this before adding
    /// documents; changing it mid-corpus gives inconsistent results.
    pub fn ref_field(&mut self, name: impl Into<String>) -> &mut Self {
        self.ref_field = name.into();
        self
    }

    /// Register a field to index. Fails if the name contains `/`, which is
    /// reserved for field-ref strings.
    pub fn field(&mut self, name: &str) -> Result<&mut Self> {
        self.field_with(name, 1.0, None)
    }

    /// Register a field with a boost and an optional extractor.
    pub fn field_with(
        &mut self,
        name: &str,
        boost: f64,
        extractor: Option<FieldExtractor>,
    ) -> Result<&mut Self> {
        if name.contains(JOINER) {
            return Err(Error::IllegalFieldName {
                name: name.to_string(),
            });
        }
        let field = Field {
            name: name.to_string(),
            boost,
            extractor,
        };
        match self.fields.iter_mut().find(|f| f.name == name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        Ok(self)
    }

    /// Tune field length normalization; clamped to `[0, 1]`.
    pub fn b(&mut self, value: f64) -> &mut Self {
        self.b = value.clamp(0.0, 1.0);
        self
    }

    /// Tune term frequency saturation.
    pub fn k1(&mut self, value: f64) -> &mut Self {
        self.k1 = value;
        self
    }

    /// Apply a plugin - any function that wants to reconfigure the builder.
    pub fn use_plugin(&mut self, plugin: impl FnOnce(&mut Builder)) -> &mut Self {
        plugin(self);
        self
    }

    /// Add a document with default attributes.
    pub fn add(&mut self, document: &Document) -> Result<&mut Self> {
        self.add_with(document, BuildAttributes::default())
    }

    /// Add a document with attributes (currently a document boost).
    pub fn add_with(
        &mut self,
        document: &Document,
        attributes: BuildAttributes,
    ) -> Result<&mut Self> {
        let doc_ref = value_to_string(document.get(&self.ref_field).ok_or_else(|| {
            Error::MissingDocumentRef {
                ref_field: self.ref_field.clone(),
            }
        })?);
        self.documents.insert(doc_ref.clone(), attributes);
        self.document_count += 1;

        let field_names: Vec<String> = self.fields.iter().map(|f| f.name.clone()).collect();
        let fields: Vec<(String, Option<FieldExtractor>)> = self
            .fields
            .iter()
            .map(|f| (f.name.clone(), f.extractor.clone()))
            .collect();

        for (field_name, extractor) in fields {
            let field_value = match extractor {
                Some(extract) => extract(document).unwrap_or(Value::Null),
                None => document.get(&field_name).cloned().unwrap_or(Value::Null),
            };
            let tokens = tokenize(&field_value);
            let terms = self.pipeline.run(tokens, Some(&field_name));
            let field_ref = FieldRef::new(doc_ref.clone(), field_name.clone()).to_string();

            self.field_lengths.insert(field_ref.clone(), terms.len());
            let field_terms = self.field_term_frequencies.entry(field_ref).or_default();

            for term in &terms {
                let term_key = term.as_str();
                *field_terms.entry(term_key.to_string()).or_insert(0) += 1;

                if !self.inverted_index.contains_key(term_key) {
                    let posting = Posting::new(self.term_index, field_names.iter().cloned());
                    self.term_index += 1;
                    self.inverted_index.insert(term_key.to_string(), posting);
                }

                let Some(posting) = self.inverted_index.get_mut(term_key) else {
                    continue;
                };
                let occurrences = posting
                    .fields
                    .entry(field_name.clone())
                    .or_default()
                    .entry(doc_ref.clone())
                    .or_default();

                for metadata_key in &self.metadata_whitelist {
                    if let Some(value) = term.metadata.get(metadata_key) {
                        occurrences
                            .entry(metadata_key.clone())
                            .or_default()
                            .push(value);
                    }
                }
            }
        }

        Ok(self)
    }

    /// Per-field average token count over the documents that have the
    /// field. Fields with no coverage at all are left out.
    fn calculate_average_field_lengths(&self) -> Result<BTreeMap<String, f64>> {
        let mut accumulator: BTreeMap<String, usize> = BTreeMap::new();
        let mut documents_with_field: BTreeMap<String, usize> = BTreeMap::new();

        for (field_ref, &length) in &self.field_lengths {
            let field_ref = FieldRef::from_string(field_ref)?;
            *documents_with_field
                .entry(field_ref.field_name.clone())
                .or_insert(0) += 1;
            *accumulator.entry(field_ref.field_name).or_insert(0) += length;
        }

        Ok(accumulator
            .into_iter()
            .map(|(field, total)| {
                let documents = documents_with_field[&field];
                (field, total as f64 / documents as f64)
            })
            .collect())
    }

    /// One BM25-weighted vector per `(document, field)` pair seen during
    /// ingestion.
    fn create_field_vectors(
        &self,
        average_field_length: &BTreeMap<String, f64>,
    ) -> Result<BTreeMap<String, Vector>> {
        let mut field_vectors = BTreeMap::new();
        let mut term_idf_cache: BTreeMap<&str, f64> = BTreeMap::new();

        for (field_ref_string, term_frequencies) in &self.field_term_frequencies {
            let field_ref = FieldRef::from_string(field_ref_string)?;
            let field_length = self
                .field_lengths
                .get(field_ref_string)
                .copied()
                .unwrap_or(0) as f64;
            let field_boost = self
                .fields
                .iter()
                .find(|f| f.name == field_ref.field_name)
                .map_or(1.0, |f| f.boost);
            let doc_boost = self
                .documents
                .get(&field_ref.doc_ref)
                .map_or(1.0, |attributes| attributes.boost);
            let average = average_field_length
                .get(&field_ref.field_name)
                .copied()
                .unwrap_or(0.0);

            let mut vector = Vector::new();
            for (term, &term_frequency) in term_frequencies {
                let Some(posting) = self.inverted_index.get(term) else {
                    continue;
                };
                let idf = *term_idf_cache.entry(term).or_insert_with(|| {
                    inverse_document_frequency(posting, self.document_count)
                });

                let mut score = bm25_weight(
                    idf,
                    term_frequency as f64,
                    self.k1,
                    self.b,
                    field_length,
                    average,
                );
                score *= field_boost;
                score *= doc_boost;

                vector.insert(posting.term_ordinal, round3(score))?;
            }

            field_vectors.insert(field_ref_string.clone(), vector);
        }

        Ok(field_vectors)
    }

    /// Consume the builder and emit the immutable index.
    pub fn build(self) -> Result<Index> {
        let average_field_length = self.calculate_average_field_lengths()?;
        let field_vectors = self.create_field_vectors(&average_field_length)?;

        let mut token_set_builder = TokenSetBuilder::new();
        for term in self.inverted_index.keys() {
            token_set_builder.insert(term)?;
        }
        let token_set = token_set_builder.finish();

        debug!(
            "built index: {} documents, {} terms, {} field vectors",
            self.document_count,
            self.inverted_index.len(),
            field_vectors.len()
        );

        Ok(Index::new(
            self.inverted_index,
            field_vectors,
            token_set,
            self.fields.iter().map(|f| f.name.clone()).collect(),
            self.search_pipeline,
        ))
    }
}

/// The standard English builder: trimmer, stop word filter and stemmer on
/// the build side, stemmer alone on the search side.
pub fn default_builder() -> Builder {
    let mut builder = Builder::new();
    builder
        .pipeline
        .add(filters::trimmer())
        .add(filters::stop_word_filter())
        .add(filters::stemmer());
    builder.search_pipeline.add(filters::stemmer());
    builder
}

/// A builder for another supported language: trimmer plus that language's
/// stemmer (no stop word list is shipped beyond English).
pub fn builder_for_language(code: &str) -> Result<Builder> {
    let stemmer = language_stemmer(code)?;
    let mut builder = Builder::new();
    builder.pipeline.add(filters::trimmer()).add(stemmer.clone());
    builder.search_pipeline.add(stemmer);
    Ok(builder)
}

/// Convenience front-end: configure the default builder with a reference
/// field and fields, add every document (optionally paired with
/// [`BuildAttributes`]), and build.
pub fn build<F: Into<FieldConfig>, D: Into<DocumentEntry>>(
    ref_field: &str,
    fields: impl IntoIterator<Item = F>,
    documents: impl IntoIterator<Item = D>,
) -> Result<Index> {
    build_with(default_builder(), ref_field, fields, documents)
}

/// [`build`], but for one of the other supported languages.
pub fn build_for_language<F: Into<FieldConfig>, D: Into<DocumentEntry>>(
    code: &str,
    ref_field: &str,
    fields: impl IntoIterator<Item = F>,
    documents: impl IntoIterator<Item = D>,
) -> Result<Index> {
    build_with(builder_for_language(code)?, ref_field, fields, documents)
}

fn build_with<F: Into<FieldConfig>, D: Into<DocumentEntry>>(
    mut builder: Builder,
    ref_field: &str,
    fields: impl IntoIterator<Item = F>,
    documents: impl IntoIterator<Item = D>,
) -> Result<Index> {
    builder.ref_field(ref_field);
    for field in fields {
        let config = field.into();
        builder.field_with(&config.name, config.boost, config.extractor)?;
    }
    for document in documents {
        let entry = document.into();
        builder.add_with(&entry.document, entry.attributes)?;
    }
    builder.build()
}
