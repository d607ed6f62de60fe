// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The index, and query execution against it.
//!
//! An [`Index`] is the immutable artifact a [`Builder`](crate::Builder)
//! emits: the inverted index, one BM25 vector per `(document, field)`, the
//! vocabulary automaton, the field list and the search pipeline. It is
//! plain data - clone it, share it across threads, query it concurrently.
//!
//! Query execution walks the clauses in order. Each clause's term is run
//! through the search pipeline (unless disabled), every resulting term is
//! turned into an automaton and intersected with the vocabulary, and the
//! expanded terms' postings feed three accumulators: per-field query
//! vectors for scoring, per-field required/prohibited document sets for
//! presence filtering, and per-`(field, document)` match data. Candidates
//! surviving the presence filter are scored by similarity between the
//! field's query vector and the stored field vector, summed per document
//! across fields.
//!
//! Result order is deterministic: descending score, and candidates are
//! accumulated in sorted field-ref order with a stable sort, so equal
//! scores surface in that order.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use log::warn;
use serde::Serialize;
use serde_json::Value;

use crate::doc_set::DocSet;
use crate::error::{Error, Result};
use crate::field_ref::FieldRef;
use crate::inverted::InvertedIndex;
use crate::match_data::MatchData;
use crate::pipeline::Pipeline;
use crate::query::{Clause, Presence, Query};
use crate::query_parser;
use crate::token::Metadata;
use crate::token_set::TokenSet;
use crate::vector::Vector;

/// One ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResult {
    /// The matching document's reference.
    #[serde(rename = "ref")]
    pub doc_ref: String,
    pub score: f64,
    pub match_data: MatchData,
}

/// The built index of a corpus, ready for querying.
#[derive(Debug, Clone)]
pub struct Index {
    pub(crate) inverted_index: InvertedIndex,
    pub(crate) field_vectors: BTreeMap<String, Vector>,
    pub(crate) token_set: TokenSet,
    pub(crate) fields: Vec<String>,
    pub(crate) pipeline: Pipeline,
}

impl Index {
    pub(crate) fn new(
        inverted_index: InvertedIndex,
        field_vectors: BTreeMap<String, Vector>,
        token_set: TokenSet,
        fields: Vec<String>,
        pipeline: Pipeline,
    ) -> Self {
        Index {
            inverted_index,
            field_vectors,
            token_set,
            fields,
            pipeline,
        }
    }

    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    pub fn inverted_index(&self) -> &InvertedIndex {
        &self.inverted_index
    }

    pub fn field_vectors(&self) -> &BTreeMap<String, Vector> {
        &self.field_vectors
    }

    pub fn token_set(&self) -> &TokenSet {
        &self.token_set
    }

    /// The search-side pipeline.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }

    /// Parse a query string and execute it.
    pub fn search(&self, query_string: &str) -> Result<Vec<SearchResult>> {
        let mut query = Query::new(self.fields.clone());
        query_parser::parse(query_string, &mut query)?;
        self.query(&query)
    }

    /// A query scoped to the given fields (all of them when `None`).
    pub fn create_query(&self, fields: Option<Vec<String>>) -> Result<Query> {
        match fields {
            None => Ok(Query::new(self.fields.clone())),
            Some(fields) => {
                let unknown: Vec<String> = fields
                    .iter()
                    .filter(|field| !self.fields.contains(field))
                    .cloned()
                    .collect();
                if !unknown.is_empty() {
                    return Err(Error::UnknownFields {
                        fields: unknown,
                        available: self.fields.clone(),
                    });
                }
                Ok(Query::new(fields))
            }
        }
    }

    /// Execute a programmatic query.
    pub fn query(&self, query: &Query) -> Result<Vec<SearchResult>> {
        if query.clauses.is_empty() {
            warn!("query with no clauses returns no results");
            return Ok(Vec::new());
        }

        for clause in &query.clauses {
            let unknown: Vec<String> = clause
                .fields
                .iter()
                .filter(|field| !self.fields.contains(field))
                .cloned()
                .collect();
            if !unknown.is_empty() {
                return Err(Error::UnknownFields {
                    fields: unknown,
                    available: self.fields.clone(),
                });
            }
        }

        let mut matching_fields: BTreeMap<String, MatchData> = BTreeMap::new();
        let mut query_vectors: BTreeMap<String, Vector> = self
            .fields
            .iter()
            .map(|field| (field.clone(), Vector::new()))
            .collect();
        let mut term_field_cache: HashSet<String> = HashSet::new();
        let mut required_matches: BTreeMap<String, DocSet> = BTreeMap::new();
        let mut prohibited_matches: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();

        for clause in &query.clauses {
            // Terms with the pipeline enabled may expand into several
            // terms; each one is matched against the vocabulary under the
            // same clause options.
            let terms = if clause.use_pipeline {
                let mut metadata = Metadata::default();
                metadata
                    .extras
                    .insert("fields".to_string(), Value::from(clause.fields.clone()));
                self.pipeline.run_string(&clause.term, metadata)
            } else {
                vec![clause.term.clone()]
            };

            let mut clause_matches = DocSet::empty();

            for term in &terms {
                let term_clause = Clause {
                    term: term.clone(),
                    ..clause.clone()
                };
                let term_token_set = TokenSet::from_clause(&term_clause);
                let expanded_terms = term_token_set.intersect(&self.token_set).to_list();

                if expanded_terms.is_empty() && clause.presence == Presence::Required {
                    // A required term missing from the vocabulary makes the
                    // whole clause impossible; empty out its fields'
                    // required sets and move on to the next clause, which
                    // still runs for its own side effects.
                    for field in &clause.fields {
                        required_matches.insert(field.clone(), DocSet::empty());
                    }
                    break;
                }

                for expanded_term in &expanded_terms {
                    let Some(posting) = self.inverted_index.get(expanded_term) else {
                        continue;
                    };
                    let term_ordinal = posting.term_ordinal;

                    for field in &clause.fields {
                        let Some(field_posting) = posting.fields.get(field) else {
                            continue;
                        };
                        let term_field = format!("{}/{}", expanded_term, field);

                        if clause.presence == Presence::Required {
                            clause_matches.extend(field_posting.keys().cloned());
                            required_matches
                                .entry(field.clone())
                                .or_insert(DocSet::Universe);
                        }

                        if clause.presence == Presence::Prohibited {
                            // No vector contribution and no match data for
                            // prohibited terms.
                            prohibited_matches
                                .entry(field.clone())
                                .or_default()
                                .extend(field_posting.keys().cloned());
                            continue;
                        }

                        if let Some(vector) = query_vectors.get_mut(field) {
                            vector.upsert(term_ordinal, clause.boost, |a, b| a + b);
                        }

                        if term_field_cache.contains(&term_field) {
                            continue;
                        }

                        for (doc_ref, metadata) in field_posting {
                            let field_ref =
                                FieldRef::new(doc_ref.clone(), field.clone()).to_string();
                            match matching_fields.get_mut(&field_ref) {
                                Some(existing) => existing.add(expanded_term, field, metadata),
                                None => {
                                    matching_fields.insert(
                                        field_ref,
                                        MatchData::new(expanded_term, field, metadata.clone()),
                                    );
                                }
                            }
                        }

                        term_field_cache.insert(term_field);
                    }
                }
            }

            // A required clause narrows each of its fields' required sets:
            // a document must match the clause in at least one of its terms
            // in that field.
            if clause.presence == Presence::Required {
                for field in &clause.fields {
                    let entry = required_matches
                        .entry(field.clone())
                        .or_insert(DocSet::Universe);
                    *entry = entry.intersect(&clause_matches);
                }
            }
        }

        let mut all_required = DocSet::Universe;
        let mut all_prohibited: BTreeSet<String> = BTreeSet::new();
        for field in &self.fields {
            if let Some(required) = required_matches.get(field) {
                all_required = all_required.intersect(required);
            }
            if let Some(prohibited) = prohibited_matches.get(field) {
                all_prohibited.extend(prohibited.iter().cloned());
            }
        }

        // A fully negated query has collected no matches of its own; every
        // stored field vector is a candidate, carrying blank match data.
        if query.is_negated() {
            for field_ref in self.field_vectors.keys() {
                matching_fields
                    .entry(field_ref.clone())
                    .or_insert_with(MatchData::default);
            }
        }

        let mut results: Vec<SearchResult> = Vec::new();
        let mut result_by_doc: BTreeMap<String, usize> = BTreeMap::new();

        for (field_ref_string, match_data) in matching_fields {
            let field_ref = FieldRef::from_string(&field_ref_string)?;

            if !all_required.contains(&field_ref.doc_ref) {
                continue;
            }
            if all_prohibited.contains(&field_ref.doc_ref) {
                continue;
            }

            let Some(field_vector) = self.field_vectors.get(&field_ref_string) else {
                continue;
            };
            let score = query_vectors
                .get(&field_ref.field_name)
                .map_or(0.0, |query_vector| query_vector.similarity(field_vector));

            match result_by_doc.get(&field_ref.doc_ref) {
                Some(&position) => {
                    results[position].score += score;
                    results[position].match_data.combine(&match_data);
                }
                None => {
                    result_by_doc.insert(field_ref.doc_ref.clone(), results.len());
                    results.push(SearchResult {
                        doc_ref: field_ref.doc_ref,
                        score,
                        match_data,
                    });
                }
            }
        }

        results.sort_by(|a, b| b.score.total_cmp(&a.score));
        Ok(results)
    }
}
