// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The programmatic query model.
//!
//! A query is a list of clauses; a clause is a term plus everything that
//! controls how the term matches: the fields in scope, a boost, a fuzzy
//! edit budget, wildcard placement, whether the search pipeline applies,
//! and the term's presence requirement. [`crate::Index::search`] builds
//! queries from the query language; building them here directly skips the
//! parsing and gives access to the same knobs.

use std::ops::BitOr;

use crate::token::Token;
use crate::token_set::WILDCARD;

/// What a clause demands of the documents it matches.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Presence {
    /// The term contributes to scoring but is not required.
    #[default]
    Optional,
    /// Documents must match the clause in at least one of its fields.
    Required,
    /// Documents matching the term are excluded.
    Prohibited,
}

/// Automatic wildcard placement for a clause's term, combinable with `|`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Wildcard(u8);

impl Wildcard {
    pub const NONE: Wildcard = Wildcard(0);
    pub const LEADING: Wildcard = Wildcard(1);
    pub const TRAILING: Wildcard = Wildcard(2);

    pub fn contains(self, other: Wildcard) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Wildcard {
    type Output = Wildcard;

    fn bitor(self, rhs: Wildcard) -> Wildcard {
        Wildcard(self.0 | rhs.0)
    }
}

/// One atom of a query.
///
/// Construct with struct update syntax for anything beyond the defaults:
///
/// ```
/// use noctua::{Clause, Presence};
///
/// let clause = Clause {
///     term: "plant".to_string(),
///     boost: 10.0,
///     presence: Presence::Required,
///     ..Clause::default()
/// };
/// # assert_eq!(clause.term, "plant");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Clause {
    pub term: String,
    /// Fields the clause is scoped to; empty means "all fields", resolved
    /// when the clause is added to a query.
    pub fields: Vec<String>,
    /// Damerau-Levenshtein budget for fuzzy matching.
    pub edit_distance: usize,
    /// Whether the term runs through the search pipeline before vocabulary
    /// expansion. Forced off by the parser for wildcarded terms.
    pub use_pipeline: bool,
    pub boost: f64,
    pub wildcard: Wildcard,
    pub presence: Presence,
}

impl Default for Clause {
    fn default() -> Self {
        Clause {
            term: String::new(),
            fields: Vec::new(),
            edit_distance: 0,
            use_pipeline: true,
            boost: 1.0,
            wildcard: Wildcard::NONE,
            presence: Presence::Optional,
        }
    }
}

impl Clause {
    pub fn new(term: impl Into<String>) -> Self {
        Clause {
            term: term.into(),
            ..Clause::default()
        }
    }
}

/// A query: clauses plus the full field list of the index it targets.
#[derive(Debug, Clone, PartialEq)]
pub struct Query {
    pub clauses: Vec<Clause>,
    pub all_fields: Vec<String>,
}

impl Query {
    pub fn new(all_fields: Vec<String>) -> Self {
        Query {
            clauses: Vec::new(),
            all_fields,
        }
    }

    /// Add a clause, filling in defaults: an empty field list becomes all
    /// fields, and the wildcard mask prepends/appends `*` where the term
    /// does not already carry one.
    pub fn clause(&mut self, mut clause: Clause) -> &mut Self {
        if clause.fields.is_empty() {
            clause.fields = self.all_fields.clone();
        }

        if clause.wildcard.contains(Wildcard::LEADING) && !clause.term.starts_with(WILDCARD) {
            clause.term.insert(0, WILDCARD);
        }
        if clause.wildcard.contains(Wildcard::TRAILING) && !clause.term.ends_with(WILDCARD) {
            clause.term.push(WILDCARD);
        }

        self.clauses.push(clause);
        self
    }

    /// Add a default clause for a term, used as is.
    pub fn term(&mut self, term: impl Into<String>) -> &mut Self {
        self.clause(Clause::new(term))
    }

    /// Add a clause for a term with every other knob taken from `template`.
    pub fn term_with(&mut self, term: impl Into<String>, template: &Clause) -> &mut Self {
        self.clause(Clause {
            term: term.into(),
            ..template.clone()
        })
    }

    /// Add one clause per token, each shaped by `template`.
    pub fn tokens<'a>(
        &mut self,
        tokens: impl IntoIterator<Item = &'a Token>,
        template: &Clause,
    ) -> &mut Self {
        for token in tokens {
            self.term_with(token.as_str(), template);
        }
        self
    }

    /// A negated query - every clause prohibited - matches every document
    /// that lacks the prohibited terms, at score zero.
    pub fn is_negated(&self) -> bool {
        self.clauses
            .iter()
            .all(|clause| clause.presence == Presence::Prohibited)
    }
}
