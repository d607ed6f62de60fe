// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Token sets: minimal DFAs over vocabulary strings.
//!
//! A token set stores the unique vocabulary of an index as a minimal
//! automaton with shared prefixes and suffixes. The same structure
//! represents incoming query patterns - a plain term is a chain, a `*`
//! becomes a self-loop, a fuzzy term becomes an automaton accepting every
//! string within the edit budget. Intersecting a query automaton with the
//! index automaton yields exactly the vocabulary terms the clause can
//! match, which are then looked up in the inverted index.
//!
//! Nodes live in an arena owned by their automaton and refer to each other
//! by slot, so a built index is plain `Send + Sync` data. Construction and
//! intersection are explicit work-list loops; none of the algorithms here
//! recurse, so deep automata cannot blow the control stack.
//!
//! # INVARIANTS (DO NOT VIOLATE)
//!
//! 1. **ROOT_IS_SLOT_ZERO**: slot 0 is the root of every automaton
//! 2. **EDGES_STAY_INTERNAL**: edges only target slots of the same arena
//! 3. **FINITE_ENUMERATION**: [`TokenSet::to_list`] is only called on
//!    automata built from finite word lists (wildcard self-loops never
//!    terminate)

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::error::Result;
use crate::query::Clause;
use crate::token_set_builder::TokenSetBuilder;

/// The wildcard edge label: matches any run of characters.
pub const WILDCARD: char = '*';

/// Process-wide node id counter. Ids only break ties in minimization
/// signatures, but they must never repeat within an automaton, and a global
/// counter is the cheapest way to guarantee that across builders.
static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(1);

/// One DFA state: a final flag and labeled edges to sibling slots.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) is_final: bool,
    pub(crate) id: u64,
    /// Sorted by label, which is also the order signatures are built in.
    pub(crate) edges: BTreeMap<char, usize>,
}

impl Node {
    fn new() -> Self {
        Node {
            is_final: false,
            id: NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed),
            edges: BTreeMap::new(),
        }
    }
}

/// A set of strings, represented as a minimal finite state automaton over
/// characters plus the [`WILDCARD`].
#[derive(Debug, Clone)]
pub struct TokenSet {
    pub(crate) nodes: Vec<Node>,
}

impl Default for TokenSet {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenSet {
    /// An automaton accepting nothing: just a non-final root.
    pub fn new() -> Self {
        TokenSet {
            nodes: vec![Node::new()],
        }
    }

    pub(crate) fn add_node(&mut self) -> usize {
        self.nodes.push(Node::new());
        self.nodes.len() - 1
    }

    /// The edge target for `label` out of `node`, created on demand.
    fn edge_or_insert(&mut self, node: usize, label: char) -> usize {
        if let Some(&target) = self.nodes[node].edges.get(&label) {
            return target;
        }
        let target = self.add_node();
        self.nodes[node].edges.insert(label, target);
        target
    }

    /// An automaton accepting exactly `string`, where any `*` in the string
    /// self-loops and thereby matches zero or more characters.
    pub fn from_string(string: &str) -> TokenSet {
        let mut set = TokenSet::new();
        let chars: Vec<char> = string.chars().collect();
        let mut node = 0;

        for (i, &ch) in chars.iter().enumerate() {
            let is_final = i == chars.len() - 1;
            if ch == WILDCARD {
                set.nodes[node].edges.insert(ch, node);
                set.nodes[node].is_final = is_final;
            } else {
                let next = set.add_node();
                set.nodes[next].is_final = is_final;
                set.nodes[node].edges.insert(ch, next);
                node = next;
            }
        }

        set
    }

    /// An automaton accepting every word within Damerau-Levenshtein
    /// distance `edit_distance` of `string` - insertions, deletions,
    /// substitutions and adjacent transpositions each cost one edit.
    ///
    /// Construction cost grows steeply with the budget; callers are advised
    /// to keep `edit_distance` below 3.
    pub fn from_fuzzy_string(string: &str, edit_distance: usize) -> TokenSet {
        struct Frame {
            node: usize,
            edits_remaining: usize,
            rest: Vec<char>,
        }

        let mut set = TokenSet::new();
        let mut stack = vec![Frame {
            node: 0,
            edits_remaining: edit_distance,
            rest: string.chars().collect(),
        }];

        while let Some(frame) = stack.pop() {
            // consume one character without spending an edit
            if !frame.rest.is_empty() {
                let ch = frame.rest[0];
                let no_edit_node = set.edge_or_insert(frame.node, ch);
                if frame.rest.len() == 1 {
                    set.nodes[no_edit_node].is_final = true;
                }
                stack.push(Frame {
                    node: no_edit_node,
                    edits_remaining: frame.edits_remaining,
                    rest: frame.rest[1..].to_vec(),
                });
            }

            if frame.edits_remaining == 0 {
                continue;
            }

            // insertion: accept any one extra character
            let insertion_node = set.edge_or_insert(frame.node, WILDCARD);
            if frame.rest.is_empty() {
                set.nodes[insertion_node].is_final = true;
            }
            stack.push(Frame {
                node: insertion_node,
                edits_remaining: frame.edits_remaining - 1,
                rest: frame.rest.clone(),
            });

            // deletion: skip one remaining character
            if frame.rest.len() > 1 {
                stack.push(Frame {
                    node: frame.node,
                    edits_remaining: frame.edits_remaining - 1,
                    rest: frame.rest[1..].to_vec(),
                });
            }

            // deletion of the last remaining character
            if frame.rest.len() == 1 {
                set.nodes[frame.node].is_final = true;
            }

            // substitution: any one character in place of the next
            if !frame.rest.is_empty() {
                let substitution_node = set.edge_or_insert(frame.node, WILDCARD);
                if frame.rest.len() == 1 {
                    set.nodes[substitution_node].is_final = true;
                }
                stack.push(Frame {
                    node: substitution_node,
                    edits_remaining: frame.edits_remaining - 1,
                    rest: frame.rest[1..].to_vec(),
                });
            }

            // transposition of the next two characters
            if frame.rest.len() > 1 {
                let char_a = frame.rest[0];
                let char_b = frame.rest[1];
                let transpose_node = set.edge_or_insert(frame.node, char_b);
                let mut rest = Vec::with_capacity(frame.rest.len() - 1);
                rest.push(char_a);
                rest.extend_from_slice(&frame.rest[2..]);
                stack.push(Frame {
                    node: transpose_node,
                    edits_remaining: frame.edits_remaining - 1,
                    rest,
                });
            }
        }

        set
    }

    /// A minimal automaton accepting exactly the given words, which must be
    /// sorted and duplicate-free.
    pub fn from_list<S: AsRef<str>>(words: impl IntoIterator<Item = S>) -> Result<TokenSet> {
        let mut builder = TokenSetBuilder::new();
        for word in words {
            builder.insert(word.as_ref())?;
        }
        Ok(builder.finish())
    }

    /// The automaton for one query clause: fuzzy when the clause carries an
    /// edit budget, an exact (possibly wildcarded) chain otherwise.
    pub fn from_clause(clause: &Clause) -> TokenSet {
        if clause.edit_distance > 0 {
            Self::from_fuzzy_string(&clause.term, clause.edit_distance)
        } else {
            Self::from_string(&clause.term)
        }
    }

    /// Enumerate the accepted words. Only valid on finite automata; see the
    /// module invariants.
    pub fn to_list(&self) -> Vec<String> {
        let mut words = Vec::new();
        let mut stack = vec![(String::new(), 0usize)];

        while let Some((prefix, node)) = stack.pop() {
            let state = &self.nodes[node];
            if state.is_final {
                words.push(prefix.clone());
            }
            for (&label, &target) in &state.edges {
                let mut next = prefix.clone();
                next.push(label);
                stack.push((next, target));
            }
        }

        words
    }

    /// Whether the automaton accepts `word` - a straight walk, since every
    /// non-wildcard state is deterministic. Wildcard self-loops are taken
    /// only when no literal edge matches, which is all the vocabulary
    /// automata this is used with need.
    #[cfg(test)]
    pub(crate) fn accepts(&self, word: &str) -> bool {
        let mut node = 0;
        for ch in word.chars() {
            match self.nodes[node].edges.get(&ch) {
                Some(&target) => node = target,
                None => match self.nodes[node].edges.get(&WILDCARD) {
                    Some(&target) => node = target,
                    None => return false,
                },
            }
        }
        self.nodes[node].is_final
    }

    /// Intersect with another automaton. Output edges take their labels
    /// from `self`, so intersecting a vocabulary set with a wildcarded
    /// query set yields concrete vocabulary words only.
    pub fn intersect(&self, other: &TokenSet) -> TokenSet {
        let mut output = TokenSet::new();
        let mut stack = vec![(0usize, 0usize, 0usize)];

        while let Some((node, q_node, out_node)) = stack.pop() {
            for (&q_edge, &q_target) in &other.nodes[q_node].edges {
                for (&n_edge, &n_target) in &self.nodes[node].edges {
                    if n_edge == q_edge || q_edge == WILDCARD {
                        let is_final =
                            self.nodes[n_target].is_final && other.nodes[q_target].is_final;
                        let next = match output.nodes[out_node].edges.get(&n_edge) {
                            Some(&existing) => {
                                output.nodes[existing].is_final |= is_final;
                                existing
                            }
                            None => {
                                let created = output.add_node();
                                output.nodes[created].is_final = is_final;
                                output.nodes[out_node].edges.insert(n_edge, created);
                                created
                            }
                        };
                        stack.push((n_target, q_target, next));
                    }
                }
            }
        }

        output
    }

    /// Structural signature of a node, used by the list builder to detect
    /// equivalent suffixes: the final flag, then each edge label followed by
    /// its target's id, in label order.
    pub(crate) fn signature(&self, node: usize) -> String {
        let state = &self.nodes[node];
        let mut signature = String::from(if state.is_final { "1" } else { "0" });
        for (&label, &target) in &state.edges {
            signature.push(label);
            signature.push_str(&self.nodes[target].id.to_string());
        }
        signature
    }
}
