// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! Incremental construction of minimal token sets from sorted words.
//!
//! Words must arrive in strictly increasing lexicographic order. The
//! builder keeps the not-yet-shared tail of the latest word on an
//! "unchecked" stack; when the next word diverges after a common prefix,
//! everything below the divergence point is minimized: each popped node is
//! keyed by its structural signature, and the parent edge is re-pointed at
//! an existing equivalent node when one is known. Spliced-out nodes stay in
//! the arena unreachably, which costs memory, not correctness.

use std::collections::HashMap;

use crate::error::{Error, Result};
use crate::token_set::TokenSet;

struct UncheckedNode {
    parent: usize,
    label: char,
    child: usize,
}

/// Builds a minimal [`TokenSet`] from words inserted in sorted order.
pub struct TokenSetBuilder {
    previous_word: String,
    token_set: TokenSet,
    unchecked_nodes: Vec<UncheckedNode>,
    minimized_nodes: HashMap<String, usize>,
}

impl Default for TokenSetBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenSetBuilder {
    pub fn new() -> Self {
        TokenSetBuilder {
            previous_word: String::new(),
            token_set: TokenSet::new(),
            unchecked_nodes: Vec::new(),
            minimized_nodes: HashMap::new(),
        }
    }

    /// Insert the next word. Fails if it sorts before the previous one.
    pub fn insert(&mut self, word: &str) -> Result<()> {
        if word < self.previous_word.as_str() {
            return Err(Error::OutOfOrderInsertion {
                word: word.to_string(),
                previous: self.previous_word.clone(),
            });
        }

        let chars: Vec<char> = word.chars().collect();
        let previous: Vec<char> = self.previous_word.chars().collect();
        let mut common_prefix = 0;
        for i in 0..chars.len().min(previous.len()) {
            if chars[i] != previous[i] {
                break;
            }
            common_prefix += 1;
        }

        self.minimize(common_prefix);

        let mut node = match self.unchecked_nodes.last() {
            Some(unchecked) => unchecked.child,
            None => 0,
        };

        for &label in &chars[common_prefix..] {
            let child = self.token_set.add_node();
            self.token_set.nodes[node].edges.insert(label, child);
            self.unchecked_nodes.push(UncheckedNode {
                parent: node,
                label,
                child,
            });
            node = child;
        }

        self.token_set.nodes[node].is_final = true;
        self.previous_word = word.to_string();
        Ok(())
    }

    /// Minimize the remaining tail and hand over the automaton.
    pub fn finish(mut self) -> TokenSet {
        self.minimize(0);
        self.token_set
    }

    /// Minimize the unchecked tail down to `down_to` entries.
    fn minimize(&mut self, down_to: usize) {
        while self.unchecked_nodes.len() > down_to {
            let Some(unchecked) = self.unchecked_nodes.pop() else {
                break;
            };
            let key = self.token_set.signature(unchecked.child);
            match self.minimized_nodes.get(&key) {
                Some(&canonical) => {
                    self.token_set.nodes[unchecked.parent]
                        .edges
                        .insert(unchecked.label, canonical);
                }
                None => {
                    self.minimized_nodes.insert(key, unchecked.child);
                }
            }
        }
    }
}
