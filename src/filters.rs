// Copyright 2025-present Harīṣh Tummalachērla
// SPDX-License-Identifier: Apache-2.0

//! The built-in pipeline functions.
//!
//! Three stages make up the default build pipeline: the trimmer strips
//! punctuation from token edges, the stop word filter drops the usual
//! English noise words, and the stemmer reduces words to their Snowball
//! stems. The search pipeline runs the stemmer alone, so query terms meet
//! the vocabulary in the same stemmed space.
//!
//! Labels (`trimmer`, `stopWordFilter`, `stemmer`) are shared with other
//! implementations of the serialized index format, so an index built here
//! loads elsewhere and vice versa.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};

use crate::pipeline::PipelineFunction;
use crate::token::Token;

/// Leading and trailing non-word characters around the inner run.
static TRIM_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\W*?([^\W]+)\W*?$").unwrap());

static STEMMER: LazyLock<Stemmer> = LazyLock::new(|| Stemmer::create(Algorithm::English));

/// The standard English stop word list.
pub const STOP_WORDS: [&str; 119] = [
    "a", "able", "about", "across", "after", "all", "almost", "also", "am", "among", "an", "and",
    "any", "are", "as", "at", "be", "because", "been", "but", "by", "can", "cannot", "could",
    "dear", "did", "do", "does", "either", "else", "ever", "every", "for", "from", "get", "got",
    "had", "has", "have", "he", "her", "hers", "him", "his", "how", "however", "i", "if", "in",
    "into", "is", "it", "its", "just", "least", "let", "like", "likely", "may", "me", "might",
    "most", "must", "my", "neither", "no", "nor", "not", "of", "off", "often", "on", "only", "or",
    "other", "our", "own", "rather", "said", "say", "says", "she", "should", "since", "so", "some",
    "than", "that", "the", "their", "them", "then", "there", "these", "they", "this", "tis", "to",
    "too", "twas", "us", "wants", "was", "we", "were", "what", "when", "where", "which", "while",
    "who", "whom", "why", "will", "with", "would", "yet", "you", "your",
];

static STOP_WORD_SET: LazyLock<HashSet<&'static str>> =
    LazyLock::new(|| STOP_WORDS.iter().copied().collect());

fn trim_token(mut token: Token, _index: usize, _tokens: &[Token]) -> Vec<Token> {
    token.update(|string, _| match TRIM_RE.captures(string) {
        Some(captures) => captures[1].to_string(),
        None => string.to_string(),
    });
    vec![token]
}

fn filter_stop_words(token: Token, _index: usize, _tokens: &[Token]) -> Vec<Token> {
    if STOP_WORD_SET.contains(token.as_str()) {
        Vec::new()
    } else {
        vec![token]
    }
}

fn stem_token(mut token: Token, _index: usize, _tokens: &[Token]) -> Vec<Token> {
    token.update(|string, _| STEMMER.stem(string).into_owned());
    vec![token]
}

/// Strips leading and trailing non-word characters, keeping any inner run.
pub fn trimmer() -> PipelineFunction {
    PipelineFunction::new("trimmer", trim_token)
}

/// Drops tokens on the English stop word list.
pub fn stop_word_filter() -> PipelineFunction {
    PipelineFunction::new("stopWordFilter", filter_stop_words)
}

/// Reduces tokens to their Snowball English stems.
pub fn stemmer() -> PipelineFunction {
    PipelineFunction::new("stemmer", stem_token)
}

/// Everything the registry is seeded with.
pub(crate) fn builtin_functions() -> Vec<PipelineFunction> {
    vec![trimmer(), stop_word_filter(), stemmer()]
}
