//! Whole-index properties over randomized corpora.

use noctua::{build, Document, Index};
use proptest::prelude::*;

// ============================================================================
// STRATEGIES
// ============================================================================

/// Small-alphabet words so random documents actually share vocabulary.
/// No English stop word can be spelled with only a-d, so nothing here is
/// silently dropped by the build pipeline.
fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-d]{2,5}").unwrap()
}

fn text_strategy() -> impl Strategy<Value = String> {
    prop::collection::vec(word_strategy(), 1..12).prop_map(|words| words.join(" "))
}

/// A corpus of 1-6 single-field documents.
fn corpus_strategy() -> impl Strategy<Value = Vec<Document>> {
    prop::collection::vec(text_strategy(), 1..6).prop_map(|texts| {
        texts
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let mut doc = Document::new();
                doc.insert("id".to_string(), serde_json::Value::from(i.to_string()));
                doc.insert("body".to_string(), serde_json::Value::from(text));
                doc
            })
            .collect()
    })
}

fn build_index(corpus: &[Document]) -> Index {
    build("id", ["body"], corpus).expect("random corpus builds")
}

proptest! {
    /// The vocabulary and the token set accept exactly the same words.
    #[test]
    fn prop_vocabulary_equals_automaton_language(corpus in corpus_strategy()) {
        let index = build_index(&corpus);
        let mut accepted = index.token_set().to_list();
        accepted.sort();
        let vocabulary: Vec<String> = index.inverted_index().keys().cloned().collect();
        prop_assert_eq!(accepted, vocabulary);
    }

    /// Term ordinals are dense: a permutation of 0..vocabulary size.
    #[test]
    fn prop_term_ordinals_are_dense(corpus in corpus_strategy()) {
        let index = build_index(&corpus);
        let mut ordinals: Vec<usize> = index
            .inverted_index()
            .values()
            .map(|posting| posting.term_ordinal)
            .collect();
        ordinals.sort_unstable();
        let expected: Vec<usize> = (0..index.inverted_index().len()).collect();
        prop_assert_eq!(ordinals, expected);
    }

    /// Every document surfaces for every term its body contains.
    #[test]
    fn prop_every_indexed_word_is_findable(corpus in corpus_strategy()) {
        let index = build_index(&corpus);
        for (i, doc) in corpus.iter().enumerate() {
            let body = doc["body"].as_str().unwrap();
            for word in body.split(' ') {
                let results = index.search(word).unwrap();
                prop_assert!(
                    results.iter().any(|r| r.doc_ref == i.to_string()),
                    "document {i} not found for its own word {word:?}"
                );
            }
        }
    }

    /// Results come back in non-increasing score order.
    #[test]
    fn prop_results_sorted_by_score(corpus in corpus_strategy(), query in word_strategy()) {
        let index = build_index(&corpus);
        let results = index.search(&query).unwrap();
        for window in results.windows(2) {
            prop_assert!(window[0].score >= window[1].score);
        }
    }

    /// Serialize → load preserves result sets and scores (to the rounding
    /// tolerance) for arbitrary single-term queries.
    #[test]
    fn prop_round_trip_preserves_search(corpus in corpus_strategy(), query in word_strategy()) {
        let index = build_index(&corpus);
        let reloaded = Index::load(&index.serialize().to_string()).unwrap();

        let before = index.search(&query).unwrap();
        let after = reloaded.search(&query).unwrap();

        prop_assert_eq!(before.len(), after.len());
        for (b, a) in before.iter().zip(&after) {
            prop_assert_eq!(&b.doc_ref, &a.doc_ref);
            prop_assert!((b.score - a.score).abs() < 1e-2);
        }
    }

    /// A prohibited-only query returns exactly the complement of the
    /// matching set, scored zero.
    #[test]
    fn prop_negated_query_is_complement(corpus in corpus_strategy(), query in word_strategy()) {
        let index = build_index(&corpus);
        let matching: Vec<String> = index
            .search(&query)
            .unwrap()
            .iter()
            .map(|r| r.doc_ref.clone())
            .collect();
        let negated = index.search(&format!("-{query}")).unwrap();

        for result in &negated {
            prop_assert!(!matching.contains(&result.doc_ref));
            prop_assert_eq!(result.score, 0.0);
        }
        prop_assert_eq!(negated.len(), corpus.len() - matching.len());
    }
}
