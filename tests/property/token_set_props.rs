//! Properties of token-set construction and intersection.

use noctua::TokenSet;
use proptest::prelude::*;

// ============================================================================
// STRATEGIES
// ============================================================================

fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,8}").unwrap()
}

/// A sorted, duplicate-free vocabulary.
fn vocabulary_strategy() -> impl Strategy<Value = Vec<String>> {
    prop::collection::btree_set(word_strategy(), 1..30)
        .prop_map(|words| words.into_iter().collect())
}

fn sorted(mut words: Vec<String>) -> Vec<String> {
    words.sort();
    words
}

proptest! {
    /// Building from a sorted list and enumerating gives the list back.
    #[test]
    fn prop_from_list_round_trips(words in vocabulary_strategy()) {
        let set = TokenSet::from_list(&words).unwrap();
        prop_assert_eq!(sorted(set.to_list()), words);
    }

    /// A single-word automaton accepts only that word.
    #[test]
    fn prop_from_string_is_a_singleton(word in word_strategy()) {
        let set = TokenSet::from_string(&word);
        prop_assert_eq!(set.to_list(), vec![word]);
    }

    /// Intersection with itself is the identity on the accepted language.
    #[test]
    fn prop_self_intersection_is_identity(words in vocabulary_strategy()) {
        let set = TokenSet::from_list(&words).unwrap();
        prop_assert_eq!(sorted(set.intersect(&set).to_list()), words);
    }

    /// Intersection agrees with set intersection of the vocabularies, and
    /// is commutative when neither side carries a wildcard.
    #[test]
    fn prop_intersection_is_set_intersection(
        a in vocabulary_strategy(),
        b in vocabulary_strategy(),
    ) {
        let set_a = TokenSet::from_list(&a).unwrap();
        let set_b = TokenSet::from_list(&b).unwrap();

        let expected: Vec<String> = a.iter().filter(|w| b.contains(w)).cloned().collect();
        let forward = sorted(set_a.intersect(&set_b).to_list());
        let backward = sorted(set_b.intersect(&set_a).to_list());

        prop_assert_eq!(&forward, &expected);
        prop_assert_eq!(&forward, &backward);
    }

    /// A trailing-wildcard automaton selects exactly the words with that
    /// prefix.
    #[test]
    fn prop_trailing_wildcard_is_prefix_match(
        words in vocabulary_strategy(),
        prefix in prop::string::string_regex("[a-z]{1,3}").unwrap(),
    ) {
        let set = TokenSet::from_list(&words).unwrap();
        let pattern = TokenSet::from_string(&format!("{prefix}*"));
        let expected: Vec<String> = words
            .iter()
            .filter(|w| w.starts_with(&prefix))
            .cloned()
            .collect();
        prop_assert_eq!(sorted(set.intersect(&pattern).to_list()), expected);
    }

    /// A leading-wildcard automaton selects exactly the words with that
    /// suffix.
    #[test]
    fn prop_leading_wildcard_is_suffix_match(
        words in vocabulary_strategy(),
        suffix in prop::string::string_regex("[a-z]{1,3}").unwrap(),
    ) {
        let set = TokenSet::from_list(&words).unwrap();
        let pattern = TokenSet::from_string(&format!("*{suffix}"));
        let expected: Vec<String> = words
            .iter()
            .filter(|w| w.ends_with(&suffix))
            .cloned()
            .collect();
        prop_assert_eq!(sorted(set.intersect(&pattern).to_list()), expected);
    }

    /// Out-of-order insertion always fails.
    #[test]
    fn prop_out_of_order_rejected(words in vocabulary_strategy()) {
        prop_assume!(words.len() >= 2);
        let mut reversed = words.clone();
        reversed.reverse();
        prop_assert!(TokenSet::from_list(&reversed).is_err());
    }
}
