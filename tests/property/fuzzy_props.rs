//! Properties of fuzzy (edit distance) automata.

use noctua::TokenSet;
use proptest::prelude::*;

// ============================================================================
// STRATEGIES
// ============================================================================

/// A small alphabet keeps collision cases frequent.
fn word_strategy() -> impl Strategy<Value = String> {
    prop::string::string_regex("[abc]{1,6}").unwrap()
}

/// Optimal string alignment distance: Levenshtein plus adjacent
/// transpositions. An upper bound on the automaton's edit measure, which
/// is what the containment property needs.
fn osa_distance(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let mut table = vec![vec![0usize; b.len() + 1]; a.len() + 1];

    for (i, row) in table.iter_mut().enumerate() {
        row[0] = i;
    }
    for j in 0..=b.len() {
        table[0][j] = j;
    }

    for i in 1..=a.len() {
        for j in 1..=b.len() {
            let substitution = usize::from(a[i - 1] != b[j - 1]);
            let mut cost = (table[i - 1][j] + 1)
                .min(table[i][j - 1] + 1)
                .min(table[i - 1][j - 1] + substitution);
            if i > 1 && j > 1 && a[i - 1] == b[j - 2] && a[i - 2] == b[j - 1] {
                cost = cost.min(table[i - 2][j - 2] + 1);
            }
            table[i][j] = cost;
        }
    }

    table[a.len()][b.len()]
}

fn accepts(fuzzy: &TokenSet, word: &str) -> bool {
    let candidate = TokenSet::from_string(word);
    let matched = candidate.intersect(fuzzy).to_list();
    matched == [word]
}

proptest! {
    /// Everything within the edit budget is accepted.
    #[test]
    fn prop_fuzzy_contains_the_edit_ball(
        word in word_strategy(),
        candidate in word_strategy(),
        budget in 1usize..=2,
    ) {
        let fuzzy = TokenSet::from_fuzzy_string(&word, budget);
        if osa_distance(&word, &candidate) <= budget {
            prop_assert!(
                accepts(&fuzzy, &candidate),
                "{candidate:?} within {budget} of {word:?} but rejected"
            );
        }
    }

    /// The word itself is always accepted, even at budget zero... via the
    /// exact automaton, which `from_fuzzy_string` degenerates to.
    #[test]
    fn prop_fuzzy_accepts_the_center(word in word_strategy(), budget in 0usize..=2) {
        let fuzzy = TokenSet::from_fuzzy_string(&word, budget);
        prop_assert!(accepts(&fuzzy, &word));
    }

    /// Length can change by at most one per edit, whatever the edits are.
    #[test]
    fn prop_fuzzy_respects_length_bounds(
        word in word_strategy(),
        candidate in word_strategy(),
        budget in 0usize..=2,
    ) {
        let fuzzy = TokenSet::from_fuzzy_string(&word, budget);
        let length_gap = word.chars().count().abs_diff(candidate.chars().count());
        if length_gap > budget {
            prop_assert!(
                !accepts(&fuzzy, &candidate),
                "{candidate:?} differs in length by {length_gap} but was accepted"
            );
        }
    }

    /// Distance-one misspellings of every kind are found through the
    /// vocabulary intersection, the way query execution uses the automaton.
    #[test]
    fn prop_single_edits_are_found(word in prop::string::string_regex("[a-z]{2,6}").unwrap()) {
        let chars: Vec<char> = word.chars().collect();

        // deletion of the first character, insertion at the end, and a
        // transposition of the first two characters
        let deleted: String = chars[1..].iter().collect();
        let inserted: String = format!("{word}x");
        let mut transposed = chars.clone();
        transposed.swap(0, 1);
        let transposed: String = transposed.into_iter().collect();

        let fuzzy = TokenSet::from_fuzzy_string(&word, 1);
        for variant in [deleted, inserted, transposed] {
            prop_assert!(
                accepts(&fuzzy, &variant),
                "single-edit variant {variant:?} of {word:?} rejected"
            );
        }
    }
}
