// Lexical similarity between two topic labels.
//
// Plain Jaccard over "significant" words: lower-cased, whitespace-split,
// longer than three characters. Short words ("the", "and", "for", "API")
// carry almost no topical signal in 3-5 word labels, so they're ignored.
//
//   score = |W1 ∩ W2| / |W1 ∪ W2|
//
// 0.0 when either side has no significant words, 1.0 for identical word sets.

use std::collections::HashSet;

/// Words this short or shorter are not counted.
const MIN_SIGNIFICANT_LEN: usize = 3;

/// Compute the similarity of two topic strings, from 0.0 to 1.0.
pub fn score(topic_a: &str, topic_b: &str) -> f64 {
    let words_a = significant_words(topic_a);
    let words_b = significant_words(topic_b);

    if words_a.is_empty() || words_b.is_empty() {
        return 0.0;
    }

    let common = words_a.intersection(&words_b).count();
    let total = words_a.union(&words_b).count();

    common as f64 / total as f64
}

/// The set of lower-cased words longer than `MIN_SIGNIFICANT_LEN` characters.
pub fn significant_words(topic: &str) -> HashSet<String> {
    topic
        .to_lowercase()
        .split_whitespace()
        .filter(|w| w.chars().count() > MIN_SIGNIFICANT_LEN)
        .map(str::to_string)
        .collect()
}
