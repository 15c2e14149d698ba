#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Counting and ranking of distinct tokens ("entities").
//!
//! Everything here is generic over the token type so the same routines rank
//! hashtags, screen names, and n-grams alike.

use std::{
    collections::{BTreeSet, HashMap},
    hash::Hash,
};

use itertools::Itertools;

/// Counts each distinct token.
pub fn count_tokens<T, I>(tokens: I) -> HashMap<T, usize>
where
    T: Eq + Hash,
    I: IntoIterator<Item = T>,
{
    let mut counts = HashMap::new();
    for token in tokens {
        *counts.entry(token).or_insert(0) += 1;
    }
    counts
}

/// Sorts `(token, count)` pairs by count, highest first. Tokens with equal
/// counts are ordered ascending so results are deterministic.
pub fn sort_count_pairs<T: Ord>(pairs: impl IntoIterator<Item = (T, usize)>) -> Vec<(T, usize)> {
    pairs
        .into_iter()
        .sorted_by(|(ta, ca), (tb, cb)| cb.cmp(ca).then_with(|| ta.cmp(tb)))
        .collect()
}

/// Returns the `k` most frequent tokens, most frequent first.
pub fn find_top_k<T, I>(tokens: I, k: usize) -> Vec<T>
where
    T: Eq + Hash + Ord,
    I: IntoIterator<Item = T>,
{
    if k == 0 {
        return Vec::new();
    }

    sort_count_pairs(count_tokens(tokens))
        .into_iter()
        .take(k)
        .map(|(token, _)| token)
        .collect()
}

/// Returns the tokens that occur at least `min_count` times.
pub fn find_min_count<T, I>(tokens: I, min_count: usize) -> BTreeSet<T>
where
    T: Eq + Hash + Ord,
    I: IntoIterator<Item = T>,
{
    count_tokens(tokens)
        .into_iter()
        .filter(|(_, count)| *count >= min_count)
        .map(|(token, _)| token)
        .collect()
}

/// Augmented term frequency of a term seen `freq` times in a document whose
/// most frequent term is seen `max_freq` times.
pub fn augmented_tf(max_freq: usize, freq: usize) -> f64 {
    0.5 + 0.5 * (freq as f64 / max_freq as f64)
}

/// Finds the salient terms of every document: those whose tf-idf score is
/// strictly above `threshold`.
///
/// * `docs`: one token list per document
/// * `threshold`: tf-idf cut-off
///
/// The result holds one set per document, in input order. Empty documents
/// produce empty sets.
pub fn find_salient<T>(docs: &[Vec<T>], threshold: f64) -> Vec<BTreeSet<T>>
where
    T: Eq + Hash + Ord + Clone,
{
    let num_docs = docs.len() as f64;
    let counted: Vec<HashMap<&T, usize>> = docs.iter().map(count_tokens).collect();

    let mut doc_freq: HashMap<&T, usize> = HashMap::new();
    for counts in &counted {
        for term in counts.keys() {
            *doc_freq.entry(*term).or_insert(0) += 1;
        }
    }

    let idf: HashMap<&T, f64> = doc_freq
        .into_iter()
        .map(|(term, df)| (term, (num_docs / df as f64).ln()))
        .collect();

    counted
        .iter()
        .map(|counts| {
            let Some(max_freq) = counts.values().copied().max() else {
                return BTreeSet::new();
            };

            counts
                .iter()
                .filter(|(term, freq)| augmented_tf(max_freq, **freq) * idf[**term] > threshold)
                .map(|(term, _)| T::clone(term))
                .collect()
        })
        .collect()
}
