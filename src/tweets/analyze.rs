#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::collections::BTreeSet;

use serde_json::Value;
use unicode_general_category::{GeneralCategory, get_general_category};

use super::tweet::{EntityDesc, Tweet};
use crate::{
    constants::{KEPT_PUNCTUATION, STOP_PREFIXES, STOP_WORDS},
    counting::{find_min_count, find_salient, find_top_k},
};

/// A sequence of `n` consecutive words.
pub type NGram = Vec<String>;

/// Pulls the requested entity values out of one tweet.
///
/// A tweet without the entity kind contributes nothing. Items that lack a
/// string `subkey` are skipped.
pub fn extract_entities(tweet: &Tweet, desc: &EntityDesc) -> Vec<String> {
    let Some(Value::Array(items)) = tweet.entities.get(&desc.key) else {
        return Vec::new();
    };

    items
        .iter()
        .filter_map(|item| match item.get(&desc.subkey).and_then(Value::as_str) {
            Some(value) => Some(value),
            None => {
                tracing::debug!("`{}` entity without a `{}` string", desc.key, desc.subkey);
                None
            }
        })
        .map(|value| {
            if desc.case_sensitive {
                value.to_string()
            } else {
                value.to_lowercase()
            }
        })
        .collect()
}

/// All entities of the described kind across `tweets`, in tweet order.
fn all_entities(tweets: &[Tweet], desc: &EntityDesc) -> Vec<String> {
    tweets
        .iter()
        .flat_map(|tweet| extract_entities(tweet, desc))
        .collect()
}

/// Finds the `k` most frequently occurring entities.
pub fn find_top_k_entities(tweets: &[Tweet], desc: &EntityDesc, k: usize) -> Vec<String> {
    find_top_k(all_entities(tweets, desc), k)
}

/// Finds the entities that occur at least `min_count` times.
pub fn find_min_count_entities(
    tweets: &[Tweet],
    desc: &EntityDesc,
    min_count: usize,
) -> BTreeSet<String> {
    find_min_count(all_entities(tweets, desc), min_count)
}

/// Whether `ch` is stripped from the ends of words.
fn is_strippable(ch: char) -> bool {
    !KEPT_PUNCTUATION.contains(&ch)
        && matches!(
            get_general_category(ch),
            GeneralCategory::ConnectorPunctuation
                | GeneralCategory::DashPunctuation
                | GeneralCategory::OpenPunctuation
                | GeneralCategory::ClosePunctuation
                | GeneralCategory::InitialPunctuation
                | GeneralCategory::FinalPunctuation
                | GeneralCategory::OtherPunctuation
        )
}

/// Turns tweet text into the list of words used to build n-grams.
///
/// Words are split on whitespace, stripped of surrounding punctuation,
/// lowercased unless `case_sensitive`, filtered of stop words when
/// `remove_stop_words`, and dropped when empty or starting with a stop
/// prefix.
///
/// Stop words are matched after case folding, so in case-insensitive mode a
/// capitalised `The` is removed like `the`. In case-sensitive mode only the
/// lowercase spellings in `STOP_WORDS` match.
pub fn clean_words(text: &str, case_sensitive: bool, remove_stop_words: bool) -> Vec<String> {
    text.split_whitespace()
        .map(|word| word.trim_matches(is_strippable))
        .map(|word| {
            if case_sensitive {
                word.to_string()
            } else {
                word.to_lowercase()
            }
        })
        .filter(|word| !word.is_empty())
        .filter(|word| !(remove_stop_words && STOP_WORDS.contains(&word.as_str())))
        .filter(|word| !STOP_PREFIXES.iter().any(|prefix| word.starts_with(prefix)))
        .collect()
}

/// Contiguous windows of `n` words. Empty when there are fewer than `n`
/// words.
pub fn ngrams(words: &[String], n: usize) -> Vec<NGram> {
    if n == 0 {
        return Vec::new();
    }
    words.windows(n).map(<[String]>::to_vec).collect()
}

/// N-grams of every tweet, one list per tweet.
fn ngrams_per_tweet(
    tweets: &[Tweet],
    n: usize,
    case_sensitive: bool,
    remove_stop_words: bool,
) -> Vec<Vec<NGram>> {
    tweets
        .iter()
        .map(|tweet| {
            let words = clean_words(&tweet.abridged_text, case_sensitive, remove_stop_words);
            ngrams(&words, n)
        })
        .collect()
}

/// Finds the `k` most frequently occurring n-grams, with stop words removed.
pub fn find_top_k_ngrams(tweets: &[Tweet], n: usize, case_sensitive: bool, k: usize) -> Vec<NGram> {
    let all = ngrams_per_tweet(tweets, n, case_sensitive, true)
        .into_iter()
        .flatten();
    find_top_k(all, k)
}

/// Finds the n-grams that occur at least `min_count` times, with stop words
/// removed.
pub fn find_min_count_ngrams(
    tweets: &[Tweet],
    n: usize,
    case_sensitive: bool,
    min_count: usize,
) -> BTreeSet<NGram> {
    let all = ngrams_per_tweet(tweets, n, case_sensitive, true)
        .into_iter()
        .flatten();
    find_min_count(all, min_count)
}

/// Finds the salient n-grams of each tweet. Stop words are kept.
pub fn find_salient_ngrams(
    tweets: &[Tweet],
    n: usize,
    case_sensitive: bool,
    threshold: f64,
) -> Vec<BTreeSet<NGram>> {
    let docs = ngrams_per_tweet(tweets, n, case_sensitive, false);
    find_salient(&docs, threshold)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_hash_at_and_ampersand_when_stripping() {
        assert!(!is_strippable('#'));
        assert!(!is_strippable('@'));
        assert!(!is_strippable('&'));
        assert!(is_strippable('!'));
        assert!(is_strippable('“'));
        assert!(!is_strippable('a'));
    }

    #[test]
    fn ngrams_shorter_than_n_are_empty() {
        let words = vec!["one".to_string(), "two".to_string()];
        assert!(ngrams(&words, 3).is_empty());
        assert_eq!(ngrams(&words, 2), vec![words.clone()]);
    }
}
