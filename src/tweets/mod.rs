#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Entity and n-gram analysis of election tweets.

use std::path::PathBuf;

/// Entity extraction, text cleaning, and n-gram analyses.
pub mod analyze;
/// The tweet model and loaders.
pub mod tweet;

pub use analyze::{
    NGram, clean_words, extract_entities, find_min_count_entities, find_min_count_ngrams,
    find_salient_ngrams, find_top_k_entities, find_top_k_ngrams, ngrams,
};
pub use tweet::{EntityDesc, Tweet, load, load_tweets, load_tweets_dir};

/// Errors raised while gathering tweets.
#[derive(thiserror::Error, Debug)]
pub enum TweetError {
    /// A directory was given but it holds no tweet files.
    #[error("No `*.json` tweet files found under `{}`", .0.display())]
    NoTweetFiles(PathBuf),
}
