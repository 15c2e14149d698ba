#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::{collections::BTreeMap, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::TweetError;
use crate::util::{find_files, read_json};

/// A single tweet, reduced to the fields the analyses use.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tweet {
    /// Tweet text with links and media references abridged.
    #[serde(default)]
    pub abridged_text: String,
    /// Entity lists keyed by kind (`hashtags`, `user_mentions`, `urls`, ...).
    #[serde(default)]
    pub entities:      BTreeMap<String, Value>,
}

impl Tweet {
    /// Creates a tweet with the given text and no entities.
    pub fn new(abridged_text: impl Into<String>) -> Self {
        Self {
            abridged_text: abridged_text.into(),
            entities:      BTreeMap::new(),
        }
    }

    /// Adds an entity item of kind `key` whose `subkey` field is `value`.
    pub fn with_entity(
        mut self,
        key: impl Into<String>,
        subkey: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        let mut item = serde_json::Map::new();
        item.insert(subkey.into(), Value::String(value.into()));

        let list = self
            .entities
            .entry(key.into())
            .or_insert_with(|| Value::Array(Vec::new()));
        if let Value::Array(items) = list {
            items.push(Value::Object(item));
        }
        self
    }
}

/// Describes which entity field to pull out of a tweet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityDesc {
    /// Entity kind, e.g. `hashtags`.
    pub key:            String,
    /// Field inside each entity item, e.g. `text`.
    pub subkey:         String,
    /// Keep the original case when `true`, lowercase otherwise.
    pub case_sensitive: bool,
}

impl EntityDesc {
    /// Creates a new entity description.
    pub fn new(key: impl Into<String>, subkey: impl Into<String>, case_sensitive: bool) -> Self {
        Self {
            key: key.into(),
            subkey: subkey.into(),
            case_sensitive,
        }
    }

    /// Hashtag texts.
    pub fn hashtags(case_sensitive: bool) -> Self {
        Self::new("hashtags", "text", case_sensitive)
    }

    /// Screen names of mentioned users.
    pub fn mentions(case_sensitive: bool) -> Self {
        Self::new("user_mentions", "screen_name", case_sensitive)
    }

    /// Linked URLs.
    pub fn urls(case_sensitive: bool) -> Self {
        Self::new("urls", "url", case_sensitive)
    }
}

/// Loads a JSON array of tweets from `path`.
pub fn load_tweets(path: &Path) -> Result<Vec<Tweet>> {
    let tweets: Vec<Tweet> = read_json(path)?;
    tracing::debug!("Loaded {} tweets from {}", tweets.len(), path.display());
    Ok(tweets)
}

/// Loads and concatenates every `*.json` tweet file below `dir`, in path
/// order.
pub fn load_tweets_dir(dir: &Path) -> Result<Vec<Tweet>> {
    let files = find_files("json", 1, dir)?;
    if files.is_empty() {
        return Err(TweetError::NoTweetFiles(dir.to_path_buf()).into());
    }

    let mut tweets = Vec::new();
    for file in files {
        let batch = load_tweets(&file)
            .with_context(|| format!("Could not load tweets from {}", file.display()))?;
        tweets.extend(batch);
    }
    Ok(tweets)
}

/// Loads tweets from a file, or from every JSON file in a directory.
pub fn load(path: &Path) -> Result<Vec<Tweet>> {
    if path.is_dir() {
        load_tweets_dir(path)
    } else {
        load_tweets(path)
    }
}
