use std::{collections::BTreeSet, fs, path::PathBuf};

use datalabs::tweets::{
    self, EntityDesc, Tweet, clean_words, find_min_count_entities, find_min_count_ngrams,
    find_salient_ngrams, find_top_k_entities, find_top_k_ngrams,
};
use uuid::Uuid;

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("tweets")
        .join(name)
}

fn sample() -> Vec<Tweet> {
    tweets::load(&fixture("sample.json")).expect("load sample tweets")
}

fn words(items: &[&str]) -> Vec<String> {
    items.iter().map(|w| w.to_string()).collect()
}

#[test]
fn top_hashtags_ignore_case_by_default() {
    let tweets = sample();
    let top = find_top_k_entities(&tweets, &EntityDesc::hashtags(false), 1);
    assert_eq!(top, vec!["election2024".to_string()]);
}

#[test]
fn case_sensitive_ties_break_alphabetically() {
    let tweets = sample();
    let top = find_top_k_entities(&tweets, &EntityDesc::hashtags(true), 2);
    assert_eq!(top, words(&["Election2024", "Vote"]));
}

#[test]
fn missing_entity_kind_contributes_nothing() {
    let tweets = sample();
    let mentions = find_top_k_entities(&tweets, &EntityDesc::mentions(false), 5);
    assert_eq!(mentions, vec!["alice".to_string()]);
    assert!(find_top_k_entities(&tweets, &EntityDesc::urls(false), 5).is_empty());
}

#[test]
fn min_count_entities() {
    let tweets = sample();
    let found = find_min_count_entities(&tweets, &EntityDesc::hashtags(false), 2);
    assert_eq!(found, BTreeSet::from(["election2024".to_string()]));
}

#[test]
fn cleaning_strips_punctuation_stop_words_and_prefixes() {
    let cleaned = clean_words("Vote today! #Election2024 @alice http://x.co", false, true);
    assert_eq!(cleaned, words(&["vote", "today"]));

    let kept = clean_words("The polls close at 8", false, false);
    assert_eq!(kept, words(&["the", "polls", "close", "at", "8"]));

    let cased = clean_words("\"Go\" vote...", true, true);
    assert_eq!(cased, words(&["Go", "vote"]));
}

#[test]
fn stop_words_match_after_lowercasing() {
    assert_eq!(clean_words("The THE the Ballot", false, true), words(&["ballot"]));
}

#[test]
fn top_unigrams_and_bigrams() {
    let tweets = sample();
    assert_eq!(
        find_top_k_ngrams(&tweets, 1, false, 2),
        vec![words(&["vote"]), words(&["go"])]
    );
    assert_eq!(find_top_k_ngrams(&tweets, 2, false, 1), vec![words(&["go", "vote"])]);
}

#[test]
fn min_count_bigrams() {
    let tweets = sample();
    let found = find_min_count_ngrams(&tweets, 2, false, 2);
    assert_eq!(found, BTreeSet::from([words(&["go", "vote"])]));
}

#[test]
fn salient_unigrams_per_tweet() {
    let tweets = sample();
    let salient = find_salient_ngrams(&tweets, 1, false, 0.5);

    assert_eq!(salient.len(), 3);
    assert_eq!(salient[0], BTreeSet::from([words(&["today"])]));
    assert_eq!(salient[1], BTreeSet::from([words(&["go"]), words(&["now"])]));
    assert_eq!(
        salient[2],
        ["the", "polls", "close", "at", "8"]
            .iter()
            .map(|w| words(&[w]))
            .collect::<BTreeSet<_>>()
    );
}

#[test]
fn salient_of_empty_tweet_is_empty() {
    let tweets = vec![Tweet::new(""), Tweet::new("ballots counted")];
    let salient = find_salient_ngrams(&tweets, 2, false, 0.0);
    assert!(salient[0].is_empty());
    assert_eq!(salient[1], BTreeSet::from([words(&["ballots", "counted"])]));
}

#[test]
fn built_tweets_behave_like_loaded_ones() {
    let tweets = vec![
        Tweet::new("a").with_entity("hashtags", "text", "Polls"),
        Tweet::new("b")
            .with_entity("hashtags", "text", "polls")
            .with_entity("hashtags", "text", "Count"),
    ];
    let top = find_top_k_entities(&tweets, &EntityDesc::hashtags(false), 2);
    assert_eq!(top, words(&["polls", "count"]));
}

#[test]
fn directory_loads_every_file_and_skips_bad_items() {
    let tweets = tweets::load(&fixture("batch")).expect("load tweet directory");
    assert_eq!(tweets.len(), 3);

    let found = find_min_count_entities(&tweets, &EntityDesc::hashtags(false), 2);
    assert_eq!(found, BTreeSet::from(["vote".to_string()]));
}

#[test]
fn directory_without_tweets_is_an_error() {
    let root = std::env::temp_dir().join(format!("datalabs-tweets-{}", Uuid::new_v4()));
    fs::create_dir_all(&root).expect("create temp root");

    let err = tweets::load(&root).unwrap_err();
    assert!(err.to_string().contains("No `*.json` tweet files"), "{err}");

    let _ = fs::remove_dir_all(root);
}
