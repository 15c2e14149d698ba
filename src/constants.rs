#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Words ignored when turning tweet text into n-grams.
pub const STOP_WORDS: [&str; 22] = [
    "a", "an", "the", "this", "that", "of", "for", "or", "and", "on", "to", "be", "if", "we",
    "you", "in", "is", "at", "it", "rt", "mt", "with",
];

/// Words starting with any of these prefixes are dropped from tweet text.
pub const STOP_PREFIXES: [&str; 4] = ["@", "#", "http", "&amp"];

/// Punctuation characters that are *not* stripped from the ends of words.
pub const KEPT_PUNCTUATION: [char; 3] = ['#', '@', '&'];

/// Name of the parameters file inside a regression dataset directory.
pub const PARAMETERS_FILE: &str = "parameters.json";

/// Name of the data file inside a regression dataset directory.
pub const DATA_FILE: &str = "data.csv";

/// Minutes in an hour, used to convert polling hours into simulation time.
pub const MINUTES_PER_HOUR: f64 = 60.0;

/// First impatience threshold tried by the threshold search.
pub const FIRST_IMPATIENCE_THRESHOLD: u32 = 1;

/// Default increment of the impatience threshold search.
pub const DEFAULT_THRESHOLD_STEP: u32 = 10;

/// Default number of trials run by the polling searches.
pub const DEFAULT_NUM_TRIALS: usize = 100;

/// Default upper bound on the number of booths the booth search will try.
pub const DEFAULT_MAX_BOOTHS: usize = 1000;

/// Grids with fewer rows than this are printed by the CLI.
pub const DEFAULT_GRID_PRINT_LIMIT: usize = 20;
