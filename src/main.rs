#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! # datalabs
//!
//! Command line front end for the tweet analyses, the language-shift and
//! polling place simulations, and regression model selection.

use std::{path::PathBuf, str::FromStr};

use anyhow::{Context, Result};
use bpaf::*;
use colored::Colorize;
use datalabs::{
    config,
    language::{self, Thresholds},
    polling::{self, DaySummary, VotingBooths},
    regression::{self, DataSet},
    report,
    tweets::{self, EntityDesc},
};
use dotenvy::dotenv;
use tracing::metadata::LevelFilter;
use tracing_subscriber::{fmt, prelude::*, util::SubscriberInitExt};

/// Tweet analysis subcommands.
#[derive(Debug, Clone)]
enum TweetsCmd {
    /// Most frequent entities
    TopEntities {
        /// Tweet file or directory
        file:           PathBuf,
        /// Entity kind
        key:            String,
        /// Field inside each entity
        subkey:         String,
        /// Keep case
        case_sensitive: bool,
        /// How many to report
        k:              usize,
    },
    /// Entities seen at least `min_count` times
    MinEntities {
        /// Tweet file or directory
        file:           PathBuf,
        /// Entity kind
        key:            String,
        /// Field inside each entity
        subkey:         String,
        /// Keep case
        case_sensitive: bool,
        /// Minimum number of occurrences
        min_count:      usize,
    },
    /// Most frequent n-grams
    TopNgrams {
        /// Tweet file or directory
        file:           PathBuf,
        /// Words per n-gram
        n:              usize,
        /// Keep case
        case_sensitive: bool,
        /// How many to report
        k:              usize,
    },
    /// N-grams seen at least `min_count` times
    MinNgrams {
        /// Tweet file or directory
        file:           PathBuf,
        /// Words per n-gram
        n:              usize,
        /// Keep case
        case_sensitive: bool,
        /// Minimum number of occurrences
        min_count:      usize,
    },
    /// Salient n-grams of every tweet
    Salient {
        /// Tweet file or directory
        file:           PathBuf,
        /// Words per n-gram
        n:              usize,
        /// Keep case
        case_sensitive: bool,
        /// tf-idf cut-off
        threshold:      f64,
    },
}

/// What the polling command should compute.
#[derive(Debug, Clone, Copy)]
enum PollingMode {
    /// Summarize the day
    Summary,
    /// Print every voter
    PrintVoters,
    /// Search for an impatience threshold
    FindThreshold,
    /// Search for a booth count
    FindNumBooths,
}

/// Which models the regression command should build.
#[derive(Debug, Clone, Copy)]
enum RegressionTask {
    /// One model per feature
    Single,
    /// One model with every feature
    All,
    /// Best two-feature model
    BestPair,
    /// Forward selection
    Forward,
    /// Forward selection scored on the testing data
    Validate,
}

impl FromStr for RegressionTask {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "single" => Ok(Self::Single),
            "all" => Ok(Self::All),
            "best-pair" => Ok(Self::BestPair),
            "forward" => Ok(Self::Forward),
            "validate" => Ok(Self::Validate),
            other => Err(format!(
                "unknown task `{other}`, expected one of: single, all, best-pair, forward, validate"
            )),
        }
    }
}

/// Top-level CLI commands.
#[derive(Debug, Clone)]
enum Cmd {
    /// Tweet analyses
    Tweets(TweetsCmd),
    /// Language shift simulation
    Language {
        /// Region file
        grid_file: PathBuf,
        /// Neighborhood radius
        r:         usize,
        /// Threshold A
        a:         f64,
        /// Thresholds B, one run each
        bs:        Vec<f64>,
        /// Threshold C
        c:         f64,
        /// Maximum number of steps
        max_steps: usize,
    },
    /// Polling place simulation
    Polling {
        /// Precinct file
        precinct_file:        PathBuf,
        /// Booths available
        num_booths:           usize,
        /// Minutes an impatient voter will wait
        impatience_threshold: f64,
        /// What to compute
        mode:                 PollingMode,
        /// Trials for the searches
        num_trials:           Option<usize>,
    },
    /// Regression model selection
    Regression {
        /// Dataset directory
        dir:  PathBuf,
        /// Models to build
        task: RegressionTask,
    },
}

/// Parse the command line arguments and return a `Cmd` enum
fn options() -> Cmd {
    /// parses a tweet file or directory
    fn file() -> impl Parser<PathBuf> {
        positional::<PathBuf>("FILE").help("Tweet JSON file, or a directory of them")
    }

    /// parses the case sensitivity flag
    fn case_sensitive() -> impl Parser<bool> {
        long("case-sensitive").help("Keep the original case").switch()
    }

    /// parses the entity kind
    fn key() -> impl Parser<String> {
        long("key")
            .help("Entity kind, e.g. hashtags, user_mentions, urls")
            .argument::<String>("KEY")
            .fallback(EntityDesc::hashtags(false).key)
    }

    /// parses the entity field
    fn subkey() -> impl Parser<String> {
        long("subkey")
            .help("Field inside each entity, e.g. text, screen_name, url")
            .argument::<String>("SUBKEY")
            .fallback(EntityDesc::hashtags(false).subkey)
    }

    /// parses k
    fn k() -> impl Parser<usize> {
        short('k').help("How many items to report").argument::<usize>("K")
    }

    /// parses the minimum count
    fn min_count() -> impl Parser<usize> {
        long("min").help("Minimum number of occurrences").argument::<usize>("MIN")
    }

    /// parses n
    fn n() -> impl Parser<usize> {
        short('n').help("Words per n-gram").argument::<usize>("N")
    }

    let top_entities = {
        let (key, subkey, case_sensitive, k, file) = (key(), subkey(), case_sensitive(), k(), file());
        construct!(TweetsCmd::TopEntities { key, subkey, case_sensitive, k, file })
    }
    .to_options()
    .command("top-entities")
    .help("Find the k most frequent entities");

    let min_entities = {
        let (key, subkey, case_sensitive, min_count, file) =
            (key(), subkey(), case_sensitive(), min_count(), file());
        construct!(TweetsCmd::MinEntities { key, subkey, case_sensitive, min_count, file })
    }
    .to_options()
    .command("min-entities")
    .help("Find entities that occur at least MIN times");

    let top_ngrams = {
        let (n, case_sensitive, k, file) = (n(), case_sensitive(), k(), file());
        construct!(TweetsCmd::TopNgrams { n, case_sensitive, k, file })
    }
    .to_options()
    .command("top-ngrams")
    .help("Find the k most frequent n-grams");

    let min_ngrams = {
        let (n, case_sensitive, min_count, file) = (n(), case_sensitive(), min_count(), file());
        construct!(TweetsCmd::MinNgrams { n, case_sensitive, min_count, file })
    }
    .to_options()
    .command("min-ngrams")
    .help("Find n-grams that occur at least MIN times");

    let salient = {
        let threshold = long("threshold")
            .help("tf-idf cut-off")
            .argument::<f64>("T");
        let (n, case_sensitive, file) = (n(), case_sensitive(), file());
        construct!(TweetsCmd::Salient { n, case_sensitive, threshold, file })
    }
    .to_options()
    .command("salient")
    .help("Find the salient n-grams of every tweet");

    let tweets = construct!([top_entities, min_entities, top_ngrams, min_ngrams, salient])
        .to_options()
        .command("tweets")
        .help("Election tweet analyses")
        .map(Cmd::Tweets);

    let language = {
        let grid_file = long("grid-file")
            .help("Region file")
            .argument::<PathBuf>("FILE");
        let r = long("r")
            .help("Neighborhood radius")
            .argument::<usize>("R")
            .fallback(1);
        let a = long("a")
            .help("Transition threshold A")
            .argument::<f64>("A")
            .fallback(0.6);
        let bs = long("b")
            .help("Transition threshold B; repeat to sweep")
            .argument::<f64>("B")
            .many()
            .map(|bs| if bs.is_empty() { vec![0.8] } else { bs });
        let c = long("c")
            .help("Transition threshold C")
            .argument::<f64>("C")
            .fallback(1.6);
        let max_steps = long("max-steps")
            .help("Maximum number of simulation steps")
            .argument::<usize>("STEPS")
            .fallback(1);
        construct!(Cmd::Language { grid_file, r, a, bs, c, max_steps })
    }
    .to_options()
    .command("language")
    .help("Run the language shift simulation");

    let polling = {
        let num_booths = long("num-booths")
            .help("Number of voting booths to use")
            .argument::<usize>("N")
            .fallback(1);
        let impatience_threshold = long("impatience-threshold")
            .help("Minutes an impatient voter will wait")
            .argument::<f64>("T")
            .fallback(1000.0);
        let print_voters = long("print-voters")
            .help("Print every voter")
            .req_flag(PollingMode::PrintVoters);
        let find_threshold = long("find-threshold")
            .help("Find an impatience threshold at which everyone votes")
            .req_flag(PollingMode::FindThreshold);
        let find_num_booths = long("find-num-booths")
            .help("Find a booth count at which everyone votes")
            .req_flag(PollingMode::FindNumBooths);
        let mode = construct!([print_voters, find_threshold, find_num_booths])
            .fallback(PollingMode::Summary);
        let num_trials = long("num-trials")
            .help("Number of trials to run")
            .argument::<usize>("N")
            .optional();
        let precinct_file = positional::<PathBuf>("PRECINCT_FILE").help("Precinct JSON file");
        construct!(Cmd::Polling { num_booths, impatience_threshold, mode, num_trials, precinct_file })
    }
    .to_options()
    .command("polling")
    .help("Run the polling place simulation");

    let regression = {
        let dir = positional::<PathBuf>("DIR")
            .help("Directory holding parameters.json and data.csv");
        let task = positional::<RegressionTask>("TASK")
            .help("One of: single, all, best-pair, forward, validate");
        construct!(Cmd::Regression { dir, task })
    }
    .to_options()
    .command("regression")
    .help("Fit and select linear regression models");

    let cmd = construct!([tweets, language, polling, regression]);

    cmd.to_options()
        .descr("Tweet analysis, simulations, and regression")
        .run()
}

/// Runs a tweet analysis and prints its result.
fn run_tweets(cmd: TweetsCmd) -> Result<()> {
    match cmd {
        TweetsCmd::TopEntities {
            file,
            key,
            subkey,
            case_sensitive,
            k,
        } => {
            let tweets = tweets::load(&file)?;
            let desc = EntityDesc::new(key, subkey, case_sensitive);
            let top = tweets::find_top_k_entities(&tweets, &desc, k);
            println!("{}", report::ranked(&format!("Top {k} {}", desc.key), &top));
        }
        TweetsCmd::MinEntities {
            file,
            key,
            subkey,
            case_sensitive,
            min_count,
        } => {
            let tweets = tweets::load(&file)?;
            let desc = EntityDesc::new(key, subkey, case_sensitive);
            let found = tweets::find_min_count_entities(&tweets, &desc, min_count);
            println!(
                "{}",
                report::items(&format!("{} seen at least {min_count} times", desc.key), found)
            );
        }
        TweetsCmd::TopNgrams {
            file,
            n,
            case_sensitive,
            k,
        } => {
            let tweets = tweets::load(&file)?;
            let top: Vec<String> = tweets::find_top_k_ngrams(&tweets, n, case_sensitive, k)
                .iter()
                .map(|ngram| report::ngram_text(ngram))
                .collect();
            println!("{}", report::ranked(&format!("Top {k} {n}-grams"), &top));
        }
        TweetsCmd::MinNgrams {
            file,
            n,
            case_sensitive,
            min_count,
        } => {
            let tweets = tweets::load(&file)?;
            let found = tweets::find_min_count_ngrams(&tweets, n, case_sensitive, min_count);
            println!(
                "{}",
                report::items(
                    &format!("{n}-grams seen at least {min_count} times"),
                    found.iter().map(|ngram| report::ngram_text(ngram))
                )
            );
        }
        TweetsCmd::Salient {
            file,
            n,
            case_sensitive,
            threshold,
        } => {
            let tweets = tweets::load(&file)?;
            let salient = tweets::find_salient_ngrams(&tweets, n, case_sensitive, threshold);
            println!(
                "{}",
                report::salient(&format!("Salient {n}-grams (threshold {threshold})"), &salient)
            );
        }
    }
    Ok(())
}

/// Runs the language shift simulation and prints the outcome.
fn run_language(
    grid_file: PathBuf,
    r: usize,
    a: f64,
    bs: Vec<f64>,
    c: f64,
    max_steps: usize,
) -> Result<()> {
    let (grid, centers) = language::read_grid(&grid_file)?;
    let print_grid = grid.size() < config::grid_print_limit();

    println!("{}", "Running the simulation...".bold());
    if print_grid {
        println!("Initial region:\n{grid}");
        if !centers.is_empty() {
            println!("With community centers:");
            for center in &centers {
                println!("    ({}, {}) serving distance {}", center.row, center.col, center.distance);
            }
        }
    }

    if let [b] = bs.as_slice() {
        let mut grid = grid;
        let freqs =
            language::run_simulation(&mut grid, r, Thresholds::new(a, *b, c), &centers, max_steps);
        if print_grid {
            println!("Final region:\n{grid}");
        }
        println!("{} {freqs}", "Final language state frequencies:".green());
    } else {
        let freqs = language::simulation_sweep(&grid, r, a, &bs, c, &centers, max_steps);
        println!("{}", report::frequencies("Language state frequencies by B", &bs, &freqs));
    }
    Ok(())
}

/// Runs the polling place simulation or one of its searches.
async fn run_polling(
    precinct_file: PathBuf,
    num_booths: usize,
    impatience_threshold: f64,
    mode: PollingMode,
    num_trials: Option<usize>,
) -> Result<()> {
    let polling::PrecinctFile { precinct, seed } = polling::load_precinct(&precinct_file)?;
    let num_trials = num_trials.unwrap_or_else(config::num_trials);
    let options = config::search_options();

    match mode {
        PollingMode::FindThreshold => {
            let threshold =
                polling::find_impatience_threshold(seed, &precinct, num_booths, num_trials, options)
                    .await?;
            println!(
                "Given {num_booths} booths, an impatience threshold of {threshold} would be \
                 appropriate for Precinct {}",
                precinct.name.bold()
            );
        }
        PollingMode::FindNumBooths => {
            let booths = polling::find_voting_booths_needed(
                seed,
                &precinct,
                impatience_threshold,
                num_trials,
                options,
            )
            .await?;
            println!(
                "Given an impatience threshold of {impatience_threshold}, provisioning {booths} \
                 booth(s) would be appropriate for Precinct {}",
                precinct.name.bold()
            );
        }
        PollingMode::PrintVoters => {
            let mut booths = VotingBooths::new(num_booths);
            let voters = precinct.simulate(seed, &mut booths, impatience_threshold)?;
            println!("{}", report::voters(&format!("Precinct {}", precinct.name), &voters));
        }
        PollingMode::Summary => {
            let mut booths = VotingBooths::new(num_booths);
            let voters = precinct.simulate(seed, &mut booths, impatience_threshold)?;
            print!("{}", report::day_summary(&precinct.name, &DaySummary::new(&precinct, &voters)));
        }
    }
    Ok(())
}

/// Builds the requested regression models and prints them.
fn run_regression(dir: PathBuf, task: RegressionTask) -> Result<()> {
    let dataset = DataSet::load(&dir)?;
    let title = |what: &str| format!("{}: {what}", dataset.name);

    match task {
        RegressionTask::Single => {
            let models = regression::compute_single_var_models(&dataset)?;
            println!("{}", report::models(&title("single-variable models"), &models, None));
        }
        RegressionTask::All => {
            let model = regression::compute_all_vars_model(&dataset)?;
            println!("{}", report::models(&title("all-variables model"), &[model], None));
        }
        RegressionTask::BestPair => {
            let model = regression::compute_best_pair(&dataset)?;
            println!("{}", report::models(&title("best bivariate model"), &[model], None));
        }
        RegressionTask::Forward => {
            let models = regression::forward_selection(&dataset)?;
            println!("{}", report::models(&title("forward selection"), &models, None));
        }
        RegressionTask::Validate => {
            let models = regression::forward_selection(&dataset)?;
            let testing: Vec<f64> = models
                .iter()
                .map(|model| regression::validate_model(&dataset, model))
                .collect::<Result<_, _>>()?;
            println!(
                "{}",
                report::models(&title("forward selection, validated"), &models, Some(&testing))
            );
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();
    let cfg = config::ensure_initialized().context("Could not load configuration")?;

    let fmt = fmt::layer()
        .without_time()
        .with_file(false)
        .with_line_number(false);
    let filter_layer = LevelFilter::from_level(cfg.log_level());
    tracing_subscriber::registry()
        .with(fmt)
        .with(filter_layer)
        .init();

    match options() {
        Cmd::Tweets(cmd) => run_tweets(cmd)?,
        Cmd::Language {
            grid_file,
            r,
            a,
            bs,
            c,
            max_steps,
        } => run_language(grid_file, r, a, bs, c, max_steps)?,
        Cmd::Polling {
            precinct_file,
            num_booths,
            impatience_threshold,
            mode,
            num_trials,
        } => {
            run_polling(precinct_file, num_booths, impatience_threshold, mode, num_trials).await?
        }
        Cmd::Regression { dir, task } => run_regression(dir, task)?,
    }

    Ok(())
}
