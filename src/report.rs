#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Table rendering for command line output.

use std::{collections::BTreeSet, fmt::Display};

use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Panel, Style, Width, object::Rows},
};

use crate::{
    language::Frequencies,
    polling::{DaySummary, Voter},
    regression::Model,
};

/// Applies the shared look to a table and renders it.
fn render(mut table: Table, title: &str) -> String {
    table
        .with(Panel::header(title))
        .with(Modify::new(Rows::new(1..)).with(Width::wrap(60).keep_words(true)))
        .with(
            Modify::new(Rows::first())
                .with(Alignment::center())
                .with(Alignment::center_vertical()),
        )
        .with(Style::modern());
    table.to_string()
}

#[derive(Tabled)]
/// A ranked item.
struct RankRow {
    #[tabled(rename = "Rank")]
    /// One-based position.
    rank:  usize,
    #[tabled(rename = "Item")]
    /// The item.
    value: String,
}

/// Renders items in order with their rank.
pub fn ranked<T: Display>(title: &str, items: &[T]) -> String {
    let rows = items.iter().enumerate().map(|(i, item)| RankRow {
        rank:  i + 1,
        value: item.to_string(),
    });
    render(Table::new(rows), title)
}

#[derive(Tabled)]
/// A single item.
struct ItemRow {
    #[tabled(rename = "Item")]
    /// The item.
    value: String,
}

/// Renders an unordered set of items.
pub fn items<T: Display>(title: &str, items: impl IntoIterator<Item = T>) -> String {
    let rows = items.into_iter().map(|item| ItemRow {
        value: item.to_string(),
    });
    render(Table::new(rows), title)
}

/// Joins the words of an n-gram.
pub fn ngram_text(ngram: &[String]) -> String {
    ngram.join(" ")
}

#[derive(Tabled)]
/// Salient n-grams of one tweet.
struct SalientRow {
    #[tabled(rename = "Tweet")]
    /// One-based tweet index.
    tweet:   usize,
    #[tabled(rename = "Salient n-grams")]
    /// Comma separated n-grams.
    salient: String,
}

/// Renders the salient n-grams of each tweet.
pub fn salient(title: &str, per_tweet: &[BTreeSet<Vec<String>>]) -> String {
    let rows = per_tweet.iter().enumerate().map(|(i, set)| SalientRow {
        tweet:   i + 1,
        salient: set.iter().map(|ngram| ngram_text(ngram)).collect::<Vec<_>>().join(", "),
    });
    render(Table::new(rows), title)
}

#[derive(Tabled)]
/// Language state counts for one threshold B.
struct FrequencyRow {
    #[tabled(rename = "B")]
    /// Threshold B.
    b:         f64,
    #[tabled(rename = "Dominant (0)")]
    /// Dominant-language homes.
    dominant:  usize,
    #[tabled(rename = "Bilingual (1)")]
    /// Bilingual homes.
    bilingual: usize,
    #[tabled(rename = "Heritage (2)")]
    /// Heritage-language homes.
    heritage:  usize,
}

/// Renders one row of language state counts per threshold B.
pub fn frequencies(title: &str, bs: &[f64], freqs: &[Frequencies]) -> String {
    let rows = bs.iter().zip(freqs).map(|(&b, f)| FrequencyRow {
        b,
        dominant: f.dominant,
        bilingual: f.bilingual,
        heritage: f.heritage,
    });
    render(Table::new(rows), title)
}

/// Formats an optional time with two decimals.
fn time_or_dash(time: Option<f64>) -> String {
    time.map(|t| format!("{t:.2}"))
        .unwrap_or_else(|| "-".to_string())
}

#[derive(Tabled)]
/// One voter's day.
struct VoterRow {
    #[tabled(rename = "Arrival")]
    /// Arrival time.
    arrival:   String,
    #[tabled(rename = "Duration")]
    /// Voting duration.
    duration:  String,
    #[tabled(rename = "Impatient")]
    /// Whether the voter is impatient.
    impatient: bool,
    #[tabled(rename = "Start")]
    /// Booth entry time.
    start:     String,
    #[tabled(rename = "Departure")]
    /// Booth exit time.
    departure: String,
    #[tabled(rename = "Voted")]
    /// Whether the voter voted.
    voted:     bool,
}

/// Renders every voter of a simulated day.
pub fn voters(title: &str, voters: &[Voter]) -> String {
    let rows = voters.iter().map(|v| VoterRow {
        arrival:   format!("{:.2}", v.arrival_time),
        duration:  format!("{:.2}", v.voting_duration),
        impatient: v.is_impatient,
        start:     time_or_dash(v.start_time),
        departure: time_or_dash(v.departure_time),
        voted:     v.has_voted,
    });
    render(Table::new(rows), title)
}

/// Describes a simulated day in a few lines.
pub fn day_summary(name: &str, summary: &DaySummary) -> String {
    let mut out = format!("Precinct {name}\n- {} voters voted\n", summary.arrived);
    if summary.arrived > 0 {
        out.push_str(&format!(
            "- Polls closed at {} and last voter departed at {}.\n",
            summary.closing_time,
            time_or_dash(summary.last_departure)
        ));
        out.push_str(&format!("- {} voters left without voting\n", summary.left));
        if summary.last_left {
            out.push_str("  including the last person to arrive at the polls\n");
        }
    }
    out
}

#[derive(Tabled)]
/// A fitted model and its scores.
struct ModelRow {
    #[tabled(rename = "#")]
    /// One-based position.
    index:   usize,
    #[tabled(rename = "Model")]
    /// The fitted equation.
    model:   String,
    #[tabled(rename = "R² (training)")]
    /// Training R².
    train:   String,
    #[tabled(rename = "R² (testing)")]
    /// Testing R², when computed.
    testing: String,
}

/// Renders models with their training and, when given, testing R².
pub fn models(title: &str, models: &[Model], testing: Option<&[f64]>) -> String {
    let rows = models.iter().enumerate().map(|(i, model)| ModelRow {
        index:   i + 1,
        model:   model.to_string(),
        train:   format!("{:.4}", model.r2),
        testing: match testing.and_then(|t| t.get(i)) {
            Some(r2) => format!("{r2:.4}"),
            None => "n/a".to_string(),
        },
    });
    render(Table::new(rows), title)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{polling::Precinct, regression::DataSet};

    fn fitted_model() -> Model {
        let rows: Vec<Vec<f64>> = (0..4).map(|i| vec![i as f64, 2.0 * i as f64 + 1.0]).collect();
        let dataset = DataSet::builder()
            .name("line")
            .labels(vec!["x".to_string(), "y".to_string()])
            .feature_idx(vec![0])
            .target_idx(1)
            .training_data(rows)
            .testing_data(Vec::new())
            .build();
        Model::fit(&dataset, &[0]).expect("fit line")
    }

    #[test]
    fn day_summary_mentions_the_last_voter_leaving() {
        let precinct = Precinct::builder()
            .name("Test")
            .hours_open(1u32)
            .num_voters(2usize)
            .arrival_rate(1.0)
            .voting_duration_rate(1.0)
            .build();
        let mut first = Voter::new(1.0, 5.0, false);
        first.start_voting(1.0);
        let second = Voter::new(2.0, 1.0, true);

        let text = day_summary("Test", &DaySummary::new(&precinct, &[first, second]));
        assert_eq!(
            text,
            "Precinct Test\n\
             - 2 voters voted\n\
             - Polls closed at 60 and last voter departed at 6.00.\n\
             - 1 voters left without voting\n\
             \x20 including the last person to arrive at the polls\n"
        );
    }

    #[test]
    fn day_summary_of_an_empty_day_is_one_line() {
        let precinct = Precinct::builder()
            .name("Empty")
            .hours_open(2u32)
            .num_voters(0usize)
            .arrival_rate(1.0)
            .voting_duration_rate(1.0)
            .build();
        let text = day_summary("Empty", &DaySummary::new(&precinct, &[]));
        assert_eq!(text, "Precinct Empty\n- 0 voters voted\n");
    }

    #[test]
    fn models_without_testing_scores_show_na() {
        let model = fitted_model();
        let untested = models("line", std::slice::from_ref(&model), None);
        assert!(untested.contains("n/a"), "{untested}");
        assert!(untested.contains("1.0000"), "{untested}");
        assert!(untested.contains("y : 1.000000 + 2.000000 * x"), "{untested}");

        let tested = models("line", &[model], Some(&[-0.25]));
        assert!(!tested.contains("n/a"), "{tested}");
        assert!(tested.contains("-0.2500"), "{tested}");
    }

    #[test]
    fn ranked_items_are_numbered_from_one() {
        let table = ranked("Top", &["vote", "polls"]);
        assert!(table.contains("Top"));
        assert!(table.contains("vote"));
        let vote = table.find("vote").unwrap_or(usize::MAX);
        let polls = table.find("polls").unwrap_or(0);
        assert!(vote < polls, "{table}");
    }
}
