#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::Path;

use anyhow::{Context, Result};
use bon::Builder;
use rand::{SeedableRng, rngs::StdRng, seq::SliceRandom};
use serde::{Deserialize, Serialize};

use super::RegressionError;
use crate::{
    constants::{DATA_FILE, PARAMETERS_FILE},
    util::read_json,
};

/// A row-major table of observations.
pub type Rows = Vec<Vec<f64>>;

/// Contents of a dataset's `parameters.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Parameters {
    /// Name of the dataset.
    pub name:              String,
    /// Columns usable as features.
    pub feature_idx:       Vec<usize>,
    /// Column to predict.
    pub target_idx:        usize,
    /// Fraction of rows used for training.
    pub training_fraction: f64,
    /// Seed for the train/test split.
    pub seed:              u64,
    /// `"yes"` to standardize every column before splitting.
    #[serde(default)]
    pub standardization:   String,
}

impl Parameters {
    /// Whether columns are standardized before splitting.
    pub fn standardize(&self) -> bool {
        self.standardization.eq_ignore_ascii_case("yes")
    }
}

/// A dataset split into training and testing rows.
#[derive(Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct DataSet {
    /// Name of the dataset.
    pub name:          String,
    /// Column labels.
    pub labels:        Vec<String>,
    /// Columns usable as features.
    pub feature_idx:   Vec<usize>,
    /// Column to predict.
    pub target_idx:    usize,
    /// Rows used to fit models.
    pub training_data: Rows,
    /// Rows held out for validation.
    pub testing_data:  Rows,
}

impl DataSet {
    /// Loads `parameters.json` and `data.csv` from `dir`, standardizing and
    /// splitting as the parameters ask.
    pub fn load(dir: &Path) -> Result<Self> {
        let params: Parameters = read_json(&dir.join(PARAMETERS_FILE))?;
        let csv_path = dir.join(DATA_FILE);
        let contents = std::fs::read_to_string(&csv_path)
            .with_context(|| format!("Could not read {}", csv_path.display()))?;
        let (labels, data) =
            parse_csv(&contents).with_context(|| format!("Invalid data in {}", csv_path.display()))?;

        let dataset = Self::from_table(&params, labels, data)?;
        tracing::info!(
            "Loaded dataset {}: {} training rows, {} testing rows",
            dataset.name,
            dataset.training_data.len(),
            dataset.testing_data.len()
        );
        Ok(dataset)
    }

    /// Builds a dataset from an already parsed table.
    pub fn from_table(
        params: &Parameters,
        labels: Vec<String>,
        mut data: Rows,
    ) -> Result<Self, RegressionError> {
        let columns = labels.len();
        for &index in params.feature_idx.iter().chain([&params.target_idx]) {
            if index >= columns {
                return Err(RegressionError::IndexOutOfRange { index, columns });
            }
        }

        if params.standardize() {
            standardize_features(&mut data);
        }
        let (training_data, testing_data) =
            train_test_split(data, params.training_fraction, params.seed)?;

        Ok(Self {
            name: params.name.clone(),
            labels,
            feature_idx: params.feature_idx.clone(),
            target_idx: params.target_idx,
            training_data,
            testing_data,
        })
    }

    /// Label of column `index`.
    pub fn label(&self, index: usize) -> &str {
        self.labels.get(index).map(String::as_str).unwrap_or("?")
    }
}

/// Parses a CSV table whose first line holds the column labels and whose
/// remaining lines are numbers.
pub fn parse_csv(contents: &str) -> Result<(Vec<String>, Rows), RegressionError> {
    let mut lines = contents
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty());

    let (_, header) = lines.next().ok_or(RegressionError::EmptyData)?;
    let labels: Vec<String> = header
        .split(',')
        .map(|label| label.trim().trim_matches('"').to_string())
        .collect();

    let rows = lines
        .map(|(line, text)| {
            let row = text
                .split(',')
                .map(|token| {
                    token.trim().parse::<f64>().map_err(|_| RegressionError::Malformed {
                        line,
                        token: token.trim().to_string(),
                    })
                })
                .collect::<Result<Vec<f64>, _>>()?;
            if row.len() != labels.len() {
                return Err(RegressionError::RaggedRow {
                    line,
                    expected: labels.len(),
                    found: row.len(),
                });
            }
            Ok(row)
        })
        .collect::<Result<Rows, _>>()?;

    if rows.is_empty() {
        return Err(RegressionError::EmptyData);
    }
    Ok((labels, rows))
}

/// Shifts every column to mean 0 and scales it to (population) standard
/// deviation 1. Constant columns are only centered.
pub fn standardize_features(data: &mut Rows) {
    let Some(columns) = data.first().map(Vec::len) else {
        return;
    };
    let n = data.len() as f64;

    for col in 0..columns {
        let mean = data.iter().map(|row| row[col]).sum::<f64>() / n;
        let variance = data.iter().map(|row| (row[col] - mean).powi(2)).sum::<f64>() / n;
        let std = variance.sqrt();

        for row in data.iter_mut() {
            row[col] -= mean;
            if std > 0.0 {
                row[col] /= std;
            }
        }
    }
}

/// Shuffles rows with a seeded generator and splits off the first
/// `floor(training_fraction * n)` of them for training.
pub fn train_test_split(
    mut data: Rows,
    training_fraction: f64,
    seed: u64,
) -> Result<(Rows, Rows), RegressionError> {
    if !(training_fraction > 0.0 && training_fraction <= 1.0) {
        return Err(RegressionError::InvalidFraction(training_fraction));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    data.shuffle(&mut rng);

    let n_train = (training_fraction * data.len() as f64).floor() as usize;
    if n_train == 0 {
        return Err(RegressionError::EmptyTrainingSet);
    }
    let testing = data.split_off(n_train);
    Ok((data, testing))
}
