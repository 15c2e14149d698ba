#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::fmt::Display;

use itertools::Itertools;
use serde::Serialize;

use super::{
    RegressionError,
    dataset::{DataSet, Rows},
};

/// Pivots smaller than this are treated as zero when solving.
const SINGULAR_TOLERANCE: f64 = 1e-10;

/// Prepends a column of ones to the feature matrix.
pub fn prepend_ones_column(features: &Rows) -> Rows {
    features
        .iter()
        .map(|row| std::iter::once(1.0).chain(row.iter().copied()).collect())
        .collect()
}

/// Predictions of coefficients `beta` for every row of `x`.
pub fn apply_beta(beta: &[f64], x: &Rows) -> Vec<f64> {
    x.iter()
        .map(|row| row.iter().zip(beta).map(|(xi, bi)| xi * bi).sum())
        .collect()
}

/// Least-squares coefficients for `x * beta ≈ y`, found by solving the
/// normal equations with partially pivoted Gaussian elimination.
pub fn linear_regression(x: &Rows, y: &[f64]) -> Result<Vec<f64>, RegressionError> {
    let p = x.first().map(Vec::len).ok_or(RegressionError::EmptyData)?;

    // Augmented matrix [XᵀX | Xᵀy].
    let mut system: Rows = (0..p)
        .map(|i| {
            let mut row: Vec<f64> = (0..p)
                .map(|j| x.iter().map(|r| r[i] * r[j]).sum())
                .collect();
            row.push(x.iter().zip(y).map(|(r, yi)| r[i] * yi).sum());
            row
        })
        .collect();

    let scale = system
        .iter()
        .flat_map(|row| row[..p].iter())
        .fold(0.0_f64, |acc, v| acc.max(v.abs()))
        .max(1.0);

    for col in 0..p {
        let pivot = (col..p)
            .max_by(|&a, &b| system[a][col].abs().total_cmp(&system[b][col].abs()))
            .unwrap_or(col);
        if system[pivot][col].abs() < SINGULAR_TOLERANCE * scale {
            return Err(RegressionError::Singular);
        }
        system.swap(col, pivot);

        let pivot_row = system[col].clone();
        for row in system.iter_mut().skip(col + 1) {
            let factor = row[col] / pivot_row[col];
            if factor == 0.0 {
                continue;
            }
            for k in col..=p {
                row[k] -= factor * pivot_row[k];
            }
        }
    }

    let mut beta = vec![0.0; p];
    for row in (0..p).rev() {
        let known: f64 = ((row + 1)..p).map(|k| system[row][k] * beta[k]).sum();
        beta[row] = (system[row][p] - known) / system[row][row];
    }
    Ok(beta)
}

/// Coefficient of determination of predictions `y_pred` against `y`.
pub fn r_squared(y: &[f64], y_pred: &[f64]) -> f64 {
    let mean = y.iter().sum::<f64>() / y.len() as f64;
    let ss_res: f64 = y.iter().zip(y_pred).map(|(a, b)| (a - b).powi(2)).sum();
    let ss_tot: f64 = y.iter().map(|a| (a - mean).powi(2)).sum();
    1.0 - ss_res / ss_tot
}

/// Checks that `features` and `target` index a column of every row.
fn check_columns(rows: &Rows, features: &[usize], target: usize) -> Result<(), RegressionError> {
    let columns = rows.iter().map(Vec::len).min().unwrap_or(0);
    match features.iter().chain([&target]).find(|&&index| index >= columns) {
        Some(&index) => Err(RegressionError::IndexOutOfRange { index, columns }),
        None => Ok(()),
    }
}

/// Selects `columns` from every row.
fn select_columns(rows: &Rows, columns: &[usize]) -> Rows {
    rows.iter()
        .map(|row| columns.iter().map(|&c| row[c]).collect())
        .collect()
}

/// A fitted linear model.
#[derive(Debug, Clone, Serialize)]
pub struct Model {
    /// Columns used as features, in coefficient order.
    pub feature_idx: Vec<usize>,
    /// Column predicted.
    pub target_idx:  usize,
    /// Intercept followed by one coefficient per feature.
    pub beta:        Vec<f64>,
    /// R² on the training data.
    pub r2:          f64,
    /// Label of the target column.
    target_label:    String,
    /// Labels of the feature columns.
    feature_labels:  Vec<String>,
}

impl Model {
    /// Fits a model of the dataset's target on `feature_idx` using the
    /// training data.
    ///
    /// Fails with `IndexOutOfRange` when a feature or the target is not a
    /// column of every training row.
    pub fn fit(dataset: &DataSet, feature_idx: &[usize]) -> Result<Self, RegressionError> {
        if dataset.training_data.is_empty() {
            return Err(RegressionError::EmptyTrainingSet);
        }
        check_columns(&dataset.training_data, feature_idx, dataset.target_idx)?;

        let x = prepend_ones_column(&select_columns(&dataset.training_data, feature_idx));
        let y: Vec<f64> = dataset
            .training_data
            .iter()
            .map(|row| row[dataset.target_idx])
            .collect();

        let beta = linear_regression(&x, &y)?;
        let r2 = r_squared(&y, &apply_beta(&beta, &x));

        Ok(Self {
            feature_idx: feature_idx.to_vec(),
            target_idx: dataset.target_idx,
            beta,
            r2,
            target_label: dataset.label(dataset.target_idx).to_string(),
            feature_labels: feature_idx
                .iter()
                .map(|&i| dataset.label(i).to_string())
                .collect(),
        })
    }

    /// R² of this model applied to `rows`.
    pub fn compute_r2(&self, rows: &Rows) -> f64 {
        let x = prepend_ones_column(&select_columns(rows, &self.feature_idx));
        let y: Vec<f64> = rows.iter().map(|row| row[self.target_idx]).collect();
        r_squared(&y, &apply_beta(&self.beta, &x))
    }
}

impl Display for Model {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} : {:.6}", self.target_label, self.beta[0])?;
        for (coef, label) in self.beta[1..].iter().zip(&self.feature_labels) {
            write!(f, " + {coef:.6} * {label}")?;
        }
        Ok(())
    }
}

/// Picks the model with the highest R², keeping the first on ties.
fn best_of(models: impl IntoIterator<Item = Model>) -> Option<Model> {
    models.into_iter().fold(None, |best: Option<Model>, model| match best {
        Some(current) if current.r2 >= model.r2 => Some(current),
        _ => Some(model),
    })
}

/// One model per feature.
pub fn compute_single_var_models(dataset: &DataSet) -> Result<Vec<Model>, RegressionError> {
    dataset
        .feature_idx
        .iter()
        .map(|&idx| Model::fit(dataset, &[idx]))
        .collect()
}

/// A model using every feature.
pub fn compute_all_vars_model(dataset: &DataSet) -> Result<Model, RegressionError> {
    Model::fit(dataset, &dataset.feature_idx)
}

/// Fits a model for each candidate feature list. Candidates whose features
/// are linearly dependent are skipped; any other failure is returned.
fn fit_candidates(
    dataset: &DataSet,
    candidates: impl IntoIterator<Item = Vec<usize>>,
) -> Result<Vec<Model>, RegressionError> {
    let mut models = Vec::new();
    for features in candidates {
        match Model::fit(dataset, &features) {
            Ok(model) => models.push(model),
            Err(RegressionError::Singular) => {
                tracing::debug!("Skipping columns {features:?}: linearly dependent");
            }
            Err(err) => return Err(err),
        }
    }
    Ok(models)
}

/// The two-feature model with the best training R². Pairs of linearly
/// dependent features are skipped; `Singular` is returned only when no pair
/// can be fitted.
pub fn compute_best_pair(dataset: &DataSet) -> Result<Model, RegressionError> {
    if dataset.feature_idx.len() < 2 {
        return Err(RegressionError::NotEnoughFeatures {
            needed: 2,
            found:  dataset.feature_idx.len(),
        });
    }

    let pairs = dataset
        .feature_idx
        .iter()
        .tuple_combinations()
        .map(|(&a, &b)| vec![a, b]);

    best_of(fit_candidates(dataset, pairs)?).ok_or(RegressionError::Singular)
}

/// Forward selection: the `K`-th model adds to the `(K-1)`-th the feature
/// that raises training R² the most. Returns one model per `K` in `1..=P`,
/// or fewer when every remaining feature is linearly dependent on those
/// already selected.
pub fn forward_selection(dataset: &DataSet) -> Result<Vec<Model>, RegressionError> {
    let mut selected: Vec<usize> = Vec::new();
    let mut available = dataset.feature_idx.clone();
    let mut models = Vec::with_capacity(available.len());

    while !available.is_empty() {
        let candidates = available.iter().map(|&feature| {
            let mut trial = selected.clone();
            trial.push(feature);
            trial
        });

        let Some(best) = best_of(fit_candidates(dataset, candidates)?) else {
            break;
        };
        let Some(&added) = best.feature_idx.last() else {
            break;
        };

        tracing::debug!("Forward selection step {}: added column {added}", selected.len() + 1);
        selected.push(added);
        available.retain(|&f| f != added);
        models.push(best);
    }

    if models.is_empty() && !dataset.feature_idx.is_empty() {
        return Err(RegressionError::Singular);
    }
    Ok(models)
}

/// R² of `model` on the dataset's testing data.
///
/// Fails with `EmptyTestingSet` when every row went to training.
pub fn validate_model(dataset: &DataSet, model: &Model) -> Result<f64, RegressionError> {
    if dataset.testing_data.is_empty() {
        return Err(RegressionError::EmptyTestingSet);
    }
    check_columns(&dataset.testing_data, &model.feature_idx, model.target_idx)?;
    Ok(model.compute_r2(&dataset.testing_data))
}
