#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Linear regression and model selection.

/// Dataset loading, standardization, and splitting.
pub mod dataset;
/// Least-squares fitting and model selection.
pub mod model;

pub use dataset::{DataSet, Parameters, Rows, parse_csv, standardize_features, train_test_split};
pub use model::{
    Model, apply_beta, compute_all_vars_model, compute_best_pair, compute_single_var_models,
    forward_selection, linear_regression, prepend_ones_column, r_squared, validate_model,
};

/// Errors raised while loading data or fitting models.
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum RegressionError {
    /// The table has no rows.
    #[error("The dataset holds no rows")]
    EmptyData,
    /// A value could not be parsed as a number.
    #[error("Line {line}: could not parse `{token}` as a number")]
    Malformed {
        /// Line the token was found on.
        line:  usize,
        /// The offending token.
        token: String,
    },
    /// A row has the wrong number of columns.
    #[error("Line {line} has {found} columns, expected {expected}")]
    RaggedRow {
        /// Line of the row.
        line:     usize,
        /// Number of labels.
        expected: usize,
        /// Number of values found.
        found:    usize,
    },
    /// A feature or target index does not name a column.
    #[error("Column {index} does not exist; the table has {columns} columns")]
    IndexOutOfRange {
        /// The offending index.
        index:   usize,
        /// Number of columns.
        columns: usize,
    },
    /// The training fraction is outside `(0, 1]`.
    #[error("Training fraction must be within (0, 1], got {0}")]
    InvalidFraction(f64),
    /// The split left no rows to train on.
    #[error("The training split is empty")]
    EmptyTrainingSet,
    /// The split left no rows to validate on.
    #[error("The testing split is empty; use a training fraction below 1")]
    EmptyTestingSet,
    /// The features are linearly dependent.
    #[error("The features are linearly dependent; no unique fit exists")]
    Singular,
    /// Too few features for the requested model.
    #[error("Need at least {needed} features, found {found}")]
    NotEnoughFeatures {
        /// Features required.
        needed: usize,
        /// Features available.
        found:  usize,
    },
}
