use std::path::PathBuf;

use datalabs::regression::{
    DataSet, Parameters, RegressionError, compute_all_vars_model, compute_best_pair,
    compute_single_var_models, forward_selection, parse_csv, r_squared, train_test_split,
    validate_model,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("fixtures")
        .join("regression")
        .join(name)
}

fn exact() -> DataSet {
    DataSet::load(&fixture("exact")).expect("load dataset")
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn loads_and_splits_the_dataset() {
    let dataset = exact();
    assert_eq!(dataset.name, "exact");
    assert_eq!(dataset.labels, vec!["x1", "x2", "x3", "y"]);
    assert_eq!(dataset.feature_idx, vec![0, 1, 2]);
    assert_eq!(dataset.target_idx, 3);
    assert_eq!(dataset.training_data.len(), 8);
    assert_eq!(dataset.testing_data.len(), 2);
}

#[test]
fn single_variable_models_cover_every_feature() {
    let dataset = exact();
    let models = compute_single_var_models(&dataset).unwrap();

    let features: Vec<_> = models.iter().map(|m| m.feature_idx.clone()).collect();
    assert_eq!(features, vec![vec![0], vec![1], vec![2]]);
    assert!(models.iter().all(|m| m.beta.len() == 2));
    assert!(models.iter().all(|m| m.r2 <= 1.0 + 1e-9));
}

#[test]
fn all_variables_model_recovers_the_relation() {
    let dataset = exact();
    let model = compute_all_vars_model(&dataset).unwrap();

    // y = 3 + 2 * x1 - x2
    for (got, want) in model.beta.iter().zip([3.0, 2.0, -1.0, 0.0]) {
        assert!(close(*got, want), "{:?}", model.beta);
    }
    assert!(close(model.r2, 1.0));
    assert!(model.to_string().starts_with("y : 3.000000 + 2.000000 * x1"));
}

#[test]
fn best_pair_finds_the_true_features() {
    let model = compute_best_pair(&exact()).unwrap();
    assert_eq!(model.feature_idx, vec![0, 1]);
    assert!(close(model.r2, 1.0));
}

#[test]
fn best_pair_needs_two_features() {
    let dataset = DataSet::load(&fixture("single")).unwrap();
    assert_eq!(
        compute_best_pair(&dataset).unwrap_err(),
        RegressionError::NotEnoughFeatures {
            needed: 2,
            found:  1,
        }
    );
}

#[test]
fn forward_selection_adds_one_feature_at_a_time() {
    let dataset = exact();
    let models = forward_selection(&dataset).unwrap();

    assert_eq!(models.len(), 3);
    for (k, model) in models.iter().enumerate() {
        assert_eq!(model.feature_idx.len(), k + 1);
    }
    for pair in models.windows(2) {
        assert!(pair[1].r2 + 1e-9 >= pair[0].r2);
        assert_eq!(pair[1].feature_idx[..pair[0].feature_idx.len()], pair[0].feature_idx[..]);
    }

    let mut second = models[1].feature_idx.clone();
    second.sort();
    assert_eq!(second, vec![0, 1]);
    assert!(close(models[1].r2, 1.0));
}

#[test]
fn exact_models_validate_perfectly() {
    let dataset = exact();
    let model = compute_all_vars_model(&dataset).unwrap();
    assert!(close(validate_model(&dataset, &model).unwrap(), 1.0));
}

#[test]
fn standardization_keeps_the_fit_exact() {
    let contents = std::fs::read_to_string(fixture("exact").join("data.csv")).unwrap();
    let (labels, data) = parse_csv(&contents).unwrap();
    let params = Parameters {
        name:              "exact".to_string(),
        feature_idx:       vec![0, 1, 2],
        target_idx:        3,
        training_fraction: 0.8,
        seed:              42,
        standardization:   "Yes".to_string(),
    };
    assert!(params.standardize());

    let dataset = DataSet::from_table(&params, labels, data).unwrap();
    let model = compute_all_vars_model(&dataset).unwrap();
    assert!(close(model.r2, 1.0));
    assert!(close(model.beta[3], 0.0));
}

#[test]
fn perfect_single_feature_fit() {
    let dataset = DataSet::load(&fixture("single")).unwrap();
    assert!(dataset.testing_data.is_empty());

    let models = compute_single_var_models(&dataset).unwrap();
    // y = 3 + 2x
    assert!(close(models[0].beta[0], 3.0));
    assert!(close(models[0].beta[1], 2.0));
    assert!(close(models[0].r2, 1.0));
}

#[test]
fn validating_without_testing_rows_is_an_error() {
    let dataset = DataSet::load(&fixture("single")).unwrap();
    let models = compute_single_var_models(&dataset).unwrap();
    assert_eq!(
        validate_model(&dataset, &models[0]).unwrap_err(),
        RegressionError::EmptyTestingSet
    );
}

#[test]
fn bad_tables_are_rejected() {
    assert_eq!(parse_csv("").unwrap_err(), RegressionError::EmptyData);
    assert_eq!(parse_csv("a,b\n").unwrap_err(), RegressionError::EmptyData);
    assert_eq!(
        parse_csv("a,b\n1,2\n3\n").unwrap_err(),
        RegressionError::RaggedRow {
            line:     3,
            expected: 2,
            found:    1,
        }
    );
    assert!(matches!(
        parse_csv("a,b\n1,two\n").unwrap_err(),
        RegressionError::Malformed { line: 2, .. }
    ));
}

#[test]
fn bad_parameters_are_rejected() {
    let (labels, data) = parse_csv("a,b\n1,2\n3,4\n").unwrap();
    let params = Parameters {
        name:              "bad".to_string(),
        feature_idx:       vec![0],
        target_idx:        5,
        training_fraction: 0.5,
        seed:              1,
        standardization:   String::new(),
    };
    assert_eq!(
        DataSet::from_table(&params, labels, data.clone()).unwrap_err(),
        RegressionError::IndexOutOfRange {
            index:   5,
            columns: 2,
        }
    );

    assert_eq!(
        train_test_split(data.clone(), 1.5, 1).unwrap_err(),
        RegressionError::InvalidFraction(1.5)
    );
    assert_eq!(
        train_test_split(data, 0.1, 1).unwrap_err(),
        RegressionError::EmptyTrainingSet
    );
}

#[test]
fn r_squared_of_perfect_and_mean_predictions() {
    let y = [1.0, 2.0, 3.0];
    assert!(close(r_squared(&y, &y), 1.0));
    assert!(close(r_squared(&y, &[2.0, 2.0, 2.0]), 0.0));
}

#[test]
fn builder_datasets_fit_like_loaded_ones() {
    let rows: Vec<Vec<f64>> = (0..6)
        .map(|i| {
            let x = i as f64;
            vec![x, (x * 7.0) % 5.0, 1.5 * x - 4.0]
        })
        .collect();
    let dataset = DataSet::builder()
        .name("built")
        .labels(vec!["x".to_string(), "z".to_string(), "y".to_string()])
        .feature_idx(vec![0, 1])
        .target_idx(2)
        .training_data(rows.clone())
        .testing_data(rows)
        .build();

    let models = forward_selection(&dataset).unwrap();
    assert_eq!(models[0].feature_idx, vec![0]);
    assert!(close(models[0].r2, 1.0));
    assert!(close(validate_model(&dataset, &models[0]).unwrap(), 1.0));
    assert_eq!(models[0].to_string(), "y : -4.000000 + 1.500000 * x");
}

fn with_doubled_column() -> DataSet {
    // y = 1 + x + z, with a second column holding 2x
    let rows: Vec<Vec<f64>> = (0..6)
        .map(|i| {
            let x = i as f64;
            let z = (x * 7.0) % 5.0;
            vec![x, 2.0 * x, z, 1.0 + x + z]
        })
        .collect();
    DataSet::builder()
        .name("doubled")
        .labels(["x", "twice_x", "z", "y"].map(String::from).to_vec())
        .feature_idx(vec![0, 1, 2])
        .target_idx(3)
        .training_data(rows.clone())
        .testing_data(rows)
        .build()
}

#[test]
fn best_pair_skips_dependent_features() {
    let dataset = with_doubled_column();
    let model = compute_best_pair(&dataset).expect("a pair should fit");

    assert!(
        model.feature_idx == vec![0, 2] || model.feature_idx == vec![1, 2],
        "{:?}",
        model.feature_idx
    );
    assert!(close(model.r2, 1.0));
}

#[test]
fn forward_selection_stops_at_dependent_features() {
    let dataset = with_doubled_column();
    let models = forward_selection(&dataset).expect("forward selection");

    assert_eq!(models.len(), 2);
    let last = &models[1].feature_idx;
    assert!(last.contains(&2), "{last:?}");
    assert!(!(last.contains(&0) && last.contains(&1)), "{last:?}");
    assert!(close(models[1].r2, 1.0));
    assert!(close(validate_model(&dataset, &models[1]).unwrap(), 1.0));
}

#[test]
fn fitting_checks_column_indices() {
    let mut dataset = with_doubled_column();
    dataset.feature_idx = vec![0, 7];

    let err = compute_all_vars_model(&dataset).unwrap_err();
    assert_eq!(err, RegressionError::IndexOutOfRange {
        index:   7,
        columns: 4,
    });
    assert_eq!(compute_best_pair(&dataset).unwrap_err(), err);
}
