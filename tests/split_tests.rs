//! Tests for fold-based train/test splitting.
//!
//! ## Test Organization
//!
//! 1. **Partitioning** - Row membership, sizes, order, reassembly
//! 2. **Target Selection** - Default, single, multiple, duplicates
//! 3. **Validation** - Fold range and target name errors
//! 4. **Edge Cases** - All folds, unmatched folds, misaligned labels, independence from source

use limesoda::{split_dataset, DatasetRecord, Error, Table, Targets, DEFAULT_N_FOLDS};

// ============================================================================
// Helper Functions
// ============================================================================

/// 20 samples, two per fold, with two features and three targets.
fn survey() -> DatasetRecord {
    let n = 20;
    let col = |scale: f64| (0..n).map(|i| i as f64 * scale).collect::<Vec<_>>();
    let table = Table::from_columns(vec![
        ("Altitude", col(1.0)),
        ("SOC_target", col(0.1)),
        ("ERa", col(10.0)),
        ("pH_target", col(0.01)),
        ("Clay_target", col(2.0)),
    ])
    .unwrap();
    let folds = (0..n).map(|i| (i % 10) as i64 + 1).collect();
    DatasetRecord::new(table, folds, None).unwrap()
}

// ============================================================================
// Partitioning
// ============================================================================

/// A row is in test iff its fold label is selected; sizes add up.
#[test]
fn test_rows_follow_fold_membership() {
    let data = survey();
    let split = split_dataset(&data, vec![2, 5], Targets::All, DEFAULT_N_FOLDS).unwrap();

    assert_eq!(split.x_train.n_rows() + split.x_test.n_rows(), data.len());
    assert_eq!(split.y_train.n_rows() + split.y_test.n_rows(), data.len());
    for &i in &split.test_indices {
        assert!([2, 5].contains(&data.folds[i]));
    }
    for &i in &split.train_indices {
        assert!(![2, 5].contains(&data.folds[i]));
    }
    assert_eq!(split.test_indices, vec![1, 4, 11, 14]);
}

/// Partitions keep the source row order.
#[test]
fn test_partition_is_stable() {
    let data = survey();
    let split = split_dataset(&data, 3, "SOC_target", DEFAULT_N_FOLDS).unwrap();
    let altitude = split.x_train.column("Altitude").unwrap();
    let mut sorted = altitude.clone();
    sorted.sort_by(f64::total_cmp);
    assert_eq!(altitude, sorted);
}

/// Putting train and test rows back at their original indices
/// reproduces the source table for every fold.
#[test]
fn test_reassembly_reproduces_table() {
    let data = survey();
    let all_cols: Vec<String> = data.dataset.columns().to_vec();

    for fold in 1..=10i64 {
        let split = split_dataset(&data, fold, Targets::All, DEFAULT_N_FOLDS).unwrap();
        let mut rows: Vec<Option<Vec<f64>>> = vec![None; data.len()];

        let parts = [
            (&split.x_train, &split.y_train, &split.train_indices),
            (&split.x_test, &split.y_test, &split.test_indices),
        ];
        for (x, y, idx) in parts {
            for (k, &orig) in idx.iter().enumerate() {
                let mut named: Vec<(String, f64)> = Vec::new();
                for (c, v) in x.columns().iter().zip(x.row(k).unwrap()) {
                    named.push((c.clone(), *v));
                }
                for (c, v) in y.columns().iter().zip(y.row(k).unwrap()) {
                    named.push((c.clone(), *v));
                }
                let row = all_cols
                    .iter()
                    .map(|c| named.iter().find(|(n, _)| n == c).unwrap().1)
                    .collect();
                rows[orig] = Some(row);
            }
        }

        let rebuilt: Vec<Vec<f64>> = rows.into_iter().map(Option::unwrap).collect();
        assert_eq!(rebuilt, data.dataset.rows());
    }
}

// ============================================================================
// Target Selection
// ============================================================================

/// Without targets every `_target` column is `y` and none is in `X`.
#[test]
fn test_default_targets_are_all_suffix_columns() {
    let data = survey();
    let split = split_dataset(&data, 1, None::<&str>, DEFAULT_N_FOLDS).unwrap();
    assert_eq!(
        split.y_train.columns(),
        &["SOC_target", "pH_target", "Clay_target"]
    );
    assert_eq!(split.x_train.columns(), &["Altitude", "ERa"]);
}

/// Selecting one target keeps the other targets out of `X` as well.
#[test]
fn test_single_target_excludes_all_targets_from_x() {
    let data = survey();
    let split = split_dataset(&data, 1, "pH_target", DEFAULT_N_FOLDS).unwrap();
    assert_eq!(split.y_test.columns(), &["pH_target"]);
    for c in split.x_test.columns() {
        assert!(!c.ends_with("_target"));
    }
}

/// Multiple targets come back in request order.
#[test]
fn test_target_list_keeps_request_order() {
    let data = survey();
    let split = split_dataset(&data, 1, ["Clay_target", "SOC_target"], DEFAULT_N_FOLDS).unwrap();
    assert_eq!(split.y_train.columns(), &["Clay_target", "SOC_target"]);
    assert_eq!(
        split.y_test.row(0).unwrap(),
        &[0.0, 0.0],
        "row 0 is in fold 1 with all-zero values"
    );
}

/// Duplicated target names pass through as duplicated columns.
#[test]
fn test_duplicate_targets_pass_through() {
    let data = survey();
    let split = split_dataset(&data, 1, vec!["SOC_target", "SOC_target"], 10).unwrap();
    assert_eq!(split.y_train.n_cols(), 2);
    assert_eq!(
        split.y_train.column("SOC_target"),
        Some(split.y_train.rows().iter().map(|r| r[1]).collect())
    );
}

// ============================================================================
// Validation
// ============================================================================

/// Fold 11 with 10 folds names the value and the range.
#[test]
fn test_out_of_range_fold_is_a_value_error() {
    let data = survey();
    let err = split_dataset(&data, 11, Targets::All, 10).unwrap_err();
    assert!(err.is_invalid_argument());
    let msg = err.to_string();
    assert!(msg.contains("11"), "{msg}");
    assert!(msg.contains("between 1 and 10"), "{msg}");
}

/// Fold 0 is below the range.
#[test]
fn test_fold_zero_is_rejected() {
    let err = split_dataset(&survey(), 0, Targets::All, 10).unwrap_err();
    assert!(matches!(err, Error::InvalidFolds { ref invalid, .. } if invalid == &vec![0]));
}

/// A smaller n_folds narrows the valid range.
#[test]
fn test_custom_fold_count_narrows_range() {
    let data = survey();
    assert!(split_dataset(&data, 5, "SOC_target", 5).is_ok());
    assert!(split_dataset(&data, 6, "SOC_target", 5).is_err());
}

/// Unknown targets list the valid target names.
#[test]
fn test_unknown_target_lists_valid_names() {
    let data = survey();
    let err = split_dataset(&data, 1, "Nitrogen_target", 10).unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("Nitrogen_target"), "{msg}");
    assert!(msg.contains("SOC_target, pH_target, Clay_target"), "{msg}");
}

/// A feature column cannot be requested as a target.
#[test]
fn test_feature_as_target_is_rejected() {
    let err = split_dataset(&survey(), 1, "Altitude", 10).unwrap_err();
    assert!(matches!(err, Error::InvalidTargets { .. }));
}

// ============================================================================
// Edge Cases
// ============================================================================

/// Selecting every fold empties the train partition.
#[test]
fn test_all_folds_leave_train_empty() {
    let data = survey();
    let split = split_dataset(&data, 1..=10, Targets::All, 10).unwrap();
    assert_eq!(split.x_train.n_rows(), 0);
    assert_eq!(split.y_train.n_rows(), 0);
    assert_eq!(split.x_test.n_rows(), data.len());
    assert_eq!(split.x_train.columns(), &["Altitude", "ERa"]);
}

/// A valid fold that no row carries yields an empty test set.
#[test]
fn test_unused_fold_gives_empty_test() {
    let table = Table::from_columns(vec![("a", vec![1.0, 2.0]), ("b_target", vec![3.0, 4.0])])
        .unwrap();
    let data = DatasetRecord::new(table, vec![1, 1], None).unwrap();
    let (x_train, x_test, y_train, y_test) = split_dataset(&data, 7, Targets::All, 10)
        .unwrap()
        .into_parts();
    assert_eq!(x_train.n_rows(), 2);
    assert_eq!(y_train.n_rows(), 2);
    assert!(x_test.is_empty());
    assert!(y_test.is_empty());
}

/// Extra fold labels on a hand-built record are rejected, not indexed.
#[test]
fn test_extra_fold_labels_are_rejected() {
    let mut data = survey();
    data.folds.push(1);
    let err = split_dataset(&data, 1, Targets::All, 10).unwrap_err();
    assert!(matches!(
        err,
        Error::LengthMismatch {
            expected: 20,
            actual: 21,
            ..
        }
    ));
    assert!(err.is_invalid_argument());
}

/// Missing fold labels cannot make rows vanish from both partitions.
#[test]
fn test_missing_fold_labels_are_rejected() {
    let table = Table::from_columns(vec![
        ("a", vec![1.0, 2.0, 3.0]),
        ("b_target", vec![4.0, 5.0, 6.0]),
    ])
    .unwrap();
    let data = DatasetRecord {
        dataset: table,
        folds: vec![1, 2],
        coordinates: None,
    };
    let err = split_dataset(&data, 1, Targets::All, 10).unwrap_err();
    assert!(matches!(
        err,
        Error::LengthMismatch {
            expected: 3,
            actual: 2,
            ..
        }
    ));
}

/// Returned partitions are independent copies of the source.
#[test]
fn test_partitions_do_not_alias_source() {
    let data = survey();
    let before = data.clone();
    let split = split_dataset(&data, 1, Targets::All, 10).unwrap();
    drop(split);
    assert_eq!(data, before);
}
