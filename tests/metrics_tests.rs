//! Tests for regression scoring (R² and RMSE).
//!
//! ## Test Organization
//!
//! 1. **Reference Values** - Perfect fit, constant offset, hand-computed cases
//! 2. **Numeric Edge Cases** - Constant truth, empty input
//! 3. **Multi-target Scoring** - Independent per-column scores

use approx::assert_relative_eq;

use limesoda::{calculate_performance, score_columns, Error, Table};

// ============================================================================
// Reference Values
// ============================================================================

/// Predicting the truth gives R² = 1 and RMSE = 0.
#[test]
fn test_perfect_prediction() {
    let y = [0.8, 1.2, 2.5, 1.9, 0.4];
    let p = calculate_performance(&y, &y).unwrap();
    assert_eq!(p.r2, 1.0);
    assert_eq!(p.rmse, 0.0);
}

/// A constant offset of 3 gives RMSE 3 and a finite (negative) R².
#[test]
fn test_constant_offset() {
    let p = calculate_performance(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]).unwrap();
    assert_relative_eq!(p.rmse, 3.0, epsilon = 1e-12);
    assert!(p.r2.is_finite());
    // ss_res = 27, ss_tot = 2
    assert_relative_eq!(p.r2, 1.0 - 27.0 / 2.0, epsilon = 1e-12);
}

/// Hand-computed mixed errors.
#[test]
fn test_hand_computed_scores() {
    let y_true = [3.0, -0.5, 2.0, 7.0];
    let y_pred = [2.5, 0.0, 2.0, 8.0];
    let p = calculate_performance(&y_true, &y_pred).unwrap();
    // ss_res = 0.25 + 0.25 + 0 + 1 = 1.5; mean = 2.875; ss_tot = 29.1875
    assert_relative_eq!(p.r2, 1.0 - 1.5 / 29.1875, epsilon = 1e-12);
    assert_relative_eq!(p.rmse, (1.5f64 / 4.0).sqrt(), epsilon = 1e-12);
}

/// Predicting the mean gives R² = 0.
#[test]
fn test_mean_prediction_scores_zero() {
    let y = [1.0, 2.0, 3.0, 4.0];
    let p = calculate_performance(&y, &[2.5; 4]).unwrap();
    assert_relative_eq!(p.r2, 0.0, epsilon = 1e-12);
}

// ============================================================================
// Numeric Edge Cases
// ============================================================================

/// Constant truth with errors divides by zero: -inf, not an error.
#[test]
fn test_constant_truth_gives_negative_infinity() {
    let p = calculate_performance(&[2.0, 2.0, 2.0], &[1.0, 2.0, 3.0]).unwrap();
    assert_eq!(p.r2, f64::NEG_INFINITY);
    assert_relative_eq!(p.rmse, (2.0f64 / 3.0).sqrt(), epsilon = 1e-12);
}

/// Constant truth predicted exactly is 0/0: NaN.
#[test]
fn test_constant_truth_exact_gives_nan() {
    let p = calculate_performance(&[2.0, 2.0], &[2.0, 2.0]).unwrap();
    assert!(p.r2.is_nan());
    assert_eq!(p.rmse, 0.0);
}

/// Empty input yields NaN for both scores.
#[test]
fn test_empty_input_is_nan() {
    let p = calculate_performance(&[], &[]).unwrap();
    assert!(p.r2.is_nan());
    assert!(p.rmse.is_nan());
}

/// Length mismatch is a value error.
#[test]
fn test_length_mismatch() {
    let err = calculate_performance(&[1.0, 2.0], &[1.0]).unwrap_err();
    assert!(matches!(
        err,
        Error::LengthMismatch {
            expected: 2,
            actual: 1,
            ..
        }
    ));
}

// ============================================================================
// Multi-target Scoring
// ============================================================================

/// Each column is scored on its own.
#[test]
fn test_score_columns_independently() {
    let truth = Table::from_columns(vec![
        ("SOC_target", vec![1.0, 2.0, 3.0]),
        ("pH_target", vec![6.0, 6.5, 7.0]),
    ])
    .unwrap();
    let pred = Table::from_columns(vec![
        ("pH_target", vec![6.0, 6.5, 7.0]),
        ("SOC_target", vec![4.0, 5.0, 6.0]),
    ])
    .unwrap();

    let scores = score_columns(&truth, &pred).unwrap();
    assert_eq!(scores[0].0, "SOC_target");
    assert_relative_eq!(scores[0].1.rmse, 3.0, epsilon = 1e-12);
    assert_eq!(scores[1].0, "pH_target");
    assert_eq!(scores[1].1.r2, 1.0);
}

/// A prediction table missing a column is reported as not found.
#[test]
fn test_score_columns_missing_prediction() {
    let truth = Table::from_columns(vec![("SOC_target", vec![1.0])]).unwrap();
    let pred = Table::from_columns(vec![("pH_target", vec![1.0])]).unwrap();
    assert!(score_columns(&truth, &pred).unwrap_err().is_not_found());
}
