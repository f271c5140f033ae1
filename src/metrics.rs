//! Regression scores: coefficient of determination and RMSE.

use serde::{Deserialize, Serialize};

use crate::data::model::Table;
use crate::error::{Error, Result};

/// Scores of one prediction against the truth.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Performance {
    /// Coefficient of determination; negative when worse than the mean.
    pub r2: f64,
    /// Root-mean-squared error.
    pub rmse: f64,
}

/// Compute R² and RMSE of `y_pred` against `y_true`.
///
/// Both formulas are evaluated literally: a constant `y_true` makes the R²
/// denominator zero, which yields NaN or -inf rather than an error, and
/// empty input yields NaN for both scores.
pub fn calculate_performance(y_true: &[f64], y_pred: &[f64]) -> Result<Performance> {
    if y_true.len() != y_pred.len() {
        return Err(Error::length_mismatch(
            "predictions",
            y_true.len(),
            y_pred.len(),
        ));
    }

    let n = y_true.len() as f64;
    let mean = y_true.iter().sum::<f64>() / n;

    let ss_res: f64 = y_true
        .iter()
        .zip(y_pred)
        .map(|(t, p)| (t - p).powi(2))
        .sum();
    let ss_tot: f64 = y_true.iter().map(|t| (t - mean).powi(2)).sum();

    Ok(Performance {
        r2: 1.0 - ss_res / ss_tot,
        rmse: (ss_res / n).sqrt(),
    })
}

/// Score every column of `y_pred` against the same-named column of `y_true`.
///
/// Columns are scored independently, in `y_true` order; nothing is
/// averaged across targets.
pub fn score_columns(y_true: &Table, y_pred: &Table) -> Result<Vec<(String, Performance)>> {
    y_true
        .columns()
        .iter()
        .map(|name| {
            let truth = y_true.column(name).unwrap_or_default();
            let pred = y_pred.column(name).ok_or_else(|| Error::NotFound {
                what: format!("prediction column '{name}'"),
            })?;
            Ok((name.clone(), calculate_performance(&truth, &pred)?))
        })
        .collect()
}
