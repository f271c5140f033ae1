//! Cross-validation over the pre-assigned folds of a dataset.

use serde::Serialize;

use crate::data::model::DatasetRecord;
use crate::error::{Error, Result};
use crate::metrics::{calculate_performance, Performance};
use crate::model::Regressor;
use crate::split::split_dataset;

/// Scores of one held-out fold.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FoldScore {
    pub fold: i64,
    pub n_train: usize,
    pub n_test: usize,
    pub performance: Performance,
}

/// Per-fold scores plus their mean and (population) standard deviation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CvReport {
    pub target: String,
    pub folds: Vec<FoldScore>,
    pub mean_r2: f64,
    pub std_r2: f64,
    pub mean_rmse: f64,
    pub std_rmse: f64,
}

/// Hold out each fold `1..=n_folds` in turn, fit a fresh model on the
/// rest and score it on the held-out rows for a single `target`.
///
/// Non-finite fold scores (e.g. an empty or constant test fold) are kept
/// and propagate into the summary.
pub fn cross_validate<R, F>(
    data: &DatasetRecord,
    target: &str,
    n_folds: usize,
    mut make_model: F,
) -> Result<CvReport>
where
    R: Regressor,
    F: FnMut() -> R,
{
    if n_folds == 0 {
        return Err(Error::InvalidFoldCount(n_folds));
    }
    let last = i64::try_from(n_folds).map_err(|_| Error::InvalidFoldCount(n_folds))?;
    let mut folds = Vec::with_capacity(n_folds);

    for fold in 1..=last {
        let split = split_dataset(data, fold, target, n_folds)?;
        let y_train = split.y_train.column(target).unwrap_or_default();
        let y_test = split.y_test.column(target).unwrap_or_default();

        let mut model = make_model();
        model.fit(&split.x_train, &y_train)?;
        let y_pred = model.predict(&split.x_test)?;
        let performance = calculate_performance(&y_test, &y_pred)?;

        log::debug!(
            "Fold {fold}/{n_folds} on {target}: r2 = {:.3}, rmse = {:.3}",
            performance.r2,
            performance.rmse
        );
        folds.push(FoldScore {
            fold,
            n_train: split.train_indices.len(),
            n_test: split.test_indices.len(),
            performance,
        });
    }

    let r2: Vec<f64> = folds.iter().map(|f| f.performance.r2).collect();
    let rmse: Vec<f64> = folds.iter().map(|f| f.performance.rmse).collect();
    let (mean_r2, std_r2) = mean_std(&r2);
    let (mean_rmse, std_rmse) = mean_std(&rmse);

    Ok(CvReport {
        target: target.to_string(),
        folds,
        mean_r2,
        std_r2,
        mean_rmse,
        std_rmse,
    })
}

/// Mean and population standard deviation (ddof = 0).
fn mean_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn zero_folds_is_rejected_up_front() {
        let table = crate::Table::from_columns(vec![("a", vec![1.0]), ("b_target", vec![2.0])])
            .unwrap();
        let data = DatasetRecord::new(table, vec![1], None).unwrap();
        let err = cross_validate(&data, "b_target", 0, crate::MeanRegressor::new).unwrap_err();
        assert!(matches!(err, Error::InvalidFoldCount(0)));
    }

    #[test]
    fn mean_std_uses_population_variance() {
        let (mean, std) = mean_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_relative_eq!(mean, 5.0);
        assert_relative_eq!(std, 2.0);
    }
}
