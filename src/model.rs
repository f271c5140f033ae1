//! The regression-model capability the fold workflows call into.

use crate::data::model::Table;
use crate::error::{Error, Result};

/// Any regression model: fit on a feature table and one target column,
/// then predict one value per row.
pub trait Regressor {
    fn fit(&mut self, x: &Table, y: &[f64]) -> Result<()>;
    fn predict(&self, x: &Table) -> Result<Vec<f64>>;
}

/// Baseline that always predicts the mean of the training targets.
///
/// Its R² on the training data is exactly 0; anything useful should
/// beat it on held-out folds.
#[derive(Debug, Clone, Default)]
pub struct MeanRegressor {
    mean: Option<f64>,
}

impl MeanRegressor {
    pub fn new() -> Self {
        Self::default()
    }

    /// The fitted mean, if `fit` has been called.
    pub fn mean(&self) -> Option<f64> {
        self.mean
    }
}

impl Regressor for MeanRegressor {
    fn fit(&mut self, x: &Table, y: &[f64]) -> Result<()> {
        if x.n_rows() != y.len() {
            return Err(Error::length_mismatch("training targets", x.n_rows(), y.len()));
        }
        let finite: Vec<f64> = y.iter().copied().filter(|v| v.is_finite()).collect();
        self.mean = Some(finite.iter().sum::<f64>() / finite.len() as f64);
        Ok(())
    }

    fn predict(&self, x: &Table) -> Result<Vec<f64>> {
        let mean = self.mean.ok_or(Error::NotFitted)?;
        Ok(vec![mean; x.n_rows()])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predicts_training_mean_ignoring_nan() {
        let x = Table::from_columns(vec![("a", vec![0.0, 0.0, 0.0])]).unwrap();
        let mut m = MeanRegressor::new();
        m.fit(&x, &[1.0, f64::NAN, 3.0]).unwrap();
        assert_eq!(m.predict(&x).unwrap(), vec![2.0, 2.0, 2.0]);
    }

    #[test]
    fn predict_before_fit_fails() {
        let x = Table::empty(vec!["a".into()]);
        let err = MeanRegressor::new().predict(&x).unwrap_err();
        assert!(matches!(err, Error::NotFitted));
    }
}
