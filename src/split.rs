//! Fold-based train/test splitting.
//!
//! Rows whose fold label is in the selector go to the test partition,
//! all other rows go to train.  Columns ending in `_target` are targets,
//! everything else is a feature.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;

use crate::data::model::{is_target, DatasetRecord, Table, TARGET_SUFFIX};
use crate::error::{Error, Result};

/// Number of folds the LimeSoDa datasets are partitioned into.
pub const DEFAULT_N_FOLDS: usize = 10;

// ---------------------------------------------------------------------------
// FoldSelector
// ---------------------------------------------------------------------------

/// Which fold(s) form the test partition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FoldSelector {
    Single(i64),
    Many(Vec<i64>),
}

impl FoldSelector {
    /// Check every fold against `[1, n_folds]` and return the selected set.
    pub fn validate(&self, n_folds: usize) -> Result<BTreeSet<i64>> {
        if n_folds == 0 {
            return Err(Error::InvalidFoldCount(n_folds));
        }
        let folds: &[i64] = match self {
            FoldSelector::Single(f) => std::slice::from_ref(f),
            FoldSelector::Many(fs) => fs,
        };
        let upper = i64::try_from(n_folds).unwrap_or(i64::MAX);
        let invalid: Vec<i64> = folds
            .iter()
            .copied()
            .filter(|&f| f < 1 || f > upper)
            .collect();
        if !invalid.is_empty() {
            return Err(Error::InvalidFolds { invalid, n_folds });
        }
        Ok(folds.iter().copied().collect())
    }
}

impl From<i64> for FoldSelector {
    fn from(fold: i64) -> Self {
        FoldSelector::Single(fold)
    }
}

impl From<i32> for FoldSelector {
    fn from(fold: i32) -> Self {
        FoldSelector::Single(fold.into())
    }
}

impl From<Vec<i64>> for FoldSelector {
    fn from(folds: Vec<i64>) -> Self {
        FoldSelector::Many(folds)
    }
}

impl From<&[i64]> for FoldSelector {
    fn from(folds: &[i64]) -> Self {
        FoldSelector::Many(folds.to_vec())
    }
}

impl<const N: usize> From<[i64; N]> for FoldSelector {
    fn from(folds: [i64; N]) -> Self {
        FoldSelector::Many(folds.to_vec())
    }
}

impl From<RangeInclusive<i64>> for FoldSelector {
    fn from(folds: RangeInclusive<i64>) -> Self {
        FoldSelector::Many(folds.collect())
    }
}

// ---------------------------------------------------------------------------
// Targets
// ---------------------------------------------------------------------------

/// Which `_target` columns become `y`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Targets {
    /// Every `_target` column of the table.
    #[default]
    All,
    One(String),
    Many(Vec<String>),
}

impl Targets {
    /// Resolve against the table's target columns.
    ///
    /// Requested names are returned in request order; a name given twice
    /// appears twice in `y`.
    pub fn resolve(&self, table: &Table) -> Result<Vec<String>> {
        let available = table.target_columns();
        let requested: Vec<String> = match self {
            Targets::All => return Ok(available),
            Targets::One(t) => vec![t.clone()],
            Targets::Many(ts) => ts.clone(),
        };

        let mut invalid: Vec<String> = Vec::new();
        for name in &requested {
            let known = name.ends_with(TARGET_SUFFIX) && available.contains(name);
            if !known && !invalid.contains(name) {
                invalid.push(name.clone());
            }
        }
        if !invalid.is_empty() {
            return Err(Error::InvalidTargets {
                invalid,
                valid: available,
            });
        }
        Ok(requested)
    }
}

impl From<&str> for Targets {
    fn from(t: &str) -> Self {
        Targets::One(t.to_string())
    }
}

impl From<String> for Targets {
    fn from(t: String) -> Self {
        Targets::One(t)
    }
}

impl From<Vec<String>> for Targets {
    fn from(ts: Vec<String>) -> Self {
        Targets::Many(ts)
    }
}

impl From<Vec<&str>> for Targets {
    fn from(ts: Vec<&str>) -> Self {
        Targets::Many(ts.into_iter().map(String::from).collect())
    }
}

impl<const N: usize> From<[&str; N]> for Targets {
    fn from(ts: [&str; N]) -> Self {
        Targets::Many(ts.iter().map(|t| t.to_string()).collect())
    }
}

impl<T: Into<Targets>> From<Option<T>> for Targets {
    fn from(t: Option<T>) -> Self {
        t.map(Into::into).unwrap_or(Targets::All)
    }
}

// ---------------------------------------------------------------------------
// Split result
// ---------------------------------------------------------------------------

/// The four row/column-aligned partitions of a dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Split {
    pub x_train: Table,
    pub x_test: Table,
    pub y_train: Table,
    pub y_test: Table,
    /// Original row index of every train row.
    pub train_indices: Vec<usize>,
    /// Original row index of every test row.
    pub test_indices: Vec<usize>,
}

impl Split {
    /// `(x_train, x_test, y_train, y_test)`.
    pub fn into_parts(self) -> (Table, Table, Table, Table) {
        (self.x_train, self.x_test, self.y_train, self.y_test)
    }
}

/// Partition row indices by fold membership, preserving row order.
///
/// Returns `(train, test)`: a row is in `test` iff its label is in `selected`.
pub fn fold_indices(folds: &[i64], selected: &BTreeSet<i64>) -> (Vec<usize>, Vec<usize>) {
    folds
        .iter()
        .enumerate()
        .fold((Vec::new(), Vec::new()), |(mut train, mut test), (i, f)| {
            if selected.contains(f) {
                test.push(i);
            } else {
                train.push(i);
            }
            (train, test)
        })
}

/// Split a dataset into train/test sets by fold.
///
/// * `fold` – fold number(s) whose rows form the test set
/// * `targets` – target column(s) for `y`; `Targets::All` (or `None`)
///   selects every `_target` column
/// * `n_folds` – upper bound for valid fold numbers (usually
///   [`DEFAULT_N_FOLDS`])
///
/// All returned tables are owned copies of the source rows. A record
/// whose fold labels do not line up with its rows is rejected.
pub fn split_dataset(
    data: &DatasetRecord,
    fold: impl Into<FoldSelector>,
    targets: impl Into<Targets>,
    n_folds: usize,
) -> Result<Split> {
    let fold = fold.into();
    let targets = targets.into();

    data.validate()?;
    let selected = fold.validate(n_folds)?;
    let target_cols = targets.resolve(&data.dataset)?;
    let feature_cols: Vec<String> = data
        .dataset
        .columns()
        .iter()
        .filter(|c| !is_target(c))
        .cloned()
        .collect();

    let x = data.dataset.select_columns(&feature_cols)?;
    let y = data.dataset.select_columns(&target_cols)?;

    let (train_indices, test_indices) = fold_indices(&data.folds, &selected);
    log::debug!(
        "Split on folds {selected:?} (targets {target_cols:?}): {} train / {} test rows",
        train_indices.len(),
        test_indices.len()
    );

    Ok(Split {
        x_train: x.select_rows(&train_indices),
        x_test: x.select_rows(&test_indices),
        y_train: y.select_rows(&train_indices),
        y_test: y.select_rows(&test_indices),
        train_indices,
        test_indices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fold_indices_is_stable_and_exhaustive() {
        let folds = [2, 1, 2, 3, 1];
        let selected: BTreeSet<i64> = [1].into_iter().collect();
        let (train, test) = fold_indices(&folds, &selected);
        assert_eq!(train, vec![0, 2, 3]);
        assert_eq!(test, vec![1, 4]);
    }

    #[test]
    fn scalar_selector_normalizes_to_singleton() {
        let set = FoldSelector::from(4).validate(10).unwrap();
        assert_eq!(set.into_iter().collect::<Vec<_>>(), vec![4]);
    }

    #[test]
    fn out_of_range_folds_are_all_reported() {
        let err = FoldSelector::from(vec![0, 3, 11]).validate(10).unwrap_err();
        match err {
            Error::InvalidFolds { invalid, n_folds } => {
                assert_eq!(invalid, vec![0, 11]);
                assert_eq!(n_folds, 10);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn zero_fold_count_is_rejected() {
        let err = FoldSelector::from(1).validate(0).unwrap_err();
        assert!(matches!(err, Error::InvalidFoldCount(0)));
    }

    #[test]
    fn none_targets_means_all() {
        assert_eq!(Targets::from(None::<&str>), Targets::All);
        assert_eq!(
            Targets::from(Some("SOC_target")),
            Targets::One("SOC_target".into())
        );
    }

    #[test]
    fn feature_names_are_not_valid_targets() {
        let table = Table::from_columns(vec![
            ("Altitude", vec![1.0]),
            ("SOC_target", vec![2.0]),
        ])
        .unwrap();
        let err = Targets::from("Altitude").resolve(&table).unwrap_err();
        match err {
            Error::InvalidTargets { invalid, valid } => {
                assert_eq!(invalid, vec!["Altitude"]);
                assert_eq!(valid, vec!["SOC_target"]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
