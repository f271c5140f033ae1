//! Descriptive statistics for dataset overviews.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::data::model::{DatasetRecord, Table};
use crate::data::registry::Registry;

/// Distribution summary of one column; NaN cells are skipped.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColumnStats {
    pub column: String,
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (ddof = 1).
    pub std: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
    #[serde(rename = "25th")]
    pub q25: f64,
    #[serde(rename = "75th")]
    pub q75: f64,
}

/// Shape of a dataset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DatasetSummary {
    pub n_samples: usize,
    pub n_features: usize,
    pub n_targets: usize,
    pub has_coordinates: bool,
}

impl DatasetSummary {
    pub fn of(record: &DatasetRecord) -> Self {
        DatasetSummary {
            n_samples: record.len(),
            n_features: record.dataset.feature_columns().len(),
            n_targets: record.dataset.target_columns().len(),
            has_coordinates: record.has_coordinates(),
        }
    }
}

/// Summarize every column of `table`, in column order.
pub fn describe(table: &Table) -> Vec<ColumnStats> {
    table
        .columns()
        .iter()
        .map(|name| {
            let mut values: Vec<f64> = table
                .column(name)
                .unwrap_or_default()
                .into_iter()
                .filter(|v| !v.is_nan())
                .collect();
            values.sort_by(f64::total_cmp);
            column_stats(name, &values)
        })
        .collect()
}

fn column_stats(name: &str, sorted: &[f64]) -> ColumnStats {
    let n = sorted.len();
    let mean = sorted.iter().sum::<f64>() / n as f64;
    let std = if n > 1 {
        (sorted.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64).sqrt()
    } else {
        f64::NAN
    };
    ColumnStats {
        column: name.to_string(),
        count: n,
        mean,
        std,
        min: sorted.first().copied().unwrap_or(f64::NAN),
        max: sorted.last().copied().unwrap_or(f64::NAN),
        median: quantile(sorted, 0.5),
        q25: quantile(sorted, 0.25),
        q75: quantile(sorted, 0.75),
    }
}

/// Linear-interpolation quantile of already sorted values.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    if sorted.is_empty() {
        return f64::NAN;
    }
    let pos = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Shape and per-column statistics of every dataset in the registry,
/// keyed by dataset name.
///
/// Datasets that fail to load are logged and left out.
pub fn summarize_registry(registry: &Registry) -> Value {
    let mut out = Map::new();
    for name in registry.list() {
        let record = match registry.load(&name) {
            Ok(r) => r,
            Err(e) => {
                log::warn!("Error loading dataset {name}: {e}");
                continue;
            }
        };
        let entry = serde_json::json!({
            "summary": DatasetSummary::of(&record),
            "columns": describe(&record.dataset),
        });
        out.insert(name, entry);
    }
    Value::Object(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn quantile_interpolates_between_ranks() {
        let v = [1.0, 2.0, 3.0, 4.0];
        assert_relative_eq!(quantile(&v, 0.5), 2.5);
        assert_relative_eq!(quantile(&v, 0.25), 1.75);
        assert_relative_eq!(quantile(&v, 1.0), 4.0);
        assert!(quantile(&[], 0.5).is_nan());
    }

    #[test]
    fn describe_skips_nan_cells() {
        let t = Table::from_columns(vec![("Clay_target", vec![1.0, f64::NAN, 3.0, 5.0])]).unwrap();
        let s = &describe(&t)[0];
        assert_eq!(s.count, 3);
        assert_relative_eq!(s.mean, 3.0);
        assert_relative_eq!(s.std, 2.0);
        assert_relative_eq!(s.median, 3.0);
        assert_relative_eq!(s.min, 1.0);
        assert_relative_eq!(s.max, 5.0);
    }
}
