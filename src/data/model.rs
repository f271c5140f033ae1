use std::fmt;

use crate::error::{Error, Result};

/// Column-name suffix marking a prediction target.
pub const TARGET_SUFFIX: &str = "_target";

/// Whether a column name denotes a target (as opposed to a feature).
pub fn is_target(column: &str) -> bool {
    column.ends_with(TARGET_SUFFIX)
}

// ---------------------------------------------------------------------------
// Table – named numeric columns, row-major storage
// ---------------------------------------------------------------------------

/// A row-major numeric table: rows are samples, columns are named fields.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<f64>>,
}

impl Table {
    /// Build a table, checking that every row has one cell per column.
    pub fn new(columns: Vec<String>, rows: Vec<Vec<f64>>) -> Result<Self> {
        for (i, row) in rows.iter().enumerate() {
            if row.len() != columns.len() {
                return Err(Error::RaggedRow {
                    row: i,
                    expected: columns.len(),
                    actual: row.len(),
                });
            }
        }
        Ok(Table { columns, rows })
    }

    /// A table with the given columns and no rows.
    pub fn empty(columns: Vec<String>) -> Self {
        Table {
            columns,
            rows: Vec::new(),
        }
    }

    /// Build a table from `(name, values)` column pairs.
    pub fn from_columns<S: Into<String>>(columns: Vec<(S, Vec<f64>)>) -> Result<Self> {
        let n_rows = columns.first().map(|(_, v)| v.len()).unwrap_or(0);
        let mut names = Vec::with_capacity(columns.len());
        let mut values = Vec::with_capacity(columns.len());
        for (name, col) in columns {
            let name = name.into();
            if col.len() != n_rows {
                return Err(Error::length_mismatch(
                    format!("column '{name}'"),
                    n_rows,
                    col.len(),
                ));
            }
            names.push(name);
            values.push(col);
        }
        let rows = (0..n_rows)
            .map(|r| values.iter().map(|col| col[r]).collect())
            .collect();
        Ok(Table {
            columns: names,
            rows,
        })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    pub fn row(&self, index: usize) -> Option<&[f64]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    pub fn n_rows(&self) -> usize {
        self.rows.len()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Copy out one column's values.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| r[idx]).collect())
    }

    /// Names of the `_target` columns, in table order.
    pub fn target_columns(&self) -> Vec<String> {
        self.columns.iter().filter(|c| is_target(c)).cloned().collect()
    }

    /// Names of the feature (non-target) columns, in table order.
    pub fn feature_columns(&self) -> Vec<String> {
        self.columns
            .iter()
            .filter(|c| !is_target(c))
            .cloned()
            .collect()
    }

    /// New table holding only `names`, in the given order.
    ///
    /// A name listed twice yields two identical columns.
    pub fn select_columns(&self, names: &[String]) -> Result<Table> {
        let indices = names
            .iter()
            .map(|n| {
                self.column_index(n).ok_or_else(|| Error::NotFound {
                    what: format!("column '{n}'"),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let rows = self
            .rows
            .iter()
            .map(|r| indices.iter().map(|&i| r[i]).collect())
            .collect();
        Ok(Table {
            columns: names.to_vec(),
            rows,
        })
    }

    /// New table holding the rows at `indices`, in the given order.
    ///
    /// Panics if an index is out of bounds; callers pass indices derived
    /// from this table.
    pub fn select_rows(&self, indices: &[usize]) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: indices.iter().map(|&i| self.rows[i].clone()).collect(),
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.columns.join("\t"))?;
        for row in self.rows.iter().take(5) {
            let cells: Vec<String> = row.iter().map(|v| format!("{v:.4}")).collect();
            writeln!(f, "{}", cells.join("\t"))?;
        }
        if self.rows.len() > 5 {
            writeln!(f, "... ({} rows)", self.rows.len())?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// DatasetRecord – one loaded dataset
// ---------------------------------------------------------------------------

/// A loaded dataset: the sample table, one fold label per row, and
/// optional row-aligned spatial coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetRecord {
    /// Features and `_target` columns.
    pub dataset: Table,
    /// Cross-validation fold of each row.
    pub folds: Vec<i64>,
    /// Spatial position of each row (two or more columns).
    pub coordinates: Option<Table>,
}

impl DatasetRecord {
    /// Assemble a record, enforcing row alignment of the three parts.
    pub fn new(dataset: Table, folds: Vec<i64>, coordinates: Option<Table>) -> Result<Self> {
        let record = DatasetRecord {
            dataset,
            folds,
            coordinates,
        };
        record.validate()?;
        Ok(record)
    }

    /// Check that there is one fold label per row and that coordinates,
    /// if present, are row-aligned with at least two columns.
    ///
    /// The fields are public, so operations that index rows by fold call
    /// this again instead of trusting construction.
    pub fn validate(&self) -> Result<()> {
        let n_rows = self.dataset.n_rows();
        if self.folds.len() != n_rows {
            return Err(Error::length_mismatch(
                "fold labels",
                n_rows,
                self.folds.len(),
            ));
        }
        if let Some(coords) = &self.coordinates {
            if coords.n_rows() != n_rows {
                return Err(Error::MalformedCoordinates(format!(
                    "{} coordinate rows for {} samples",
                    coords.n_rows(),
                    n_rows
                )));
            }
            if coords.n_cols() < 2 {
                return Err(Error::MalformedCoordinates(format!(
                    "expected at least 2 columns, got {}",
                    coords.n_cols()
                )));
            }
        }
        Ok(())
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.dataset.n_rows()
    }

    /// Whether the dataset has no samples.
    pub fn is_empty(&self) -> bool {
        self.dataset.is_empty()
    }

    pub fn has_coordinates(&self) -> bool {
        self.coordinates.is_some()
    }

    /// Smallest and largest fold label present, if any rows exist.
    pub fn fold_range(&self) -> Option<(i64, i64)> {
        let min = self.folds.iter().copied().min()?;
        let max = self.folds.iter().copied().max()?;
        Some((min, max))
    }
}
