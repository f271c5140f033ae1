//! Curated soil survey datasets (LimeSoDa) with fold-based splitting,
//! regression scoring and simple visualizations.
//!
//! ```no_run
//! use limesoda::{calculate_performance, split_dataset, Registry, Regressor, MeanRegressor};
//!
//! # fn main() -> limesoda::Result<()> {
//! let registry = Registry::from_dir(std::path::Path::new("data"))?;
//! let bb = registry.load("BB.250")?;
//!
//! let split = split_dataset(&bb, 1, "SOC_target", limesoda::DEFAULT_N_FOLDS)?;
//! let y_train = split.y_train.column("SOC_target").unwrap_or_default();
//! let y_test = split.y_test.column("SOC_target").unwrap_or_default();
//!
//! let mut model = MeanRegressor::new();
//! model.fit(&split.x_train, &y_train)?;
//! let y_pred = model.predict(&split.x_test)?;
//! let perf = calculate_performance(&y_test, &y_pred)?;
//! println!("R² = {:.3}, RMSE = {:.3}", perf.r2, perf.rmse);
//! # Ok(())
//! # }
//! ```

pub mod cv;
pub mod data;
pub mod error;
pub mod metrics;
pub mod model;
pub mod split;
pub mod stats;
pub mod viz;

pub use cv::{cross_validate, CvReport, FoldScore};
pub use data::loader::{load_file, save_file};
pub use data::model::{is_target, DatasetRecord, Table, TARGET_SUFFIX};
pub use data::registry::{DatasetSource, FileSource, Registry, KNOWN_DATASETS};
pub use error::{Error, Result};
pub use metrics::{calculate_performance, score_columns, Performance};
pub use model::{MeanRegressor, Regressor};
pub use split::{split_dataset, FoldSelector, Split, Targets, DEFAULT_N_FOLDS};
