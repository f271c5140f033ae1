use std::path::{Path, PathBuf};

use limesoda::stats::{describe, ColumnStats};
use limesoda::viz::{plot_soil_map, SoilMap};
use limesoda::{
    calculate_performance, cross_validate, split_dataset, CvReport, DatasetRecord, MeanRegressor,
    Performance, Registry, Regressor, Result, DEFAULT_N_FOLDS,
};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// What the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Map,
    Statistics,
}

/// Train/test split of the current fold, scored with the mean baseline.
#[derive(Debug, Clone)]
pub struct FoldSummary {
    pub n_train: usize,
    pub n_test: usize,
    /// Original row indices of the test fold.
    pub test_rows: Vec<usize>,
    pub baseline: Performance,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Directory the registry was built from.
    pub data_dir: Option<PathBuf>,

    /// Datasets found in `data_dir` (None until a folder is opened).
    pub registry: Option<Registry>,

    /// Name of the loaded dataset.
    pub selected: Option<String>,

    /// Loaded dataset.
    pub dataset: Option<DatasetRecord>,

    /// Target column being mapped and scored.
    pub target: Option<String>,

    /// Fold held out as the test set.
    pub test_fold: i64,

    pub n_folds: usize,

    pub view: View,

    /// Cached map of the current target (None without coordinates).
    pub soil_map: Option<SoilMap>,

    pub fold_summary: Option<FoldSummary>,

    pub cv_report: Option<CvReport>,

    pub column_stats: Vec<ColumnStats>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            data_dir: None,
            registry: None,
            selected: None,
            dataset: None,
            target: None,
            test_fold: 1,
            n_folds: DEFAULT_N_FOLDS,
            view: View::Map,
            soil_map: None,
            fold_summary: None,
            cv_report: None,
            column_stats: Vec::new(),
            status_message: None,
        }
    }
}

impl AppState {
    /// Scan `dir` for dataset containers.
    pub fn open_dir(&mut self, dir: &Path) {
        match Registry::from_dir(dir) {
            Ok(registry) => {
                log::info!("Datasets available: {:?}", registry.list());
                self.status_message = registry
                    .is_empty()
                    .then(|| format!("No datasets found in {}", dir.display()));
                self.registry = Some(registry);
                self.data_dir = Some(dir.to_path_buf());
                self.clear_dataset();
            }
            Err(e) => self.report(e),
        }
    }

    /// Load a dataset by name and select its first target.
    pub fn select_dataset(&mut self, name: &str) {
        let Some(registry) = &self.registry else {
            return;
        };
        match registry.load(name) {
            Ok(dataset) => {
                self.target = dataset.dataset.target_columns().into_iter().next();
                self.column_stats = describe(&dataset.dataset);
                self.selected = Some(name.to_string());
                self.dataset = Some(dataset);
                self.status_message = None;
                self.refresh();
            }
            Err(e) => self.report(e),
        }
    }

    pub fn set_target(&mut self, target: String) {
        self.target = Some(target);
        self.refresh();
    }

    pub fn set_test_fold(&mut self, fold: i64) {
        self.test_fold = fold;
        self.refresh();
    }

    /// Recompute map, fold split and baseline scores for the current
    /// dataset / target / fold.
    pub fn refresh(&mut self) {
        self.soil_map = None;
        self.fold_summary = None;
        self.cv_report = None;

        let (Some(dataset), Some(target)) = (&self.dataset, &self.target) else {
            return;
        };

        if dataset.has_coordinates() {
            match plot_soil_map(dataset, target, None) {
                Ok(map) => self.soil_map = Some(map),
                Err(e) => log::warn!("Cannot map {target}: {e:#}"),
            }
        }

        let result = fold_summary(dataset, target, self.test_fold, self.n_folds).and_then(
            |summary| {
                let cv = cross_validate(dataset, target, self.n_folds, MeanRegressor::new)?;
                Ok((summary, cv))
            },
        );
        match result {
            Ok((summary, cv)) => {
                self.fold_summary = Some(summary);
                self.cv_report = Some(cv);
            }
            Err(e) => self.report(e),
        }
    }

    fn clear_dataset(&mut self) {
        self.selected = None;
        self.dataset = None;
        self.target = None;
        self.column_stats.clear();
        self.refresh();
    }

    fn report(&mut self, e: limesoda::Error) {
        log::error!("{e:#}");
        self.status_message = Some(format!("Error: {e:#}"));
    }
}

fn fold_summary(dataset: &DatasetRecord, target: &str, fold: i64, n_folds: usize) -> Result<FoldSummary> {
    let split = split_dataset(dataset, fold, target, n_folds)?;
    let y_train = split.y_train.column(target).unwrap_or_default();
    let y_test = split.y_test.column(target).unwrap_or_default();

    let mut model = MeanRegressor::new();
    model.fit(&split.x_train, &y_train)?;
    let baseline = calculate_performance(&y_test, &model.predict(&split.x_test)?)?;

    Ok(FoldSummary {
        n_train: split.train_indices.len(),
        n_test: split.test_indices.len(),
        test_rows: split.test_indices,
        baseline,
    })
}
