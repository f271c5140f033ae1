use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use super::loader::{self, SUPPORTED_EXTENSIONS};
use super::model::DatasetRecord;
use crate::error::{Error, Result};

/// Names of the datasets shipped with LimeSoDa, in publication order.
pub const KNOWN_DATASETS: &[&str] = &[
    "BB.250", "BB.30_1", "BB.30_2", "BB.51", "BB.72", "B.204", "CV.98", "G.104", "G.150",
    "H.138", "MG.44", "MG.112", "MGS.101", "MWP.36", "NRW.42", "NRW.62", "NRW.115", "NSW.52",
    "O.32", "PC.45", "RP.62", "SA.112", "SC.50", "SC.93", "SL.125", "SM.40", "SP.231",
    "SSP.58", "SSP.460", "UL.120", "W.50",
];

// ---------------------------------------------------------------------------
// DatasetSource – anything that can produce a record on demand
// ---------------------------------------------------------------------------

/// Loader capability registered under a dataset name.
pub trait DatasetSource: Send + Sync {
    fn load(&self) -> Result<DatasetRecord>;
}

impl<F> DatasetSource for F
where
    F: Fn() -> Result<DatasetRecord> + Send + Sync,
{
    fn load(&self) -> Result<DatasetRecord> {
        self()
    }
}

/// A dataset container on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    pub path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSource { path: path.into() }
    }
}

impl DatasetSource for FileSource {
    fn load(&self) -> Result<DatasetRecord> {
        loader::load_file(&self.path)
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Maps dataset names (`"BB.250"`) to their loaders.
///
/// Built explicitly and passed around; there is no process-wide instance.
#[derive(Default)]
pub struct Registry {
    sources: BTreeMap<String, Box<dyn DatasetSource>>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register every supported container file found directly in `dir`.
    ///
    /// The file stem's first underscore becomes the dot of the dataset
    /// name: `BB_250.json` → `BB.250`, `BB_30_1.csv` → `BB.30_1`.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        let entries = std::fs::read_dir(dir).map_err(|e| Error::io(dir, e))?;
        let mut registry = Registry::new();

        for entry in entries {
            let path = entry.map_err(|e| Error::io(dir, e))?.path();
            if !path.is_file() {
                continue;
            }
            let ext = loader::extension(&path);
            if !SUPPORTED_EXTENSIONS.contains(&ext.as_str()) {
                continue;
            }
            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                log::warn!("Skipping {}: file name is not valid UTF-8", path.display());
                continue;
            };
            let name = dataset_name_from_stem(stem);
            if registry.contains(&name) {
                log::warn!(
                    "Skipping {}: dataset '{name}' is already registered",
                    path.display()
                );
                continue;
            }
            registry.register(name, FileSource::new(path));
        }

        log::info!("Found {} datasets in {}", registry.len(), dir.display());
        Ok(registry)
    }

    /// Register (or replace) the loader for `name`.
    pub fn register(&mut self, name: impl Into<String>, source: impl DatasetSource + 'static) {
        let name = name.into();
        log::debug!("Registering dataset '{name}'");
        self.sources.insert(name, Box::new(source));
    }

    /// Load the dataset registered under `name`.
    pub fn load(&self, name: &str) -> Result<DatasetRecord> {
        let source = self.sources.get(name).ok_or_else(|| Error::NotFound {
            what: format!("dataset '{name}'"),
        })?;
        source.load()
    }

    /// Registered dataset names, sorted.
    pub fn list(&self) -> Vec<String> {
        self.sources.keys().cloned().collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.sources.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("datasets", &self.list())
            .finish()
    }
}

/// `BB_30_1` → `BB.30_1`.
pub fn dataset_name_from_stem(stem: &str) -> String {
    stem.replacen('_', ".", 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stem_conversion_only_touches_first_underscore() {
        assert_eq!(dataset_name_from_stem("BB_250"), "BB.250");
        assert_eq!(dataset_name_from_stem("BB_30_1"), "BB.30_1");
        assert_eq!(dataset_name_from_stem("plain"), "plain");
    }

    #[test]
    fn known_datasets_are_unique() {
        let mut names: Vec<&str> = KNOWN_DATASETS.to_vec();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), KNOWN_DATASETS.len());
    }
}
