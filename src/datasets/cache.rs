//! Sample data disk cache
//!
//! Sample datasets live as plain files in a per-user cache directory. Files are
//! placed there with [`SampleDataCache::store`] (or copied in by hand); the
//! loaders read them back from the same location.

use directories::ProjectDirs;
use std::fs::{self, File};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::types::SampleDataset;

/// Environment variable that overrides the cache location
pub const DATA_DIR_ENV: &str = "HARMONICA_DATA_DIR";

/// Sample data cache manager
#[derive(Debug, Clone)]
pub struct SampleDataCache {
    cache_dir: PathBuf,
}

impl SampleDataCache {
    /// Open the default sample data cache
    ///
    /// Uses `$HARMONICA_DATA_DIR` when set, otherwise the platform cache directory:
    /// - macOS: ~/Library/Caches/harmonica/data/
    /// - Linux: ~/.cache/harmonica/data/
    /// - Windows: %LOCALAPPDATA%\harmonica\cache\data\
    ///
    /// Returns an error if the directory cannot be resolved or created.
    pub fn new() -> Result<Self, anyhow::Error> {
        Self::new_in_dir(default_cache_dir()?)
    }

    /// Open a cache rooted at a specific directory, creating it if needed
    pub fn new_in_dir(cache_dir: PathBuf) -> Result<Self, anyhow::Error> {
        fs::create_dir_all(&cache_dir)?;
        debug!("Sample data cache at {}", cache_dir.display());
        Ok(Self { cache_dir })
    }

    pub fn dir(&self) -> &Path {
        &self.cache_dir
    }

    /// Location of a dataset file, whether or not it exists yet
    pub fn path(&self, dataset: SampleDataset) -> PathBuf {
        self.cache_dir.join(dataset.file_name())
    }

    pub fn contains(&self, dataset: SampleDataset) -> bool {
        self.path(dataset).is_file()
    }

    /// Copy a local file into the cache, replacing any previous copy
    pub fn store(&self, dataset: SampleDataset, source: &Path) -> Result<PathBuf, anyhow::Error> {
        let target = self.path(dataset);
        fs::copy(source, &target).map_err(|e| {
            anyhow::anyhow!(
                "Failed to copy {} into cache as {}: {}",
                source.display(),
                target.display(),
                e
            )
        })?;
        info!("Stored {} sample data at {}", dataset, target.display());
        Ok(target)
    }

    /// Open a cached dataset for reading
    ///
    /// A cache miss is an error naming the expected location.
    pub fn open(&self, dataset: SampleDataset) -> Result<File, anyhow::Error> {
        let path = self.path(dataset);
        if !path.is_file() {
            anyhow::bail!(
                "Sample dataset '{}' not found in cache. Place the file at {}",
                dataset,
                path.display()
            );
        }
        Ok(File::open(&path)?)
    }

    /// Remove a dataset from the cache. Returns whether a file was removed.
    pub fn remove(&self, dataset: SampleDataset) -> Result<bool, anyhow::Error> {
        let path = self.path(dataset);
        if !path.exists() {
            return Ok(false);
        }
        fs::remove_file(&path)?;
        Ok(true)
    }
}

fn default_cache_dir() -> Result<PathBuf, anyhow::Error> {
    if let Some(dir) = std::env::var_os(DATA_DIR_ENV) {
        return Ok(PathBuf::from(dir));
    }
    let proj_dirs = ProjectDirs::from("", "", "harmonica")
        .ok_or_else(|| anyhow::anyhow!("Failed to resolve cache directory"))?;
    Ok(proj_dirs.cache_dir().join("data"))
}
