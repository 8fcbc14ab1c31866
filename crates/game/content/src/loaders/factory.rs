//! Content factory for loading everything a run needs from a data directory.

use std::path::{Path, PathBuf};

use delve_core::GameConfig;

use crate::catalog::Catalog;
use crate::loaders::{CatalogLoader, ConfigLoader, LoadResult};

/// Content factory that loads all game content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── config.toml    (optional, defaults otherwise)
/// └── catalog.ron    (optional, built-in catalog otherwise)
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load game configuration from `config.toml`, or defaults when absent.
    pub fn load_config(&self) -> LoadResult<GameConfig> {
        let path = self.data_dir.join("config.toml");
        if path.exists() {
            ConfigLoader::load(&path)
        } else {
            Ok(GameConfig::default())
        }
    }

    /// Load the catalog from `catalog.ron`, or the built-in one when absent.
    pub fn load_catalog(&self) -> LoadResult<Catalog> {
        let path = self.data_dir.join("catalog.ron");
        if path.exists() {
            CatalogLoader::load(&path)
        } else {
            Ok(crate::builtin::catalog())
        }
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_directory_falls_back_to_builtins() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_config().unwrap(), GameConfig::default());
        assert_eq!(factory.load_catalog().unwrap(), crate::builtin::catalog());
        assert_eq!(factory.data_dir(), dir.path());
    }

    #[test]
    fn config_file_is_picked_up() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("config.toml"), "[encounter]\nmax_count = 9\n").unwrap();
        let config = ContentFactory::new(dir.path()).load_config().unwrap();
        assert_eq!(config.encounter.max_count, 9);
    }

    #[test]
    fn bundled_data_directory_loads() {
        let factory = ContentFactory::new(concat!(env!("CARGO_MANIFEST_DIR"), "/data"));
        let config = factory.load_config().unwrap();
        assert_eq!(config.dungeon.min_rooms, 6);
        assert_eq!(config.dungeon.geometry, GameConfig::default().dungeon.geometry);

        let catalog = factory.load_catalog().unwrap();
        CatalogLoader::validate(&catalog).unwrap();
        assert_eq!(catalog.default_heroes().count(), 1);
        assert!(catalog.upgrade("spite").unwrap().hook.is_some());
        assert!(catalog.upgrade("slipstream").unwrap().hook.is_some());
    }
}
