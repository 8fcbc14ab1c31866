//! Utility functions for xtask commands

use anyhow::{Context, Result};
use std::path::Path;

use delve_content::{Catalog, ContentFactory, builtin};
use delve_core::GameConfig;

/// Config and catalog from `data_dir`, or the built-in ones.
pub fn load_content(data_dir: Option<&Path>) -> Result<(GameConfig, Catalog)> {
    match data_dir {
        Some(dir) => {
            let factory = ContentFactory::new(dir);
            let config = factory
                .load_config()
                .with_context(|| format!("Failed to load config from {}", dir.display()))?;
            let catalog = factory
                .load_catalog()
                .with_context(|| format!("Failed to load catalog from {}", dir.display()))?;
            Ok((config, catalog))
        }
        None => Ok((GameConfig::default(), builtin::catalog())),
    }
}
