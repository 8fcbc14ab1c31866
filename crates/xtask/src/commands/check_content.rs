//! Load and validate a data directory.

use anyhow::Result;
use clap::Parser;
use console::style;
use std::path::PathBuf;

use delve_content::CatalogLoader;

use crate::utils::load_content;

#[derive(Parser)]
pub struct CheckContent {
    /// Directory holding config.toml and catalog.ron
    #[arg(value_name = "DIR")]
    data_dir: PathBuf,
}

impl CheckContent {
    pub fn execute(self) -> Result<()> {
        let (config, catalog) = load_content(Some(&self.data_dir))?;
        CatalogLoader::validate(&catalog)?;

        println!(
            "{} {}",
            style("Data directory:").bold().cyan(),
            self.data_dir.display()
        );
        println!(
            "  rooms {}..={} · elite chance {:.2} (+{:.2}/difficulty, cap {:.2})",
            config.dungeon.min_rooms,
            config.dungeon.max_rooms,
            config.elite.base_chance,
            config.elite.chance_per_difficulty,
            config.elite.chance_cap
        );
        println!(
            "  heroes {} · gear {} · upgrades {} · shrines {}",
            catalog.heroes.len(),
            catalog.gear.len(),
            catalog.upgrades.len(),
            catalog.shrines.len()
        );
        println!("{}", style("OK").bold().green());
        Ok(())
    }
}
