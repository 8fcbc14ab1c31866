//! Inspect a saved meta-progression profile.

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use std::path::PathBuf;

use delve_runtime::{JsonFileStore, MetaProgress, MetaStore};

#[derive(Parser)]
pub struct ReadProfile {
    /// Path to the profile JSON file
    #[arg(value_name = "FILE")]
    path: PathBuf,

    /// Print the raw JSON instead of a summary
    #[arg(long)]
    json: bool,
}

impl ReadProfile {
    pub fn execute(self) -> Result<()> {
        let store = JsonFileStore::new(&self.path);
        let progress = store
            .load()
            .with_context(|| format!("Failed to read profile: {}", self.path.display()))?
            .with_context(|| format!("Profile not found: {}", self.path.display()))?;

        if self.json {
            println!("{}", serde_json::to_string_pretty(&progress)?);
        } else {
            print_summary(&progress);
        }
        Ok(())
    }
}

fn print_summary(progress: &MetaProgress) {
    println!("{}", style("=== Profile ===").bold().green());
    println!("  Runs completed: {}", progress.runs_completed);
    println!(
        "  Selected hero: {}",
        progress.selected_hero.as_deref().unwrap_or("-")
    );
    println!();

    println!("{}", style("Heroes:").bold().yellow());
    for hero in &progress.unlocked_heroes {
        println!(
            "  {:<12} level {:>2}  xp {}",
            hero,
            progress.level_of(hero),
            progress.hero_xp.get(hero).copied().unwrap_or(0)
        );
    }

    if !progress.equipped.is_empty() {
        println!();
        println!("{}", style("Equipped:").bold().yellow());
        for (slot, gear) in &progress.equipped {
            println!("  {:<8} {}", format!("{slot:?}"), gear);
        }
    }
}
