//! Generate a dungeon from a seed and print it.

use anyhow::Result;
use clap::Parser;
use console::style;
use std::path::PathBuf;

use delve_core::{Dungeon, RngStream, RunRng, generate_dungeon};

use crate::utils::load_content;

#[derive(Parser)]
pub struct GenDungeon {
    /// Run seed
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Data directory with config.toml (built-in config if omitted)
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "summary")]
    format: OutputFormat,
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum OutputFormat {
    /// One line per room
    Summary,
    /// Full JSON output
    Json,
}

impl GenDungeon {
    pub fn execute(self) -> Result<()> {
        let (config, _) = load_content(self.data_dir.as_deref())?;
        let mut rng = RunRng::derive(self.seed, RngStream::Dungeon, 0);
        let dungeon = generate_dungeon(&config, &mut rng);

        match self.format {
            OutputFormat::Summary => print_summary(self.seed, &dungeon),
            OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&dungeon)?),
        }
        Ok(())
    }
}

fn print_summary(seed: u64, dungeon: &Dungeon) {
    println!(
        "{} seed {} · {} rooms · connected: {}",
        style("Dungeon").bold().cyan(),
        seed,
        dungeon.len(),
        dungeon.is_fully_connected()
    );
    println!();

    for room in &dungeon.rooms {
        let tag = if room.id == dungeon.start_room_id {
            style("start").green().to_string()
        } else if room.is_boss {
            style("boss").red().bold().to_string()
        } else {
            String::new()
        };
        let doors = room
            .doors
            .iter()
            .map(|d| format!("{}→{}", d.side, d.to))
            .collect::<Vec<_>>()
            .join(" ");
        println!(
            "  {:<8} {:<6} doors [{}] obstacles {} teleport {}",
            room.id.to_string(),
            tag,
            doors,
            room.obstacles.len(),
            if room.teleport.is_some() { "yes" } else { "no" }
        );
    }
}
