//! Play a run headlessly.
//!
//! The bot walks the dungeon breadth-first, shoots whatever is in the room,
//! takes one hit per enemy and picks the first upgrade offered after every
//! clear. Useful for eyeballing difficulty growth and XP payouts.

use anyhow::{Context, Result, bail};
use clap::Parser;
use console::style;
use std::collections::VecDeque;
use std::path::PathBuf;

use delve_core::{GlobalStat, PlayerStat, RoomId};
use delve_runtime::{MetaProgress, Run};
use tracing::info;

use crate::utils::load_content;

const FRAME_MS: u64 = 16;

#[derive(Parser)]
pub struct Simulate {
    /// Run seed
    #[arg(short, long, default_value_t = 0)]
    seed: u64,

    /// Data directory with config.toml / catalog.ron
    #[arg(short, long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Hero to play (defaults to the first unlocked one)
    #[arg(long)]
    hero: Option<String>,

    /// Safety cap on room transitions
    #[arg(long, default_value_t = 200)]
    max_steps: usize,
}

impl Simulate {
    pub fn execute(self) -> Result<()> {
        let (config, catalog) = load_content(self.data_dir.as_deref())?;
        let mut progress = MetaProgress::new(&catalog);
        if let Some(hero) = &self.hero {
            progress.unlock(hero.clone());
            progress.selected_hero = Some(hero.clone());
        }

        let mut run = Run::start(config, catalog.clone(), &progress, self.seed, 0)
            .context("Failed to start run")?;
        let mut now = 0;
        info!(target: "delve::xtask", seed = self.seed, hero = ?self.hero, "simulating run");

        for _ in 0..self.max_steps {
            if run.outcome().is_over() {
                break;
            }
            let Some(door) = next_door(&run) else {
                break;
            };
            let room = run.enter_room(door)?;
            fight(&mut run, &mut now)?;

            if !run.outcome().is_over() {
                if let Some(upgrade) = run.offer_upgrades(1).into_iter().next() {
                    run.pick_upgrade(&upgrade)?;
                }
            }
            println!(
                "  {:<8} difficulty {:>5.2}  hp {:>4.1}  dmg {:>4.2}",
                room.to_string(),
                run.derived_global()[GlobalStat::DifficultyModifier],
                run.player().health,
                run.derived_stats()[PlayerStat::Damage],
            );
        }

        let summary = run.finish();
        let gain = progress.record_run(&summary, &catalog);
        println!();
        println!(
            "{} {} · rooms {} · kills {} ({} elite) · xp {}",
            style("Outcome:").bold().cyan(),
            summary.outcome,
            summary.rooms_cleared,
            summary.kills,
            summary.elite_kills,
            gain.xp
        );
        if let Some(hero) = gain.unlocked {
            println!("{} {}", style("Unlocked:").bold().green(), hero);
        }
        Ok(())
    }
}

fn fight(run: &mut Run, now: &mut u64) -> Result<()> {
    let damage = run.derived_stats()[PlayerStat::Damage];
    if damage <= 0.0 {
        bail!("player deals no damage");
    }
    while let Some(enemy) = run.enemies().first() {
        let (id, hit) = (enemy.id, enemy.damage);
        *now += FRAME_MS;
        run.tick(*now)?;
        run.enemy_hits_player(id, hit)?;
        if run.outcome().is_over() {
            break;
        }
        run.damage_enemy(id, damage)?;
        if run.outcome().is_over() {
            break;
        }
    }
    Ok(())
}

/// First door on a shortest path to the nearest uncleared room.
fn next_door(run: &Run) -> Option<usize> {
    let dungeon = run.dungeon();
    let start = run.current_room();
    let mut first_door: Vec<Option<usize>> = vec![None; dungeon.len()];
    let mut seen = vec![false; dungeon.len()];
    seen[start.0] = true;
    let mut queue: VecDeque<RoomId> = VecDeque::from([start]);

    while let Some(current) = queue.pop_front() {
        let room = dungeon.room(current)?;
        if !room.cleared {
            return first_door[current.0];
        }
        for (index, door) in room.doors.iter().enumerate() {
            if seen[door.to.0] {
                continue;
            }
            seen[door.to.0] = true;
            first_door[door.to.0] = first_door[current.0].or(Some(index));
            queue.push_back(door.to);
        }
    }
    None
}
