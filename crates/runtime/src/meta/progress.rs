use std::collections::{BTreeMap, BTreeSet};

use delve_content::{Catalog, GearSlot};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::run::{RunOutcome, RunSummary};

/// Persistent state carried between runs.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetaProgress {
    pub unlocked_heroes: BTreeSet<String>,
    pub hero_levels: BTreeMap<String, u32>,
    pub hero_xp: BTreeMap<String, u64>,
    pub equipped: BTreeMap<GearSlot, String>,
    pub selected_hero: Option<String>,
    pub runs_completed: u32,
}

/// What a finished run changed in the meta state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProgressGain {
    pub xp: u64,
    pub levels: u32,
    pub unlocked: Option<String>,
}

impl MetaProgress {
    /// XP needed to go from `level` to `level + 1`.
    pub const fn xp_for_level(level: u32) -> u64 {
        100 * level as u64
    }

    /// Fresh profile: default heroes unlocked, the first one selected.
    pub fn new(catalog: &Catalog) -> Self {
        let unlocked_heroes: BTreeSet<String> =
            catalog.default_heroes().map(|h| h.id.clone()).collect();
        let selected_hero = catalog.default_heroes().next().map(|h| h.id.clone());
        Self {
            unlocked_heroes,
            selected_hero,
            ..Self::default()
        }
    }

    pub fn is_unlocked(&self, hero: &str) -> bool {
        self.unlocked_heroes.contains(hero)
    }

    pub fn level_of(&self, hero: &str) -> u32 {
        self.hero_levels.get(hero).copied().unwrap_or(1).max(1)
    }

    pub fn unlock(&mut self, hero: impl Into<String>) -> bool {
        self.unlocked_heroes.insert(hero.into())
    }

    pub fn equip(&mut self, slot: GearSlot, gear: impl Into<String>) {
        self.equipped.insert(slot, gear.into());
    }

    /// Credits a finished run to its hero.
    ///
    /// XP carries over between levels. A victory unlocks the first locked
    /// hero of the catalog.
    pub fn record_run(&mut self, summary: &RunSummary, catalog: &Catalog) -> ProgressGain {
        self.runs_completed += 1;

        let xp = self.hero_xp.entry(summary.hero_id.clone()).or_insert(0);
        *xp += summary.xp;
        let mut level = self.hero_levels.get(&summary.hero_id).copied().unwrap_or(1).max(1);
        let mut levels = 0;
        while *xp >= Self::xp_for_level(level) {
            *xp -= Self::xp_for_level(level);
            level += 1;
            levels += 1;
        }
        self.hero_levels.insert(summary.hero_id.clone(), level);

        let unlocked = if summary.outcome == RunOutcome::Victory {
            let next = catalog
                .heroes
                .iter()
                .find(|h| !self.unlocked_heroes.contains(&h.id))
                .map(|h| h.id.clone());
            if let Some(id) = &next {
                self.unlocked_heroes.insert(id.clone());
            }
            next
        } else {
            None
        };

        info!(
            target: "delve::meta",
            hero = %summary.hero_id,
            xp = summary.xp,
            level,
            levels,
            unlocked = ?unlocked,
            "run recorded"
        );

        ProgressGain {
            xp: summary.xp,
            levels,
            unlocked,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(xp: u64, outcome: RunOutcome) -> RunSummary {
        RunSummary {
            hero_id: "ranger".into(),
            outcome,
            rooms_cleared: 0,
            kills: 0,
            elite_kills: 0,
            xp,
        }
    }

    #[test]
    fn new_profile_unlocks_defaults() {
        let catalog = delve_content::builtin::catalog();
        let progress = MetaProgress::new(&catalog);
        assert!(progress.is_unlocked("ranger"));
        assert!(!progress.is_unlocked("knight"));
        assert_eq!(progress.selected_hero.as_deref(), Some("ranger"));
        assert_eq!(progress.level_of("ranger"), 1);
    }

    #[test]
    fn xp_rolls_over_levels() {
        let catalog = delve_content::builtin::catalog();
        let mut progress = MetaProgress::new(&catalog);

        // 100 for level 1→2, 200 for 2→3, 20 left over
        let gain = progress.record_run(&summary(320, RunOutcome::Dead), &catalog);
        assert_eq!(gain.levels, 2);
        assert_eq!(progress.level_of("ranger"), 3);
        assert_eq!(progress.hero_xp["ranger"], 20);
        assert_eq!(gain.unlocked, None);
    }

    #[test]
    fn victory_unlocks_next_hero() {
        let catalog = delve_content::builtin::catalog();
        let mut progress = MetaProgress::new(&catalog);
        let gain = progress.record_run(&summary(0, RunOutcome::Victory), &catalog);
        assert_eq!(gain.unlocked.as_deref(), Some("knight"));
        assert!(progress.is_unlocked("knight"));
        assert_eq!(progress.runs_completed, 1);
    }
}
