use delve_content::{Catalog, HeroDef};
use delve_core::{ModifierEngine, PlayerStat, StatBlock, StatModifier};

use super::MetaProgress;
use crate::error::{Result, RunError};

/// Base record and modifiers a run starts with, resolved from meta state.
#[derive(Clone, Debug, PartialEq)]
pub struct Loadout {
    pub hero_id: String,
    pub level: u32,
    pub base: StatBlock<PlayerStat>,
    /// Hero passives, the level bonus, then equipped gear by slot.
    pub modifiers: Vec<StatModifier<PlayerStat>>,
}

impl Loadout {
    pub fn build(progress: &MetaProgress, catalog: &Catalog) -> Result<Self> {
        let hero_id = progress
            .selected_hero
            .as_deref()
            .ok_or(RunError::NoHeroSelected)?;
        let hero: &HeroDef = catalog
            .hero(hero_id)
            .ok_or_else(|| RunError::UnknownHero(hero_id.to_owned()))?;
        if !progress.is_unlocked(hero_id) {
            return Err(RunError::HeroLocked(hero_id.to_owned()));
        }

        let mut base = StatBlock::new();
        base.apply_partial(&hero.base);

        let level = progress.level_of(hero_id);
        let mut modifiers = hero.modifiers.clone();
        modifiers.extend(hero.level_modifier(level));

        for (&slot, gear_id) in &progress.equipped {
            let gear = catalog
                .gear(gear_id)
                .ok_or_else(|| RunError::UnknownGear(gear_id.clone()))?;
            if gear.slot != slot {
                return Err(RunError::GearSlotMismatch {
                    gear: gear_id.clone(),
                    slot,
                    actual: gear.slot,
                });
            }
            modifiers.extend(gear.modifiers.iter().cloned());
        }

        Ok(Self {
            hero_id: hero_id.to_owned(),
            level,
            base,
            modifiers,
        })
    }

    /// Installs the loadout into a freshly reset engine.
    pub fn apply(&self, engine: &mut ModifierEngine) {
        engine.set_base_stats(self.base.clone());
        for modifier in &self.modifiers {
            engine.add_modifier(modifier.clone());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_content::GearSlot;

    fn setup() -> (Catalog, MetaProgress) {
        let catalog = delve_content::builtin::catalog();
        let progress = MetaProgress::new(&catalog);
        (catalog, progress)
    }

    #[test]
    fn hero_and_gear_compose_flat_before_mult() {
        let (catalog, mut progress) = setup();
        progress.equip(GearSlot::Weapon, "hair_trigger");

        let loadout = Loadout::build(&progress, &catalog).unwrap();
        let mut engine = ModifierEngine::default();
        loadout.apply(&mut engine);

        // (150 - 10) * 0.85
        assert!((engine.derived_stats()[PlayerStat::FireRate] - 119.0).abs() < 1e-9);
    }

    #[test]
    fn level_adds_damage_multiplier() {
        let (catalog, mut progress) = setup();
        progress.hero_levels.insert("ranger".into(), 3);
        let loadout = Loadout::build(&progress, &catalog).unwrap();
        assert_eq!(loadout.level, 3);

        let mut engine = ModifierEngine::default();
        loadout.apply(&mut engine);
        assert!((engine.derived_stats()[PlayerStat::Damage] - 1.1).abs() < 1e-9);
    }

    #[test]
    fn knight_overrides_base() {
        let (catalog, mut progress) = setup();
        progress.unlock("knight");
        progress.selected_hero = Some("knight".into());
        let loadout = Loadout::build(&progress, &catalog).unwrap();
        assert_eq!(loadout.base[PlayerStat::MaxHp], 8.0);
        assert_eq!(loadout.base[PlayerStat::FireRate], 150.0);
    }

    #[test]
    fn rejects_bad_meta_state() {
        let (catalog, mut progress) = setup();

        progress.selected_hero = Some("knight".into());
        assert!(matches!(
            Loadout::build(&progress, &catalog),
            Err(RunError::HeroLocked(_))
        ));

        progress.selected_hero = Some("wizard".into());
        assert!(matches!(
            Loadout::build(&progress, &catalog),
            Err(RunError::UnknownHero(_))
        ));

        progress.selected_hero = Some("ranger".into());
        progress.equip(GearSlot::Amulet, "iron_sword");
        assert!(matches!(
            Loadout::build(&progress, &catalog),
            Err(RunError::GearSlotMismatch { .. })
        ));

        progress.equip(GearSlot::Amulet, "no_such_amulet");
        assert!(matches!(
            Loadout::build(&progress, &catalog),
            Err(RunError::UnknownGear(_))
        ));

        progress.selected_hero = None;
        assert!(matches!(
            Loadout::build(&progress, &catalog),
            Err(RunError::NoHeroSelected)
        ));
    }
}
