//! Content catalog loader.

use std::path::Path;

use delve_core::StatKey;
use delve_core::StatModifier;
use tracing::debug;

use crate::catalog::Catalog;
use crate::loaders::{LoadResult, read_file};

/// Loader for hero, gear, upgrade and shrine catalogs from RON files.
///
/// Stat names are checked while parsing: a modifier naming a stat that does
/// not exist in its scope fails the load instead of being ignored later.
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load a catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<Catalog> {
        let content = read_file(path)?;
        let catalog = Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))?;
        debug!(
            target: "delve::content",
            path = %path.display(),
            heroes = catalog.heroes.len(),
            gear = catalog.gear.len(),
            upgrades = catalog.upgrades.len(),
            shrines = catalog.shrines.len(),
            "catalog loaded"
        );
        Ok(catalog)
    }

    /// Parse and validate a catalog from a RON string.
    pub fn parse(content: &str) -> LoadResult<Catalog> {
        let catalog: Catalog = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse catalog RON: {}", e))?;
        Self::validate(&catalog)?;
        Ok(catalog)
    }

    /// Rejects duplicate ids and non-finite modifier values.
    pub fn validate(catalog: &Catalog) -> LoadResult<()> {
        let dupes = catalog.duplicate_ids();
        if !dupes.is_empty() {
            anyhow::bail!("Duplicate catalog ids: {}", dupes.join(", "));
        }

        for hero in &catalog.heroes {
            check_values(&hero.id, &hero.modifiers)?;
            if let Some((key, _)) = hero.base.iter().find(|(_, v)| !v.is_finite()) {
                anyhow::bail!("hero {}: base {} is not finite", hero.id, key.name());
            }
            if !hero.level_damage_bonus.is_finite() {
                anyhow::bail!("hero {}: level_damage_bonus is not finite", hero.id);
            }
        }
        for gear in &catalog.gear {
            check_values(&gear.id, &gear.modifiers)?;
        }
        for upgrade in &catalog.upgrades {
            check_values(&upgrade.id, &upgrade.modifiers)?;
            if upgrade.modifiers.is_empty() && upgrade.hook.is_none() {
                anyhow::bail!("upgrade {} has no effect", upgrade.id);
            }
        }
        for shrine in &catalog.shrines {
            check_values(&shrine.id, &shrine.boon)?;
            check_values(&shrine.id, &shrine.curse)?;
        }
        Ok(())
    }
}

fn check_values<K: StatKey>(owner: &str, modifiers: &[StatModifier<K>]) -> LoadResult<()> {
    match modifiers.iter().find(|m| !m.value.is_finite()) {
        Some(m) => anyhow::bail!("{}: modifier {} has a non-finite value", owner, m.id),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{GearSlot, HookSpec};
    use delve_core::{ModifierSource, PlayerStat, StatOp};
    use std::io::Write;

    const CATALOG: &str = r#"(
        heroes: [
            (
                id: "ranger",
                name: "Ranger",
                base: { maxHP: 5.0 },
                modifiers: [
                    (id: "ranger_trigger", source: hero, type: flat, stat: fireRate, value: -10.0),
                ],
                unlocked_by_default: true,
            ),
        ],
        gear: [
            (
                id: "hair_trigger",
                name: "Hair Trigger",
                slot: weapon,
                modifiers: [
                    (id: "hair_trigger", source: weapon, type: mult, stat: fireRate, value: 0.85),
                ],
            ),
        ],
        upgrades: [
            (id: "bloodthirst", name: "Bloodthirst", hook: Some(healOnKill(amount: 0.5))),
        ],
        shrines: [
            (
                id: "shrine_of_haste",
                name: "Shrine of Haste",
                boon: [
                    (id: "haste", source: shrine, type: flat, stat: moveSpeed, value: 0.5,
                     durationMs: 30000, stackRule: refresh),
                ],
                curse: [
                    (id: "haste", source: shrine, type: mult, stat: spawnDensityMult, value: 1.25),
                ],
            ),
        ],
    )"#;

    #[test]
    fn loads_catalog_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(CATALOG.as_bytes()).unwrap();

        let catalog = CatalogLoader::load(file.path()).unwrap();
        let ranger = catalog.hero("ranger").unwrap();
        assert_eq!(ranger.base.get(PlayerStat::MaxHp), Some(5.0));
        assert_eq!(ranger.modifiers[0].op, StatOp::Flat);
        assert_eq!(ranger.level_damage_bonus, 0.05);

        let gear = catalog.gear("hair_trigger").unwrap();
        assert_eq!(gear.slot, GearSlot::Weapon);
        assert_eq!(gear.modifiers[0].source, ModifierSource::Weapon);

        let upgrade = catalog.upgrade("bloodthirst").unwrap();
        assert_eq!(upgrade.hook, Some(HookSpec::HealOnKill { amount: 0.5 }));
        assert_eq!(upgrade.weight, 1);

        let shrine = catalog.shrine("shrine_of_haste").unwrap();
        assert_eq!(shrine.boon[0].duration_ms, Some(30000));
    }

    #[test]
    fn unknown_stat_fails_the_load() {
        let bad = CATALOG.replace("stat: fireRate, value: -10.0", "stat: fireRatio, value: -10.0");
        assert!(CatalogLoader::parse(&bad).is_err());
    }

    #[test]
    fn empty_upgrade_is_rejected() {
        let bad = r#"(upgrades: [(id: "nothing", name: "Nothing")])"#;
        let err = CatalogLoader::parse(bad).unwrap_err();
        assert!(err.to_string().contains("no effect"));
    }

    #[test]
    fn builtin_catalog_validates() {
        CatalogLoader::validate(&crate::builtin::catalog()).unwrap();
    }
}
