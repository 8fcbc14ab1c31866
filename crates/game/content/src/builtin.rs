//! Content compiled into the binary, used when no data directory is given.

use delve_core::{
    GlobalStat, ModifierSource, PartialStats, PlayerStat, StackRule, StatModifier,
};

use crate::catalog::{Catalog, GearDef, GearSlot, HeroDef, HookSpec, ShrineDef, UpgradeDef};

type P = PlayerStat;

fn hero(id: &str, name: &str) -> HeroDef {
    HeroDef {
        id: id.into(),
        name: name.into(),
        base: PartialStats::new(),
        modifiers: Vec::new(),
        level_damage_bonus: HeroDef::DEFAULT_LEVEL_BONUS,
        unlocked_by_default: false,
    }
}

fn upgrade(id: &str, name: &str) -> UpgradeDef {
    UpgradeDef {
        id: id.into(),
        name: name.into(),
        modifiers: Vec::new(),
        hook: None,
        weight: 1,
    }
}

fn flat(id: &'static str, source: ModifierSource, stat: P, value: f64) -> StatModifier<P> {
    StatModifier::flat(id, source, stat, value)
}

fn mult(id: &'static str, source: ModifierSource, stat: P, value: f64) -> StatModifier<P> {
    StatModifier::mult(id, source, stat, value)
}

pub fn heroes() -> Vec<HeroDef> {
    use ModifierSource::Hero;
    vec![
        HeroDef {
            modifiers: vec![flat("ranger_trigger", Hero, P::FireRate, -10.0)],
            unlocked_by_default: true,
            ..hero("ranger", "Ranger")
        },
        HeroDef {
            base: PartialStats::new()
                .with(P::MaxHp, 8.0)
                .with(P::MoveSpeed, 2.6),
            modifiers: vec![flat("knight_edge", Hero, P::Damage, 1.0)],
            level_damage_bonus: 0.08,
            ..hero("knight", "Knight")
        },
        HeroDef {
            modifiers: vec![
                flat("rogue_eye", Hero, P::CritChance, 0.1),
                flat("rogue_step", Hero, P::DashCharges, 1.0),
            ],
            ..hero("rogue", "Rogue")
        },
    ]
}

pub fn gear() -> Vec<GearDef> {
    use ModifierSource::{Amulet, Ring, Weapon};
    let item = |id: &str, name: &str, slot, modifiers| GearDef {
        id: id.into(),
        name: name.into(),
        slot,
        modifiers,
    };
    vec![
        item(
            "iron_sword",
            "Iron Sword",
            GearSlot::Weapon,
            vec![flat("iron_sword", Weapon, P::Damage, 1.0)],
        ),
        item(
            "hair_trigger",
            "Hair Trigger",
            GearSlot::Weapon,
            vec![mult("hair_trigger", Weapon, P::FireRate, 0.85)],
        ),
        item(
            "ring_of_haste",
            "Ring of Haste",
            GearSlot::Ring,
            vec![mult("ring_of_haste", Ring, P::MoveSpeed, 1.1)],
        ),
        item(
            "ring_of_vigor",
            "Ring of Vigor",
            GearSlot::Ring,
            vec![flat("ring_of_vigor", Ring, P::MaxHp, 2.0)],
        ),
        item(
            "amulet_of_focus",
            "Amulet of Focus",
            GearSlot::Amulet,
            vec![flat("amulet_of_focus", Amulet, P::CritMultiplier, 0.5)],
        ),
    ]
}

pub fn upgrades() -> Vec<UpgradeDef> {
    use ModifierSource::Upgrade;
    vec![
        UpgradeDef {
            modifiers: vec![mult("quick_hands", Upgrade, P::FireRate, 0.85)],
            weight: 3,
            ..upgrade("quick_hands", "Quick Hands")
        },
        UpgradeDef {
            modifiers: vec![
                flat("heavy_rounds", Upgrade, P::Damage, 1.0),
                mult("heavy_rounds", Upgrade, P::ProjectileSpeed, 0.9),
            ],
            weight: 3,
            ..upgrade("heavy_rounds", "Heavy Rounds")
        },
        UpgradeDef {
            modifiers: vec![
                flat("multishot", Upgrade, P::BulletsPerShot, 1.0),
                mult("multishot", Upgrade, P::Damage, 0.8),
            ],
            ..upgrade("multishot", "Multishot")
        },
        UpgradeDef {
            hook: Some(HookSpec::HealOnKill { amount: 0.5 }),
            weight: 2,
            ..upgrade("bloodthirst", "Bloodthirst")
        },
        UpgradeDef {
            hook: Some(HookSpec::DashRefundOnClear),
            ..upgrade("second_wind", "Second Wind")
        },
        UpgradeDef {
            hook: Some(HookSpec::RageOnHit {
                damage: 1.0,
                duration_ms: 4000,
            }),
            ..upgrade("spite", "Spite")
        },
        UpgradeDef {
            hook: Some(HookSpec::SlipstreamOnDash {
                move_speed: 0.5,
                duration_ms: 1500,
            }),
            ..upgrade("slipstream", "Slipstream")
        },
    ]
}

pub fn shrines() -> Vec<ShrineDef> {
    use ModifierSource::Shrine;
    vec![
        ShrineDef {
            id: "shrine_of_blood".into(),
            name: "Shrine of Blood".into(),
            boon: vec![mult("shrine_of_blood", Shrine, P::Damage, 1.3)],
            curse: vec![StatModifier::mult(
                "shrine_of_blood",
                Shrine,
                GlobalStat::EnemyHealthMult,
                1.2,
            )],
        },
        ShrineDef {
            id: "shrine_of_haste".into(),
            name: "Shrine of Haste".into(),
            boon: vec![
                flat("shrine_of_haste", Shrine, P::MoveSpeed, 0.5)
                    .with_duration(30_000)
                    .with_stack_rule(StackRule::Refresh),
            ],
            curse: vec![StatModifier::mult(
                "shrine_of_haste",
                Shrine,
                GlobalStat::SpawnDensityMult,
                1.25,
            )],
        },
        ShrineDef {
            id: "shrine_of_glass".into(),
            name: "Shrine of Glass".into(),
            boon: vec![
                flat("shrine_of_glass", Shrine, P::CritChance, 0.15),
                flat("shrine_of_glass", Shrine, P::MaxHp, -2.0),
            ],
            curse: vec![StatModifier::mult(
                "shrine_of_glass",
                Shrine,
                GlobalStat::EnemyDamageMult,
                1.25,
            )],
        },
    ]
}

/// The full built-in catalog.
pub fn catalog() -> Catalog {
    Catalog {
        heroes: heroes(),
        gear: gear(),
        upgrades: upgrades(),
        shrines: shrines(),
    }
}
