//! Hero, gear, upgrade and shrine definitions.
//!
//! Every effect is expressed as modifiers so the engine can treat a hero's
//! passive, a ring and a shrine curse the same way. Behavioral effects are
//! named through [`HookSpec`] and turned into handlers at registration time.

use delve_core::{
    GameEvent, GlobalStat, HookCriticality, HookEffect, HookError, HookModifier, ModifierId,
    ModifierSource, PartialStats, PlayerStat, StackRule, StatModifier,
};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// A playable hero.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HeroDef {
    pub id: String,
    pub name: String,
    /// Overrides of the default base record.
    #[cfg_attr(feature = "serde", serde(default))]
    pub base: PartialStats<PlayerStat>,
    /// Intrinsic passives, registered with the `hero` source.
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Vec<StatModifier<PlayerStat>>,
    /// Damage multiplier gained per level above 1.
    #[cfg_attr(feature = "serde", serde(default = "default_level_bonus"))]
    pub level_damage_bonus: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub unlocked_by_default: bool,
}

#[cfg(feature = "serde")]
fn default_level_bonus() -> f64 {
    HeroDef::DEFAULT_LEVEL_BONUS
}

impl HeroDef {
    pub const DEFAULT_LEVEL_BONUS: f64 = 0.05;

    /// The `hero`-sourced damage multiplier for `level`, if any.
    pub fn level_modifier(&self, level: u32) -> Option<StatModifier<PlayerStat>> {
        if level <= 1 {
            return None;
        }
        let factor = 1.0 + self.level_damage_bonus * f64::from(level - 1);
        Some(
            StatModifier::mult(
                format!("{}_level", self.id),
                ModifierSource::Hero,
                PlayerStat::Damage,
                factor,
            )
            .with_stack_rule(StackRule::Unique),
        )
    }
}

/// Equipment slot; each maps onto its own modifier source.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum GearSlot {
    Weapon,
    Ring,
    Amulet,
}

impl GearSlot {
    pub const fn source(self) -> ModifierSource {
        match self {
            Self::Weapon => ModifierSource::Weapon,
            Self::Ring => ModifierSource::Ring,
            Self::Amulet => ModifierSource::Amulet,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct GearDef {
    pub id: String,
    pub name: String,
    pub slot: GearSlot,
    pub modifiers: Vec<StatModifier<PlayerStat>>,
}

/// Named behavioral effect an upgrade can carry.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum HookSpec {
    /// Heal the player on every kill.
    HealOnKill { amount: f64 },
    /// Give a dash charge back when a room is cleared.
    DashRefundOnClear,
    /// Temporary damage bonus after taking a hit.
    RageOnHit { damage: f64, duration_ms: u64 },
    /// Short move speed burst after each dash.
    SlipstreamOnDash { move_speed: f64, duration_ms: u64 },
}

impl HookSpec {
    pub const fn event(self) -> GameEvent {
        match self {
            Self::HealOnKill { .. } => GameEvent::EnemyKilled,
            Self::DashRefundOnClear => GameEvent::RoomCleared,
            Self::RageOnHit { .. } => GameEvent::PlayerHit,
            Self::SlipstreamOnDash { .. } => GameEvent::PlayerDashed,
        }
    }

    /// Healing is load-bearing for a build; the rest are flourishes.
    pub const fn criticality(self) -> HookCriticality {
        match self {
            Self::HealOnKill { .. } => HookCriticality::Important,
            _ => HookCriticality::Optional,
        }
    }

    /// Builds the hook modifier for this effect.
    pub fn to_hook(self, id: impl Into<ModifierId>, source: ModifierSource) -> HookModifier {
        let id = id.into();
        let hook = match self {
            Self::HealOnKill { amount } => {
                HookModifier::new(id, source, self.event(), move |payload| {
                    if payload.enemy.is_none() {
                        return Err(HookError::MissingPayload {
                            event: GameEvent::EnemyKilled,
                            field: "enemy",
                        });
                    }
                    Ok(vec![HookEffect::HealPlayer(amount)])
                })
            }
            Self::DashRefundOnClear => {
                HookModifier::new(id, source, self.event(), |_| Ok(vec![HookEffect::RefundDash]))
            }
            Self::RageOnHit {
                damage,
                duration_ms,
            } => {
                let rage_id = format!("{id}_rage");
                HookModifier::new(id, source, self.event(), move |_| {
                    Ok(vec![HookEffect::AddModifier(
                        StatModifier::flat(
                            rage_id.clone(),
                            ModifierSource::Upgrade,
                            PlayerStat::Damage,
                            damage,
                        )
                        .with_duration(duration_ms)
                        .with_stack_rule(StackRule::Refresh),
                    )])
                })
            }
            Self::SlipstreamOnDash {
                move_speed,
                duration_ms,
            } => {
                let burst_id = format!("{id}_burst");
                HookModifier::new(id, source, self.event(), move |_| {
                    Ok(vec![HookEffect::AddModifier(
                        StatModifier::flat(
                            burst_id.clone(),
                            ModifierSource::Upgrade,
                            PlayerStat::MoveSpeed,
                            move_speed,
                        )
                        .with_duration(duration_ms)
                        .with_stack_rule(StackRule::Refresh),
                    )])
                })
            }
        };
        hook.with_criticality(self.criticality())
    }
}

/// A level-up choice offered during a run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct UpgradeDef {
    pub id: String,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub modifiers: Vec<StatModifier<PlayerStat>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub hook: Option<HookSpec>,
    /// Relative offer weight.
    #[cfg_attr(feature = "serde", serde(default = "default_weight"))]
    pub weight: u32,
}

#[cfg(feature = "serde")]
fn default_weight() -> u32 {
    1
}

/// A deal: a boon for the player paid for with a curse on the run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ShrineDef {
    pub id: String,
    pub name: String,
    pub boon: Vec<StatModifier<PlayerStat>>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub curse: Vec<StatModifier<GlobalStat>>,
}

/// All content a run draws from.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Catalog {
    pub heroes: Vec<HeroDef>,
    pub gear: Vec<GearDef>,
    pub upgrades: Vec<UpgradeDef>,
    pub shrines: Vec<ShrineDef>,
}

impl Catalog {
    pub fn hero(&self, id: &str) -> Option<&HeroDef> {
        self.heroes.iter().find(|h| h.id == id)
    }

    pub fn gear(&self, id: &str) -> Option<&GearDef> {
        self.gear.iter().find(|g| g.id == id)
    }

    pub fn upgrade(&self, id: &str) -> Option<&UpgradeDef> {
        self.upgrades.iter().find(|u| u.id == id)
    }

    pub fn shrine(&self, id: &str) -> Option<&ShrineDef> {
        self.shrines.iter().find(|s| s.id == id)
    }

    pub fn default_heroes(&self) -> impl Iterator<Item = &HeroDef> {
        self.heroes.iter().filter(|h| h.unlocked_by_default)
    }

    /// Ids defined more than once, per section.
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut dupes = Vec::new();
        collect_dupes(self.heroes.iter().map(|h| &h.id), "hero", &mut dupes);
        collect_dupes(self.gear.iter().map(|g| &g.id), "gear", &mut dupes);
        collect_dupes(self.upgrades.iter().map(|u| &u.id), "upgrade", &mut dupes);
        collect_dupes(self.shrines.iter().map(|s| &s.id), "shrine", &mut dupes);
        dupes
    }
}

fn collect_dupes<'a>(ids: impl Iterator<Item = &'a String>, kind: &str, out: &mut Vec<String>) {
    let mut seen = std::collections::BTreeSet::new();
    for id in ids {
        if !seen.insert(id.as_str()) {
            out.push(format!("{kind}:{id}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use delve_core::EventPayload;
    use delve_core::EnemyId;

    #[test]
    fn level_modifier_grows_with_level() {
        let hero = crate::builtin::catalog().heroes.remove(0);
        assert!(hero.level_modifier(1).is_none());
        let m = hero.level_modifier(3).unwrap();
        assert_eq!(m.source, ModifierSource::Hero);
        assert_eq!(m.stack_rule, StackRule::Unique);
        assert!((m.value - (1.0 + 2.0 * hero.level_damage_bonus)).abs() < 1e-9);
    }

    #[test]
    fn heal_hook_needs_an_enemy() {
        let hook = HookSpec::HealOnKill { amount: 1.0 }.to_hook("leech", ModifierSource::Upgrade);
        assert_eq!(hook.event, GameEvent::EnemyKilled);
        assert!((hook.handler)(&EventPayload::new()).is_err());
        assert_eq!(
            (hook.handler)(&EventPayload::new().with_enemy(EnemyId(3))).unwrap(),
            vec![HookEffect::HealPlayer(1.0)]
        );
    }

    #[test]
    fn rage_hook_requests_refreshing_timed_bonus() {
        let hook = HookSpec::RageOnHit {
            damage: 2.0,
            duration_ms: 3000,
        }
        .to_hook("rage", ModifierSource::Upgrade);
        let effects = (hook.handler)(&EventPayload::new()).unwrap();
        let [HookEffect::AddModifier(m)] = effects.as_slice() else {
            panic!("unexpected effects {effects:?}");
        };
        assert_eq!(m.duration_ms, Some(3000));
        assert_eq!(m.stack_rule, StackRule::Refresh);
        assert_eq!(m.id.as_str(), "rage_rage");
    }

    #[test]
    fn slipstream_listens_for_dashes_and_is_optional() {
        let spec = HookSpec::SlipstreamOnDash {
            move_speed: 0.5,
            duration_ms: 1500,
        };
        let hook = spec.to_hook("slipstream", ModifierSource::Upgrade);
        assert_eq!(hook.event, GameEvent::PlayerDashed);
        assert_eq!(hook.criticality, HookCriticality::Optional);
        let effects = (hook.handler)(&EventPayload::new()).unwrap();
        let [HookEffect::AddModifier(m)] = effects.as_slice() else {
            panic!("unexpected effects {effects:?}");
        };
        assert_eq!(m.stat, PlayerStat::MoveSpeed);
        assert_eq!(m.duration_ms, Some(1500));
    }

    #[test]
    fn hook_criticality_follows_effect_kind() {
        let heal = HookSpec::HealOnKill { amount: 1.0 }.to_hook("leech", ModifierSource::Upgrade);
        assert_eq!(heal.criticality, HookCriticality::Important);
        let refund = HookSpec::DashRefundOnClear.to_hook("second_wind", ModifierSource::Upgrade);
        assert_eq!(refund.criticality, HookCriticality::Optional);
    }

    #[test]
    fn duplicates_are_reported() {
        let mut catalog = crate::builtin::catalog();
        assert!(catalog.duplicate_ids().is_empty());
        let copy = catalog.gear[0].clone();
        catalog.gear.push(copy);
        assert_eq!(catalog.duplicate_ids().len(), 1);
    }
}
