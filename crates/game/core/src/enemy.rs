//! Enemy entity contract consumed by the elite system and the spawner.
//!
//! Movement and attack state machines live outside the rules layer; they
//! only read the numeric fields kept here (speed, health, damage, the elite
//! multipliers) after [`crate::elite::apply_elite_stats`] refreshed them.

use std::fmt;

use crate::elite::Affix;
use crate::geometry::Vec2;

/// Unique identifier of an enemy within a run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EnemyId(pub u64);

impl fmt::Display for EnemyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "enemy#{}", self.0)
    }
}

/// Key of an entry in the elite modifier table.
///
/// Allocated by [`crate::stats::ModifierEngine::allocate_elite_id`]; never
/// reused during the engine's lifetime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EliteId(pub u64);

impl fmt::Display for EliteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "elite#{}", self.0)
    }
}

/// Enemy archetypes.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter, strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EnemyKind {
    /// Runs straight at the player.
    Chaser,
    /// Winds up, then dashes.
    Charger,
    /// Keeps distance and shoots.
    Sniper,
    /// Splits into smaller copies on death.
    Splitter,
    Boss,
}

/// Base numbers of an archetype before difficulty scaling.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EnemyProfile {
    pub speed: f64,
    pub health: f64,
    pub damage: f64,
    /// Relative weight when a wave picks kinds. Zero means never rolled.
    pub weight: u32,
}

impl EnemyKind {
    /// Kinds a regular wave draws from.
    pub const WAVE_KINDS: [EnemyKind; 4] = [
        EnemyKind::Chaser,
        EnemyKind::Charger,
        EnemyKind::Sniper,
        EnemyKind::Splitter,
    ];

    pub const fn profile(self) -> EnemyProfile {
        match self {
            Self::Chaser => EnemyProfile {
                speed: 1.6,
                health: 3.0,
                damage: 1.0,
                weight: 4,
            },
            Self::Charger => EnemyProfile {
                speed: 1.2,
                health: 4.0,
                damage: 1.0,
                weight: 2,
            },
            Self::Sniper => EnemyProfile {
                speed: 0.9,
                health: 2.0,
                damage: 1.0,
                weight: 2,
            },
            Self::Splitter => EnemyProfile {
                speed: 1.1,
                health: 4.0,
                damage: 1.0,
                weight: 1,
            },
            Self::Boss => EnemyProfile {
                speed: 1.0,
                health: 40.0,
                damage: 2.0,
                weight: 0,
            },
        }
    }
}

/// Pre-affix values recorded when an enemy becomes elite.
///
/// Written once at attach time and never overwritten, so per-frame
/// re-derivation always starts from the same numbers.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EliteBaseline {
    pub speed: f64,
    pub max_health: f64,
    pub damage_reduction: f64,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Enemy {
    pub id: EnemyId,
    pub kind: EnemyKind,
    pub position: Vec2,
    pub speed: f64,
    pub health: f64,
    pub max_health: f64,
    pub damage: f64,
    pub damage_reduction: f64,
    /// Extra movement multiplier derived from the elite scope.
    pub elite_speed_mult: f64,
    pub lifesteal: f64,
    pub affix: Option<Affix>,
    pub elite_id: Option<EliteId>,
    pub baseline: Option<EliteBaseline>,
    /// Children of a splitter never become elite and never split again.
    pub is_split_child: bool,
}

impl Enemy {
    /// Fresh enemy of `kind` scaled by the wave's difficulty multipliers.
    pub fn spawn(
        id: EnemyId,
        kind: EnemyKind,
        position: Vec2,
        speed_mult: f64,
        health_mult: f64,
    ) -> Self {
        let profile = kind.profile();
        let max_health = (profile.health * health_mult).max(1.0);
        Self {
            id,
            kind,
            position,
            speed: profile.speed * speed_mult,
            health: max_health,
            max_health,
            damage: profile.damage,
            damage_reduction: 0.0,
            elite_speed_mult: 1.0,
            lifesteal: 0.0,
            affix: None,
            elite_id: None,
            baseline: None,
            is_split_child: false,
        }
    }

    /// Half-health copy spawned when a splitter dies.
    ///
    /// Elite parents split from their pre-affix baseline: children never
    /// inherit affix bonuses.
    pub fn split_child(&self, id: EnemyId, position: Vec2) -> Self {
        let (speed, max_health) = match self.baseline {
            Some(baseline) => (baseline.speed, baseline.max_health),
            None => (self.speed, self.max_health),
        };
        let max_health = (max_health / 2.0).ceil().max(1.0);
        Self {
            id,
            kind: self.kind,
            position,
            speed: speed * 1.2,
            health: max_health,
            max_health,
            damage: self.damage,
            damage_reduction: 0.0,
            elite_speed_mult: 1.0,
            lifesteal: 0.0,
            affix: None,
            elite_id: None,
            baseline: None,
            is_split_child: true,
        }
    }

    pub fn is_elite(&self) -> bool {
        self.affix.is_some()
    }

    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn health_ratio(&self) -> f64 {
        if self.max_health > 0.0 {
            self.health / self.max_health
        } else {
            0.0
        }
    }

    /// Speed the movement update should use.
    pub fn effective_speed(&self) -> f64 {
        self.speed * self.elite_speed_mult
    }

    /// Applies `amount` reduced by damage reduction. Returns the damage dealt.
    pub fn take_damage(&mut self, amount: f64) -> f64 {
        let dealt = (amount * (1.0 - self.damage_reduction)).max(0.0);
        self.health = (self.health - dealt).max(0.0);
        dealt
    }

    pub fn heal(&mut self, amount: f64) {
        self.health = (self.health + amount).min(self.max_health);
    }

    pub fn can_split(&self) -> bool {
        self.kind == EnemyKind::Splitter && !self.is_split_child
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn spawn_scales_by_wave_multipliers() {
        let enemy = Enemy::spawn(EnemyId(1), EnemyKind::Chaser, Vec2::ZERO, 1.5, 2.0);
        assert!((enemy.speed - 2.4).abs() < 1e-9);
        assert_eq!(enemy.max_health, 6.0);
        assert_eq!(enemy.health, enemy.max_health);
        assert!(!enemy.is_elite());
    }

    #[test]
    fn damage_reduction_applies() {
        let mut enemy = Enemy::spawn(EnemyId(1), EnemyKind::Charger, Vec2::ZERO, 1.0, 1.0);
        enemy.damage_reduction = 0.25;
        assert_eq!(enemy.take_damage(2.0), 1.5);
        assert_eq!(enemy.health, 2.5);
        enemy.take_damage(10.0);
        assert!(!enemy.is_alive());
    }

    #[test]
    fn split_children_do_not_split() {
        let parent = Enemy::spawn(EnemyId(1), EnemyKind::Splitter, Vec2::ZERO, 1.0, 1.0);
        assert!(parent.can_split());
        let child = parent.split_child(EnemyId(2), Vec2::new(5.0, 5.0));
        assert!(child.is_split_child);
        assert!(!child.can_split());
        assert_eq!(child.max_health, 2.0);
    }
}
