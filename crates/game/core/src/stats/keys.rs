//! Closed stat key sets, one per evaluation scope.
//!
//! The player, the global run state and elite enemies each have their own
//! enum of keys. Evaluation is total over these enums: a modifier can only
//! name a key that exists in its scope, so there is no "unknown stat" path.
//! Content files refer to keys by their camelCase names (`maxHP`,
//! `fireRate`, `enemyHealthMult`, ...), parsed through [`std::str::FromStr`].

use std::fmt::Debug;
use std::hash::Hash;

use strum::{EnumCount, IntoEnumIterator};

/// Common behavior of every stat key enum.
pub trait StatKey:
    Copy + Eq + Ord + Hash + Debug + IntoEnumIterator + EnumCount + 'static
{
    /// Dense index of the key, in declaration order.
    fn index(self) -> usize;

    /// Canonical camelCase name.
    fn name(self) -> &'static str;

    /// Value of the key in a freshly created record.
    fn default_value(self) -> f64;
}

/// Player-scoped stats driven by hero, gear, upgrades and shrines.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    strum::EnumCount,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::Display,
)]
#[strum(serialize_all = "camelCase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum PlayerStat {
    #[strum(serialize = "maxHP")]
    #[cfg_attr(feature = "serde", serde(rename = "maxHP"))]
    MaxHp,
    MoveSpeed,
    Damage,
    /// Milliseconds between shots; lower is faster.
    FireRate,
    ProjectileSpeed,
    CritChance,
    CritMultiplier,
    DashCharges,
    PickupRadius,
    BulletsPerShot,
}

impl StatKey for PlayerStat {
    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        self.into()
    }

    fn default_value(self) -> f64 {
        match self {
            Self::MaxHp => 6.0,
            Self::MoveSpeed => 3.0,
            Self::Damage => 1.0,
            Self::FireRate => 150.0,
            Self::ProjectileSpeed => 8.0,
            Self::CritChance => 0.05,
            Self::CritMultiplier => 2.0,
            Self::DashCharges => 1.0,
            Self::PickupRadius => 40.0,
            Self::BulletsPerShot => 1.0,
        }
    }
}

/// Run-wide difficulty knobs.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    strum::EnumCount,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::Display,
)]
#[strum(serialize_all = "camelCase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum GlobalStat {
    DifficultyScale,
    EnemyHealthMult,
    SpawnDensityMult,
    EnemyDamageMult,
    DifficultyModifier,
}

impl StatKey for GlobalStat {
    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        self.into()
    }

    fn default_value(self) -> f64 {
        match self {
            Self::DifficultyModifier => 0.0,
            _ => 1.0,
        }
    }
}

/// Per-elite stats re-derived every frame from the elite's baseline.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumIter,
    strum::EnumCount,
    strum::EnumString,
    strum::IntoStaticStr,
    strum::Display,
)]
#[strum(serialize_all = "camelCase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum EliteStat {
    Speed,
    MaxHealth,
    DamageReduction,
    SpeedMult,
    Lifesteal,
}

impl StatKey for EliteStat {
    fn index(self) -> usize {
        self as usize
    }

    fn name(self) -> &'static str {
        self.into()
    }

    fn default_value(self) -> f64 {
        match self {
            Self::MaxHealth | Self::SpeedMult => 1.0,
            Self::Speed | Self::DamageReduction | Self::Lifesteal => 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn names_round_trip() {
        assert_eq!(PlayerStat::MaxHp.name(), "maxHP");
        assert_eq!(PlayerStat::from_str("fireRate"), Ok(PlayerStat::FireRate));
        assert_eq!(
            GlobalStat::from_str("enemyHealthMult"),
            Ok(GlobalStat::EnemyHealthMult)
        );
        assert_eq!(EliteStat::DamageReduction.to_string(), "damageReduction");
        assert!(PlayerStat::from_str("luck").is_err());
    }

    #[test]
    fn indices_are_dense() {
        for (i, key) in PlayerStat::iter().enumerate() {
            assert_eq!(key.index(), i);
        }
        assert_eq!(PlayerStat::COUNT, 10);
        assert_eq!(GlobalStat::COUNT, 5);
        assert_eq!(EliteStat::COUNT, 5);
    }
}
