//! The fixed affix pool and the modifiers each affix contributes.

use rand::Rng;

use crate::stats::{EliteStat, ModifierSource, StatModifier};

/// Named bundle of elite modifiers plus an optional behavior.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter, strum::EnumString,
)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Affix {
    /// Faster, and faster still when wounded.
    Frenzied,
    /// More health and damage reduction.
    Hardened,
    /// Explodes on death.
    Volatile,
    /// Heals when it hits the player.
    Vampiric,
}

impl Affix {
    pub const ALL: [Affix; 4] = [
        Affix::Frenzied,
        Affix::Hardened,
        Affix::Volatile,
        Affix::Vampiric,
    ];

    /// Elite-scope modifiers registered at attach time.
    pub fn modifiers(self) -> Vec<StatModifier<EliteStat>> {
        let flat = |stat, value| StatModifier::flat(self.id(), ModifierSource::Elite, stat, value);
        match self {
            Self::Frenzied => vec![
                flat(EliteStat::Speed, 0.4),
                flat(EliteStat::SpeedMult, 0.25),
            ],
            Self::Hardened => vec![
                flat(EliteStat::MaxHealth, 2.0),
                flat(EliteStat::DamageReduction, 0.15),
            ],
            Self::Volatile => Vec::new(),
            Self::Vampiric => vec![flat(EliteStat::Lifesteal, 0.5)],
        }
    }

    /// Max health gained at attach time, also granted as current health.
    pub fn max_health_bonus(self) -> f64 {
        self.modifiers()
            .iter()
            .filter(|m| m.stat == EliteStat::MaxHealth && m.value.is_finite())
            .map(|m| m.value)
            .sum()
    }

    pub const fn id(self) -> &'static str {
        match self {
            Self::Frenzied => "frenzied",
            Self::Hardened => "hardened",
            Self::Volatile => "volatile",
            Self::Vampiric => "vampiric",
        }
    }
}

/// Draws one affix uniformly from the pool.
pub fn pick_random_affix(rng: &mut impl Rng) -> Affix {
    Affix::ALL[rng.gen_range(0..Affix::ALL.len())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::RunRng;
    use strum::IntoEnumIterator;

    #[test]
    fn pool_matches_enum() {
        assert_eq!(Affix::iter().collect::<Vec<_>>(), Affix::ALL.to_vec());
        for affix in Affix::ALL {
            assert_eq!(affix.to_string(), affix.id());
        }
    }

    #[test]
    fn only_hardened_grants_health() {
        assert_eq!(Affix::Hardened.max_health_bonus(), 2.0);
        assert_eq!(Affix::Frenzied.max_health_bonus(), 0.0);
        assert!(Affix::Volatile.modifiers().is_empty());
    }

    #[test]
    fn random_affix_covers_pool() {
        let mut rng = RunRng::new(11);
        let mut seen = [false; 4];
        for _ in 0..200 {
            let affix = pick_random_affix(&mut rng);
            seen[Affix::ALL.iter().position(|a| *a == affix).unwrap()] = true;
        }
        assert!(seen.iter().all(|s| *s));
    }
}
