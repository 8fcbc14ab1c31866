use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use super::affix::{Affix, pick_random_affix};
use crate::config::EliteConfig;
use crate::enemy::{EliteBaseline, EliteId, Enemy};
use crate::geometry::Vec2;
use crate::stats::{EliteStat, ModifierEngine, elite_base};

/// Chance that a wave contains an elite at the given difficulty modifier.
///
/// `min(cap, base + difficulty * per_difficulty)`; negative difficulty is
/// treated as zero.
pub fn elite_spawn_chance(difficulty_modifier: f64, config: &EliteConfig) -> f64 {
    let d = if difficulty_modifier.is_finite() {
        difficulty_modifier.max(0.0)
    } else {
        0.0
    };
    (config.base_chance + d * config.chance_per_difficulty).min(config.chance_cap)
}

/// Turns `enemy` into an elite carrying `affix`.
///
/// Returns the allocated elite id, or `None` when the enemy already carries
/// an affix (an enemy never holds two).
pub fn attach_affix(
    engine: &mut ModifierEngine,
    enemy: &mut Enemy,
    affix: Affix,
    config: &EliteConfig,
) -> Option<EliteId> {
    if enemy.is_elite() {
        debug!(
            target: "delve::elite",
            enemy = %enemy.id,
            existing = ?enemy.affix,
            requested = %affix,
            "enemy is already elite, ignoring attach"
        );
        return None;
    }

    let elite = engine.allocate_elite_id();
    enemy.baseline = Some(EliteBaseline {
        speed: enemy.speed,
        max_health: enemy.max_health,
        damage_reduction: 0.0,
    });
    enemy.affix = Some(affix);
    enemy.elite_id = Some(elite);
    enemy.health += affix.max_health_bonus();

    for modifier in affix.modifiers() {
        engine.add_elite_modifier(elite, modifier);
    }
    apply_elite_stats(engine, enemy, config);

    debug!(
        target: "delve::elite",
        enemy = %enemy.id,
        %elite,
        %affix,
        max_health = enemy.max_health,
        "affix attached"
    );
    Some(elite)
}

/// Re-derives the elite fields of `enemy` from its baseline.
///
/// Must run before the enemy's movement update each frame. Non-elites are
/// left untouched.
pub fn apply_elite_stats(engine: &ModifierEngine, enemy: &mut Enemy, config: &EliteConfig) {
    let (Some(elite), Some(baseline)) = (enemy.elite_id, enemy.baseline) else {
        return;
    };

    let base = elite_base(baseline.speed, baseline.max_health, baseline.damage_reduction);
    let derived = engine.elite_derived_stats(elite, &base);

    enemy.max_health = derived[EliteStat::MaxHealth].max(config.min_max_health);
    enemy.damage_reduction = derived[EliteStat::DamageReduction].clamp(0.0, config.max_damage_reduction);
    enemy.elite_speed_mult = derived[EliteStat::SpeedMult].max(config.min_speed_mult);
    enemy.lifesteal = derived[EliteStat::Lifesteal];

    let mut speed = derived[EliteStat::Speed];
    if enemy.affix == Some(Affix::Frenzied) && enemy.health_ratio() < config.frenzy_health_ratio {
        speed += config.frenzy_speed_bonus;
    }
    enemy.speed = speed.max(config.min_speed);
}

/// Deletes the elite table entry of `enemy`. Call once when it leaves play.
///
/// Returns whether an entry was removed.
pub fn detach_affix_modifiers(engine: &mut ModifierEngine, enemy: &Enemy) -> bool {
    let Some(elite) = enemy.elite_id else {
        return false;
    };
    let removed = engine.remove_elite_modifiers(elite);
    if removed {
        debug!(target: "delve::elite", enemy = %enemy.id, %elite, "affix detached");
    }
    removed
}

/// Health a vampiric elite regains when it hits the player.
pub fn vampiric_heal_amount(enemy: &Enemy, config: &EliteConfig) -> f64 {
    if enemy.affix != Some(Affix::Vampiric) {
        return 0.0;
    }
    if enemy.lifesteal > 0.0 {
        enemy.lifesteal
    } else {
        config.default_lifesteal
    }
}

/// Death explosion of a volatile elite.
///
/// Calls `damage_player` with `max(1, round(base * (1 - dist / radius * 0.5)))`
/// when the player stands within the radius, and returns the damage dealt.
pub fn run_volatile_explosion<F>(
    enemy: &Enemy,
    player: Vec2,
    config: &EliteConfig,
    damage_player: F,
) -> Option<u32>
where
    F: FnOnce(u32),
{
    if enemy.affix != Some(Affix::Volatile) {
        return None;
    }
    let dist = enemy.position.distance(player);
    if dist > config.explosion_radius {
        return None;
    }

    let falloff = 1.0 - (dist / config.explosion_radius) * 0.5;
    let damage = (config.explosion_damage * falloff).round().max(1.0) as u32;
    debug!(target: "delve::elite", enemy = %enemy.id, dist, damage, "volatile explosion");
    damage_player(damage);
    Some(damage)
}

/// One elite roll for a freshly spawned wave.
///
/// Flips a single coin with probability `chance`; on success one enemy that
/// is not a split child gets a random affix. Returns the index of the
/// promoted enemy.
pub fn promote_random_elite(
    engine: &mut ModifierEngine,
    wave: &mut [Enemy],
    chance: f64,
    config: &EliteConfig,
    rng: &mut impl Rng,
) -> Option<usize> {
    let chance = if chance.is_finite() { chance.clamp(0.0, 1.0) } else { 0.0 };
    if wave.is_empty() || !rng.gen_bool(chance) {
        return None;
    }

    let candidates: Vec<usize> = wave
        .iter()
        .enumerate()
        .filter(|(_, e)| !e.is_split_child && !e.is_elite())
        .map(|(i, _)| i)
        .collect();
    let &index = candidates.choose(rng)?;

    let affix = pick_random_affix(rng);
    attach_affix(engine, &mut wave[index], affix, config).map(|_| index)
}
