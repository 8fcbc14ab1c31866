//! Elite affixes: per-entity modifier scoping on top of the engine's elite table.
//!
//! Lifecycle of an elite:
//!
//! 1. [`promote_random_elite`] flips the wave coin and picks an enemy
//! 2. [`attach_affix`] records baselines and registers the affix modifiers
//! 3. [`apply_elite_stats`] re-derives the numbers every frame
//! 4. [`detach_affix_modifiers`] drops the table entry when the enemy leaves play
mod affix;
mod system;

pub use affix::{Affix, pick_random_affix};
pub use system::{
    apply_elite_stats, attach_affix, detach_affix_modifiers, elite_spawn_chance,
    promote_random_elite, run_volatile_explosion, vampiric_heal_amount,
};
