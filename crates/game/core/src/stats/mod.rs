//! Stat system: the run-scoped modifier engine.
//!
//! # Architecture
//!
//! ```text
//! [ Keys ]      PlayerStat / GlobalStat / EliteStat (closed enums)
//!      ↓
//! [ Records ]   StatBlock<K> (dense), PartialStats<K> (sparse)
//!      ↓
//! [ Modifiers ] StatModifier<K> | HookModifier, with (id, source) identity
//!      ↓
//! [ Scopes ]    ModifierScope<K>: stacking, durations, cache
//!      ↓
//! [ Engine ]    ModifierEngine: player, global and elite scopes of a run
//! ```
//!
//! ## Principles
//!
//! 1. **Flat then Mult**: every flat bonus before every multiplier
//! 2. **Pure evaluation**: inputs are never mutated; caches are transparent
//! 3. **Defensive registration**: malformed values are no-ops, never errors

pub mod block;
pub mod engine;
pub mod evaluate;
pub mod hooks;
pub mod keys;
pub mod modifier;
pub mod scope;

pub use block::{PartialStats, StatBlock};
pub use engine::{ModifierEngine, elite_base};
pub use evaluate::{evaluate, evaluate_stats};
pub use hooks::{EventPayload, GameEvent, HookCriticality, HookDispatch, HookEffect};
pub use keys::{EliteStat, GlobalStat, PlayerStat, StatKey};
pub use modifier::{
    HookHandler, HookModifier, Modifier, ModifierId, ModifierSource, StackRule, StatModifier,
    StatOp,
};
pub use scope::{ModifierScope, ModifierSeq};
