//! The run-scoped modifier engine.
//!
//! [`ModifierEngine`] owns the three modifier scopes of a run and their base
//! records:
//!
//! ```text
//! [ player base ] + [ active modifiers ] → derived stats   (cached)
//! [ global base ] + [ global modifiers ] → derived global  (cached)
//! [ elite base  ] + [ elite table[id]  ] → elite stats     (per call)
//! ```
//!
//! It is explicit state owned by the orchestrator, never a process-wide
//! singleton, so several runs (or tests) can coexist.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::block::{PartialStats, StatBlock};
use super::evaluate::evaluate_stats;
use super::hooks::{EventPayload, GameEvent, HookCriticality, HookDispatch};
use super::keys::{EliteStat, GlobalStat, PlayerStat, StatKey};
use super::modifier::{HookModifier, Modifier, ModifierSource, StatModifier};
use super::scope::{ModifierScope, ModifierSeq};
use crate::clock::{Clock, SystemClock};
use crate::enemy::EliteId;
use crate::error::HookFailure;

pub struct ModifierEngine {
    clock: Arc<dyn Clock>,
    base_stats: StatBlock<PlayerStat>,
    base_global: StatBlock<GlobalStat>,
    player: ModifierScope<PlayerStat>,
    global: ModifierScope<GlobalStat>,
    elites: BTreeMap<EliteId, Vec<StatModifier<EliteStat>>>,
    next_seq: u64,
    /// Never reset: elite ids are unique for the engine's lifetime.
    next_elite_id: u64,
}

impl ModifierEngine {
    /// Engine stamping registrations with `clock`, default base records.
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            clock,
            base_stats: StatBlock::new(),
            base_global: StatBlock::new(),
            player: ModifierScope::new(),
            global: ModifierScope::new(),
            elites: BTreeMap::new(),
            next_seq: 0,
            next_elite_id: 1,
        }
    }

    /// Engine on wall-clock time.
    pub fn with_system_clock() -> Self {
        Self::new(Arc::new(SystemClock))
    }

    pub fn now(&self) -> u64 {
        self.clock.now_ms()
    }

    // ===== base records =====

    pub fn base_stats(&self) -> &StatBlock<PlayerStat> {
        &self.base_stats
    }

    pub fn base_global(&self) -> &StatBlock<GlobalStat> {
        &self.base_global
    }

    /// Replaces the player base record (run start).
    pub fn set_base_stats(&mut self, base: StatBlock<PlayerStat>) {
        self.base_stats = base;
        self.player.invalidate();
    }

    /// Overwrites only the keys present in `partial`; modifier lists are untouched.
    pub fn sync_base_stats(&mut self, partial: &PartialStats<PlayerStat>) {
        self.base_stats.apply_partial(partial);
        self.player.invalidate();
    }

    pub fn set_base_global(&mut self, base: StatBlock<GlobalStat>) {
        self.base_global = base;
        self.global.invalidate();
    }

    pub fn sync_base_global(&mut self, partial: &PartialStats<GlobalStat>) {
        self.base_global.apply_partial(partial);
        self.global.invalidate();
    }

    // ===== registration =====

    /// Registers a player-scoped modifier, honoring its stack rule.
    pub fn add_modifier(&mut self, modifier: impl Into<Modifier<PlayerStat>>) {
        let modifier = modifier.into();
        let (seq, now) = (self.bump_seq(), self.now());
        trace!(
            target: "delve::modifiers",
            id = %modifier.id(),
            source = %modifier.source(),
            "add modifier"
        );
        self.player.register(modifier, seq, now);
    }

    pub fn remove_modifier(&mut self, id: &str, source: Option<ModifierSource>) -> usize {
        self.player.remove(id, source)
    }

    pub fn add_global_modifier(&mut self, modifier: impl Into<Modifier<GlobalStat>>) {
        let modifier = modifier.into();
        let (seq, now) = (self.bump_seq(), self.now());
        trace!(
            target: "delve::modifiers",
            id = %modifier.id(),
            source = %modifier.source(),
            "add global modifier"
        );
        self.global.register(modifier, seq, now);
    }

    pub fn remove_global_modifier(&mut self, id: &str, source: Option<ModifierSource>) -> usize {
        self.global.remove(id, source)
    }

    /// Convenience for a hook listening on the player scope.
    pub fn add_hook(&mut self, hook: HookModifier) {
        self.add_modifier(hook);
    }

    // ===== elite table =====

    /// Hands out the next elite id. Ids are never reused, even across resets.
    pub fn allocate_elite_id(&mut self) -> EliteId {
        let id = EliteId(self.next_elite_id);
        self.next_elite_id += 1;
        id
    }

    pub fn add_elite_modifier(&mut self, elite: EliteId, modifier: StatModifier<EliteStat>) {
        self.elites.entry(elite).or_default().push(modifier);
    }

    /// Deletes the whole entry of `elite`. Returns whether one existed.
    pub fn remove_elite_modifiers(&mut self, elite: EliteId) -> bool {
        self.elites.remove(&elite).is_some()
    }

    pub fn has_elite_entry(&self, elite: EliteId) -> bool {
        self.elites.contains_key(&elite)
    }

    pub fn elite_entry_count(&self) -> usize {
        self.elites.len()
    }

    // ===== evaluation =====

    /// Derived player stats, memoized until the next mutation.
    pub fn derived_stats(&self) -> &StatBlock<PlayerStat> {
        self.player.derived(&self.base_stats)
    }

    /// Derived global difficulty record, memoized until the next mutation.
    pub fn derived_global(&self) -> &StatBlock<GlobalStat> {
        self.global.derived(&self.base_global)
    }

    /// Elite stats for `elite` from `base`. Returns `base` unchanged when the
    /// id has no entry. Never cached.
    pub fn elite_derived_stats(
        &self,
        elite: EliteId,
        base: &StatBlock<EliteStat>,
    ) -> StatBlock<EliteStat> {
        match self.elites.get(&elite) {
            Some(modifiers) => evaluate_stats(base, modifiers.iter()),
            None => base.clone(),
        }
    }

    pub fn modifiers(&self) -> impl Iterator<Item = &Modifier<PlayerStat>> {
        self.player.modifiers()
    }

    pub fn global_modifiers(&self) -> impl Iterator<Item = &Modifier<GlobalStat>> {
        self.global.modifiers()
    }

    pub fn is_derived_cached(&self) -> bool {
        self.player.is_cached()
    }

    // ===== lifecycle =====

    /// Removes every timed modifier (both scopes) whose duration elapsed at `now`.
    ///
    /// Returns the number of modifiers removed. Caches are dropped once, and
    /// only if something expired.
    pub fn process_modifier_durations(&mut self, now: u64) -> usize {
        let expired_player = self.player.expire(now);
        let expired_global = self.global.expire(now);

        for m in &expired_player {
            trace!(target: "delve::modifiers", id = %m.id(), source = %m.source(), now, "modifier expired");
        }
        for m in &expired_global {
            trace!(target: "delve::modifiers", id = %m.id(), source = %m.source(), now, "global modifier expired");
        }

        let removed = expired_player.len() + expired_global.len();
        if removed > 0 {
            self.player.invalidate();
            self.global.invalidate();
        }
        removed
    }

    /// Clears both lists, the elite table, duration tracking and caches.
    ///
    /// Base records are left alone; the caller resets them for the next run.
    pub fn reset_modifiers(&mut self) {
        self.player.clear();
        self.global.clear();
        self.elites.clear();
        debug!(target: "delve::modifiers", "modifiers reset");
    }

    // ===== events =====

    /// Invokes every hook listening for `event` (player list, then global
    /// list), in registration order.
    ///
    /// A failing handler does not stop the others: its error is logged
    /// according to its criticality and recorded in the dispatch.
    pub fn emit_game_event(&self, event: GameEvent, payload: &EventPayload) -> HookDispatch {
        let mut dispatch = HookDispatch::default();

        let hooks = self
            .player
            .hooks_for(event)
            .chain(self.global.hooks_for(event));

        for hook in hooks {
            dispatch.invoked += 1;
            match (hook.handler)(payload) {
                Ok(effects) => dispatch.effects.extend(effects),
                Err(error) => {
                    match hook.criticality {
                        HookCriticality::Important => warn!(
                            target: "delve::hooks",
                            hook = %hook.id,
                            source = %hook.source,
                            %event,
                            error = %error,
                            "Hook failed, continuing"
                        ),
                        HookCriticality::Optional => debug!(
                            target: "delve::hooks",
                            hook = %hook.id,
                            source = %hook.source,
                            %event,
                            error = %error,
                            "Optional hook failed"
                        ),
                    }
                    dispatch.failures.push(HookFailure {
                        id: hook.id.clone(),
                        source: hook.source,
                        event,
                        criticality: hook.criticality,
                        error,
                    });
                }
            }
        }

        dispatch
    }

    fn bump_seq(&mut self) -> ModifierSeq {
        let seq = ModifierSeq(self.next_seq);
        self.next_seq += 1;
        seq
    }
}

impl Default for ModifierEngine {
    fn default() -> Self {
        Self::with_system_clock()
    }
}

/// Base record of an elite, built from its pre-affix baselines.
pub fn elite_base(speed: f64, max_health: f64, damage_reduction: f64) -> StatBlock<EliteStat> {
    StatBlock::from_pairs([
        (EliteStat::Speed, speed),
        (EliteStat::MaxHealth, max_health),
        (EliteStat::DamageReduction, damage_reduction),
        (EliteStat::SpeedMult, EliteStat::SpeedMult.default_value()),
        (EliteStat::Lifesteal, EliteStat::Lifesteal.default_value()),
    ])
}
