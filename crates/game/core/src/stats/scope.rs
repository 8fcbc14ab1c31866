//! One modifier list with its stacking rules, duration tracking and cache.

use std::cell::OnceCell;
use std::collections::BTreeMap;

use super::block::StatBlock;
use super::evaluate::evaluate_stats;
use super::hooks::GameEvent;
use super::keys::StatKey;
use super::modifier::{HookModifier, Modifier, ModifierSource, StackRule, StatModifier};

/// Registration sequence number, unique per engine.
///
/// Used as the key of duration start times instead of the modifier itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModifierSeq(pub u64);

#[derive(Clone, Debug)]
struct Entry<K: StatKey> {
    seq: ModifierSeq,
    modifier: Modifier<K>,
}

/// Append-ordered modifier list of one scope (player or global).
///
/// The derived record is memoized in a [`OnceCell`] and dropped on every
/// mutation; evaluation through [`ModifierScope::derived`] never mutates the
/// list.
#[derive(Debug)]
pub struct ModifierScope<K: StatKey> {
    entries: Vec<Entry<K>>,
    started: BTreeMap<ModifierSeq, u64>,
    cache: OnceCell<StatBlock<K>>,
}

impl<K: StatKey> ModifierScope<K> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            started: BTreeMap::new(),
            cache: OnceCell::new(),
        }
    }

    /// Applies the stacking rule of `modifier` and appends it.
    ///
    /// Returns `false` when a `Unique` modifier was already present and the
    /// call was a no-op.
    pub fn register(&mut self, modifier: Modifier<K>, seq: ModifierSeq, now: u64) -> bool {
        match modifier.stack_rule() {
            StackRule::Unique => {
                if self.entries.iter().any(|e| e.modifier.same_identity(&modifier)) {
                    return false;
                }
            }
            StackRule::Refresh => {
                let id = modifier.id().clone();
                self.remove(id.as_str(), Some(modifier.source()));
            }
            StackRule::Stack => {}
        }

        if modifier.duration_ms().is_some() {
            self.started.insert(seq, now);
        }
        self.entries.push(Entry { seq, modifier });
        self.invalidate();
        true
    }

    /// Removes every entry matching `id` (and `source` when given).
    pub fn remove(&mut self, id: &str, source: Option<ModifierSource>) -> usize {
        let started = &mut self.started;
        let before = self.entries.len();
        self.entries.retain(|e| {
            let hit = e.modifier.matches(id, source);
            if hit {
                started.remove(&e.seq);
            }
            !hit
        });
        let removed = before - self.entries.len();
        if removed > 0 {
            self.invalidate();
        }
        removed
    }

    /// Drops every timed entry whose duration has elapsed at `now`.
    ///
    /// Does not touch the cache; the engine invalidates once for all scopes.
    pub(crate) fn expire(&mut self, now: u64) -> Vec<Modifier<K>> {
        let mut expired = Vec::new();
        let started = &mut self.started;
        self.entries.retain(|e| {
            let Some(duration) = e.modifier.duration_ms() else {
                return true;
            };
            let Some(&start) = started.get(&e.seq) else {
                return true;
            };
            if now.saturating_sub(start) >= duration {
                started.remove(&e.seq);
                expired.push(e.modifier.clone());
                false
            } else {
                true
            }
        });
        expired
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.started.clear();
        self.invalidate();
    }

    pub fn invalidate(&mut self) {
        self.cache.take();
    }

    /// Derived record for `base`, memoized until the next mutation.
    pub fn derived(&self, base: &StatBlock<K>) -> &StatBlock<K> {
        self.cache
            .get_or_init(|| evaluate_stats(base, self.stat_modifiers()))
    }

    pub fn is_cached(&self) -> bool {
        self.cache.get().is_some()
    }

    pub fn modifiers(&self) -> impl Iterator<Item = &Modifier<K>> + Clone {
        self.entries.iter().map(|e| &e.modifier)
    }

    pub fn stat_modifiers(&self) -> impl Iterator<Item = &StatModifier<K>> + Clone {
        self.modifiers().filter_map(Modifier::as_stat)
    }

    /// Hooks listening for `event`, in list order.
    pub fn hooks_for(&self, event: GameEvent) -> impl Iterator<Item = &HookModifier> {
        self.modifiers()
            .filter_map(Modifier::as_hook)
            .filter(move |h| h.event == event)
    }

    /// Number of timed entries currently tracked.
    pub fn tracked_durations(&self) -> usize {
        self.started.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: StatKey> Default for ModifierScope<K> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::PlayerStat;

    fn max_hp(value: f64, rule: StackRule) -> Modifier<PlayerStat> {
        StatModifier::flat("vigor", ModifierSource::Upgrade, PlayerStat::MaxHp, value)
            .with_stack_rule(rule)
            .into()
    }

    #[test]
    fn unique_keeps_first_refresh_keeps_last() {
        let base = StatBlock::<PlayerStat>::new();

        let mut scope = ModifierScope::new();
        assert!(scope.register(max_hp(1.0, StackRule::Unique), ModifierSeq(0), 0));
        assert!(!scope.register(max_hp(5.0, StackRule::Unique), ModifierSeq(1), 0));
        assert_eq!(scope.derived(&base)[PlayerStat::MaxHp], 7.0);

        let mut scope = ModifierScope::new();
        scope.register(max_hp(1.0, StackRule::Refresh), ModifierSeq(0), 0);
        scope.register(max_hp(5.0, StackRule::Refresh), ModifierSeq(1), 0);
        assert_eq!(scope.len(), 1);
        assert_eq!(scope.derived(&base)[PlayerStat::MaxHp], 11.0);
    }

    #[test]
    fn refresh_restarts_duration_tracking() {
        let mut scope = ModifierScope::<PlayerStat>::new();
        let timed = |v| {
            Modifier::from(
                StatModifier::flat("rush", ModifierSource::Shrine, PlayerStat::MoveSpeed, v)
                    .with_duration(1000)
                    .with_stack_rule(StackRule::Refresh),
            )
        };
        scope.register(timed(1.0), ModifierSeq(0), 0);
        scope.register(timed(2.0), ModifierSeq(1), 800);
        assert_eq!(scope.tracked_durations(), 1);

        assert!(scope.expire(1500).is_empty());
        assert_eq!(scope.expire(1800).len(), 1);
        assert_eq!(scope.tracked_durations(), 0);
    }

    #[test]
    fn remove_without_source_hits_every_source() {
        let mut scope = ModifierScope::<PlayerStat>::new();
        scope.register(
            StatModifier::flat("x", ModifierSource::Ring, PlayerStat::Damage, 1.0).into(),
            ModifierSeq(0),
            0,
        );
        scope.register(
            StatModifier::flat("x", ModifierSource::Amulet, PlayerStat::Damage, 1.0).into(),
            ModifierSeq(1),
            0,
        );
        assert_eq!(scope.remove("x", Some(ModifierSource::Ring)), 1);
        assert_eq!(scope.remove("x", None), 1);
        assert_eq!(scope.remove("x", None), 0);
        assert!(scope.is_empty());
    }
}
