//! Flat-then-mult evaluation shared by every modifier scope.
//!
//! The calculation order is global, not per stat:
//! `copy(base) → every Flat in list order → every Mult in list order`
//!
//! Percentage modifiers therefore always see a value that already includes
//! every flat bonus, whatever the registration order between sources. A
//! hero's flat +1 and a ring's ×1.1 compose the same way no matter which was
//! registered first.

use super::block::StatBlock;
use super::keys::StatKey;
use super::modifier::{Modifier, StatModifier, StatOp};

/// Derives a record from `base` and the stat modifiers of `modifiers`.
///
/// Hook modifiers and non-finite values are skipped. `base` is never
/// mutated; the result is a new record.
///
/// # Example
/// ```
/// # use delve_core::stats::*;
/// let base = StatBlock::from_pairs([(PlayerStat::Damage, 1.0)]);
/// let mods: Vec<Modifier<PlayerStat>> = vec![
///     StatModifier::mult("x2", ModifierSource::Upgrade, PlayerStat::Damage, 2.0).into(),
///     StatModifier::flat("+1", ModifierSource::Hero, PlayerStat::Damage, 1.0).into(),
/// ];
///
/// let derived = evaluate(&base, &mods);
/// // = (1 + 1) × 2, never 1 × 2 + 1
/// assert_eq!(derived[PlayerStat::Damage], 4.0);
/// ```
pub fn evaluate<K: StatKey>(base: &StatBlock<K>, modifiers: &[Modifier<K>]) -> StatBlock<K> {
    evaluate_stats(base, modifiers.iter().filter_map(Modifier::as_stat))
}

/// Same as [`evaluate`], over bare stat modifiers (elite table entries).
pub fn evaluate_stats<'a, K, I>(base: &StatBlock<K>, modifiers: I) -> StatBlock<K>
where
    K: StatKey,
    I: IntoIterator<Item = &'a StatModifier<K>>,
    I::IntoIter: Clone,
{
    let modifiers = modifiers.into_iter();
    let mut result = base.clone();

    // Step 1: every flat bonus, in list order
    for m in modifiers.clone().filter(|m| applies(m, StatOp::Flat)) {
        result[m.stat] += m.value;
    }

    // Step 2: every multiplier, in list order
    for m in modifiers.filter(|m| applies(m, StatOp::Mult)) {
        result[m.stat] *= m.value;
    }

    result
}

#[inline]
fn applies<K: StatKey>(modifier: &StatModifier<K>, op: StatOp) -> bool {
    modifier.op == op && modifier.value.is_finite()
}
