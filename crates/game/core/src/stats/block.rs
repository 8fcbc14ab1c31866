//! Dense stat records keyed by a [`StatKey`] enum.

use std::collections::BTreeMap;
use std::fmt;
use std::marker::PhantomData;
use std::ops::{Index, IndexMut};

use super::keys::StatKey;

/// A complete record: one value per key of `K`, in declaration order.
///
/// Used both as a base record (owned by the run) and as a derived record
/// (returned by evaluation). Evaluation always works on a copy.
#[derive(Clone, PartialEq)]
pub struct StatBlock<K: StatKey> {
    values: Vec<f64>,
    _keys: PhantomData<K>,
}

impl<K: StatKey> StatBlock<K> {
    /// Record with every key at its [`StatKey::default_value`].
    pub fn new() -> Self {
        Self {
            values: K::iter().map(K::default_value).collect(),
            _keys: PhantomData,
        }
    }

    /// Record with defaults, then `pairs` written on top.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (K, f64)>) -> Self {
        let mut block = Self::new();
        for (key, value) in pairs {
            block.set(key, value);
        }
        block
    }

    #[inline]
    pub fn get(&self, key: K) -> f64 {
        self.values[key.index()]
    }

    #[inline]
    pub fn set(&mut self, key: K, value: f64) {
        self.values[key.index()] = value;
    }

    /// Writes only the keys present in `partial`.
    pub fn apply_partial(&mut self, partial: &PartialStats<K>) {
        for (&key, &value) in partial.iter() {
            self.set(key, value);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (K, f64)> + '_ {
        K::iter().map(move |key| (key, self.get(key)))
    }
}

impl<K: StatKey> Default for StatBlock<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: StatKey> Index<K> for StatBlock<K> {
    type Output = f64;

    fn index(&self, key: K) -> &f64 {
        &self.values[key.index()]
    }
}

impl<K: StatKey> IndexMut<K> for StatBlock<K> {
    fn index_mut(&mut self, key: K) -> &mut f64 {
        &mut self.values[key.index()]
    }
}

impl<K: StatKey> fmt::Debug for StatBlock<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(self.iter().map(|(key, value)| (key.name(), value)))
            .finish()
    }
}

impl<K: StatKey> fmt::Display for StatBlock<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (key, value) in self.iter() {
            if !first {
                f.write_str(" ")?;
            }
            first = false;
            write!(f, "{}={}", key.name(), value)?;
        }
        Ok(())
    }
}

/// A sparse record: only some keys set.
///
/// Used by base-stat sync and by hero definitions that override a few
/// defaults.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct PartialStats<K: StatKey> {
    values: BTreeMap<K, f64>,
}

impl<K: StatKey> PartialStats<K> {
    pub fn new() -> Self {
        Self {
            values: BTreeMap::new(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: K, value: f64) -> Self {
        self.values.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: K, value: f64) {
        self.values.insert(key, value);
    }

    pub fn get(&self, key: K) -> Option<f64> {
        self.values.get(&key).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&K, &f64)> {
        self.values.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: StatKey> Default for PartialStats<K> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: StatKey> FromIterator<(K, f64)> for PartialStats<K> {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::PlayerStat;

    #[test]
    fn new_block_uses_defaults() {
        let block = StatBlock::<PlayerStat>::new();
        assert_eq!(block[PlayerStat::FireRate], 150.0);
        assert_eq!(block.get(PlayerStat::MaxHp), 6.0);
    }

    #[test]
    fn partial_overwrites_only_present_keys() {
        let mut block = StatBlock::<PlayerStat>::new();
        let partial = PartialStats::new()
            .with(PlayerStat::Damage, 3.0)
            .with(PlayerStat::MoveSpeed, 4.5);
        block.apply_partial(&partial);

        assert_eq!(block[PlayerStat::Damage], 3.0);
        assert_eq!(block[PlayerStat::MoveSpeed], 4.5);
        assert_eq!(block[PlayerStat::FireRate], 150.0);
    }

    #[test]
    fn display_lists_every_key() {
        let block = StatBlock::<PlayerStat>::from_pairs([(PlayerStat::Damage, 2.0)]);
        let text = block.to_string();
        assert!(text.starts_with("maxHP=6"));
        assert!(text.contains("damage=2"));
    }
}
