//! Modifier definitions: stat modifiers, hook modifiers and their identity.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use super::hooks::{EventPayload, GameEvent, HookCriticality, HookEffect};
use super::keys::StatKey;
use crate::error::HookError;

/// Content identifier of a modifier (`"ring_of_haste"`, `"hardened"`).
///
/// Together with [`ModifierSource`] it forms the identity used by stacking
/// rules and removal.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct ModifierId(Cow<'static, str>);

impl ModifierId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for ModifierId {
    fn from(id: &'static str) -> Self {
        Self(Cow::Borrowed(id))
    }
}

impl From<String> for ModifierId {
    fn from(id: String) -> Self {
        Self(Cow::Owned(id))
    }
}

impl PartialEq<str> for ModifierId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl fmt::Display for ModifierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where a modifier came from.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum ModifierSource {
    Hero,
    Weapon,
    Ring,
    Amulet,
    Shrine,
    Room,
    Boss,
    Elite,
    Global,
    Upgrade,
    Gear,
}

/// Policy applied when a modifier with the same `(id, source)` is registered again.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StackRule {
    /// Append; every copy applies.
    #[default]
    Stack,
    /// Replace existing copies and restart the duration.
    Refresh,
    /// Keep the existing copy; the new one is discarded.
    Unique,
}

/// How a stat modifier combines with the value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum StatOp {
    /// `value += x`, applied before every multiplier.
    Flat,
    /// `value *= x`, applied after every flat bonus.
    Mult,
}

/// A numeric change to one stat of scope `K`.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatModifier<K: StatKey> {
    pub id: ModifierId,
    pub source: ModifierSource,
    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    pub op: StatOp,
    pub stat: K,
    pub value: f64,
    #[cfg_attr(
        feature = "serde",
        serde(default, rename = "durationMs", skip_serializing_if = "Option::is_none")
    )]
    pub duration_ms: Option<u64>,
    #[cfg_attr(feature = "serde", serde(default, rename = "stackRule"))]
    pub stack_rule: StackRule,
}

impl<K: StatKey> StatModifier<K> {
    pub fn flat(id: impl Into<ModifierId>, source: ModifierSource, stat: K, value: f64) -> Self {
        Self {
            id: id.into(),
            source,
            op: StatOp::Flat,
            stat,
            value,
            duration_ms: None,
            stack_rule: StackRule::Stack,
        }
    }

    pub fn mult(id: impl Into<ModifierId>, source: ModifierSource, stat: K, value: f64) -> Self {
        Self {
            op: StatOp::Mult,
            ..Self::flat(id, source, stat, value)
        }
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_stack_rule(mut self, stack_rule: StackRule) -> Self {
        self.stack_rule = stack_rule;
        self
    }
}

/// Handler invoked when a hook's event fires.
///
/// Handlers do not touch the engine directly: they return the effects they
/// want applied, and the orchestrator applies them after dispatch.
pub type HookHandler =
    Arc<dyn Fn(&EventPayload) -> Result<Vec<HookEffect>, HookError> + Send + Sync>;

/// A behavioral modifier reacting to a [`GameEvent`].
#[derive(Clone)]
pub struct HookModifier {
    pub id: ModifierId,
    pub source: ModifierSource,
    pub event: GameEvent,
    pub handler: HookHandler,
    pub criticality: HookCriticality,
    pub duration_ms: Option<u64>,
    pub stack_rule: StackRule,
}

impl HookModifier {
    pub fn new<F>(id: impl Into<ModifierId>, source: ModifierSource, event: GameEvent, handler: F) -> Self
    where
        F: Fn(&EventPayload) -> Result<Vec<HookEffect>, HookError> + Send + Sync + 'static,
    {
        Self {
            id: id.into(),
            source,
            event,
            handler: Arc::new(handler),
            criticality: HookCriticality::default(),
            duration_ms: None,
            stack_rule: StackRule::Stack,
        }
    }

    pub fn with_criticality(mut self, criticality: HookCriticality) -> Self {
        self.criticality = criticality;
        self
    }

    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    pub fn with_stack_rule(mut self, stack_rule: StackRule) -> Self {
        self.stack_rule = stack_rule;
        self
    }
}

impl fmt::Debug for HookModifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HookModifier")
            .field("id", &self.id)
            .field("source", &self.source)
            .field("event", &self.event)
            .field("criticality", &self.criticality)
            .field("duration_ms", &self.duration_ms)
            .field("stack_rule", &self.stack_rule)
            .finish_non_exhaustive()
    }
}

/// Anything that can sit in a modifier list of scope `K`.
#[derive(Clone, Debug)]
pub enum Modifier<K: StatKey> {
    Stat(StatModifier<K>),
    Hook(HookModifier),
}

impl<K: StatKey> Modifier<K> {
    pub fn id(&self) -> &ModifierId {
        match self {
            Self::Stat(m) => &m.id,
            Self::Hook(m) => &m.id,
        }
    }

    pub fn source(&self) -> ModifierSource {
        match self {
            Self::Stat(m) => m.source,
            Self::Hook(m) => m.source,
        }
    }

    pub fn duration_ms(&self) -> Option<u64> {
        match self {
            Self::Stat(m) => m.duration_ms,
            Self::Hook(m) => m.duration_ms,
        }
    }

    pub fn stack_rule(&self) -> StackRule {
        match self {
            Self::Stat(m) => m.stack_rule,
            Self::Hook(m) => m.stack_rule,
        }
    }

    /// Same `(id, source)` identity.
    pub fn same_identity(&self, other: &Self) -> bool {
        self.id() == other.id() && self.source() == other.source()
    }

    /// Matches a removal request: `id`, and `source` when given.
    pub fn matches(&self, id: &str, source: Option<ModifierSource>) -> bool {
        self.id() == id && source.is_none_or(|s| s == self.source())
    }

    pub fn as_stat(&self) -> Option<&StatModifier<K>> {
        match self {
            Self::Stat(m) => Some(m),
            Self::Hook(_) => None,
        }
    }

    pub fn as_hook(&self) -> Option<&HookModifier> {
        match self {
            Self::Hook(m) => Some(m),
            Self::Stat(_) => None,
        }
    }
}

impl<K: StatKey> From<StatModifier<K>> for Modifier<K> {
    fn from(modifier: StatModifier<K>) -> Self {
        Self::Stat(modifier)
    }
}

impl<K: StatKey> From<HookModifier> for Modifier<K> {
    fn from(modifier: HookModifier) -> Self {
        Self::Hook(modifier)
    }
}
