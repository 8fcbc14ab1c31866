//! Game events, hook effects and dispatch results.
//!
//! Hook modifiers react to named events. A handler returns the effects it
//! wants applied instead of mutating the run, so dispatch never re-enters
//! the engine while its lists are being walked.

use super::keys::PlayerStat;
use super::modifier::StatModifier;
use crate::dungeon::RoomId;
use crate::enemy::{EliteId, EnemyId};
use crate::error::HookFailure;
use crate::geometry::Vec2;

/// Events the orchestrator emits into the engine.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "camelCase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
pub enum GameEvent {
    EnemyKilled,
    EliteKilled,
    PlayerHit,
    PlayerDashed,
    ShotFired,
    RoomEntered,
    RoomCleared,
    BossDefeated,
}

/// Context handed to hook handlers. Fields irrelevant to an event are `None`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EventPayload {
    pub room: Option<RoomId>,
    pub enemy: Option<EnemyId>,
    pub elite: Option<EliteId>,
    pub position: Option<Vec2>,
    /// Damage dealt or taken, when the event carries one.
    pub amount: f64,
}

impl EventPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_room(mut self, room: RoomId) -> Self {
        self.room = Some(room);
        self
    }

    pub fn with_enemy(mut self, enemy: EnemyId) -> Self {
        self.enemy = Some(enemy);
        self
    }

    pub fn with_elite(mut self, elite: Option<EliteId>) -> Self {
        self.elite = elite;
        self
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = Some(position);
        self
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = amount;
        self
    }
}

/// A change requested by a hook handler, applied by the orchestrator.
#[derive(Clone, Debug, PartialEq)]
pub enum HookEffect {
    HealPlayer(f64),
    AddModifier(StatModifier<PlayerStat>),
    RefundDash,
}

/// How a handler failure is reported.
///
/// - `Important` failures are logged at `warn` (default)
/// - `Optional` failures are logged at `debug`
///
/// Either way the remaining handlers still run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum HookCriticality {
    #[default]
    Important,
    Optional,
}

/// Outcome of one [`crate::stats::ModifierEngine::emit_game_event`] call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HookDispatch {
    /// Handlers whose event matched.
    pub invoked: usize,
    /// Effects requested by the handlers that succeeded, in list order.
    pub effects: Vec<HookEffect>,
    pub failures: Vec<HookFailure>,
}

impl HookDispatch {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}
