//! Deterministic rules layer of a delve run.
//!
//! `delve-core` owns the numbers and the layout of a run: the modifier
//! engine that turns base stats plus modifiers into derived stats, the elite
//! affix system built on its per-entity scope, and the dungeon and encounter
//! generators. Everything here is synchronous and, given a seeded
//! [`RunRng`], reproducible. The orchestration of a run lives in
//! `delve-runtime`.
pub mod clock;
pub mod config;
pub mod dungeon;
pub mod elite;
pub mod encounter;
pub mod enemy;
pub mod error;
pub mod geometry;
pub mod rng;
pub mod stats;

pub use clock::{Clock, FrameClock, SystemClock};
pub use config::{
    DifficultyConfig, DungeonConfig, EliteConfig, EncounterConfig, GameConfig, ObstacleConfig,
    RoomGeometry, TeleportConfig,
};
pub use dungeon::{
    Door, Dungeon, Room, RoomId, TeleportPair, WallSide, door_rects, entrance_position,
    generate_dungeon, generate_obstacles, generate_teleport_pads, wall_segments,
};
pub use elite::{
    Affix, apply_elite_stats, attach_affix, detach_affix_modifiers, elite_spawn_chance,
    pick_random_affix, promote_random_elite, run_volatile_explosion, vampiric_heal_amount,
};
pub use encounter::{PlannedSpawn, WavePlan, plan_wave, spawn_points, spawn_wave, wave_size};
pub use enemy::{EliteBaseline, EliteId, Enemy, EnemyId, EnemyKind};
pub use error::{ErrorSeverity, GameError, HookError, HookFailure};
pub use geometry::{Rect, Vec2};
pub use rng::{RngStream, RunRng, compute_seed};
pub use stats::{
    EliteStat, EventPayload, GameEvent, GlobalStat, HookCriticality, HookDispatch, HookEffect,
    HookModifier, Modifier, ModifierEngine, ModifierId, ModifierSource, PartialStats, PlayerStat,
    StackRule, StatBlock, StatKey, StatModifier, StatOp, evaluate,
};
