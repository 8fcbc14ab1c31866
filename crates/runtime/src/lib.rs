//! Run orchestration for delve.
//!
//! `delve-core` holds the rules; this crate sequences them into a playable
//! run and keeps the player's profile across runs.
//!
//! - [`run`] owns one attempt at the dungeon: traversal, combat, rewards
//! - [`meta`] holds the persistent profile, its store and the loadout built
//!   from it at run start
//! - [`error`] is the single error type of the API
pub mod error;
pub mod meta;
pub mod run;

pub use error::{Result, RunError};
pub use meta::{JsonFileStore, Loadout, MemoryStore, MetaProgress, MetaStore, ProgressGain};
pub use run::{DamageReport, Player, Run, RunOutcome, RunSummary};
