//! Unified error type surfaced by the run API.
//!
//! The rules layer in delve-core never fails; everything here is misuse of
//! the orchestration API (an id that does not exist, a door that is not
//! there, acting after the run ended) or a meta-store failure.
use thiserror::Error;

use delve_content::GearSlot;
use delve_core::{EnemyId, RoomId};

use crate::run::RunOutcome;

pub type Result<T> = std::result::Result<T, RunError>;

#[derive(Debug, Error)]
pub enum RunError {
    #[error("run is over ({outcome})")]
    NotInProgress { outcome: RunOutcome },

    #[error("unknown room {0}")]
    UnknownRoom(RoomId),

    #[error("{room} has no door #{index}")]
    NoSuchDoor { room: RoomId, index: usize },

    #[error("{0} still has enemies")]
    RoomNotCleared(RoomId),

    #[error("unknown enemy {0}")]
    UnknownEnemy(EnemyId),

    #[error("no hero selected")]
    NoHeroSelected,

    #[error("unknown hero {0:?}")]
    UnknownHero(String),

    #[error("hero {0:?} is locked")]
    HeroLocked(String),

    #[error("unknown gear {0:?}")]
    UnknownGear(String),

    #[error("gear {gear:?} goes in the {actual:?} slot, not {slot:?}")]
    GearSlotMismatch {
        gear: String,
        slot: GearSlot,
        actual: GearSlot,
    },

    #[error("unknown upgrade {0:?}")]
    UnknownUpgrade(String),

    #[error("unknown shrine {0:?}")]
    UnknownShrine(String),

    #[error("meta store I/O error: {0}")]
    StoreIo(#[from] std::io::Error),

    #[error("meta store data error: {0}")]
    StoreFormat(String),

    #[error("meta store lock was poisoned")]
    LockPoisoned,
}
