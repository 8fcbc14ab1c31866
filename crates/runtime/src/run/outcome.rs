use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RunOutcome {
    InProgress,
    Dead,
    Victory,
}

impl RunOutcome {
    pub fn is_over(self) -> bool {
        self != Self::InProgress
    }
}

impl fmt::Display for RunOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::InProgress => "in progress",
            Self::Dead => "dead",
            Self::Victory => "victory",
        };
        write!(f, "{}", label)
    }
}

/// Result of a finished (or abandoned) run, credited to the meta profile.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    pub hero_id: String,
    pub outcome: RunOutcome,
    pub rooms_cleared: u32,
    pub kills: u32,
    pub elite_kills: u32,
    pub xp: u64,
}

impl RunSummary {
    pub const XP_PER_ROOM: u64 = 10;
    pub const XP_PER_KILL: u64 = 2;
    pub const XP_PER_ELITE: u64 = 5;
    pub const XP_VICTORY: u64 = 100;

    pub fn xp_for(outcome: RunOutcome, rooms_cleared: u32, kills: u32, elite_kills: u32) -> u64 {
        let mut xp = u64::from(rooms_cleared) * Self::XP_PER_ROOM
            + u64::from(kills) * Self::XP_PER_KILL
            + u64::from(elite_kills) * Self::XP_PER_ELITE;
        if outcome == RunOutcome::Victory {
            xp += Self::XP_VICTORY;
        }
        xp
    }
}
