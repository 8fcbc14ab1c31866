use std::collections::VecDeque;
use std::fmt;

use arrayvec::ArrayVec;

use crate::config::GameConfig;
use crate::geometry::{Rect, Vec2};

/// Index of a room in [`Dungeon::rooms`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RoomId(pub usize);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "room#{}", self.0)
    }
}

/// Wall of the room rectangle a door sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum WallSide {
    North,
    East,
    South,
    West,
}

impl WallSide {
    pub const ALL: [WallSide; 4] = [
        WallSide::North,
        WallSide::East,
        WallSide::South,
        WallSide::West,
    ];

    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::North | Self::South)
    }

    pub const fn opposite(self) -> Self {
        match self {
            Self::North => Self::South,
            Self::South => Self::North,
            Self::East => Self::West,
            Self::West => Self::East,
        }
    }
}

/// Opening in a wall leading to another room.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Door {
    pub side: WallSide,
    /// Center of the opening, measured along the wall from its start.
    pub offset: f32,
    pub length: f32,
    pub to: RoomId,
}

pub type Doors = ArrayVec<Door, { GameConfig::MAX_DOORS_PER_ROOM }>;

/// Two linked pads; stepping on one moves the player to the other.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TeleportPair {
    pub a: Rect,
    pub b: Rect,
}

impl TeleportPair {
    /// Landing point when the player touches `position`, if it is on a pad.
    pub fn destination(&self, position: Vec2) -> Option<Vec2> {
        if self.a.contains_point(position) {
            Some(self.b.center())
        } else if self.b.contains_point(position) {
            Some(self.a.center())
        } else {
            None
        }
    }

    pub fn pads(&self) -> [Rect; 2] {
        [self.a, self.b]
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Room {
    pub id: RoomId,
    /// Shared room rectangle, in room-local coordinates.
    pub rect: Rect,
    pub doors: Doors,
    pub cleared: bool,
    pub obstacles: Vec<Rect>,
    pub teleport: Option<TeleportPair>,
    pub is_boss: bool,
}

impl Room {
    pub fn new(id: RoomId, rect: Rect) -> Self {
        Self {
            id,
            rect,
            doors: Doors::new(),
            cleared: false,
            obstacles: Vec::new(),
            teleport: None,
            is_boss: false,
        }
    }

    pub fn neighbors(&self) -> impl Iterator<Item = RoomId> + '_ {
        self.doors.iter().map(|d| d.to)
    }

    /// Obstacles plus pads: everything a spawn point must avoid.
    pub fn blockers(&self) -> impl Iterator<Item = Rect> + '_ {
        self.obstacles
            .iter()
            .copied()
            .chain(self.teleport.iter().flat_map(|t| t.pads()))
    }
}

/// Connected room graph of one run.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Dungeon {
    pub rooms: Vec<Room>,
    pub start_room_id: RoomId,
    pub boss_room_id: RoomId,
}

impl Dungeon {
    pub fn room(&self, id: RoomId) -> Option<&Room> {
        self.rooms.get(id.0)
    }

    pub fn room_mut(&mut self, id: RoomId) -> Option<&mut Room> {
        self.rooms.get_mut(id.0)
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    /// Door of `from` leading to `to`.
    pub fn door_to(&self, from: RoomId, to: RoomId) -> Option<&Door> {
        self.room(from)?.doors.iter().find(|d| d.to == to)
    }

    /// Rooms reachable from the start room (BFS over doors), in visit order.
    pub fn reachable_from_start(&self) -> Vec<RoomId> {
        let mut seen = vec![false; self.rooms.len()];
        let mut order = Vec::with_capacity(self.rooms.len());
        let mut queue = VecDeque::new();

        if self.room(self.start_room_id).is_none() {
            return order;
        }
        seen[self.start_room_id.0] = true;
        queue.push_back(self.start_room_id);

        while let Some(id) = queue.pop_front() {
            order.push(id);
            let Some(room) = self.room(id) else { continue };
            for next in room.neighbors() {
                match seen.get_mut(next.0) {
                    Some(flag) if !*flag => {
                        *flag = true;
                        queue.push_back(next);
                    }
                    _ => {}
                }
            }
        }
        order
    }

    pub fn is_fully_connected(&self) -> bool {
        self.reachable_from_start().len() == self.rooms.len()
    }

    pub fn all_cleared(&self) -> bool {
        self.rooms.iter().all(|r| r.cleared)
    }
}
