//! Procedural dungeon: room graph, doors, obstacles and teleport pads.
//!
//! Every room shares one rectangle ([`crate::config::RoomGeometry`]); rooms
//! differ only by their doors and what was placed on their floor. All
//! randomness comes from the caller's RNG so a seeded run always yields the
//! same dungeon.
mod graph;
mod layout;
mod obstacles;
mod teleport;
mod types;

pub use graph::generate_dungeon;
pub use layout::{
    ClearZones, door_rect, door_rects, entrance_position, wall_length, wall_rect, wall_segments,
};
pub use obstacles::generate_obstacles;
pub use teleport::generate_teleport_pads;
pub use types::{Door, Doors, Dungeon, Room, RoomId, TeleportPair, WallSide};

pub(crate) use layout::sample_span;
