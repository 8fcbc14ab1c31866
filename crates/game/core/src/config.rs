//! Game configuration constants and tunable parameters.
//!
//! Every retry cap, margin and fallback policy used by generation lives here
//! rather than inline, so tests (and content files) can tighten them to force
//! the failure paths deterministically.

use crate::dungeon::ClearZones;
use crate::geometry::Rect;

/// Top-level configuration of a run.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct GameConfig {
    pub dungeon: DungeonConfig,
    pub obstacles: ObstacleConfig,
    pub teleport: TeleportConfig,
    pub elite: EliteConfig,
    pub encounter: EncounterConfig,
    pub difficulty: DifficultyConfig,
}

impl GameConfig {
    // ===== compile-time constants used as type parameters =====
    /// A room rectangle has four walls and each wall holds at most one door.
    pub const MAX_DOORS_PER_ROOM: usize = 4;
    /// Up to two pieces per wall once a door hole is cut out.
    pub const MAX_WALL_SEGMENTS: usize = 8;

    pub fn new() -> Self {
        Self::default()
    }
}

/// Shared rectangle of every room.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RoomGeometry {
    pub width: f32,
    pub height: f32,
    pub wall_thickness: f32,
    pub door_length: f32,
}

impl RoomGeometry {
    pub const DEFAULT_WIDTH: f32 = 960.0;
    pub const DEFAULT_HEIGHT: f32 = 640.0;
    pub const DEFAULT_WALL_THICKNESS: f32 = 24.0;
    pub const DEFAULT_DOOR_LENGTH: f32 = 96.0;

    pub fn room_rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }

    /// Walkable floor: the room rectangle minus the walls.
    pub fn inner_rect(&self) -> Rect {
        self.room_rect().expand(-self.wall_thickness)
    }
}

impl Default for RoomGeometry {
    fn default() -> Self {
        Self {
            width: Self::DEFAULT_WIDTH,
            height: Self::DEFAULT_HEIGHT,
            wall_thickness: Self::DEFAULT_WALL_THICKNESS,
            door_length: Self::DEFAULT_DOOR_LENGTH,
        }
    }
}

/// Room graph parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DungeonConfig {
    pub min_rooms: usize,
    pub max_rooms: usize,
    pub min_extra_edges: usize,
    pub max_extra_edges: usize,
    /// Attempts per extra edge before giving up on it.
    pub extra_edge_attempts: u32,
    pub geometry: RoomGeometry,
}

impl Default for DungeonConfig {
    fn default() -> Self {
        Self {
            min_rooms: 5,
            max_rooms: 7,
            min_extra_edges: 1,
            max_extra_edges: 2,
            extra_edge_attempts: 20,
            geometry: RoomGeometry::default(),
        }
    }
}

/// Obstacle rejection sampling.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ObstacleConfig {
    pub min_count: usize,
    pub max_count: usize,
    pub min_thickness: f32,
    pub max_thickness: f32,
    pub min_length: f32,
    pub max_length: f32,
    /// Clearance kept between obstacles and the inner walls.
    pub wall_padding: f32,
    /// Half-size of the square kept clear around the room center.
    pub center_margin: f32,
    /// Margin added around each door rectangle.
    pub door_margin: f32,
    /// How far inside the room the entrance point of a door sits.
    pub entrance_inset: f32,
    /// Half-size of the square kept clear around each entrance point.
    pub entrance_margin: f32,
    /// Axis overlap above which two obstacles count as aligned.
    pub align_overlap: f32,
    /// Aligned obstacles closer than this on the other axis read as one blob.
    pub min_gap: f32,
    pub max_attempts: u32,
    /// Drop the last placed obstacle when any placement failed.
    pub drop_last_on_shortfall: bool,
}

impl Default for ObstacleConfig {
    fn default() -> Self {
        Self {
            min_count: 2,
            max_count: 5,
            min_thickness: 8.0,
            max_thickness: 14.0,
            min_length: 55.0,
            max_length: 110.0,
            wall_padding: 28.0,
            center_margin: 96.0,
            door_margin: 40.0,
            entrance_inset: 48.0,
            entrance_margin: 48.0,
            align_overlap: 12.0,
            min_gap: 36.0,
            max_attempts: 30,
            drop_last_on_shortfall: true,
        }
    }
}

impl ObstacleConfig {
    /// Areas obstacles must stay out of.
    pub fn clear_zones(&self) -> ClearZones {
        ClearZones {
            center_margin: self.center_margin,
            door_margin: self.door_margin,
            entrance_inset: self.entrance_inset,
            entrance_margin: self.entrance_margin,
        }
    }
}

/// Teleport pad rejection sampling.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TeleportConfig {
    pub pad_size: f32,
    pub wall_padding: f32,
    pub center_margin: f32,
    pub door_margin: f32,
    pub entrance_inset: f32,
    pub entrance_margin: f32,
    pub obstacle_padding: f32,
    /// Minimum center distance between the two pads of a pair.
    pub min_pair_distance: f32,
    pub max_attempts: u32,
}

impl Default for TeleportConfig {
    fn default() -> Self {
        Self {
            pad_size: 40.0,
            wall_padding: 32.0,
            center_margin: 110.0,
            door_margin: 56.0,
            entrance_inset: 48.0,
            entrance_margin: 64.0,
            obstacle_padding: 12.0,
            min_pair_distance: 180.0,
            max_attempts: 40,
        }
    }
}

impl TeleportConfig {
    /// Areas pads must stay out of.
    pub fn clear_zones(&self) -> ClearZones {
        ClearZones {
            center_margin: self.center_margin,
            door_margin: self.door_margin,
            entrance_inset: self.entrance_inset,
            entrance_margin: self.entrance_margin,
        }
    }
}

/// Elite chance, clamps and behavioral constants.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EliteConfig {
    pub base_chance: f64,
    pub chance_per_difficulty: f64,
    pub chance_cap: f64,
    pub explosion_radius: f32,
    pub explosion_damage: f32,
    /// Frenzied elites below this health ratio get `frenzy_speed_bonus`.
    pub frenzy_health_ratio: f64,
    pub frenzy_speed_bonus: f64,
    pub min_speed: f64,
    pub min_max_health: f64,
    pub max_damage_reduction: f64,
    pub min_speed_mult: f64,
    pub default_lifesteal: f64,
}

impl Default for EliteConfig {
    fn default() -> Self {
        Self {
            base_chance: 0.28,
            chance_per_difficulty: 0.03,
            chance_cap: 0.65,
            explosion_radius: 80.0,
            explosion_damage: 2.0,
            frenzy_health_ratio: 0.5,
            frenzy_speed_bonus: 0.5,
            min_speed: 0.5,
            min_max_health: 1.0,
            max_damage_reduction: 0.5,
            min_speed_mult: 0.5,
            default_lifesteal: 0.5,
        }
    }
}

/// Wave sizing and spawn point sampling.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EncounterConfig {
    pub base_count: f64,
    pub count_per_difficulty: f64,
    pub min_count: usize,
    pub max_count: usize,
    pub wall_padding: f32,
    /// Half-size of the square around the room center where nothing spawns.
    pub center_clearance: f32,
    pub obstacle_clearance: f32,
    pub min_separation: f32,
    pub spawn_attempts: u32,
    /// Children spawned when a splitter dies.
    pub split_children: usize,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            base_count: 4.0,
            count_per_difficulty: 0.5,
            min_count: 2,
            max_count: 12,
            wall_padding: 40.0,
            center_clearance: 140.0,
            obstacle_clearance: 18.0,
            min_separation: 48.0,
            spawn_attempts: 40,
            split_children: 2,
        }
    }
}

/// Global modifiers granted as the run progresses.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct DifficultyConfig {
    pub modifier_per_room: f64,
    pub scale_per_room: f64,
    pub health_mult_per_room: f64,
    pub damage_mult_per_room: f64,
    pub density_per_room: f64,
    /// Extra difficulty modifier after a boss kill.
    pub boss_modifier: f64,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            modifier_per_room: 1.0,
            scale_per_room: 0.05,
            health_mult_per_room: 0.1,
            damage_mult_per_room: 0.05,
            density_per_room: 0.08,
            boss_modifier: 2.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inner_rect_excludes_walls() {
        let geometry = RoomGeometry::default();
        let inner = geometry.inner_rect();
        assert_eq!(inner.x, geometry.wall_thickness);
        assert_eq!(inner.w, geometry.width - 2.0 * geometry.wall_thickness);
    }

    #[test]
    fn defaults_match_documented_caps() {
        let config = GameConfig::new();
        assert_eq!(config.obstacles.max_attempts, 30);
        assert_eq!(config.teleport.max_attempts, 40);
        assert_eq!(config.dungeon.extra_edge_attempts, 20);
        assert_eq!(config.elite.chance_cap, 0.65);
    }

    #[test]
    fn clear_zones_carry_each_sampler_margins() {
        let config = GameConfig::new();
        let obstacles = config.obstacles.clear_zones();
        assert_eq!(obstacles.center_margin, config.obstacles.center_margin);
        assert_eq!(obstacles.entrance_margin, config.obstacles.entrance_margin);

        let pads = config.teleport.clear_zones();
        assert_eq!(pads.door_margin, config.teleport.door_margin);
        assert_eq!(pads.entrance_inset, config.teleport.entrance_inset);
        assert_ne!(obstacles, pads);
    }
}
