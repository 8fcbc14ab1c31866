//! Room graph generation.

use rand::Rng;
use rand::seq::SliceRandom;
use tracing::debug;

use super::layout::wall_length;
use super::obstacles::generate_obstacles;
use super::teleport::generate_teleport_pads;
use super::types::{Door, Dungeon, Room, RoomId, WallSide};
use crate::config::GameConfig;

const MAX_DEGREE: usize = GameConfig::MAX_DOORS_PER_ROOM;

/// Builds a connected dungeon and populates its rooms.
///
/// 1. Pick the room count in `[min_rooms, max_rooms]`
/// 2. Grow a spanning tree from room 0, attaching each new room to a
///    connected room that still has a free wall
/// 3. Add a few extra edges, rejecting duplicates and degree overflow
/// 4. Give every neighbor its own wall, centered
/// 5. Pick the boss room (never the start) and place obstacles and pads
pub fn generate_dungeon(config: &GameConfig, rng: &mut impl Rng) -> Dungeon {
    let dungeon_cfg = &config.dungeon;
    let geometry = &dungeon_cfg.geometry;

    let min_rooms = dungeon_cfg.min_rooms.max(2);
    let max_rooms = dungeon_cfg.max_rooms.max(min_rooms);
    let count = rng.gen_range(min_rooms..=max_rooms);

    let mut adjacency: Vec<Vec<usize>> = vec![Vec::new(); count];
    build_spanning_tree(&mut adjacency, rng);
    let extra = add_extra_edges(&mut adjacency, config, rng);

    let mut rooms: Vec<Room> = (0..count)
        .map(|i| Room::new(RoomId(i), geometry.room_rect()))
        .collect();
    for (room, neighbors) in rooms.iter_mut().zip(&adjacency) {
        let mut sides = WallSide::ALL;
        sides.shuffle(rng);
        for (i, &to) in neighbors.iter().enumerate() {
            let side = sides[i % sides.len()];
            room.doors.push(Door {
                side,
                offset: wall_length(geometry, side) / 2.0,
                length: geometry.door_length,
                to: RoomId(to),
            });
        }
    }

    let start_room_id = RoomId(0);
    let boss_room_id = RoomId(rng.gen_range(1..count));
    for room in &mut rooms {
        room.is_boss = room.id == boss_room_id;
        if room.id == start_room_id {
            continue;
        }
        room.obstacles = generate_obstacles(geometry, &room.doors, &config.obstacles, rng);
        if !room.is_boss {
            room.teleport = generate_teleport_pads(
                geometry,
                &room.doors,
                &room.obstacles,
                &config.teleport,
                rng,
            );
        }
    }

    debug!(
        target: "delve::dungeon",
        rooms = count,
        extra_edges = extra,
        boss = %boss_room_id,
        "dungeon generated"
    );

    Dungeon {
        rooms,
        start_room_id,
        boss_room_id,
    }
}

fn build_spanning_tree(adjacency: &mut [Vec<usize>], rng: &mut impl Rng) {
    let mut connected = vec![0usize];
    let mut pending: Vec<usize> = (1..adjacency.len()).collect();

    while !pending.is_empty() {
        let room = pending.swap_remove(rng.gen_range(0..pending.len()));
        // A tree always has a node below the cap, so this never comes up empty.
        let open: Vec<usize> = connected
            .iter()
            .copied()
            .filter(|&c| adjacency[c].len() < MAX_DEGREE)
            .collect();
        let Some(&anchor) = open.choose(rng) else {
            break;
        };
        adjacency[room].push(anchor);
        adjacency[anchor].push(room);
        connected.push(room);
    }
}

fn add_extra_edges(adjacency: &mut [Vec<usize>], config: &GameConfig, rng: &mut impl Rng) -> usize {
    let cfg = &config.dungeon;
    let count = adjacency.len();
    let wanted = if cfg.max_extra_edges > cfg.min_extra_edges {
        rng.gen_range(cfg.min_extra_edges..=cfg.max_extra_edges)
    } else {
        cfg.min_extra_edges
    };

    let mut added = 0;
    for _ in 0..wanted {
        for _ in 0..cfg.extra_edge_attempts {
            let a = rng.gen_range(0..count);
            let b = rng.gen_range(0..count);
            if a == b
                || adjacency[a].contains(&b)
                || adjacency[a].len() >= MAX_DEGREE
                || adjacency[b].len() >= MAX_DEGREE
            {
                continue;
            }
            adjacency[a].push(b);
            adjacency[b].push(a);
            added += 1;
            break;
        }
    }
    added
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::layout::door_rect;
    use crate::geometry::Rect;
    use crate::rng::RunRng;
    use std::collections::HashSet;

    #[test]
    fn every_seed_is_connected_with_distinct_boss() {
        let config = GameConfig::default();
        for seed in 0..300 {
            let dungeon = generate_dungeon(&config, &mut RunRng::new(seed));
            assert!((5..=7).contains(&dungeon.len()), "seed {seed}");
            assert!(dungeon.is_fully_connected(), "seed {seed}");
            assert_ne!(dungeon.start_room_id, dungeon.boss_room_id);
            assert_eq!(dungeon.rooms.iter().filter(|r| r.is_boss).count(), 1);
        }
    }

    #[test]
    fn degree_cap_and_one_door_per_wall() {
        let config = GameConfig {
            dungeon: crate::config::DungeonConfig {
                min_rooms: 12,
                max_rooms: 12,
                min_extra_edges: 10,
                max_extra_edges: 10,
                ..Default::default()
            },
            ..GameConfig::default()
        };
        for seed in 0..300 {
            let dungeon = generate_dungeon(&config, &mut RunRng::new(seed));
            assert!(dungeon.is_fully_connected());
            for room in &dungeon.rooms {
                assert!(room.doors.len() <= 4);
                let sides: HashSet<_> = room.doors.iter().map(|d| d.side).collect();
                assert_eq!(sides.len(), room.doors.len(), "two doors on one wall");
            }
        }
    }

    #[test]
    fn doors_are_symmetric() {
        let dungeon = generate_dungeon(&GameConfig::default(), &mut RunRng::new(42));
        for room in &dungeon.rooms {
            for door in &room.doors {
                assert_ne!(door.to, room.id);
                assert!(dungeon.door_to(door.to, room.id).is_some());
            }
        }
    }

    #[test]
    fn start_room_is_empty_and_boss_has_no_pads() {
        for seed in 0..50 {
            let dungeon = generate_dungeon(&GameConfig::default(), &mut RunRng::new(seed));
            let start = dungeon.room(dungeon.start_room_id).unwrap();
            assert!(start.obstacles.is_empty());
            assert!(start.teleport.is_none());
            assert!(dungeon.room(dungeon.boss_room_id).unwrap().teleport.is_none());
        }
    }

    #[test]
    fn placements_keep_doors_and_center_clear() {
        let config = GameConfig::default();
        let geometry = &config.dungeon.geometry;
        let center = Rect::centered(geometry.room_rect().center(), config.obstacles.center_margin);
        for seed in 0..50 {
            let dungeon = generate_dungeon(&config, &mut RunRng::new(seed));
            for room in &dungeon.rooms {
                for blocker in room.blockers() {
                    assert!(!blocker.intersects(&center));
                    for door in &room.doors {
                        let margin = door_rect(geometry, door).expand(config.obstacles.door_margin);
                        assert!(!blocker.intersects(&margin));
                    }
                }
            }
        }
    }

    #[test]
    fn same_seed_same_dungeon() {
        let config = GameConfig::default();
        let a = generate_dungeon(&config, &mut RunRng::new(1234));
        let b = generate_dungeon(&config, &mut RunRng::new(1234));
        assert_eq!(a, b);
    }
}
