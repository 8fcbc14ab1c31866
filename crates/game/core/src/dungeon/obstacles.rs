//! Thin interior walls placed by rejection sampling.

use rand::Rng;
use tracing::debug;

use super::layout::{sample_rect, sample_span};
use super::types::Door;
use crate::config::{ObstacleConfig, RoomGeometry};
use crate::geometry::Rect;

/// Places 2 to 5 thin walls on the floor of a room with the given doors.
///
/// Each obstacle gets up to `max_attempts` candidates and is skipped if none
/// fits. When anything was skipped and at least two were placed, the last
/// one is dropped as well so a crowded room stays walkable.
pub fn generate_obstacles(
    geometry: &RoomGeometry,
    doors: &[Door],
    config: &ObstacleConfig,
    rng: &mut impl Rng,
) -> Vec<Rect> {
    let area = geometry.inner_rect().expand(-config.wall_padding);
    let zones = config.clear_zones().rects(geometry, doors);

    let target = if config.max_count > config.min_count {
        rng.gen_range(config.min_count..=config.max_count)
    } else {
        config.min_count
    };

    let mut placed: Vec<Rect> = Vec::with_capacity(target);
    let mut skipped = 0usize;

    for _ in 0..target {
        let found = (0..config.max_attempts).find_map(|_| {
            let candidate = sample_candidate(&area, config, rng)?;
            accepts(&candidate, &zones, &placed, config).then_some(candidate)
        });
        match found {
            Some(rect) => placed.push(rect),
            None => skipped += 1,
        }
    }

    if skipped > 0 && placed.len() >= 2 && config.drop_last_on_shortfall {
        placed.pop();
    }

    debug!(
        target: "delve::dungeon",
        target_count = target,
        placed = placed.len(),
        skipped,
        "obstacles generated"
    );
    placed
}

fn sample_candidate(area: &Rect, config: &ObstacleConfig, rng: &mut impl Rng) -> Option<Rect> {
    let thickness = sample_span(rng, config.min_thickness, config.max_thickness);
    let length = sample_span(rng, config.min_length, config.max_length);
    let (w, h) = if rng.gen_bool(0.5) {
        (length, thickness)
    } else {
        (thickness, length)
    };
    sample_rect(rng, area, w, h)
}

fn accepts(candidate: &Rect, zones: &[Rect], placed: &[Rect], config: &ObstacleConfig) -> bool {
    if zones.iter().any(|z| z.intersects(candidate)) {
        return false;
    }
    placed
        .iter()
        .all(|other| !candidate.intersects(other) && !reads_as_stack(candidate, other, config))
}

/// Two walls running side by side with only a sliver between them read as
/// one thick block; reject those pairs.
fn reads_as_stack(a: &Rect, b: &Rect, config: &ObstacleConfig) -> bool {
    let stacked_vertically = a.overlap_x(b) > config.align_overlap && a.gap_y(b) < config.min_gap;
    let stacked_horizontally = a.overlap_y(b) > config.align_overlap && a.gap_x(b) < config.min_gap;
    stacked_vertically || stacked_horizontally
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::{RoomId, WallSide};
    use crate::dungeon::layout::{door_rect, entrance_position, wall_length};
    use crate::geometry::Vec2;
    use crate::rng::RunRng;

    fn all_doors(geometry: &RoomGeometry) -> Vec<Door> {
        WallSide::ALL
            .iter()
            .map(|&side| Door {
                side,
                offset: wall_length(geometry, side) / 2.0,
                length: geometry.door_length,
                to: RoomId(1),
            })
            .collect()
    }

    #[test]
    fn obstacles_respect_every_clear_zone() {
        let geometry = RoomGeometry::default();
        let config = ObstacleConfig::default();
        let doors = all_doors(&geometry);
        let center = Rect::centered(geometry.room_rect().center(), config.center_margin);

        for seed in 0..200 {
            let mut rng = RunRng::new(seed);
            let obstacles = generate_obstacles(&geometry, &doors, &config, &mut rng);
            assert!(obstacles.len() <= config.max_count);

            for o in &obstacles {
                assert!(geometry.inner_rect().contains_rect(o));
                assert!(!o.intersects(&center), "seed {seed}: {o} hits center");
                for door in &doors {
                    let margin = door_rect(&geometry, door).expand(config.door_margin);
                    assert!(!o.intersects(&margin), "seed {seed}: {o} hits door");
                    let entrance = Rect::centered(
                        entrance_position(&geometry, door, config.entrance_inset),
                        config.entrance_margin,
                    );
                    assert!(!o.intersects(&entrance));
                }
            }
            for (i, a) in obstacles.iter().enumerate() {
                for b in &obstacles[i + 1..] {
                    assert!(!a.intersects(b));
                    assert!(!reads_as_stack(a, b, &config));
                }
            }
        }
    }

    #[test]
    fn impossible_room_yields_nothing_without_looping() {
        let geometry = RoomGeometry::default();
        let config = ObstacleConfig {
            center_margin: 10_000.0,
            ..ObstacleConfig::default()
        };
        let mut rng = RunRng::new(1);
        assert!(generate_obstacles(&geometry, &[], &config, &mut rng).is_empty());
    }

    #[test]
    fn shortfall_drops_last_placed() {
        // A floor too small to fit more than a couple of walls
        let geometry = RoomGeometry {
            width: 300.0,
            height: 300.0,
            ..RoomGeometry::default()
        };
        let config = ObstacleConfig {
            min_count: 5,
            max_count: 5,
            center_margin: 0.0,
            ..ObstacleConfig::default()
        };
        let kept = ObstacleConfig {
            drop_last_on_shortfall: false,
            ..config.clone()
        };

        for seed in 0..50 {
            let dropped = generate_obstacles(&geometry, &[], &config, &mut RunRng::new(seed));
            let full = generate_obstacles(&geometry, &[], &kept, &mut RunRng::new(seed));
            if full.len() < 5 && full.len() >= 2 {
                assert_eq!(dropped.len(), full.len() - 1);
                assert_eq!(dropped[..], full[..dropped.len()]);
            }
        }
    }

    #[test]
    fn center_square_stays_open() {
        let geometry = RoomGeometry::default();
        let config = ObstacleConfig::default();
        let mut rng = RunRng::new(77);
        let obstacles = generate_obstacles(&geometry, &[], &config, &mut rng);
        let center = geometry.room_rect().center();
        assert!(obstacles.iter().all(|o| !o.contains_point(center)));
        assert_eq!(center, Vec2::new(480.0, 320.0));
    }
}
