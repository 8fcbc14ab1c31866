//! Teleport pad pairs.

use rand::Rng;
use tracing::debug;

use super::layout::sample_rect;
use super::types::{Door, TeleportPair};
use crate::config::{RoomGeometry, TeleportConfig};
use crate::geometry::Rect;

/// Places a linked pair of pads, or nothing.
///
/// Pads avoid the center, doors, entrances, padded obstacles and each other,
/// and sit at least `min_pair_distance` apart. A room never gets a single
/// pad: if either placement runs out of attempts the result is `None`.
pub fn generate_teleport_pads(
    geometry: &RoomGeometry,
    doors: &[Door],
    obstacles: &[Rect],
    config: &TeleportConfig,
    rng: &mut impl Rng,
) -> Option<TeleportPair> {
    let area = geometry.inner_rect().expand(-config.wall_padding);
    let mut blocked = config.clear_zones().rects(geometry, doors);
    blocked.extend(obstacles.iter().map(|o| o.expand(config.obstacle_padding)));

    let a = place_pad(&area, &blocked, None, config, rng);
    let b = a.and_then(|a| place_pad(&area, &blocked, Some(&a), config, rng));

    match (a, b) {
        (Some(a), Some(b)) => Some(TeleportPair { a, b }),
        _ => {
            debug!(
                target: "delve::dungeon",
                placed_first = a.is_some(),
                "teleport pads skipped"
            );
            None
        }
    }
}

fn place_pad(
    area: &Rect,
    blocked: &[Rect],
    partner: Option<&Rect>,
    config: &TeleportConfig,
    rng: &mut impl Rng,
) -> Option<Rect> {
    (0..config.max_attempts).find_map(|_| {
        let pad = sample_rect(rng, area, config.pad_size, config.pad_size)?;
        if blocked.iter().any(|b| b.intersects(&pad)) {
            return None;
        }
        if let Some(other) = partner {
            if other.expand(config.obstacle_padding).intersects(&pad)
                || other.center().distance(pad.center()) < config.min_pair_distance
            {
                return None;
            }
        }
        Some(pad)
    })
}
