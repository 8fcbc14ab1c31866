//! Room geometry helpers: door holes, wall pieces, entrances and the zones
//! generation keeps clear.

use arrayvec::ArrayVec;
use rand::Rng;

use super::types::{Door, WallSide};
use crate::config::{GameConfig, RoomGeometry};
use crate::geometry::{Rect, Vec2};

/// Length of the wall on `side`.
pub fn wall_length(geometry: &RoomGeometry, side: WallSide) -> f32 {
    if side.is_horizontal() {
        geometry.width
    } else {
        geometry.height
    }
}

/// Full rectangle of the wall on `side`.
pub fn wall_rect(geometry: &RoomGeometry, side: WallSide) -> Rect {
    let (w, h, t) = (geometry.width, geometry.height, geometry.wall_thickness);
    match side {
        WallSide::North => Rect::new(0.0, 0.0, w, t),
        WallSide::South => Rect::new(0.0, h - t, w, t),
        WallSide::West => Rect::new(0.0, 0.0, t, h),
        WallSide::East => Rect::new(w - t, 0.0, t, h),
    }
}

/// The opening a door cuts through its wall.
pub fn door_rect(geometry: &RoomGeometry, door: &Door) -> Rect {
    let wall = wall_rect(geometry, door.side);
    let start = door.offset - door.length / 2.0;
    if door.side.is_horizontal() {
        Rect::new(start, wall.y, door.length, wall.h)
    } else {
        Rect::new(wall.x, start, wall.w, door.length)
    }
}

pub fn door_rects(
    geometry: &RoomGeometry,
    doors: &[Door],
) -> ArrayVec<Rect, { GameConfig::MAX_DOORS_PER_ROOM }> {
    doors
        .iter()
        .take(GameConfig::MAX_DOORS_PER_ROOM)
        .map(|d| door_rect(geometry, d))
        .collect()
}

/// Solid wall pieces: each wall minus its door hole, 0 to 2 pieces per wall.
pub fn wall_segments(
    geometry: &RoomGeometry,
    doors: &[Door],
) -> ArrayVec<Rect, { GameConfig::MAX_WALL_SEGMENTS }> {
    let mut segments = ArrayVec::new();

    for side in WallSide::ALL {
        let wall = wall_rect(geometry, side);
        let Some(door) = doors.iter().find(|d| d.side == side) else {
            segments.push(wall);
            continue;
        };

        let hole = door_rect(geometry, door);
        let pieces = if side.is_horizontal() {
            [
                Rect::new(wall.x, wall.y, hole.x - wall.x, wall.h),
                Rect::new(hole.right(), wall.y, wall.right() - hole.right(), wall.h),
            ]
        } else {
            [
                Rect::new(wall.x, wall.y, wall.w, hole.y - wall.y),
                Rect::new(wall.x, hole.bottom(), wall.w, wall.bottom() - hole.bottom()),
            ]
        };
        for piece in pieces {
            if piece.w > 0.0 && piece.h > 0.0 {
                segments.push(piece);
            }
        }
    }

    segments
}

/// Point on the floor `inset` units in front of `door`, where a player
/// coming through it lands.
pub fn entrance_position(geometry: &RoomGeometry, door: &Door, inset: f32) -> Vec2 {
    let (w, h, t) = (geometry.width, geometry.height, geometry.wall_thickness);
    match door.side {
        WallSide::North => Vec2::new(door.offset, t + inset),
        WallSide::South => Vec2::new(door.offset, h - t - inset),
        WallSide::West => Vec2::new(t + inset, door.offset),
        WallSide::East => Vec2::new(w - t - inset, door.offset),
    }
}

/// Margins around the center, doors and entrances that placement must respect.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ClearZones {
    pub center_margin: f32,
    pub door_margin: f32,
    pub entrance_inset: f32,
    pub entrance_margin: f32,
}

impl ClearZones {
    /// Rectangles nothing may overlap: the center square, every door hole
    /// grown by the door margin and the square around every entrance point.
    pub fn rects(&self, geometry: &RoomGeometry, doors: &[Door]) -> Vec<Rect> {
        let mut zones = Vec::with_capacity(1 + doors.len() * 2);
        zones.push(Rect::centered(
            geometry.room_rect().center(),
            self.center_margin,
        ));
        for door in doors {
            zones.push(door_rect(geometry, door).expand(self.door_margin));
            zones.push(Rect::centered(
                entrance_position(geometry, door, self.entrance_inset),
                self.entrance_margin,
            ));
        }
        zones
    }
}

/// Uniform `[lo, hi]`, collapsing to `lo` when the range is empty.
pub(crate) fn sample_span(rng: &mut impl Rng, lo: f32, hi: f32) -> f32 {
    if hi > lo { rng.gen_range(lo..=hi) } else { lo }
}

/// Uniform placement of a `w`×`h` rectangle fully inside `area`.
///
/// `None` when it cannot fit.
pub(crate) fn sample_rect(rng: &mut impl Rng, area: &Rect, w: f32, h: f32) -> Option<Rect> {
    if w > area.w || h > area.h {
        return None;
    }
    let x = sample_span(rng, area.x, area.right() - w);
    let y = sample_span(rng, area.y, area.bottom() - h);
    Some(Rect::new(x, y, w, h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::RoomId;

    fn door(side: WallSide) -> Door {
        let geometry = RoomGeometry::default();
        Door {
            side,
            offset: wall_length(&geometry, side) / 2.0,
            length: geometry.door_length,
            to: RoomId(1),
        }
    }

    #[test]
    fn wall_without_doors_is_four_pieces() {
        let geometry = RoomGeometry::default();
        assert_eq!(wall_segments(&geometry, &[]).len(), 4);
    }

    #[test]
    fn door_splits_its_wall() {
        let geometry = RoomGeometry::default();
        let doors = [door(WallSide::North), door(WallSide::West)];
        let segments = wall_segments(&geometry, &doors);
        assert_eq!(segments.len(), 6);

        for hole in door_rects(&geometry, &doors) {
            assert!(segments.iter().all(|s| !s.intersects(&hole)));
        }
        // Door hole plus both pieces cover the whole wall
        let north: f32 = segments
            .iter()
            .filter(|s| s.y == 0.0 && s.h == geometry.wall_thickness)
            .map(|s| s.w)
            .sum();
        assert_eq!(north + geometry.door_length, geometry.width);
    }

    #[test]
    fn entrance_is_inside_floor() {
        let geometry = RoomGeometry::default();
        let inner = geometry.inner_rect();
        for side in WallSide::ALL {
            let p = entrance_position(&geometry, &door(side), 48.0);
            assert!(inner.contains_point(p), "{side} entrance at {p}");
        }
    }

    #[test]
    fn sample_rect_stays_inside() {
        let mut rng = crate::rng::RunRng::new(9);
        let area = Rect::new(10.0, 10.0, 100.0, 50.0);
        for _ in 0..100 {
            let r = sample_rect(&mut rng, &area, 30.0, 20.0).unwrap();
            assert!(area.contains_rect(&r));
        }
        assert!(sample_rect(&mut rng, &area, 120.0, 5.0).is_none());
    }
}
