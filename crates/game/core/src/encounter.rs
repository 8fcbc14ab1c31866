//! Wave planning and spawning.
//!
//! A wave is decided in two steps so the plan can be inspected (and logged)
//! before any entity exists:
//!
//! ```text
//! plan_wave(room, derived global)  → WavePlan { kinds, points, multipliers }
//! spawn_wave(engine, plan)         → Vec<Enemy>, one elite roll
//! ```

use rand::Rng;
use tracing::debug;

use crate::config::{GameConfig, RoomGeometry};
use crate::dungeon::{Room, RoomId, sample_span};
use crate::elite::{elite_spawn_chance, promote_random_elite};
use crate::enemy::{Enemy, EnemyId, EnemyKind};
use crate::geometry::{Rect, Vec2};
use crate::stats::{GlobalStat, ModifierEngine, StatBlock};

#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PlannedSpawn {
    pub kind: EnemyKind,
    pub position: Vec2,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WavePlan {
    pub room: RoomId,
    pub spawns: Vec<PlannedSpawn>,
    pub speed_mult: f64,
    pub health_mult: f64,
    pub elite_chance: f64,
    pub is_boss: bool,
}

/// Enemy count for the current difficulty, before spawn points are sampled.
pub fn wave_size(global: &StatBlock<GlobalStat>, config: &GameConfig) -> usize {
    let cfg = &config.encounter;
    let raw = cfg.base_count * global[GlobalStat::SpawnDensityMult]
        + global[GlobalStat::DifficultyModifier] * cfg.count_per_difficulty;
    if !raw.is_finite() {
        return cfg.min_count;
    }
    (raw.round().max(0.0) as usize).clamp(cfg.min_count, cfg.max_count.max(cfg.min_count))
}

/// Decides what the wave of `room` looks like at the current difficulty.
///
/// The planned count can come out short when the floor is too crowded to
/// fit every spawn point.
pub fn plan_wave(
    room: &Room,
    global: &StatBlock<GlobalStat>,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> WavePlan {
    let geometry = &config.dungeon.geometry;
    let speed_mult = global[GlobalStat::DifficultyScale];
    let health_mult = global[GlobalStat::EnemyHealthMult];

    if room.is_boss {
        let position = spawn_points(geometry, room, 1, config, rng)
            .pop()
            .unwrap_or_else(|| boss_fallback(geometry));
        return WavePlan {
            room: room.id,
            spawns: vec![PlannedSpawn {
                kind: EnemyKind::Boss,
                position,
            }],
            speed_mult,
            health_mult,
            elite_chance: 0.0,
            is_boss: true,
        };
    }

    let count = wave_size(global, config);
    let points = spawn_points(geometry, room, count, config, rng);
    let spawns = points
        .into_iter()
        .map(|position| PlannedSpawn {
            kind: pick_kind(rng),
            position,
        })
        .collect::<Vec<_>>();

    let elite_chance = elite_spawn_chance(global[GlobalStat::DifficultyModifier], &config.elite);
    debug!(
        target: "delve::encounter",
        room = %room.id,
        wanted = count,
        planned = spawns.len(),
        elite_chance,
        "wave planned"
    );

    WavePlan {
        room: room.id,
        spawns,
        speed_mult,
        health_mult,
        elite_chance,
        is_boss: false,
    }
}

/// Instantiates `plan`, handing out ids from `next_enemy_id`, then makes at
/// most one enemy elite.
pub fn spawn_wave(
    engine: &mut ModifierEngine,
    plan: &WavePlan,
    next_enemy_id: &mut u64,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Vec<Enemy> {
    let mut wave: Vec<Enemy> = plan
        .spawns
        .iter()
        .map(|spawn| {
            let id = EnemyId(*next_enemy_id);
            *next_enemy_id += 1;
            Enemy::spawn(id, spawn.kind, spawn.position, plan.speed_mult, plan.health_mult)
        })
        .collect();

    if !plan.is_boss {
        promote_random_elite(engine, &mut wave, plan.elite_chance, &config.elite, rng);
    }
    wave
}

/// Up to `count` points on the floor of `room`, away from the center, the
/// room's blockers and each other.
pub fn spawn_points(
    geometry: &RoomGeometry,
    room: &Room,
    count: usize,
    config: &GameConfig,
    rng: &mut impl Rng,
) -> Vec<Vec2> {
    let cfg = &config.encounter;
    let area = geometry.inner_rect().expand(-cfg.wall_padding);
    let center = Rect::centered(geometry.room_rect().center(), cfg.center_clearance);
    let blockers: Vec<Rect> = room
        .blockers()
        .map(|b| b.expand(cfg.obstacle_clearance))
        .collect();

    let mut points: Vec<Vec2> = Vec::with_capacity(count);
    for _ in 0..count {
        let found = (0..cfg.spawn_attempts).find_map(|_| {
            let p = Vec2::new(
                sample_span(rng, area.x, area.right()),
                sample_span(rng, area.y, area.bottom()),
            );
            let clear = !center.contains_point(p)
                && blockers.iter().all(|b| !b.contains_point(p))
                && points.iter().all(|q| q.distance(p) >= cfg.min_separation);
            clear.then_some(p)
        });
        if let Some(p) = found {
            points.push(p);
        }
    }
    points
}

fn boss_fallback(geometry: &RoomGeometry) -> Vec2 {
    let inner = geometry.inner_rect();
    Vec2::new(inner.center().x, inner.y + inner.h * 0.25)
}

fn pick_kind(rng: &mut impl Rng) -> EnemyKind {
    let total: u32 = EnemyKind::WAVE_KINDS
        .iter()
        .map(|k| k.profile().weight)
        .sum();
    let mut roll = rng.gen_range(0..total);
    for kind in EnemyKind::WAVE_KINDS {
        let weight = kind.profile().weight;
        if roll < weight {
            return kind;
        }
        roll -= weight;
    }
    EnemyKind::Chaser
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dungeon::generate_dungeon;
    use crate::rng::RunRng;
    use crate::stats::PartialStats;

    fn global(density: f64, difficulty: f64) -> StatBlock<GlobalStat> {
        let mut block = StatBlock::new();
        block.apply_partial(
            &PartialStats::new()
                .with(GlobalStat::SpawnDensityMult, density)
                .with(GlobalStat::DifficultyModifier, difficulty),
        );
        block
    }

    #[test]
    fn wave_size_scales_and_clamps() {
        let config = GameConfig::default();
        assert_eq!(wave_size(&global(1.0, 0.0), &config), 4);
        assert_eq!(wave_size(&global(1.5, 2.0), &config), 7);
        assert_eq!(wave_size(&global(0.1, 0.0), &config), 2);
        assert_eq!(wave_size(&global(10.0, 10.0), &config), 12);
        assert_eq!(wave_size(&global(f64::NAN, 0.0), &config), 2);
    }

    #[test]
    fn plan_uses_difficulty_outputs() {
        let config = GameConfig::default();
        let mut rng = RunRng::new(21);
        let dungeon = generate_dungeon(&config, &mut rng);
        let room = dungeon
            .rooms
            .iter()
            .find(|r| !r.is_boss && r.id != dungeon.start_room_id)
            .unwrap();

        let mut g = global(1.0, 4.0);
        g[GlobalStat::DifficultyScale] = 1.2;
        g[GlobalStat::EnemyHealthMult] = 1.5;

        let plan = plan_wave(room, &g, &config, &mut rng);
        assert_eq!(plan.speed_mult, 1.2);
        assert_eq!(plan.health_mult, 1.5);
        assert!((plan.elite_chance - 0.40).abs() < 1e-9);
        assert!(!plan.spawns.is_empty() && plan.spawns.len() <= 6);
        assert!(plan.spawns.iter().all(|s| s.kind != EnemyKind::Boss));
    }

    #[test]
    fn spawn_points_respect_clearances() {
        let config = GameConfig::default();
        let geometry = &config.dungeon.geometry;
        let cfg = &config.encounter;
        let center = Rect::centered(geometry.room_rect().center(), cfg.center_clearance);

        for seed in 0..30 {
            let mut rng = RunRng::new(seed);
            let dungeon = generate_dungeon(&config, &mut rng);
            for room in &dungeon.rooms {
                let points = spawn_points(geometry, room, 8, &config, &mut rng);
                for (i, p) in points.iter().enumerate() {
                    assert!(!center.contains_point(*p));
                    assert!(room.blockers().all(|b| !b.contains_point(*p)));
                    for q in &points[i + 1..] {
                        assert!(p.distance(*q) >= cfg.min_separation);
                    }
                }
            }
        }
    }

    #[test]
    fn boss_room_plans_single_boss() {
        let config = GameConfig::default();
        let mut rng = RunRng::new(4);
        let dungeon = generate_dungeon(&config, &mut rng);
        let boss = dungeon.room(dungeon.boss_room_id).unwrap();

        let plan = plan_wave(boss, &global(3.0, 10.0), &config, &mut rng);
        assert!(plan.is_boss);
        assert_eq!(plan.spawns.len(), 1);
        assert_eq!(plan.spawns[0].kind, EnemyKind::Boss);

        let mut engine = ModifierEngine::default();
        let mut next = 1;
        let wave = spawn_wave(&mut engine, &plan, &mut next, &config, &mut rng);
        assert_eq!(wave.len(), 1);
        assert!(!wave[0].is_elite());
        assert_eq!(next, 2);
    }

    #[test]
    fn spawned_wave_has_at_most_one_elite() {
        let config = GameConfig::default();
        let mut engine = ModifierEngine::default();
        let mut next = 1;
        let mut elites = 0;

        for seed in 0..100 {
            let mut rng = RunRng::new(seed);
            let plan = WavePlan {
                room: RoomId(1),
                spawns: (0..5)
                    .map(|i| PlannedSpawn {
                        kind: EnemyKind::Chaser,
                        position: Vec2::new(i as f32 * 60.0, 100.0),
                    })
                    .collect(),
                speed_mult: 1.0,
                health_mult: 1.0,
                elite_chance: 0.5,
                is_boss: false,
            };
            let wave = spawn_wave(&mut engine, &plan, &mut next, &config, &mut rng);
            let count = wave.iter().filter(|e| e.is_elite()).count();
            assert!(count <= 1);
            elites += count;
        }
        assert!(elites > 20 && elites < 80);
    }

    #[test]
    fn kinds_follow_weights() {
        let mut rng = RunRng::new(99);
        let chasers = (0..900)
            .filter(|_| pick_kind(&mut rng) == EnemyKind::Chaser)
            .count();
        // Weight 4 of 9
        assert!((300..500).contains(&chasers));
    }
}
