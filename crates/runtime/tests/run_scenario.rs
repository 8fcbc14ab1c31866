//! End-to-end runs driven through the public API only.

use std::collections::VecDeque;

use delve_content::{Catalog, GearSlot, builtin};
use delve_core::{GameConfig, GlobalStat, PlayerStat, RoomId, Vec2};
use delve_runtime::{JsonFileStore, MetaProgress, MetaStore, Run, RunError, RunOutcome};

const FAR_AWAY: Vec2 = Vec2::new(-10_000.0, -10_000.0);

fn start(seed: u64) -> (Run, Catalog, MetaProgress) {
    let catalog = builtin::catalog();
    let progress = MetaProgress::new(&catalog);
    let run = Run::start(GameConfig::default(), catalog.clone(), &progress, seed, 0).unwrap();
    (run, catalog, progress)
}

/// Kills everything in the current room from out of explosion range.
fn clear_current_room(run: &mut Run) {
    run.move_player(FAR_AWAY);
    while let Some(enemy) = run.enemies().first() {
        let id = enemy.id;
        let report = run.damage_enemy(id, 1000.0).unwrap();
        assert!(report.killed);
    }
}

/// Door indices leading from `from` to `to`, shortest first.
fn route(run: &Run, from: RoomId, to: RoomId) -> Vec<usize> {
    let dungeon = run.dungeon();
    let mut came_from: Vec<Option<(RoomId, usize)>> = vec![None; dungeon.len()];
    let mut queue = VecDeque::from([from]);
    while let Some(current) = queue.pop_front() {
        if current == to {
            break;
        }
        for (index, door) in dungeon.room(current).unwrap().doors.iter().enumerate() {
            if door.to != from && came_from[door.to.0].is_none() {
                came_from[door.to.0] = Some((current, index));
                queue.push_back(door.to);
            }
        }
    }

    let mut doors = Vec::new();
    let mut at = to;
    while at != from {
        let (prev, index) = came_from[at.0].unwrap();
        doors.push(index);
        at = prev;
    }
    doors.reverse();
    doors
}

/// A door out of the current room that does not lead into the boss room.
fn normal_door(run: &Run) -> usize {
    let boss = run.dungeon().boss_room_id;
    run.dungeon()
        .room(run.current_room())
        .unwrap()
        .doors
        .iter()
        .position(|d| d.to != boss)
        .unwrap()
}

/// Rooms entered when following `route` from `from`.
fn rooms_along(run: &Run, from: RoomId, doors: &[usize]) -> Vec<RoomId> {
    let mut at = from;
    doors
        .iter()
        .map(|&door| {
            at = run.dungeon().room(at).unwrap().doors[door].to;
            at
        })
        .collect()
}

fn walk_to(run: &mut Run, target: RoomId) {
    for door in route(run, run.current_room(), target) {
        run.enter_room(door).unwrap();
        clear_current_room(run);
    }
}

#[test]
fn clearing_a_room_raises_difficulty_and_drops_elite_entries() {
    let (mut run, _, _) = start(7);
    assert_eq!(run.derived_global()[GlobalStat::DifficultyModifier], 0.0);

    let entered = run.enter_room(normal_door(&run)).unwrap();
    assert!(!run.enemies().is_empty());
    assert!(matches!(run.enter_room(0), Err(RunError::RoomNotCleared(_))));

    clear_current_room(&mut run);
    assert!(run.dungeon().room(entered).unwrap().cleared);

    let config = run.config().difficulty.clone();
    let global = run.derived_global();
    assert!((global[GlobalStat::DifficultyModifier] - config.modifier_per_room).abs() < 1e-9);
    assert!(
        (global[GlobalStat::EnemyHealthMult] - (1.0 + config.health_mult_per_room)).abs() < 1e-9
    );
    assert_eq!(run.engine().elite_entry_count(), 0);

    // Back through the door we came from.
    let back = run
        .dungeon()
        .room(entered)
        .unwrap()
        .doors
        .iter()
        .position(|d| d.to == run.dungeon().start_room_id)
        .unwrap();
    assert_eq!(run.enter_room(back).unwrap(), run.dungeon().start_room_id);
    assert!(run.enemies().is_empty());
}

#[test]
fn gear_and_upgrades_stack_on_fire_rate() {
    let catalog = builtin::catalog();
    let mut progress = MetaProgress::new(&catalog);
    progress.equip(GearSlot::Weapon, "hair_trigger");

    let mut run = Run::start(GameConfig::default(), catalog, &progress, 3, 0).unwrap();
    assert!((run.derived_stats()[PlayerStat::FireRate] - 119.0).abs() < 1e-9);

    run.pick_upgrade("quick_hands").unwrap();
    assert!((run.derived_stats()[PlayerStat::FireRate] - 101.15).abs() < 1e-9);
    assert_eq!(run.upgrades(), ["quick_hands".to_string()]);
}

#[test]
fn kill_hook_heals_the_player() {
    let (mut run, _, _) = start(11);
    run.pick_upgrade("bloodthirst").unwrap();
    run.enter_room(normal_door(&run)).unwrap();

    let attacker = run.enemies()[0].id;
    let taken = run.enemy_hits_player(attacker, 1.0).unwrap();
    assert_eq!(taken, 1.0);
    assert_eq!(run.player().health, 5.0);

    run.move_player(FAR_AWAY);
    run.damage_enemy(attacker, 1000.0).unwrap();
    assert_eq!(run.player().health, 5.5);
}

#[test]
fn reaching_the_boss_wins_the_run() {
    let (mut run, catalog, mut progress) = start(42);
    let boss = run.dungeon().boss_room_id;
    walk_to(&mut run, boss);

    assert_eq!(run.outcome(), RunOutcome::Victory);
    assert!(run.derived_global()[GlobalStat::DifficultyModifier] >= run.config().difficulty.boss_modifier);
    assert!(matches!(run.tick(1), Err(RunError::NotInProgress { .. })));
    assert!(matches!(run.enter_room(0), Err(RunError::NotInProgress { .. })));

    let summary = run.finish();
    assert_eq!(summary.outcome, RunOutcome::Victory);
    assert!(summary.rooms_cleared >= 1);
    assert!(summary.kills >= 1);

    let locked = catalog.heroes.iter().filter(|h| !h.unlocked_by_default).count();
    let gain = progress.record_run(&summary, &catalog);
    assert_eq!(gain.xp, summary.xp);
    assert_eq!(gain.unlocked.is_some(), locked > 0);
    assert_eq!(progress.runs_completed, 1);
}

#[test]
fn teleport_pads_move_the_player_between_them() {
    for seed in 1..40u64 {
        let (mut run, _, _) = start(seed);
        let start_room = run.dungeon().start_room_id;
        let boss = run.dungeon().boss_room_id;
        let target = (0..run.dungeon().len()).map(RoomId).find(|&id| {
            let has_pads = run.dungeon().room(id).unwrap().teleport.is_some();
            let doors = route(&run, start_room, id);
            has_pads && !rooms_along(&run, start_room, &doors).contains(&boss)
        });
        let Some(target) = target else {
            continue;
        };

        walk_to(&mut run, target);
        assert_eq!(run.current_room(), target);
        let pair = run.dungeon().room(target).unwrap().teleport.unwrap();

        assert_eq!(run.try_teleport(), None);
        assert_eq!(run.player().position, FAR_AWAY);

        run.move_player(pair.a.center());
        assert_eq!(run.try_teleport(), Some(pair.b.center()));
        assert_eq!(run.player().position, pair.b.center());

        // Landing on B sends the player straight back
        assert_eq!(run.try_teleport(), Some(pair.a.center()));
        return;
    }
    panic!("no seed produced a reachable room with teleport pads");
}

#[test]
fn dying_ends_the_run() {
    let (mut run, _, _) = start(5);
    run.enter_room(normal_door(&run)).unwrap();
    let attacker = run.enemies()[0].id;

    run.enemy_hits_player(attacker, 100.0).unwrap();
    assert_eq!(run.outcome(), RunOutcome::Dead);
    assert!(matches!(
        run.damage_enemy(attacker, 1.0),
        Err(RunError::NotInProgress {
            outcome: RunOutcome::Dead
        })
    ));

    let summary = run.finish();
    assert_eq!(summary.rooms_cleared, 0);
    assert_eq!(summary.xp, 0);
}

#[test]
fn restart_resets_modifiers_but_not_elite_ids() {
    let (mut run, _, progress) = start(1);
    run.pick_upgrade("heavy_rounds").unwrap();
    run.accept_shrine("shrine_of_blood").unwrap();

    let mut last_elite = None;
    let mut elites_seen = 0;
    for seed in 1..40u64 {
        if seed > 1 {
            run.restart(&progress, seed, 0).unwrap();
            assert!(run.upgrades().is_empty());
            assert_eq!(run.derived_stats()[PlayerStat::Damage], 1.0);
            assert_eq!(run.derived_global()[GlobalStat::EnemyHealthMult], 1.0);
            assert_eq!(run.engine().elite_entry_count(), 0);
        }

        let doors = run.dungeon().room(run.current_room()).unwrap().doors.len();
        for door in 0..doors {
            run.enter_room(door).unwrap();
            for elite in run.enemies().iter().filter_map(|e| e.elite_id) {
                if let Some(previous) = last_elite {
                    assert!(elite > previous);
                }
                last_elite = Some(elite);
                elites_seen += 1;
            }
            clear_current_room(&mut run);
            if run.outcome().is_over() {
                break;
            }
            let start = run.dungeon().start_room_id;
            walk_to(&mut run, start);
        }
    }
    assert!(elites_seen >= 2);
}

#[test]
fn profile_round_trips_through_file_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path().join("profile").join("meta.json"));
    assert!(store.load().unwrap().is_none());

    let (run, catalog, mut progress) = start(9);
    let summary = run.finish();
    progress.record_run(&summary, &catalog);
    store.save(&progress).unwrap();

    assert_eq!(store.load().unwrap(), Some(progress));
}
