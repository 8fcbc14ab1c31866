//! Run orchestration.
//!
//! A [`Run`] owns everything one attempt at the dungeon needs: the modifier
//! engine, the generated dungeon, the live enemies and the player. It is the
//! only place that sequences calls into delve-core:
//!
//! ```text
//! start ─► enter_room ─► (fire | dash | damage_enemy | enemy_hits_player)* ─► room clear ─► ...
//!            ▲                                                                   │
//!            └──────────────── tick(now) every frame ◄───────────────────────────┘
//! ```
//!
//! Within a tick, expiry runs before derived stats are read and elite stats
//! are refreshed before any movement update.
mod outcome;
mod player;

pub use outcome::{RunOutcome, RunSummary};
pub use player::Player;

use std::sync::Arc;

use delve_content::{Catalog, UpgradeDef};
use delve_core::{
    Dungeon, Enemy, EnemyId, EventPayload, FrameClock, GameConfig, GameEvent, GlobalStat,
    HookEffect, ModifierEngine, ModifierSource, PlayerStat, RngStream, RoomId, RunRng, StatBlock,
    StatModifier, Vec2, apply_elite_stats, detach_affix_modifiers, entrance_position,
    generate_dungeon, plan_wave, run_volatile_explosion, spawn_wave, vampiric_heal_amount,
};
use rand::seq::SliceRandom;
use tracing::{debug, info};

use crate::error::{Result, RunError};
use crate::meta::{Loadout, MetaProgress};

/// Result of one hit on an enemy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageReport {
    pub dealt: f64,
    pub killed: bool,
}

pub struct Run {
    config: GameConfig,
    catalog: Catalog,
    clock: Arc<FrameClock>,
    engine: ModifierEngine,
    seed: u64,
    hero_id: String,
    dungeon: Dungeon,
    current_room: RoomId,
    enemies: Vec<Enemy>,
    next_enemy_id: u64,
    player: Player,
    rewards_rng: RunRng,
    upgrades: Vec<String>,
    rooms_cleared: u32,
    kills: u32,
    elite_kills: u32,
    outcome: RunOutcome,
}

impl Run {
    /// Starts a run: fresh engine, loadout applied, dungeon generated and the
    /// player standing in the middle of the start room.
    pub fn start(
        config: GameConfig,
        catalog: Catalog,
        progress: &MetaProgress,
        seed: u64,
        now: u64,
    ) -> Result<Self> {
        let loadout = Loadout::build(progress, &catalog)?;
        let clock = Arc::new(FrameClock::new(now));
        let mut engine = ModifierEngine::new(clock.clone());
        let (dungeon, player) = Self::setup(&mut engine, &config, &loadout, seed);

        let run = Self {
            current_room: dungeon.start_room_id,
            rewards_rng: RunRng::derive(seed, RngStream::Rewards, 0),
            config,
            catalog,
            clock,
            engine,
            seed,
            hero_id: loadout.hero_id,
            dungeon,
            enemies: Vec::new(),
            next_enemy_id: 1,
            player,
            upgrades: Vec::new(),
            rooms_cleared: 0,
            kills: 0,
            elite_kills: 0,
            outcome: RunOutcome::InProgress,
        };
        run.log_start();
        Ok(run)
    }

    /// Starts a new run on the same engine.
    ///
    /// The engine is reset rather than rebuilt: modifiers, the elite table and
    /// the base records are replaced, elite ids keep counting.
    pub fn restart(&mut self, progress: &MetaProgress, seed: u64, now: u64) -> Result<()> {
        let loadout = Loadout::build(progress, &self.catalog)?;
        self.clock.set(now);
        let (dungeon, player) = Self::setup(&mut self.engine, &self.config, &loadout, seed);

        self.seed = seed;
        self.hero_id = loadout.hero_id;
        self.current_room = dungeon.start_room_id;
        self.dungeon = dungeon;
        self.enemies.clear();
        self.next_enemy_id = 1;
        self.player = player;
        self.rewards_rng = RunRng::derive(seed, RngStream::Rewards, 0);
        self.upgrades.clear();
        self.rooms_cleared = 0;
        self.kills = 0;
        self.elite_kills = 0;
        self.outcome = RunOutcome::InProgress;
        self.log_start();
        Ok(())
    }

    fn setup(
        engine: &mut ModifierEngine,
        config: &GameConfig,
        loadout: &Loadout,
        seed: u64,
    ) -> (Dungeon, Player) {
        engine.reset_modifiers();
        engine.set_base_global(StatBlock::new());
        loadout.apply(engine);

        let mut dungeon = generate_dungeon(config, &mut RunRng::derive(seed, RngStream::Dungeon, 0));
        let start = dungeon.start_room_id;
        if let Some(room) = dungeon.room_mut(start) {
            room.cleared = true;
        }

        let center = config.dungeon.geometry.room_rect().center();
        let player = Player::spawn(center, engine.derived_stats());
        (dungeon, player)
    }

    fn log_start(&self) {
        info!(
            target: "delve::run",
            seed = self.seed,
            hero = %self.hero_id,
            rooms = self.dungeon.len(),
            boss = %self.dungeon.boss_room_id,
            "run started"
        );
    }

    // ===== accessors =====

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn engine(&self) -> &ModifierEngine {
        &self.engine
    }

    pub fn dungeon(&self) -> &Dungeon {
        &self.dungeon
    }

    pub fn current_room(&self) -> RoomId {
        self.current_room
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn outcome(&self) -> RunOutcome {
        self.outcome
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    pub fn upgrades(&self) -> &[String] {
        &self.upgrades
    }

    pub fn derived_stats(&self) -> &StatBlock<PlayerStat> {
        self.engine.derived_stats()
    }

    pub fn derived_global(&self) -> &StatBlock<GlobalStat> {
        self.engine.derived_global()
    }

    /// Moves the player; movement itself is simulated by the caller.
    pub fn move_player(&mut self, position: Vec2) {
        self.player.position = position;
    }

    // ===== frame =====

    /// Advances the frame clock to `now`.
    ///
    /// Expires timed modifiers first, then refreshes every live elite so the
    /// movement update that follows reads current numbers. Returns the number
    /// of modifiers that expired.
    pub fn tick(&mut self, now: u64) -> Result<usize> {
        self.ensure_in_progress()?;
        self.clock.set(now);

        let expired = self.engine.process_modifier_durations(now);
        for enemy in &mut self.enemies {
            apply_elite_stats(&self.engine, enemy, &self.config.elite);
        }
        self.player.clamp_to(self.engine.derived_stats());
        Ok(expired)
    }

    // ===== traversal =====

    /// Walks through door `door_index` of the current room.
    ///
    /// The player lands at the entrance of the matching door on the other
    /// side; an uncleared destination gets its wave.
    pub fn enter_room(&mut self, door_index: usize) -> Result<RoomId> {
        self.ensure_in_progress()?;

        let from = self.current_room;
        let room = self.dungeon.room(from).ok_or(RunError::UnknownRoom(from))?;
        if !room.cleared {
            return Err(RunError::RoomNotCleared(from));
        }
        let to = room
            .doors
            .get(door_index)
            .map(|d| d.to)
            .ok_or(RunError::NoSuchDoor {
                room: from,
                index: door_index,
            })?;
        let destination_cleared = self
            .dungeon
            .room(to)
            .ok_or(RunError::UnknownRoom(to))?
            .cleared;

        let geometry = &self.config.dungeon.geometry;
        self.player.position = self
            .dungeon
            .door_to(to, from)
            .map(|door| entrance_position(geometry, door, self.config.obstacles.entrance_inset))
            .unwrap_or_else(|| geometry.room_rect().center());
        self.current_room = to;

        info!(target: "delve::run", %from, %to, cleared = destination_cleared, "entered room");

        let dispatch = self
            .engine
            .emit_game_event(GameEvent::RoomEntered, &EventPayload::new().in_room(to));
        self.apply_effects(dispatch.effects);

        if !destination_cleared {
            self.populate_room(to);
        }
        Ok(to)
    }

    /// Teleports the player if they stand on a pad of the current room.
    pub fn try_teleport(&mut self) -> Option<Vec2> {
        let pair = self.dungeon.room(self.current_room)?.teleport?;
        let landing = pair.destination(self.player.position)?;
        self.player.position = landing;
        Some(landing)
    }

    // ===== actions =====

    /// Spends a dash charge. Returns false, and fires no hooks, when the
    /// player has none left.
    pub fn dash(&mut self) -> Result<bool> {
        self.ensure_in_progress()?;
        if !self.player.spend_dash() {
            return Ok(false);
        }
        let payload = EventPayload::new()
            .in_room(self.current_room)
            .at(self.player.position);
        let dispatch = self.engine.emit_game_event(GameEvent::PlayerDashed, &payload);
        self.apply_effects(dispatch.effects);
        Ok(true)
    }

    /// Fires one volley. Returns the number of bullets in it.
    pub fn fire(&mut self) -> Result<u32> {
        self.ensure_in_progress()?;
        let bullets = self.engine.derived_stats()[PlayerStat::BulletsPerShot]
            .floor()
            .max(1.0) as u32;
        let payload = EventPayload::new()
            .in_room(self.current_room)
            .at(self.player.position)
            .with_amount(f64::from(bullets));
        let dispatch = self.engine.emit_game_event(GameEvent::ShotFired, &payload);
        self.apply_effects(dispatch.effects);
        Ok(bullets)
    }

    fn populate_room(&mut self, room_id: RoomId) {
        let mut rng = RunRng::derive(self.seed, RngStream::Encounter, room_id.0 as u32);
        let Some(room) = self.dungeon.room(room_id) else {
            return;
        };
        let plan = plan_wave(room, self.engine.derived_global(), &self.config, &mut rng);
        let wave = spawn_wave(
            &mut self.engine,
            &plan,
            &mut self.next_enemy_id,
            &self.config,
            &mut rng,
        );

        debug!(
            target: "delve::run",
            room = %room_id,
            enemies = wave.len(),
            elites = wave.iter().filter(|e| e.is_elite()).count(),
            boss = plan.is_boss,
            "wave spawned"
        );

        self.enemies.extend(wave);
        if self.enemies.is_empty() {
            self.clear_room();
        }
    }

    // ===== combat =====

    /// Deals `amount` to an enemy, reduced by its damage reduction.
    pub fn damage_enemy(&mut self, enemy_id: EnemyId, amount: f64) -> Result<DamageReport> {
        self.ensure_in_progress()?;
        let index = self.enemy_index(enemy_id)?;

        let enemy = &mut self.enemies[index];
        let dealt = enemy.take_damage(amount);
        let killed = !enemy.is_alive();
        if killed {
            let enemy = self.enemies.remove(index);
            self.on_enemy_killed(enemy);
        }
        Ok(DamageReport { dealt, killed })
    }

    /// An enemy lands a hit. Returns the damage the player took.
    pub fn enemy_hits_player(&mut self, enemy_id: EnemyId, base_damage: f64) -> Result<f64> {
        self.ensure_in_progress()?;
        let index = self.enemy_index(enemy_id)?;

        let damage = base_damage.max(0.0) * self.engine.derived_global()[GlobalStat::EnemyDamageMult];
        self.player.hurt(damage);

        let heal = vampiric_heal_amount(&self.enemies[index], &self.config.elite);
        if heal > 0.0 {
            self.enemies[index].heal(heal);
        }

        let payload = EventPayload::new()
            .in_room(self.current_room)
            .with_enemy(enemy_id)
            .with_amount(damage);
        let dispatch = self.engine.emit_game_event(GameEvent::PlayerHit, &payload);
        self.apply_effects(dispatch.effects);

        self.check_player_death();
        Ok(damage)
    }

    fn on_enemy_killed(&mut self, enemy: Enemy) {
        run_volatile_explosion(&enemy, self.player.position, &self.config.elite, |damage| {
            self.player.hurt(f64::from(damage))
        });

        self.kills += 1;
        let payload = EventPayload::new()
            .in_room(self.current_room)
            .with_enemy(enemy.id)
            .with_elite(enemy.elite_id)
            .at(enemy.position);
        let mut effects = self
            .engine
            .emit_game_event(GameEvent::EnemyKilled, &payload)
            .effects;
        if enemy.is_elite() {
            self.elite_kills += 1;
            effects.extend(
                self.engine
                    .emit_game_event(GameEvent::EliteKilled, &payload)
                    .effects,
            );
        }
        detach_affix_modifiers(&mut self.engine, &enemy);

        if enemy.can_split() {
            let children = self.config.encounter.split_children;
            for i in 0..children {
                let dx = (i as f32 - (children as f32 - 1.0) / 2.0) * 24.0;
                let id = EnemyId(self.next_enemy_id);
                self.next_enemy_id += 1;
                let position = Vec2::new(enemy.position.x + dx, enemy.position.y);
                self.enemies.push(enemy.split_child(id, position));
            }
        }

        debug!(
            target: "delve::run",
            enemy = %enemy.id,
            kind = ?enemy.kind,
            affix = ?enemy.affix,
            remaining = self.enemies.len(),
            "enemy killed"
        );

        self.apply_effects(effects);
        self.check_player_death();
        if self.enemies.is_empty() && !self.outcome.is_over() {
            self.clear_room();
        }
    }

    fn clear_room(&mut self) {
        let room_id = self.current_room;
        let Some(room) = self.dungeon.room_mut(room_id) else {
            return;
        };
        if room.cleared {
            return;
        }
        room.cleared = true;
        let is_boss = room.is_boss;
        self.rooms_cleared += 1;

        let payload = EventPayload::new().in_room(room_id);
        let dispatch = self.engine.emit_game_event(GameEvent::RoomCleared, &payload);
        self.apply_effects(dispatch.effects);

        let d = &self.config.difficulty;
        let increments = [
            (GlobalStat::DifficultyModifier, d.modifier_per_room),
            (GlobalStat::DifficultyScale, d.scale_per_room),
            (GlobalStat::EnemyHealthMult, d.health_mult_per_room),
            (GlobalStat::EnemyDamageMult, d.damage_mult_per_room),
            (GlobalStat::SpawnDensityMult, d.density_per_room),
        ];
        for (stat, value) in increments {
            self.engine.add_global_modifier(StatModifier::flat(
                "room_clear",
                ModifierSource::Room,
                stat,
                value,
            ));
        }

        if is_boss {
            let dispatch = self.engine.emit_game_event(GameEvent::BossDefeated, &payload);
            self.apply_effects(dispatch.effects);
            self.engine.add_global_modifier(StatModifier::flat(
                "boss_defeated",
                ModifierSource::Boss,
                GlobalStat::DifficultyModifier,
                self.config.difficulty.boss_modifier,
            ));
            self.outcome = RunOutcome::Victory;
        }

        info!(
            target: "delve::run",
            room = %room_id,
            boss = is_boss,
            difficulty = self.engine.derived_global()[GlobalStat::DifficultyModifier],
            "room cleared"
        );
        if is_boss {
            info!(target: "delve::run", kills = self.kills, "run won");
        }
    }

    fn apply_effects(&mut self, effects: Vec<HookEffect>) {
        for effect in effects {
            match effect {
                HookEffect::HealPlayer(amount) => {
                    self.player.heal(amount, self.engine.derived_stats());
                }
                HookEffect::AddModifier(modifier) => self.engine.add_modifier(modifier),
                HookEffect::RefundDash => self.player.refund_dash(self.engine.derived_stats()),
            }
        }
    }

    fn check_player_death(&mut self) {
        if !self.player.is_alive() && !self.outcome.is_over() {
            self.outcome = RunOutcome::Dead;
            info!(
                target: "delve::run",
                room = %self.current_room,
                kills = self.kills,
                "player died"
            );
        }
    }

    // ===== rewards =====

    /// Up to `count` distinct upgrade ids, weighted by their offer weight.
    pub fn offer_upgrades(&mut self, count: usize) -> Vec<String> {
        let mut pool: Vec<&UpgradeDef> = self.catalog.upgrades.iter().collect();
        let mut offer = Vec::with_capacity(count);
        while offer.len() < count {
            let indices: Vec<usize> = (0..pool.len()).collect();
            let Ok(&index) = indices.choose_weighted(&mut self.rewards_rng, |&i| pool[i].weight)
            else {
                break;
            };
            offer.push(pool.swap_remove(index).id.clone());
        }
        offer
    }

    /// Registers every modifier (and hook) of an upgrade.
    pub fn pick_upgrade(&mut self, id: &str) -> Result<()> {
        self.ensure_in_progress()?;
        let upgrade = self
            .catalog
            .upgrade(id)
            .ok_or_else(|| RunError::UnknownUpgrade(id.to_owned()))?;

        for modifier in &upgrade.modifiers {
            self.engine.add_modifier(modifier.clone());
        }
        if let Some(hook) = upgrade.hook {
            self.engine
                .add_hook(hook.to_hook(upgrade.id.clone(), ModifierSource::Upgrade));
        }
        self.upgrades.push(upgrade.id.clone());
        self.player.clamp_to(self.engine.derived_stats());

        debug!(target: "delve::run", upgrade = id, "upgrade picked");
        Ok(())
    }

    /// Takes a shrine deal: the boon goes on the player, the curse on the run.
    pub fn accept_shrine(&mut self, id: &str) -> Result<()> {
        self.ensure_in_progress()?;
        let shrine = self
            .catalog
            .shrine(id)
            .ok_or_else(|| RunError::UnknownShrine(id.to_owned()))?;

        for modifier in &shrine.boon {
            self.engine.add_modifier(modifier.clone());
        }
        for modifier in &shrine.curse {
            self.engine.add_global_modifier(modifier.clone());
        }
        self.player.clamp_to(self.engine.derived_stats());

        debug!(target: "delve::run", shrine = id, "shrine accepted");
        Ok(())
    }

    // ===== end =====

    /// Summary to credit to the meta profile. A run still in progress counts
    /// as abandoned: no victory bonus.
    pub fn finish(self) -> RunSummary {
        let xp = RunSummary::xp_for(self.outcome, self.rooms_cleared, self.kills, self.elite_kills);
        info!(
            target: "delve::run",
            outcome = %self.outcome,
            rooms_cleared = self.rooms_cleared,
            kills = self.kills,
            xp,
            "run finished"
        );
        RunSummary {
            hero_id: self.hero_id,
            outcome: self.outcome,
            rooms_cleared: self.rooms_cleared,
            kills: self.kills,
            elite_kills: self.elite_kills,
            xp,
        }
    }

    fn ensure_in_progress(&self) -> Result<()> {
        if self.outcome.is_over() {
            return Err(RunError::NotInProgress {
                outcome: self.outcome,
            });
        }
        Ok(())
    }

    fn enemy_index(&self, enemy_id: EnemyId) -> Result<usize> {
        self.enemies
            .iter()
            .position(|e| e.id == enemy_id)
            .ok_or(RunError::UnknownEnemy(enemy_id))
    }
}
