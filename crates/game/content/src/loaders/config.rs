//! Game configuration loader.

use std::path::Path;

use delve_core::GameConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for game configuration from TOML files.
///
/// Sections and fields left out of the file keep their defaults, so a
/// config only needs to list what it changes:
///
/// ```toml
/// [elite]
/// chance_cap = 0.8
///
/// [dungeon]
/// min_rooms = 6
/// ```
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<GameConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
            .map_err(|e| anyhow::anyhow!("{}: {}", path.display(), e))
    }

    /// Parse config data from a TOML string.
    pub fn parse(content: &str) -> LoadResult<GameConfig> {
        let config: GameConfig = toml::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if config.dungeon.min_rooms < 2 {
            anyhow::bail!("dungeon.min_rooms must be at least 2 (start and boss)");
        }
        if config.dungeon.min_rooms > config.dungeon.max_rooms {
            anyhow::bail!(
                "dungeon.min_rooms ({}) exceeds dungeon.max_rooms ({})",
                config.dungeon.min_rooms,
                config.dungeon.max_rooms
            );
        }
        Self::validate(&config)?;
        Ok(config)
    }

    /// Rejects non-finite or negative tunables and out-of-range ratios.
    pub fn validate(config: &GameConfig) -> LoadResult<()> {
        let geometry = &config.dungeon.geometry;
        let obstacles = &config.obstacles;
        let teleport = &config.teleport;
        let elite = &config.elite;
        let encounter = &config.encounter;
        let difficulty = &config.difficulty;

        let lengths = [
            ("dungeon.geometry.width", geometry.width),
            ("dungeon.geometry.height", geometry.height),
            ("dungeon.geometry.wall_thickness", geometry.wall_thickness),
            ("dungeon.geometry.door_length", geometry.door_length),
            ("obstacles.min_thickness", obstacles.min_thickness),
            ("obstacles.max_thickness", obstacles.max_thickness),
            ("obstacles.min_length", obstacles.min_length),
            ("obstacles.max_length", obstacles.max_length),
            ("obstacles.wall_padding", obstacles.wall_padding),
            ("obstacles.center_margin", obstacles.center_margin),
            ("obstacles.door_margin", obstacles.door_margin),
            ("obstacles.entrance_inset", obstacles.entrance_inset),
            ("obstacles.entrance_margin", obstacles.entrance_margin),
            ("obstacles.align_overlap", obstacles.align_overlap),
            ("obstacles.min_gap", obstacles.min_gap),
            ("teleport.pad_size", teleport.pad_size),
            ("teleport.wall_padding", teleport.wall_padding),
            ("teleport.center_margin", teleport.center_margin),
            ("teleport.door_margin", teleport.door_margin),
            ("teleport.entrance_inset", teleport.entrance_inset),
            ("teleport.entrance_margin", teleport.entrance_margin),
            ("teleport.obstacle_padding", teleport.obstacle_padding),
            ("teleport.min_pair_distance", teleport.min_pair_distance),
            ("elite.explosion_radius", elite.explosion_radius),
            ("elite.explosion_damage", elite.explosion_damage),
            ("encounter.wall_padding", encounter.wall_padding),
            ("encounter.center_clearance", encounter.center_clearance),
            ("encounter.obstacle_clearance", encounter.obstacle_clearance),
            ("encounter.min_separation", encounter.min_separation),
        ];
        for (name, value) in lengths {
            check_non_negative(name, f64::from(value))?;
        }

        let amounts = [
            ("elite.frenzy_speed_bonus", elite.frenzy_speed_bonus),
            ("elite.min_speed", elite.min_speed),
            ("elite.min_max_health", elite.min_max_health),
            ("elite.min_speed_mult", elite.min_speed_mult),
            ("encounter.base_count", encounter.base_count),
            ("encounter.count_per_difficulty", encounter.count_per_difficulty),
            ("difficulty.modifier_per_room", difficulty.modifier_per_room),
            ("difficulty.scale_per_room", difficulty.scale_per_room),
            ("difficulty.health_mult_per_room", difficulty.health_mult_per_room),
            ("difficulty.damage_mult_per_room", difficulty.damage_mult_per_room),
            ("difficulty.density_per_room", difficulty.density_per_room),
            ("difficulty.boss_modifier", difficulty.boss_modifier),
        ];
        for (name, value) in amounts {
            check_non_negative(name, value)?;
        }

        let ratios = [
            ("elite.base_chance", elite.base_chance),
            ("elite.chance_per_difficulty", elite.chance_per_difficulty),
            ("elite.chance_cap", elite.chance_cap),
            ("elite.frenzy_health_ratio", elite.frenzy_health_ratio),
            ("elite.max_damage_reduction", elite.max_damage_reduction),
            ("elite.default_lifesteal", elite.default_lifesteal),
        ];
        for (name, value) in ratios {
            check_non_negative(name, value)?;
            if value > 1.0 {
                anyhow::bail!("{} must be within 0..=1, got {}", name, value);
            }
        }

        if teleport.pad_size <= 0.0 {
            anyhow::bail!("teleport.pad_size must be positive, got {}", teleport.pad_size);
        }
        Ok(())
    }
}

fn check_non_negative(name: &str, value: f64) -> LoadResult<()> {
    if !value.is_finite() {
        anyhow::bail!("{} must be finite, got {}", name, value);
    }
    if value < 0.0 {
        anyhow::bail!("{} must not be negative, got {}", name, value);
    }
    Ok(())
}
