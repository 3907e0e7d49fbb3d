//! Data-driven game balance
//!
//! Every number the simulation consults at spawn, update and hit time lives
//! here. The tables are read-only once a session starts; hosts may load an
//! override from JSON before constructing the game.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;
use crate::sim::EnemyKind;

/// Errors raised while loading or validating a tuning table
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("failed to parse tuning JSON: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid tuning value `{field}`: {reason}")]
    Invalid { field: &'static str, reason: String },
}

/// Playfield dimensions in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldTuning {
    pub width: f32,
    pub height: f32,
}

impl Default for FieldTuning {
    fn default() -> Self {
        Self {
            width: FIELD_WIDTH,
            height: FIELD_HEIGHT,
        }
    }
}

/// Player ship parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerTuning {
    pub width: f32,
    pub height: f32,
    /// Horizontal steering speed (pixels per tick)
    pub speed: f32,
    pub lives: u32,
    /// Auto-fire cadence
    pub shoot_interval_ms: u64,
    /// Upward bullet speed (pixels per tick)
    pub bullet_speed: f32,
}

impl Default for PlayerTuning {
    fn default() -> Self {
        Self {
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
            speed: 8.0,
            lives: PLAYER_LIVES,
            shoot_interval_ms: 200,
            bullet_speed: 10.0,
        }
    }
}

/// Stats for one enemy kind
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EnemyStats {
    pub health: i32,
    /// Downward speed (pixels per tick)
    pub speed: f32,
    pub score: u32,
    pub width: f32,
    pub height: f32,
}

/// Per-kind enemy stat table plus shared firing parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnemyTuning {
    pub small: EnemyStats,
    pub medium: EnemyStats,
    pub boss: EnemyStats,
    /// Shot cadence for shooting kinds other than the boss
    pub shoot_interval_ms: u64,
    pub boss_shoot_interval_ms: u64,
    /// Downward bullet speed (pixels per tick)
    pub bullet_speed: f32,
}

impl Default for EnemyTuning {
    fn default() -> Self {
        Self {
            small: EnemyStats {
                health: 1,
                speed: 3.0,
                score: 100,
                width: 60.0,
                height: 45.0,
            },
            medium: EnemyStats {
                health: 3,
                speed: 2.0,
                score: 300,
                width: 80.0,
                height: 60.0,
            },
            boss: EnemyStats {
                health: 10,
                speed: 1.0,
                score: 1000,
                width: 140.0,
                height: 100.0,
            },
            shoot_interval_ms: 1500,
            boss_shoot_interval_ms: 800,
            bullet_speed: 5.0,
        }
    }
}

impl EnemyTuning {
    /// Stat row for a kind
    pub fn stats(&self, kind: EnemyKind) -> &EnemyStats {
        match kind {
            EnemyKind::Small => &self.small,
            EnemyKind::Medium => &self.medium,
            EnemyKind::Boss => &self.boss,
        }
    }

    /// Shot cadence for a kind (the weakest kind never fires)
    pub fn shoot_interval_ms(&self, kind: EnemyKind) -> u64 {
        match kind {
            EnemyKind::Boss => self.boss_shoot_interval_ms,
            EnemyKind::Small | EnemyKind::Medium => self.shoot_interval_ms,
        }
    }
}

/// Enemy spawn cadence and kind weighting
///
/// A uniform roll below `small_threshold` spawns a small enemy, below
/// `medium_threshold` a medium one, otherwise a boss.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpawnTuning {
    pub interval_ms: u64,
    pub small_threshold: f32,
    pub medium_threshold: f32,
}

impl Default for SpawnTuning {
    fn default() -> Self {
        Self {
            interval_ms: 1000,
            small_threshold: 0.7,
            medium_threshold: 0.9,
        }
    }
}

impl SpawnTuning {
    /// Map a uniform roll in `[0, 1)` to an enemy kind
    pub fn kind_for_roll(&self, roll: f32) -> EnemyKind {
        if roll < self.small_threshold {
            EnemyKind::Small
        } else if roll < self.medium_threshold {
            EnemyKind::Medium
        } else {
            EnemyKind::Boss
        }
    }
}

/// Combo scoring parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringTuning {
    /// Consecutive kills needed per bonus (0 disables the bonus)
    pub combo_threshold: u32,
    pub combo_bonus: u32,
}

impl Default for ScoringTuning {
    fn default() -> Self {
        Self {
            combo_threshold: 5,
            combo_bonus: 500,
        }
    }
}

/// Bullet sprite size
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BulletTuning {
    pub width: f32,
    pub height: f32,
}

impl Default for BulletTuning {
    fn default() -> Self {
        Self {
            width: BULLET_WIDTH,
            height: BULLET_HEIGHT,
        }
    }
}

/// Explosion effect shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplosionTuning {
    pub frames: u32,
    pub frame_ticks: u32,
}

impl Default for ExplosionTuning {
    fn default() -> Self {
        Self {
            frames: EXPLOSION_FRAMES,
            frame_ticks: EXPLOSION_FRAME_TICKS,
        }
    }
}

/// Objects parked in each pool bucket when a session is built
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PoolTuning {
    pub enemies: usize,
    /// Per owner
    pub bullets: usize,
}

impl Default for PoolTuning {
    fn default() -> Self {
        Self {
            enemies: POOL_PREWARM_ENEMIES,
            bullets: POOL_PREWARM_BULLETS,
        }
    }
}

/// Complete balance table
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    pub field: FieldTuning,
    pub player: PlayerTuning,
    pub enemy: EnemyTuning,
    pub spawn: SpawnTuning,
    pub scoring: ScoringTuning,
    pub bullet: BulletTuning,
    pub explosion: ExplosionTuning,
    pub pool: PoolTuning,
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate it
    ///
    /// Missing sections fall back to the shipped defaults.
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        log::info!(
            "Loaded tuning: field {}x{}, spawn every {} ms",
            tuning.field.width,
            tuning.field.height,
            tuning.spawn.interval_ms
        );
        Ok(tuning)
    }

    /// Serialize to pretty JSON (for shipping an editable table)
    pub fn to_json(&self) -> Result<String, TuningError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Check the invariants the simulation relies on
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.field.width <= 0.0 || self.field.height <= 0.0 {
            return Err(invalid("field", "dimensions must be positive"));
        }
        if self.player.width > self.field.width {
            return Err(invalid("player.width", "wider than the field"));
        }
        if self.player.lives == 0 {
            return Err(invalid("player.lives", "must be at least 1"));
        }
        for kind in EnemyKind::ALL {
            let stats = self.enemy.stats(kind);
            if stats.health < 1 {
                return Err(invalid("enemy.health", format!("{kind:?} needs at least 1")));
            }
            if stats.width <= 0.0 || stats.height <= 0.0 {
                return Err(invalid("enemy.size", format!("{kind:?} must be positive")));
            }
            if stats.width > self.field.width {
                return Err(invalid("enemy.width", format!("{kind:?} wider than the field")));
            }
        }
        let spawn = &self.spawn;
        if !(0.0..=1.0).contains(&spawn.small_threshold)
            || !(0.0..=1.0).contains(&spawn.medium_threshold)
            || spawn.small_threshold > spawn.medium_threshold
        {
            return Err(invalid(
                "spawn.thresholds",
                "need 0 <= small_threshold <= medium_threshold <= 1",
            ));
        }
        if self.explosion.frames == 0 {
            return Err(invalid("explosion.frames", "must be at least 1"));
        }
        Ok(())
    }
}

fn invalid(field: &'static str, reason: impl Into<String>) -> TuningError {
    TuningError::Invalid {
        field,
        reason: reason.into(),
    }
}
