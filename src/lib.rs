//! Air Raid - a fixed-viewport vertical arcade shooter
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, pooling, animation, tick loop)
//! - `tuning`: Data-driven game balance
//! - `settings`: Player preferences (volumes, mute)
//! - `audio`: Sound cue collaborator and volume management
//! - `render`: Drawing collaborator and per-tick render pass

pub mod audio;
pub mod render;
pub mod settings;
pub mod sim;
pub mod tuning;

pub use settings::Settings;
pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Host frame step used by the headless driver (~60 Hz)
    pub const FRAME_MS: u64 = 16;

    /// Field dimensions (portrait phone canvas)
    pub const FIELD_WIDTH: f32 = 375.0;
    pub const FIELD_HEIGHT: f32 = 667.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 80.0;
    pub const PLAYER_HEIGHT: f32 = 80.0;
    pub const PLAYER_LIVES: u32 = 3;
    /// Gap between the player sprite and the bottom edge
    pub const PLAYER_BOTTOM_MARGIN: f32 = 30.0;

    /// Bullet sprite size (shared by both owners)
    pub const BULLET_WIDTH: f32 = 4.0;
    pub const BULLET_HEIGHT: f32 = 8.0;

    /// Explosion effect: frame count and ticks per frame
    pub const EXPLOSION_FRAMES: u32 = 19;
    pub const EXPLOSION_FRAME_TICKS: u32 = 2;

    /// Pool buckets filled at session construction
    pub const POOL_PREWARM_ENEMIES: usize = 8;
    pub const POOL_PREWARM_BULLETS: usize = 24;
}

/// Image handles for every sprite the simulation draws
pub mod assets {
    pub const PLAYER_IMAGE: &str = "images/hero.png";
    pub const ENEMY_IMAGE: &str = "images/enemy.png";
    pub const BULLET_IMAGE: &str = "images/bullet.png";

    /// Path of the `index`-th explosion frame (1-based)
    pub fn explosion_frame(index: u32) -> String {
        format!("images/explosion{index}.png")
    }
}
