//! The player's ship
//!
//! The ship slides horizontally toward the last pointer position and fires
//! automatically. Lives are tracked by the session, not here.

use serde::{Deserialize, Serialize};

use super::bounds::Bounds;
use crate::consts::PLAYER_BOTTOM_MARGIN;
use crate::tuning::Tuning;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub bounds: Bounds,
    /// Max horizontal travel per tick
    pub speed: f32,
    pub shoot_interval_ms: u64,
    pub last_shot_ms: u64,
    /// Desired horizontal centre (from pointer input)
    pub target_x: Option<f32>,
}

impl Player {
    pub fn new(tuning: &Tuning) -> Self {
        let mut player = Self {
            bounds: Bounds::default(),
            speed: tuning.player.speed,
            shoot_interval_ms: tuning.player.shoot_interval_ms,
            last_shot_ms: 0,
            target_x: None,
        };
        player.reset(tuning, 0);
        player
    }

    /// Centre the ship above the bottom edge and restart the fire timer
    pub fn reset(&mut self, tuning: &Tuning, now_ms: u64) {
        let p = &tuning.player;
        self.bounds = Bounds::new(
            (tuning.field.width - p.width) / 2.0,
            tuning.field.height - p.height - PLAYER_BOTTOM_MARGIN,
            p.width,
            p.height,
        );
        self.speed = p.speed;
        self.shoot_interval_ms = p.shoot_interval_ms;
        self.last_shot_ms = now_ms;
        self.target_x = None;
    }

    /// Aim the ship's centre at a pointer x coordinate
    pub fn steer(&mut self, pointer_x: f32) {
        self.target_x = Some(pointer_x);
    }

    /// Move toward the target and return a bullet spawn point if the fire
    /// timer elapsed
    pub fn update(&mut self, now_ms: u64, tuning: &Tuning) -> Option<(f32, f32)> {
        if !self.bounds.visible {
            return None;
        }

        if let Some(target) = self.target_x {
            let delta = (target - self.bounds.center().x).clamp(-self.speed, self.speed);
            let max_x = (tuning.field.width - self.bounds.width).max(0.0);
            self.bounds.x = (self.bounds.x + delta).clamp(0.0, max_x);
        }

        if now_ms.saturating_sub(self.last_shot_ms) < self.shoot_interval_ms {
            return None;
        }
        self.last_shot_ms = now_ms;
        Some((
            self.bounds.center().x - tuning.bullet.width / 2.0,
            self.bounds.y - tuning.bullet.height,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_centred_near_bottom() {
        let tuning = Tuning::default();
        let player = Player::new(&tuning);
        assert!((player.bounds.center().x - tuning.field.width / 2.0).abs() < 1e-4);
        assert!(player.bounds.bottom() < tuning.field.height);
        assert!(player.bounds.visible);
    }

    #[test]
    fn test_steering_is_speed_limited() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let start = player.bounds.x;
        player.steer(0.0);
        player.update(0, &tuning);
        assert_eq!(player.bounds.x, start - tuning.player.speed);
    }

    #[test]
    fn test_steering_clamps_to_field() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        player.steer(-1000.0);
        for _ in 0..200 {
            player.update(0, &tuning);
        }
        assert_eq!(player.bounds.x, 0.0);

        player.steer(10_000.0);
        for _ in 0..200 {
            player.update(0, &tuning);
        }
        assert_eq!(player.bounds.right(), tuning.field.width);
    }

    #[test]
    fn test_auto_fire_cadence() {
        let tuning = Tuning::default();
        let mut player = Player::new(&tuning);
        let interval = tuning.player.shoot_interval_ms;
        assert!(player.update(interval - 1, &tuning).is_none());

        let (x, y) = player.update(interval, &tuning).unwrap();
        assert_eq!(x, player.bounds.center().x - tuning.bullet.width / 2.0);
        assert_eq!(y, player.bounds.y - tuning.bullet.height);
        assert!(player.update(interval + 1, &tuning).is_none());
    }
}
