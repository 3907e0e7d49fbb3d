//! Projectiles
//!
//! One bullet type for both sides; `owner` decides travel direction and
//! which collision pass the bullet takes part in.

use serde::{Deserialize, Serialize};

use super::bounds::Bounds;
use super::pool::{PoolTag, Recyclable};
use super::session::EntityId;

/// Who fired a bullet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BulletOwner {
    Player,
    Enemy,
}

impl BulletOwner {
    /// Pool bucket for this side's bullets
    pub fn pool_tag(&self) -> PoolTag {
        match self {
            BulletOwner::Player => PoolTag::PlayerBullet,
            BulletOwner::Enemy => PoolTag::EnemyBullet,
        }
    }

    /// Vertical direction of travel (screen y grows downward)
    pub fn direction(&self) -> f32 {
        match self {
            BulletOwner::Player => -1.0,
            BulletOwner::Enemy => 1.0,
        }
    }
}

/// Arguments for bringing a pooled bullet into play
#[derive(Debug, Clone, Copy)]
pub struct BulletInit {
    pub id: EntityId,
    pub owner: BulletOwner,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub speed: f32,
}

/// Result of a single `update`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BulletUpdate {
    InFlight,
    /// Left the field; the session should recycle it
    OffField,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bullet {
    pub id: EntityId,
    pub bounds: Bounds,
    pub speed: f32,
    pub owner: BulletOwner,
}

impl Default for Bullet {
    fn default() -> Self {
        Self::new()
    }
}

impl Bullet {
    /// Blank, hidden bullet; call `init` before use
    pub fn new() -> Self {
        Self {
            id: EntityId::default(),
            bounds: Bounds::default(),
            speed: 0.0,
            owner: BulletOwner::Player,
        }
    }

    pub fn update(&mut self, field_height: f32) -> BulletUpdate {
        if !self.bounds.visible {
            return BulletUpdate::InFlight;
        }

        self.bounds.y += self.speed * self.owner.direction();

        let off_field = match self.owner {
            BulletOwner::Player => self.bounds.y < -self.bounds.height,
            BulletOwner::Enemy => self.bounds.y > field_height + self.bounds.height,
        };
        if off_field {
            self.bounds.visible = false;
            BulletUpdate::OffField
        } else {
            BulletUpdate::InFlight
        }
    }
}

impl Recyclable for Bullet {
    type Init<'a> = BulletInit;

    fn init(&mut self, args: BulletInit) {
        self.id = args.id;
        self.owner = args.owner;
        self.speed = args.speed;
        self.bounds = Bounds::new(args.x, args.y, args.width, args.height);
    }

    fn destroy(&mut self) {
        self.bounds.visible = false;
    }
}
