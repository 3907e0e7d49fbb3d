//! Hostile ships
//!
//! Enemies fall straight down at a per-kind speed. Shooting kinds fire on a
//! fixed cadence. `update` and `hit` only report what happened; the session
//! applies the consequences (recycling, scoring, explosions, game over).

use rand::Rng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::bounds::Bounds;
use super::pool::Recyclable;
use super::session::EntityId;
use crate::tuning::Tuning;

/// Enemy archetypes, weakest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnemyKind {
    Small,
    Medium,
    Boss,
}

impl EnemyKind {
    pub const ALL: [EnemyKind; 3] = [EnemyKind::Small, EnemyKind::Medium, EnemyKind::Boss];

    /// Only the weakest kind is unarmed
    pub fn can_shoot(&self) -> bool {
        *self != EnemyKind::Small
    }
}

/// What an enemy did during its update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnemyAction {
    None,
    /// Passed the bottom edge undestroyed
    Escaped,
    /// Fired a bullet whose top-left corner is at (x, y)
    Fire { x: f32, y: f32 },
}

/// Result of taking one hit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    Survived,
    Destroyed,
}

/// Arguments for bringing a pooled enemy into play
pub struct EnemyInit<'a> {
    pub id: EntityId,
    pub kind: EnemyKind,
    pub tuning: &'a Tuning,
    pub rng: &'a mut Pcg32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Enemy {
    pub id: EntityId,
    pub bounds: Bounds,
    pub kind: EnemyKind,
    pub health: i32,
    pub max_health: i32,
    pub speed: f32,
    pub score_value: u32,
    pub can_shoot: bool,
    /// Time of the last shot; `None` until the first one
    pub last_shot_ms: Option<u64>,
    pub shoot_interval_ms: u64,
}

impl Default for Enemy {
    fn default() -> Self {
        Self::new()
    }
}

impl Enemy {
    /// Blank, hidden enemy; call `init` before use
    pub fn new() -> Self {
        Self {
            id: EntityId::default(),
            bounds: Bounds::default(),
            kind: EnemyKind::Small,
            health: 0,
            max_health: 0,
            speed: 0.0,
            score_value: 0,
            can_shoot: false,
            last_shot_ms: None,
            shoot_interval_ms: 0,
        }
    }

    /// Fall one tick and maybe fire
    pub fn update(&mut self, now_ms: u64, tuning: &Tuning) -> EnemyAction {
        if !self.bounds.visible {
            return EnemyAction::None;
        }

        self.bounds.y += self.speed;

        if self.bounds.y > tuning.field.height + self.bounds.height {
            return EnemyAction::Escaped;
        }

        if !self.can_shoot {
            return EnemyAction::None;
        }
        let cooling = self
            .last_shot_ms
            .is_some_and(|last| now_ms.saturating_sub(last) < self.shoot_interval_ms);
        if cooling {
            return EnemyAction::None;
        }

        self.last_shot_ms = Some(now_ms);
        EnemyAction::Fire {
            x: self.bounds.center().x - tuning.bullet.width / 2.0,
            y: self.bounds.bottom(),
        }
    }

    /// Take one point of damage
    pub fn hit(&mut self) -> HitOutcome {
        self.health -= 1;
        if self.health <= 0 {
            HitOutcome::Destroyed
        } else {
            HitOutcome::Survived
        }
    }

    /// Remaining health as a fraction of the maximum
    pub fn health_fraction(&self) -> f32 {
        if self.max_health <= 0 {
            return 0.0;
        }
        (self.health.max(0) as f32 / self.max_health as f32).clamp(0.0, 1.0)
    }
}

impl Recyclable for Enemy {
    type Init<'a> = EnemyInit<'a>;

    fn init(&mut self, args: EnemyInit<'_>) {
        let stats = args.tuning.enemy.stats(args.kind);

        self.id = args.id;
        self.kind = args.kind;
        self.health = stats.health;
        self.max_health = stats.health;
        self.speed = stats.speed;
        self.score_value = stats.score;
        self.can_shoot = args.kind.can_shoot();
        self.shoot_interval_ms = args.tuning.enemy.shoot_interval_ms(args.kind);
        self.last_shot_ms = None;

        let x = args.rng.random::<f32>() * (args.tuning.field.width - stats.width);
        self.bounds = Bounds::new(x, -stats.height, stats.width, stats.height);
    }

    fn destroy(&mut self) {
        self.bounds.visible = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    fn spawn(kind: EnemyKind, tuning: &Tuning) -> Enemy {
        let mut rng = Pcg32::seed_from_u64(7);
        let mut enemy = Enemy::new();
        enemy.init(EnemyInit {
            id: EntityId(1),
            kind,
            tuning,
            rng: &mut rng,
        });
        enemy
    }

    #[test]
    fn test_init_applies_stat_table() {
        let tuning = Tuning::default();
        for kind in EnemyKind::ALL {
            let enemy = spawn(kind, &tuning);
            let stats = tuning.enemy.stats(kind);
            assert_eq!(enemy.health, stats.health);
            assert_eq!(enemy.max_health, stats.health);
            assert_eq!(enemy.score_value, stats.score);
            assert_eq!(enemy.bounds.width, stats.width);
            assert_eq!(enemy.bounds.y, -stats.height);
            assert!(enemy.bounds.visible);
            assert!(enemy.bounds.x >= 0.0);
            assert!(enemy.bounds.right() <= tuning.field.width);
            assert_eq!(enemy.can_shoot, kind != EnemyKind::Small);
        }
        assert_eq!(spawn(EnemyKind::Boss, &tuning).shoot_interval_ms, 800);
        assert_eq!(spawn(EnemyKind::Medium, &tuning).shoot_interval_ms, 1500);
    }

    #[test]
    fn test_reinit_clears_previous_use() {
        let tuning = Tuning::default();
        let mut enemy = spawn(EnemyKind::Boss, &tuning);
        enemy.hit();
        enemy.hit();
        enemy.bounds.y = 400.0;
        enemy.update(3000, &tuning);
        assert_eq!(enemy.last_shot_ms, Some(3000));
        enemy.destroy();

        let mut rng = Pcg32::seed_from_u64(1);
        enemy.init(EnemyInit {
            id: EntityId(2),
            kind: EnemyKind::Medium,
            tuning: &tuning,
            rng: &mut rng,
        });
        assert_eq!(enemy.id, EntityId(2));
        assert_eq!(enemy.health, tuning.enemy.medium.health);
        assert_eq!(enemy.last_shot_ms, None);
        assert_eq!(enemy.bounds.y, -tuning.enemy.medium.height);
        assert!(enemy.bounds.visible);
    }

    #[test]
    fn test_hidden_enemy_is_inert() {
        let tuning = Tuning::default();
        let mut enemy = spawn(EnemyKind::Boss, &tuning);
        enemy.destroy();
        let y = enemy.bounds.y;
        assert_eq!(enemy.update(10_000, &tuning), EnemyAction::None);
        assert_eq!(enemy.bounds.y, y);
    }

    #[test]
    fn test_escape_checked_before_shooting() {
        let tuning = Tuning::default();
        let mut enemy = spawn(EnemyKind::Boss, &tuning);
        enemy.bounds.y = tuning.field.height + enemy.bounds.height;
        assert_eq!(enemy.update(100_000, &tuning), EnemyAction::Escaped);
    }

    #[test]
    fn test_fire_cadence() {
        let tuning = Tuning::default();
        let mut enemy = spawn(EnemyKind::Medium, &tuning);
        assert_eq!(enemy.update(1000, &tuning), EnemyAction::None);
        assert_eq!(enemy.update(2499, &tuning), EnemyAction::None);

        match enemy.update(2500, &tuning) {
            EnemyAction::Fire { x, y } => {
                assert_eq!(x, enemy.bounds.center().x - tuning.bullet.width / 2.0);
                assert_eq!(y, enemy.bounds.bottom());
            }
            other => panic!("expected a shot, got {other:?}"),
        }
        assert_eq!(enemy.update(2600, &tuning), EnemyAction::None);
    }

    #[test]
    fn test_armed_enemy_fires_on_first_update() {
        let tuning = Tuning::default();
        let mut boss = spawn(EnemyKind::Boss, &tuning);
        assert!(matches!(boss.update(5016, &tuning), EnemyAction::Fire { .. }));
        assert_eq!(boss.last_shot_ms, Some(5016));
        assert_eq!(boss.update(5816 - 1, &tuning), EnemyAction::None);
        assert!(matches!(boss.update(5816, &tuning), EnemyAction::Fire { .. }));
    }

    #[test]
    fn test_small_enemy_never_fires() {
        let tuning = Tuning::default();
        let mut enemy = spawn(EnemyKind::Small, &tuning);
        for t in 0..50 {
            assert_eq!(enemy.update(t * 1000, &tuning), EnemyAction::None);
        }
    }

    #[test]
    fn test_hit_until_destroyed() {
        let tuning = Tuning::default();
        let mut enemy = spawn(EnemyKind::Medium, &tuning);
        assert_eq!(enemy.hit(), HitOutcome::Survived);
        assert_eq!(enemy.hit(), HitOutcome::Survived);
        assert!((enemy.health_fraction() - 1.0 / 3.0).abs() < 1e-6);
        assert_eq!(enemy.hit(), HitOutcome::Destroyed);
        assert_eq!(enemy.health_fraction(), 0.0);
    }

    #[test]
    fn test_overkill_still_reports_destroyed() {
        let mut enemy = Enemy::new();
        enemy.health = -3;
        assert_eq!(enemy.hit(), HitOutcome::Destroyed);
    }
}
