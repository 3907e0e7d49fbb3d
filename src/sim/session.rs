//! Session registry
//!
//! Owns every live entity collection, the recycling pools and the run
//! counters. Mutation entry points (`reset`, `game_over`, `add_score`,
//! `remove_enemy`, `remove_bullet`, ...) keep the invariants in one place:
//! an entity always leaves its active collection before it is recycled, and
//! the terminal flag is raised at most once per run.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::animation::{Animation, AnimationUpdate};
use super::bounds::Bounds;
use super::bullet::{Bullet, BulletInit, BulletOwner};
use super::enemy::{Enemy, EnemyInit, EnemyKind, HitOutcome};
use super::player::Player;
use super::pool::{Pool, PoolTag};
use crate::tuning::Tuning;

/// Identity of an enemy, bullet or animation for one use
///
/// A recycled object is given a new id every time it is initialised.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct EntityId(pub u32);

/// Things that happened during a tick, drained by the host
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    EnemySpawned { id: EntityId, kind: EnemyKind },
    ShotFired { id: EntityId, owner: BulletOwner },
    EnemyDestroyed { id: EntityId, kind: EnemyKind, score: u32 },
    /// An enemy crossed the bottom edge; ends the run
    EnemyEscaped { id: EntityId },
    PlayerHit { lives: u32 },
    ComboBonus { combo: u32, bonus: u32 },
    AnimationFinished { id: EntityId },
    GameOver { score: u64 },
}

/// One typed pool per pooled entity kind
#[derive(Debug, Default)]
pub struct Pools {
    pub enemies: Pool<Enemy>,
    pub bullets: Pool<Bullet>,
}

/// Live state of a run
#[derive(Debug)]
pub struct Session {
    pub tuning: Tuning,
    pub player: Player,
    /// Active enemies in registration order
    pub enemies: Vec<Enemy>,
    /// Active bullets of both owners
    pub bullets: Vec<Bullet>,
    /// Active animations
    pub animations: Vec<Animation>,
    /// Recycled objects; kept across restarts
    pub pools: Pools,
    pub score: u64,
    /// Best score seen by this session object; kept across restarts
    pub high_score: u64,
    pub lives: u32,
    /// Consecutive combo-eligible kills since the last player hit
    pub combo: u32,
    pub is_game_over: bool,
    /// Ticks since the last reset
    pub frame: u64,
    /// Host timestamp of the tick being processed
    pub now_ms: u64,
    /// Timestamp of the last enemy spawn
    pub last_spawn_ms: u64,
    events: Vec<GameEvent>,
    rng: Pcg32,
    next_id: u32,
}

impl Session {
    /// Create a session with a seeded RNG, pre-warmed pools and a fresh run
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        let player = Player::new(&tuning);
        let lives = tuning.player.lives;

        let mut pools = Pools::default();
        pools
            .enemies
            .pre_warm(PoolTag::Enemy, Enemy::new, tuning.pool.enemies);
        for owner in [BulletOwner::Player, BulletOwner::Enemy] {
            pools
                .bullets
                .pre_warm(owner.pool_tag(), Bullet::new, tuning.pool.bullets);
        }

        Self {
            tuning,
            player,
            enemies: Vec::new(),
            bullets: Vec::new(),
            animations: Vec::new(),
            pools,
            score: 0,
            high_score: 0,
            lives,
            combo: 0,
            is_game_over: false,
            frame: 0,
            now_ms: 0,
            last_spawn_ms: 0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> EntityId {
        let id = EntityId(self.next_id);
        // 0 is the id of a blank, never-initialised entity
        self.next_id = self.next_id.wrapping_add(1).max(1);
        id
    }

    /// Start a new run
    ///
    /// Live entities are dropped rather than recycled; pooled entities,
    /// the high score and the RNG stream carry over.
    pub fn reset(&mut self, now_ms: u64) {
        self.enemies.clear();
        self.bullets.clear();
        self.animations.clear();
        self.events.clear();
        self.score = 0;
        self.combo = 0;
        self.frame = 0;
        self.lives = self.tuning.player.lives;
        self.is_game_over = false;
        self.now_ms = now_ms;
        self.last_spawn_ms = now_ms;
        self.player.reset(&self.tuning, now_ms);
        log::info!("Session reset (pools: {:?})", self.pool_stats());
    }

    /// Raise the terminal flag (idempotent)
    pub fn game_over(&mut self) {
        if self.is_game_over {
            return;
        }
        self.is_game_over = true;
        self.high_score = self.high_score.max(self.score);
        log::info!(
            "Game over at frame {}: score {}, high score {}",
            self.frame,
            self.score,
            self.high_score
        );
        self.events.push(GameEvent::GameOver { score: self.score });
    }

    /// Award points; combo-eligible awards advance the combo streak
    ///
    /// Every `combo_threshold` consecutive eligible awards add
    /// `combo_bonus` on top.
    pub fn add_score(&mut self, value: u64, combo_eligible: bool) {
        self.score += value;

        if combo_eligible {
            self.combo += 1;
            let scoring = self.tuning.scoring;
            if scoring.combo_threshold > 0 && self.combo % scoring.combo_threshold == 0 {
                self.score += u64::from(scoring.combo_bonus);
                log::debug!("Combo x{} bonus {}", self.combo, scoring.combo_bonus);
                self.events.push(GameEvent::ComboBonus {
                    combo: self.combo,
                    bonus: scoring.combo_bonus,
                });
            }
        }

        self.high_score = self.high_score.max(self.score);
    }

    /// Take one life from the player and break the combo
    pub fn damage_player(&mut self) {
        if self.lives == 0 {
            return;
        }
        self.lives -= 1;
        self.combo = 0;
        self.events.push(GameEvent::PlayerHit { lives: self.lives });
        if self.lives == 0 {
            self.game_over();
        }
    }

    pub fn enemy(&self, id: EntityId) -> Option<&Enemy> {
        self.enemies.iter().find(|e| e.id == id)
    }

    pub fn bullet(&self, id: EntityId) -> Option<&Bullet> {
        self.bullets.iter().find(|b| b.id == id)
    }

    pub fn animation(&self, id: EntityId) -> Option<&Animation> {
        self.animations.iter().find(|a| a.id == id)
    }

    /// Pull an enemy from the pool (or build one) and register it
    pub fn spawn_enemy(&mut self, kind: EnemyKind) -> EntityId {
        let id = self.next_entity_id();
        let enemy = self.pools.enemies.get_item_with_factory(
            PoolTag::Enemy,
            Enemy::new,
            EnemyInit {
                id,
                kind,
                tuning: &self.tuning,
                rng: &mut self.rng,
            },
        );
        log::debug!("Spawned {:?} enemy {:?} at x={:.1}", kind, id, enemy.bounds.x);
        self.enemies.push(enemy);
        self.events.push(GameEvent::EnemySpawned { id, kind });
        id
    }

    /// Spawn an enemy whose kind is drawn from the spawn weights
    pub fn spawn_random_enemy(&mut self) -> EntityId {
        let roll = self.rng.random::<f32>();
        let kind = self.tuning.spawn.kind_for_roll(roll);
        self.spawn_enemy(kind)
    }

    /// Pull a bullet from its owner's pool and register it
    pub fn fire_bullet(&mut self, owner: BulletOwner, x: f32, y: f32) -> EntityId {
        let id = self.next_entity_id();
        let speed = match owner {
            BulletOwner::Player => self.tuning.player.bullet_speed,
            BulletOwner::Enemy => self.tuning.enemy.bullet_speed,
        };
        let bullet = self.pools.bullets.get_item_with_factory(
            owner.pool_tag(),
            Bullet::new,
            BulletInit {
                id,
                owner,
                x,
                y,
                width: self.tuning.bullet.width,
                height: self.tuning.bullet.height,
                speed,
            },
        );
        self.bullets.push(bullet);
        self.events.push(GameEvent::ShotFired { id, owner });
        id
    }

    /// Build an explosion over `area`, start it and register it
    pub fn spawn_explosion(&mut self, area: Bounds) -> EntityId {
        let id = self.next_entity_id();
        let animation = Animation::explosion(id, area, &self.tuning.explosion);
        self.animations.push(animation);
        id
    }

    /// Deregister an enemy and return it to the pool
    pub fn remove_enemy(&mut self, id: EntityId) -> bool {
        let Some(index) = self.enemies.iter().position(|e| e.id == id) else {
            return false;
        };
        let enemy = self.enemies.remove(index);
        self.pools.enemies.recover(PoolTag::Enemy, enemy);
        true
    }

    /// Deregister a bullet and return it to its owner's pool
    pub fn remove_bullet(&mut self, id: EntityId) -> bool {
        let Some(index) = self.bullets.iter().position(|b| b.id == id) else {
            return false;
        };
        let bullet = self.bullets.remove(index);
        self.pools.bullets.recover(bullet.owner.pool_tag(), bullet);
        true
    }

    /// Deregister and destroy an animation
    pub fn remove_animation(&mut self, id: EntityId) -> bool {
        let Some(index) = self.animations.iter().position(|a| a.id == id) else {
            return false;
        };
        let mut animation = self.animations.remove(index);
        animation.destroy();
        true
    }

    /// Damage an enemy; on destruction spawn an explosion, score it and
    /// recycle it
    ///
    /// Returns `None` if the enemy is not active.
    pub fn hit_enemy(&mut self, id: EntityId) -> Option<HitOutcome> {
        let enemy = self.enemies.iter_mut().find(|e| e.id == id)?;
        if enemy.hit() == HitOutcome::Survived {
            return Some(HitOutcome::Survived);
        }

        let (area, kind, score) = (enemy.bounds, enemy.kind, enemy.score_value);
        self.spawn_explosion(area);
        self.add_score(u64::from(score), true);
        self.remove_enemy(id);
        log::debug!("Destroyed {:?} enemy {:?} (+{})", kind, id, score);
        self.events.push(GameEvent::EnemyDestroyed { id, kind, score });
        Some(HitOutcome::Destroyed)
    }

    /// An enemy got past the defense line: recycle it and end the run
    pub fn escape_enemy(&mut self, id: EntityId) -> bool {
        if !self.remove_enemy(id) {
            return false;
        }
        log::debug!("Enemy {:?} reached the defense line", id);
        self.events.push(GameEvent::EnemyEscaped { id });
        self.game_over();
        true
    }

    /// Advance every animation and drop the ones that completed
    pub fn update_animations(&mut self) {
        let completed: Vec<EntityId> = self
            .animations
            .iter_mut()
            .filter_map(|a| (a.update() == AnimationUpdate::Completed).then_some(a.id))
            .collect();

        for id in completed {
            self.remove_animation(id);
            self.events.push(GameEvent::AnimationFinished { id });
        }
    }

    /// Events recorded since the last drain
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    pub fn pool_stats(&self) -> (Vec<(PoolTag, usize)>, Vec<(PoolTag, usize)>) {
        (self.pools.enemies.stats(), self.pools.bullets.stats())
    }
}
