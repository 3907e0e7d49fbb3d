//! Per-frame simulation step and the game loop driver
//!
//! `tick` advances a session by one step in a fixed order:
//! spawn-if-due, update pass, collision pass, frame counter. `Game` wraps it
//! with the host collaborators: it plays the audio cues the step produced,
//! renders, and asks the scheduler for the next frame until the run ends.

use super::bullet::{BulletOwner, BulletUpdate};
use super::enemy::{EnemyAction, HitOutcome};
use super::session::{EntityId, GameEvent, Session};
use crate::audio::{AudioManager, AudioSink};
use crate::render::{Renderer, SpriteSet, render_session};

/// Host capability to run another frame later
///
/// Not requesting is how the loop stops.
pub trait TickScheduler {
    fn request_tick(&mut self);
}

/// Scheduler for hosts that pump frames themselves (headless runs, tests)
#[derive(Debug, Default, Clone)]
pub struct ManualScheduler {
    pending: bool,
    requests: u64,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consume the outstanding request, if any
    pub fn take_request(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Requests made over the scheduler's lifetime
    pub fn total_requests(&self) -> u64 {
        self.requests
    }
}

impl TickScheduler for ManualScheduler {
    fn request_tick(&mut self) {
        self.pending = true;
        self.requests += 1;
    }
}

/// Input commands for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    /// Latest pointer/touch x position, if the pointer moved
    pub pointer_x: Option<f32>,
}

/// Audio cues produced by a step
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickCues {
    pub shots: u32,
    pub explosions: u32,
}

/// Advance the session by one step at host time `now_ms`
///
/// A session that is already over only advances its frame counter.
/// Events accumulate on the session until `Session::drain_events` (which
/// `Game::on_frame` calls every frame) or the next `reset`; hosts calling
/// `tick` directly drain them themselves.
pub fn tick(session: &mut Session, input: &TickInput, now_ms: u64) -> TickCues {
    let mut cues = TickCues::default();
    session.now_ms = now_ms;

    if !session.is_game_over {
        if let Some(x) = input.pointer_x {
            session.player.steer(x);
        }
        spawn_if_due(session);
        update_pass(session, &mut cues);
        collision_pass(session, &mut cues);
    }

    session.frame += 1;
    cues
}

/// Spawn one weighted-random enemy when the spawn interval has elapsed
pub fn spawn_if_due(session: &mut Session) -> Option<EntityId> {
    let elapsed = session.now_ms.saturating_sub(session.last_spawn_ms);
    if elapsed < session.tuning.spawn.interval_ms {
        return None;
    }
    session.last_spawn_ms = session.now_ms;
    Some(session.spawn_random_enemy())
}

/// Update the player, then bullets, then enemies, then animations
pub fn update_pass(session: &mut Session, cues: &mut TickCues) {
    let now = session.now_ms;

    if let Some((x, y)) = session.player.update(now, &session.tuning) {
        session.fire_bullet(BulletOwner::Player, x, y);
        cues.shots += 1;
    }

    let field_height = session.tuning.field.height;
    let spent: Vec<EntityId> = session
        .bullets
        .iter_mut()
        .filter_map(|b| (b.update(field_height) == BulletUpdate::OffField).then_some(b.id))
        .collect();
    for id in spent {
        session.remove_bullet(id);
    }

    let actions: Vec<(EntityId, EnemyAction)> = session
        .enemies
        .iter_mut()
        .map(|e| (e.id, e.update(now, &session.tuning)))
        .filter(|(_, action)| *action != EnemyAction::None)
        .collect();
    for (id, action) in actions {
        match action {
            EnemyAction::Escaped => {
                session.escape_enemy(id);
            }
            EnemyAction::Fire { x, y } => {
                session.fire_bullet(BulletOwner::Enemy, x, y);
            }
            EnemyAction::None => {}
        }
    }

    session.update_animations();
}

/// Resolve bullet and body collisions
///
/// Order: player bullets against enemies (each bullet stops at the first
/// enemy it overlaps, in registration order), enemy bullets against the
/// player (at most one hit per step), then every enemy body against the
/// player (all overlaps count).
pub fn collision_pass(session: &mut Session, cues: &mut TickCues) {
    let (player_bullets, enemy_bullets): (Vec<_>, Vec<_>) = session
        .bullets
        .iter()
        .map(|b| (b.id, b.owner))
        .partition(|(_, owner)| *owner == BulletOwner::Player);

    for (bullet_id, _) in player_bullets {
        let Some(bullet) = session.bullet(bullet_id).map(|b| b.bounds) else {
            continue;
        };
        let target = session
            .enemies
            .iter()
            .find(|e| bullet.collides_with(&e.bounds))
            .map(|e| e.id);

        if let Some(enemy_id) = target {
            session.remove_bullet(bullet_id);
            if session.hit_enemy(enemy_id) == Some(HitOutcome::Destroyed) {
                cues.explosions += 1;
            }
        }
    }

    let player = session.player.bounds;
    for (bullet_id, _) in enemy_bullets {
        let hit = session
            .bullet(bullet_id)
            .is_some_and(|b| b.bounds.collides_with(&player));
        if hit {
            session.remove_bullet(bullet_id);
            session.damage_player();
            cues.explosions += 1;
            break;
        }
    }

    let rammers: Vec<EntityId> = session
        .enemies
        .iter()
        .filter(|e| e.bounds.collides_with(&player))
        .map(|e| e.id)
        .collect();
    for enemy_id in rammers {
        session.hit_enemy(enemy_id);
        session.damage_player();
        cues.explosions += 1;
    }
}

/// Game loop driver binding a session to its host collaborators
pub struct Game<S, R, A> {
    pub session: Session,
    scheduler: S,
    renderer: R,
    audio: AudioManager<A>,
    sprites: SpriteSet,
}

impl<S: TickScheduler, R: Renderer, A: AudioSink> Game<S, R, A> {
    pub fn new(session: Session, scheduler: S, renderer: R, audio: AudioManager<A>) -> Self {
        Self {
            session,
            scheduler,
            renderer,
            audio,
            sprites: SpriteSet::default(),
        }
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn audio(&self) -> &AudioManager<A> {
        &self.audio
    }

    pub fn audio_mut(&mut self) -> &mut AudioManager<A> {
        &mut self.audio
    }

    /// Start a fresh run and schedule its first frame
    pub fn restart(&mut self, now_ms: u64) {
        self.session.reset(now_ms);
        self.audio.play_bgm();
        self.scheduler.request_tick();
    }

    /// Pointer press from the host; restarts a finished run
    ///
    /// Returns whether a restart happened.
    pub fn pointer_pressed(&mut self, now_ms: u64) -> bool {
        if !self.session.is_game_over {
            return false;
        }
        log::info!("Restart requested");
        self.restart(now_ms);
        true
    }

    /// Host window shown/hidden
    pub fn set_host_visible(&mut self, visible: bool) {
        if visible {
            self.audio.resume_all();
        } else if self.audio.settings().mute_on_blur {
            self.audio.stop_all();
        }
    }

    /// Scheduled frame callback: step, play cues, render, continue
    ///
    /// Returns the events recorded during the frame.
    pub fn on_frame(&mut self, now_ms: u64, input: &TickInput) -> Vec<GameEvent> {
        let cues = tick(&mut self.session, input, now_ms);

        for _ in 0..cues.shots {
            self.audio.play_shot();
        }
        for _ in 0..cues.explosions {
            self.audio.play_explosion();
        }

        render_session(&self.session, &self.sprites, &mut self.renderer);

        if !self.session.is_game_over {
            self.scheduler.request_tick();
        }
        self.session.drain_events()
    }
}
