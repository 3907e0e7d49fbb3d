//! Frame-sequence animation player
//!
//! An `Animation` steps through a list of image frames, holding each one for
//! its duration in ticks. Non-looping playback finishes on the last frame,
//! fires its completion hook and reports `Completed` so the session can
//! drop it from the active list.

use std::fmt;

use super::bounds::Bounds;
use super::session::EntityId;
use crate::assets;
use crate::render::ImageHandle;
use crate::tuning::ExplosionTuning;

/// One image held for `duration` ticks
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationFrame {
    pub image: ImageHandle,
    pub duration: u32,
}

/// Callback run each time non-looping playback reaches its end
pub type CompletionHook = Box<dyn FnMut()>;

/// Construction parameters
#[derive(Default)]
pub struct AnimationConfig {
    pub frames: Vec<AnimationFrame>,
    pub looping: bool,
    pub on_complete: Option<CompletionHook>,
}

/// Playback phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaybackState {
    Idle,
    Playing,
    Finished,
}

/// Result of a single `update`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationUpdate {
    /// Still playing, or inert
    Running,
    /// Non-looping playback ended on this tick
    Completed,
}

pub struct Animation {
    pub id: EntityId,
    pub bounds: Bounds,
    frames: Vec<AnimationFrame>,
    index: usize,
    tick_counter: u32,
    playing: bool,
    looping: bool,
    finished: bool,
    on_complete: Option<CompletionHook>,
}

impl fmt::Debug for Animation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Animation")
            .field("id", &self.id)
            .field("bounds", &self.bounds)
            .field("frames", &self.frames.len())
            .field("index", &self.index)
            .field("tick_counter", &self.tick_counter)
            .field("playing", &self.playing)
            .field("looping", &self.looping)
            .field("on_complete", &self.on_complete.is_some())
            .finish()
    }
}

impl Animation {
    pub fn new(id: EntityId, config: AnimationConfig) -> Self {
        let mut animation = Self {
            id,
            bounds: Bounds::default(),
            frames: Vec::new(),
            index: 0,
            tick_counter: 0,
            playing: false,
            looping: false,
            finished: false,
            on_complete: None,
        };
        animation.init(config);
        animation
    }

    /// Load a new frame list and rewind to an idle, visible state
    pub fn init(&mut self, config: AnimationConfig) {
        self.frames = config.frames;
        self.looping = config.looping;
        self.on_complete = config.on_complete;
        self.index = 0;
        self.tick_counter = 0;
        self.playing = false;
        self.finished = false;
        self.bounds.visible = true;
    }

    /// Build a one-shot explosion covering `area`, already playing
    pub fn explosion(id: EntityId, area: Bounds, tuning: &ExplosionTuning) -> Self {
        let frames = (1..=tuning.frames)
            .map(|i| AnimationFrame {
                image: ImageHandle::new(assets::explosion_frame(i)),
                duration: tuning.frame_ticks,
            })
            .collect();

        let mut animation = Self::new(
            id,
            AnimationConfig {
                frames,
                looping: false,
                on_complete: None,
            },
        );
        animation.bounds = Bounds { visible: true, ..area };
        animation.play(false);
        animation
    }

    /// Start from the first frame
    pub fn play(&mut self, looping: bool) {
        self.playing = true;
        self.finished = false;
        self.looping = looping;
        self.index = 0;
        self.tick_counter = 0;
    }

    /// Pause in place
    pub fn stop(&mut self) {
        self.playing = false;
    }

    /// Release frames and the hook, and hide
    pub fn destroy(&mut self) {
        self.stop();
        self.frames.clear();
        self.index = 0;
        self.on_complete = None;
        self.bounds.visible = false;
    }

    /// Advance one tick
    pub fn update(&mut self) -> AnimationUpdate {
        if !self.playing || self.frames.is_empty() {
            return AnimationUpdate::Running;
        }

        self.tick_counter += 1;
        if self.tick_counter < self.frames[self.index].duration {
            return AnimationUpdate::Running;
        }

        self.tick_counter = 0;
        self.index += 1;
        if self.index < self.frames.len() {
            return AnimationUpdate::Running;
        }

        if self.looping {
            self.index = 0;
            return AnimationUpdate::Running;
        }

        self.index = self.frames.len() - 1;
        self.playing = false;
        self.finished = true;
        if let Some(hook) = self.on_complete.as_mut() {
            hook();
        }
        AnimationUpdate::Completed
    }

    pub fn state(&self) -> PlaybackState {
        if self.playing {
            PlaybackState::Playing
        } else if self.finished {
            PlaybackState::Finished
        } else {
            PlaybackState::Idle
        }
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }

    pub fn is_looping(&self) -> bool {
        self.looping
    }

    pub fn current_index(&self) -> usize {
        self.index
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn current_frame(&self) -> Option<&AnimationFrame> {
        self.frames.get(self.index)
    }

    /// Scale every frame duration (larger = slower, never below one tick)
    pub fn set_speed(&mut self, factor: f32) {
        for frame in &mut self.frames {
            frame.duration = ((frame.duration as f32 * factor).floor() as u32).max(1);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    fn frames(durations: &[u32]) -> Vec<AnimationFrame> {
        durations
            .iter()
            .enumerate()
            .map(|(i, &duration)| AnimationFrame {
                image: ImageHandle::new(format!("frame{i}")),
                duration,
            })
            .collect()
    }

    fn counted(durations: &[u32], looping: bool) -> (Animation, Rc<Cell<u32>>) {
        let fired = Rc::new(Cell::new(0));
        let hook_count = Rc::clone(&fired);
        let animation = Animation::new(
            EntityId(1),
            AnimationConfig {
                frames: frames(durations),
                looping,
                on_complete: Some(Box::new(move || hook_count.set(hook_count.get() + 1))),
            },
        );
        (animation, fired)
    }

    #[test]
    fn test_new_animation_is_idle_and_inert() {
        let (mut anim, fired) = counted(&[1, 1], false);
        assert_eq!(anim.state(), PlaybackState::Idle);
        for _ in 0..5 {
            assert_eq!(anim.update(), AnimationUpdate::Running);
        }
        assert_eq!(anim.current_index(), 0);
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn test_frame_timing_and_single_completion() {
        let (mut anim, fired) = counted(&[2, 3], false);
        anim.play(false);

        anim.update();
        assert_eq!(anim.current_index(), 0);
        anim.update();
        assert_eq!(anim.current_index(), 1);

        anim.update();
        anim.update();
        assert!(anim.is_playing());
        assert_eq!(anim.update(), AnimationUpdate::Completed);

        assert!(!anim.is_playing());
        assert_eq!(anim.state(), PlaybackState::Finished);
        assert_eq!(anim.current_index(), 1);
        assert_eq!(fired.get(), 1);

        // Sixth tick: nothing moves, hook not re-run
        assert_eq!(anim.update(), AnimationUpdate::Running);
        assert_eq!(anim.current_index(), 1);
        assert_eq!(fired.get(), 1);
    }

    #[test]
    fn test_looping_never_finishes() {
        let (mut anim, fired) = counted(&[2, 3], false);
        anim.play(true);
        for _ in 0..100 {
            assert_eq!(anim.update(), AnimationUpdate::Running);
            assert!(anim.current_index() < anim.frame_count());
        }
        assert!(anim.is_playing());
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn test_stop_keeps_position() {
        let (mut anim, _) = counted(&[1, 1, 1], false);
        anim.play(false);
        anim.update();
        anim.stop();
        assert_eq!(anim.current_index(), 1);
        anim.update();
        assert_eq!(anim.current_index(), 1);
    }

    #[test]
    fn test_play_rewinds_finished_animation() {
        let (mut anim, _) = counted(&[1], false);
        anim.play(false);
        assert_eq!(anim.update(), AnimationUpdate::Completed);
        anim.play(false);
        assert_eq!(anim.state(), PlaybackState::Playing);
        assert_eq!(anim.current_index(), 0);
    }

    #[test]
    fn test_replay_fires_hook_again() {
        let (mut anim, fired) = counted(&[1, 2], false);
        for round in 1..=2 {
            anim.play(false);
            while anim.update() != AnimationUpdate::Completed {}
            assert_eq!(anim.state(), PlaybackState::Finished);
            assert_eq!(fired.get(), round);
        }
    }

    #[test]
    fn test_destroy_drops_frames_and_hook() {
        let (mut anim, fired) = counted(&[1], false);
        anim.play(false);
        anim.destroy();
        assert!(!anim.bounds.visible);
        assert_eq!(anim.frame_count(), 0);
        assert!(anim.current_frame().is_none());
        anim.play(false);
        assert_eq!(anim.update(), AnimationUpdate::Running);
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn test_set_speed_scales_durations() {
        let (mut anim, _) = counted(&[2, 3], false);
        anim.set_speed(2.0);
        anim.play(false);
        for _ in 0..3 {
            anim.update();
        }
        assert_eq!(anim.current_index(), 0);
        anim.update();
        assert_eq!(anim.current_index(), 1);

        anim.set_speed(0.1);
        assert_eq!(anim.current_frame().map(|f| f.duration), Some(1));
    }

    #[test]
    fn test_explosion_factory() {
        let tuning = ExplosionTuning::default();
        let area = Bounds::new(10.0, 20.0, 60.0, 45.0);
        let anim = Animation::explosion(EntityId(4), area, &tuning);
        assert!(anim.is_playing());
        assert!(!anim.is_looping());
        assert_eq!(anim.frame_count(), tuning.frames as usize);
        assert_eq!(anim.bounds, area);
        assert_eq!(
            anim.current_frame().map(|f| f.image.as_str()),
            Some("images/explosion1.png")
        );
    }

    #[test]
    fn test_explosion_runs_for_frames_times_duration() {
        let tuning = ExplosionTuning {
            frames: 3,
            frame_ticks: 2,
        };
        let mut anim = Animation::explosion(EntityId(1), Bounds::new(0.0, 0.0, 1.0, 1.0), &tuning);
        for _ in 0..5 {
            assert_eq!(anim.update(), AnimationUpdate::Running);
        }
        assert_eq!(anim.update(), AnimationUpdate::Completed);
    }
}
