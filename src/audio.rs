//! Audio collaborator
//!
//! Three cues: looping background music, the player's shot and explosions.
//! Playback itself belongs to the host's `AudioSink`; `AudioManager` applies
//! volume settings and mute, and swallows (logs) sink failures so a missing
//! sound never interrupts a tick.

use thiserror::Error;

use crate::settings::Settings;

/// Sound cue types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SoundCue {
    /// Background music (looping)
    Bgm,
    /// Player shot
    Shot,
    /// Enemy or player destroyed / hit
    Explosion,
}

impl SoundCue {
    pub const ALL: [SoundCue; 3] = [SoundCue::Bgm, SoundCue::Shot, SoundCue::Explosion];

    /// Asset path of the cue
    pub fn path(&self) -> &'static str {
        match self {
            SoundCue::Bgm => "audio/bgm.mp3",
            SoundCue::Shot => "audio/bullet.mp3",
            SoundCue::Explosion => "audio/boom.mp3",
        }
    }
}

/// Shots are mixed quieter than other effects
const SHOT_GAIN: f32 = 0.3;

#[derive(Debug, Error)]
pub enum AudioError {
    #[error("sound `{}` is not loaded", .0.path())]
    NotLoaded(SoundCue),
    #[error("playback failed: {0}")]
    Playback(String),
}

/// Host audio output
pub trait AudioSink {
    /// Start a cue at the given gain; effects may overlap themselves
    fn play(&mut self, cue: SoundCue, volume: f32) -> Result<(), AudioError>;
    fn pause(&mut self, cue: SoundCue) -> Result<(), AudioError>;
    fn set_volume(&mut self, cue: SoundCue, volume: f32) -> Result<(), AudioError>;
}

/// Sink that plays nothing (headless runs)
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentAudio;

impl AudioSink for SilentAudio {
    fn play(&mut self, cue: SoundCue, volume: f32) -> Result<(), AudioError> {
        log::trace!("play {:?} at {:.2}", cue, volume);
        Ok(())
    }

    fn pause(&mut self, _cue: SoundCue) -> Result<(), AudioError> {
        Ok(())
    }

    fn set_volume(&mut self, _cue: SoundCue, _volume: f32) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Audio manager for the game
pub struct AudioManager<A> {
    sink: A,
    settings: Settings,
}

impl<A: AudioSink> AudioManager<A> {
    pub fn new(sink: A, settings: Settings) -> Self {
        Self {
            sink,
            settings: settings.clamped(),
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn sink(&self) -> &A {
        &self.sink
    }

    pub fn is_muted(&self) -> bool {
        self.settings.muted
    }

    pub fn play_bgm(&mut self) {
        if self.settings.muted {
            return;
        }
        let volume = self.settings.effective_music_volume();
        let result = self.sink.play(SoundCue::Bgm, volume);
        report(SoundCue::Bgm, result);
    }

    pub fn pause_bgm(&mut self) {
        let result = self.sink.pause(SoundCue::Bgm);
        report(SoundCue::Bgm, result);
    }

    pub fn play_shot(&mut self) {
        self.play_effect(SoundCue::Shot, SHOT_GAIN);
    }

    pub fn play_explosion(&mut self) {
        self.play_effect(SoundCue::Explosion, 1.0);
    }

    fn play_effect(&mut self, cue: SoundCue, gain: f32) {
        if self.settings.muted {
            return;
        }
        let volume = self.settings.effective_sfx_volume() * gain;
        let result = self.sink.play(cue, volume);
        report(cue, result);
    }

    /// Set master volume (0.0 - 1.0) and push it to every cue
    pub fn set_volume(&mut self, volume: f32) {
        self.settings.master_volume = volume.clamp(0.0, 1.0);
        for cue in SoundCue::ALL {
            let gain = match cue {
                SoundCue::Bgm => self.settings.effective_music_volume(),
                SoundCue::Shot => self.settings.effective_sfx_volume() * SHOT_GAIN,
                SoundCue::Explosion => self.settings.effective_sfx_volume(),
            };
            let result = self.sink.set_volume(cue, gain);
            report(cue, result);
        }
    }

    /// Mute/unmute; music pauses while muted
    pub fn set_muted(&mut self, muted: bool) {
        self.settings.muted = muted;
        if muted {
            self.pause_bgm();
        } else {
            self.play_bgm();
        }
    }

    /// Host went to background
    pub fn stop_all(&mut self) {
        self.pause_bgm();
    }

    /// Host came back to foreground
    pub fn resume_all(&mut self) {
        if !self.settings.muted {
            self.play_bgm();
        }
    }
}

fn report(cue: SoundCue, result: Result<(), AudioError>) {
    if let Err(e) = result {
        log::warn!("Audio {:?} failed: {}", cue, e);
    }
}
