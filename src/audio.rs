//! Sound effects and music
//!
//! The game only decides *what* to play and how loud; a platform [`AudioSink`]
//! does the actual playback.

use crate::settings::Settings;

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoundEffect {
    /// Ship fires a bullet
    BulletFire,
    /// Bullet destroys one or more aliens
    AlienExplosion,
}

/// Background music tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicTrack {
    /// Looped from startup
    Theme,
}

/// Fire-and-forget playback backend
pub trait AudioSink {
    /// Play a one-shot effect at `volume` (0.0 - 1.0)
    fn play(&mut self, effect: SoundEffect, volume: f32);
    /// Loop a music track at `volume` (0.0 - 1.0)
    fn loop_music(&mut self, track: MusicTrack, volume: f32);
}

/// Sink that only logs what would have played
#[derive(Debug, Default)]
pub struct LogSink;

impl AudioSink for LogSink {
    fn play(&mut self, effect: SoundEffect, volume: f32) {
        log::debug!("Sound {:?} at volume {:.2}", effect, volume);
    }

    fn loop_music(&mut self, track: MusicTrack, volume: f32) {
        log::debug!("Looping {:?} at volume {:.2}", track, volume);
    }
}

/// Audio manager for the game
pub struct AudioManager<S: AudioSink> {
    sink: S,
    master_volume: f32,
    sfx_volume: f32,
    music_volume: f32,
    muted: bool,
}

impl<S: AudioSink> AudioManager<S> {
    pub fn new(sink: S, settings: &Settings) -> Self {
        Self {
            sink,
            master_volume: settings.master_volume.clamp(0.0, 1.0),
            sfx_volume: settings.sfx_volume.clamp(0.0, 1.0),
            music_volume: settings.music_volume.clamp(0.0, 1.0),
            muted: settings.muted,
        }
    }

    /// Set master volume (0.0 - 1.0)
    pub fn set_master_volume(&mut self, vol: f32) {
        self.master_volume = vol.clamp(0.0, 1.0);
    }

    /// Mute/unmute all audio
    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    fn effective_volume(&self, channel: f32) -> f32 {
        if self.muted {
            0.0
        } else {
            self.master_volume * channel
        }
    }

    /// Play a sound effect (skipped when silent)
    pub fn play(&mut self, effect: SoundEffect) {
        let vol = self.effective_volume(self.sfx_volume);
        if vol <= 0.0 {
            return;
        }
        self.sink.play(effect, vol);
    }

    /// Start looping a music track (skipped when silent)
    pub fn loop_music(&mut self, track: MusicTrack) {
        let vol = self.effective_volume(self.music_volume);
        if vol <= 0.0 {
            return;
        }
        self.sink.loop_music(track, vol);
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}
