//! Headless backend
//!
//! Records draw calls instead of drawing and replays a frame-indexed input
//! script. Used by tests and for scripted runs.

use std::collections::HashMap;
use std::io;

use glam::Vec2;

use super::{Display, InputSource, Sprite, TextAlign};
use crate::audio::{AudioSink, MusicTrack, SoundEffect};
use crate::settings::Rgb;
use crate::sim::{InputEvent, Rect};

/// One recorded drawing operation
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCall {
    Fill(Rgb),
    Blit(Sprite, Rect),
    FillRect(Rect, Rgb),
    Text(String, Vec2, TextAlign),
}

/// A display that remembers what it was asked to draw
#[derive(Debug, Default)]
pub struct HeadlessDisplay {
    width: u32,
    height: u32,
    /// Calls since the last present
    pending: Vec<DrawCall>,
    /// Calls of the last presented frame
    pub last_frame: Vec<DrawCall>,
    pub frames_presented: u64,
    pub cursor_visible: bool,
}

impl HeadlessDisplay {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            cursor_visible: true,
            ..Default::default()
        }
    }

    /// Number of sprites of a kind in the last presented frame
    pub fn count_blits(&self, sprite: Sprite) -> usize {
        self.last_frame
            .iter()
            .filter(|call| matches!(call, DrawCall::Blit(s, _) if *s == sprite))
            .count()
    }

    /// True if the last presented frame drew this text
    pub fn drew_text(&self, text: &str) -> bool {
        self.last_frame
            .iter()
            .any(|call| matches!(call, DrawCall::Text(t, _, _) if t == text))
    }
}

impl Display for HeadlessDisplay {
    fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    fn fill(&mut self, color: Rgb) {
        self.pending.push(DrawCall::Fill(color));
    }

    fn blit(&mut self, sprite: Sprite, rect: Rect) {
        self.pending.push(DrawCall::Blit(sprite, rect));
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.pending.push(DrawCall::FillRect(rect, color));
    }

    fn draw_text(&mut self, text: &str, at: Vec2, align: TextAlign, _color: Rgb) {
        self.pending.push(DrawCall::Text(text.to_string(), at, align));
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        self.cursor_visible = visible;
    }

    fn present(&mut self) -> io::Result<()> {
        self.last_frame = std::mem::take(&mut self.pending);
        self.frames_presented += 1;
        Ok(())
    }
}

/// Replays events keyed by poll number (0 = first poll)
#[derive(Debug, Default)]
pub struct ScriptedInput {
    events: HashMap<u64, Vec<InputEvent>>,
    polls: u64,
}

impl ScriptedInput {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue an event for a given poll
    pub fn at(mut self, poll: u64, event: InputEvent) -> Self {
        self.events.entry(poll).or_default().push(event);
        self
    }

    /// How many times the source has been polled
    pub fn polls(&self) -> u64 {
        self.polls
    }
}

impl InputSource for ScriptedInput {
    fn poll(&mut self) -> io::Result<Vec<InputEvent>> {
        let events = self.events.remove(&self.polls).unwrap_or_default();
        self.polls += 1;
        Ok(events)
    }
}

/// Audio sink that records what was played
#[derive(Debug, Default)]
pub struct RecordingAudio {
    pub effects: Vec<SoundEffect>,
    pub music: Vec<MusicTrack>,
}

impl AudioSink for RecordingAudio {
    fn play(&mut self, effect: SoundEffect, _volume: f32) {
        self.effects.push(effect);
    }

    fn loop_music(&mut self, track: MusicTrack, _volume: f32) {
        self.music.push(track);
    }
}
