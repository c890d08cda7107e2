//! Platform abstraction layer
//!
//! The game core talks to its surroundings through these traits:
//! - [`Display`]: drawing surface and cursor
//! - [`InputSource`]: non-blocking event polling
//! - [`crate::audio::AudioSink`]: sound playback
//!
//! Backends: `headless` (tests, scripted runs) and `terminal` (crossterm).

pub mod headless;
pub mod terminal;

use std::io;

use glam::Vec2;

use crate::settings::Rgb;
use crate::sim::{InputEvent, Rect};

/// Images the game draws
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sprite {
    Background,
    Ship,
    Alien,
}

/// Horizontal anchoring for text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextAlign {
    Left,
    Center,
    Right,
}

/// A drawing surface
pub trait Display {
    /// Surface size in pixels
    fn size(&self) -> (u32, u32);
    /// Clear the whole surface to a colour
    fn fill(&mut self, color: Rgb);
    /// Draw a sprite into `rect`
    fn blit(&mut self, sprite: Sprite, rect: Rect);
    /// Fill a rectangle with a solid colour
    fn fill_rect(&mut self, rect: Rect, color: Rgb);
    /// Draw a line of text anchored at `at` (vertical center of the line)
    fn draw_text(&mut self, text: &str, at: Vec2, align: TextAlign, color: Rgb);
    fn set_cursor_visible(&mut self, visible: bool);
    /// Make everything drawn since the last present visible
    fn present(&mut self) -> io::Result<()>;
}

/// A source of input events, polled once per frame without blocking
pub trait InputSource {
    fn poll(&mut self) -> io::Result<Vec<InputEvent>>;
}
