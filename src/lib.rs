//! Alien Invasion - a fleet shooter arcade game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (entities, fleet, collisions, game state)
//! - `settings`: Static and dynamic tunables, loaded from JSON
//! - `ui`: Play button and scoreboard
//! - `audio`: Sound vocabulary and volume handling
//! - `platform`: Display/input/audio collaborators (headless and terminal)
//! - `game`: Frame loop binding the simulation to a platform

pub mod audio;
pub mod game;
pub mod platform;
pub mod settings;
pub mod sim;
pub mod ui;

pub use game::{Game, LoopControl};
pub use settings::{Rgb, Settings, SettingsError};

/// Game configuration constants
pub mod consts {
    /// Frames per second the loop is paced at
    pub const FRAME_RATE: u32 = 60;
    /// Duration of one frame in seconds
    pub const FRAME_DT: f32 = 1.0 / FRAME_RATE as f32;

    /// Default screen dimensions (pixels)
    pub const SCREEN_WIDTH: u32 = 1200;
    pub const SCREEN_HEIGHT: u32 = 800;

    /// Alien sprite size
    pub const ALIEN_WIDTH: u32 = 60;
    pub const ALIEN_HEIGHT: u32 = 58;

    /// Ship sprite size
    pub const SHIP_WIDTH: u32 = 60;
    pub const SHIP_HEIGHT: u32 = 48;

    /// Play button size (centered on screen)
    pub const BUTTON_WIDTH: f32 = 200.0;
    pub const BUTTON_HEIGHT: f32 = 50.0;

    /// Margin between the screen corner and the scoreboard
    pub const HUD_MARGIN: f32 = 20.0;
}

/// Convert a duration in seconds to a whole number of frames
#[inline]
pub fn secs_to_frames(secs: f32) -> u32 {
    (secs.max(0.0) * consts::FRAME_RATE as f32).round() as u32
}
