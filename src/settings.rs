//! Game settings and tunables
//!
//! Static settings come from defaults or a JSON file and stay fixed for the
//! process. Dynamic settings (speeds, fleet direction, alien points) are reset
//! at every new game and only grow while a game is running.

use std::path::Path;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Environment variable naming a JSON settings file
pub const SETTINGS_ENV: &str = "ALIEN_INVASION_SETTINGS";

/// An RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const RAISIN_BLACK: Rgb = Rgb(25, 25, 35);
    pub const PARADISE_PINK: Rgb = Rgb(232, 63, 111);
    pub const HONEYDEW: Rgb = Rgb(226, 252, 239);
    pub const SHEEN_GREEN: Rgb = Rgb(113, 119, 32);
    pub const JACKET_BLUE: Rgb = Rgb(8, 76, 97);
}

/// Horizontal direction the fleet is travelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FleetDirection {
    #[default]
    Right,
    Left,
}

impl FleetDirection {
    /// Sign applied to alien horizontal velocity
    #[inline]
    pub fn sign(self) -> f32 {
        match self {
            FleetDirection::Right => 1.0,
            FleetDirection::Left => -1.0,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            FleetDirection::Right => FleetDirection::Left,
            FleetDirection::Left => FleetDirection::Right,
        }
    }
}

/// Errors from loading a settings file
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid settings: {0}")]
    Invalid(String),
}

/// All tunables for a game session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Screen ===
    pub screen_width: u32,
    pub screen_height: u32,
    pub bg_color: Rgb,

    // === Ship ===
    pub ship_width: u32,
    pub ship_height: u32,
    /// Lives per game
    pub ship_limit: u32,
    /// Seconds the game holds still after the ship is hit
    pub ship_hit_pause: f32,

    // === Bullets ===
    pub bullet_width: f32,
    pub bullet_height: f32,
    pub bullet_color: Rgb,
    /// Maximum bullets on screen at once
    pub bullets_allowed: usize,

    // === Aliens ===
    pub alien_width: u32,
    pub alien_height: u32,
    /// Pixels the fleet drops each time it reaches an edge
    pub fleet_drop_speed: f32,

    // === Progression ===
    /// How quickly the game speeds up
    pub speedup_scale: f32,
    /// How quickly alien point values increase
    pub score_scale: f32,
    /// Dynamic values restored at every new game
    pub initial_ship_speed: f32,
    pub initial_bullet_speed: f32,
    pub initial_alien_speed: f32,
    pub initial_alien_points: u64,

    // === Audio ===
    /// Master volume (0.0 - 1.0)
    pub master_volume: f32,
    /// Sound effects volume (0.0 - 1.0)
    pub sfx_volume: f32,
    /// Music volume (0.0 - 1.0)
    pub music_volume: f32,
    pub muted: bool,

    // === Dynamic (reset per game) ===
    #[serde(skip)]
    pub ship_speed: f32,
    #[serde(skip)]
    pub bullet_speed: f32,
    #[serde(skip)]
    pub alien_speed: f32,
    #[serde(skip)]
    pub fleet_direction: FleetDirection,
    #[serde(skip)]
    pub alien_points: u64,
}

impl Default for Settings {
    fn default() -> Self {
        let mut settings = Self {
            screen_width: SCREEN_WIDTH,
            screen_height: SCREEN_HEIGHT,
            bg_color: Rgb::RAISIN_BLACK,

            ship_width: SHIP_WIDTH,
            ship_height: SHIP_HEIGHT,
            ship_limit: 3,
            ship_hit_pause: 0.5,

            bullet_width: 10.0,
            bullet_height: 10.0,
            bullet_color: Rgb::PARADISE_PINK,
            bullets_allowed: 6,

            alien_width: ALIEN_WIDTH,
            alien_height: ALIEN_HEIGHT,
            fleet_drop_speed: 10.0,

            speedup_scale: 1.5,
            score_scale: 1.5,
            initial_ship_speed: 1.5,
            initial_bullet_speed: 1.5,
            initial_alien_speed: 1.2,
            initial_alien_points: 50,

            master_volume: 0.8,
            sfx_volume: 1.0,
            music_volume: 0.7,
            muted: false,

            ship_speed: 0.0,
            bullet_speed: 0.0,
            alien_speed: 0.0,
            fleet_direction: FleetDirection::Right,
            alien_points: 0,
        };
        settings.initialize_dynamic_settings();
        settings
    }
}

impl Settings {
    /// Reset the settings that change during a game
    pub fn initialize_dynamic_settings(&mut self) {
        self.ship_speed = self.initial_ship_speed;
        self.bullet_speed = self.initial_bullet_speed;
        self.alien_speed = self.initial_alien_speed;
        self.fleet_direction = FleetDirection::Right;
        self.alien_points = self.initial_alien_points;
    }

    /// Speed everything up and raise the alien point value.
    ///
    /// Points are truncated at every step, so the value after N calls is a
    /// chain of truncations rather than a single power.
    pub fn increase_speed(&mut self) {
        self.ship_speed *= self.speedup_scale;
        self.bullet_speed *= self.speedup_scale;
        self.alien_speed *= self.speedup_scale;

        self.alien_points = (self.alien_points as f64 * self.score_scale as f64) as u64;
        log::debug!(
            "Speed increased: ship={:.2} bullet={:.2} alien={:.2} points={}",
            self.ship_speed,
            self.bullet_speed,
            self.alien_speed,
            self.alien_points
        );
    }

    /// Check that sizes and scales are usable
    pub fn validate(&self) -> Result<(), SettingsError> {
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(SettingsError::Invalid("screen size must be non-zero".into()));
        }
        if self.bullet_width <= 0.0 || self.bullet_height <= 0.0 {
            return Err(SettingsError::Invalid("bullet size must be positive".into()));
        }
        if self.speedup_scale < 1.0 || self.score_scale < 1.0 {
            return Err(SettingsError::Invalid(
                "speedup_scale and score_scale must be at least 1.0".into(),
            ));
        }
        if self.ship_hit_pause < 0.0 {
            return Err(SettingsError::Invalid("ship_hit_pause must not be negative".into()));
        }
        Ok(())
    }

    /// Parse settings from JSON. Missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let mut settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        settings.initialize_dynamic_settings();
        Ok(settings)
    }

    /// Read settings from a JSON file
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let json = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&json)
    }

    /// Load from the file named by `ALIEN_INVASION_SETTINGS`, or use defaults
    pub fn load() -> Self {
        let Ok(path) = std::env::var(SETTINGS_ENV) else {
            log::info!("Using default settings");
            return Self::default();
        };

        match Self::load_from(&path) {
            Ok(settings) => {
                log::info!("Loaded settings from {}", path);
                settings
            }
            Err(e) => {
                log::warn!("Ignoring settings file {}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Serialize the static settings as pretty JSON
    pub fn to_json(&self) -> Result<String, SettingsError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Frames the loop holds after a ship hit
    pub fn ship_hit_pause_frames(&self) -> u32 {
        crate::secs_to_frames(self.ship_hit_pause)
    }

    pub fn screen_size(&self) -> Vec2 {
        Vec2::new(self.screen_width as f32, self.screen_height as f32)
    }

    pub fn ship_size(&self) -> Vec2 {
        Vec2::new(self.ship_width as f32, self.ship_height as f32)
    }

    pub fn alien_size(&self) -> Vec2 {
        Vec2::new(self.alien_width as f32, self.alien_height as f32)
    }

    pub fn bullet_size(&self) -> Vec2 {
        Vec2::new(self.bullet_width, self.bullet_height)
    }
}
