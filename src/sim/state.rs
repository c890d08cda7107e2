//! Game state and core simulation types
//!
//! Entities only receive the speeds and bounds they need; the session-wide
//! state lives in [`GameState`].

use glam::Vec2;

use super::fleet::create_fleet;
use super::rect::Rect;
use crate::settings::Settings;

/// Current phase of gameplay
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Waiting for the Play button (startup or after game over)
    Inactive,
    /// Active gameplay
    Active,
    /// Active, but frozen for a moment after losing a ship
    HitPause,
}

/// Things that happened during a frame, drained by the loop for audio and HUD
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    GameStarted,
    BulletFired,
    /// Aliens destroyed by bullets this frame and the points awarded
    AliensDestroyed { count: usize, points: u64 },
    /// Whole fleet destroyed; carries the new level
    FleetCleared { level: u32 },
    /// Ship lost; carries lives remaining
    ShipHit { ships_left: u32 },
    GameOver,
}

/// The player's ship
#[derive(Debug, Clone)]
pub struct Ship {
    pub rect: Rect,
    pub moving_left: bool,
    pub moving_right: bool,
}

impl Ship {
    /// Create a ship at the bottom center of the screen
    pub fn new(size: Vec2, screen: Vec2) -> Self {
        let mut ship = Self {
            rect: Rect {
                pos: Vec2::ZERO,
                size,
            },
            moving_left: false,
            moving_right: false,
        };
        ship.center_ship(screen);
        ship
    }

    /// Move the ship back to the bottom center of the screen
    pub fn center_ship(&mut self, screen: Vec2) {
        self.rect.pos = Vec2::new(
            (screen.x - self.rect.width()) / 2.0,
            screen.y - self.rect.height(),
        );
    }

    /// Apply movement intents, keeping the ship on screen
    pub fn update(&mut self, speed: f32, screen_width: f32) {
        if self.moving_right && self.rect.right() < screen_width {
            self.rect.pos.x += speed;
        }
        if self.moving_left && self.rect.left() > 0.0 {
            self.rect.pos.x -= speed;
        }
        let max_x = (screen_width - self.rect.width()).max(0.0);
        self.rect.pos.x = self.rect.pos.x.clamp(0.0, max_x);
    }
}

/// A bullet fired by the ship
#[derive(Debug, Clone)]
pub struct Bullet {
    pub rect: Rect,
}

impl Bullet {
    /// Spawn a bullet with its top edge centered on the ship's top edge
    pub fn new(ship: &Ship, size: Vec2) -> Self {
        let midtop = ship.rect.midtop();
        Self {
            rect: Rect {
                pos: Vec2::new(midtop.x - size.x / 2.0, midtop.y),
                size,
            },
        }
    }

    pub fn update(&mut self, speed: f32) {
        self.rect.pos.y -= speed;
    }

    /// True once the bullet has left through the top of the screen
    pub fn is_off_screen(&self) -> bool {
        self.rect.bottom() <= 0.0
    }
}

/// A single alien in the fleet
#[derive(Debug, Clone)]
pub struct Alien {
    pub rect: Rect,
}

impl Alien {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self {
            rect: Rect { pos, size },
        }
    }

    /// Move horizontally by `speed * direction`
    pub fn update(&mut self, speed: f32, direction: f32) {
        self.rect.pos.x += speed * direction;
    }

    /// True if the alien touches or passes either side of the screen
    pub fn check_edges(&self, screen_width: f32) -> bool {
        self.rect.right() >= screen_width || self.rect.left() <= 0.0
    }
}

/// Score, lives and level for the current game
#[derive(Debug, Clone)]
pub struct GameStats {
    pub ships_left: u32,
    pub score: u64,
    pub level: u32,
    pub game_active: bool,
    /// Best score this process has seen; never reset
    pub high_score: u64,
}

impl GameStats {
    /// Stats before the first game: inactive, full lives
    pub fn new(ship_limit: u32) -> Self {
        let mut stats = Self {
            ships_left: 0,
            score: 0,
            level: 1,
            game_active: false,
            high_score: 0,
        };
        stats.reset_stats(ship_limit);
        stats
    }

    /// Reset everything except the high score
    pub fn reset_stats(&mut self, ship_limit: u32) {
        self.ships_left = ship_limit;
        self.score = 0;
        self.level = 1;
    }

    /// Raise the high score if the current score beats it. Returns true on a new record.
    pub fn check_high_score(&mut self) -> bool {
        if self.score > self.high_score {
            self.high_score = self.score;
            true
        } else {
            false
        }
    }
}

/// Complete game state for one session
#[derive(Debug, Clone)]
pub struct GameState {
    pub settings: Settings,
    pub stats: GameStats,
    pub ship: Ship,
    /// Live bullets in firing order
    pub bullets: Vec<Bullet>,
    /// Live aliens in row-major creation order
    pub aliens: Vec<Alien>,
    /// Frames left in the post-hit pause (0 when not paused)
    pub hit_pause_frames: u32,
    /// Whether the pointer cursor should be shown
    pub cursor_visible: bool,
    /// Events since the last drain
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a session: inactive, with a fleet already on screen behind the Play button
    pub fn new(settings: Settings) -> Self {
        let ship = Ship::new(settings.ship_size(), settings.screen_size());
        let stats = GameStats::new(settings.ship_limit);
        let aliens = create_fleet(&settings);
        Self {
            settings,
            stats,
            ship,
            bullets: Vec::new(),
            aliens,
            hit_pause_frames: 0,
            cursor_visible: true,
            events: Vec::new(),
        }
    }

    pub fn phase(&self) -> GamePhase {
        if !self.stats.game_active {
            GamePhase::Inactive
        } else if self.hit_pause_frames > 0 {
            GamePhase::HitPause
        } else {
            GamePhase::Active
        }
    }

    /// Replace the fleet with a freshly built one
    pub fn rebuild_fleet(&mut self) {
        self.aliens = create_fleet(&self.settings);
    }

    /// Take all events recorded since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCREEN: Vec2 = Vec2::new(1200.0, 800.0);

    #[test]
    fn test_ship_starts_bottom_center() {
        let ship = Ship::new(Vec2::new(60.0, 48.0), SCREEN);
        assert_eq!(ship.rect.pos, Vec2::new(570.0, 752.0));
        assert_eq!(ship.rect.bottom(), 800.0);
        assert_eq!(ship.rect.center_x(), 600.0);
    }

    #[test]
    fn test_ship_moves_continuously_and_stays_on_screen() {
        let mut ship = Ship::new(Vec2::new(60.0, 48.0), SCREEN);
        ship.moving_right = true;
        ship.update(1.5, SCREEN.x);
        assert_eq!(ship.rect.left(), 571.5);

        ship.rect.pos.x = 1139.0;
        ship.update(1.5, SCREEN.x);
        assert_eq!(ship.rect.right(), 1200.0);
        ship.update(1.5, SCREEN.x);
        assert_eq!(ship.rect.right(), 1200.0);

        ship.moving_right = false;
        ship.moving_left = true;
        ship.rect.pos.x = 1.0;
        ship.update(1.5, SCREEN.x);
        assert_eq!(ship.rect.left(), 0.0);
    }

    #[test]
    fn test_ship_opposing_intents_cancel() {
        let mut ship = Ship::new(Vec2::new(60.0, 48.0), SCREEN);
        ship.moving_left = true;
        ship.moving_right = true;
        ship.update(3.0, SCREEN.x);
        assert_eq!(ship.rect.left(), 570.0);
    }

    #[test]
    fn test_bullet_spawns_at_ship_midtop_and_rises() {
        let ship = Ship::new(Vec2::new(60.0, 48.0), SCREEN);
        let mut bullet = Bullet::new(&ship, Vec2::new(10.0, 10.0));
        assert_eq!(bullet.rect.pos, Vec2::new(595.0, 752.0));

        bullet.update(2.0);
        assert_eq!(bullet.rect.top(), 750.0);
        assert!(!bullet.is_off_screen());

        bullet.rect.pos.y = -10.0;
        assert!(bullet.is_off_screen());
    }

    #[test]
    fn test_alien_edges() {
        let alien = Alien::new(Vec2::new(100.0, 0.0), Vec2::new(60.0, 58.0));
        assert!(!alien.check_edges(1200.0));
        let alien = Alien::new(Vec2::new(1140.0, 0.0), Vec2::new(60.0, 58.0));
        assert!(alien.check_edges(1200.0));
        let alien = Alien::new(Vec2::new(0.0, 0.0), Vec2::new(60.0, 58.0));
        assert!(alien.check_edges(1200.0));
    }

    #[test]
    fn test_alien_update_follows_direction() {
        let mut alien = Alien::new(Vec2::new(100.0, 0.0), Vec2::new(60.0, 58.0));
        alien.update(1.2, 1.0);
        assert!((alien.rect.left() - 101.2).abs() < 1e-5);
        alien.update(1.2, -1.0);
        assert!((alien.rect.left() - 100.0).abs() < 1e-5);
    }

    #[test]
    fn test_reset_stats_keeps_high_score() {
        let mut stats = GameStats::new(3);
        stats.score = 500;
        assert!(stats.check_high_score());
        stats.ships_left = 0;
        stats.level = 4;

        stats.reset_stats(3);
        assert_eq!(stats.score, 0);
        assert_eq!(stats.level, 1);
        assert_eq!(stats.ships_left, 3);
        assert_eq!(stats.high_score, 500);
        assert!(!stats.check_high_score());
    }

    #[test]
    fn test_new_state_is_inactive_with_fleet() {
        let state = GameState::new(Settings::default());
        assert_eq!(state.phase(), GamePhase::Inactive);
        assert_eq!(state.aliens.len(), 36);
        assert!(state.bullets.is_empty());
        assert!(state.cursor_visible);
    }
}
