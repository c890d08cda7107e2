//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed step per frame
//! - Stable iteration order (creation order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod fleet;
pub mod rect;
pub mod state;
pub mod tick;

pub use collision::{Collisions, bullet_alien_collisions, remove_indices};
pub use fleet::{FleetLayout, create_fleet, fleet_layout, layout_for};
pub use rect::Rect;
pub use state::{Alien, Bullet, GameEvent, GamePhase, GameState, GameStats, Ship};
pub use tick::{InputEvent, Key, LoopControl, handle_event, ship_hit, start_game, tick};
