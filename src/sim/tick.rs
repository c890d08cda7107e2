//! Per-frame simulation step and input dispatch
//!
//! Frame order while active: ship, then bullets (move, prune, collide), then
//! the fleet (edge check, move, ship contact, bottom check).

use glam::Vec2;

use super::collision::{
    aliens_reached_bottom, bullet_alien_collisions, remove_indices, ship_alien_collision,
};
use super::fleet::{advance_fleet, check_fleet_edges};
use super::rect::Rect;
use super::state::{Bullet, GameEvent, GamePhase, GameState};

/// Keys the game reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    Space,
    Q,
    Other,
}

/// A discrete input event from the platform
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    Quit,
    KeyDown(Key),
    KeyUp(Key),
    /// Pointer press in screen coordinates
    PointerDown(Vec2),
}

/// Whether the loop should keep running
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Quit,
}

/// Apply one input event. Works in every phase.
pub fn handle_event(state: &mut GameState, event: &InputEvent, play_button: &Rect) -> LoopControl {
    match *event {
        InputEvent::Quit | InputEvent::KeyDown(Key::Q) => {
            log::info!("Quit requested");
            return LoopControl::Quit;
        }
        InputEvent::KeyDown(Key::Right) => state.ship.moving_right = true,
        InputEvent::KeyDown(Key::Left) => state.ship.moving_left = true,
        InputEvent::KeyDown(Key::Space) => {
            fire_bullet(state);
        }
        InputEvent::KeyUp(Key::Right) => state.ship.moving_right = false,
        InputEvent::KeyUp(Key::Left) => state.ship.moving_left = false,
        InputEvent::PointerDown(pos) => {
            check_play_button(state, pos, play_button);
        }
        InputEvent::KeyDown(_) | InputEvent::KeyUp(_) => {}
    }
    LoopControl::Continue
}

/// Start a new game if `pos` is on the Play button and no game is running.
/// Returns true if a game was started.
pub fn check_play_button(state: &mut GameState, pos: Vec2, play_button: &Rect) -> bool {
    if play_button.contains_point(pos) && !state.stats.game_active {
        start_game(state);
        true
    } else {
        false
    }
}

/// Reset settings and stats and put a fresh fleet on screen
pub fn start_game(state: &mut GameState) {
    state.settings.initialize_dynamic_settings();
    state.stats.reset_stats(state.settings.ship_limit);
    state.stats.game_active = true;

    state.aliens.clear();
    state.bullets.clear();
    state.rebuild_fleet();
    state.ship.center_ship(state.settings.screen_size());
    state.hit_pause_frames = 0;
    state.cursor_visible = false;

    state.events.push(GameEvent::GameStarted);
    log::info!(
        "Game started: {} aliens, {} ships",
        state.aliens.len(),
        state.stats.ships_left
    );
}

/// Fire a bullet if the game is running and the bullet limit allows it
pub fn fire_bullet(state: &mut GameState) -> bool {
    if state.phase() != GamePhase::Active {
        return false;
    }
    if state.bullets.len() >= state.settings.bullets_allowed {
        return false;
    }
    let bullet = Bullet::new(&state.ship, state.settings.bullet_size());
    state.bullets.push(bullet);
    state.events.push(GameEvent::BulletFired);
    log::debug!("Bullet fired ({} in flight)", state.bullets.len());
    true
}

/// Advance the game by one frame
pub fn tick(state: &mut GameState) {
    match state.phase() {
        GamePhase::Inactive => {}
        GamePhase::HitPause => {
            state.hit_pause_frames -= 1;
        }
        GamePhase::Active => {
            state
                .ship
                .update(state.settings.ship_speed, state.settings.screen_width as f32);
            update_bullets(state);
            update_aliens(state);
        }
    }
}

/// Move bullets, drop the ones that left the screen, then resolve hits
pub fn update_bullets(state: &mut GameState) {
    let speed = state.settings.bullet_speed;
    for bullet in state.bullets.iter_mut() {
        bullet.update(speed);
    }
    state.bullets.retain(|bullet| !bullet.is_off_screen());

    check_bullet_alien_collisions(state);
}

/// Remove hit bullets and aliens, score them, and start a new level when the
/// fleet is gone
pub fn check_bullet_alien_collisions(state: &mut GameState) {
    let had_aliens = !state.aliens.is_empty();
    let hits = bullet_alien_collisions(&state.bullets, &state.aliens);

    if !hits.is_empty() {
        remove_indices(&mut state.bullets, &hits.bullets);
        remove_indices(&mut state.aliens, &hits.aliens);

        let count = hits.count();
        let points = state.settings.alien_points.saturating_mul(count as u64);
        state.stats.score = state.stats.score.saturating_add(points);
        state.stats.check_high_score();
        state.events.push(GameEvent::AliensDestroyed { count, points });
    }

    if had_aliens && state.aliens.is_empty() {
        state.bullets.clear();
        state.rebuild_fleet();
        state.settings.increase_speed();
        state.stats.level += 1;
        state.events.push(GameEvent::FleetCleared {
            level: state.stats.level,
        });
        log::info!("Fleet cleared, now level {}", state.stats.level);
    }
}

/// Move the fleet and check whether it got the ship
pub fn update_aliens(state: &mut GameState) {
    check_fleet_edges(&mut state.aliens, &mut state.settings);
    advance_fleet(&mut state.aliens, &state.settings);

    if ship_alien_collision(&state.ship, &state.aliens) {
        ship_hit(state);
        return;
    }

    if aliens_reached_bottom(&state.aliens, state.settings.screen_height as f32) {
        ship_hit(state);
    }
}

/// Lose a ship. Resets the round while lives remain, otherwise ends the game.
pub fn ship_hit(state: &mut GameState) {
    state.stats.ships_left = state.stats.ships_left.saturating_sub(1);
    state.events.push(GameEvent::ShipHit {
        ships_left: state.stats.ships_left,
    });

    if state.stats.ships_left > 0 {
        state.aliens.clear();
        state.bullets.clear();
        state.rebuild_fleet();
        state.ship.center_ship(state.settings.screen_size());
        state.hit_pause_frames = state.settings.ship_hit_pause_frames();
        log::info!("Ship hit, {} left", state.stats.ships_left);
    } else {
        state.stats.game_active = false;
        state.hit_pause_frames = 0;
        state.cursor_visible = true;
        state.events.push(GameEvent::GameOver);
        log::info!(
            "Game over: score {} at level {}",
            state.stats.score,
            state.stats.level
        );
    }
}
