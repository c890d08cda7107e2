//! Collision detection between bullets, aliens and the ship
//!
//! Detection never mutates: it returns the indices to remove, and removal
//! happens afterwards in one pass per collection.

use super::state::{Alien, Bullet, Ship};

/// Indices of bullets and aliens destroyed in one collision pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Collisions {
    /// Sorted, unique bullet indices
    pub bullets: Vec<usize>,
    /// Sorted, unique alien indices
    pub aliens: Vec<usize>,
}

impl Collisions {
    pub fn is_empty(&self) -> bool {
        self.aliens.is_empty()
    }

    /// Number of aliens destroyed
    pub fn count(&self) -> usize {
        self.aliens.len()
    }
}

/// Pair up overlapping bullets and aliens.
///
/// Each bullet destroys at most one alien (the earliest-created one it
/// overlaps that no earlier bullet claimed), and each alien is destroyed at
/// most once.
pub fn bullet_alien_collisions(bullets: &[Bullet], aliens: &[Alien]) -> Collisions {
    let mut claimed = vec![false; aliens.len()];
    let mut hits = Collisions::default();

    for (bullet_idx, bullet) in bullets.iter().enumerate() {
        let target = aliens
            .iter()
            .enumerate()
            .find(|(alien_idx, alien)| !claimed[*alien_idx] && bullet.rect.intersects(&alien.rect));

        if let Some((alien_idx, _)) = target {
            claimed[alien_idx] = true;
            hits.bullets.push(bullet_idx);
            hits.aliens.push(alien_idx);
        }
    }

    hits.aliens.sort_unstable();
    hits
}

/// Remove the entries at `indices` while keeping the order of the rest
pub fn remove_indices<T>(items: &mut Vec<T>, indices: &[usize]) {
    if indices.is_empty() {
        return;
    }
    let mut doomed = vec![false; items.len()];
    for &i in indices {
        if let Some(slot) = doomed.get_mut(i) {
            *slot = true;
        }
    }
    let mut idx = 0;
    items.retain(|_| {
        let keep = !doomed[idx];
        idx += 1;
        keep
    });
}

/// True if any alien touches the ship
pub fn ship_alien_collision(ship: &Ship, aliens: &[Alien]) -> bool {
    aliens.iter().any(|alien| alien.rect.intersects(&ship.rect))
}

/// True if any alien has reached the bottom of the screen
pub fn aliens_reached_bottom(aliens: &[Alien], screen_height: f32) -> bool {
    aliens.iter().any(|alien| alien.rect.bottom() >= screen_height)
}
