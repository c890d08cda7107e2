//! Alien fleet construction and movement
//!
//! The fleet is a grid with one alien-width gap between columns and one
//! alien-height gap between rows. It slides sideways until any alien touches a
//! screen edge, then drops and reverses as a unit.

use glam::Vec2;

use super::state::Alien;
use crate::settings::Settings;

/// Number of columns and rows that fit on screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FleetLayout {
    pub columns: u32,
    pub rows: u32,
}

impl FleetLayout {
    pub fn len(&self) -> usize {
        self.columns as usize * self.rows as usize
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Work out how many aliens fit horizontally and vertically.
///
/// One alien width of margin on each side; three alien heights plus the ship
/// height of vertical clearance. Space that doesn't fit a single cell gives 0.
pub fn fleet_layout(
    screen_width: u32,
    screen_height: u32,
    alien_width: u32,
    alien_height: u32,
    ship_height: u32,
) -> FleetLayout {
    if alien_width == 0 || alien_height == 0 {
        return FleetLayout { columns: 0, rows: 0 };
    }

    let (aw, ah) = (alien_width as i64, alien_height as i64);
    let available_x = screen_width as i64 - 2 * aw;
    let available_y = screen_height as i64 - 3 * ah - ship_height as i64;

    FleetLayout {
        columns: (available_x / (2 * aw)).max(0) as u32,
        rows: (available_y / (2 * ah)).max(0) as u32,
    }
}

/// Layout for the current settings
pub fn layout_for(settings: &Settings) -> FleetLayout {
    fleet_layout(
        settings.screen_width,
        settings.screen_height,
        settings.alien_width,
        settings.alien_height,
        settings.ship_height,
    )
}

/// Build a full fleet in row-major order
pub fn create_fleet(settings: &Settings) -> Vec<Alien> {
    let layout = layout_for(settings);
    let size = settings.alien_size();

    let mut aliens = Vec::with_capacity(layout.len());
    for row in 0..layout.rows {
        for column in 0..layout.columns {
            aliens.push(create_alien(column, row, size));
        }
    }
    aliens
}

/// Place one alien in its grid cell
fn create_alien(column: u32, row: u32, size: Vec2) -> Alien {
    let x = size.x + 2.0 * size.x * column as f32;
    let y = size.y + 2.0 * size.y * row as f32;
    Alien::new(Vec2::new(x, y), size)
}

/// Drop and reverse the fleet if any alien is at an edge.
///
/// Stops at the first alien found at an edge, so the fleet changes direction
/// at most once per call. Returns true if it did.
pub fn check_fleet_edges(aliens: &mut [Alien], settings: &mut Settings) -> bool {
    let screen_width = settings.screen_width as f32;
    if aliens.iter().any(|alien| alien.check_edges(screen_width)) {
        change_fleet_direction(aliens, settings);
        true
    } else {
        false
    }
}

/// Drop the entire fleet and flip its direction
pub fn change_fleet_direction(aliens: &mut [Alien], settings: &mut Settings) {
    for alien in aliens.iter_mut() {
        alien.rect.pos.y += settings.fleet_drop_speed;
    }
    settings.fleet_direction = settings.fleet_direction.reversed();
}

/// Move every alien sideways at the current fleet speed and direction
pub fn advance_fleet(aliens: &mut [Alien], settings: &Settings) {
    let direction = settings.fleet_direction.sign();
    for alien in aliens.iter_mut() {
        alien.update(settings.alien_speed, direction);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::FleetDirection;
    use proptest::prelude::*;

    #[test]
    fn test_layout_default_screen() {
        // (1200 - 120) / 120 = 9 columns, (800 - 174 - 48) / 116 = 4 rows
        let layout = fleet_layout(1200, 800, 60, 58, 48);
        assert_eq!(layout, FleetLayout { columns: 9, rows: 4 });
    }

    #[test]
    fn test_layout_small_aliens() {
        // (800 - 80) / 80 = 9 columns, (600 - 120 - 30) / 80 = 5 rows
        let layout = fleet_layout(800, 600, 40, 40, 30);
        assert_eq!(layout, FleetLayout { columns: 9, rows: 5 });
    }

    #[test]
    fn test_layout_wide_screen() {
        // (1920 - 100) / 100 = 18 columns, (1080 - 135 - 60) / 90 = 9 rows
        let layout = fleet_layout(1920, 1080, 50, 45, 60);
        assert_eq!(layout, FleetLayout { columns: 18, rows: 9 });
    }

    #[test]
    fn test_layout_too_narrow_is_empty() {
        // 150 - 120 = 30 < 120 -> no columns
        assert_eq!(fleet_layout(150, 800, 60, 58, 48).columns, 0);
        // Negative space never goes below zero
        assert_eq!(fleet_layout(50, 50, 60, 58, 48), FleetLayout { columns: 0, rows: 0 });
        assert!(fleet_layout(0, 0, 0, 0, 0).is_empty());
    }

    #[test]
    fn test_create_fleet_positions_row_major() {
        let settings = Settings::default();
        let aliens = create_fleet(&settings);
        assert_eq!(aliens.len(), 36);

        assert_eq!(aliens[0].rect.pos, Vec2::new(60.0, 58.0));
        assert_eq!(aliens[1].rect.pos, Vec2::new(180.0, 58.0));
        assert_eq!(aliens[8].rect.pos, Vec2::new(1020.0, 58.0));
        assert_eq!(aliens[9].rect.pos, Vec2::new(60.0, 174.0));
        assert_eq!(aliens[35].rect.pos, Vec2::new(1020.0, 406.0));
    }

    #[test]
    fn test_create_fleet_empty_when_nothing_fits() {
        let settings = Settings {
            screen_width: 100,
            ..Settings::default()
        };
        assert!(create_fleet(&settings).is_empty());
    }

    #[test]
    fn test_edge_check_drops_once_and_reverses() {
        let mut settings = Settings::default();
        let size = settings.alien_size();
        // Two aliens at the right edge; the fleet must drop only once
        let mut aliens = vec![
            Alien::new(Vec2::new(1140.0, 100.0), size),
            Alien::new(Vec2::new(1141.0, 200.0), size),
            Alien::new(Vec2::new(500.0, 300.0), size),
        ];

        assert!(check_fleet_edges(&mut aliens, &mut settings));
        assert_eq!(settings.fleet_direction, FleetDirection::Left);
        assert_eq!(aliens[0].rect.top(), 110.0);
        assert_eq!(aliens[1].rect.top(), 210.0);
        assert_eq!(aliens[2].rect.top(), 310.0);
    }

    #[test]
    fn test_edge_check_no_edge() {
        let mut settings = Settings::default();
        let mut aliens = create_fleet(&settings);
        assert!(!check_fleet_edges(&mut aliens, &mut settings));
        assert_eq!(settings.fleet_direction, FleetDirection::Right);
        assert_eq!(aliens[0].rect.top(), 58.0);
    }

    #[test]
    fn test_left_edge_reverses_back_to_right() {
        let mut settings = Settings::default();
        settings.fleet_direction = FleetDirection::Left;
        let mut aliens = vec![Alien::new(Vec2::new(0.0, 0.0), settings.alien_size())];
        assert!(check_fleet_edges(&mut aliens, &mut settings));
        assert_eq!(settings.fleet_direction, FleetDirection::Right);
    }

    #[test]
    fn test_advance_fleet_uses_direction() {
        let mut settings = Settings::default();
        let mut aliens = create_fleet(&settings);
        advance_fleet(&mut aliens, &settings);
        assert!((aliens[0].rect.left() - 61.2).abs() < 1e-4);

        settings.fleet_direction = FleetDirection::Left;
        advance_fleet(&mut aliens, &settings);
        assert!((aliens[0].rect.left() - 60.0).abs() < 1e-4);
    }

    proptest! {
        #[test]
        fn prop_layout_matches_floor_formula(
            sw in 0u32..4000,
            sh in 0u32..3000,
            aw in 1u32..200,
            ah in 1u32..200,
            shh in 0u32..200,
        ) {
            let layout = fleet_layout(sw, sh, aw, ah, shh);
            let avail_x = sw as i64 - 2 * aw as i64;
            let avail_y = sh as i64 - 3 * ah as i64 - shh as i64;
            let cols = if avail_x < 2 * aw as i64 { 0 } else { avail_x / (2 * aw as i64) };
            let rows = if avail_y < 2 * ah as i64 { 0 } else { avail_y / (2 * ah as i64) };
            prop_assert_eq!(layout.columns as i64, cols);
            prop_assert_eq!(layout.rows as i64, rows);
        }

        #[test]
        fn prop_fleet_fits_on_screen(sw in 200u32..3000, sh in 200u32..2000) {
            let settings = Settings { screen_width: sw, screen_height: sh, ..Settings::default() };
            let aliens = create_fleet(&settings);
            prop_assert_eq!(aliens.len(), layout_for(&settings).len());
            for alien in &aliens {
                prop_assert!(alien.rect.left() > 0.0);
                prop_assert!(alien.rect.right() < sw as f32);
                prop_assert!(alien.rect.bottom() < sh as f32 - settings.ship_height as f32);
            }
        }
    }
}
