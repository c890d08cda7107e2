//! Play button and scoreboard
//!
//! Both are prepared from game state and then drawn through a [`Display`].
//! The scoreboard caches its text so it only changes when `prep_*` is called.

use glam::Vec2;

use crate::consts::{BUTTON_HEIGHT, BUTTON_WIDTH, HUD_MARGIN};
use crate::platform::{Display, Sprite, TextAlign};
use crate::settings::Rgb;
use crate::sim::{GameStats, Rect};

/// Height of one scoreboard text line
const LINE_HEIGHT: f32 = 36.0;
/// Gap between the score and the level line
const LINE_GAP: f32 = 10.0;
/// Offset of the remaining-ships row from the top-left corner
const SHIPS_OFFSET: f32 = 10.0;

/// A clickable button centered on the screen
#[derive(Debug, Clone)]
pub struct Button {
    pub rect: Rect,
    pub label: String,
    pub button_color: Rgb,
    pub text_color: Rgb,
}

impl Button {
    pub fn new(label: &str, screen: Vec2) -> Self {
        Self {
            rect: Rect::centered_at(screen / 2.0, Vec2::new(BUTTON_WIDTH, BUTTON_HEIGHT)),
            label: label.to_string(),
            button_color: Rgb::SHEEN_GREEN,
            text_color: Rgb::HONEYDEW,
        }
    }

    pub fn draw_button<D: Display>(&self, display: &mut D) {
        display.fill_rect(self.rect, self.button_color);
        display.draw_text(&self.label, self.rect.center(), TextAlign::Center, self.text_color);
    }
}

/// Group digits in threes: 1234567 -> "1,234,567"
pub fn format_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Round to the nearest multiple of ten, halves rounding up
fn round_to_tens(value: u64) -> u64 {
    value.saturating_add(5) / 10 * 10
}

/// Score, high score, level and remaining ships
#[derive(Debug, Clone)]
pub struct Scoreboard {
    screen: Vec2,
    ship_size: Vec2,
    text_color: Rgb,
    score_text: String,
    high_score_text: String,
    level_text: String,
    ship_icons: Vec<Rect>,
    /// High score the text was last prepared from
    shown_high_score: u64,
}

impl Scoreboard {
    pub fn new(screen: Vec2, ship_size: Vec2, stats: &GameStats) -> Self {
        let mut sb = Self {
            screen,
            ship_size,
            text_color: Rgb::JACKET_BLUE,
            score_text: String::new(),
            high_score_text: String::new(),
            level_text: String::new(),
            ship_icons: Vec::new(),
            shown_high_score: 0,
        };
        sb.prep_images(stats);
        sb
    }

    /// Refresh every piece of the scoreboard
    pub fn prep_images(&mut self, stats: &GameStats) {
        self.prep_score(stats);
        self.prep_high_score(stats);
        self.prep_level(stats);
        self.prep_ships(stats);
    }

    pub fn prep_score(&mut self, stats: &GameStats) {
        self.score_text = format_thousands(round_to_tens(stats.score));
    }

    pub fn prep_high_score(&mut self, stats: &GameStats) {
        self.shown_high_score = stats.high_score;
        self.high_score_text = format_thousands(round_to_tens(stats.high_score));
    }

    pub fn prep_level(&mut self, stats: &GameStats) {
        self.level_text = stats.level.to_string();
    }

    /// One ship icon per remaining life, left to right from the top-left corner
    pub fn prep_ships(&mut self, stats: &GameStats) {
        self.ship_icons = (0..stats.ships_left)
            .map(|i| {
                Rect::new(
                    SHIPS_OFFSET + i as f32 * self.ship_size.x,
                    SHIPS_OFFSET,
                    self.ship_size.x,
                    self.ship_size.y,
                )
            })
            .collect();
    }

    /// Raise the high score if needed and refresh its text when the record
    /// differs from what is shown. Returns true if the text changed.
    pub fn check_high_score(&mut self, stats: &mut GameStats) -> bool {
        stats.check_high_score();
        if stats.high_score == self.shown_high_score {
            return false;
        }
        self.prep_high_score(stats);
        true
    }

    pub fn score_text(&self) -> &str {
        &self.score_text
    }

    pub fn high_score_text(&self) -> &str {
        &self.high_score_text
    }

    pub fn level_text(&self) -> &str {
        &self.level_text
    }

    pub fn ship_icons(&self) -> &[Rect] {
        &self.ship_icons
    }

    /// Draw score and level at the top right, high score at the top center
    /// and the remaining ships at the top left
    pub fn show_score<D: Display>(&self, display: &mut D) {
        let right = self.screen.x - HUD_MARGIN;
        let score_y = HUD_MARGIN + LINE_HEIGHT / 2.0;
        let level_y = score_y + LINE_HEIGHT + LINE_GAP;

        display.draw_text(
            &self.score_text,
            Vec2::new(right, score_y),
            TextAlign::Right,
            self.text_color,
        );
        display.draw_text(
            &self.high_score_text,
            Vec2::new(self.screen.x / 2.0, score_y),
            TextAlign::Center,
            self.text_color,
        );
        display.draw_text(
            &self.level_text,
            Vec2::new(right, level_y),
            TextAlign::Right,
            self.text_color,
        );
        for icon in &self.ship_icons {
            display.blit(Sprite::Ship, *icon);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{DrawCall, HeadlessDisplay};

    fn scoreboard(stats: &GameStats) -> Scoreboard {
        Scoreboard::new(Vec2::new(1200.0, 800.0), Vec2::new(60.0, 48.0), stats)
    }

    #[test]
    fn test_format_thousands() {
        assert_eq!(format_thousands(0), "0");
        assert_eq!(format_thousands(999), "999");
        assert_eq!(format_thousands(1000), "1,000");
        assert_eq!(format_thousands(1234567), "1,234,567");
    }

    #[test]
    fn test_score_rounded_to_tens() {
        let mut stats = GameStats::new(3);
        stats.score = 1124;
        let mut sb = scoreboard(&stats);
        assert_eq!(sb.score_text(), "1,120");

        stats.score = 12345;
        sb.prep_score(&stats);
        assert_eq!(sb.score_text(), "12,350");
    }

    #[test]
    fn test_button_centered() {
        let button = Button::new("Play", Vec2::new(1200.0, 800.0));
        assert_eq!(button.rect, Rect::new(500.0, 375.0, 200.0, 50.0));
        assert!(button.rect.contains_point(Vec2::new(600.0, 400.0)));
    }

    #[test]
    fn test_prep_ships_one_icon_per_life() {
        let mut stats = GameStats::new(3);
        let mut sb = scoreboard(&stats);
        assert_eq!(sb.ship_icons().len(), 3);
        assert_eq!(sb.ship_icons()[1].left(), 70.0);

        stats.ships_left = 1;
        sb.prep_ships(&stats);
        assert_eq!(sb.ship_icons().len(), 1);
    }

    #[test]
    fn test_check_high_score_refreshes_text() {
        let mut stats = GameStats::new(3);
        let mut sb = scoreboard(&stats);
        stats.score = 50;
        assert!(sb.check_high_score(&mut stats));
        assert_eq!(sb.high_score_text(), "50");
        assert!(!sb.check_high_score(&mut stats));
    }

    #[test]
    fn test_check_high_score_picks_up_record_raised_elsewhere() {
        let mut stats = GameStats::new(3);
        let mut sb = scoreboard(&stats);
        stats.score = 120;
        stats.check_high_score();
        assert_eq!(sb.high_score_text(), "0");

        assert!(sb.check_high_score(&mut stats));
        assert_eq!(sb.high_score_text(), "120");
        assert!(!sb.check_high_score(&mut stats));
    }

    #[test]
    fn test_show_score_draws_hud() {
        let mut stats = GameStats::new(2);
        stats.level = 4;
        let sb = scoreboard(&stats);
        let mut display = HeadlessDisplay::new(1200, 800);
        sb.show_score(&mut display);
        display.present().unwrap();

        assert!(display.drew_text("4"));
        assert_eq!(display.count_blits(Sprite::Ship), 2);
        let right_aligned = display
            .last_frame
            .iter()
            .filter(|c| matches!(c, DrawCall::Text(_, _, TextAlign::Right)))
            .count();
        assert_eq!(right_aligned, 2);
    }
}
