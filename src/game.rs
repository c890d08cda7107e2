//! Frame loop
//!
//! Binds the simulation to a platform. Each frame polls input, advances the
//! simulation one step, reacts to what happened (sounds, scoreboard, cursor)
//! and draws. While the post-hit pause runs, frames only count down.

use std::io;
use std::thread;
use std::time::{Duration, Instant};

use crate::audio::{AudioManager, AudioSink, MusicTrack, SoundEffect};
use crate::consts::FRAME_DT;
use crate::platform::{Display, InputSource, Sprite};
use crate::settings::Settings;
use crate::sim::{GameEvent, GamePhase, GameState, Rect, handle_event, tick};
use crate::ui::{Button, Scoreboard};

pub use crate::sim::LoopControl;

/// Game instance holding state and its platform collaborators
pub struct Game<D: Display, I: InputSource, S: AudioSink> {
    state: GameState,
    display: D,
    input: I,
    audio: AudioManager<S>,
    play_button: Button,
    scoreboard: Scoreboard,
    frame: u64,
}

impl<D: Display, I: InputSource, S: AudioSink> Game<D, I, S> {
    /// Create a game sized to the display, inactive with the Play button up
    pub fn new(mut settings: Settings, mut display: D, input: I, sink: S) -> Self {
        let (width, height) = display.size();
        if width > 0 && height > 0 {
            settings.screen_width = width;
            settings.screen_height = height;
        }

        let state = GameState::new(settings);
        let screen = state.settings.screen_size();
        let play_button = Button::new("Play", screen);
        let scoreboard = Scoreboard::new(screen, state.settings.ship_size(), &state.stats);

        let mut audio = AudioManager::new(sink, &state.settings);
        audio.loop_music(MusicTrack::Theme);
        display.set_cursor_visible(state.cursor_visible);

        log::info!(
            "Alien Invasion ready: {}x{}, {} aliens in the fleet",
            state.settings.screen_width,
            state.settings.screen_height,
            state.aliens.len()
        );

        Self {
            state,
            display,
            input,
            audio,
            play_button,
            scoreboard,
            frame: 0,
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn input(&self) -> &I {
        &self.input
    }

    pub fn audio(&self) -> &AudioManager<S> {
        &self.audio
    }

    pub fn scoreboard(&self) -> &Scoreboard {
        &self.scoreboard
    }

    pub fn play_button(&self) -> &Rect {
        &self.play_button.rect
    }

    /// Frames run so far
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Run one frame
    pub fn run_frame(&mut self) -> io::Result<LoopControl> {
        self.frame += 1;

        if self.state.phase() == GamePhase::HitPause {
            tick(&mut self.state);
            return Ok(LoopControl::Continue);
        }

        for event in self.input.poll()? {
            if handle_event(&mut self.state, &event, &self.play_button.rect) == LoopControl::Quit {
                return Ok(LoopControl::Quit);
            }
        }

        tick(&mut self.state);
        self.dispatch_events();

        // A hit this frame freezes the screen as it was
        if self.state.phase() != GamePhase::HitPause {
            self.render()?;
        }
        Ok(LoopControl::Continue)
    }

    /// Run until quit, pacing frames at the fixed frame rate
    pub fn run(&mut self) -> io::Result<()> {
        let frame_time = Duration::from_secs_f32(FRAME_DT);
        loop {
            let frame_start = Instant::now();
            if self.run_frame()? == LoopControl::Quit {
                break;
            }
            let elapsed = frame_start.elapsed();
            if elapsed < frame_time {
                thread::sleep(frame_time - elapsed);
            }
        }
        log::info!(
            "Exiting after {} frames, high score {}",
            self.frame,
            self.state.stats.high_score
        );
        Ok(())
    }

    fn dispatch_events(&mut self) {
        for event in self.state.drain_events() {
            match event {
                GameEvent::GameStarted => {
                    self.scoreboard.prep_images(&self.state.stats);
                    self.display.set_cursor_visible(self.state.cursor_visible);
                }
                GameEvent::BulletFired => self.audio.play(SoundEffect::BulletFire),
                GameEvent::AliensDestroyed { .. } => {
                    self.audio.play(SoundEffect::AlienExplosion);
                    self.scoreboard.prep_score(&self.state.stats);
                    self.scoreboard.check_high_score(&mut self.state.stats);
                }
                GameEvent::FleetCleared { .. } => self.scoreboard.prep_level(&self.state.stats),
                GameEvent::ShipHit { .. } => self.scoreboard.prep_ships(&self.state.stats),
                GameEvent::GameOver => {
                    self.display.set_cursor_visible(self.state.cursor_visible);
                }
            }
        }
    }

    /// Draw background, ship, bullets, aliens, HUD and (when idle) the Play button
    fn render(&mut self) -> io::Result<()> {
        let settings = &self.state.settings;
        let screen = settings.screen_size();

        self.display.fill(settings.bg_color);
        self.display
            .blit(Sprite::Background, Rect::new(0.0, 0.0, screen.x, screen.y));
        self.display.blit(Sprite::Ship, self.state.ship.rect);
        for bullet in &self.state.bullets {
            self.display.fill_rect(bullet.rect, settings.bullet_color);
        }
        for alien in &self.state.aliens {
            self.display.blit(Sprite::Alien, alien.rect);
        }

        self.scoreboard.show_score(&mut self.display);

        if !self.state.stats.game_active {
            self.play_button.draw_button(&mut self.display);
        }

        self.display.present()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::platform::headless::{HeadlessDisplay, RecordingAudio, ScriptedInput};
    use crate::sim::{InputEvent, Key};
    use glam::Vec2;

    type TestGame = Game<HeadlessDisplay, ScriptedInput, RecordingAudio>;

    fn game(input: ScriptedInput) -> TestGame {
        Game::new(
            Settings::default(),
            HeadlessDisplay::new(1200, 800),
            input,
            RecordingAudio::default(),
        )
    }

    fn click_play() -> InputEvent {
        InputEvent::PointerDown(Vec2::new(600.0, 400.0))
    }

    #[test]
    fn test_new_loops_theme_and_shows_cursor() {
        let g = game(ScriptedInput::new());
        assert_eq!(g.audio().sink().music, vec![MusicTrack::Theme]);
        assert!(g.display().cursor_visible);
        assert_eq!(*g.play_button(), Rect::new(500.0, 375.0, 200.0, 50.0));
    }

    #[test]
    fn test_game_adopts_display_size() {
        let g: TestGame = Game::new(
            Settings::default(),
            HeadlessDisplay::new(800, 600),
            ScriptedInput::new(),
            RecordingAudio::default(),
        );
        assert_eq!(g.state().settings.screen_width, 800);
        assert_eq!(g.state().ship.rect.center_x(), 400.0);
    }

    #[test]
    fn test_inactive_frame_draws_play_button() {
        let mut g = game(ScriptedInput::new());
        assert_eq!(g.run_frame().unwrap(), LoopControl::Continue);
        assert!(g.display().drew_text("Play"));
        assert_eq!(g.display().count_blits(Sprite::Alien), 36);
    }

    #[test]
    fn test_start_hides_cursor_and_button() {
        let mut g = game(ScriptedInput::new().at(0, click_play()));
        g.run_frame().unwrap();
        assert!(g.state().stats.game_active);
        assert!(!g.display().cursor_visible);
        assert!(!g.display().drew_text("Play"));
    }

    #[test]
    fn test_fire_plays_sound() {
        let input = ScriptedInput::new()
            .at(0, click_play())
            .at(1, InputEvent::KeyDown(Key::Space))
            .at(1, InputEvent::KeyUp(Key::Space));
        let mut g = game(input);
        g.run_frame().unwrap();
        g.run_frame().unwrap();
        assert_eq!(g.state().bullets.len(), 1);
        assert_eq!(g.audio().sink().effects, vec![SoundEffect::BulletFire]);
    }

    #[test]
    fn test_quit_stops_before_tick() {
        let mut g = game(ScriptedInput::new().at(0, InputEvent::Quit));
        assert_eq!(g.run_frame().unwrap(), LoopControl::Quit);
        assert_eq!(g.display().frames_presented, 0);
    }

    #[test]
    fn test_hit_pause_skips_polling_and_drawing() {
        let mut g = game(ScriptedInput::new().at(0, click_play()));
        g.run_frame().unwrap();
        let presented = g.display().frames_presented;

        // Push an alien onto the ship
        let ship_pos = g.state().ship.rect.pos;
        g.state_mut().aliens[0].rect.pos = ship_pos + Vec2::new(10.0, -20.0);
        g.run_frame().unwrap();
        assert_eq!(g.state().phase(), GamePhase::HitPause);
        assert_eq!(g.scoreboard().ship_icons().len(), 2);

        let polls = g.input().polls();
        for _ in 0..30 {
            g.run_frame().unwrap();
        }
        assert_eq!(g.input().polls(), polls);
        assert_eq!(g.display().frames_presented, presented);
        assert_eq!(g.state().phase(), GamePhase::Active);

        g.run_frame().unwrap();
        assert_eq!(g.display().frames_presented, presented + 1);
    }
}
