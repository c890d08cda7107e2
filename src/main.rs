//! Alien Invasion entry point
//!
//! Sets up logging and the terminal, then runs the game loop until quit.

use std::io;

use glam::Vec2;

use alien_invasion::Game;
use alien_invasion::Settings;
use alien_invasion::audio::LogSink;
use alien_invasion::platform::terminal::{TerminalDisplay, TerminalInput, TerminalSession};

fn main() -> io::Result<()> {
    env_logger::init();
    log::info!("Alien Invasion (terminal) starting...");

    let settings = Settings::load();
    let world = settings.screen_size();

    let session = TerminalSession::start()?;
    let result = run(settings, world, session.keyboard_enhanced());
    // Restore the terminal before reporting anything
    drop(session);

    if let Err(e) = &result {
        log::error!("Game loop failed: {}", e);
    }
    result
}

fn run(settings: Settings, world: Vec2, keyboard_enhanced: bool) -> io::Result<()> {
    let display = TerminalDisplay::stdout(world)?;
    let input = TerminalInput::stdin(world, keyboard_enhanced)?;
    let mut game = Game::new(settings, display, input, LogSink);
    game.run()
}
