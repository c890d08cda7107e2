//! Terminal backend (crossterm)
//!
//! The game world keeps its pixel coordinates; a [`Viewport`] scales them onto
//! the terminal's character grid. Input is read with a zero-timeout poll so the
//! frame loop never blocks.

use std::collections::HashMap;
use std::io::{self, Write};
use std::time::Duration;

use crossterm::{
    ExecutableCommand, QueueableCommand, cursor,
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
        KeyModifiers, KeyboardEnhancementFlags, MouseButton, MouseEvent, MouseEventKind,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    style::{Color, Print, SetBackgroundColor, SetForegroundColor},
    terminal,
};
use glam::Vec2;

use super::{Display, InputSource, Sprite, TextAlign};
use crate::settings::Rgb;
use crate::sim::{InputEvent, Key, Rect};

/// Without key-release reporting a key counts as held while press or repeat
/// events keep arriving within this many frames. Covers the usual key-repeat
/// delay at 60 FPS.
const HOLD_WINDOW: u64 = 30;

/// Raw mode, alternate screen and mouse capture for the lifetime of the value
pub struct TerminalSession {
    keyboard_enhanced: bool,
}

impl TerminalSession {
    pub fn start() -> io::Result<Self> {
        let mut out = io::stdout();
        terminal::enable_raw_mode()?;
        // From here on, dropping the guard restores the terminal
        let mut session = Self {
            keyboard_enhanced: false,
        };
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;
        out.execute(EnableMouseCapture)?;

        // Kitty-protocol terminals report key releases; others fall back to
        // the hold window
        session.keyboard_enhanced = terminal::supports_keyboard_enhancement().unwrap_or(false)
            && out
                .execute(PushKeyboardEnhancementFlags(
                    KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
                ))
                .is_ok();
        log::info!(
            "Terminal session started (key releases: {})",
            session.keyboard_enhanced
        );

        Ok(session)
    }

    pub fn keyboard_enhanced(&self) -> bool {
        self.keyboard_enhanced
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let mut out = io::stdout();
        if self.keyboard_enhanced {
            let _ = out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = out.execute(DisableMouseCapture);
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}

/// Maps world pixels onto terminal cells
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    world: Vec2,
    cols: u16,
    rows: u16,
}

impl Viewport {
    pub fn new(world: Vec2, cols: u16, rows: u16) -> Self {
        Self {
            world,
            cols: cols.max(1),
            rows: rows.max(1),
        }
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    /// World size of one cell
    pub fn cell_size(&self) -> Vec2 {
        self.world / Vec2::new(self.cols as f32, self.rows as f32)
    }

    /// Cell containing a world point (may lie outside the grid)
    pub fn to_cell(&self, p: Vec2) -> (i32, i32) {
        let c = p / self.cell_size();
        (c.x.floor() as i32, c.y.floor() as i32)
    }

    /// World position of a cell's center
    pub fn to_world(&self, col: u16, row: u16) -> Vec2 {
        (Vec2::new(col as f32, row as f32) + 0.5) * self.cell_size()
    }

    /// Cells covered by a rectangle, clipped to the grid. Anything with a
    /// non-empty on-screen area covers at least one cell.
    pub fn cells_covering(&self, rect: Rect) -> Option<(u16, u16, u16, u16)> {
        let cell = self.cell_size();
        let x0 = (rect.left() / cell.x).floor() as i32;
        let y0 = (rect.top() / cell.y).floor() as i32;
        let x1 = ((rect.right() / cell.x).ceil() as i32).max(x0 + 1);
        let y1 = ((rect.bottom() / cell.y).ceil() as i32).max(y0 + 1);

        let x0 = x0.max(0);
        let y0 = y0.max(0);
        let x1 = x1.min(self.cols as i32);
        let y1 = y1.min(self.rows as i32);
        if x0 >= x1 || y0 >= y1 {
            return None;
        }
        Some((x0 as u16, y0 as u16, x1 as u16, y1 as u16))
    }
}

fn color(c: Rgb) -> Color {
    Color::Rgb {
        r: c.0,
        g: c.1,
        b: c.2,
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    ch: char,
    fg: Rgb,
    bg: Rgb,
}

impl Cell {
    fn blank(bg: Rgb) -> Self {
        Self { ch: ' ', fg: bg, bg }
    }
}

fn sprite_glyph(sprite: Sprite) -> Option<(char, Rgb)> {
    match sprite {
        // The background is the plain fill colour
        Sprite::Background => None,
        Sprite::Ship => Some(('A', Rgb::HONEYDEW)),
        Sprite::Alien => Some(('W', Rgb::SHEEN_GREEN)),
    }
}

/// Character-grid display over any writer
pub struct TerminalDisplay<W: Write> {
    out: W,
    world: Vec2,
    viewport: Viewport,
    grid: Vec<Cell>,
    /// Re-query the terminal size before each present
    follow_terminal: bool,
}

impl TerminalDisplay<io::Stdout> {
    /// Display sized to the current terminal
    pub fn stdout(world: Vec2) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        let mut display = Self::with_grid(io::stdout(), world, cols, rows);
        display.follow_terminal = true;
        Ok(display)
    }
}

impl<W: Write> TerminalDisplay<W> {
    pub fn with_grid(out: W, world: Vec2, cols: u16, rows: u16) -> Self {
        let viewport = Viewport::new(world, cols, rows);
        Self {
            out,
            world,
            viewport,
            grid: vec![Cell::blank(Rgb::RAISIN_BLACK); cols.max(1) as usize * rows.max(1) as usize],
            follow_terminal: false,
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Change the grid size, clearing its contents
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.viewport = Viewport::new(self.world, cols, rows);
        let len = self.viewport.cols() as usize * self.viewport.rows() as usize;
        self.grid = vec![Cell::blank(Rgb::RAISIN_BLACK); len];
        log::debug!("Terminal grid resized to {}x{}", cols, rows);
    }

    /// Character at a cell, for inspection
    pub fn char_at(&self, col: u16, row: u16) -> Option<char> {
        self.index(col as i32, row as i32).map(|i| self.grid[i].ch)
    }

    pub fn row_text(&self, row: u16) -> String {
        (0..self.viewport.cols())
            .filter_map(|col| self.char_at(col, row))
            .collect()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        let (cols, rows) = (self.viewport.cols() as i32, self.viewport.rows() as i32);
        if col < 0 || row < 0 || col >= cols || row >= rows {
            return None;
        }
        Some((row * cols + col) as usize)
    }

    fn cells_mut(&mut self, rect: Rect, mut f: impl FnMut(&mut Cell)) {
        let Some((x0, y0, x1, y1)) = self.viewport.cells_covering(rect) else {
            return;
        };
        let cols = self.viewport.cols() as usize;
        for row in y0..y1 {
            for col in x0..x1 {
                f(&mut self.grid[row as usize * cols + col as usize]);
            }
        }
    }
}

impl<W: Write> Display for TerminalDisplay<W> {
    fn size(&self) -> (u32, u32) {
        (self.world.x as u32, self.world.y as u32)
    }

    fn fill(&mut self, c: Rgb) {
        self.grid.fill(Cell::blank(c));
    }

    fn blit(&mut self, sprite: Sprite, rect: Rect) {
        if let Some((ch, fg)) = sprite_glyph(sprite) {
            self.cells_mut(rect, |cell| {
                cell.ch = ch;
                cell.fg = fg;
            });
        }
    }

    fn fill_rect(&mut self, rect: Rect, c: Rgb) {
        self.cells_mut(rect, |cell| {
            cell.ch = ' ';
            cell.bg = c;
        });
    }

    fn draw_text(&mut self, text: &str, at: Vec2, align: TextAlign, c: Rgb) {
        let (col, row) = self.viewport.to_cell(at);
        let len = text.chars().count() as i32;
        let start = match align {
            TextAlign::Left => col,
            TextAlign::Center => col - len / 2,
            TextAlign::Right => col - len + 1,
        };
        for (i, ch) in text.chars().enumerate() {
            if let Some(idx) = self.index(start + i as i32, row) {
                self.grid[idx].ch = ch;
                self.grid[idx].fg = c;
            }
        }
    }

    fn set_cursor_visible(&mut self, visible: bool) {
        // No pointer to hide in a terminal; the text cursor stays hidden
        log::trace!("Cursor visible: {}", visible);
    }

    fn present(&mut self) -> io::Result<()> {
        if self.follow_terminal {
            let (cols, rows) = terminal::size()?;
            if (cols, rows) != (self.viewport.cols(), self.viewport.rows()) {
                // Skip this frame; the next one draws at the new size
                self.resize(cols, rows);
                self.out.queue(terminal::Clear(terminal::ClearType::All))?;
                return self.out.flush();
            }
        }

        let cols = self.viewport.cols() as usize;
        let mut last: Option<(Rgb, Rgb)> = None;
        for (row, line) in self.grid.chunks(cols).enumerate() {
            self.out.queue(cursor::MoveTo(0, row as u16))?;
            for cell in line {
                if last != Some((cell.fg, cell.bg)) {
                    self.out.queue(SetForegroundColor(color(cell.fg)))?;
                    self.out.queue(SetBackgroundColor(color(cell.bg)))?;
                    last = Some((cell.fg, cell.bg));
                }
                self.out.queue(Print(cell.ch))?;
            }
        }
        self.out.flush()
    }
}

fn map_key(code: KeyCode) -> Key {
    match code {
        KeyCode::Left => Key::Left,
        KeyCode::Right => Key::Right,
        KeyCode::Char(' ') => Key::Space,
        KeyCode::Char('q') | KeyCode::Char('Q') => Key::Q,
        _ => Key::Other,
    }
}

/// Translates crossterm events into game input.
///
/// Only the movement keys are tracked as held. With key-release reporting,
/// releases become `KeyUp` directly. Otherwise a movement key is released once
/// no press or repeat has arrived for [`HOLD_WINDOW`] frames. Every other key
/// sends `KeyDown` on each press, so taps on Space fire each time and the
/// bullet limit caps the rate.
pub struct TerminalInput {
    viewport: Viewport,
    world: Vec2,
    keyboard_enhanced: bool,
    frame: u64,
    /// Held movement key -> frame it was last seen
    held: HashMap<Key, u64>,
}

impl TerminalInput {
    pub fn new(world: Vec2, cols: u16, rows: u16, keyboard_enhanced: bool) -> Self {
        Self {
            viewport: Viewport::new(world, cols, rows),
            world,
            keyboard_enhanced,
            frame: 0,
            held: HashMap::new(),
        }
    }

    /// Input sized to the current terminal
    pub fn stdin(world: Vec2, keyboard_enhanced: bool) -> io::Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self::new(world, cols, rows, keyboard_enhanced))
    }

    /// Translate one terminal event, appending any game events it produces
    pub fn translate(&mut self, event: Event, out: &mut Vec<InputEvent>) {
        match event {
            Event::Key(KeyEvent {
                code,
                kind,
                modifiers,
                ..
            }) => {
                if code == KeyCode::Esc
                    || (code == KeyCode::Char('c') && modifiers.contains(KeyModifiers::CONTROL))
                {
                    out.push(InputEvent::Quit);
                    return;
                }
                let key = map_key(code);
                let movement = matches!(key, Key::Left | Key::Right);
                match kind {
                    KeyEventKind::Press | KeyEventKind::Repeat if movement => {
                        let already_held = self.held.insert(key, self.frame).is_some();
                        if !already_held {
                            out.push(InputEvent::KeyDown(key));
                        }
                    }
                    KeyEventKind::Press => out.push(InputEvent::KeyDown(key)),
                    KeyEventKind::Repeat => {}
                    KeyEventKind::Release => {
                        self.held.remove(&key);
                        out.push(InputEvent::KeyUp(key));
                    }
                }
            }
            Event::Mouse(MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                ..
            }) => {
                out.push(InputEvent::PointerDown(self.viewport.to_world(column, row)));
            }
            Event::Resize(cols, rows) => {
                self.viewport = Viewport::new(self.world, cols, rows);
            }
            _ => {}
        }
    }

    /// Release keys that went quiet (classic terminals only)
    fn expire_held(&mut self, out: &mut Vec<InputEvent>) {
        if self.keyboard_enhanced {
            return;
        }
        let frame = self.frame;
        let mut expired: Vec<Key> = self
            .held
            .iter()
            .filter(|&(_, &last)| frame.saturating_sub(last) > HOLD_WINDOW)
            .map(|(&key, _)| key)
            .collect();
        expired.sort_by_key(|key| *key as u8);
        for key in expired {
            self.held.remove(&key);
            out.push(InputEvent::KeyUp(key));
        }
    }

    /// Advance the frame counter and release expired keys
    pub fn end_frame(&mut self, out: &mut Vec<InputEvent>) {
        self.expire_held(out);
        self.frame += 1;
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self) -> io::Result<Vec<InputEvent>> {
        let mut events = Vec::new();
        while event::poll(Duration::ZERO)? {
            let ev = event::read()?;
            self.translate(ev, &mut events);
        }
        self.end_frame(&mut events);
        Ok(events)
    }
}
