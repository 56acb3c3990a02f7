//! Terminal session and keyboard input
//!
//! Most terminals only report key presses and auto-repeats, not releases.
//! A key counts as held while its last press/repeat is recent enough; when
//! the terminal does report releases, the key drops immediately.

use std::io::{Write, stdout};
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::{ExecutableCommand, cursor, terminal};

use super::InputSource;
use crate::sim::TickInput;

/// A key stays held this long after its last press/repeat event
const HOLD_WINDOW: Duration = Duration::from_millis(150);

/// Raw-mode alternate-screen session; restores the terminal on drop
pub struct TerminalSession {
    keyboard_enhanced: bool,
}

impl TerminalSession {
    pub fn enter() -> std::io::Result<Self> {
        let mut out = stdout();
        terminal::enable_raw_mode()?;
        out.execute(terminal::EnterAlternateScreen)?;
        out.execute(cursor::Hide)?;
        // Key-release reporting where the terminal supports it
        let keyboard_enhanced = out
            .execute(PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
            ))
            .is_ok();
        log::debug!("terminal session started (release events: {keyboard_enhanced})");
        Ok(Self { keyboard_enhanced })
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        let mut out = stdout();
        if self.keyboard_enhanced {
            let _ = out.execute(PopKeyboardEnhancementFlags);
        }
        let _ = out.execute(cursor::Show);
        let _ = out.execute(terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
        let _ = out.flush();
    }
}

/// Logical game keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum GameKey {
    Left,
    Right,
    Fire,
}

fn game_key(code: KeyCode) -> Option<GameKey> {
    match code {
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Some(GameKey::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Some(GameKey::Right),
        KeyCode::Char(' ') => Some(GameKey::Fire),
        _ => None,
    }
}

fn is_quit(code: KeyCode, modifiers: KeyModifiers) -> bool {
    match code {
        KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => true,
        KeyCode::Char('c') => modifiers.contains(KeyModifiers::CONTROL),
        _ => false,
    }
}

/// Held-key tracker fed by terminal key events
#[derive(Debug, Default)]
pub struct TerminalInput {
    left: Option<Instant>,
    right: Option<Instant>,
    fire: Option<Instant>,
    quit: bool,
}

impl TerminalInput {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, key: GameKey) -> &mut Option<Instant> {
        match key {
            GameKey::Left => &mut self.left,
            GameKey::Right => &mut self.right,
            GameKey::Fire => &mut self.fire,
        }
    }

    /// Apply one key event observed at `now`
    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        match key.kind {
            KeyEventKind::Press | KeyEventKind::Repeat => {
                if key.kind == KeyEventKind::Press && is_quit(key.code, key.modifiers) {
                    self.quit = true;
                }
                if let Some(k) = game_key(key.code) {
                    *self.slot(k) = Some(now);
                }
            }
            KeyEventKind::Release => {
                if let Some(k) = game_key(key.code) {
                    *self.slot(k) = None;
                }
            }
        }
    }

    /// Snapshot of the held keys at `now`
    fn snapshot(&self, now: Instant) -> TickInput {
        let held = |at: Option<Instant>| at.is_some_and(|t| now.duration_since(t) <= HOLD_WINDOW);
        TickInput::from_keys(
            held(self.left),
            held(self.right),
            held(self.fire),
            self.quit,
        )
    }
}

impl InputSource for TerminalInput {
    fn poll(&mut self) -> std::io::Result<TickInput> {
        while event::poll(Duration::ZERO)? {
            if let Event::Key(key) = event::read()? {
                self.handle_key(key, Instant::now());
            }
        }
        Ok(self.snapshot(Instant::now()))
    }
}
