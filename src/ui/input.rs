/// Keyboard state tracker.
///
/// Tracks which keys are currently held down, enabling:
///   - Steering while an arrow key is held
///   - Edge-triggered actions (start, abort) on the initial press only
///
/// Terminals rarely report key releases, so a key counts as held until
/// no Press/Repeat event has been seen for `HOLD_TIMEOUT`.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::Direction;

/// After this duration without a Press/Repeat event, consider the key released.
const HOLD_TIMEOUT: Duration = Duration::from_millis(160);

// ── Key Constants ──

pub const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
pub const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
pub const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
pub const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
pub const KEYS_ABORT: &[KeyCode] = &[KeyCode::Esc];
pub const KEYS_QUIT: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('q'), KeyCode::Char('Q')];

fn steer(code: &KeyCode) -> Option<Direction> {
    if KEYS_UP.contains(code) {
        Some(Direction::Up)
    } else if KEYS_DOWN.contains(code) {
        Some(Direction::Down)
    } else if KEYS_LEFT.contains(code) {
        Some(Direction::Left)
    } else if KEYS_RIGHT.contains(code) {
        Some(Direction::Right)
    } else {
        None
    }
}

pub struct KeyboardState {
    last_active: HashMap<KeyCode, Instant>,
    /// Keys that went from "not held" to "held" in the last drain.
    fresh_presses: Vec<KeyCode>,
    raw_events: Vec<KeyEvent>,
}

impl KeyboardState {
    pub fn new() -> Self {
        KeyboardState {
            last_active: HashMap::with_capacity(16),
            fresh_presses: Vec::with_capacity(8),
            raw_events: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events without blocking.
    pub fn drain_events(&mut self) {
        self.fresh_presses.clear();
        self.raw_events.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                self.record(key, Instant::now());
            }
        }
        self.expire(Instant::now());
    }

    fn record(&mut self, key: KeyEvent, now: Instant) {
        self.raw_events.push(key);
        if key.kind == KeyEventKind::Release {
            return;
        }
        let was_held = self.is_held_at(key.code, now);
        self.last_active.insert(key.code, now);
        if !was_held {
            self.fresh_presses.push(key.code);
        }
    }

    fn expire(&mut self, now: Instant) {
        self.last_active.retain(|_, t| now.duration_since(*t) < HOLD_TIMEOUT);
    }

    #[cfg(test)]
    pub fn any_held(&self, codes: &[KeyCode]) -> bool {
        let now = Instant::now();
        codes.iter().any(|c| self.is_held_at(*c, now))
    }

    pub fn any_pressed(&self, codes: &[KeyCode]) -> bool {
        codes.iter().any(|c| self.fresh_presses.contains(c))
    }

    /// Any key at all was pressed in the last drain.
    pub fn anything_pressed(&self) -> bool {
        !self.fresh_presses.is_empty()
    }

    pub fn ctrl_c_pressed(&self) -> bool {
        self.raw_events.iter().any(|k| {
            k.modifiers.contains(KeyModifiers::CONTROL)
                && (k.code == KeyCode::Char('c') || k.code == KeyCode::Char('C'))
        })
    }

    /// Steering request from the newest direction key: the last fresh
    /// press of this drain, otherwise the most recently active held key.
    pub fn direction(&self) -> Option<Direction> {
        if let Some(dir) = self.fresh_presses.iter().rev().find_map(steer) {
            return Some(dir);
        }
        let now = Instant::now();
        self.last_active
            .iter()
            .filter(|(_, t)| now.duration_since(**t) < HOLD_TIMEOUT)
            .filter_map(|(code, t)| steer(code).map(|dir| (*t, dir)))
            .max_by_key(|(t, _)| *t)
            .map(|(_, dir)| dir)
    }

    /// Feed a key press as if it came from the terminal.
    #[cfg(test)]
    pub fn inject(&mut self, key: KeyEvent) {
        self.record(key, Instant::now());
    }

    fn is_held_at(&self, code: KeyCode, now: Instant) -> bool {
        self.last_active
            .get(&code)
            .is_some_and(|t| now.duration_since(*t) < HOLD_TIMEOUT)
    }
}

impl Default for KeyboardState {
    fn default() -> Self {
        Self::new()
    }
}
