/// Live controller source: keyboard plus optional gamepad.
///
/// `poll()` drains input once per frame and reports the steering request.
/// Abort and quit requests are latched until `reset_signals()` so a press
/// seen during one frame is still reported when the round checks for it.

use crate::config::GamepadConfig;
use crate::domain::entity::Direction;
use crate::sim::controls::ControllerSource;
use super::gamepad::PadState;
use super::input::{KeyboardState, KEYS_ABORT, KEYS_QUIT};

/// What raises the abort signal.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum AbortOn {
    /// Esc or the gamepad cancel button (normal play).
    Cancel,
    /// Any key or button (attract-mode demo).
    AnyKey,
}

pub struct LiveControls {
    keyboard: KeyboardState,
    pad: PadState,
    abort_on: AbortOn,
    abort: bool,
    quit: bool,
}

impl LiveControls {
    pub fn new(gamepad: &GamepadConfig) -> Self {
        let mut pad = PadState::new();
        pad.load_button_config(gamepad);
        LiveControls::with_devices(KeyboardState::new(), pad)
    }

    fn with_devices(keyboard: KeyboardState, pad: PadState) -> Self {
        LiveControls {
            keyboard,
            pad,
            abort_on: AbortOn::Cancel,
            abort: false,
            quit: false,
        }
    }

    pub fn set_abort_on(&mut self, mode: AbortOn) {
        self.abort_on = mode;
    }

    /// Clear latched abort requests. Quit stays latched.
    pub fn reset_signals(&mut self) {
        self.abort = false;
    }

    /// Read all pending input. Call once per frame.
    pub fn refresh(&mut self) {
        self.keyboard.drain_events();
        self.pad.update();
        self.latch();
    }

    fn latch(&mut self) {
        if self.keyboard.ctrl_c_pressed() {
            self.quit = true;
        }
        let abort = match self.abort_on {
            AbortOn::Cancel => self.keyboard.any_pressed(KEYS_ABORT) || self.pad.cancel_pressed(),
            AbortOn::AnyKey => self.keyboard.anything_pressed() || self.pad.any_button_pressed(),
        };
        self.abort |= abort || self.quit;
    }

    /// Ctrl+C seen at any point.
    pub fn quit_requested(&self) -> bool {
        self.quit
    }

    /// Title screen: leave the game (Esc, Q or gamepad cancel).
    pub fn leave_pressed(&self) -> bool {
        self.quit || self.keyboard.any_pressed(KEYS_QUIT) || self.pad.cancel_pressed()
    }

    /// Title screen: start a match on any other key or button.
    pub fn start_pressed(&self) -> bool {
        !self.leave_pressed()
            && (self.keyboard.anything_pressed()
                || self.pad.confirm_pressed()
                || self.pad.any_button_pressed())
    }

    fn direction(&self) -> Option<Direction> {
        self.keyboard.direction().or_else(|| self.pad.direction())
    }
}

impl ControllerSource for LiveControls {
    fn poll(&mut self) -> Option<Direction> {
        self.refresh();
        self.direction()
    }

    fn abort_requested(&mut self) -> bool {
        self.abort
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use super::super::gamepad::Btn;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn controls() -> LiveControls {
        let mut pad = PadState::offline();
        pad.load_button_config(&GamepadConfig {
            confirm: vec!["Start".into()],
            cancel: vec!["Select".into()],
        });
        LiveControls::with_devices(KeyboardState::new(), pad)
    }

    fn key(c: &mut LiveControls, code: KeyCode) {
        c.keyboard.inject(KeyEvent::new(code, KeyModifiers::NONE));
        c.latch();
    }

    #[test]
    fn esc_aborts_in_play_but_arrows_do_not() {
        let mut c = controls();
        key(&mut c, KeyCode::Left);
        assert!(!c.abort_requested());
        assert_eq!(c.direction(), Some(Direction::Left));
        key(&mut c, KeyCode::Esc);
        assert!(c.abort_requested());
        assert!(!c.quit_requested());
    }

    #[test]
    fn any_key_aborts_the_demo() {
        let mut c = controls();
        c.set_abort_on(AbortOn::AnyKey);
        key(&mut c, KeyCode::Char('x'));
        assert!(c.abort_requested());
    }

    #[test]
    fn gamepad_cancel_aborts() {
        let mut c = controls();
        c.pad.inject(Btn::Select);
        c.latch();
        assert!(c.abort_requested());
    }

    #[test]
    fn abort_stays_latched_until_reset() {
        let mut c = controls();
        key(&mut c, KeyCode::Esc);
        c.latch();
        assert!(c.abort_requested());
        c.reset_signals();
        assert!(!c.abort_requested());
    }

    #[test]
    fn ctrl_c_quits_and_aborts() {
        let mut c = controls();
        c.keyboard.inject(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        c.latch();
        assert!(c.quit_requested());
        assert!(c.abort_requested());
        c.reset_signals();
        assert!(c.quit_requested());
        assert!(!c.start_pressed());
    }

    #[test]
    fn title_keys_split_start_from_leave() {
        let mut c = controls();
        key(&mut c, KeyCode::Enter);
        assert!(c.start_pressed());
        assert!(!c.leave_pressed());

        let mut c = controls();
        key(&mut c, KeyCode::Char('q'));
        assert!(c.leave_pressed());
        assert!(!c.start_pressed());
    }
}
