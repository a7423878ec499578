/// Gamepad input tracker using gilrs.
///
/// Button mapping for confirm/cancel comes from config.toml.
/// Default mapping:
///   D-pad / Left Stick    →  Steering
///   Start / A             →  Confirm (start a match)
///   Select                →  Cancel (abort to title)

#[cfg(feature = "gamepad")]
use gilrs::{Axis, Button, EventType, Gilrs};
use tracing::warn;

use crate::config::GamepadConfig;
use crate::domain::entity::Direction;

const STICK_DEADZONE: f32 = 0.25;

/// Logical face/shoulder buttons that may be bound to actions.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum Btn {
    A,       // South
    B,       // East
    X,       // West
    Y,       // North
    L1,
    R1,
    Start,
    Select,
}

const BTN_COUNT: usize = 8;

impl Btn {
    fn from_name(s: &str) -> Option<Btn> {
        match s.to_uppercase().as_str() {
            "A" | "SOUTH" => Some(Btn::A),
            "B" | "EAST" => Some(Btn::B),
            "X" | "WEST" => Some(Btn::X),
            "Y" | "NORTH" => Some(Btn::Y),
            "L1" | "LB" => Some(Btn::L1),
            "R1" | "RB" => Some(Btn::R1),
            "START" => Some(Btn::Start),
            "SELECT" | "BACK" => Some(Btn::Select),
            _ => None,
        }
    }

    #[cfg(feature = "gamepad")]
    fn from_gilrs(btn: Button) -> Option<Btn> {
        match btn {
            Button::South => Some(Btn::A),
            Button::East => Some(Btn::B),
            Button::West => Some(Btn::X),
            Button::North => Some(Btn::Y),
            Button::LeftTrigger => Some(Btn::L1),
            Button::RightTrigger => Some(Btn::R1),
            Button::Start => Some(Btn::Start),
            Button::Select => Some(Btn::Select),
            _ => None,
        }
    }
}

/// Per-button state: held (continuous) and just_pressed (edge).
#[derive(Clone, Copy, Debug, Default)]
struct BtnState {
    held: bool,
    just_pressed: bool,
}

struct ActionMap {
    confirm: Vec<Btn>,
    cancel: Vec<Btn>,
}

impl Default for ActionMap {
    fn default() -> Self {
        ActionMap {
            confirm: vec![Btn::Start, Btn::A],
            cancel: vec![Btn::Select],
        }
    }
}

pub struct PadState {
    #[cfg(feature = "gamepad")]
    gilrs: Option<Gilrs>,

    buttons: [BtnState; BTN_COUNT],
    /// D-pad in `Direction` ordinal order.
    dpad: [bool; 4],
    stick_x: f32,
    stick_y: f32,
    action_map: ActionMap,
    pub connected: bool,
}

impl PadState {
    pub fn new() -> Self {
        #[cfg(feature = "gamepad")]
        let (gilrs_opt, connected) = match Gilrs::new() {
            Ok(g) => {
                let has_pad = g.gamepads().next().is_some();
                tracing::debug!(connected = has_pad, "gamepad backend ready");
                (Some(g), has_pad)
            }
            Err(e) => {
                warn!("gamepad backend unavailable: {e}");
                (None, false)
            }
        };
        #[cfg(not(feature = "gamepad"))]
        let connected = false;

        PadState {
            #[cfg(feature = "gamepad")]
            gilrs: gilrs_opt,
            buttons: [BtnState::default(); BTN_COUNT],
            dpad: [false; 4],
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::default(),
            connected,
        }
    }

    /// Load confirm/cancel bindings. Lists with no known button names keep
    /// the defaults.
    pub fn load_button_config(&mut self, cfg: &GamepadConfig) {
        fn parse_list(names: &[String]) -> Vec<Btn> {
            names.iter().filter_map(|s| Btn::from_name(s)).collect()
        }
        let cf = parse_list(&cfg.confirm);
        if cf.is_empty() {
            warn!(names = ?cfg.confirm, "no usable confirm buttons; keeping defaults");
        } else {
            self.action_map.confirm = cf;
        }
        let ca = parse_list(&cfg.cancel);
        if ca.is_empty() {
            warn!(names = ?cfg.cancel, "no usable cancel buttons; keeping defaults");
        } else {
            self.action_map.cancel = ca;
        }
    }

    pub fn update(&mut self) {
        for b in &mut self.buttons {
            b.just_pressed = false;
        }

        #[cfg(feature = "gamepad")]
        self.poll_gilrs();
    }

    #[cfg(feature = "gamepad")]
    fn poll_gilrs(&mut self) {
        let gilrs = match &mut self.gilrs {
            Some(g) => g,
            None => return,
        };

        let events: Vec<_> = std::iter::from_fn(|| gilrs.next_event()).collect();

        for event in events {
            match event.event {
                EventType::ButtonPressed(btn, _) => {
                    self.connected = true;
                    self.set_button(btn, true);
                }
                EventType::ButtonReleased(btn, _) => self.set_button(btn, false),
                EventType::AxisChanged(Axis::LeftStickX, value, _) => self.stick_x = value,
                EventType::AxisChanged(Axis::LeftStickY, value, _) => self.stick_y = value,
                EventType::Connected => self.connected = true,
                EventType::Disconnected => {
                    self.connected = false;
                    self.release_all();
                }
                _ => {}
            }
        }
    }

    #[cfg(feature = "gamepad")]
    fn set_button(&mut self, gilrs_btn: Button, held: bool) {
        let dpad = match gilrs_btn {
            Button::DPadRight => Some(Direction::Right),
            Button::DPadDown => Some(Direction::Down),
            Button::DPadLeft => Some(Direction::Left),
            Button::DPadUp => Some(Direction::Up),
            _ => None,
        };
        if let Some(d) = dpad {
            self.dpad[d.ordinal() as usize] = held;
            return;
        }
        if let Some(btn) = Btn::from_gilrs(gilrs_btn) {
            let state = &mut self.buttons[btn as usize];
            state.held = held;
            state.just_pressed |= held;
        }
    }

    // ── Action queries (config-driven) ──

    fn any_just_pressed(&self, btns: &[Btn]) -> bool {
        btns.iter().any(|&b| self.buttons[b as usize].just_pressed)
    }

    pub fn confirm_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.confirm)
    }

    pub fn cancel_pressed(&self) -> bool {
        self.any_just_pressed(&self.action_map.cancel)
    }

    pub fn any_button_pressed(&self) -> bool {
        self.buttons.iter().any(|b| b.just_pressed)
    }

    /// Steering from d-pad, falling back to the left stick.
    pub fn direction(&self) -> Option<Direction> {
        for d in [Direction::Up, Direction::Down, Direction::Left, Direction::Right] {
            if self.dpad[d.ordinal() as usize] {
                return Some(d);
            }
        }
        // Stick y is positive upwards.
        if self.stick_y > STICK_DEADZONE {
            Some(Direction::Up)
        } else if self.stick_y < -STICK_DEADZONE {
            Some(Direction::Down)
        } else if self.stick_x < -STICK_DEADZONE {
            Some(Direction::Left)
        } else if self.stick_x > STICK_DEADZONE {
            Some(Direction::Right)
        } else {
            None
        }
    }

    /// State with no backend attached.
    #[cfg(test)]
    pub fn offline() -> Self {
        PadState {
            #[cfg(feature = "gamepad")]
            gilrs: None,
            buttons: [BtnState::default(); BTN_COUNT],
            dpad: [false; 4],
            stick_x: 0.0,
            stick_y: 0.0,
            action_map: ActionMap::default(),
            connected: false,
        }
    }

    /// Mark a bound button as just pressed.
    #[cfg(test)]
    pub fn inject(&mut self, btn: Btn) {
        self.buttons[btn as usize] = BtnState { held: true, just_pressed: true };
    }

    #[cfg_attr(not(feature = "gamepad"), allow(dead_code))]
    fn release_all(&mut self) {
        self.buttons = [BtnState::default(); BTN_COUNT];
        self.dpad = [false; 4];
        self.stick_x = 0.0;
        self.stick_y = 0.0;
    }
}

impl Default for PadState {
    fn default() -> Self {
        Self::new()
    }
}
