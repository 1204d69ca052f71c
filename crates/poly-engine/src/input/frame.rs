use std::collections::HashSet;

use crate::coords::Vec2;

use super::state::InputState;
use super::types::{InputAction, InputEvent, Key, MouseButton};

/// Per-frame input deltas.
///
/// `InputState` holds what is down right now; `InputFrame` holds what changed
/// since the previous frame. The runtime clears it after every frame.
#[derive(Debug, Default)]
pub struct InputFrame {
    /// Raw events in arrival order.
    pub events: Vec<InputEvent>,

    pub keys_pressed: HashSet<Key>,
    pub keys_released: HashSet<Key>,
    /// Keys that received a platform auto-repeat.
    pub keys_repeated: HashSet<Key>,

    pub buttons_pressed: HashSet<MouseButton>,
    pub buttons_released: HashSet<MouseButton>,

    /// Summed wheel movement in lines.
    pub wheel_lines: Vec2,
    /// Summed wheel movement in logical pixels.
    pub wheel_pixels: Vec2,

    /// Text committed this frame, concatenated.
    pub text: String,
}

impl InputFrame {
    pub fn clear(&mut self) {
        self.events.clear();
        self.keys_pressed.clear();
        self.keys_released.clear();
        self.keys_repeated.clear();
        self.buttons_pressed.clear();
        self.buttons_released.clear();
        self.wheel_lines = Vec2::zero();
        self.wheel_pixels = Vec2::zero();
        self.text.clear();
    }

    pub fn push_event(&mut self, ev: InputEvent) {
        self.events.push(ev);
    }

    /// Classifies `key` for this frame. A press wins over a release that
    /// arrived in the same frame.
    pub fn key_action(&self, state: &InputState, key: Key) -> InputAction {
        if self.keys_pressed.contains(&key) {
            InputAction::Pressed
        } else if self.keys_released.contains(&key) {
            InputAction::Released
        } else if state.key_down(key) && self.keys_repeated.contains(&key) {
            InputAction::HeldRepeat
        } else if state.key_down(key) {
            InputAction::Held
        } else {
            InputAction::Untouched
        }
    }

    pub fn key_pressed(&self, key: Key) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn button_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }
}
