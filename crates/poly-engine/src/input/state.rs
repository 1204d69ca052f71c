use std::collections::HashSet;

use crate::coords::Vec2;

use super::frame::InputFrame;
use super::types::{ButtonState, InputEvent, Key, Modifiers, MouseButton, MouseWheelDelta};

/// Current input state of the window.
///
/// Transitions are recorded into an [`InputFrame`] as events are applied.
#[derive(Debug, Default)]
pub struct InputState {
    pub modifiers: Modifiers,
    pub focused: bool,

    /// Pointer position in shape space, `None` while outside the window.
    pub pointer_pos: Option<Vec2>,

    pub keys_down: HashSet<Key>,
    pub buttons_down: HashSet<MouseButton>,
}

impl InputState {
    pub fn apply_event(&mut self, frame: &mut InputFrame, ev: InputEvent) {
        match &ev {
            InputEvent::ModifiersChanged(m) => self.modifiers = *m,

            InputEvent::Focused(focused) => {
                self.focused = *focused;
                if !*focused {
                    // Releases are never delivered to an unfocused window.
                    frame.keys_released.extend(self.keys_down.drain());
                    frame.buttons_released.extend(self.buttons_down.drain());
                }
            }

            InputEvent::PointerMoved(pos) => self.pointer_pos = Some(*pos),

            InputEvent::PointerLeft => self.pointer_pos = None,

            InputEvent::Key { key, state, modifiers, repeat, .. } => {
                self.modifiers = *modifiers;
                match state {
                    ButtonState::Down => {
                        if self.keys_down.insert(*key) {
                            frame.keys_pressed.insert(*key);
                        } else if *repeat {
                            frame.keys_repeated.insert(*key);
                        }
                    }
                    ButtonState::Up => {
                        if self.keys_down.remove(key) {
                            frame.keys_released.insert(*key);
                        }
                    }
                }
            }

            InputEvent::PointerButton { button, state, position, modifiers } => {
                self.pointer_pos = Some(*position);
                self.modifiers = *modifiers;
                match state {
                    ButtonState::Down => {
                        if self.buttons_down.insert(*button) {
                            frame.buttons_pressed.insert(*button);
                        }
                    }
                    ButtonState::Up => {
                        if self.buttons_down.remove(button) {
                            frame.buttons_released.insert(*button);
                        }
                    }
                }
            }

            InputEvent::MouseWheel { delta, modifiers } => {
                self.modifiers = *modifiers;
                match delta {
                    MouseWheelDelta::Line(d) => frame.wheel_lines = frame.wheel_lines + *d,
                    MouseWheelDelta::Pixel(d) => frame.wheel_pixels = frame.wheel_pixels + *d,
                }
            }

            InputEvent::Text(text) => frame.text.push_str(text),
        }

        frame.push_event(ev);
    }

    pub fn key_down(&self, key: Key) -> bool {
        self.keys_down.contains(&key)
    }

    pub fn button_down(&self, button: MouseButton) -> bool {
        self.buttons_down.contains(&button)
    }

    pub fn key_state(&self, key: Key) -> ButtonState {
        if self.key_down(key) { ButtonState::Down } else { ButtonState::Up }
    }

    pub fn button_state(&self, button: MouseButton) -> ButtonState {
        if self.button_down(button) { ButtonState::Down } else { ButtonState::Up }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::InputAction;

    fn key(key: Key, state: ButtonState, repeat: bool) -> InputEvent {
        InputEvent::Key { key, state, modifiers: Modifiers::default(), code: 0, repeat }
    }

    fn setup() -> (InputState, InputFrame) {
        (InputState::default(), InputFrame::default())
    }

    // ── keys ──────────────────────────────────────────────────────────────

    #[test]
    fn press_then_hold_then_release() {
        let (mut state, mut frame) = setup();

        state.apply_event(&mut frame, key(Key::A, ButtonState::Down, false));
        assert_eq!(frame.key_action(&state, Key::A), InputAction::Pressed);
        assert_eq!(state.key_state(Key::A), ButtonState::Down);

        frame.clear();
        assert_eq!(frame.key_action(&state, Key::A), InputAction::Held);

        state.apply_event(&mut frame, key(Key::A, ButtonState::Down, true));
        assert_eq!(frame.key_action(&state, Key::A), InputAction::HeldRepeat);

        frame.clear();
        state.apply_event(&mut frame, key(Key::A, ButtonState::Up, false));
        assert_eq!(frame.key_action(&state, Key::A), InputAction::Released);
        assert_eq!(state.key_state(Key::A), ButtonState::Up);

        frame.clear();
        assert_eq!(frame.key_action(&state, Key::A), InputAction::Untouched);
    }

    #[test]
    fn release_without_press_is_ignored() {
        let (mut state, mut frame) = setup();
        state.apply_event(&mut frame, key(Key::Escape, ButtonState::Up, false));
        assert!(frame.keys_released.is_empty());
        assert_eq!(frame.events.len(), 1);
    }

    #[test]
    fn key_events_carry_modifiers() {
        let (mut state, mut frame) = setup();
        let shift = Modifiers { shift: true, ..Default::default() };
        state.apply_event(
            &mut frame,
            InputEvent::Key { key: Key::Z, state: ButtonState::Down, modifiers: shift, code: 0, repeat: false },
        );
        assert!(state.modifiers.shift);
        assert!(state.modifiers.any());
    }

    #[test]
    fn focus_loss_releases_everything() {
        let (mut state, mut frame) = setup();
        state.apply_event(&mut frame, key(Key::LeftShift, ButtonState::Down, false));
        state.apply_event(
            &mut frame,
            InputEvent::PointerButton {
                button: MouseButton::Left,
                state: ButtonState::Down,
                position: Vec2::new(1.0, 1.0),
                modifiers: Modifiers::default(),
            },
        );
        frame.clear();

        state.apply_event(&mut frame, InputEvent::Focused(false));
        assert!(state.keys_down.is_empty());
        assert!(state.buttons_down.is_empty());
        assert!(frame.keys_released.contains(&Key::LeftShift));
        assert!(frame.buttons_released.contains(&MouseButton::Left));
    }

    // ── pointer ───────────────────────────────────────────────────────────

    #[test]
    fn pointer_tracks_moves_and_leaves() {
        let (mut state, mut frame) = setup();
        state.apply_event(&mut frame, InputEvent::PointerMoved(Vec2::new(3.0, 4.0)));
        assert_eq!(state.pointer_pos, Some(Vec2::new(3.0, 4.0)));
        state.apply_event(&mut frame, InputEvent::PointerLeft);
        assert_eq!(state.pointer_pos, None);
    }

    #[test]
    fn button_press_is_recorded_once() {
        let (mut state, mut frame) = setup();
        let press = InputEvent::PointerButton {
            button: MouseButton::Right,
            state: ButtonState::Down,
            position: Vec2::new(10.0, 20.0),
            modifiers: Modifiers::default(),
        };
        state.apply_event(&mut frame, press.clone());
        frame.clear();
        state.apply_event(&mut frame, press);

        assert!(state.button_down(MouseButton::Right));
        assert!(!frame.button_pressed(MouseButton::Right));
        assert_eq!(state.pointer_pos, Some(Vec2::new(10.0, 20.0)));
    }

    #[test]
    fn wheel_and_text_accumulate_per_frame() {
        let (mut state, mut frame) = setup();
        let wheel = |d| InputEvent::MouseWheel { delta: MouseWheelDelta::Line(d), modifiers: Modifiers::default() };
        state.apply_event(&mut frame, wheel(Vec2::new(0.0, 1.0)));
        state.apply_event(&mut frame, wheel(Vec2::new(0.0, 2.0)));
        state.apply_event(&mut frame, InputEvent::Text("a".into()));
        state.apply_event(&mut frame, InputEvent::Text("b".into()));

        assert_eq!(frame.wheel_lines, Vec2::new(0.0, 3.0));
        assert_eq!(frame.text, "ab");

        frame.clear();
        assert_eq!(frame.wheel_lines, Vec2::zero());
        assert!(frame.text.is_empty());
    }
}
