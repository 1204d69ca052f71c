use crate::coords::Vec2;
use crate::input::{ButtonState, InputState, Key, Modifiers, MouseButton};

use super::{Keyboard, Mouse};

impl Keyboard for InputState {
    fn key_state(&self, key: Key) -> ButtonState {
        InputState::key_state(self, key)
    }

    fn modifiers(&self) -> Modifiers {
        self.modifiers
    }
}

impl Mouse for InputState {
    fn button_state(&self, button: MouseButton) -> ButtonState {
        InputState::button_state(self, button)
    }

    fn position(&self) -> Option<Vec2> {
        self.pointer_pos
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputEvent, InputFrame};

    #[test]
    fn input_state_backs_both_views() {
        let mut state = InputState::default();
        let mut frame = InputFrame::default();
        state.apply_event(
            &mut frame,
            InputEvent::Key {
                key: Key::Space,
                state: ButtonState::Down,
                modifiers: Modifiers { ctrl: true, ..Default::default() },
                code: 0,
                repeat: false,
            },
        );
        state.apply_event(&mut frame, InputEvent::PointerMoved(Vec2::new(5.0, 6.0)));

        let keyboard: &dyn Keyboard = &state;
        let mouse: &dyn Mouse = &state;
        assert!(keyboard.is_key_down(Key::Space));
        assert!(!keyboard.is_key_down(Key::Enter));
        assert!(keyboard.modifiers().ctrl);
        assert_eq!(mouse.position(), Some(Vec2::new(5.0, 6.0)));
        assert_eq!(mouse.button_state(MouseButton::Left), ButtonState::Up);
    }
}
