//! Window input: key, mouse button and pointer state.
//!
//! Types here never expose winit; the runtime translates window events into
//! [`InputEvent`]s and feeds them to [`InputState::apply_event`].

mod frame;
mod state;
mod types;

pub use frame::InputFrame;
pub use state::InputState;
pub use types::{ButtonState, InputAction, InputEvent, Key, Modifiers, MouseButton, MouseWheelDelta};
