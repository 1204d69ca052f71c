use std::fmt;

use crate::coords::Vec2;

/// Keyboard key identifier, by physical position on a US layout.
///
/// Keys the runtime cannot name map to `Key::Unknown` with the platform code.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Key {
    Space,
    Escape,
    Enter,
    Tab,
    Backspace,
    Insert,
    Delete,

    ArrowRight,
    ArrowLeft,
    ArrowDown,
    ArrowUp,
    PageUp,
    PageDown,
    Home,
    End,

    CapsLock,
    ScrollLock,
    NumLock,
    PrintScreen,
    Pause,

    F1, F2, F3, F4, F5, F6,
    F7, F8, F9, F10, F11, F12,

    LeftShift,
    LeftControl,
    LeftAlt,
    LeftSuper,
    RightShift,
    RightControl,
    RightAlt,
    RightSuper,
    Menu,

    LeftBracket,
    Backslash,
    RightBracket,
    Grave,
    Apostrophe,
    Comma,
    Minus,
    Period,
    Slash,
    Semicolon,
    Equal,

    Numpad0, Numpad1, Numpad2, Numpad3, Numpad4,
    Numpad5, Numpad6, Numpad7, Numpad8, Numpad9,
    NumpadDecimal,
    NumpadDivide,
    NumpadMultiply,
    NumpadSubtract,
    NumpadAdd,
    NumpadEnter,
    NumpadEqual,

    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    A, B, C, D, E, F, G, H, I, J, K, L, M,
    N, O, P, Q, R, S, T, U, V, W, X, Y, Z,

    Unknown(u32),
}

impl Key {
    /// Either shift, control, alt or super key.
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            Key::LeftShift
                | Key::RightShift
                | Key::LeftControl
                | Key::RightControl
                | Key::LeftAlt
                | Key::RightAlt
                | Key::LeftSuper
                | Key::RightSuper
        )
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Held state of a key or mouse button.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq, Hash)]
pub enum ButtonState {
    #[default]
    Up,
    Down,
}

impl ButtonState {
    #[inline]
    pub fn is_down(self) -> bool {
        self == ButtonState::Down
    }
}

/// What happened to a key during the current frame.
#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub enum InputAction {
    #[default]
    Untouched,
    Pressed,
    /// Down since an earlier frame.
    Held,
    Released,
    /// Down, and the platform sent an auto-repeat this frame.
    HeldRepeat,
}

#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
    Back,
    Forward,
    Other(u16),
}

#[derive(Debug, Copy, Clone, Default, Eq, PartialEq)]
pub struct Modifiers {
    pub shift: bool,
    pub ctrl: bool,
    pub alt: bool,
    /// Super / command / windows key.
    pub meta: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.shift || self.ctrl || self.alt || self.meta
    }
}

/// Mouse wheel delta. `Line` is notched scrolling, `Pixel` is high precision.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum MouseWheelDelta {
    Line(Vec2),
    Pixel(Vec2),
}

/// Platform-agnostic input events emitted by the runtime.
///
/// Positions are logical pixels in shape space: origin at the bottom-left
/// corner of the window, +Y up.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    ModifiersChanged(Modifiers),

    Key {
        key: Key,
        state: ButtonState,
        modifiers: Modifiers,
        /// Platform key code, 0 when unidentified.
        code: u32,
        repeat: bool,
    },

    PointerMoved(Vec2),

    PointerButton {
        button: MouseButton,
        state: ButtonState,
        position: Vec2,
        modifiers: Modifiers,
    },

    MouseWheel {
        delta: MouseWheelDelta,
        modifiers: Modifiers,
    },

    /// Committed text.
    Text(String),

    PointerLeft,

    Focused(bool),
}
