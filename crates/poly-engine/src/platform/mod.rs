//! Pass-through providers the application reaches through one context.
//!
//! [`Keyboard`] and [`Mouse`] are read-only views of window input and are
//! implemented by [`InputState`](crate::input::InputState). [`Clipboard`] and
//! [`FileStore`] wrap the OS; swap them for in-memory versions in tests.

mod clipboard;
mod files;
mod input;

use std::io;
use std::path::Path;

use crate::coords::Vec2;
use crate::input::{ButtonState, Key, Modifiers, MouseButton};

pub use clipboard::{MemoryClipboard, SystemClipboard};
pub use files::DirFileStore;

pub trait Keyboard {
    fn key_state(&self, key: Key) -> ButtonState;
    fn modifiers(&self) -> Modifiers;

    fn is_key_down(&self, key: Key) -> bool {
        self.key_state(key).is_down()
    }
}

pub trait Mouse {
    fn button_state(&self, button: MouseButton) -> ButtonState;

    /// Pointer position in shape space, `None` while outside the window.
    fn position(&self) -> Option<Vec2>;

    fn is_button_down(&self, button: MouseButton) -> bool {
        self.button_state(button).is_down()
    }
}

pub trait Clipboard {
    fn text(&mut self) -> anyhow::Result<String>;
    fn set_text(&mut self, text: &str) -> anyhow::Result<()>;
}

/// Whole-file byte storage.
pub trait FileStore {
    fn load_bytes(&self, path: &Path) -> io::Result<Vec<u8>>;
    fn save_bytes(&self, path: &Path, data: &[u8]) -> io::Result<()>;

    /// Loads a file as UTF-8. Invalid UTF-8 is `ErrorKind::InvalidData`.
    fn load_string(&self, path: &Path) -> io::Result<String> {
        let bytes = self.load_bytes(path)?;
        String::from_utf8(bytes).map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn save_string(&self, path: &Path, text: &str) -> io::Result<()> {
        self.save_bytes(path, text.as_bytes())
    }
}

/// Owned clipboard and file providers handed to the runtime.
pub struct Providers {
    pub clipboard: Box<dyn Clipboard>,
    pub files: Box<dyn FileStore>,
}

impl Providers {
    /// OS clipboard (in-memory if unavailable) and files under `file_root`.
    pub fn system(file_root: impl Into<std::path::PathBuf>) -> Self {
        let clipboard: Box<dyn Clipboard> = match SystemClipboard::new() {
            Ok(cb) => Box::new(cb),
            Err(e) => {
                log::warn!("system clipboard unavailable, using in-memory clipboard: {e:#}");
                Box::new(MemoryClipboard::default())
            }
        };
        Self { clipboard, files: Box::new(DirFileStore::new(file_root)) }
    }
}

/// Per-frame view of every provider.
pub struct Platform<'a> {
    pub keyboard: &'a dyn Keyboard,
    pub mouse: &'a dyn Mouse,
    pub clipboard: &'a mut dyn Clipboard,
    pub files: &'a dyn FileStore,
}
