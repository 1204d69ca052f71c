use anyhow::{Context, Result};

use super::Clipboard;

/// OS clipboard through `arboard`.
pub struct SystemClipboard {
    inner: arboard::Clipboard,
}

impl SystemClipboard {
    pub fn new() -> Result<Self> {
        let inner = arboard::Clipboard::new().context("failed to open system clipboard")?;
        Ok(Self { inner })
    }
}

impl Clipboard for SystemClipboard {
    fn text(&mut self) -> Result<String> {
        self.inner.get_text().context("failed to read clipboard text")
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        self.inner.set_text(text).context("failed to write clipboard text")
    }
}

/// Process-local clipboard.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    text: Option<String>,
}

impl Clipboard for MemoryClipboard {
    fn text(&mut self) -> Result<String> {
        self.text.clone().context("clipboard is empty")
    }

    fn set_text(&mut self, text: &str) -> Result<()> {
        self.text = Some(text.to_owned());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_clipboard_round_trips_text() {
        let mut cb = MemoryClipboard::default();
        assert!(cb.text().is_err());
        cb.set_text("hello").unwrap();
        assert_eq!(cb.text().unwrap(), "hello");
        cb.set_text("").unwrap();
        assert_eq!(cb.text().unwrap(), "");
    }
}
