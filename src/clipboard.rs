// src/clipboard.rs
// Where the joined file contents end up: the system clipboard or stdout.

use std::io::Write;

use anyhow::{Context, Result};
use arboard::Clipboard;

pub trait ClipboardWriter {
    fn write(&mut self, content: &str) -> Result<()>;
}

/// The OS clipboard via arboard
pub struct SystemClipboard;

impl ClipboardWriter for SystemClipboard {
    fn write(&mut self, content: &str) -> Result<()> {
        let mut clipboard = Clipboard::new().context("Failed to initialize clipboard")?;
        clipboard
            .set_text(content)
            .context("Failed to set clipboard text")?;
        Ok(())
    }
}

/// Prints instead of copying (`--print`)
pub struct StdoutWriter;

impl ClipboardWriter for StdoutWriter {
    fn write(&mut self, content: &str) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout
            .write_all(content.as_bytes())
            .and_then(|_| stdout.flush())
            .context("Failed to write to stdout")?;
        Ok(())
    }
}
