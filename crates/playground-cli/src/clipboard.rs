//! Clipboard access through the terminal (OSC 52).

use std::io::{self, IsTerminal, Write};

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use playground_session::Clipboard;

/// Copies text by asking the terminal emulator to set the system clipboard.
#[derive(Debug)]
pub struct TerminalClipboard<W: Write> {
    out: W,
}

impl<W: Write> TerminalClipboard<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TerminalClipboard<io::Stdout> {
    /// Clipboard on stdout, if stdout is a terminal.
    #[must_use]
    pub fn detect() -> Option<Self> {
        let stdout = io::stdout();
        stdout.is_terminal().then(|| Self::new(stdout))
    }
}

/// The OSC 52 sequence that puts `text` on the clipboard.
#[must_use]
pub fn osc52(text: &str) -> String {
    format!("\x1b]52;c;{}\x07", STANDARD.encode(text))
}

impl<W: Write> Clipboard for TerminalClipboard<W> {
    fn write_text(&mut self, text: &str) -> io::Result<()> {
        self.out.write_all(osc52(text).as_bytes())?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_osc52_sequence() {
        assert_eq!(osc52("hi"), "\x1b]52;c;aGk=\x07");
    }

    #[test]
    fn test_writes_sequence() {
        let mut clipboard = TerminalClipboard::new(Vec::new());
        clipboard.write_text("https://play.swc.rs/").unwrap();
        let written = String::from_utf8(clipboard.into_inner()).unwrap();
        assert!(written.starts_with("\x1b]52;c;"));
        assert!(written.ends_with('\x07'));
    }
}
