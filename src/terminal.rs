//! Line-mode console helpers and the raw-mode terminal session used by the
//! cursor picker.

use std::io::{self, BufRead, Cursor, Stdout, Write};

use crossterm::cursor::MoveTo;
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, Clear, ClearType, EnterAlternateScreen,
    LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use crate::error::{NavError, Result};

/// A source of operator input lines.
///
/// `Stdin` is read without holding its lock between calls, so launched
/// tools and other prompts can share it.
pub trait LineInput {
    /// Reads one line into `buf`, returning 0 at end of input.
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize>;
}

impl LineInput for io::Stdin {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        io::Stdin::read_line(self, buf)
    }
}

impl<T: AsRef<[u8]>> LineInput for Cursor<T> {
    fn read_line(&mut self, buf: &mut String) -> io::Result<usize> {
        BufRead::read_line(self, buf)
    }
}

pub fn clear_screen<W: Write>(out: &mut W) -> io::Result<()> {
    execute!(out, Clear(ClearType::All), MoveTo(0, 0))
}

/// Prints `message` and blocks until the operator presses Enter.
pub fn pause<R: LineInput, W: Write>(input: &mut R, out: &mut W, message: &str) -> io::Result<()> {
    write!(out, "{message}")?;
    out.flush()?;
    input.read_line(&mut String::new())?;
    Ok(())
}

/// Raw keyboard mode plus the alternate screen, held for as long as the
/// value lives. Dropping it restores the line-mode terminal on every path,
/// including early returns and errors.
pub struct TerminalSession {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalSession {
    pub fn enter() -> Result<Self> {
        enable_raw_mode().map_err(NavError::RawModeUnavailable)?;
        let mut stdout = io::stdout();
        if let Err(err) = execute!(stdout, EnterAlternateScreen) {
            let _ = disable_raw_mode();
            return Err(NavError::RawModeUnavailable(err));
        }
        let mut terminal = match Terminal::new(CrosstermBackend::new(stdout)) {
            Ok(terminal) => terminal,
            Err(err) => {
                let _ = disable_raw_mode();
                let _ = execute!(io::stdout(), LeaveAlternateScreen);
                return Err(NavError::RawModeUnavailable(err));
            }
        };
        let _ = terminal.hide_cursor();
        Ok(Self { terminal })
    }

    pub fn terminal(&mut self) -> &mut Terminal<CrosstermBackend<Stdout>> {
        &mut self.terminal
    }
}

impl Drop for TerminalSession {
    fn drop(&mut self) {
        if let Err(err) = disable_raw_mode() {
            log::error!("failed to leave raw mode: {err}");
        }
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_line_input() {
        let mut input = Cursor::new("first\nsecond\n");
        let mut buf = String::new();
        assert_eq!(LineInput::read_line(&mut input, &mut buf).unwrap(), 6);
        assert_eq!(buf, "first\n");
        buf.clear();
        LineInput::read_line(&mut input, &mut buf).unwrap();
        assert_eq!(buf, "second\n");
        buf.clear();
        assert_eq!(LineInput::read_line(&mut input, &mut buf).unwrap(), 0);
    }

    #[test]
    fn test_pause_consumes_one_line() {
        let mut input = Cursor::new("\nnext\n");
        let mut out = Vec::new();
        pause(&mut input, &mut out, "Press Enter...").unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Press Enter...");
        let mut rest = String::new();
        LineInput::read_line(&mut input, &mut rest).unwrap();
        assert_eq!(rest, "next\n");
    }

    #[test]
    fn test_clear_screen_emits_escape_sequence() {
        let mut out = Vec::new();
        clear_screen(&mut out).unwrap();
        assert!(out.starts_with(b"\x1b["));
    }
}
