use std::io::{self, Write};

use unicode_width::UnicodeWidthStr;

use super::{MenuView, SelectionResult, Selector};
use crate::error::NavError;
use crate::terminal::{clear_screen, LineInput};

/// A parsed line from the numbered-list prompt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NumericInput {
    Number(u32),
    Command(SelectionResult),
}

/// Interprets one typed line. Command letters are checked before any
/// number parsing.
pub fn parse_numeric_input(line: &str) -> Result<NumericInput, NavError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Err(NavError::EmptyInput);
    }
    let command = match trimmed.to_ascii_lowercase().as_str() {
        "b" => Some(SelectionResult::Back),
        "m" => Some(SelectionResult::Home),
        "p" => Some(SelectionResult::SwitchPackage),
        "q" => Some(SelectionResult::Quit),
        _ => None,
    };
    if let Some(command) = command {
        return Ok(NumericInput::Command(command));
    }
    let number: i64 = trimmed
        .parse()
        .map_err(|_| NavError::NotANumber(trimmed.to_string()))?;
    u32::try_from(number)
        .map(NumericInput::Number)
        .map_err(|_| NavError::InvalidSelection(format!("{number} is not a menu entry")))
}

/// Numbered-list strategy: print the menu, read a line, repeat until the
/// line means something.
pub struct NumericSelector<R, W> {
    input: R,
    output: W,
    clear_screen: bool,
    fallback: bool,
}

impl NumericSelector<io::Stdin, io::Stdout> {
    pub fn stdio(clear_screen: bool) -> Self {
        Self::new(io::stdin(), io::stdout(), clear_screen)
    }
}

impl<R: LineInput, W: Write> NumericSelector<R, W> {
    pub fn new(input: R, output: W, clear_screen: bool) -> Self {
        Self {
            input,
            output,
            clear_screen,
            fallback: false,
        }
    }

    /// Stand-in mode for the cursor picker: also accepts `t` to leave the
    /// current screen.
    pub fn fallback(mut self) -> Self {
        self.fallback = true;
        self
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn clears_screen(&self) -> bool {
        self.clear_screen
    }

    fn render(&mut self, view: &MenuView, notice: Option<&str>) -> io::Result<()> {
        if self.clear_screen {
            clear_screen(&mut self.output)?;
        }
        let out = &mut self.output;
        writeln!(out)?;
        writeln!(out, "{}", view.title)?;
        writeln!(out, "{}", "=".repeat(view.title.width().max(1)))?;
        for choice in &view.choices {
            writeln!(out, "{:>3}) {}", choice.key, choice.label)?;
        }
        writeln!(out)?;
        write!(out, "  b) back   m) main menu")?;
        if view.offers_switch {
            write!(out, "   p) switch package")?;
        }
        write!(out, "   q) quit")?;
        if self.fallback {
            write!(out, "   t) leave")?;
        }
        writeln!(out)?;
        if let Some(notice) = notice {
            writeln!(out, "  ! {notice}")?;
        }
        write!(out, "Select: ")?;
        out.flush()
    }
}

impl<R: LineInput, W: Write> Selector for NumericSelector<R, W> {
    fn select(&mut self, view: &MenuView) -> io::Result<SelectionResult> {
        let mut notice = view.notice.clone();
        loop {
            self.render(view, notice.as_deref())?;
            let mut line = String::new();
            match self.input.read_line(&mut line) {
                Ok(0) => {
                    writeln!(self.output)?;
                    log::info!("input closed, leaving menu");
                    return Ok(SelectionResult::Quit);
                }
                Ok(_) => {}
                Err(err) if err.kind() == io::ErrorKind::InvalidData => {
                    log::debug!("rejected input: {err}");
                    notice = Some("input is not valid text".to_string());
                    continue;
                }
                Err(err) => return Err(err),
            }
            if self.fallback && line.trim().eq_ignore_ascii_case("t") {
                return Ok(SelectionResult::QuitToParent);
            }
            match parse_numeric_input(&line) {
                Ok(NumericInput::Number(key)) => return Ok(SelectionResult::Item(key)),
                Ok(NumericInput::Command(command)) => return Ok(command),
                Err(err) => {
                    log::debug!("rejected input {:?}: {err}", line.trim());
                    notice = Some(err.to_string());
                }
            }
        }
    }
}
