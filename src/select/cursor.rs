use std::io;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::prelude::Alignment;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use super::{MenuView, NumericSelector, SelectionResult, Selector};
use crate::terminal::TerminalSession;

const HINTS: &str = "↑/↓ move  Enter select  ← back  → main menu";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorAction {
    Moved,
    Ignored,
    /// Enter on the entry at this index.
    Confirm(usize),
    Emit(SelectionResult),
}

/// Highlighted position in a list of `len` entries, wrapping at both ends.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CursorState {
    index: usize,
    len: usize,
}

impl CursorState {
    pub fn new(len: usize) -> Self {
        Self { index: 0, len }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn up(&mut self) {
        if self.len > 0 {
            self.index = (self.index + self.len - 1) % self.len;
        }
    }

    pub fn down(&mut self) {
        if self.len > 0 {
            self.index = (self.index + 1) % self.len;
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> CursorAction {
        if key.kind != KeyEventKind::Press {
            return CursorAction::Ignored;
        }
        match key.code {
            KeyCode::Up if self.len > 0 => {
                self.up();
                CursorAction::Moved
            }
            KeyCode::Down if self.len > 0 => {
                self.down();
                CursorAction::Moved
            }
            KeyCode::Enter if self.len > 0 => CursorAction::Confirm(self.index),
            KeyCode::Left => CursorAction::Emit(SelectionResult::Back),
            KeyCode::Right => CursorAction::Emit(SelectionResult::Home),
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                CursorAction::Emit(SelectionResult::Quit)
            }
            KeyCode::Char('p') | KeyCode::Char('P') => {
                CursorAction::Emit(SelectionResult::SwitchPackage)
            }
            KeyCode::Char('q') | KeyCode::Esc => CursorAction::Emit(SelectionResult::Quit),
            _ => CursorAction::Ignored,
        }
    }
}

/// Arrow-key strategy. Holds raw mode only for the duration of one
/// `select` call.
pub struct ArrowSelector {
    indicator: String,
    display_clear: bool,
}

impl ArrowSelector {
    /// `display_clear` only matters when raw mode is unavailable and the
    /// line-mode fallback takes over.
    pub fn new(indicator: impl Into<String>, display_clear: bool) -> Self {
        Self {
            indicator: indicator.into(),
            display_clear,
        }
    }

    fn line_fallback(&self) -> NumericSelector<io::Stdin, io::Stdout> {
        NumericSelector::stdio(self.display_clear).fallback()
    }
}

fn footer(view: &MenuView) -> String {
    if view.offers_switch {
        format!("{HINTS}  p switch package  q quit")
    } else {
        format!("{HINTS}  q quit")
    }
}

impl Selector for ArrowSelector {
    fn select(&mut self, view: &MenuView) -> io::Result<SelectionResult> {
        let mut session = match TerminalSession::enter() {
            Ok(session) => session,
            Err(err) => {
                log::warn!("{err}; falling back to line input");
                return self.line_fallback().select(view);
            }
        };

        let mut cursor = CursorState::new(view.choices.len());
        let mut redraw = true;
        loop {
            if redraw {
                session
                    .terminal()
                    .draw(|frame| render(frame, view, &cursor, &self.indicator))?;
            }
            redraw = match event::read()? {
                Event::Key(key) => match cursor.handle_key(key) {
                    CursorAction::Confirm(index) => {
                        return Ok(SelectionResult::Item(view.choices[index].key))
                    }
                    CursorAction::Emit(result) => return Ok(result),
                    CursorAction::Moved => true,
                    CursorAction::Ignored => false,
                },
                Event::Resize(_, _) => true,
                _ => false,
            };
        }
    }
}

fn render(frame: &mut Frame, view: &MenuView, cursor: &CursorState, indicator: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(1),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(frame.size());

    let title = Paragraph::new(Line::from(Span::styled(
        view.title.as_str(),
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(title, chunks[0]);

    let items: Vec<ListItem> = view
        .choices
        .iter()
        .map(|choice| ListItem::new(format!("{:>3}) {}", choice.key, choice.label)))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
        .highlight_symbol(indicator);
    let mut state = ListState::default();
    if !view.choices.is_empty() {
        state.select(Some(cursor.index()));
    }
    frame.render_stateful_widget(list, chunks[1], &mut state);

    if let Some(notice) = &view.notice {
        frame.render_widget(
            Paragraph::new(format!("! {notice}"))
                .style(Style::default().add_modifier(Modifier::BOLD)),
            chunks[2],
        );
    }
    frame.render_widget(Paragraph::new(footer(view)), chunks[3]);
}
