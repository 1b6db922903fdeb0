//! Application state and TUI event loop for the dilepton histogram viewer.
//!
//! [`App`] owns the theme and the current series selection.  The histogram
//! is computed up front, so the loop only redraws on key presses.

use std::io;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};

use oscar_data::histogram::HistogramSet;

use crate::histogram_view::{self, Selection};
use crate::summary_view;
use crate::themes::Theme;

/// Rows reserved for the summary table (borders, header and totals included).
const SUMMARY_MIN_HEIGHT: u16 = 6;

pub struct App {
    pub theme: Theme,
    /// Shown in the header, usually the input path.
    pub source: String,
    pub selection: Selection,
    pub show_summary: bool,
    /// Set to `true` to break out of the event loop on the next iteration.
    pub should_quit: bool,
}

impl App {
    pub fn new(theme_name: &str, source: impl Into<String>) -> Self {
        Self {
            theme: Theme::from_name(theme_name),
            source: source.into(),
            selection: Selection::Total,
            show_summary: true,
            should_quit: false,
        }
    }

    /// Show `set` until `q`, `Q`, `Esc` or `Ctrl+C`.
    ///
    /// The terminal is restored on every exit path, including a failed setup.
    pub fn run_histogram(mut self, set: &HistogramSet) -> io::Result<()> {
        let mut guard = TerminalGuard::enter(RawTerminal)?;
        let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;

        let tick_rate = Duration::from_millis(250);

        let result: io::Result<()> = loop {
            if let Err(err) = terminal.draw(|frame| self.render(frame, set)) {
                break Err(err);
            }

            match event::poll(tick_rate) {
                Ok(true) => match event::read() {
                    Ok(Event::Key(key)) => self.handle_key(key, set.series.len()),
                    Ok(_) => {}
                    Err(err) => break Err(err),
                },
                Ok(false) => {}
                Err(err) => break Err(err),
            }

            if self.should_quit {
                break Ok(());
            }
        };

        guard.restore()?;
        terminal.show_cursor()?;

        result
    }

    /// Apply one key press; `series` is the number of parent series.
    pub fn handle_key(&mut self, key: KeyEvent, series: usize) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Tab | KeyCode::Right => self.selection = self.selection.next(series),
            KeyCode::BackTab | KeyCode::Left => self.selection = self.selection.previous(series),
            KeyCode::Char('s') | KeyCode::Char('S') => self.show_summary = !self.show_summary,
            _ => {}
        }
    }

    /// Render the current state into `frame`.
    pub fn render(&self, frame: &mut Frame, set: &HistogramSet) {
        let area = frame.area();

        if set.total.entries() == 0 {
            histogram_view::render_no_data(frame, area, &self.source, &self.theme);
            return;
        }

        if !self.show_summary {
            histogram_view::render_histogram_view(
                frame,
                area,
                set,
                self.selection,
                &self.source,
                &self.theme,
            );
            return;
        }

        let summary_height = (set.series.len() as u16 + 4).max(SUMMARY_MIN_HEIGHT);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(10), Constraint::Length(summary_height)])
            .split(area);

        histogram_view::render_histogram_view(
            frame,
            chunks[0],
            set,
            self.selection,
            &self.source,
            &self.theme,
        );
        summary_view::render_summary_table(frame, chunks[1], set, &self.theme);
    }
}

// ── Terminal setup ────────────────────────────────────────────────────────────

/// Switches the terminal into and out of the full-screen raw mode.
trait TerminalMode {
    fn enter(&mut self) -> io::Result<()>;
    fn leave(&mut self) -> io::Result<()>;
}

/// The process terminal, driven through crossterm.
struct RawTerminal;

impl TerminalMode for RawTerminal {
    fn enter(&mut self) -> io::Result<()> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)
    }

    fn leave(&mut self) -> io::Result<()> {
        let raw = disable_raw_mode();
        let screen = execute!(io::stdout(), LeaveAlternateScreen);
        raw.and(screen)
    }
}

/// Leaves the terminal mode when dropped unless [`restore`](Self::restore)
/// already did.
struct TerminalGuard<M: TerminalMode> {
    mode: M,
    active: bool,
}

impl<M: TerminalMode> TerminalGuard<M> {
    /// Enter `mode`; a partial setup is undone before the error is returned.
    fn enter(mut mode: M) -> io::Result<Self> {
        if let Err(err) = mode.enter() {
            let _ = mode.leave();
            return Err(err);
        }
        Ok(Self { mode, active: true })
    }

    fn restore(&mut self) -> io::Result<()> {
        if !self.active {
            return Ok(());
        }
        self.active = false;
        self.mode.leave()
    }
}

impl<M: TerminalMode> Drop for TerminalGuard<M> {
    fn drop(&mut self) {
        if self.active {
            let _ = self.restore();
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
