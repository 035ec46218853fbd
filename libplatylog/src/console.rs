/*
 * Console output implementations
 *
 * This module defines the console side of the logger:
 * - Console: the capability the engine prints through (apply a style, print a line)
 * - StyledConsole: colors stdout per level using crossterm
 * - PlainConsole: stdout without any styling, for pipes and plain terminals
 * - MemoryConsole: keeps printed lines in memory for embedding hosts and tests
 *
 * Styling is best-effort. A console that cannot color simply ignores apply(),
 * and write failures on stdout are dropped since logging must never fail the caller.
 */

use crossterm::queue;
use crossterm::style::{Color, ResetColor, SetForegroundColor};
use std::io::{self, IsTerminal, Stdout, Write};
use std::sync::{Arc, Mutex};

use crate::level::LogLevel;

/// Destination for console log lines.
pub trait Console: Send {
    /// Style the next printed line according to `level`.
    fn apply(&mut self, level: LogLevel);

    /// Print one complete line (no trailing newline in `line`).
    fn print_line(&mut self, line: &str);
}

/// Fixed level to color table
pub fn color_for(level: LogLevel) -> Color {
    match level {
        LogLevel::Trace => Color::White,
        LogLevel::Info => Color::Blue,
        LogLevel::Debug => Color::Green,
        LogLevel::Warning => Color::Yellow,
        LogLevel::Error => Color::Red,
        LogLevel::Fatal => Color::Red,
    }
}

/// Picks the styled console when requested and stdout is a terminal.
pub fn console_for(colored: bool) -> Box<dyn Console> {
    if colored && io::stdout().is_terminal() {
        Box::new(StyledConsole::new())
    } else {
        Box::new(PlainConsole::new())
    }
}

/// Stdout console with per-level foreground colors
pub struct StyledConsole {
    out: Stdout,
}

impl StyledConsole {
    pub fn new() -> Self {
        StyledConsole { out: io::stdout() }
    }
}

impl Default for StyledConsole {
    fn default() -> Self {
        Self::new()
    }
}

impl Console for StyledConsole {
    fn apply(&mut self, level: LogLevel) {
        let _ = queue!(self.out, SetForegroundColor(color_for(level)));
    }

    fn print_line(&mut self, line: &str) {
        let mut out = self.out.lock();
        let _ = writeln!(out, "{}", line);
        // Reset so output that is not ours keeps the terminal's default color
        let _ = queue!(out, ResetColor);
        let _ = out.flush();
    }
}

/// Stdout console that ignores styling
#[derive(Default)]
pub struct PlainConsole;

impl PlainConsole {
    pub fn new() -> Self {
        PlainConsole
    }
}

impl Console for PlainConsole {
    fn apply(&mut self, _level: LogLevel) {}

    fn print_line(&mut self, line: &str) {
        let _ = writeln!(io::stdout(), "{}", line);
    }
}

/// One line captured by a MemoryConsole, with the style active when it was printed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedLine {
    pub style: Option<LogLevel>,
    pub text: String,
}

/// In-memory console. Clones share the same buffer, so a host can keep one
/// handle and give the other to the engine.
#[derive(Debug, Clone, Default)]
pub struct MemoryConsole {
    pending_style: Option<LogLevel>,
    lines: Arc<Mutex<Vec<CapturedLine>>>,
}

impl MemoryConsole {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn captured(&self) -> Vec<CapturedLine> {
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn lines(&self) -> Vec<String> {
        self.captured().into_iter().map(|line| line.text).collect()
    }
}

impl Console for MemoryConsole {
    fn apply(&mut self, level: LogLevel) {
        self.pending_style = Some(level);
    }

    fn print_line(&mut self, line: &str) {
        let captured = CapturedLine {
            style: self.pending_style.take(),
            text: line.to_string(),
        };
        self.lines
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(captured);
    }
}
