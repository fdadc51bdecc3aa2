use std::io::{self, Write};
use std::path::Path;

use chrono::Local;
use restore_core::{display_name, ProgressUiState};

/// `[ 50%] Stage 2/4`, or `[  - ] Error` when the bar has no percentage.
pub fn format_progress(state: &ProgressUiState) -> String {
    match state.percent {
        Some(percent) => format!("[{percent:>3}%] {}", state.label),
        None => format!("[  - ] {}", state.label),
    }
}

pub fn format_preview(path: Option<&Path>) -> String {
    match path {
        Some(path) => format!("output: {} ({})", display_name(path), path.display()),
        None => "output: -".to_string(),
    }
}

/// Index into `next` of the first line the terminal has not shown yet.
///
/// The committed log is a sliding window, so the new snapshot may have lost
/// lines at the front. The longest suffix of `shown` that is also a prefix of
/// `next` is treated as already printed.
pub fn unseen_from(shown: &[String], next: &[String]) -> usize {
    let max_overlap = shown.len().min(next.len());
    (1..=max_overlap)
        .rev()
        .find(|&overlap| shown[shown.len() - overlap..] == next[..overlap])
        .unwrap_or(0)
}

/// Draws render effects as plain terminal lines.
pub struct TerminalRenderer<W: Write> {
    out: W,
    shown_log: Vec<String>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            shown_log: Vec::new(),
        }
    }

    pub fn progress(&mut self, state: &ProgressUiState) -> io::Result<()> {
        writeln!(self.out, "{}", format_progress(state))?;
        self.out.flush()
    }

    pub fn log(&mut self, text: &str) -> io::Result<()> {
        let next: Vec<String> = if text.is_empty() {
            Vec::new()
        } else {
            text.split('\n').map(str::to_string).collect()
        };
        let start = unseen_from(&self.shown_log, &next);
        for line in &next[start..] {
            writeln!(self.out, "  | {line}")?;
        }
        self.shown_log = next;
        self.out.flush()
    }

    pub fn status(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{} {}", Local::now().format("%H:%M:%S"), text)?;
        self.out.flush()
    }

    pub fn preview(&mut self, path: Option<&Path>) -> io::Result<()> {
        writeln!(self.out, "{}", format_preview(path))?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
