//! Render sinks.
//!
//! Both renderers draw the same [`Snapshot`]: [`RichRenderer`] as a full-screen
//! ratatui view, [`PlainRenderer`] as coloured lines for dumb terminals and
//! pipes. Neither touches timer state.

mod plain;
mod rich;

pub use plain::PlainRenderer;
pub use rich::RichRenderer;

use std::time::Duration;

use crate::error::SinkError;
use crate::session::{SessionStatus, Snapshot};

pub const CONTROLS: &str = "s: start/resume | p: pause | n: skip to next | r: reset | q: quit";

const TOMATO: [&str; 7] = [
    "    .,,.    ",
    "  ,;;'''';;,  ",
    "  ;;    ;;  ",
    " ;;      ;; ",
    " ;;      ;; ",
    "  ;;    ;;  ",
    "  ';;,,;;'  ",
];
/// Rows drawn in leaf green regardless of phase
const TOMATO_LEAVES: usize = 2;
const TOMATO_PAUSE_ROW: usize = 3;

pub trait RenderSink {
    /// Presents `snapshot`. Must not have side effects on timer state.
    fn draw(&mut self, snapshot: &Snapshot) -> Result<(), SinkError>;
}

impl<T: RenderSink + ?Sized> RenderSink for Box<T> {
    fn draw(&mut self, snapshot: &Snapshot) -> Result<(), SinkError> {
        (**self).draw(snapshot)
    }
}

/// `MM:SS`, or `H:MM:SS` for phases of an hour or more.
pub fn format_time(remaining: Duration) -> String {
    let secs = remaining.as_secs();
    if secs >= 3600 {
        format!("{}:{:02}:{:02}", secs / 3600, (secs / 60) % 60, secs % 60)
    } else {
        format!("{:02}:{:02}", secs / 60, secs % 60)
    }
}

pub fn progress_bar(progress: f64, width: usize) -> String {
    let filled = ((width as f64 * progress.clamp(0.0, 1.0)) as usize).min(width);
    format!("{}{}", "█".repeat(filled), "░".repeat(width - filled))
}

/// Tomato art rows; the pause banner replaces the middle row while paused.
pub fn tomato(paused: bool) -> [&'static str; 7] {
    let mut rows = TOMATO;
    if paused {
        rows[TOMATO_PAUSE_ROW] = "  PAUSED  ";
    }
    rows
}

pub fn title(snapshot: &Snapshot) -> &str {
    match snapshot.status {
        SessionStatus::NotStarted => "READY",
        _ => snapshot.phase.name(),
    }
}

fn is_paused(snapshot: &Snapshot) -> bool {
    snapshot.status == SessionStatus::Paused
}

fn session_line(snapshot: &Snapshot) -> String {
    format!(
        "Cycle {} of {}  •  Pomodoros completed: {}",
        snapshot.cycles_completed + 1,
        snapshot.cycle_threshold,
        snapshot.pomodoros
    )
}

#[cfg(test)]
pub(crate) fn test_snapshot(status: SessionStatus) -> Snapshot {
    Snapshot {
        phase: crate::clock::Phase::Work,
        remaining: Duration::from_secs(25 * 60),
        running: status == SessionStatus::Running,
        cycles_completed: 1,
        cycle_threshold: 4,
        progress: 0.0,
        status,
        acceleration: 1.0,
        pomodoros: 1,
    }
}
