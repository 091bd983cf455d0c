use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Stylize},
    terminal::{Clear, ClearType},
};
use std::io::{self, IsTerminal, Stdout, Write};

use super::{CONTROLS, RenderSink, TOMATO_LEAVES, format_time, is_paused, progress_bar, session_line, title, tomato};
use crate::clock::Phase;
use crate::error::SinkError;
use crate::session::Snapshot;

const BAR_WIDTH: usize = 50;

fn phase_color(snapshot: &Snapshot) -> Color {
    if is_paused(snapshot) {
        return Color::Yellow;
    }
    match snapshot.phase {
        Phase::Work => Color::Red,
        Phase::ShortBreak => Color::Green,
        Phase::LongBreak => Color::Blue,
    }
}

/// Redraws the screen as plain coloured lines on any writer.
///
/// Frames are appended unless screen clearing is turned on, so a pipe or
/// file receives no cursor-movement sequences.
pub struct PlainRenderer<W: Write> {
    out: W,
    clear_screen: bool,
}

impl PlainRenderer<Stdout> {
    /// Clears between frames only when stdout is a terminal.
    pub fn stdout() -> Self {
        let out = io::stdout();
        let clear_screen = out.is_terminal();
        Self::new(out).with_clear_screen(clear_screen)
    }
}

impl<W: Write> PlainRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out, clear_screen: false }
    }

    pub fn with_clear_screen(mut self, clear_screen: bool) -> Self {
        self.clear_screen = clear_screen;
        self
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn write_frame(&mut self, snapshot: &Snapshot) -> io::Result<()> {
        let color = phase_color(snapshot);
        let out = &mut self.out;
        // Raw mode does not translate '\n', so every line ends in "\r\n".
        if self.clear_screen {
            queue!(out, MoveTo(0, 0), Clear(ClearType::All))?;
        }

        write!(out, "\r\n{}\r\n", "🍅 Pomodoro CLI 🍅".bold())?;
        if snapshot.acceleration > 1.0 {
            write!(out, "{}\r\n", format!("DEBUG MODE: time accelerated {}x", snapshot.acceleration).yellow())?;
        }
        write!(out, "\r\n{}\r\n\r\n", title(snapshot).with(color).bold())?;

        for (i, row) in tomato(is_paused(snapshot)).into_iter().enumerate() {
            let fg = if i < TOMATO_LEAVES { Color::Green } else { color };
            write!(out, "{}\r\n", row.with(fg))?;
        }

        write!(out, "\r\n{}\r\n", format_time(snapshot.remaining).with(color).bold())?;
        write!(out, "\r\n{}\r\n", format!("[{}]", progress_bar(snapshot.progress, BAR_WIDTH)).with(color))?;
        write!(out, "\r\n{}\r\n", session_line(snapshot).cyan())?;
        write!(out, "\r\nControls:\r\n{}\r\n", CONTROLS.white())?;
        out.flush()
    }
}

impl<W: Write> RenderSink for PlainRenderer<W> {
    fn draw(&mut self, snapshot: &Snapshot) -> Result<(), SinkError> {
        self.write_frame(snapshot)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::test_snapshot;
    use crate::session::SessionStatus;

    const CLEAR_ALL: &str = "\x1b[2J";

    fn frame(status: SessionStatus) -> String {
        let mut renderer = PlainRenderer::new(Vec::new());
        renderer.draw(&test_snapshot(status)).unwrap();
        String::from_utf8(renderer.into_inner()).unwrap()
    }

    #[test]
    fn piped_output_has_no_cursor_control() {
        let frame = frame(SessionStatus::Running);
        assert!(!frame.contains(CLEAR_ALL));
        assert!(!frame.contains("\x1b[1;1H"));
    }

    #[test]
    fn terminal_output_clears_before_each_frame() {
        let mut renderer = PlainRenderer::new(Vec::new()).with_clear_screen(true);
        renderer.draw(&test_snapshot(SessionStatus::Running)).unwrap();
        renderer.draw(&test_snapshot(SessionStatus::Paused)).unwrap();
        let output = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(output.starts_with("\x1b[1;1H"));
        assert_eq!(output.matches(CLEAR_ALL).count(), 2);
    }

    #[test]
    fn frame_contains_time_phase_and_controls() {
        let frame = frame(SessionStatus::Running);
        assert!(frame.contains("FOCUS TIME"));
        assert!(frame.contains("25:00"));
        assert!(frame.contains("Pomodoros completed: 1"));
        assert!(frame.contains(CONTROLS));
        assert!(frame.contains(&"░".repeat(BAR_WIDTH)));
        assert!(!frame.contains("PAUSED"));
    }

    #[test]
    fn paused_frame_shows_banner() {
        assert!(frame(SessionStatus::Paused).contains("PAUSED"));
    }

    #[test]
    fn debug_line_only_when_accelerated() {
        assert!(!frame(SessionStatus::Running).contains("DEBUG MODE"));

        let mut snapshot = test_snapshot(SessionStatus::Running);
        snapshot.acceleration = 60.0;
        let mut renderer = PlainRenderer::new(Vec::new());
        renderer.draw(&snapshot).unwrap();
        let frame = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(frame.contains("time accelerated 60x"));
    }

    #[test]
    fn lines_end_with_carriage_return() {
        let frame = frame(SessionStatus::Running);
        assert!(!frame.replace("\r\n", "").contains('\n'));
    }
}
