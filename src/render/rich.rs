use ratatui::{prelude::*, widgets::*};
use std::io::{self, Stdout};

use super::{CONTROLS, RenderSink, TOMATO, TOMATO_LEAVES, format_time, is_paused, session_line, title, tomato};
use crate::clock::Phase;
use crate::error::SinkError;
use crate::session::{SessionStatus, Snapshot};

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

/// Full-screen view. Expects the terminal to be in raw mode on the
/// alternate screen (see [`TerminalGuard`](crate::terminal::TerminalGuard)).
pub struct RichRenderer {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl RichRenderer {
    pub fn new() -> io::Result<Self> {
        let terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
        Ok(Self { terminal })
    }
}

impl RenderSink for RichRenderer {
    fn draw(&mut self, snapshot: &Snapshot) -> Result<(), SinkError> {
        self.terminal.draw(|f| render_timer(f, snapshot))?;
        Ok(())
    }
}

fn render_timer(f: &mut Frame, snapshot: &Snapshot) {
    let color = phase_color(snapshot);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(1), Constraint::Length(3)])
        .split(f.size());

    // Header
    let mut header = vec![Span::styled(" 🍅 POMO ", Style::default()
        .fg(Color::Red).add_modifier(Modifier::BOLD))];
    if snapshot.acceleration > 1.0 {
        header.push(Span::styled(format!("DEBUG {}x ", snapshot.acceleration),
            Style::default().fg(Color::Yellow)));
    }
    f.render_widget(
        Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Cyan))
            .title(Line::from(header)),
        chunks[0]
    );

    // Main content
    let sections = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(10),
            Constraint::Length(1), Constraint::Length(1),
            Constraint::Length(TOMATO.len() as u16), Constraint::Length(1),
            Constraint::Length(1), Constraint::Length(1),
            Constraint::Length(1), Constraint::Length(1),
            Constraint::Length(3), Constraint::Length(1),
            Constraint::Length(1), Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Percentage(10),
        ])
        .split(chunks[1]);

    // Phase
    f.render_widget(
        Paragraph::new(title(snapshot))
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        sections[1]
    );

    // Tomato
    let art: Vec<Line> = tomato(is_paused(snapshot))
        .into_iter()
        .enumerate()
        .map(|(i, row)| {
            let fg = if i < TOMATO_LEAVES { Color::Green } else { color };
            Line::from(Span::styled(row, Style::default().fg(fg)))
        })
        .collect();
    f.render_widget(Paragraph::new(art).alignment(Alignment::Center), sections[3]);

    // Timer
    f.render_widget(
        Paragraph::new(format_time(snapshot.remaining))
            .style(Style::default().fg(color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        sections[5]
    );

    // Status
    let (status, status_color) = match snapshot.status {
        SessionStatus::NotStarted => ("Press S to start", Color::Gray),
        SessionStatus::Running => ("● RUNNING", Color::Green),
        SessionStatus::Paused | SessionStatus::Quit => ("⏸  PAUSED", Color::Yellow),
    };
    f.render_widget(
        Paragraph::new(status)
            .style(Style::default().fg(status_color).add_modifier(Modifier::BOLD))
            .alignment(Alignment::Center),
        sections[7]
    );

    // Progress
    f.render_widget(
        Gauge::default()
            .block(Block::default().borders(Borders::ALL).border_type(BorderType::Rounded))
            .gauge_style(Style::default().fg(color).bg(Color::Black))
            .ratio(snapshot.progress.clamp(0.0, 1.0)),
        sections[9]
    );

    // Session info
    f.render_widget(
        Paragraph::new(session_line(snapshot))
            .style(Style::default().fg(Color::Gray))
            .alignment(Alignment::Center),
        sections[11]
    );

    // Date/time
    let now = chrono::Local::now();
    f.render_widget(
        Paragraph::new(now.format("%A, %B %d  •  %I:%M %p").to_string())
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center),
        sections[13]
    );

    // Controls
    f.render_widget(
        Paragraph::new(CONTROLS)
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::DarkGray))
            .block(Block::default().borders(Borders::TOP).border_style(Style::default().fg(Color::DarkGray))),
        chunks[2]
    );
}
