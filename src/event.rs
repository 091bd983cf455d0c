//! Merged tick and keyboard event stream.
//!
//! The session loop consumes one [`Event`] at a time from an [`EventSource`].
//! Every event carries the instant it was observed, so ordering and elapsed
//! time are decided at the source and never reconstructed later.

use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::{io, time::{Duration, Instant}};

/// A user command, mapped 1:1 onto clock operations.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Start,
    Pause,
    /// Start when paused, pause when running
    Toggle,
    Skip,
    Reset,
    Quit,
}

impl Command {
    /// Maps a key press onto a command. Unmapped keys yield `None`.
    pub fn from_key(key: KeyEvent) -> Option<Self> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(Self::Quit);
        }
        match key.code {
            KeyCode::Char(c) => Self::from_char(c),
            _ => None,
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        match c {
            's' => Some(Self::Start),
            'p' => Some(Self::Pause),
            ' ' => Some(Self::Toggle),
            'n' => Some(Self::Skip),
            'r' => Some(Self::Reset),
            'q' => Some(Self::Quit),
            _ => None,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Tick,
    Command(Command),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Event {
    pub at: Instant,
    pub kind: EventKind,
}

impl Event {
    pub fn tick(at: Instant) -> Self {
        Self { at, kind: EventKind::Tick }
    }

    pub fn command(at: Instant, command: Command) -> Self {
        Self { at, kind: EventKind::Command(command) }
    }
}

/// An ordered stream of events. `Ok(None)` means the stream has ended.
pub trait EventSource {
    fn next_event(&mut self) -> io::Result<Option<Event>>;
}

impl<I: Iterator<Item = Event>> EventSource for I {
    fn next_event(&mut self) -> io::Result<Option<Event>> {
        Ok(self.next())
    }
}

/// Terminal-backed source: a fixed-cadence tick merged with crossterm key input.
///
/// Keys are read with a poll timeout equal to the time left until the next
/// tick deadline, so input never delays a tick by more than one interval.
pub struct TerminalEvents {
    tick_rate: Duration,
    next_tick: Instant,
}

impl TerminalEvents {
    pub fn new(tick_rate: Duration) -> Self {
        Self { tick_rate, next_tick: Instant::now() + tick_rate }
    }
}

impl EventSource for TerminalEvents {
    fn next_event(&mut self) -> io::Result<Option<Event>> {
        loop {
            let now = Instant::now();
            if now >= self.next_tick {
                // Catch up without queueing a burst of stale ticks.
                self.next_tick = (self.next_tick + self.tick_rate).max(now);
                return Ok(Some(Event::tick(now)));
            }

            if event::poll(self.next_tick - now)? {
                if let TermEvent::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Release {
                        continue;
                    }
                    if let Some(command) = Command::from_key(key) {
                        return Ok(Some(Event::command(Instant::now(), command)));
                    }
                    tracing::trace!(?key, "ignoring unmapped key");
                }
            }
        }
    }
}
