//! # pomo
//!
//! A terminal Pomodoro timer.
//!
//! [`clock::PhaseClock`] owns the phase state machine and countdown.
//! [`session::SessionLoop`] drives it from a merged stream of tick and key
//! events ([`event::EventSource`]) and pushes snapshots to a
//! [`render::RenderSink`] and transitions to a [`notify::NotifySink`].

pub mod clock;
pub mod config;
pub mod error;
pub mod event;
pub mod logging;
pub mod notify;
pub mod render;
pub mod session;
pub mod terminal;

pub mod prelude {
    pub use crate::clock::{Phase, PhaseClock, TickOutcome, TimerState, Transition};
    pub use crate::config::{Args, Config, DisplayMode};
    pub use crate::error::{AppError, ConfigError, ExitCode, SinkError};
    pub use crate::event::{Command, Event, EventKind, EventSource, TerminalEvents};
    pub use crate::notify::{DesktopNotifier, NotifyKind, NotifySink, SilentNotifier};
    pub use crate::render::{PlainRenderer, RenderSink, RichRenderer};
    pub use crate::session::{SessionLoop, SessionStatus, SessionSummary, Snapshot};
}
