//! The session loop: drives the [`PhaseClock`] from a merged event stream
//! and fans state out to the render and notify sinks.

use std::{io, time::{Duration, Instant}};
use tracing::{debug, info, warn};

use crate::clock::{Phase, PhaseClock, TickOutcome, Transition};
use crate::event::{Command, Event, EventKind, EventSource};
use crate::notify::{NotifyKind, NotifySink};
use crate::render::RenderSink;

const WARNING_THRESHOLD: Duration = Duration::from_secs(60);

/// Process-level state. `Quit` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionStatus {
    NotStarted,
    Running,
    Paused,
    Quit,
}

/// Everything a renderer needs, copied out of the clock.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Snapshot {
    pub phase: Phase,
    pub remaining: Duration,
    pub running: bool,
    pub cycles_completed: u32,
    pub cycle_threshold: u32,
    /// `1 - remaining / phase_duration`
    pub progress: f64,
    pub status: SessionStatus,
    pub acceleration: f64,
    /// Work phases completed since launch
    pub pomodoros: u32,
}

/// Counters reported when the loop ends.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SessionSummary {
    pub phases_completed: u32,
    pub phases_skipped: u32,
    pub pomodoros: u32,
}

pub struct SessionLoop<R, N> {
    clock: PhaseClock,
    renderer: R,
    notifier: N,
    status: SessionStatus,
    /// Instant up to which running time has been credited to the clock
    last_mark: Instant,
    warned: bool,
    summary: SessionSummary,
}

impl<R: RenderSink, N: NotifySink> SessionLoop<R, N> {
    pub fn new(clock: PhaseClock, renderer: R, notifier: N) -> Self {
        Self {
            clock,
            renderer,
            notifier,
            status: SessionStatus::NotStarted,
            last_mark: Instant::now(),
            warned: false,
            summary: SessionSummary::default(),
        }
    }

    pub fn clock(&self) -> &PhaseClock {
        &self.clock
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn summary(&self) -> SessionSummary {
        self.summary
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    pub fn snapshot(&self) -> Snapshot {
        let state = self.clock.state();
        Snapshot {
            phase: state.phase,
            remaining: state.remaining,
            running: state.running,
            cycles_completed: state.cycles_completed,
            cycle_threshold: self.clock.cycle_threshold(),
            progress: self.clock.progress_ratio(),
            status: self.status,
            acceleration: state.acceleration,
            pomodoros: self.summary.pomodoros,
        }
    }

    /// Consumes events until quit or until the source is exhausted.
    ///
    /// Only a failing event source ends the loop with an error; sink
    /// failures are logged and absorbed.
    pub fn run<E: EventSource>(&mut self, events: &mut E) -> io::Result<SessionSummary> {
        info!(
            phase = self.clock.phase().to_str(),
            cycles = self.clock.cycle_threshold(),
            acceleration = self.clock.state().acceleration,
            "session ready"
        );
        self.render();

        while let Some(event) = events.next_event()? {
            if self.handle(event) == SessionStatus::Quit {
                break;
            }
        }

        info!(
            completed = self.summary.phases_completed,
            skipped = self.summary.phases_skipped,
            pomodoros = self.summary.pomodoros,
            "session ended"
        );
        Ok(self.summary)
    }

    /// Applies a single event, then renders unless the session quit.
    pub fn handle(&mut self, event: Event) -> SessionStatus {
        match event.kind {
            EventKind::Tick => self.on_tick(event.at),
            EventKind::Command(command) => self.on_command(event.at, command),
        }

        if self.status != SessionStatus::Quit {
            self.render();
        }
        self.status
    }

    fn on_tick(&mut self, at: Instant) {
        if self.clock.is_running() {
            self.credit_elapsed(at);
        } else {
            self.last_mark = at;
        }
        self.refresh_status();
    }

    fn on_command(&mut self, at: Instant, command: Command) {
        debug!(?command, "command");
        match command {
            Command::Start => self.start(at),
            Command::Pause => self.pause(at),
            Command::Toggle if self.clock.is_running() => self.pause(at),
            Command::Toggle => self.start(at),
            Command::Skip => {
                let transition = self.clock.skip();
                self.last_mark = at;
                self.warned = false;
                self.summary.phases_skipped += 1;
                info!(
                    from = transition.from.to_str(),
                    to = transition.to.to_str(),
                    "phase skipped"
                );
            }
            Command::Reset => {
                self.clock.reset();
                self.warned = false;
                info!("timer reset");
            }
            Command::Quit => {
                self.status = SessionStatus::Quit;
                return;
            }
        }
        self.refresh_status();
    }

    fn start(&mut self, at: Instant) {
        if !self.clock.is_running() {
            self.last_mark = at;
            self.clock.start();
        }
    }

    fn pause(&mut self, at: Instant) {
        if self.clock.is_running() {
            self.credit_elapsed(at);
            self.clock.pause();
        }
    }

    /// Feeds real time elapsed since the last mark into the clock.
    fn credit_elapsed(&mut self, at: Instant) {
        let elapsed = at.saturating_duration_since(self.last_mark);
        self.last_mark = at;

        let before = self.clock.remaining();
        match self.clock.tick(elapsed) {
            TickOutcome::Running => {
                let after = self.clock.remaining();
                // Phases of a minute or less start inside the warning window.
                let long_enough = self.clock.phase_duration(self.clock.phase()) > WARNING_THRESHOLD;
                if long_enough && !self.warned && before >= WARNING_THRESHOLD && after < WARNING_THRESHOLD {
                    self.warned = true;
                    let message = format!("One minute left in {}.", self.clock.phase().name().to_lowercase());
                    self.notify(NotifyKind::OneMinuteWarning, &message);
                }
            }
            TickOutcome::PhaseCompleted { overshoot } => self.complete_phase(overshoot),
        }
    }

    fn complete_phase(&mut self, overshoot: Duration) {
        let transition = self.clock.advance_phase(overshoot);
        self.warned = false;
        self.summary.phases_completed += 1;
        if transition.from == Phase::Work {
            self.summary.pomodoros += 1;
        }

        info!(
            from = transition.from.to_str(),
            to = transition.to.to_str(),
            cycles_completed = transition.cycles_completed,
            overshoot_ms = overshoot.as_millis() as u64,
            "phase completed"
        );
        self.notify(NotifyKind::completed(transition.from), completion_message(&transition));
    }

    fn refresh_status(&mut self) {
        self.status = match (self.status, self.clock.is_running()) {
            (SessionStatus::Quit, _) => SessionStatus::Quit,
            (_, true) => SessionStatus::Running,
            (SessionStatus::NotStarted, false) => SessionStatus::NotStarted,
            (_, false) => SessionStatus::Paused,
        };
    }

    fn render(&mut self) {
        let snapshot = self.snapshot();
        if let Err(e) = self.renderer.draw(&snapshot) {
            warn!(error = %e, "render failed");
        }
    }

    fn notify(&mut self, kind: NotifyKind, message: &str) {
        if let Err(e) = self.notifier.notify(kind, message) {
            warn!(?kind, error = %e, "notification failed");
        }
    }
}

fn completion_message(transition: &Transition) -> &'static str {
    match transition.to {
        Phase::ShortBreak => "Time for a short break.",
        Phase::LongBreak => "Great work! Take a longer break.",
        Phase::Work => "Let's focus on your next session.",
    }
}
