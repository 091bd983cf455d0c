//! Phase sequencing and countdown arithmetic.
//!
//! [`PhaseClock`] owns the whole timer state. It never performs I/O; the
//! session loop decides what to do with the outcomes it returns.

use std::time::Duration;

use crate::config::Config;
use crate::error::ConfigError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Phase {
    Work,
    ShortBreak,
    LongBreak,
}

impl Phase {
    pub fn name(&self) -> &str {
        match self {
            Self::Work => "FOCUS TIME",
            Self::ShortBreak => "SHORT BREAK",
            Self::LongBreak => "LONG BREAK",
        }
    }

    pub fn to_str(&self) -> &str {
        match self {
            Self::Work => "work",
            Self::ShortBreak => "short_break",
            Self::LongBreak => "long_break",
        }
    }
}

/// Result of a single [`PhaseClock::tick`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    /// The countdown hit zero. `overshoot` is the simulated time past zero.
    PhaseCompleted { overshoot: Duration },
}

/// A phase change performed by [`PhaseClock::advance_phase`] or [`PhaseClock::skip`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Transition {
    pub from: Phase,
    pub to: Phase,
    pub cycles_completed: u32,
}

/// Mutable timer state.
#[derive(Clone, Debug, PartialEq)]
pub struct TimerState {
    pub phase: Phase,
    pub cycles_completed: u32,
    pub remaining: Duration,
    pub running: bool,
    pub acceleration: f64,
}

#[derive(Clone, Debug)]
pub struct PhaseClock {
    state: TimerState,
    work_duration: Duration,
    short_break_duration: Duration,
    long_break_duration: Duration,
    cycle_threshold: u32,
    auto_continue: bool,
}

impl PhaseClock {
    /// Builds a clock from `config`, failing on any invalid value.
    pub fn new(config: &Config) -> Result<Self, ConfigError> {
        config.validate()?;
        let work_duration = config.phase_duration(Phase::Work)?;

        Ok(Self {
            state: TimerState {
                phase: Phase::Work,
                cycles_completed: 0,
                remaining: work_duration,
                running: false,
                acceleration: config.acceleration,
            },
            work_duration,
            short_break_duration: config.phase_duration(Phase::ShortBreak)?,
            long_break_duration: config.phase_duration(Phase::LongBreak)?,
            cycle_threshold: config.cycles_before_long_break,
            auto_continue: config.auto_continue,
        })
    }

    pub fn state(&self) -> &TimerState {
        &self.state
    }

    pub fn phase(&self) -> Phase {
        self.state.phase
    }

    pub fn remaining(&self) -> Duration {
        self.state.remaining
    }

    pub fn is_running(&self) -> bool {
        self.state.running
    }

    pub fn cycles_completed(&self) -> u32 {
        self.state.cycles_completed
    }

    pub fn cycle_threshold(&self) -> u32 {
        self.cycle_threshold
    }

    pub fn phase_duration(&self, phase: Phase) -> Duration {
        match phase {
            Phase::Work => self.work_duration,
            Phase::ShortBreak => self.short_break_duration,
            Phase::LongBreak => self.long_break_duration,
        }
    }

    /// Fraction of the current phase already elapsed, in `[0, 1]`.
    pub fn progress_ratio(&self) -> f64 {
        let total = self.phase_duration(self.state.phase).as_secs_f64();
        let remaining = self.state.remaining.as_secs_f64();
        (1.0 - (remaining / total)).clamp(0.0, 1.0)
    }

    /// Counts down by `elapsed` real time scaled by the acceleration factor.
    ///
    /// At most one completion is reported per call. The clock stays at zero
    /// until [`advance_phase`](Self::advance_phase) is called with the overshoot.
    pub fn tick(&mut self, elapsed: Duration) -> TickOutcome {
        if !self.state.running {
            return TickOutcome::Running;
        }

        // Saturate: a huge factor must not overflow `Duration`.
        let simulated = Duration::try_from_secs_f64(elapsed.as_secs_f64() * self.state.acceleration)
            .unwrap_or(Duration::MAX);
        match self.state.remaining.checked_sub(simulated) {
            Some(left) if !left.is_zero() => {
                self.state.remaining = left;
                TickOutcome::Running
            }
            _ => {
                let overshoot = simulated.saturating_sub(self.state.remaining);
                self.state.remaining = Duration::ZERO;
                TickOutcome::PhaseCompleted { overshoot }
            }
        }
    }

    pub fn start(&mut self) {
        self.state.running = true;
    }

    pub fn pause(&mut self) {
        self.state.running = false;
    }

    /// Ends the current phase immediately, as if the countdown reached zero.
    pub fn skip(&mut self) -> Transition {
        self.state.remaining = Duration::ZERO;
        self.advance_phase(Duration::ZERO)
    }

    pub fn reset(&mut self) {
        self.state.phase = Phase::Work;
        self.state.remaining = self.work_duration;
        self.state.cycles_completed = 0;
        self.state.running = false;
    }

    /// Moves to the next phase, carrying `overshoot` into its countdown.
    ///
    /// Overshoot beyond the next phase's full length is dropped, leaving
    /// `remaining` at zero so the following tick completes that phase.
    pub fn advance_phase(&mut self, overshoot: Duration) -> Transition {
        let from = self.state.phase;
        let to = match from {
            Phase::Work if self.state.cycles_completed + 1 >= self.cycle_threshold => {
                self.state.cycles_completed = 0;
                Phase::LongBreak
            }
            Phase::Work => {
                self.state.cycles_completed += 1;
                Phase::ShortBreak
            }
            Phase::ShortBreak | Phase::LongBreak => Phase::Work,
        };

        self.state.phase = to;
        self.state.remaining = self.phase_duration(to).saturating_sub(overshoot);
        if !self.auto_continue {
            self.state.running = false;
        }

        Transition { from, to, cycles_completed: self.state.cycles_completed }
    }
}
