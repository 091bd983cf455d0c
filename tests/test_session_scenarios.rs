//! End-to-end session scenarios driven by scripted event streams.

use pomo::prelude::*;
use std::time::{Duration, Instant};

#[derive(Default)]
struct Frames(Vec<Snapshot>);

impl RenderSink for Frames {
    fn draw(&mut self, snapshot: &Snapshot) -> Result<(), SinkError> {
        self.0.push(*snapshot);
        Ok(())
    }
}

#[derive(Default)]
struct Inbox(Vec<NotifyKind>);

impl NotifySink for Inbox {
    fn notify(&mut self, kind: NotifyKind, _message: &str) -> Result<(), SinkError> {
        self.0.push(kind);
        Ok(())
    }
}

struct BrokenScreen;

impl RenderSink for BrokenScreen {
    fn draw(&mut self, _snapshot: &Snapshot) -> Result<(), SinkError> {
        Err(SinkError::Render(std::io::Error::other("terminal gone")))
    }
}

struct BrokenNotifier;

impl NotifySink for BrokenNotifier {
    fn notify(&mut self, _kind: NotifyKind, _message: &str) -> Result<(), SinkError> {
        Err(SinkError::Notify("no notification daemon".into()))
    }
}

fn config(work: f64, short: f64, long: f64, cycles: u32, acceleration: f64) -> Config {
    Config {
        work_duration: work,
        short_break_duration: short,
        long_break_duration: long,
        cycles_before_long_break: cycles,
        acceleration,
        ..Config::default()
    }
}

fn session(config: &Config) -> SessionLoop<Frames, Inbox> {
    SessionLoop::new(PhaseClock::new(config).unwrap(), Frames::default(), Inbox::default())
}

/// Start at `t0`, then one tick per entry of `offsets` (seconds after `t0`).
fn script(t0: Instant, offsets: &[u64]) -> Vec<Event> {
    let mut events = vec![Event::command(t0, Command::Start)];
    events.extend(offsets.iter().map(|s| Event::tick(t0 + Duration::from_secs(*s))));
    events
}

#[test]
fn accelerated_cycle_reaches_long_break_after_threshold() {
    let mut s = session(&config(1.0, 1.0, 1.0, 2, 60.0));
    let t0 = Instant::now();

    s.handle(Event::command(t0, Command::Start));

    s.handle(Event::tick(t0 + Duration::from_secs(1)));
    assert_eq!(s.clock().phase(), Phase::ShortBreak);
    assert_eq!(s.clock().remaining(), Duration::from_secs(60));
    assert_eq!(s.clock().cycles_completed(), 1);

    s.handle(Event::tick(t0 + Duration::from_secs(2)));
    assert_eq!(s.clock().phase(), Phase::Work);
    assert_eq!(s.clock().cycles_completed(), 1);

    s.handle(Event::tick(t0 + Duration::from_secs(3)));
    assert_eq!(s.clock().phase(), Phase::LongBreak);
    assert_eq!(s.clock().cycles_completed(), 0);

    assert_eq!(
        s.notifier().0,
        vec![NotifyKind::WorkComplete, NotifyKind::ShortBreakComplete, NotifyKind::WorkComplete]
    );
    assert_eq!(s.summary().pomodoros, 2);
}

#[test]
fn one_minute_warning_fires_once_per_phase() {
    let mut s = session(&config(2.0, 2.0, 2.0, 4, 1.0));
    let mut events = script(Instant::now(), &[30, 61, 70, 90, 100, 120, 150, 185, 200]).into_iter();
    s.run(&mut events).unwrap();

    let inbox = &s.notifier().0;
    assert_eq!(
        inbox,
        &vec![
            NotifyKind::OneMinuteWarning,
            NotifyKind::WorkComplete,
            NotifyKind::OneMinuteWarning,
        ]
    );
}

#[test]
fn phase_starting_below_one_minute_never_warns() {
    let mut s = session(&config(1.0, 0.5, 1.0, 4, 1.0));
    let mut events = script(Instant::now(), &[10, 60, 70, 80]).into_iter();
    s.run(&mut events).unwrap();

    assert!(!s.notifier().0.contains(&NotifyKind::OneMinuteWarning));
    assert_eq!(s.notifier().0, vec![NotifyKind::WorkComplete]);
}

#[test]
fn overshoot_completes_one_phase_and_carries_the_excess() {
    let mut s = session(&config(2.0, 5.0, 15.0, 4, 1.0));
    let t0 = Instant::now();
    let mut events = script(t0, &[150]).into_iter();
    s.run(&mut events).unwrap();

    assert_eq!(s.clock().phase(), Phase::ShortBreak);
    assert_eq!(s.clock().remaining(), Duration::from_secs(5 * 60 - 30));
    assert_eq!(s.summary().phases_completed, 1);
}

#[test]
fn huge_overshoot_is_clamped_not_chained() {
    let mut s = session(&config(1.0, 1.0, 1.0, 4, 1.0));
    let t0 = Instant::now();
    let mut events = script(t0, &[3600]).into_iter();
    s.run(&mut events).unwrap();

    assert_eq!(s.summary().phases_completed, 1);
    assert_eq!(s.clock().phase(), Phase::ShortBreak);
    assert_eq!(s.clock().remaining(), Duration::ZERO);

    s.handle(Event::tick(t0 + Duration::from_secs(3601)));
    assert_eq!(s.summary().phases_completed, 2);
    assert_eq!(s.clock().phase(), Phase::Work);
    assert_eq!(s.clock().remaining(), Duration::from_secs(59));
}

#[test]
fn quit_stops_consuming_events() {
    let mut s = session(&Config::default());
    let t0 = Instant::now();
    let mut events = vec![
        Event::command(t0, Command::Start),
        Event::command(t0 + Duration::from_secs(1), Command::Quit),
        Event::tick(t0 + Duration::from_secs(600)),
    ]
    .into_iter();

    s.run(&mut events).unwrap();
    assert_eq!(s.status(), SessionStatus::Quit);
    assert_eq!(events.len(), 1);
    assert_eq!(s.clock().remaining(), Duration::from_secs(25 * 60));
}

#[test]
fn run_renders_initial_frame_and_after_every_event() {
    let mut s = session(&Config::default());
    let mut events = script(Instant::now(), &[1, 2, 3]).into_iter();
    s.run(&mut events).unwrap();

    let frames = &s.renderer().0;
    assert_eq!(frames.len(), 5);
    assert_eq!(frames[0].status, SessionStatus::NotStarted);
    assert_eq!(frames[1].status, SessionStatus::Running);
    assert!(frames.windows(2).all(|w| w[1].remaining <= w[0].remaining));
}

#[test]
fn reset_from_any_state_restores_initial_clock() {
    let mut s = session(&config(25.0, 5.0, 15.0, 4, 60.0));
    let t0 = Instant::now();
    let mut events = script(t0, &[30, 60, 90]);
    events.push(Event::command(t0 + Duration::from_secs(91), Command::Skip));
    events.push(Event::command(t0 + Duration::from_secs(92), Command::Reset));
    s.run(&mut events.into_iter()).unwrap();

    let state = s.clock().state();
    assert_eq!(state.phase, Phase::Work);
    assert_eq!(state.remaining, Duration::from_secs(25 * 60));
    assert_eq!(state.cycles_completed, 0);
    assert!(!state.running);
    assert_eq!(s.status(), SessionStatus::Paused);
}

#[test]
fn sink_failures_do_not_stop_the_loop() {
    let clock = PhaseClock::new(&config(1.0, 1.0, 1.0, 2, 60.0)).unwrap();
    let mut s = SessionLoop::new(clock, BrokenScreen, BrokenNotifier);
    let mut events = script(Instant::now(), &[1, 2, 3]).into_iter();

    let summary = s.run(&mut events).unwrap();
    assert_eq!(summary.phases_completed, 3);
    assert_eq!(s.clock().phase(), Phase::LongBreak);
}

#[test]
fn pause_on_transition_waits_for_start() {
    let config = Config { auto_continue: false, ..config(1.0, 1.0, 1.0, 4, 1.0) };
    let mut s = session(&config);
    let t0 = Instant::now();
    let mut events = script(t0, &[60, 90]).into_iter();
    s.run(&mut events).unwrap();

    assert_eq!(s.clock().phase(), Phase::ShortBreak);
    assert_eq!(s.clock().remaining(), Duration::from_secs(60));
    assert_eq!(s.status(), SessionStatus::Paused);

    s.handle(Event::command(t0 + Duration::from_secs(100), Command::Start));
    s.handle(Event::tick(t0 + Duration::from_secs(110)));
    assert_eq!(s.clock().remaining(), Duration::from_secs(50));
}

#[test]
fn invalid_configuration_is_rejected_before_the_loop() {
    let err = PhaseClock::new(&config(25.0, 5.0, 15.0, 0, 1.0)).unwrap_err();
    assert_eq!(AppError::from(err).exit_code(), ExitCode::CONFIG_ERROR);
}
