//! Notification sinks.

use notify_rust::{Notification, Urgency};
use std::{io::{self, Write}, path::Path, process::{Command, Stdio}};

use crate::clock::Phase;
use crate::error::SinkError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NotifyKind {
    WorkComplete,
    ShortBreakComplete,
    LongBreakComplete,
    OneMinuteWarning,
}

impl NotifyKind {
    pub fn completed(phase: Phase) -> Self {
        match phase {
            Phase::Work => Self::WorkComplete,
            Phase::ShortBreak => Self::ShortBreakComplete,
            Phase::LongBreak => Self::LongBreakComplete,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Self::WorkComplete => "Break Time! ☕",
            Self::ShortBreakComplete | Self::LongBreakComplete => "Back to Work! 🎯",
            Self::OneMinuteWarning => "One Minute Left ⏳",
        }
    }
}

/// Fire-and-forget notification capability. Implementations must not block
/// the caller; errors they do return are logged by the caller.
pub trait NotifySink {
    fn notify(&mut self, kind: NotifyKind, message: &str) -> Result<(), SinkError>;
}

impl<T: NotifySink + ?Sized> NotifySink for Box<T> {
    fn notify(&mut self, kind: NotifyKind, message: &str) -> Result<(), SinkError> {
        (**self).notify(kind, message)
    }
}

/// Desktop notifications through the system notification daemon, with an
/// optional completion sound.
pub struct DesktopNotifier {
    sound_enabled: bool,
}

impl DesktopNotifier {
    pub fn new(sound_enabled: bool) -> Self {
        Self { sound_enabled }
    }
}

impl NotifySink for DesktopNotifier {
    fn notify(&mut self, kind: NotifyKind, message: &str) -> Result<(), SinkError> {
        let urgency = match kind {
            NotifyKind::OneMinuteWarning => Urgency::Normal,
            _ => Urgency::Critical,
        };

        if self.sound_enabled && kind != NotifyKind::OneMinuteWarning {
            play_sound();
        }

        let mut notification = Notification::new();
        notification
            .summary(kind.title())
            .body(message)
            .appname("pomo")
            .icon("alarm-clock")
            .urgency(urgency);

        // `show()` is a blocking D-Bus round trip; keep it off the loop thread.
        std::thread::Builder::new()
            .name("pomo-notify".into())
            .spawn(move || {
                if let Err(e) = notification.show() {
                    tracing::warn!(?kind, error = %e, "notification failed");
                }
            })
            .map(|_| ())
            .map_err(|e| SinkError::Notify(e.to_string()))
    }
}

/// Used when notifications are disabled; records the event in the log only.
#[derive(Default)]
pub struct SilentNotifier;

impl NotifySink for SilentNotifier {
    fn notify(&mut self, kind: NotifyKind, message: &str) -> Result<(), SinkError> {
        tracing::debug!(?kind, message, "notification suppressed");
        Ok(())
    }
}

fn play_sound() {
    std::thread::spawn(|| {
        for (cmd, file) in [
            ("paplay", "/usr/share/sounds/freedesktop/stereo/complete.oga"),
            ("aplay", "/usr/share/sounds/sound-icons/guitar-11.wav"),
            ("aplay", "/usr/share/sounds/generic.wav"),
        ] {
            if Path::new(file).exists() {
                if let Err(e) = Command::new(cmd)
                    .arg(file)
                    .stdout(Stdio::null())
                    .stderr(Stdio::null())
                    .spawn()
                {
                    tracing::debug!(cmd, error = %e, "sound playback failed");
                }
                return;
            }
        }
        // No sound file installed; fall back to the terminal bell.
        print!("\x07");
        let _ = io::stdout().flush();
    });
}
