//! Scoped terminal mode acquisition.

use crossterm::{
    cursor::{Hide, Show},
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use std::io::{self, IsTerminal};

use crate::config::DisplayMode;

/// Holds raw mode (and the alternate screen in rich mode) for its lifetime.
///
/// Dropping the guard restores the terminal, including during unwinding.
/// [`install_panic_hook`] covers panics that abort before the guard drops.
pub struct TerminalGuard {
    alternate_screen: bool,
}

impl TerminalGuard {
    pub fn acquire(mode: DisplayMode) -> io::Result<Self> {
        enable_raw_mode()?;
        let alternate_screen = mode == DisplayMode::Rich;
        let guard = Self { alternate_screen };

        let mut stdout = io::stdout();
        if alternate_screen {
            execute!(stdout, EnterAlternateScreen, Hide)?;
        } else if stdout.is_terminal() {
            execute!(stdout, Hide)?;
        }
        Ok(guard)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        restore(self.alternate_screen);
    }
}

fn restore(alternate_screen: bool) {
    let mut stdout = io::stdout();
    if let Err(e) = disable_raw_mode() {
        tracing::warn!(error = %e, "failed to disable raw mode");
    }
    let result = if alternate_screen {
        execute!(stdout, LeaveAlternateScreen, Show)
    } else if stdout.is_terminal() {
        execute!(stdout, Show)
    } else {
        Ok(())
    };
    if let Err(e) = result {
        tracing::warn!(error = %e, "failed to restore terminal");
    }
}

/// Raw mode only, released on drop.
struct RawMode;

impl RawMode {
    fn enable() -> io::Result<Self> {
        enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        if let Err(e) = disable_raw_mode() {
            tracing::warn!(error = %e, "failed to disable raw mode");
        }
    }
}

/// Blocks until a single key is pressed. Returns at once when stdin is not a terminal.
pub fn wait_for_key() -> io::Result<()> {
    if !io::stdin().is_terminal() {
        return Ok(());
    }
    let _raw = RawMode::enable()?;
    while !is_key_press(&event::read()?) {}
    Ok(())
}

fn is_key_press(event: &Event) -> bool {
    matches!(event, Event::Key(key) if key.kind != KeyEventKind::Release)
}

/// Restores the terminal before the default panic message is printed.
pub fn install_panic_hook(mode: DisplayMode) {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        restore(mode == DisplayMode::Rich);
        default_hook(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyEvent, KeyEventState, KeyModifiers};

    #[test]
    fn any_key_press_ends_the_wait() {
        let press = Event::Key(KeyEvent::new(KeyCode::Char('x'), KeyModifiers::NONE));
        assert!(is_key_press(&press));
        assert!(is_key_press(&Event::Key(KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE))));
    }

    #[test]
    fn releases_and_non_key_events_keep_waiting() {
        let release = Event::Key(KeyEvent {
            code: KeyCode::Char('x'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        });
        assert!(!is_key_press(&release));
        assert!(!is_key_press(&Event::Resize(80, 24)));
        assert!(!is_key_press(&Event::FocusGained));
    }
}
