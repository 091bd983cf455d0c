//! Command line arguments and the validated timer configuration.
//!
//! Values come from an optional JSON file, then CLI flags override them.
//! The result is checked once by [`Config::validate`] and never mutated.

use clap::{ArgAction, Parser};
use serde::{Deserialize, Serialize};
use std::{fs, io, path::{Path, PathBuf}, time::Duration};

use crate::clock::Phase;
use crate::error::ConfigError;

const DATA_DIR: &str = "pomo";

// ============================================================================
// CLI Arguments
// ============================================================================

#[derive(Parser, Clone, Debug, Default)]
#[command(author, version, about = "🍅 pomo - A Terminal Pomodoro Timer")]
pub struct Args {
    /// Work duration (e.g. 25, 25m, 1h30m, 90s)
    #[arg(short, long, value_parser = parse_duration)]
    pub work: Option<f64>,
    /// Short break duration
    #[arg(short, long, value_parser = parse_duration)]
    pub short_break: Option<f64>,
    /// Long break duration
    #[arg(short, long, value_parser = parse_duration)]
    pub long_break: Option<f64>,
    /// Work cycles before a long break
    #[arg(short, long)]
    pub cycles: Option<u32>,
    /// Speed up time by this factor (10, 20, 60, ...)
    #[arg(short = 'x', long = "debug", value_name = "FACTOR")]
    pub acceleration: Option<f64>,
    /// Use plain line output instead of the full-screen view
    #[arg(long, visible_alias = "no-curses")]
    pub plain: bool,
    #[arg(long)]
    pub no_notify: bool,
    #[arg(long)]
    pub no_sound: bool,
    /// Pause after every phase instead of continuing automatically
    #[arg(long)]
    pub pause_between: bool,
    /// Redraw cadence in milliseconds
    #[arg(long, value_name = "MS")]
    pub tick_ms: Option<u64>,
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

/// Parses a duration into minutes. A bare number is taken as minutes.
pub fn parse_duration(s: &str) -> Result<f64, String> {
    let s = s.trim().to_lowercase();
    let mut total = 0.0;
    let mut num = String::new();

    for c in s.chars() {
        match c {
            '0'..='9' | '.' => num.push(c),
            'h' => { total += num.parse::<f64>().map_err(|_| "Invalid hours")? * 60.0; num.clear(); }
            'm' => { total += num.parse::<f64>().map_err(|_| "Invalid minutes")?; num.clear(); }
            's' => { total += num.parse::<f64>().map_err(|_| "Invalid seconds")? / 60.0; num.clear(); }
            _ => return Err("Invalid format".into()),
        }
    }

    if !num.is_empty() {
        total += num.parse::<f64>().map_err(|_| "Invalid minutes")?;
    }

    if total > 0.0 { Ok(total) } else { Err("Duration must be > 0".into()) }
}

// ============================================================================
// Configuration
// ============================================================================

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DisplayMode {
    #[default]
    Rich,
    Plain,
}

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Minutes
    pub work_duration: f64,
    pub short_break_duration: f64,
    pub long_break_duration: f64,
    pub cycles_before_long_break: u32,
    pub notifications_enabled: bool,
    pub sound_enabled: bool,
    pub acceleration: f64,
    pub display_mode: DisplayMode,
    pub auto_continue: bool,
    pub tick_interval_ms: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            work_duration: 25.0,
            short_break_duration: 5.0,
            long_break_duration: 15.0,
            cycles_before_long_break: 4,
            notifications_enabled: true,
            sound_enabled: true,
            acceleration: 1.0,
            display_mode: DisplayMode::Rich,
            auto_continue: true,
            tick_interval_ms: 1000,
        }
    }
}

impl Config {
    /// Loads the config file, falling back to defaults when it does not exist.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => return Err(ConfigError::Read { path: path.to_path_buf(), source }),
        };
        serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Applies CLI overrides on top of file values.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(w) = args.work { self.work_duration = w; }
        if let Some(s) = args.short_break { self.short_break_duration = s; }
        if let Some(l) = args.long_break { self.long_break_duration = l; }
        if let Some(c) = args.cycles { self.cycles_before_long_break = c; }
        if let Some(x) = args.acceleration { self.acceleration = x; }
        if let Some(t) = args.tick_ms { self.tick_interval_ms = t; }
        if args.plain { self.display_mode = DisplayMode::Plain; }
        if args.no_notify { self.notifications_enabled = false; }
        if args.no_sound { self.sound_enabled = false; }
        if args.pause_between { self.auto_continue = false; }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        for phase in [Phase::Work, Phase::ShortBreak, Phase::LongBreak] {
            self.phase_duration(phase)?;
        }
        if self.cycles_before_long_break < 1 {
            return Err(ConfigError::InvalidCycles(self.cycles_before_long_break));
        }
        if !self.acceleration.is_finite() || self.acceleration < 1.0 {
            return Err(ConfigError::InvalidAcceleration(self.acceleration));
        }
        if self.tick_interval_ms == 0 {
            return Err(ConfigError::InvalidTickInterval(self.tick_interval_ms));
        }
        Ok(())
    }

    /// Nominal duration of `phase`, rejecting values that are not positive.
    pub fn phase_duration(&self, phase: Phase) -> Result<Duration, ConfigError> {
        let (field, minutes) = match phase {
            Phase::Work => ("work", self.work_duration),
            Phase::ShortBreak => ("short break", self.short_break_duration),
            Phase::LongBreak => ("long break", self.long_break_duration),
        };
        match Duration::try_from_secs_f64(minutes * 60.0) {
            Ok(d) if !d.is_zero() => Ok(d),
            _ => Err(ConfigError::InvalidDuration { field, minutes }),
        }
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }
}

/// Path of `filename` inside the data directory, creating the directory.
pub fn get_path(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(".");
    path.push(DATA_DIR);
    let _ = fs::create_dir_all(&path);
    path.push(filename);
    path
}
