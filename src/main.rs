use clap::Parser;
use crossterm::style::Stylize;
use std::io::{self, IsTerminal};

use pomo::config::get_path;
use pomo::logging::init_logging;
use pomo::prelude::*;
use pomo::terminal::{install_panic_hook, wait_for_key, TerminalGuard};

// ============================================================================
// Main
// ============================================================================

fn main() -> std::process::ExitCode {
    let args = Args::parse();

    match run(&args) {
        Ok(summary) => {
            println!("Exiting Pomodoro CLI. {} pomodoros completed. Goodbye!", summary.pomodoros);
            std::process::ExitCode::from(ExitCode::SUCCESS)
        }
        Err(e) => {
            tracing::error!(error = %e, "exiting with error");
            eprintln!("{} {e}", "error:".red().bold());
            std::process::ExitCode::from(e.exit_code())
        }
    }
}

fn load_config(args: &Args) -> Result<Config, ConfigError> {
    let path = args.config.clone().unwrap_or_else(|| get_path("config.json"));
    let mut config = Config::load(&path)?;
    config.apply_args(args);
    if !io::stdout().is_terminal() {
        config.display_mode = DisplayMode::Plain;
    }
    config.validate()?;
    Ok(config)
}

fn run(args: &Args) -> Result<SessionSummary, AppError> {
    let log_path = args.log_file.clone().unwrap_or_else(|| get_path("pomo.log"));
    if let Err(e) = init_logging(&log_path, args.verbose) {
        eprintln!("warning: logging disabled, cannot open {}: {e}", log_path.display());
    }

    let config = load_config(args)?;
    let clock = PhaseClock::new(&config)?;
    tracing::info!(
        started_at = %chrono::Local::now().to_rfc3339(),
        work = config.work_duration,
        short_break = config.short_break_duration,
        long_break = config.long_break_duration,
        cycles = config.cycles_before_long_break,
        acceleration = config.acceleration,
        mode = ?config.display_mode,
        "configuration loaded"
    );
    print_banner(&config);
    println!("\nPress any key to continue...");
    wait_for_key()?;

    let notifier: Box<dyn NotifySink> = if config.notifications_enabled {
        Box::new(DesktopNotifier::new(config.sound_enabled))
    } else {
        Box::new(SilentNotifier)
    };

    install_panic_hook(config.display_mode);
    let _guard = TerminalGuard::acquire(config.display_mode)?;
    let renderer: Box<dyn RenderSink> = match config.display_mode {
        DisplayMode::Rich => Box::new(RichRenderer::new()?),
        DisplayMode::Plain => Box::new(PlainRenderer::stdout()),
    };

    let mut session = SessionLoop::new(clock, renderer, notifier);
    let mut events = TerminalEvents::new(config.tick_interval());
    Ok(session.run(&mut events)?)
}

fn print_banner(config: &Config) {
    println!("{}", "🍅 Pomodoro CLI 🍅".bold());
    println!("Starting Pomodoro timer with:");
    println!("- Work: {} minutes", config.work_duration);
    println!("- Short break: {} minutes", config.short_break_duration);
    println!("- Long break: {} minutes", config.long_break_duration);
    println!("- Cycles before long break: {}", config.cycles_before_long_break);
    if config.acceleration > 1.0 {
        println!("{}", format!("- DEBUG MODE: Time accelerated {}x", config.acceleration).yellow());
    }
}
