//! TUI Application module for BlobHub CLI.
//!
//! # Architecture
//!
//! - `run_tui()` - interactive render loop drawing the tracking view
//! - `run_headless()` - status lines for non-TTY environments
//!
//! Both loops run on the main thread at their own cadence, independent of
//! the source threads feeding the hub. Each frame polls the sources and
//! reads the display buffer through its snapshot lock.

use std::io::{self, Stdout};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use blobhub::app::HubApp;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::{debug, info};

use crate::error::CliError;
use crate::ui::{self, Dashboard};

/// Target frame interval of the render loop.
const FRAME_INTERVAL: Duration = Duration::from_millis(33);

/// Interval between headless status lines.
const STATUS_INTERVAL: Duration = Duration::from_secs(5);

/// Restores the terminal when dropped, including on early return.
struct TerminalGuard {
    terminal: Terminal<CrosstermBackend<Stdout>>,
}

impl TerminalGuard {
    fn enter() -> Result<Self, CliError> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let terminal = Terminal::new(CrosstermBackend::new(stdout))?;
        Ok(Self { terminal })
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(self.terminal.backend_mut(), LeaveAlternateScreen);
        let _ = self.terminal.show_cursor();
    }
}

fn deadline_reached(started: Instant, limit: Option<Duration>) -> bool {
    limit.is_some_and(|limit| started.elapsed() >= limit)
}

/// Run the interactive tracking view until `q`, Ctrl-C or the time limit.
pub fn run_tui(
    app: &HubApp,
    shutdown: Arc<AtomicBool>,
    limit: Option<Duration>,
) -> Result<(), CliError> {
    let mut guard = TerminalGuard::enter()?;
    let mut dashboard = Dashboard::new();
    let started = Instant::now();

    while !shutdown.load(Ordering::SeqCst) && !deadline_reached(started, limit) {
        let frame_start = Instant::now();
        app.update();

        let status = app.status();
        let mut resized = None;
        guard.terminal.draw(|frame| {
            resized = dashboard.render(frame, app.display(), &status);
        })?;

        if let Some((width, height)) = resized {
            debug!(width, height, "Tracking view resized");
            app.resize(width, height);
        }

        let timeout = FRAME_INTERVAL.saturating_sub(frame_start.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let ctrl_c = key.modifiers.contains(KeyModifiers::CONTROL)
                    && key.code == KeyCode::Char('c');
                if ctrl_c || matches!(key.code, KeyCode::Char('q') | KeyCode::Esc) {
                    info!("Quit requested from terminal");
                    break;
                }
            }
        }
    }

    Ok(())
}

/// Simple headless mode for non-interactive terminals.
pub fn run_headless(
    app: &HubApp,
    shutdown: Arc<AtomicBool>,
    limit: Option<Duration>,
) -> Result<(), CliError> {
    println!("BlobHub running headless.");
    println!("Press Ctrl+C to stop.");
    println!();
    for line in app.status().lines() {
        println!("  {}", line);
    }
    println!();

    let started = Instant::now();
    let mut last_status = Instant::now();

    while !shutdown.load(Ordering::SeqCst) && !deadline_reached(started, limit) {
        app.update();
        std::thread::sleep(Duration::from_millis(100));

        if last_status.elapsed() >= STATUS_INTERVAL {
            let items = app.display().with_snapshot(|snapshot| snapshot.len());
            ui::dashboard::print_simple_status(&app.status(), items);
            last_status = Instant::now();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deadline() {
        let started = Instant::now();
        assert!(!deadline_reached(started, None));
        assert!(deadline_reached(started, Some(Duration::ZERO)));
        assert!(!deadline_reached(started, Some(Duration::from_secs(3600))));
    }
}
