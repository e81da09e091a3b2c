//! Coachdesk — an interactive TUI chat suite for the Agent Coach AI
//! real-estate personas, backed by the Gemini chat-completion API.
//!
//! This binary sets up a full-screen terminal UI, delegates to [`app::App`]
//! for all application logic, and tears the terminal down on exit.

mod app;
mod constants;
mod gemini;
mod search;
mod util;

use std::io;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::ExecutableCommand;
use crossterm::event;
use crossterm::terminal::{self, EnterAlternateScreen, LeaveAlternateScreen};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;

use crate::app::App;

// ── Entry point ──────────────────────────────────────────────────────

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    // Resolve configuration before touching the terminal so a missing API
    // key prints a plain message instead of dying inside the alternate
    // screen.
    let mut app = App::new()?;

    let mut terminal = setup_terminal()?;
    let run_result = run_app(&mut terminal, &mut app);

    restore_terminal()?;
    run_result
}

// ── Terminal lifecycle ───────────────────────────────────────────────

/// Enable raw mode, switch to the alternate screen, and create the backend.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    terminal::enable_raw_mode().context("enable raw mode")?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
fn restore_terminal() -> Result<()> {
    terminal::disable_raw_mode().context("disable raw mode")?;
    let mut stdout = io::stdout();
    stdout.execute(LeaveAlternateScreen)?;
    Ok(())
}

/// Main draw → poll → handle loop.
///
/// Chat turns are driven here rather than inside event handling: the
/// interim draws keep the "researching" / "waiting" notices on screen
/// while the blocking network phases run.
fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        if event::poll(Duration::from_millis(50))? {
            let ev = event::read()?;
            app.handle_event(ev)?;
        }

        if let Some(message) = app.take_pending_message() {
            app.begin_turn(&message);
            terminal.draw(|frame| app.draw(frame))?;

            let enrichment = app.run_enrichment(&message);
            app.note_waiting();
            terminal.draw(|frame| app.draw(frame))?;

            app.complete_turn(&message, enrichment);
        }
    }

    Ok(())
}
