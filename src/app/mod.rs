//! Application core — state, lifecycle, and event dispatch.
//!
//! The [`App`] struct holds all runtime state and is the single entry point
//! for the rest of the binary.  Concerns are delegated to focused
//! submodules:
//!
//! | Module         | Responsibility                              |
//! |----------------|---------------------------------------------|
//! | `chat`         | Chat turn handling & payload assembly       |
//! | `commands`     | Slash-command dispatch & handlers           |
//! | `conversation` | Message history & persona-switch machine    |
//! | `input`        | Text-input editing (cursor, insert, etc.)   |
//! | `logging`      | `LogLevel`, `LogLine`                       |
//! | `personas`     | The closed persona registry                 |
//! | `ui`           | TUI rendering & status-bar helpers          |

mod chat;
mod commands;
mod conversation;
mod input;
mod logging;
pub(crate) mod personas;
mod ui;

use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use chrono::Local;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyModifiers};
use tokio::runtime::Runtime;

use crate::constants::{API_KEY_VARS, DEFAULT_HTTP_TIMEOUT_SECS, HTTP_TIMEOUT_VAR, MAX_LOGS};
use crate::gemini::GeminiClient;
use crate::search::SearchClient;
use crate::util::{env_first, mask_key};

use self::conversation::Conversation;
use self::logging::{LogLevel, LogLine};
use self::personas::Persona;

// ── Application state ────────────────────────────────────────────────

/// Top-level application state.
///
/// Fields use `pub(crate)` visibility so that the sibling submodules
/// (`commands`, `chat`, `ui`, …) can access them directly while keeping
/// them hidden from the rest of the crate.
pub struct App {
    pub(crate) runtime: Runtime,
    pub(crate) input: String,
    pub(crate) cursor: usize,
    pub(crate) logs: Vec<LogLine>,
    pub(crate) conversation: Conversation,
    pub(crate) gemini: GeminiClient,
    pub(crate) search: SearchClient,
    pub(crate) api_key_hint: String,
    pub(crate) pending_message: Option<String>,
    pub(crate) scroll_offset: u16,
    pub(crate) should_quit: bool,
}

// ── Lifecycle ────────────────────────────────────────────────────────

impl App {
    /// Create and initialise a new application instance.
    ///
    /// Fails when no Gemini API key can be resolved; the session cannot do
    /// anything useful without one, so startup halts with a message naming
    /// the variables to set.
    pub fn new() -> Result<Self> {
        let runtime = Runtime::new().context("create tokio runtime")?;

        let api_key = env_first(API_KEY_VARS).ok_or_else(|| {
            anyhow!(
                "Gemini API key not found. Set one of {} in the environment or a .env file.",
                API_KEY_VARS.join(" / ")
            )
        })?;

        let timeout = Duration::from_secs(
            env_first(&[HTTP_TIMEOUT_VAR])
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
        );

        let gemini = GeminiClient::new(&api_key, timeout)?;
        let search = SearchClient::new(timeout)?;

        let mut app = App {
            runtime,
            input: String::new(),
            cursor: 0,
            logs: Vec::new(),
            conversation: Conversation::new(Persona::Coach),
            gemini,
            search,
            api_key_hint: mask_key(&api_key),
            pending_message: None,
            scroll_offset: 0,
            should_quit: false,
        };

        app.log(
            LogLevel::Info,
            format!(
                "Active persona: {}. Tab cycles personas, /help lists commands.",
                app.conversation.persona().display_name()
            ),
        );

        Ok(app)
    }

    /// Whether the user has requested to quit.
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}

#[cfg(test)]
impl App {
    /// App with a dummy key and no environment dependency, for unit tests
    /// that never touch the network.
    pub(crate) fn new_for_tests() -> Self {
        let runtime = Runtime::new().expect("test runtime");
        App {
            runtime,
            input: String::new(),
            cursor: 0,
            logs: Vec::new(),
            conversation: Conversation::new(Persona::Coach),
            gemini: GeminiClient::new("test-key", Duration::from_secs(1)).expect("test client"),
            search: SearchClient::new(Duration::from_secs(1)).expect("test client"),
            api_key_hint: "test".to_string(),
            pending_message: None,
            scroll_offset: 0,
            should_quit: false,
        }
    }
}

// ── Event handling ───────────────────────────────────────────────────

impl App {
    /// Route a terminal event to the appropriate handler.
    pub fn handle_event(&mut self, event: Event) -> Result<()> {
        if let Event::Key(key) = event {
            self.handle_key(key)?;
        }
        Ok(())
    }

    /// Dispatch a key press to input editing, commands, or control actions.
    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match key {
            KeyEvent {
                code: KeyCode::Char('c'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => self.should_quit = true,

            KeyEvent {
                code: KeyCode::Char('l'),
                modifiers: KeyModifiers::CONTROL,
                ..
            } => self.logs.clear(),

            KeyEvent { code, .. } => match code {
                KeyCode::Char(ch) => {
                    self.scroll_offset = 0; // snap to bottom on new input
                    self.insert_char(ch);
                }
                KeyCode::Backspace => self.backspace(),
                KeyCode::Delete => self.delete(),
                KeyCode::Left => self.move_cursor_left(),
                KeyCode::Right => self.move_cursor_right(),
                KeyCode::Home => self.move_cursor_home(),
                KeyCode::End => self.move_cursor_end(),
                KeyCode::Up => self.scroll_up(1),
                KeyCode::Down => self.scroll_down(1),
                KeyCode::PageUp => self.scroll_up(10),
                KeyCode::PageDown => self.scroll_down(10),
                KeyCode::Tab => self.cycle_persona(),
                KeyCode::Enter => {
                    self.scroll_offset = 0; // snap to bottom on submit
                    self.submit_input()?;
                }
                KeyCode::Esc => self.should_quit = true,
                _ => {}
            },
        }
        Ok(())
    }

    /// Submit the current input line for processing.
    ///
    /// Chat text is not sent here: it is parked for the draw loop, which
    /// interleaves frames with the blocking turn phases so "researching" /
    /// "waiting" notices are visible while the network calls run.
    fn submit_input(&mut self) -> Result<()> {
        let line = self.input.trim().to_string();
        self.input.clear();
        self.cursor = 0;

        if line.is_empty() {
            return Ok(());
        }

        if line.starts_with('/') {
            self.handle_command(&line)?;
        } else {
            self.pending_message = Some(line);
        }

        Ok(())
    }

    /// Take the chat message parked by [`Self::submit_input`], if any.
    pub fn take_pending_message(&mut self) -> Option<String> {
        self.pending_message.take()
    }
}

// ── Scrolling ────────────────────────────────────────────────────────

impl App {
    /// Scroll the transcript up by `n` lines.
    pub(crate) fn scroll_up(&mut self, n: u16) {
        self.scroll_offset = self.scroll_offset.saturating_add(n);
    }

    /// Scroll the transcript down by `n` lines (towards the latest).
    pub(crate) fn scroll_down(&mut self, n: u16) {
        self.scroll_offset = self.scroll_offset.saturating_sub(n);
    }
}

// ── Logging ──────────────────────────────────────────────────────────

/// Log a `Warn`/`Error` message, attaching `[file:line]` in debug-logs builds.
///
/// In release (no `debug-logs` feature) this behaves like `self.log()`.
///
/// ```ignore
/// log_src!(self, LogLevel::Warn, format!("something broke: {err:#}"));
/// ```
macro_rules! log_src {
    ($app:expr, $level:expr, $msg:expr) => {{
        #[cfg(feature = "debug-logs")]
        {
            let loc = format!("{}:{}", file!(), line!());
            $app.log_with_src($level, $msg, &loc);
        }
        #[cfg(not(feature = "debug-logs"))]
        {
            $app.log($level, $msg);
        }
    }};
}
pub(crate) use log_src;

impl App {
    /// Append a message to the activity log.
    pub(crate) fn log(&mut self, level: LogLevel, message: String) {
        let timestamp = Local::now().format("%H:%M:%S").to_string();
        self.logs.push(LogLine {
            timestamp,
            level,
            message,
        });
        if self.logs.len() > MAX_LOGS {
            let overflow = self.logs.len() - MAX_LOGS;
            self.logs.drain(0..overflow);
        }
    }

    /// Append a message with a source location suffix (debug-logs builds only).
    #[cfg(feature = "debug-logs")]
    pub(crate) fn log_with_src(&mut self, level: LogLevel, message: String, src: &str) {
        let tagged = match level {
            LogLevel::Warn | LogLevel::Error => format!("{message}  [{src}]"),
            _ => message,
        };
        self.log(level, tagged);
    }
}
