//! Slash-command dispatch and handler implementations.
//!
//! Every `/command` typed by the user is routed through
//! [`App::handle_command`]:
//!
//! | Command              | Effect                                  |
//! |----------------------|-----------------------------------------|
//! | `/agent`             | List personas, mark the active one      |
//! | `/agent use <name>`  | Switch persona (resets the chat)        |
//! | `/reset`             | Clear history, keep the active persona  |
//! | `/clear`             | Clear the activity log                  |
//! | `/help`, `/quit`     | The obvious                             |

use super::App;
use super::log_src;
use super::logging::LogLevel;
use super::personas::Persona;

// ── Command dispatch ─────────────────────────────────────────────────

impl App {
    /// Route a slash-command to the matching handler.
    pub(crate) fn handle_command(&mut self, line: &str) -> anyhow::Result<()> {
        let mut parts = line.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "/help" => self.show_help(),
            "/quit" | "/exit" => self.should_quit = true,
            "/clear" => self.logs.clear(),
            "/agent" => self.handle_agent_command(parts.collect()),
            "/reset" => self.handle_reset_command(),
            _ => log_src!(self, LogLevel::Warn, format!("Unknown command: {cmd}")),
        }

        Ok(())
    }
}

// ── Persona selection ────────────────────────────────────────────────

impl App {
    fn handle_agent_command(&mut self, args: Vec<&str>) {
        match args.split_first() {
            None => self.list_personas(),
            Some((&"use", rest)) => {
                if rest.is_empty() {
                    log_src!(self, LogLevel::Warn, "Usage: /agent use <name>".to_string());
                    return;
                }
                let name = rest.join(" ");
                match Persona::from_name(&name) {
                    Ok(persona) => self.switch_persona(persona),
                    Err(err) => log_src!(self, LogLevel::Warn, format!("{err}")),
                }
            }
            Some((other, _)) => log_src!(
                self,
                LogLevel::Warn,
                format!("Unknown /agent command: {other}")
            ),
        }
    }

    fn list_personas(&mut self) {
        let active = self.conversation.persona();
        self.log(LogLevel::Info, "Personas:".to_string());
        for persona in Persona::ALL {
            let marker = if persona == active { "●" } else { " " };
            self.log(
                LogLevel::Info,
                format!(
                    " {marker} {id:6} {name} [{model}]",
                    id = persona.id(),
                    name = persona.display_name(),
                    model = persona.model(),
                ),
            );
        }
        self.log(
            LogLevel::Info,
            "Switch with /agent use <name> or Tab.".to_string(),
        );
    }

    /// Switch to `persona`, resetting the conversation.  A no-op when the
    /// persona is already active.
    pub(crate) fn switch_persona(&mut self, persona: Persona) {
        if !self.conversation.select(persona) {
            self.log(
                LogLevel::Info,
                format!("{} is already active.", persona.display_name()),
            );
            return;
        }
        self.scroll_offset = 0;
        self.log(
            LogLevel::Info,
            format!("Switched to {}.", persona.display_name()),
        );
    }

    /// Tab handler: advance to the next persona in selector order.
    pub(crate) fn cycle_persona(&mut self) {
        let next = self.conversation.persona().next();
        self.switch_persona(next);
    }

    fn handle_reset_command(&mut self) {
        self.conversation.reset();
        self.scroll_offset = 0;
        self.log(
            LogLevel::Info,
            format!(
                "Chat history cleared for {}.",
                self.conversation.persona().display_name()
            ),
        );
    }
}

// ── Help ─────────────────────────────────────────────────────────────

impl App {
    fn show_help(&mut self) {
        let lines = [
            "━━━  ◆ Coachdesk — the Agent Coach AI persona suite  ━━━",
            "",
            "Just type to chat with the active persona.",
            "",
            "Personas",
            "  /agent                  List personas (● marks active)",
            "  /agent use <name>       Switch persona — starts a fresh chat",
            "  Tab                     Cycle to the next persona",
            "",
            "Chat",
            "  /reset                  Clear history, keep the persona",
            "  Up/Down, PgUp/PgDn      Scroll the transcript",
            "",
            "Session",
            "  /clear                  Clear the activity log (also Ctrl+L)",
            "  /help                   This text",
            "  /quit                   Exit (also Esc or Ctrl+C)",
        ];
        for line in lines {
            self.log(LogLevel::Info, line.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::conversation::Role;

    #[test]
    fn agent_use_switches_and_reseeds_history() {
        let mut app = App::new_for_tests();
        app.handle_chat_noop_fill();

        app.handle_command("/agent use hal").unwrap();
        assert_eq!(app.conversation.persona(), Persona::Hal);
        assert_eq!(app.conversation.messages().len(), 1);
        assert_eq!(app.conversation.messages()[0].role, Role::Assistant);
    }

    #[test]
    fn agent_use_unknown_name_changes_nothing() {
        let mut app = App::new_for_tests();
        let before = app.conversation.persona();

        app.handle_command("/agent use zeus").unwrap();
        assert_eq!(app.conversation.persona(), before);
    }

    #[test]
    fn reset_keeps_persona() {
        let mut app = App::new_for_tests();
        app.handle_command("/agent use simon").unwrap();
        app.conversation.push_user("how much is it worth?");

        app.handle_command("/reset").unwrap();
        assert_eq!(app.conversation.persona(), Persona::Simon);
        assert_eq!(app.conversation.messages().len(), 1);
    }

    #[test]
    fn tab_cycles_back_to_the_first_persona() {
        let mut app = App::new_for_tests();
        for _ in 0..Persona::ALL.len() {
            app.cycle_persona();
        }
        assert_eq!(app.conversation.persona(), Persona::Coach);
    }

    impl App {
        /// Seed a couple of turns so reset/switch effects are observable.
        fn handle_chat_noop_fill(&mut self) {
            self.conversation.push_user("hello coach");
            self.conversation.push_assistant("hello agent");
        }
    }
}
