//! Per-session conversation state and the persona-switch machine.
//!
//! One [`Conversation`] lives inside the [`App`](super::App) for the
//! lifetime of the process.  Switching personas or resetting re-seeds the
//! history with the persona's welcome message, so the history is never
//! empty and the system prompt sent upstream always belongs to the persona
//! that produced the visible transcript.

use crate::gemini::Content;

use super::personas::Persona;

/// Author of a [`ChatMessage`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Role name the Gemini API expects for this side of the conversation.
    pub fn wire_name(self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "model",
        }
    }
}

/// One transcript entry.
#[derive(Clone, Debug)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        ChatMessage {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// The active persona plus its ordered message history.
pub struct Conversation {
    persona: Persona,
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Fresh conversation seeded with the persona's welcome message.
    pub fn new(persona: Persona) -> Self {
        Conversation {
            persona,
            messages: vec![ChatMessage::assistant(persona.welcome())],
        }
    }

    pub fn persona(&self) -> Persona {
        self.persona
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Completed user/assistant turn pairs (welcome excluded).
    pub fn turns(&self) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == Role::Assistant)
            .count()
            .saturating_sub(1)
    }

    /// Switch to `persona`, discarding history.  Selecting the already
    /// active persona is a no-op; returns whether a switch happened.
    pub fn select(&mut self, persona: Persona) -> bool {
        if persona == self.persona {
            return false;
        }
        *self = Conversation::new(persona);
        true
    }

    /// Drop all turns and re-seed with the current persona's welcome.
    pub fn reset(&mut self) {
        *self = Conversation::new(self.persona);
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::user(text));
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.messages.push(ChatMessage::assistant(text));
    }

    /// Translate every message except the most recent one into API
    /// contents.  Called after the in-flight user turn has been appended,
    /// so the excluded tail is exactly that turn — it travels separately as
    /// the request payload.
    pub fn prior_history(&self) -> Vec<Content> {
        let end = self.messages.len().saturating_sub(1);
        self.messages[..end]
            .iter()
            .map(|m| Content::text(m.role.wire_name(), m.content.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_conversation_is_seeded_with_welcome() {
        let conv = Conversation::new(Persona::Ava);
        assert_eq!(conv.messages().len(), 1);
        assert_eq!(conv.messages()[0].role, Role::Assistant);
        assert_eq!(conv.messages()[0].content, Persona::Ava.welcome());
    }

    #[test]
    fn switching_personas_discards_history() {
        let mut conv = Conversation::new(Persona::Coach);
        conv.push_user("hello");
        conv.push_assistant("hi there");

        assert!(conv.select(Persona::Hal));
        assert_eq!(conv.persona(), Persona::Hal);
        assert_eq!(conv.messages().len(), 1);
        assert_eq!(conv.messages()[0].content, Persona::Hal.welcome());
    }

    #[test]
    fn selecting_the_active_persona_is_a_noop() {
        let mut conv = Conversation::new(Persona::Coach);
        conv.push_user("hello");

        assert!(!conv.select(Persona::Coach));
        assert_eq!(conv.messages().len(), 2);
        assert_eq!(conv.messages()[1].content, "hello");
    }

    #[test]
    fn reset_keeps_persona_and_reseeds_welcome() {
        let mut conv = Conversation::new(Persona::Troy);
        conv.push_user("Springfield");
        conv.push_assistant("Here are your posts.");

        conv.reset();
        assert_eq!(conv.persona(), Persona::Troy);
        assert_eq!(conv.messages().len(), 1);
        assert_eq!(conv.messages()[0].content, Persona::Troy.welcome());
    }

    #[test]
    fn prior_history_excludes_in_flight_turn_and_maps_roles() {
        let mut conv = Conversation::new(Persona::Simon);
        conv.push_user("first question");
        conv.push_assistant("first answer");
        conv.push_user("second question");

        let history = conv.prior_history();
        assert_eq!(history.len(), 3);
        assert_eq!(history[0].role, "model"); // welcome
        assert_eq!(history[1].role, "user");
        assert_eq!(history[2].role, "model");
        assert_eq!(history[1].parts[0].text, "first question");
    }

    #[test]
    fn turns_counts_completed_pairs_only() {
        let mut conv = Conversation::new(Persona::Coach);
        assert_eq!(conv.turns(), 0);
        conv.push_user("q");
        assert_eq!(conv.turns(), 0);
        conv.push_assistant("a");
        assert_eq!(conv.turns(), 1);
    }
}
