//! Chat turn handling — payload assembly and the single upstream call.
//!
//! One turn is: append the user message, build the persona-specific
//! outbound payload (date stamp, listing enrichment), forward the prior
//! history plus the payload to Gemini under the persona's system prompt,
//! then append the reply.  A failed call leaves the history exactly as it
//! was after the user message was appended, so nothing is lost on resend.
//! No retries, no caching — each turn is one independent round-trip.
//!
//! The turn is split into phases (`begin_turn` → `run_enrichment` →
//! `note_waiting` → `complete_turn`) so the draw loop in `main.rs` can
//! render a frame between them: the "researching" and "waiting" notices
//! are on screen while the blocking network calls run, not after.

use anyhow::Result;
use chrono::Local;

use crate::search::Enrichment;

use super::App;
use super::log_src;
use super::logging::LogLevel;
use super::personas::Persona;

/// Compose the outbound payload for one turn.
///
/// Simon's turns are prefixed with the current date so valuation reports
/// can be dated without the model guessing; enrichment snippets (Hal) are
/// appended under a `[SYSTEM DATA]` marker the system prompt knows about.
pub(crate) fn outbound_payload(
    persona: Persona,
    text: &str,
    enrichment: Option<&str>,
    date_line: &str,
) -> String {
    let mut payload = if persona.uses_date_stamp() {
        format!("Date: {date_line}\n\nInputs: {text}")
    } else {
        text.to_string()
    };

    if let Some(snippets) = enrichment {
        payload.push_str(&format!("\n\n[SYSTEM DATA]: {snippets}"));
    }

    payload
}

impl App {
    /// Phase 1 — record the user turn and announce what is about to
    /// happen.  Runs before an interim frame, so the notice is visible
    /// while the search call below blocks the loop.
    pub fn begin_turn(&mut self, text: &str) {
        self.conversation.push_user(text);
        self.scroll_offset = 0;

        if self.conversation.persona().uses_listing_enrichment() {
            self.log(LogLevel::Info, "Hal is researching…".to_string());
        }
    }

    /// Phase 2 — blocking listing lookup for personas that use it,
    /// collapsing empty and failed searches to `None`.
    pub fn run_enrichment(&mut self, text: &str) -> Option<String> {
        if !self.conversation.persona().uses_listing_enrichment() {
            return None;
        }

        match self.runtime.block_on(self.search.enrich(text)) {
            Enrichment::Enriched(snippets) => Some(snippets),
            Enrichment::NotEnriched => None,
            Enrichment::Failed(reason) => {
                log_src!(
                    self,
                    LogLevel::Warn,
                    format!("Listing search skipped: {reason}")
                );
                None
            }
        }
    }

    /// Announce the upstream call; rendered by the frame drawn before
    /// [`Self::complete_turn`] blocks on it.
    pub fn note_waiting(&mut self) {
        self.log(
            LogLevel::Info,
            format!(
                "Waiting for {}…",
                self.conversation.persona().display_name()
            ),
        );
    }

    /// Phase 3 — the blocking Gemini call and history update.
    pub fn complete_turn(&mut self, text: &str, enrichment: Option<String>) {
        let persona = self.conversation.persona();
        let date_line = Local::now().format("%B %d, %Y").to_string();
        let payload = outbound_payload(persona, text, enrichment.as_deref(), &date_line);

        let history = self.conversation.prior_history();
        let result = self.runtime.block_on(self.gemini.generate(
            persona.model(),
            persona.system_prompt(),
            &history,
            &payload,
        ));

        self.finish_turn(result);
    }

    /// Apply the upstream result to the conversation.
    ///
    /// Success appends exactly one assistant message; failure appends
    /// nothing, keeping the user's message in place for a resend.
    pub(crate) fn finish_turn(&mut self, result: Result<String>) {
        match result {
            Ok(reply) => self.conversation.push_assistant(reply),
            Err(err) => {
                log_src!(self, LogLevel::Error, format!("Chat turn failed: {err:#}"));
                self.log(
                    LogLevel::Info,
                    "Your message was kept; send it again to retry.".to_string(),
                );
            }
        }
    }
}
