//! Terminal UI rendering — status bar, transcript, activity panel, input.

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Position};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use unicode_width::UnicodeWidthChar;

use crate::constants::APP_NAME;

use super::App;
use super::conversation::Role;

/// Rows reserved for the activity panel (borders included).
const ACTIVITY_ROWS: u16 = 5;

impl App {
    /// Render the full TUI frame: status bar, transcript, activity log,
    /// and input prompt.
    pub fn draw(&mut self, frame: &mut Frame<'_>) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(1),
                Constraint::Length(ACTIVITY_ROWS),
                Constraint::Length(3),
            ])
            .split(frame.area());

        // ── Status bar ───────────────────────────────────────────────
        let persona = self.conversation.persona();
        let header_line = Line::from(vec![
            Span::styled("Persona: ", Style::default().fg(Color::DarkGray)),
            Span::styled(persona.display_name(), Style::default().fg(Color::Magenta)),
            Span::styled(
                format!("  Model: {}", persona.model()),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!("  Key: {}", self.api_key_hint),
                Style::default().fg(Color::Green),
            ),
            Span::styled(
                format!("  Turns: {}", self.conversation.turns()),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!("  · {APP_NAME} — powered by Agent Coach AI"),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(Paragraph::new(header_line), chunks[0]);

        // ── Transcript ───────────────────────────────────────────────
        let inner_width = chunks[1].width.saturating_sub(2);
        let inner_height = chunks[1].height.saturating_sub(2) as usize;

        // Build the transcript paragraph with wrapping so we can query its
        // rendered line count (ratatui 0.30 native API).
        let transcript = Paragraph::new(Text::from(self.transcript_lines())).wrap(Wrap { trim: false });

        let total_visual = transcript.line_count(inner_width);
        let max_scroll = total_visual.saturating_sub(inner_height);

        // Clamp scroll_offset (lines from the bottom) to valid range.
        if (self.scroll_offset as usize) > max_scroll {
            self.scroll_offset = max_scroll as u16;
        }
        let top_row = max_scroll.saturating_sub(self.scroll_offset as usize) as u16;

        let title = if self.scroll_offset > 0 {
            format!(" {} [↑{}] ", persona.display_name(), self.scroll_offset)
        } else {
            format!(" {} ", persona.display_name())
        };

        let transcript_panel = transcript
            .block(Block::default().borders(Borders::ALL).title(title))
            .scroll((top_row, 0));
        frame.render_widget(transcript_panel, chunks[1]);

        // ── Activity log ─────────────────────────────────────────────
        let visible = (ACTIVITY_ROWS.saturating_sub(2)) as usize;
        let skip = self.logs.len().saturating_sub(visible);
        let log_lines: Vec<Line> = self.logs[skip..].iter().map(|l| l.render()).collect();
        let log_panel = Paragraph::new(Text::from(log_lines))
            .block(Block::default().borders(Borders::ALL).title(" Activity "));
        frame.render_widget(log_panel, chunks[2]);

        // ── Input prompt ─────────────────────────────────────────────
        let input_width = chunks[3].width.saturating_sub(2) as usize;
        let (visible_input, cursor_col) = self.input_view(input_width.max(1));
        let input_panel = Paragraph::new(visible_input)
            .block(Block::default().borders(Borders::ALL).title(" Message "));
        frame.render_widget(input_panel, chunks[3]);

        frame.set_cursor_position(Position::new(
            chunks[3].x + 1 + cursor_col,
            chunks[3].y + 1,
        ));
    }

    // ── Input helpers ────────────────────────────────────────────────

    /// Horizontal view into the input line for a box of `width` display
    /// columns: the visible tail of the text plus the cursor's column
    /// within it.
    ///
    /// The cursor is a char index, but terminal cells are display columns
    /// and some characters occupy two; when the cursor's column would fall
    /// outside the box, characters are dropped from the left until it
    /// fits.
    fn input_view(&self, width: usize) -> (String, u16) {
        let cursor_col: usize = self
            .input
            .chars()
            .take(self.cursor)
            .map(|ch| ch.width().unwrap_or(0))
            .sum();

        if cursor_col < width {
            return (self.input.clone(), cursor_col as u16);
        }

        let mut skipped = 0;
        let mut skip_width = 0;
        for ch in self.input.chars() {
            if cursor_col - skip_width < width {
                break;
            }
            skip_width += ch.width().unwrap_or(0);
            skipped += 1;
        }

        let visible: String = self.input.chars().skip(skipped).collect();
        (visible, (cursor_col - skip_width) as u16)
    }

    // ── Transcript helpers ───────────────────────────────────────────

    /// One styled line per transcript row, message bodies split on
    /// newlines so multi-paragraph replies wrap correctly.
    fn transcript_lines(&self) -> Vec<Line<'static>> {
        let persona = self.conversation.persona();
        let mut lines = Vec::new();

        for message in self.conversation.messages() {
            let (label, color) = match message.role {
                Role::User => ("you".to_string(), Color::Cyan),
                Role::Assistant => (persona.id().to_string(), Color::Magenta),
            };

            let mut body = message.content.split('\n');
            let first = body.next().unwrap_or_default();
            lines.push(Line::from(vec![
                Span::styled(format!("{label} ▸ "), Style::default().fg(color)),
                Span::raw(first.to_string()),
            ]));
            for part in body {
                lines.push(Line::from(Span::raw(part.to_string())));
            }
            lines.push(Line::default());
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::super::App;

    fn app_with_input(text: &str) -> App {
        let mut app = App::new_for_tests();
        for ch in text.chars() {
            app.insert_char(ch);
        }
        app
    }

    #[test]
    fn short_input_is_shown_whole() {
        let app = app_with_input("hi coach");
        let (visible, col) = app.input_view(20);
        assert_eq!(visible, "hi coach");
        assert_eq!(col, 8);
    }

    #[test]
    fn long_input_scrolls_to_keep_the_cursor_in_the_box() {
        let app = app_with_input("abcdefghij");
        let (visible, col) = app.input_view(5);
        assert_eq!(visible, "ghij");
        assert_eq!(col, 4);
    }

    #[test]
    fn wide_characters_count_as_two_columns() {
        // Each CJK glyph takes two cells; the cursor column must reflect
        // display width, not the char index.
        let app = app_with_input("日本語");
        let (visible, col) = app.input_view(10);
        assert_eq!(visible, "日本語");
        assert_eq!(col, 6);

        let (visible, col) = app.input_view(5);
        assert_eq!(visible, "本語");
        assert_eq!(col, 4);
    }

    #[test]
    fn mid_line_cursor_needs_no_scrolling() {
        let mut app = app_with_input("abcdefghij");
        app.move_cursor_home();
        let (visible, col) = app.input_view(5);
        assert_eq!(visible, "abcdefghij");
        assert_eq!(col, 0);
    }
}
