//! Activity-log types for the status panel.

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

/// Severity of an activity-log entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Info,
    Warn,
    Error,
}

impl LogLevel {
    fn color(self) -> Color {
        match self {
            LogLevel::Info => Color::DarkGray,
            LogLevel::Warn => Color::Yellow,
            LogLevel::Error => Color::Red,
        }
    }

    fn tag(self) -> &'static str {
        match self {
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// One timestamped entry in the activity panel.
#[derive(Clone, Debug)]
pub struct LogLine {
    pub timestamp: String,
    pub level: LogLevel,
    pub message: String,
}

impl LogLine {
    pub fn render(&self) -> Line<'_> {
        Line::from(vec![
            Span::styled(
                format!("{} ", self.timestamp),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                format!("[{}] ", self.level.tag()),
                Style::default().fg(self.level.color()),
            ),
            Span::raw(self.message.as_str()),
        ])
    }
}
