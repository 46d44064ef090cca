//! Colored terminal rendering for series types.

use eventseries_core::{GeneratedEvent, SeriesAggregate};
use owo_colors::OwoColorize;

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for GeneratedEvent {
    fn render(&self) -> String {
        let seq = format!("#{:<3}", self.sequence_number);
        let times = format!("{}-{}", self.start.format("%H:%M"), self.end.format("%H:%M"));
        let rollover = if self.end.date() > self.date {
            " (+1d)".dimmed().to_string()
        } else {
            String::new()
        };

        format!(
            "{} {} {}{} {}",
            seq.dimmed(),
            self.date.format("%a %b %-d %Y"),
            times,
            rollover,
            self.title
        )
    }
}

impl Render for SeriesAggregate {
    fn render(&self) -> String {
        let sessions = if self.total_sessions == 1 {
            "1 session".to_string()
        } else {
            format!("{} sessions", self.total_sessions)
        };

        format!(
            "{} from {} to {}",
            sessions.bold(),
            self.start_date.format("%Y-%m-%d"),
            self.end_date.format("%Y-%m-%d")
        )
    }
}
