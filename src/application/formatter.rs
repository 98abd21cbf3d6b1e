//! Output formatting for speeches, profiles and the practice timer.
//!
//! Supports plain text, JSON and table output.

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL, Table};
use serde::Serialize;

use crate::domain::{format_elapsed, PasswordStrength, Speech, TimerState, User};

use super::practice::TimerSnapshot;
use super::rich_text::{html_to_text, wrap};
use super::speeches::SpeechStats;

/// Output format options.
#[derive(Debug, Clone, Copy, Default)]
pub enum OutputFormat {
    /// Human-readable text.
    #[default]
    Text,
    /// JSON format for programmatic use.
    Json,
    /// Table listing.
    Table,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "table" => Ok(Self::Table),
            _ => Err(format!("Unknown format: {s}. Use: text, json, table")),
        }
    }
}

/// Formats any serializable value as pretty JSON.
///
/// # Errors
/// Returns error if serialization fails.
pub fn format_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Formats a table listing of speeches.
pub fn format_speeches_table(speeches: &[Speech], words_per_minute: u32) -> String {
    if speeches.is_empty() {
        return format!(
            "No speeches yet. Create one with {}",
            "podium create --title <TITLE> --content <TEXT>".cyan()
        );
    }

    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["ID", "Title", "Words", "Est.", "Preview"]);

    for speech in speeches {
        let stats = SpeechStats::of(speech, words_per_minute);
        let preview = html_to_text(&speech.content);

        table.add_row(vec![
            speech.id.to_string(),
            truncate(&speech.title, 30),
            stats.words.to_string(),
            format_elapsed(stats.estimated_secs),
            truncate(&preview, 40),
        ]);
    }

    table.to_string()
}

/// Formats a speech for reading, wrapped to `width` columns.
pub fn format_speech(speech: &Speech, stats: SpeechStats, width: usize) -> String {
    let title = if speech.title.is_empty() {
        "Untitled"
    } else {
        speech.title.as_str()
    };

    let mut out = String::new();
    out.push_str(&format!("{}\n", title.bold()));
    out.push_str(&format!(
        "{}\n\n",
        format!(
            "#{} · {} words · ~{} to deliver",
            speech.id,
            stats.words,
            format_elapsed(stats.estimated_secs)
        )
        .dimmed()
    ));
    out.push_str(&wrap(&html_to_text(&speech.content), width));
    out
}

/// Formats the user profile.
pub fn format_user(user: &User) -> String {
    let name = if user.name.is_empty() {
        "-"
    } else {
        user.name.as_str()
    };
    format!(
        "{}\n  Name:  {}\n  Email: {}",
        "👤 Profile".bold(),
        name.cyan(),
        user.email.cyan()
    )
}

/// Formats the stopwatch display, colored by state.
pub fn format_timer(snapshot: TimerSnapshot) -> String {
    let time = format_elapsed(snapshot.elapsed);
    match snapshot.state {
        TimerState::Running => format!("{}  {}", time.green().bold(), "● running".green()),
        TimerState::Paused => format!("{}  {}", time.yellow().bold(), "❚❚ paused".yellow()),
        TimerState::Idle => format!("{}  {}", time.dimmed(), "idle".dimmed()),
    }
}

/// Formats a password strength hint.
pub fn format_strength(strength: PasswordStrength) -> String {
    let label = strength.to_string();
    let colored = match strength {
        PasswordStrength::Weak => label.red(),
        PasswordStrength::Fair => label.yellow(),
        PasswordStrength::Good => label.cyan(),
        PasswordStrength::Strong => label.green(),
    };
    format!("Password strength: {colored}")
}

/// Truncates the first line of a string to `max_len` characters with ellipsis.
fn truncate(s: &str, max_len: usize) -> String {
    let s = s.lines().next().unwrap_or(s);
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{cut}...")
    }
}
