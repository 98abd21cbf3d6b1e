//! Application layer - use cases and orchestration.
//!
//! This layer contains the account and speech workflows, the practice
//! session and terminal rendering of speeches.

pub mod account;
pub mod formatter;
pub mod practice;
pub mod rich_text;
pub mod speeches;

pub use account::{AccountService, ProfileForm, RegistrationForm};
pub use formatter::{
    format_json, format_speech, format_speeches_table, format_strength, format_timer,
    format_user, OutputFormat,
};
pub use practice::{PracticeCommand, PracticeSession, TimerSnapshot};
pub use speeches::{ContentSource, SpeechService, SpeechStats};
