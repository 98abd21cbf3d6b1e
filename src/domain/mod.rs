//! Domain layer - core types and rules.
//!
//! This layer contains pure domain models, validation and the practice
//! stopwatch without any I/O.

pub mod config;
pub mod error;
pub mod models;
pub mod timer;
pub mod validation;

pub use config::AppConfig;
pub use error::{AppError, Result};
pub use models::{
    Credentials, ProfileUpdate, Registration, Session, Speech, SpeechDraft, SpeechId, User,
};
pub use timer::{format_elapsed, PracticeTimer, TimerState};
pub use validation::{password_strength, PasswordStrength};
