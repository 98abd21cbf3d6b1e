//! CLI interface using clap.
//!
//! Provides command-line arguments and subcommands for the tool.

use std::path::PathBuf;

use clap::{ArgGroup, Parser, Subcommand};

use crate::application::OutputFormat;

/// Podium - write, manage and rehearse speeches.
///
/// Quick start: podium login --email you@example.com | list | practice <id>
#[derive(Parser, Debug)]
#[command(name = "podium")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Output format: text, json, or table.
    #[arg(short, long, default_value = "text", global = true)]
    pub format: String,

    /// Base URL of the speech service (overrides the config file).
    #[arg(long, env = "PODIUM_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Path to a configuration file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a new account.
    Register {
        /// Display name.
        #[arg(short, long)]
        name: String,

        /// Email address used to log in.
        #[arg(short, long)]
        email: String,

        /// Password (prompted twice if omitted).
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Log in and remember the session.
    Login {
        /// Account email.
        #[arg(short, long)]
        email: String,

        /// Password (prompted if omitted).
        #[arg(short, long)]
        password: Option<String>,
    },

    /// Forget the stored session.
    Logout,

    /// Show the logged-in user.
    Whoami,

    /// Update name, email or password.
    Profile {
        /// Current password, required to save changes (prompted if omitted).
        #[arg(long)]
        current_password: Option<String>,

        /// New display name.
        #[arg(short, long)]
        name: Option<String>,

        /// New email address.
        #[arg(short, long)]
        email: Option<String>,

        /// New password (leave out to keep the current one).
        #[arg(long)]
        new_password: Option<String>,
    },

    /// List your speeches.
    List,

    /// Read a speech.
    Show {
        /// Speech ID.
        id: String,

        /// Wrap width in columns (defaults to the configured width).
        #[arg(short, long)]
        width: Option<usize>,
    },

    /// Write a new speech.
    #[command(group(ArgGroup::new("body").required(true).args(["content", "file"])))]
    Create {
        /// Speech title.
        #[arg(short, long)]
        title: String,

        /// Speech text; blank lines separate paragraphs.
        #[arg(short, long)]
        content: Option<String>,

        /// Read the speech from a text or HTML file.
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Change the title or text of a speech.
    Edit {
        /// Speech ID.
        id: String,

        /// New title.
        #[arg(short, long)]
        title: Option<String>,

        /// New speech text.
        #[arg(short, long, conflicts_with = "file")]
        content: Option<String>,

        /// Read the new text from a file.
        #[arg(long)]
        file: Option<PathBuf>,
    },

    /// Delete a speech.
    Delete {
        /// Speech ID.
        id: String,

        /// Skip the confirmation prompt.
        #[arg(short, long)]
        yes: bool,
    },

    /// Rehearse a speech with a stopwatch.
    Practice {
        /// Speech ID.
        id: String,
    },

    /// Show the effective configuration and file paths.
    Config {
        /// Write the effective configuration to the config file.
        #[arg(long)]
        save: bool,
    },
}

impl Cli {
    /// Parse the output format argument.
    pub fn output_format(&self) -> Result<OutputFormat, String> {
        self.format.parse()
    }
}
