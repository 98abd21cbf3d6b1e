//! Podium - write, manage and rehearse speeches from the terminal.
//!
//! Talks to the speech service REST API for accounts and speeches, and runs
//! a local stopwatch for practice sessions.
//!
//! QUICK START:
//!   podium register --name Ana --email ana@example.com
//!   podium login --email ana@example.com
//!   podium create --title "Wedding toast" --file toast.txt
//!   podium list
//!   podium practice <id>              # s start, p pause, r reset, q quit

mod application;
mod cli;
mod domain;
mod infrastructure;

use std::io::{BufRead, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use colored::Colorize;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use application::{
    format_json, format_speech, format_speeches_table, format_strength, format_timer,
    format_user, AccountService, ContentSource, OutputFormat, PracticeCommand, PracticeSession,
    ProfileForm, RegistrationForm, SpeechService, SpeechStats, TimerSnapshot,
};
use cli::{Cli, Commands};
use domain::{format_elapsed, password_strength, AppConfig, AppError, Result, SpeechId};
use infrastructure::config::{config_file_path, config_source_path};
use infrastructure::{
    ensure_config_exists, load_config, save_config, ApiClient, AuthContext, FileTokenStore,
};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        if e.is_auth() {
            eprintln!(
                "   Log in with: {}",
                "podium login --email <EMAIL>".cyan()
            );
        }
        std::process::exit(1);
    }
}

/// Main application logic.
async fn run(cli: Cli) -> Result<()> {
    let format = cli
        .output_format()
        .map_err(|message| AppError::Config { message })?;

    if cli.config.is_none() {
        ensure_config_exists(&config_file_path())?;
    }
    let config = load_config(cli.config.as_deref())?.with_base_url(cli.api_url);

    if let Commands::Config { save } = cli.command {
        return cmd_config(&config, cli.config.as_deref(), save, format);
    }

    let store = FileTokenStore::new(config.session_file_path());
    tracing::debug!(path = %store.path().display(), "Using session file");
    let auth = Arc::new(AuthContext::load(Box::new(store))?);
    let api = ApiClient::new(&config.api, auth)?;
    tracing::debug!(base_url = api.base_url(), "API client ready");

    match cli.command {
        Commands::Register {
            name,
            email,
            password,
        } => cmd_register(&api, name, email, password).await?,
        Commands::Login { email, password } => cmd_login(&api, &email, password).await?,
        Commands::Logout => cmd_logout(&api)?,
        Commands::Whoami => cmd_whoami(&api, format).await?,
        Commands::Profile {
            current_password,
            name,
            email,
            new_password,
        } => {
            let current_password = match current_password {
                Some(password) => password,
                None => prompt("Current password: ")?,
            };
            let form = ProfileForm {
                name,
                email,
                current_password,
                new_password,
            };
            cmd_profile(&api, form).await?;
        }
        Commands::List => cmd_list(&api, &config, format).await?,
        Commands::Show { id, width } => {
            let width = width.unwrap_or(config.display.wrap_width);
            cmd_show(&api, &config, &SpeechId::new(id), width, format).await?;
        }
        Commands::Create {
            title,
            content,
            file,
        } => {
            let source = ContentSource::from_args(content, file).ok_or(AppError::MissingField {
                field: "Content",
            })?;
            cmd_create(&api, &title, &source).await?;
        }
        Commands::Edit {
            id,
            title,
            content,
            file,
        } => {
            let source = ContentSource::from_args(content, file);
            cmd_edit(&api, &SpeechId::new(id), title.as_deref(), source.as_ref()).await?;
        }
        Commands::Delete { id, yes } => cmd_delete(&api, &SpeechId::new(id), yes).await?,
        Commands::Practice { id } => cmd_practice(&api, &config, &SpeechId::new(id)).await?,
        Commands::Config { .. } => {}
    }

    Ok(())
}

/// Create an account, prompting for the password when not given.
async fn cmd_register(
    api: &ApiClient,
    name: String,
    email: String,
    password: Option<String>,
) -> Result<()> {
    let (password, confirmation) = match password {
        Some(password) => (password.clone(), password),
        None => {
            let password = prompt("Password: ")?;
            eprintln!("{}", format_strength(password_strength(&password)));
            let confirmation = prompt("Confirm password: ")?;
            (password, confirmation)
        }
    };

    let form = RegistrationForm {
        name,
        email,
        password,
        confirmation,
    };
    AccountService::new(api).register(&form).await?;

    println!("{} Account created", "✓".green().bold());
    println!(
        "   Log in with: {}",
        format!("podium login --email {}", form.email.trim()).cyan()
    );
    Ok(())
}

/// Log in and persist the session token.
async fn cmd_login(api: &ApiClient, email: &str, password: Option<String>) -> Result<()> {
    let password = match password {
        Some(password) => password,
        None => prompt("Password: ")?,
    };

    AccountService::new(api).login(email, &password).await?;
    println!("{} Logged in as {}", "✓".green().bold(), email.trim().cyan());
    Ok(())
}

/// Forget the stored session.
fn cmd_logout(api: &ApiClient) -> Result<()> {
    if AccountService::new(api).logout()? {
        println!("{} Logged out", "✓".green().bold());
    } else {
        println!("Not logged in");
    }
    Ok(())
}

/// Show the current user.
async fn cmd_whoami(api: &ApiClient, format: OutputFormat) -> Result<()> {
    let user = AccountService::new(api).profile().await?;

    let output = match format {
        OutputFormat::Json => format_json(&user).map_err(AppError::json_parse)?,
        OutputFormat::Text | OutputFormat::Table => format_user(&user),
    };
    println!("{output}");
    Ok(())
}

/// Update the profile.
async fn cmd_profile(api: &ApiClient, form: ProfileForm) -> Result<()> {
    if let Some(password) = form.new_password.as_deref().filter(|p| !p.is_empty()) {
        eprintln!("{}", format_strength(password_strength(password)));
    }

    let user = AccountService::new(api).update_profile(form).await?;
    println!("{} Profile updated", "✓".green().bold());
    println!("{}", format_user(&user));
    Ok(())
}

/// List speeches.
async fn cmd_list(api: &ApiClient, config: &AppConfig, format: OutputFormat) -> Result<()> {
    let speeches = SpeechService::new(api).list().await?;

    let output = match format {
        OutputFormat::Json => format_json(&speeches).map_err(AppError::json_parse)?,
        OutputFormat::Text | OutputFormat::Table => {
            format_speeches_table(&speeches, config.practice.words_per_minute)
        }
    };
    println!("{output}");
    Ok(())
}

/// Show a single speech.
async fn cmd_show(
    api: &ApiClient,
    config: &AppConfig,
    id: &SpeechId,
    width: usize,
    format: OutputFormat,
) -> Result<()> {
    let speech = SpeechService::new(api).get(id).await?;

    let output = match format {
        OutputFormat::Json => format_json(&speech).map_err(AppError::json_parse)?,
        OutputFormat::Table => {
            format_speeches_table(std::slice::from_ref(&speech), config.practice.words_per_minute)
        }
        OutputFormat::Text => {
            let stats = SpeechStats::of(&speech, config.practice.words_per_minute);
            format_speech(&speech, stats, width)
        }
    };
    println!("{output}");
    Ok(())
}

/// Create a speech.
async fn cmd_create(api: &ApiClient, title: &str, source: &ContentSource) -> Result<()> {
    let created = SpeechService::new(api).create(title, source).await?;

    match created {
        Some(speech) => println!(
            "{} Created {} (id {})",
            "✓".green().bold(),
            speech.title.cyan(),
            speech.id
        ),
        None => println!("{} Created {}", "✓".green().bold(), title.trim().cyan()),
    }
    Ok(())
}

/// Edit a speech.
async fn cmd_edit(
    api: &ApiClient,
    id: &SpeechId,
    title: Option<&str>,
    source: Option<&ContentSource>,
) -> Result<()> {
    if title.is_none() && source.is_none() {
        return Err(AppError::MissingField {
            field: "--title, --content or --file",
        });
    }

    let speech = SpeechService::new(api).edit(id, title, source).await?;
    println!("{} Saved {}", "✓".green().bold(), speech.title.cyan());
    Ok(())
}

/// Delete a speech after confirmation.
async fn cmd_delete(api: &ApiClient, id: &SpeechId, yes: bool) -> Result<()> {
    let service = SpeechService::new(api);
    let speech = service.get(id).await?;

    if !yes {
        let answer = prompt(&format!(
            "Delete \"{}\"? This cannot be undone [y/N]: ",
            speech.title
        ))?;
        if !matches!(answer.trim().to_lowercase().as_str(), "y" | "yes") {
            println!("Cancelled");
            return Ok(());
        }
    }

    service.delete(id).await?;
    println!("{} Deleted {}", "✓".green().bold(), speech.title.cyan());
    Ok(())
}

/// Rehearse a speech: show the text and run the stopwatch from stdin controls.
async fn cmd_practice(api: &ApiClient, config: &AppConfig, id: &SpeechId) -> Result<()> {
    let speech = SpeechService::new(api).get(id).await?;
    let stats = SpeechStats::of(&speech, config.practice.words_per_minute);

    println!("{}", format_speech(&speech, stats, config.display.wrap_width));
    println!();
    println!(
        "{}",
        "Controls: s start · p pause · r reset · q quit (then Enter)".dimmed()
    );

    let period = Duration::from_millis(config.practice.tick_interval_ms.max(1));
    let mut session = PracticeSession::new(period);
    let mut updates = session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    render_timer(session.snapshot())?;

    loop {
        tokio::select! {
            changed = updates.changed() => {
                if changed.is_err() {
                    break;
                }
                let snapshot = *updates.borrow_and_update();
                render_timer(snapshot)?;
            }
            line = lines.next_line() => {
                let line = line.map_err(|e| AppError::io("Failed to read controls", e))?;
                let Some(line) = line else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<PracticeCommand>() {
                    Ok(command) => {
                        if !session.apply(command) {
                            break;
                        }
                    }
                    Err(message) => eprintln!("{}", message.yellow()),
                }
            }
        }
    }

    let total = session.snapshot().elapsed;
    println!();
    println!(
        "Practiced for {} (estimate {})",
        format_elapsed(total).bold(),
        format_elapsed(stats.estimated_secs)
    );
    Ok(())
}

/// Print and optionally save the effective configuration.
fn cmd_config(
    config: &AppConfig,
    explicit_path: Option<&Path>,
    save: bool,
    format: OutputFormat,
) -> Result<()> {
    let config_path = config_source_path(explicit_path);

    if save {
        save_config(config, &config_path)?;
        println!(
            "{} Saved configuration to {}",
            "✓".green().bold(),
            config_path.display()
        );
        return Ok(());
    }

    let body = match format {
        OutputFormat::Json => format_json(config).map_err(AppError::json_parse)?,
        OutputFormat::Text | OutputFormat::Table => {
            toml::to_string_pretty(config).map_err(|e| AppError::Config {
                message: format!("Failed to serialize config: {e}"),
            })?
        }
    };

    println!("{}", "⚙ Podium Configuration".bold());
    println!();
    println!("  Config file:  {}", config_path.display());
    println!("  Session file: {}", config.session_file_path().display());
    println!();
    println!("{body}");
    Ok(())
}

/// Redraw the stopwatch line in place.
fn render_timer(snapshot: TimerSnapshot) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    write!(stdout, "\r\x1b[2K{}", format_timer(snapshot))
        .and_then(|()| stdout.flush())
        .map_err(|e| AppError::io("Failed to write to terminal", e))
}

/// Ask for a line on stderr and read the answer from stdin.
fn prompt(label: &str) -> Result<String> {
    eprint!("{label}");
    std::io::stderr()
        .flush()
        .map_err(|e| AppError::io("Failed to write prompt", e))?;

    let mut answer = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut answer)
        .map_err(|e| AppError::io("Failed to read input", e))?;

    Ok(answer.trim_end_matches(['\r', '\n']).to_string())
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).without_time().with_writer(std::io::stderr))
        .with(filter)
        .init();
}
