//! iam-console binary entry point.
//!
//! Resolves configuration, sets up file logging, starts the API worker,
//! initializes the terminal in raw mode, runs the TUI event loop, and
//! restores the terminal state on exit.
//!
use std::fs::OpenOptions;
use std::sync::Mutex;
use std::time::Duration;

use clap::Parser;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::info;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use iam_console::api::http::HttpClient;
use iam_console::api::worker::Worker;
use iam_console::app::config::{self, CONFIG_FILE, ConsoleConfig};
use iam_console::app::keymap::{KEYBINDS_FILE, Keymap};
use iam_console::app::{self, AppState, THEME_FILE, Theme};
use iam_console::error::{Context, Result, simple_error};

#[derive(Debug, Parser)]
#[command(name = "iam-console", version, about = "Administer users, applications and identity providers")]
struct Cli {
    /// Config file; defaults to console.conf in the config directory.
    #[arg(long)]
    config: Option<String>,
    /// Identity server base URL.
    #[arg(long, env = "IAM_CONSOLE_BASE_URL")]
    base_url: Option<String>,
    /// Bearer token sent with every request.
    #[arg(long, env = "IAM_CONSOLE_TOKEN", hide_env_values = true)]
    token: Option<String>,
    /// Log filter, e.g. `debug` or `iam_console=trace`. Falls back to RUST_LOG, then `info`.
    #[arg(long)]
    log_level: Option<String>,
    /// Log file; the terminal is taken by the UI.
    #[arg(long)]
    log_file: Option<String>,
}

fn resolve_config(cli: &Cli) -> Result<ConsoleConfig> {
    let mut cfg = match &cli.config {
        Some(path) => ConsoleConfig::load_explicit(path)?,
        None => ConsoleConfig::load_or_init(&config::config_file_write_path(CONFIG_FILE)),
    };
    if let Some(url) = &cli.base_url {
        cfg.base_url = url.clone();
    }
    if let Some(token) = &cli.token {
        cfg.access_token = Some(token.clone());
    }
    if let Some(file) = &cli.log_file {
        cfg.log_file = Some(file.clone());
    }
    if cfg.base_url.trim().is_empty() {
        return Err(simple_error("base_url is empty; set it in console.conf or pass --base-url"));
    }
    Ok(cfg)
}

/// File-only subscriber; stdout belongs to the alternate screen.
fn init_logging(cfg: &ConsoleConfig, level: Option<&str>) -> Result<()> {
    let path = cfg
        .log_file
        .clone()
        .unwrap_or_else(|| config::config_file_write_path("iam-console.log"));
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)
        .with_ctx(|| format!("open log file {path}"))?;

    let filter = match level {
        Some(l) => EnvFilter::new(l),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
    };
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(true)
        .with_filter(filter);
    tracing_subscriber::registry().with(file_layer).init();
    info!(%path, "logging initialized");
    Ok(())
}

/// Initialize a Crossterm-backed `ratatui` terminal in raw mode.
fn init_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Program entry point: run the TUI and report any top-level error to stderr.
fn main() -> Result<()> {
    let cli = Cli::parse();
    let cfg = resolve_config(&cli)?;
    init_logging(&cfg, cli.log_level.as_deref())?;
    info!(base_url = %cfg.base_url, "starting iam-console");

    let client = HttpClient::new(
        &cfg.base_url,
        cfg.access_token.clone(),
        Duration::from_secs(cfg.request_timeout_secs),
    );
    let worker = Worker::spawn(client);
    let theme = Theme::load_or_init(&config::config_file_write_path(THEME_FILE));
    let keymap = Keymap::load_or_init(&config::config_file_write_path(KEYBINDS_FILE));
    let mut state = AppState::new(cfg, worker).with_theme(theme).with_keymap(keymap);

    let mut terminal = init_terminal().map_err(|e| simple_error(format!("init terminal: {e}")))?;

    let res = app::run(&mut terminal, &mut state);

    disable_raw_mode().ok();
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )
    .ok();
    terminal.show_cursor().ok();

    if let Err(err) = res {
        tracing::error!(error = %err, "application error");
        eprintln!("application error: {err}");
    }
    Ok(())
}
