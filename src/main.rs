//! Touchline - terminal monitor and referee console for the RoboCup soccer simulator
//!
//! Connects to the simulation server's monitor port, shows the match state and
//! forwards referee commands (kick-off, drop ball, free kicks, cards).

mod config;
mod core;
mod data;
mod frontend;
mod network;
mod protocol;

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use frontend::{Frontend, FrontendEvent, Overlay, TuiFrontend};
use network::{Connector, UdpConnector};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::sync::mpsc;

#[derive(ClapParser)]
#[command(name = "touchline")]
#[command(about = "Terminal monitor for the RoboCup soccer simulation server", long_about = None)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Custom data directory (default: ~/.touchline)
    /// Can also be set via TOUCHLINE_DIR environment variable
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    /// Server host (default: last used host, or 127.0.0.1)
    #[arg(long)]
    host: Option<String>,

    /// Monitor port of the server (default: 6000)
    #[arg(short, long)]
    port: Option<u16>,

    /// Monitor protocol version sent in dispinit (default: 4)
    #[arg(long)]
    client_version: Option<u32>,

    /// Connect right after startup
    #[arg(long)]
    connect: bool,

    /// Quit once the match reaches time over
    #[arg(long)]
    auto_quit: bool,

    /// Milliseconds to wait before the auto-quit (non-positive: 100 ms)
    #[arg(long, value_name = "MS", allow_negative_numbers = true)]
    auto_quit_wait: Option<i64>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the configuration file and report keybind issues
    CheckConfig {
        /// Config file to validate (default: the one touchline would load)
        #[arg(value_name = "FILE")]
        file: Option<PathBuf>,
    },
}

impl Cli {
    /// Command-line settings win over the file for this run only
    fn apply_overrides(&self, config: &mut config::Config) {
        if let Some(host) = &self.host {
            config.set_server_host(host);
        }
        if let Some(port) = self.port {
            config.connection.port = port;
        }
        if let Some(version) = self.client_version {
            config.connection.client_version = version;
        }
        if self.connect {
            config.connection.auto_connect = true;
        }
        if self.auto_quit {
            config.monitor.auto_quit = true;
        }
        if let Some(wait) = self.auto_quit_wait {
            config.monitor.auto_quit_wait_ms = wait;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set custom data directory if specified (via CLI or environment variable)
    if let Some(data_dir) = &cli.data_dir {
        std::env::set_var("TOUCHLINE_DIR", data_dir);
    }

    if let Some(Commands::CheckConfig { file }) = &cli.command {
        let path = match file.as_ref().or(cli.config.as_ref()) {
            Some(path) => path.clone(),
            None => config::Config::config_path()?,
        };
        let errors = check_config(&path)?;
        if errors > 0 {
            std::process::exit(1);
        }
        return Ok(());
    }

    init_logging()?;

    if let Ok(dir) = std::env::var("TOUCHLINE_DIR") {
        tracing::info!("Using data directory: {}", dir);
    }

    // Load configuration
    let on_disk = match &cli.config {
        Some(path) => config::Config::load_from_path(path)?,
        None => config::Config::load()?,
    };
    let mut config = on_disk.clone();
    cli.apply_overrides(&mut config);

    // Only the last connected host is remembered across runs
    if let Some(host) = run_monitor(config)? {
        let mut on_disk = on_disk;
        on_disk.set_server_host(&host);
        on_disk.save().context("Failed to save config")?;
    }

    Ok(())
}

/// Log to `<data dir>/touchline.log`; the terminal belongs to the UI
fn init_logging() -> Result<()> {
    let log_path = config::Config::log_path()?;
    if let Some(parent) = log_path.parent() {
        std::fs::create_dir_all(parent)
            .context(format!("Failed to create data directory: {:?}", parent))?;
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .context(format!("Failed to open log file: {:?}", log_path))?;

    // Use RUST_LOG to control the level, e.g. RUST_LOG=debug
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::sync::Mutex::new(log_file))
        .with_ansi(false) // No color codes in log file
        .init();

    Ok(())
}

/// Print a validation report for `path`; returns the number of errors
fn check_config(path: &Path) -> Result<usize> {
    println!("Validating config file: {:?}", path);

    let config = match config::Config::read(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("✗ {:#}", e);
            return Ok(1);
        }
    };
    println!("✓ Config parsed successfully");
    println!("  {} keybinds defined", config.keybinds.len());

    let result = config::keybind_validator::validate_keybinds(&config.keybinds);
    for error in result.errors() {
        eprintln!("✗ Error: {}", error.message());
    }
    for warning in result.warnings() {
        println!("⚠ Warning: {}", warning.message());
    }

    let errors = result.errors().len();
    if result.is_valid() && !result.has_warnings() {
        println!("✓ Config is valid with no issues");
    } else if !result.is_valid() {
        eprintln!("\n✗ Found {} error(s); they are fixed automatically on load", errors);
    }

    Ok(errors)
}

/// Run the terminal monitor; returns the host to remember, if any connection succeeded
fn run_monitor(config: config::Config) -> Result<Option<String>> {
    // Session readers are tokio tasks
    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async_run_monitor(config))
}

async fn async_run_monitor(config: config::Config) -> Result<Option<String>> {
    let timeout = (config.monitor.timeout_ms > 0)
        .then(|| Duration::from_millis(config.monitor.timeout_ms));
    let connector = UdpConnector::new(timeout).context("Failed to build monitor parser")?;

    let (events_tx, mut events_rx) = mpsc::unbounded_channel();
    let mut app_core = core::AppCore::new(config, connector, events_tx);

    let mut frontend = TuiFrontend::new()?;
    let mut overlay = Overlay::default();

    let (width, height) = frontend.size();
    app_core.resize(width, height);

    if app_core.config.connection.auto_connect {
        app_core.connect();
    }

    let result = event_loop(&mut app_core, &mut frontend, &mut overlay, &mut events_rx);

    app_core.shutdown();
    frontend.cleanup()?;
    result?;

    tracing::info!("Exiting");
    Ok(app_core.last_connected_host.take())
}

fn event_loop<C: Connector>(
    app_core: &mut core::AppCore<C>,
    frontend: &mut TuiFrontend,
    overlay: &mut Overlay,
    events_rx: &mut mpsc::UnboundedReceiver<network::SessionMessage>,
) -> Result<()> {
    while app_core.running {
        // Poll for frontend events (keyboard, mouse, resize)
        for event in frontend.poll_events()? {
            handle_frontend_event(app_core, overlay, event);
        }

        // Drain everything the session readers delivered since the last frame
        while let Ok(message) = events_rx.try_recv() {
            app_core.handle_session_message(message, Instant::now());
        }

        app_core.check_auto_quit(Instant::now());

        if app_core.needs_render && app_core.running {
            frontend.render(app_core, overlay)?;
            app_core.needs_render = false;
        }
    }

    Ok(())
}

fn handle_frontend_event<C: Connector>(
    app_core: &mut core::AppCore<C>,
    overlay: &mut Overlay,
    event: FrontendEvent,
) {
    match event {
        FrontendEvent::Key(key) => {
            if overlay.handle_key(key, app_core) {
                return;
            }
            let result = app_core.handle_key(key);
            overlay.open(&result);
            if overlay.is_active() {
                app_core.needs_render = true;
            }
        }
        FrontendEvent::Mouse(mouse) => {
            if !overlay.is_active() {
                app_core.handle_mouse(&mouse);
            }
        }
        FrontendEvent::Resize { width, height } => {
            let (width, height) = TuiFrontend::field_size(width, height);
            app_core.resize(width, height);
        }
        FrontendEvent::Paste { text } => {
            if overlay.handle_paste(&text) {
                app_core.needs_render = true;
            }
        }
    }
}
