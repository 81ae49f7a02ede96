//! Slate - a small tiling window manager for X11
//!
//! Windows on each workspace are tiled into a master area and a stack,
//! one status bar runs along the top of every monitor, and everything is
//! driven from the keyboard.
//!
//! # Features
//! - Vertical, horizontal and max layouts per workspace
//! - Ten workspaces per screen, any of which can be shown on any monitor
//! - Transient and dialog windows float centered over their region
//! - RandR multi-monitor support
//! - Focus follows mouse
//! - TOML configuration for colors, fonts, programs and key bindings

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

use slate_core::config::Config;

mod backend;
mod bar;
mod color;
mod keymap;
mod process;
mod x11;

use backend::{is_x11_session, DisplayBackend};
use x11::X11Backend;

/// Slate - a tiling window manager for X11
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<String>,

    /// Run in debug mode with verbose logging
    #[arg(short, long)]
    debug: bool,

    /// Validate configuration and exit
    #[arg(long)]
    validate: bool,

    /// Print default configuration to stdout
    #[arg(long)]
    print_default_config: bool,

    /// X display to manage (defaults to $DISPLAY)
    #[arg(long)]
    display: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging
    let log_level = if args.debug {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .compact()
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Slate v{} starting...", env!("CARGO_PKG_VERSION"));

    if args.print_default_config {
        println!("{}", Config::default_config_string());
        return Ok(());
    }

    if args.validate {
        Config::load(args.config.as_deref())?;
        info!("Configuration is valid");
        return Ok(());
    }

    let config = match Config::load(args.config.as_deref()) {
        Ok(cfg) => {
            info!("Configuration loaded successfully");
            cfg
        },
        Err(e) => {
            warn!("Failed to load config: {}, using defaults", e);
            Config::default()
        },
    };

    if args.display.is_none() && !is_x11_session() {
        anyhow::bail!("DISPLAY is not set; slate needs an X server");
    }

    let mut backend = X11Backend::connect(args.display.as_deref(), config)?;
    backend.init()?;
    let result = backend.run();
    backend.shutdown()?;
    result?;

    info!("Goodbye");
    Ok(())
}
