//! Roastctl: host driver for the roaster control core.
//!
//! Runs the control thread against a simulated drum.  Commands arrive as
//! lines on stdin (`route [param]`, e.g. `set-temperature 420`); every
//! reply and every event is written to stdout as one JSON line.  Logs go
//! to stderr, filtered by `RUST_LOG`.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                    Adapters (outer ring)                     │
//! │                                                              │
//! │  SimulatedDrum      JsonProfileStore   MonotonicClock        │
//! │  (Sensor + Heater)  (ProfilePort)      (TimePort)            │
//! │                                                              │
//! │  ─────────────── Port Trait Boundary ───────────────         │
//! │                                                              │
//! │  ┌────────────────────────────────────────────────────┐      │
//! │  │  Controller thread → RoastService (pure logic)     │      │
//! │  │  Session · Hysteresis · Heater · Roast log         │      │
//! │  └────────────────────────────────────────────────────┘      │
//! │                                                              │
//! │  stdin (commands)  ──▶  Controller::send  ──▶ stdout (JSON)  │
//! │  EventBus subscription ───────────────────▶ stdout (JSON)    │
//! └──────────────────────────────────────────────────────────────┘
//! ```

use std::io::BufRead;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::{info, warn};
use serde_json::json;
use tracing_subscriber::EnvFilter;

use roastctl::adapters::profile_store::JsonProfileStore;
use roastctl::adapters::sim::SimulatedDrum;
use roastctl::adapters::time::MonotonicClock;
use roastctl::app::commands::RoastCommand;
use roastctl::config::RoasterConfig;
use roastctl::events::Subscription;
use roastctl::runtime::Controller;

#[derive(Debug, Parser)]
#[command(name = "roastctl", version, about = "Coffee roaster control console")]
struct Args {
    /// JSON configuration file (defaults apply when absent)
    #[arg(short, long, default_value = "roastctl.json")]
    config: PathBuf,

    /// Override the profile store path
    #[arg(short, long)]
    profiles: Option<PathBuf>,

    /// Override the control tick period (milliseconds)
    #[arg(short, long)]
    tick_ms: Option<u32>,
}

fn main() -> Result<()> {
    // ── 1. Logging ────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    info!("Roastctl v{}", env!("CARGO_PKG_VERSION"));

    // ── 2. Configuration ──────────────────────────────────────
    let mut config = RoasterConfig::load(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;
    if let Some(path) = args.profiles {
        config.profiles_path = path;
    }
    if let Some(ms) = args.tick_ms {
        config.tick_interval_ms = ms;
    }
    config.validate().context("invalid configuration")?;

    // ── 3. Adapters + control thread ──────────────────────────
    let drum = SimulatedDrum::default();
    let (thermocouple, heater) = drum.ports();
    let store = JsonProfileStore::new(&config.profiles_path);
    info!("Profiles: {}", store.path().display());

    let controller = Controller::spawn(&config, thermocouple, heater, store, MonotonicClock::new())
        .context("spawning control thread")?;

    // ── 4. Event printer ──────────────────────────────────────
    let events = controller
        .subscribe()
        .context("no event subscription slot")?;
    std::thread::Builder::new()
        .name("roast-events".into())
        .spawn(move || print_events(&events))
        .context("spawning event printer")?;

    // ── 5. Command console ────────────────────────────────────
    for line in std::io::stdin().lock().lines() {
        let line = line.context("reading stdin")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if line == "quit" || line == "exit" {
            break;
        }

        let (route, param) = match line.split_once(char::is_whitespace) {
            Some((route, param)) => (route, Some(param)),
            None => (line, None),
        };

        let outcome = RoastCommand::parse(route, param).and_then(|cmd| controller.send(cmd));
        let out = match outcome {
            Ok(reply) => json!({ "ok": reply }),
            Err(e) => {
                warn!("{route}: {e}");
                json!({ "error": e.to_string() })
            }
        };
        println!("{out}");
    }

    info!("Shutting down");
    controller.shutdown();
    Ok(())
}

fn print_events(events: &Subscription) {
    loop {
        let event = futures_lite::future::block_on(events.next());
        match serde_json::to_string(&event) {
            Ok(line) => println!("{line}"),
            Err(e) => warn!("Event encoding failed: {e}"),
        }
    }
}
