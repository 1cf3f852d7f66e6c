//! Headless tractor driver for bench-testing a control device.
//!
//! Opens the configured serial port, decodes the device's bytes into gear
//! and steering commands, and runs one round of the simulation at ~60Hz,
//! sending the collected-item count back every frame. The round ends when
//! the timer runs out.
//!
//! # Usage
//!
//! ```bash
//! # Defaults (115200 baud, guarded table, platform default port)
//! cargo run --features cli --bin tractor_sim
//!
//! # With a config file
//! cargo run --features cli --bin tractor_sim -- tractor.json
//!
//! # Override the port and decode table
//! cargo run --features cli --bin tractor_sim -- --port /dev/ttyACM0 --table sequential
//!
//! # List serial ports
//! cargo run --features cli --bin tractor_sim -- --list-ports
//!
//! # More logging
//! RUST_LOG=rs_tractor=trace cargo run --features cli --bin tractor_sim
//! ```
//!
//! Ctrl-C ends the round early; the link is closed and summarized either way.

use std::convert::Infallible;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use rs_tractor::hal::{SerialPortOpener, SystemClock};
use rs_tractor::traits::{Body, Clock};
use rs_tractor::{Config, DecodeTable, InputMode, Simulation, Vec2};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(version, about = "Drive one round of the tractor from a serial control device")]
struct Opts {
    /// JSON config file (missing fields take defaults)
    config: Option<PathBuf>,
    /// List serial ports and exit
    #[arg(long)]
    list_ports: bool,
    /// Serial port, overriding the config
    #[arg(long)]
    port: Option<String>,
    /// Decode table ("guarded" or "sequential"), overriding the config
    #[arg(long, value_parser = parse_table)]
    table: Option<DecodeTable>,
}

fn parse_table(s: &str) -> Result<DecodeTable, String> {
    DecodeTable::from_text(s).ok_or_else(|| format!("unknown decode table `{s}`"))
}

/// Frame interval in milliseconds (~60Hz)
const FRAME_INTERVAL_MS: u64 = 16;

/// Position log interval in frames (about once a second)
const STATUS_INTERVAL_FRAMES: u32 = 60;

/// Point body on an unbounded plane. Each velocity is one physics step's
/// displacement.
#[derive(Debug, Default)]
struct PlaneBody {
    position: Vec2,
}

impl Body for PlaneBody {
    type Error = Infallible;

    fn set_velocity(&mut self, velocity: Vec2) -> Result<(), Infallible> {
        self.position = Vec2::new(self.position.x + velocity.x, self.position.y + velocity.y);
        Ok(())
    }
}

/// Load the config file (if any), apply command-line overrides, and force
/// link input.
fn build_config(opts: &Opts) -> anyhow::Result<Config> {
    let mut config = match &opts.config {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => Config::default(),
    };
    if let Some(port) = &opts.port {
        config.link = config.link.with_port(port);
    }
    if let Some(table) = opts.table {
        config.link = config.link.with_table(table);
    }
    config.vehicle.input_mode = InputMode::Link;
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("rs_tractor=info")),
        )
        .init();

    let opts = Opts::parse();
    if opts.list_ports {
        for name in SerialPortOpener::available_ports() {
            println!("{name}");
        }
        return Ok(());
    }

    let config = build_config(&opts)?;

    let running = Arc::new(AtomicBool::new(true));
    let r = running.clone();
    ctrlc::set_handler(move || {
        tracing::info!("shutdown signal received");
        r.store(false, Ordering::SeqCst);
    })
    .context("failed to install Ctrl-C handler")?;

    tracing::info!(
        port = config.link.port.as_str(),
        baud = config.link.baud_rate,
        table = config.link.table.as_str(),
        round_seconds = config.session.round_seconds,
        "starting round"
    );

    let clock = SystemClock::new();
    let mut sim = Simulation::new(PlaneBody::default(), Some(SerialPortOpener::new()), &config);

    // =========================================================================
    // Main Loop
    // =========================================================================
    let mut frames: u32 = 0;
    let outcome = loop {
        if !running.load(Ordering::SeqCst) {
            break None;
        }

        let report = sim.advance(clock.now_ms())?;
        if report.outcome.is_some() {
            break report.outcome;
        }

        frames = frames.wrapping_add(1);
        if frames % STATUS_INTERVAL_FRAMES == 0 {
            let snapshot = sim.vehicle().snapshot();
            let position = sim.vehicle().body().position;
            tracing::info!(
                gear = snapshot.gear_label(),
                speed = snapshot.display_speed,
                x = position.x,
                y = position.y,
                link = sim.link().map_or("none", |l| l.state().as_str()),
                "status"
            );
        }

        thread::sleep(Duration::from_millis(FRAME_INTERVAL_MS));
    };

    sim.shutdown()?;
    if let Some(link) = sim.link() {
        let stats = link.stats();
        tracing::info!(
            opens = stats.opens,
            faults = stats.faults,
            bytes_in = stats.bytes_in,
            bytes_out = stats.bytes_out,
            malformed = stats.malformed_frames,
            "link summary"
        );
    }
    match outcome {
        Some(outcome) => println!("Game over: {outcome:?}"),
        None => println!("Round aborted after {} items", sim.vehicle().collected_count()),
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<Opts, clap::Error> {
        Opts::try_parse_from(std::iter::once("tractor_sim").chain(args.iter().copied()))
    }

    #[test]
    fn help_is_not_a_config_path() {
        let err = parse(&["--help"]).err().unwrap();
        assert_eq!(err.kind(), clap::error::ErrorKind::DisplayHelp);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert!(parse(&["--bogus"]).is_err());
    }

    #[test]
    fn bad_table_is_rejected() {
        assert!(parse(&["--table", "morse"]).is_err());
    }

    #[test]
    fn overrides_apply_over_defaults() {
        let opts = parse(&["--port", "/dev/ttyACM1", "--table", "sequential"]).unwrap();
        let config = build_config(&opts).unwrap();
        assert_eq!(config.link.port.as_str(), "/dev/ttyACM1");
        assert_eq!(config.link.table, DecodeTable::Sequential);
        assert_eq!(config.vehicle.input_mode, InputMode::Link);
    }

    #[test]
    fn list_ports_flag() {
        let opts = parse(&["--list-ports"]).unwrap();
        assert!(opts.list_ports);
        assert!(opts.config.is_none());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let opts = parse(&["/nonexistent/tractor.json"]).unwrap();
        let err = build_config(&opts).unwrap_err();
        assert!(err.to_string().contains("failed to load config"));
    }
}
