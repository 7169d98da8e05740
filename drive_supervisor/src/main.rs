//! # Drive Supervisor
//!
//! Host run of the contactor supervisor against simulated collaborators: a
//! loopback CAN transport driven by a scripted peer, a simulated ADC and
//! recording coil outputs. Paced at the configured timer rate.

use std::path::PathBuf;
use std::process;

use clap::Parser;
use drive_common::config::{ConfigError, LogLevel};
use drive_common::supervisor::sample::Channel;
use drive_supervisor::config::{LoadedConfig, load_config};
use drive_supervisor::cycle::CycleRunner;
use drive_supervisor::sim::{LoopbackTransport, RecordingCoils, SimAnalog, SimPeer};
use thiserror::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

/// Ticks of peer traffic before `--silent-peer` cuts it.
const SILENT_PEER_AFTER: u64 = 50;

/// Drive Supervisor: contactor supervision loop
#[derive(Parser, Debug)]
#[command(name = "drive_supervisor")]
#[command(author = "RTS007")]
#[command(version)]
#[command(about = "Fail-safe drive contactor supervisor (simulated collaborators)")]
struct Args {
    /// Path to the supervisor configuration TOML. Factory defaults if omitted.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Stop after this many supervisor ticks. Runs forever if omitted.
    #[arg(long)]
    ticks: Option<u64>,

    /// Let the simulated peer go silent shortly after startup.
    #[arg(long)]
    silent_peer: bool,

    /// Enable verbose logging (DEBUG level).
    #[arg(short, long)]
    verbose: bool,

    /// Output logs in JSON format.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Error)]
enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("forward and reverse coils were energized together")]
    CoilInterlock,
}

fn main() {
    let args = Args::parse();

    let loaded = match load(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            setup_tracing(&args, LogLevel::default());
            error!("FATAL: {e}");
            process::exit(1);
        }
    };
    setup_tracing(&args, loaded.shared.log_level);

    info!(
        "{} v{} starting...",
        loaded.shared.service_name,
        env!("CARGO_PKG_VERSION")
    );

    if let Err(e) = run(&args, &loaded) {
        error!("FATAL: {e}");
        process::exit(1);
    }

    info!("{} shutdown complete", loaded.shared.service_name);
}

fn load(args: &Args) -> Result<LoadedConfig, RunError> {
    match args.config {
        Some(ref path) => Ok(load_config(path)?),
        None => Ok(LoadedConfig::default()),
    }
}

fn run(args: &Args, loaded: &LoadedConfig) -> Result<(), RunError> {
    let config = &loaded.supervisor;
    info!(
        tick_hz = config.cycle.tick_hz,
        timer_hz = config.cycle.timer_hz,
        broadcast_interval = config.cycle.broadcast_interval,
        liveness_threshold = config.link.liveness_threshold,
        peer_fault_policy = ?config.link.peer_fault_policy,
        "Config OK"
    );

    // Mid-scale readings with a slow current ramp.
    let source = SimAnalog::new([300, 700, 720]).ramp(Channel::Current, 1);
    let mut runner = CycleRunner::new(
        config,
        LoopbackTransport::new(),
        RecordingCoils::new(),
        source,
    );

    let mut peer = SimPeer::new(config.link.peer_signature, config.cycle.broadcast_interval);
    if args.silent_peer {
        peer = peer.silent_after(SILENT_PEER_AFTER);
        info!(after = SILENT_PEER_AFTER, "Simulated peer will go silent");
    }

    info!("Entering supervisor loop");
    runner.run(
        args.ticks,
        |tick, transport| peer.step(tick, transport),
        |report| {
            if report.peer_lost {
                warn!(tick = report.tick, "Peer lost");
            }
        },
    );

    let diag = runner.supervisor().diagnostics();
    let stats = runner.stats();
    let seen = peer.observations();
    info!(
        ticks = diag.ticks,
        state = %diag.state,
        faults = diag.faults.bits(),
        total_faults = diag.total_faults,
        send_failures = diag.send_failures,
        samples = diag.samples_consumed,
        "Supervisor summary"
    );
    info!(
        accepted = diag.link.accepted,
        foreign = diag.link.foreign,
        unknown_id = diag.link.unknown_id,
        malformed = diag.link.malformed,
        applied = diag.arbiter.applied,
        ack_failures = diag.arbiter.ack_failures,
        peer_acks = seen.acks,
        "Link summary"
    );
    info!(
        min_ns = stats.min_tick_ns,
        avg_ns = stats.avg_tick_ns(),
        max_ns = stats.max_tick_ns,
        overruns = stats.overruns,
        "Tick timing"
    );

    if runner.supervisor().arbiter().coils().violation() {
        return Err(RunError::CoilInterlock);
    }
    Ok(())
}

/// Setup tracing subscriber from CLI arguments and the configured level.
fn setup_tracing(args: &Args, level: LogLevel) {
    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        level.into()
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    if args.json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .compact()
            .init();
    }
}
