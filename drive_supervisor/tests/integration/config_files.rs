//! Integration test: configuration files on disk.

use std::io::Write;

use drive_common::config::{ConfigError, LogLevel};
use drive_common::supervisor::state::{PeerFaultPolicy, SystemState};
use drive_supervisor::config::load_config;
use drive_supervisor::cycle::Supervisor;
use drive_supervisor::sampler::SampleHandoff;
use drive_supervisor::sim::{LoopbackTransport, RecordingCoils};
use drive_supervisor::state::SupervisorEvents;
use tempfile::NamedTempFile;

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn file_config_drives_the_supervisor() {
    let file = write_config(
        r#"
        [shared]
        log_level = "warn"

        [link]
        liveness_threshold = 3
        peer_fault_policy = "latch"
        "#,
    );
    let loaded = load_config(file.path()).unwrap();
    assert_eq!(loaded.shared.log_level, LogLevel::Warn);
    assert_eq!(
        loaded.supervisor.link.peer_fault_policy,
        PeerFaultPolicy::Latch
    );

    let mut sup = Supervisor::new(
        &loaded.supervisor,
        LoopbackTransport::new(),
        RecordingCoils::new(),
    );
    let handoff = SampleHandoff::new();
    let states: Vec<_> = (0..3)
        .map(|_| sup.tick(&handoff, SupervisorEvents::empty()).state)
        .collect();
    assert_eq!(
        states,
        [SystemState::Idle, SystemState::Idle, SystemState::Error]
    );
}

#[test]
fn missing_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.toml");
    let err = load_config(&path).unwrap_err();
    assert!(matches!(err, ConfigError::FileNotFound(p) if p == path));
}

#[test]
fn same_signatures_are_rejected() {
    let file = write_config("[link]\nself_signature = 19\npeer_signature = 19\n");
    let err = load_config(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ValidationError(_)), "{err}");
}

#[test]
fn timer_rate_must_divide_into_ticks() {
    let file = write_config("[cycle]\ntick_hz = 100\ntimer_hz = 250\n");
    let err = load_config(file.path()).unwrap_err();
    let ConfigError::ValidationError(msg) = &err else {
        panic!("expected validation error, got {err}");
    };
    assert!(msg.contains("multiple"), "{msg}");
}

#[test]
fn malformed_toml_is_a_parse_error() {
    let file = write_config("[cycle\ntick_hz = 100\n");
    let err = load_config(file.path()).unwrap_err();
    assert!(matches!(err, ConfigError::ParseError(_)), "{err}");
}
