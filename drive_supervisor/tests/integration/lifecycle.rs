//! Integration test: fault lifecycle.
//!
//! Validates: Error is sticky until a reset event, Reset clears the fault
//! bits and returns through Initializing to Idle, state broadcasts report
//! Error with the active fault bits, and the peer fault policy.

use drive_common::supervisor::config::SupervisorConfig;
use drive_common::supervisor::error::FaultFlags;
use drive_common::supervisor::frame::PeerFrame;
use drive_common::supervisor::state::{CoilState, ContactorRequest, PeerFaultPolicy, SystemState};
use drive_supervisor::state::SupervisorEvents;

use super::{Harness, state_payload};

fn into_error(h: &mut Harness) {
    h.start();
    while !h.tick().peer_lost {}
    assert_eq!(h.sup.state(), SystemState::Error);
}

#[test]
fn error_holds_until_reset_then_reinitializes() {
    let mut h = Harness::with_threshold(5);
    into_error(&mut h);

    for _ in 0..50 {
        h.heartbeat();
        assert_eq!(
            h.tick_with(SupervisorEvents::START).state,
            SystemState::Error
        );
    }

    let report = h.tick_with(SupervisorEvents::RESET);
    assert_eq!(report.state, SystemState::Reset);
    // Bits are cleared by the Reset state, not by the event.
    assert_eq!(report.faults, FaultFlags::PEER_LINK_LOST);

    let report = h.tick();
    assert_eq!(report.state, SystemState::Initializing);
    assert!(report.faults.is_empty());
    assert_eq!(h.sup.link().liveness().count(), 0);

    assert_eq!(h.tick().state, SystemState::Idle);
    assert_eq!(
        h.tick_with(SupervisorEvents::START).state,
        SystemState::Running
    );
}

#[test]
fn contactor_is_off_through_error_and_reset() {
    let mut h = Harness::with_threshold(5);
    h.start();
    h.request(ContactorRequest::SetReverse);
    h.tick();
    assert_eq!(h.coils().state(), Some(CoilState::Reverse));

    while !h.tick().peer_lost {}
    assert_eq!(h.coils().state(), Some(CoilState::Off));

    h.tick_with(SupervisorEvents::RESET);
    h.tick();
    h.tick();
    assert_eq!(h.sup.state(), SystemState::Idle);
    assert_eq!(h.coils().state(), Some(CoilState::Off));
    assert!(!h.coils().violation());
}

#[test]
fn broadcast_reports_error_and_fault_bits() {
    let mut h = Harness::with_threshold(5);
    into_error(&mut h);
    h.sent();

    for _ in 0..20 {
        h.tick();
    }
    let states: Vec<_> = h.sent().iter().filter_map(state_payload).collect();
    assert_eq!(states.len(), 2);
    assert!(
        states
            .iter()
            .all(|&s| s == (SystemState::Error, FaultFlags::PEER_LINK_LOST.bits()))
    );
}

#[test]
fn broadcast_cadence_is_every_interval() {
    let mut config = SupervisorConfig::default();
    config.cycle.broadcast_interval = 4;
    let mut h = Harness::new(config);
    let mut due = Vec::new();
    for _ in 0..12 {
        let report = h.tick();
        if report.state_broadcast {
            due.push(report.tick);
        }
    }
    assert_eq!(due, [4, 8, 12]);
    let states: Vec<_> = h.sent().iter().filter_map(state_payload).collect();
    assert_eq!(states, vec![(SystemState::Idle, 0); 3]);
}

#[test]
fn advisory_peer_fault_keeps_running() {
    let mut h = Harness::with_threshold(1000);
    h.start();
    h.peer(PeerFrame::peer_state(19, 3, 0x08));
    let report = h.tick();
    assert_eq!(report.state, SystemState::Running);
    assert!(report.faults.is_empty());
    assert_eq!(h.sup.link().peer_status().map(|p| p.fault), Some(0x08));
}

#[test]
fn latched_peer_fault_enters_error() {
    let mut config = SupervisorConfig::default();
    config.link.peer_fault_policy = PeerFaultPolicy::Latch;
    let mut h = Harness::new(config);
    h.start();
    h.request(ContactorRequest::SetForward);
    h.tick();

    h.peer(PeerFrame::peer_state(19, 3, 0x08));
    let report = h.tick();
    assert_eq!(report.state, SystemState::Error);
    assert_eq!(report.faults, FaultFlags::PEER_REPORTED);
    assert_eq!(h.coils().state(), Some(CoilState::Off));

    // Peer recovers, operator resets.
    h.heartbeat();
    h.tick_with(SupervisorEvents::RESET);
    h.tick();
    assert_eq!(h.tick().state, SystemState::Idle);
    assert!(h.sup.faults().is_empty());
}
