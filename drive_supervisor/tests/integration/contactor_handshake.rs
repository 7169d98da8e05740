//! Integration test: contactor request / acknowledgement handshake.
//!
//! Validates: one ack per applied request in Idle and Running, none while
//! in Error, last-write-wins within a tick, forward/reverse interlock over
//! long request sequences, and no retry of a refused ack.

use drive_common::supervisor::frame::PeerFrame;
use drive_common::supervisor::state::{CoilState, ContactorRequest, SystemState};

use super::Harness;

#[test]
fn set_forward_in_idle_acks_once() {
    let mut h = Harness::with_threshold(1000);
    assert_eq!(h.tick().state, SystemState::Idle);

    h.request(ContactorRequest::SetForward);
    let report = h.tick();
    assert_eq!(report.state, SystemState::Idle);
    assert_eq!(report.applied, Some(CoilState::Forward));

    for _ in 0..20 {
        h.tick();
    }
    assert_eq!(h.acks(), vec![CoilState::Forward]);
    assert_eq!(h.coils().state(), Some(CoilState::Forward));
}

#[test]
fn set_forward_in_running_acks_once() {
    let mut h = Harness::with_threshold(1000);
    h.start();
    h.request(ContactorRequest::SetForward);
    h.tick();
    h.tick();
    assert_eq!(h.acks(), vec![CoilState::Forward]);
}

#[test]
fn no_ack_while_in_error() {
    let mut h = Harness::with_threshold(5);
    h.start();
    while !h.tick().peer_lost {}
    assert_eq!(h.sup.state(), SystemState::Error);
    h.sent();

    h.request(ContactorRequest::SetForward);
    let report = h.tick();
    assert_eq!(report.applied, None);
    for _ in 0..20 {
        h.tick();
    }
    assert!(h.acks().is_empty());
    assert_eq!(h.coils().state(), Some(CoilState::Off));
    assert_eq!(h.sup.diagnostics().arbiter.applied, 0);
}

#[test]
fn last_request_in_a_tick_wins() {
    let mut h = Harness::with_threshold(1000);
    h.start();
    h.request(ContactorRequest::SetForward);
    h.request(ContactorRequest::SetReverse);

    let report = h.tick();
    assert_eq!(report.frames_received, 2);
    assert_eq!(report.applied, Some(CoilState::Reverse));
    assert_eq!(h.acks(), vec![CoilState::Reverse]);
    assert_eq!(h.coils().state(), Some(CoilState::Reverse));
    // The superseded forward request never reached the coils.
    assert_eq!(h.coils().energizations(), 1);
}

#[test]
fn unknown_request_turns_off_and_acks_off() {
    let mut h = Harness::with_threshold(1000);
    h.start();
    h.request(ContactorRequest::SetReverse);
    h.tick();
    h.peer(PeerFrame::new(0x21, &[19, 0x7E]).unwrap());
    let report = h.tick();
    assert_eq!(report.applied, Some(CoilState::Off));
    assert_eq!(h.acks(), vec![CoilState::Reverse, CoilState::Off]);
    assert_eq!(h.coils().state(), Some(CoilState::Off));
}

#[test]
fn coils_never_overlap_over_long_sequences() {
    let mut h = Harness::with_threshold(1000);
    h.start();

    // Deterministic pseudo-random request stream, 0..=3 requests per tick.
    let requests = [
        ContactorRequest::TurnOff,
        ContactorRequest::SetForward,
        ContactorRequest::SetReverse,
        ContactorRequest::Unknown,
    ];
    let mut seed: u32 = 0x1234_5678;
    let mut next = || {
        seed = seed.wrapping_mul(1_664_525).wrapping_add(1_013_904_223);
        (seed >> 16) as usize
    };

    let mut applied = 0;
    for _ in 0..2_000 {
        for _ in 0..next() % 4 {
            let request = requests[next() % requests.len()];
            h.request(request);
        }
        if h.tick().applied.is_some() {
            applied += 1;
        }
        assert!(!h.coils().violation());
        assert!(h.coils().state().is_some());
    }
    assert_eq!(h.acks().len(), applied);
    assert_eq!(h.sup.state(), SystemState::Running);
}

#[test]
fn refused_ack_is_not_resent() {
    let mut h = Harness::with_threshold(1000);
    h.start();
    h.sup.transport_mut().set_bus_off(true);
    h.request(ContactorRequest::SetForward);
    h.tick();
    h.sup.transport_mut().set_bus_off(false);
    for _ in 0..20 {
        h.tick();
    }
    assert!(h.acks().is_empty());
    assert_eq!(h.sup.diagnostics().arbiter.ack_failures, 1);
    // The coil state is still applied.
    assert_eq!(h.coils().state(), Some(CoilState::Forward));
}

#[test]
fn foreign_request_is_ignored() {
    let mut h = Harness::with_threshold(1000);
    h.start();
    h.peer(PeerFrame::contactor_request(0x33, ContactorRequest::SetForward));
    let report = h.tick();
    assert_eq!(report.applied, None);
    assert!(h.acks().is_empty());
    assert_eq!(h.coils().state(), Some(CoilState::Off));
}
