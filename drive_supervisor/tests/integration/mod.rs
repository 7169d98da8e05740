//! Shared harness for the integration tests.

mod config_files;
mod contactor_handshake;
mod lifecycle;
mod sampling;

use drive_common::consts::{CONTACTOR_STATE_BYTE, MSG_SELF_CONTACTOR_ID, MSG_SELF_STATE_ID};
use drive_common::consts::{SIGNATURE_PEER, STATE_FAULT_BYTE, STATE_STATE_BYTE};
use drive_common::supervisor::config::SupervisorConfig;
use drive_common::supervisor::frame::PeerFrame;
use drive_common::supervisor::state::{CoilState, ContactorRequest, SystemState};
use drive_supervisor::cycle::{Supervisor, TickReport};
use drive_supervisor::sampler::SampleHandoff;
use drive_supervisor::sim::{LoopbackTransport, RecordingCoils};
use drive_supervisor::state::SupervisorEvents;

/// Supervisor wired to a loopback transport and recording coils.
pub struct Harness {
    pub sup: Supervisor<LoopbackTransport, RecordingCoils>,
    pub handoff: SampleHandoff,
    outbox: Vec<PeerFrame>,
}

impl Harness {
    pub fn new(config: SupervisorConfig) -> Self {
        Self {
            sup: Supervisor::new(&config, LoopbackTransport::new(), RecordingCoils::new()),
            handoff: SampleHandoff::new(),
            outbox: Vec::new(),
        }
    }

    pub fn with_threshold(threshold: u32) -> Self {
        let mut config = SupervisorConfig::default();
        config.link.liveness_threshold = threshold;
        Self::new(config)
    }

    pub fn tick(&mut self) -> TickReport {
        self.tick_with(SupervisorEvents::empty())
    }

    /// Run one tick and collect whatever it sent.
    pub fn tick_with(&mut self, events: SupervisorEvents) -> TickReport {
        let report = self.sup.tick(&self.handoff, events);
        self.outbox.extend(self.sup.transport_mut().drain_sent());
        report
    }

    /// Initializing → Idle → Running, two silent ticks.
    pub fn start(&mut self) {
        assert_eq!(self.tick().state, SystemState::Idle);
        assert_eq!(
            self.tick_with(SupervisorEvents::START).state,
            SystemState::Running
        );
    }

    /// Queue a frame from the peer.
    pub fn peer(&mut self, frame: PeerFrame) {
        self.sup
            .transport_mut()
            .inject(frame)
            .expect("loopback inbound full");
    }

    pub fn request(&mut self, request: ContactorRequest) {
        self.peer(PeerFrame::contactor_request(SIGNATURE_PEER, request));
    }

    pub fn heartbeat(&mut self) {
        self.peer(PeerFrame::peer_state(SIGNATURE_PEER, 2, 0));
    }

    /// Frames sent since the last call.
    pub fn sent(&mut self) -> Vec<PeerFrame> {
        std::mem::take(&mut self.outbox)
    }

    /// Drain sent frames and return the acknowledged coil states.
    pub fn acks(&mut self) -> Vec<CoilState> {
        self.sent()
            .iter()
            .filter(|f| f.id() == MSG_SELF_CONTACTOR_ID)
            .filter_map(|f| f.byte(CONTACTOR_STATE_BYTE).and_then(CoilState::from_u8))
            .collect()
    }

    pub fn coils(&self) -> &RecordingCoils {
        self.sup.arbiter().coils()
    }
}

/// (state, fault byte) of a state broadcast frame.
pub fn state_payload(frame: &PeerFrame) -> Option<(SystemState, u8)> {
    if frame.id() != MSG_SELF_STATE_ID {
        return None;
    }
    let state = frame.byte(STATE_STATE_BYTE).and_then(SystemState::from_u8)?;
    Some((state, frame.byte(STATE_FAULT_BYTE)?))
}
