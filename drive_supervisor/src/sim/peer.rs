//! Scripted partner node and operator.
//!
//! Sends heartbeats and a repeating forward/reverse/off contactor sequence,
//! reads back what the supervisor broadcasts, and plays the operator: start
//! when the supervisor reports `Idle`, reset some time after it reports
//! `Error`.

use drive_common::consts::{
    CONTACTOR_STATE_BYTE, MSG_SELF_CONTACTOR_ID, MSG_SELF_STATE_ID, STATE_FAULT_BYTE,
    STATE_STATE_BYTE,
};
use drive_common::supervisor::frame::PeerFrame;
use drive_common::supervisor::state::{CoilState, ContactorRequest, SystemState};
use tracing::{debug, info};

use super::transport::LoopbackTransport;
use crate::cycle::TickDivider;
use crate::state::SupervisorEvents;

/// Ticks in one contactor script round.
const SCRIPT_PERIOD: u64 = 600;

/// Contactor script: (tick within round, request).
const SCRIPT: [(u64, ContactorRequest); 3] = [
    (20, ContactorRequest::SetForward),
    (220, ContactorRequest::SetReverse),
    (420, ContactorRequest::TurnOff),
];

/// What the peer has seen of the supervisor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PeerObservations {
    pub last_state: Option<SystemState>,
    pub last_faults: u8,
    pub state_frames: u32,
    pub acks: u32,
    pub last_ack: Option<CoilState>,
    pub other_frames: u32,
}

#[derive(Debug, Clone)]
pub struct SimPeer {
    signature: u8,
    heartbeat: TickDivider,
    silent_after: Option<u64>,
    reset_delay: u64,
    error_since: Option<u64>,
    seen: PeerObservations,
}

impl SimPeer {
    pub fn new(signature: u8, heartbeat_interval: u32) -> Self {
        Self {
            signature,
            heartbeat: TickDivider::new(heartbeat_interval),
            silent_after: None,
            reset_delay: 100,
            error_since: None,
            seen: PeerObservations::default(),
        }
    }

    /// Stop transmitting after `tick`.
    pub fn silent_after(mut self, tick: u64) -> Self {
        self.silent_after = Some(tick);
        self
    }

    /// Ticks to wait in `Error` before the operator resets.
    pub fn reset_delay(mut self, ticks: u64) -> Self {
        self.reset_delay = ticks;
        self
    }

    pub fn is_silent(&self, tick: u64) -> bool {
        self.silent_after.is_some_and(|after| tick > after)
    }

    pub fn observations(&self) -> &PeerObservations {
        &self.seen
    }

    /// Act before supervisor tick `tick`. Returns the operator events.
    pub fn step(&mut self, tick: u64, transport: &mut LoopbackTransport) -> SupervisorEvents {
        for frame in transport.drain_sent() {
            self.observe(&frame);
        }

        if !self.is_silent(tick) {
            if self.heartbeat.tick() {
                let _ = transport.inject(PeerFrame::peer_state(
                    self.signature,
                    SystemState::Running as u8,
                    0,
                ));
            }
            let phase = tick % SCRIPT_PERIOD;
            if let Some(&(_, request)) = SCRIPT.iter().find(|(at, _)| *at == phase) {
                debug!(tick, ?request, "Sim peer sends contactor request");
                let _ = transport.inject(PeerFrame::contactor_request(self.signature, request));
            }
        } else if self.silent_after == Some(tick - 1) {
            info!(tick, "Sim peer went silent");
        }

        self.operator(tick)
    }

    fn operator(&mut self, tick: u64) -> SupervisorEvents {
        match self.seen.last_state {
            Some(SystemState::Idle) => SupervisorEvents::START,
            Some(SystemState::Error) => {
                let since = *self.error_since.get_or_insert(tick);
                if !self.is_silent(tick) && tick - since >= self.reset_delay {
                    self.error_since = None;
                    self.seen.last_state = None;
                    info!(tick, "Operator reset");
                    SupervisorEvents::RESET
                } else {
                    SupervisorEvents::empty()
                }
            }
            _ => {
                self.error_since = None;
                SupervisorEvents::empty()
            }
        }
    }

    fn observe(&mut self, frame: &PeerFrame) {
        match frame.id() {
            MSG_SELF_STATE_ID => {
                self.seen.state_frames += 1;
                self.seen.last_state = frame.byte(STATE_STATE_BYTE).and_then(SystemState::from_u8);
                self.seen.last_faults = frame.byte(STATE_FAULT_BYTE).unwrap_or(0);
            }
            MSG_SELF_CONTACTOR_ID => {
                self.seen.acks += 1;
                self.seen.last_ack = frame.byte(CONTACTOR_STATE_BYTE).and_then(CoilState::from_u8);
            }
            _ => self.seen.other_frames += 1,
        }
    }
}
