//! In-memory CAN transport with fixed-capacity queues.

use drive_common::hal::driver::{CanTransport, TransportError};
use drive_common::supervisor::frame::PeerFrame;
use heapless::Deque;

/// Frames buffered per direction.
pub const LOOPBACK_DEPTH: usize = 64;

/// Two bounded queues standing in for the CAN controller mailboxes.
///
/// `inject` feeds the supervisor's receive side; frames the supervisor sends
/// are collected for inspection with `drain_sent`.
#[derive(Debug, Default)]
pub struct LoopbackTransport {
    inbound: Deque<PeerFrame, LOOPBACK_DEPTH>,
    outbound: Deque<PeerFrame, LOOPBACK_DEPTH>,
    bus_off: bool,
    dropped_inbound: u32,
}

impl LoopbackTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a frame for the supervisor. Returns it back when full.
    pub fn inject(&mut self, frame: PeerFrame) -> Result<(), PeerFrame> {
        self.inbound.push_back(frame).inspect_err(|_| {
            self.dropped_inbound = self.dropped_inbound.wrapping_add(1);
        })
    }

    /// Remove and yield every frame the supervisor has sent.
    pub fn drain_sent(&mut self) -> impl Iterator<Item = PeerFrame> + '_ {
        core::iter::from_fn(move || self.outbound.pop_front())
    }

    /// Frames sent and not yet drained.
    pub fn sent_len(&self) -> usize {
        self.outbound.len()
    }

    /// Frames waiting for the supervisor.
    pub fn pending_len(&self) -> usize {
        self.inbound.len()
    }

    /// Make every `send` fail with `BusOff`.
    pub fn set_bus_off(&mut self, bus_off: bool) {
        self.bus_off = bus_off;
    }

    /// Frames refused by `inject` because the queue was full.
    pub fn dropped_inbound(&self) -> u32 {
        self.dropped_inbound
    }
}

impl CanTransport for LoopbackTransport {
    fn try_receive(&mut self) -> Option<PeerFrame> {
        self.inbound.pop_front()
    }

    fn send(&mut self, frame: &PeerFrame) -> Result<(), TransportError> {
        if self.bus_off {
            return Err(TransportError::BusOff);
        }
        self.outbound
            .push_back(frame.clone())
            .map_err(|_| TransportError::TxFull)
    }
}
