//! CAN peer link: inbound classification, dispatch and liveness.
//!
//! Per tick the supervisor calls [`PeerLink::drain_incoming`] then
//! [`PeerLink::tick_liveness`]. Frames not signed by the configured peer
//! are ignored without effect on liveness.

pub mod liveness;
pub mod message;

use drive_common::hal::driver::CanTransport;
use drive_common::supervisor::config::LinkConfig;
use drive_common::supervisor::error::FaultFlags;
use drive_common::supervisor::frame::PeerFrame;
use drive_common::supervisor::state::PeerFaultPolicy;
use tracing::{debug, warn};

use crate::contactor::request::RequestSlot;

pub use liveness::LivenessMonitor;
pub use message::{PeerMessage, PeerStatus};

// ─── Link Statistics ────────────────────────────────────────────────

/// Inbound frame counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkStats {
    /// Frames carrying the peer signature.
    pub accepted: u32,
    /// Frames rejected on signature.
    pub foreign: u32,
    /// Accepted frames with an id outside the protocol.
    pub unknown_id: u32,
    /// Accepted frames with a known id but unusable payload.
    pub malformed: u32,
    /// Ticks whose drain stopped at `max_frames_per_tick`.
    pub overflow_drains: u32,
}

// ─── Peer Link ──────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct PeerLink {
    peer_signature: u8,
    max_frames_per_tick: u16,
    policy: PeerFaultPolicy,
    liveness: LivenessMonitor,
    peer: Option<PeerStatus>,
    stats: LinkStats,
}

impl PeerLink {
    pub fn new(config: &LinkConfig) -> Self {
        Self {
            peer_signature: config.peer_signature,
            max_frames_per_tick: config.max_frames_per_tick,
            policy: config.peer_fault_policy,
            liveness: LivenessMonitor::new(config.liveness_threshold),
            peer: None,
            stats: LinkStats::default(),
        }
    }

    /// Pull and handle pending frames, at most `max_frames_per_tick`.
    ///
    /// Contactor requests land in `requests` (last write wins). With
    /// `PeerFaultPolicy::Latch` a nonzero peer fault byte raises
    /// `FaultFlags::PEER_REPORTED`. Returns the number of frames pulled.
    pub fn drain_incoming<T: CanTransport + ?Sized>(
        &mut self,
        transport: &mut T,
        requests: &mut RequestSlot,
        faults: &mut FaultFlags,
    ) -> u16 {
        let mut pulled = 0;
        while pulled < self.max_frames_per_tick {
            let Some(frame) = transport.try_receive() else {
                return pulled;
            };
            pulled += 1;
            self.handle_frame(&frame, requests, faults);
        }
        self.stats.overflow_drains = self.stats.overflow_drains.wrapping_add(1);
        debug!(
            limit = self.max_frames_per_tick,
            "Inbound drain stopped at per-tick limit"
        );
        pulled
    }

    fn handle_frame(
        &mut self,
        frame: &PeerFrame,
        requests: &mut RequestSlot,
        faults: &mut FaultFlags,
    ) {
        if frame.signature() != Some(self.peer_signature) {
            self.stats.foreign = self.stats.foreign.wrapping_add(1);
            debug!("Ignored foreign frame {frame}");
            return;
        }

        self.stats.accepted = self.stats.accepted.wrapping_add(1);
        self.liveness.observe();

        match PeerMessage::decode(frame) {
            PeerMessage::State(status) => {
                if status.fault != 0 && self.peer.is_none_or(|p| p.fault != status.fault) {
                    warn!(
                        state = status.state,
                        fault = status.fault,
                        "Peer reports fault"
                    );
                }
                if status.fault != 0
                    && self.policy == PeerFaultPolicy::Latch
                    && faults.raise(FaultFlags::PEER_REPORTED)
                {
                    warn!(fault = status.fault, "Peer fault latched");
                }
                self.peer = Some(status);
                debug!("Peer state {frame}");
            }
            PeerMessage::Contactor(request) => {
                if let Some(previous) = requests.store(request) {
                    debug!(?previous, ?request, "Pending contactor request superseded");
                } else {
                    debug!(?request, "Contactor request received");
                }
            }
            PeerMessage::Unknown { id } => {
                self.stats.unknown_id = self.stats.unknown_id.wrapping_add(1);
                debug!(id, "Ignored frame with unknown id {frame}");
            }
            PeerMessage::Malformed { id } => {
                self.stats.malformed = self.stats.malformed.wrapping_add(1);
                debug!(id, "Ignored malformed frame {frame}");
            }
        }
    }

    /// Advance liveness by one tick; raises `PEER_LINK_LOST` on timeout.
    ///
    /// Returns `true` on the tick the peer is declared lost.
    pub fn tick_liveness(&mut self, faults: &mut FaultFlags) -> bool {
        if !self.liveness.tick() {
            return false;
        }
        faults.raise(FaultFlags::PEER_LINK_LOST);
        warn!(
            threshold = self.liveness.threshold(),
            "Peer link lost: no accepted frame within threshold"
        );
        true
    }

    /// Forget the silence run (used by reset cleanup).
    #[inline]
    pub fn clear_liveness(&mut self) {
        self.liveness.clear();
    }

    #[inline]
    pub fn liveness(&self) -> &LivenessMonitor {
        &self.liveness
    }

    /// Last state the peer reported, if any.
    #[inline]
    pub fn peer_status(&self) -> Option<PeerStatus> {
        self.peer
    }

    #[inline]
    pub fn stats(&self) -> &LinkStats {
        &self.stats
    }
}
