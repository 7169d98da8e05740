//! Fault bitflags for the supervisor.
//!
//! Any set bit drives the state machine to `Error`. Bits are cleared only by
//! the `Reset` transition. The raw byte is carried in the state broadcast.

use bitflags::bitflags;

bitflags! {
    /// Independent fault bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct FaultFlags: u8 {
        /// No accepted peer frame for `liveness_threshold` ticks.
        const PEER_LINK_LOST = 0x01;
        /// Peer reported a nonzero fault byte (only with `PeerFaultPolicy::Latch`).
        const PEER_REPORTED  = 0x02;
    }
}

impl FaultFlags {
    /// Raise `flag`. Returns `true` if it was not already set.
    #[inline]
    pub fn raise(&mut self, flag: Self) -> bool {
        let newly = !self.contains(flag);
        self.insert(flag);
        newly
    }

    /// Wire representation for the state frame.
    #[inline]
    pub const fn to_wire(self) -> u8 {
        self.bits()
    }
}
