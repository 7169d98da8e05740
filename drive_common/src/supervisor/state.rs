//! State enums for the supervisor.
//!
//! All enums use `#[repr(u8)]`; the discriminant is the ordinal carried in
//! CAN payloads.

use core::fmt;

use serde::{Deserialize, Serialize};

// ─── System State ───────────────────────────────────────────────────

/// Authoritative supervisor state.
///
/// Exactly one state is active at a time. `Error` is sticky and exits only
/// through `Reset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum SystemState {
    /// Startup actions pending (peripheral arming, contactor off).
    #[default]
    Initializing = 0,
    /// Ready, waiting for the start trigger.
    Idle = 1,
    /// Normal operation.
    Running = 2,
    /// A fault bit is set. Contactor held off.
    Error = 3,
    /// Clearing faults before re-initializing.
    Reset = 4,
}

impl SystemState {
    /// Convert from the wire ordinal. Returns `None` for invalid values.
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Initializing),
            1 => Some(Self::Idle),
            2 => Some(Self::Running),
            3 => Some(Self::Error),
            4 => Some(Self::Reset),
            _ => None,
        }
    }

    /// States in which the contactor arbiter must not act.
    #[inline]
    pub const fn is_fault(&self) -> bool {
        matches!(self, Self::Error | Self::Reset)
    }
}

impl fmt::Display for SystemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Initializing => "INITIALIZING",
            Self::Idle => "IDLE",
            Self::Running => "RUNNING",
            Self::Error => "ERROR",
            Self::Reset => "RESET",
        };
        f.write_str(name)
    }
}

// ─── Contactor ──────────────────────────────────────────────────────

/// Which contactor coil is energized.
///
/// Forward and reverse are never energized together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum CoilState {
    #[default]
    Off = 0,
    Forward = 1,
    Reverse = 2,
}

impl CoilState {
    #[inline]
    pub const fn from_u8(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Off),
            1 => Some(Self::Forward),
            2 => Some(Self::Reverse),
            _ => None,
        }
    }
}

/// Coil state requested by the peer.
///
/// `Unknown` covers the explicit 0xFF marker and any ordinal this node does
/// not recognize; it is applied as a turn-off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum ContactorRequest {
    TurnOff = 0,
    SetForward = 1,
    SetReverse = 2,
    Unknown = 0xFF,
}

impl ContactorRequest {
    /// Decode the request byte. Never fails: unrecognized values are `Unknown`.
    #[inline]
    pub const fn from_u8(value: u8) -> Self {
        match value {
            0 => Self::TurnOff,
            1 => Self::SetForward,
            2 => Self::SetReverse,
            _ => Self::Unknown,
        }
    }

    /// Coil state the arbiter applies for this request.
    #[inline]
    pub const fn target(&self) -> CoilState {
        match self {
            Self::SetForward => CoilState::Forward,
            Self::SetReverse => CoilState::Reverse,
            Self::TurnOff | Self::Unknown => CoilState::Off,
        }
    }
}

// ─── Peer Fault Policy ──────────────────────────────────────────────

/// What to do when the peer reports a nonzero fault byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PeerFaultPolicy {
    /// Log it; no local transition.
    #[default]
    Advisory,
    /// Raise `FaultFlags::PEER_REPORTED`.
    Latch,
}
