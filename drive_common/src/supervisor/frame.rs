//! CAN frames exchanged with the peer node.
//!
//! Payload layouts (fixed positions, byte 0 is always the sender signature):
//!
//! | Frame | Id | Byte 1 | Byte 2.. |
//! |-------|----|--------|----------|
//! | peer state | `MSG_PEER_STATE_ID` | state ordinal | fault byte |
//! | contactor request | `MSG_PEER_CONTACTOR_ID` | requested state (0xFF unknown) | - |
//! | self state | `MSG_SELF_STATE_ID` | `SystemState` | `FaultFlags` |
//! | contactor ack | `MSG_SELF_CONTACTOR_ID` | applied `CoilState` | - |
//! | measurements | `MSG_SELF_MEASUREMENTS_ID` | I, Vo, Vi as LE u16 ×100 | |

use core::fmt;

use heapless::Vec;
use thiserror::Error;

use super::error::FaultFlags;
use super::sample::SampleSet;
use super::state::{CoilState, ContactorRequest, SystemState};
use crate::consts::{
    CONTACTOR_STATE_BYTE, MAX_PAYLOAD_LEN, MSG_PEER_CONTACTOR_ID, MSG_PEER_STATE_ID,
    MSG_SELF_CONTACTOR_ID, MSG_SELF_MEASUREMENTS_ID, MSG_SELF_STATE_ID, SIGNATURE_BYTE,
    STATE_FAULT_BYTE, STATE_STATE_BYTE,
};

/// Frame payload storage (classic CAN, up to 8 bytes).
pub type Payload = Vec<u8, MAX_PAYLOAD_LEN>;

/// Frame construction errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    /// Payload longer than a classic CAN frame.
    #[error("payload of {len} bytes exceeds {max}-byte CAN frame")]
    PayloadTooLong { len: usize, max: usize },
}

/// A CAN frame as seen by the supervisor.
///
/// Constructed by the transport on receive or by the supervisor for
/// transmission; never stored beyond the tick that handles it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeerFrame {
    id: u16,
    data: Payload,
    remote: bool,
}

impl PeerFrame {
    /// Build a data frame from an arbitrary payload.
    pub fn new(id: u16, payload: &[u8]) -> Result<Self, FrameError> {
        let data = Payload::from_slice(payload).map_err(|_| FrameError::PayloadTooLong {
            len: payload.len(),
            max: MAX_PAYLOAD_LEN,
        })?;
        Ok(Self {
            id,
            data,
            remote: false,
        })
    }

    /// Build a remote (request) frame with no payload.
    pub fn remote(id: u16) -> Self {
        Self {
            id,
            data: Payload::new(),
            remote: true,
        }
    }

    fn fixed<const N: usize>(id: u16, bytes: [u8; N]) -> Self {
        const { assert!(N <= MAX_PAYLOAD_LEN) };
        let mut data = Payload::new();
        // N is bounded at compile time.
        let _ = data.extend_from_slice(&bytes);
        Self {
            id,
            data,
            remote: false,
        }
    }

    /// Supervisor state broadcast.
    pub fn state(signature: u8, state: SystemState, faults: FaultFlags) -> Self {
        let mut bytes = [0u8; 3];
        bytes[SIGNATURE_BYTE] = signature;
        bytes[STATE_STATE_BYTE] = state as u8;
        bytes[STATE_FAULT_BYTE] = faults.to_wire();
        Self::fixed(MSG_SELF_STATE_ID, bytes)
    }

    /// Contactor acknowledgement carrying the applied coil state.
    pub fn contactor_ack(signature: u8, applied: CoilState) -> Self {
        let mut bytes = [0u8; 2];
        bytes[SIGNATURE_BYTE] = signature;
        bytes[CONTACTOR_STATE_BYTE] = applied as u8;
        Self::fixed(MSG_SELF_CONTACTOR_ID, bytes)
    }

    /// Measurements broadcast. Values are sent in hundredths, saturating.
    pub fn measurements(signature: u8, samples: &SampleSet) -> Self {
        let [i0, i1] = to_centi(samples.current).to_le_bytes();
        let [o0, o1] = to_centi(samples.output_voltage).to_le_bytes();
        let [v0, v1] = to_centi(samples.input_voltage).to_le_bytes();
        Self::fixed(
            MSG_SELF_MEASUREMENTS_ID,
            [signature, i0, i1, o0, o1, v0, v1],
        )
    }

    /// Peer heartbeat, as the partner node sends it.
    pub fn peer_state(signature: u8, state: u8, fault: u8) -> Self {
        let mut bytes = [0u8; 3];
        bytes[SIGNATURE_BYTE] = signature;
        bytes[STATE_STATE_BYTE] = state;
        bytes[STATE_FAULT_BYTE] = fault;
        Self::fixed(MSG_PEER_STATE_ID, bytes)
    }

    /// Contactor request, as the partner node sends it.
    pub fn contactor_request(signature: u8, request: ContactorRequest) -> Self {
        let mut bytes = [0u8; 2];
        bytes[SIGNATURE_BYTE] = signature;
        bytes[CONTACTOR_STATE_BYTE] = request as u8;
        Self::fixed(MSG_PEER_CONTACTOR_ID, bytes)
    }

    #[inline]
    pub fn id(&self) -> u16 {
        self.id
    }

    #[inline]
    pub fn payload(&self) -> &[u8] {
        &self.data
    }

    #[inline]
    pub fn is_remote(&self) -> bool {
        self.remote
    }

    /// Sender signature (payload byte 0). `None` for an empty payload.
    #[inline]
    pub fn signature(&self) -> Option<u8> {
        self.data.get(SIGNATURE_BYTE).copied()
    }

    /// Payload byte at `index`, if present.
    #[inline]
    pub fn byte(&self, index: usize) -> Option<u8> {
        self.data.get(index).copied()
    }
}

impl fmt::Display for PeerFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ID: {:#05x}", self.id)?;
        if self.remote {
            return f.write_str(" RTR");
        }
        f.write_str(" D:")?;
        for b in &self.data {
            write!(f, " {b}")?;
        }
        Ok(())
    }
}

fn to_centi(value: f32) -> u16 {
    let scaled = (value * 100.0).round();
    if scaled.is_nan() || scaled <= 0.0 {
        0
    } else if scaled >= u16::MAX as f32 {
        u16::MAX
    } else {
        scaled as u16
    }
}
