//! Decoding of peer frames into typed messages.

use drive_common::consts::{
    CONTACTOR_LENGTH, CONTACTOR_STATE_BYTE, MSG_PEER_CONTACTOR_ID, MSG_PEER_STATE_ID,
    STATE_FAULT_BYTE, STATE_LENGTH, STATE_STATE_BYTE,
};
use drive_common::supervisor::frame::PeerFrame;
use drive_common::supervisor::state::ContactorRequest;

/// Last state reported by the peer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PeerStatus {
    /// Peer state ordinal, as sent.
    pub state: u8,
    /// Peer fault byte. Nonzero means the peer reports a fault.
    pub fault: u8,
}

/// A peer frame after dispatch on its message id.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeerMessage {
    State(PeerStatus),
    Contactor(ContactorRequest),
    /// Id not used by this protocol.
    Unknown { id: u16 },
    /// Known id, payload too short or a remote frame.
    Malformed { id: u16 },
}

impl PeerMessage {
    /// Classify a frame whose signature has already been checked.
    pub fn decode(frame: &PeerFrame) -> Self {
        let id = frame.id();
        match id {
            MSG_PEER_STATE_ID => {
                if frame.is_remote() || frame.payload().len() < STATE_LENGTH {
                    return Self::Malformed { id };
                }
                match (frame.byte(STATE_STATE_BYTE), frame.byte(STATE_FAULT_BYTE)) {
                    (Some(state), Some(fault)) => Self::State(PeerStatus { state, fault }),
                    _ => Self::Malformed { id },
                }
            }
            MSG_PEER_CONTACTOR_ID => {
                if frame.is_remote() || frame.payload().len() < CONTACTOR_LENGTH {
                    return Self::Malformed { id };
                }
                match frame.byte(CONTACTOR_STATE_BYTE) {
                    Some(raw) => Self::Contactor(ContactorRequest::from_u8(raw)),
                    None => Self::Malformed { id },
                }
            }
            _ => Self::Unknown { id },
        }
    }
}
