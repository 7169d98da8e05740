//! Simulated collaborators for host runs and tests.

pub mod analog;
pub mod coils;
pub mod peer;
pub mod transport;

pub use analog::SimAnalog;
pub use coils::RecordingCoils;
pub use peer::{PeerObservations, SimPeer};
pub use transport::{LOOPBACK_DEPTH, LoopbackTransport};
