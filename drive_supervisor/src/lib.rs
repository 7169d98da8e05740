//! # Drive Contactor Supervisor Library
//!
//! Supervisory controller for an electric-drive subsystem. Samples three
//! analog channels on a timer, exchanges heartbeat and contactor commands
//! with a partner node over CAN, and drives a forward/reverse contactor
//! under a fail-safe state machine.
//!
//! ## Components
//!
//! 1. **Sampler** - timer-triggered round-robin conversion, publishes via a
//!    critical-section handoff
//! 2. **Peer Link** - signature filter, message dispatch, liveness counter
//! 3. **Contactor Arbiter** - interlocked coil activation with one ack per
//!    applied request
//! 4. **Supervisor** - authoritative state and fault flags, gates the
//!    arbiter, broadcasts its state
//!
//! ## Zero-Allocation Tick
//!
//! Inbound frames, the request slot and outbound frames are fixed-size. The
//! tick body performs no heap allocation.

pub mod config;
pub mod contactor;
pub mod cycle;
pub mod link;
pub mod sampler;
pub mod sim;
pub mod state;
