//! Supervisor shared types.
//!
//! Everything exchanged between the supervisor components and with the peer
//! node: state enums, fault bitflags, sample types, CAN frame layouts and
//! the configuration tables.

pub mod config;
pub mod error;
pub mod frame;
pub mod sample;
pub mod state;
