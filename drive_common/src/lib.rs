//! Drive Common Library
//!
//! Shared definitions for the drive contactor supervisor workspace: the
//! system state enums, fault bitflags, CAN frame layouts exchanged with the
//! peer node, collaborator traits for the hardware seams, and TOML
//! configuration loading.
//!
//! # Module Structure
//!
//! - [`config`] - Configuration loading trait and shared fields
//! - [`consts`] - Wire constants and default limits
//! - [`hal`] - Collaborator traits (CAN transport, ADC source, coil driver)
//! - [`supervisor`] - State, fault, sample and frame types
//! - [`prelude`] - Common re-exports for convenience
//!
//! # Usage
//!
//! ```rust
//! use drive_common::prelude::*;
//!
//! let frame = PeerFrame::state(0x22, SystemState::Idle, FaultFlags::empty());
//! assert_eq!(frame.signature(), Some(0x22));
//! ```

pub mod config;
pub mod consts;
pub mod hal;
pub mod prelude;
pub mod supervisor;
