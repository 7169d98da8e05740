//! Prelude module for common re-exports.
//!
//! `use drive_common::prelude::*;` brings in the types every supervisor
//! component touches without listing individual paths.
//!
//! # Usage
//!
//! ```rust
//! use drive_common::prelude::*;
//!
//! let request = ContactorRequest::from_u8(1);
//! assert_eq!(request.target(), CoilState::Forward);
//! ```

use std::time::Duration;

// ─── Logging ────────────────────────────────────────────────────────
pub use crate::config::LogLevel;

// ─── Configuration ──────────────────────────────────────────────────
pub use crate::config::{ConfigError, ConfigLoader, SharedConfig};
pub use crate::supervisor::config::{CycleConfig, LinkConfig, SamplerConfig, SupervisorConfig};

// ─── Collaborators ──────────────────────────────────────────────────
pub use crate::hal::driver::{AnalogSource, CanTransport, CoilDriver, TransportError};

// ─── Supervisor Types ───────────────────────────────────────────────
pub use crate::supervisor::error::FaultFlags;
pub use crate::supervisor::frame::{FrameError, PeerFrame};
pub use crate::supervisor::sample::{Channel, SampleSet};
pub use crate::supervisor::state::{
    CoilState, ContactorRequest, PeerFaultPolicy, SystemState,
};

/// Default supervisor tick period (100 Hz).
pub const DEFAULT_TICK_PERIOD: Duration =
    Duration::from_millis(1000 / crate::consts::TICK_HZ_DEFAULT as u64);
