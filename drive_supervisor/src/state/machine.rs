//! Supervisor lifecycle: Initializing → Idle → Running, Error, Reset.
//!
//! Transitions are a pure function of the current state, the fault flags and
//! the external events of the tick. Faults are level-triggered: any set bit
//! moves every state except `Error` to `Error`, which is left only through a
//! reset event.

use bitflags::bitflags;
use drive_common::supervisor::error::FaultFlags;
use drive_common::supervisor::state::SystemState;

bitflags! {
    /// External events delivered to one tick.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SupervisorEvents: u8 {
        /// Operator start: Idle → Running.
        const START = 0x01;
        /// Operator reset: Error → Reset.
        const RESET = 0x02;
    }
}

/// A completed state change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: SystemState,
    pub to: SystemState,
}

/// Next state for one tick.
pub const fn next_state(
    state: SystemState,
    faults: FaultFlags,
    events: SupervisorEvents,
) -> SystemState {
    use SystemState::*;

    match state {
        Error => {
            if events.contains(SupervisorEvents::RESET) {
                Reset
            } else {
                Error
            }
        }
        _ if !faults.is_empty() => Error,
        Initializing => Idle,
        Idle if events.contains(SupervisorEvents::START) => Running,
        Reset => Initializing,
        other => other,
    }
}

/// Holder of the authoritative `SystemState`.
#[derive(Debug, Clone, Default)]
pub struct SupervisorStateMachine {
    state: SystemState,
}

impl SupervisorStateMachine {
    /// Start in `Initializing`.
    pub const fn new() -> Self {
        Self {
            state: SystemState::Initializing,
        }
    }

    #[inline]
    pub const fn state(&self) -> SystemState {
        self.state
    }

    /// Evaluate one tick. Returns the transition taken, if any.
    pub fn step(&mut self, faults: FaultFlags, events: SupervisorEvents) -> Option<Transition> {
        let from = self.state;
        let to = next_state(from, faults, events);
        if to == from {
            return None;
        }
        self.state = to;
        Some(Transition { from, to })
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
