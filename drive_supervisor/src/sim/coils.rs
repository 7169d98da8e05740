//! Recording contactor coil outputs.

use drive_common::hal::driver::CoilDriver;
use drive_common::supervisor::state::CoilState;

/// Coil pair that latches a violation if both coils are ever on together.
#[derive(Debug, Clone, Default)]
pub struct RecordingCoils {
    forward: bool,
    reverse: bool,
    violation: bool,
    writes: u64,
    energizations: u32,
}

impl RecordingCoils {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, rising: bool) {
        self.writes += 1;
        if rising {
            self.energizations = self.energizations.wrapping_add(1);
        }
        if self.forward && self.reverse {
            self.violation = true;
        }
    }

    /// Current output as a coil state. Both-on reads as `None`.
    pub fn state(&self) -> Option<CoilState> {
        match (self.forward, self.reverse) {
            (false, false) => Some(CoilState::Off),
            (true, false) => Some(CoilState::Forward),
            (false, true) => Some(CoilState::Reverse),
            (true, true) => None,
        }
    }

    pub fn forward(&self) -> bool {
        self.forward
    }

    pub fn reverse(&self) -> bool {
        self.reverse
    }

    /// Both coils were energized at the same time at some point.
    pub fn violation(&self) -> bool {
        self.violation
    }

    /// Output writes, including ones that did not change the level.
    pub fn writes(&self) -> u64 {
        self.writes
    }

    /// Off → on edges across both coils.
    pub fn energizations(&self) -> u32 {
        self.energizations
    }
}

impl CoilDriver for RecordingCoils {
    fn set_forward(&mut self, energized: bool) {
        let rising = energized && !self.forward;
        self.forward = energized;
        self.record(rising);
    }

    fn set_reverse(&mut self, energized: bool) {
        let rising = energized && !self.reverse;
        self.reverse = energized;
        self.record(rising);
    }
}
