//! Peer heartbeat staleness detection.
//!
//! Counts supervisor ticks without an accepted peer frame. A silence run
//! that reaches the threshold reports the peer lost exactly once; the
//! counter then restarts but stays latched until the next accepted frame
//! or an explicit clear.

/// Liveness counter for the peer node.
#[derive(Debug, Clone)]
pub struct LivenessMonitor {
    /// Consecutive silent ticks in the current window.
    count: u32,
    /// Silent ticks that trigger peer-lost.
    threshold: u32,
    /// Peer-lost already reported for this silence run.
    tripped: bool,
    /// A frame was accepted since the last tick.
    heard: bool,
}

impl LivenessMonitor {
    pub const fn new(threshold: u32) -> Self {
        Self {
            count: 0,
            threshold,
            tripped: false,
            heard: false,
        }
    }

    /// Record an accepted peer frame.
    #[inline]
    pub fn observe(&mut self) {
        self.count = 0;
        self.tripped = false;
        self.heard = true;
    }

    /// Advance by one tick. Returns `true` when the peer is declared lost.
    ///
    /// A tick in which a frame was accepted is not silent and does not count.
    pub fn tick(&mut self) -> bool {
        if self.heard {
            self.heard = false;
            return false;
        }
        self.count = self.count.saturating_add(1);
        if self.count < self.threshold {
            return false;
        }
        self.count = 0;
        let first = !self.tripped;
        self.tripped = true;
        first
    }

    /// Forget the current silence run.
    #[inline]
    pub fn clear(&mut self) {
        self.count = 0;
        self.tripped = false;
        self.heard = false;
    }

    #[inline]
    pub fn count(&self) -> u32 {
        self.count
    }

    #[inline]
    pub fn threshold(&self) -> u32 {
        self.threshold
    }

    #[inline]
    pub fn is_tripped(&self) -> bool {
        self.tripped
    }
}
