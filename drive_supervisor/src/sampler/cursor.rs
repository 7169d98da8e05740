//! Round-robin channel pointer.

use drive_common::consts::N_CHANNELS;
use drive_common::supervisor::sample::Channel;

/// Index of the next channel to convert, always in `[0, N_CHANNELS)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ChannelCursor(u8);

impl ChannelCursor {
    pub const fn new() -> Self {
        Self(0)
    }

    #[inline]
    pub const fn index(self) -> u8 {
        self.0
    }

    /// Channel the cursor points at.
    #[inline]
    pub const fn channel(self) -> Channel {
        Channel::from_index(self.0)
    }

    #[inline]
    pub fn advance(&mut self) {
        self.0 = ((self.0 as usize + 1) % N_CHANNELS) as u8;
    }
}
