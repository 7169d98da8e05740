//! Simulated ADC multiplexer.

use drive_common::consts::{N_CHANNELS, RAW_MAX};
use drive_common::hal::driver::AnalogSource;
use drive_common::supervisor::sample::Channel;

/// Returns a settable raw value per channel, optionally ramping.
#[derive(Debug, Clone)]
pub struct SimAnalog {
    raw: [u16; N_CHANNELS],
    step: [i16; N_CHANNELS],
    reads: u64,
}

impl SimAnalog {
    pub fn new(raw: [u16; N_CHANNELS]) -> Self {
        Self {
            raw,
            step: [0; N_CHANNELS],
            reads: 0,
        }
    }

    pub fn set_raw(&mut self, channel: Channel, raw: u16) {
        self.raw[channel.index()] = raw;
    }

    /// Add `step` to the channel after every read, wrapping at 10 bits.
    pub fn ramp(mut self, channel: Channel, step: i16) -> Self {
        self.step[channel.index()] = step;
        self
    }

    pub fn reads(&self) -> u64 {
        self.reads
    }
}

impl AnalogSource for SimAnalog {
    fn read_raw(&mut self, channel: Channel) -> u16 {
        let i = channel.index();
        let value = self.raw[i];
        self.raw[i] = value.wrapping_add_signed(self.step[i]) & RAW_MAX;
        self.reads += 1;
        value
    }
}
