//! Timer-triggered multiplexed analog sampling.
//!
//! The sampler runs on the hardware timer cadence (interrupt context on the
//! target) and is the only writer of the channel cursor and the published
//! sample set. The supervisor tick reads through [`SampleHandoff`].

pub mod cursor;
pub mod handoff;

use drive_common::consts::N_CHANNELS;
use drive_common::hal::driver::AnalogSource;
use drive_common::supervisor::config::SamplerConfig;
use drive_common::supervisor::sample::{Channel, scale_raw};

pub use cursor::ChannelCursor;
pub use handoff::SampleHandoff;

/// Round-robin sampler over the three analog channels.
#[derive(Debug, Clone)]
pub struct Sampler {
    cursor: ChannelCursor,
    coefficients: [f32; N_CHANNELS],
    conversions: u64,
}

impl Sampler {
    pub fn new(config: &SamplerConfig) -> Self {
        Self {
            cursor: ChannelCursor::new(),
            coefficients: Channel::ALL.map(|ch| config.coefficient(ch)),
            conversions: 0,
        }
    }

    /// Handle one conversion-complete trigger.
    ///
    /// Reads the cursor's channel, scales it, publishes it and advances the
    /// cursor. Conversion of the primary channel closes the cycle and raises
    /// the one-shot ready signal. Returns the channel that was converted.
    pub fn on_trigger<A: AnalogSource + ?Sized>(
        &mut self,
        source: &mut A,
        handoff: &SampleHandoff,
    ) -> Channel {
        let channel = self.cursor.channel();
        let value = scale_raw(source.read_raw(channel), self.coefficients[channel.index()]);
        handoff.publish(channel, value, channel == Channel::PRIMARY);
        self.cursor.advance();
        self.conversions = self.conversions.wrapping_add(1);
        channel
    }

    #[inline]
    pub fn cursor(&self) -> ChannelCursor {
        self.cursor
    }

    /// Total conversions handled.
    #[inline]
    pub fn conversions(&self) -> u64 {
        self.conversions
    }
}
