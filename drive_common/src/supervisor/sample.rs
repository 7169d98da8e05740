//! Analog channel map and calibrated sample set.

use serde::{Deserialize, Serialize};

use crate::consts::{N_CHANNELS, RAW_MAX};

/// Multiplexed analog channels, in conversion order.
///
/// `InputVoltage` is the primary channel: its conversion closes a sampling
/// cycle and it is the fallback for any unrecognized mux index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(u8)]
pub enum Channel {
    Current = 0,
    OutputVoltage = 1,
    InputVoltage = 2,
}

impl Channel {
    /// Channel whose completion raises the "primary sample ready" signal.
    pub const PRIMARY: Self = Self::InputVoltage;

    /// All channels in conversion order.
    pub const ALL: [Self; N_CHANNELS] = [Self::Current, Self::OutputVoltage, Self::InputVoltage];

    /// Map a mux index to a channel; unrecognized indices map to `PRIMARY`.
    #[inline]
    pub const fn from_index(index: u8) -> Self {
        match index {
            0 => Self::Current,
            1 => Self::OutputVoltage,
            _ => Self::PRIMARY,
        }
    }

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Most recent calibrated reading of every channel.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SampleSet {
    /// Output current [A].
    pub current: f32,
    /// Output voltage [V].
    pub output_voltage: f32,
    /// Input voltage [V].
    pub input_voltage: f32,
}

impl SampleSet {
    #[inline]
    pub const fn get(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Current => self.current,
            Channel::OutputVoltage => self.output_voltage,
            Channel::InputVoltage => self.input_voltage,
        }
    }

    #[inline]
    pub fn set(&mut self, channel: Channel, value: f32) {
        match channel {
            Channel::Current => self.current = value,
            Channel::OutputVoltage => self.output_voltage = value,
            Channel::InputVoltage => self.input_voltage = value,
        }
    }
}

/// Scale a raw conversion. Bits above the 10-bit range are discarded.
#[inline]
pub fn scale_raw(raw: u16, coefficient: f32) -> f32 {
    (raw & RAW_MAX) as f32 * coefficient
}
