//! Configuration tables for the supervisor.
//!
//! All tables deserialize from TOML with every field defaulted, so an empty
//! table (or a missing one) yields the factory configuration.

use serde::{Deserialize, Serialize};

use super::sample::Channel;
use super::state::PeerFaultPolicy;
use crate::consts::{
    BROADCAST_INTERVAL_DEFAULT, CURRENT_COEFF_DEFAULT, INPUT_VOLTAGE_COEFF_DEFAULT,
    LIVENESS_THRESHOLD_DEFAULT, MAX_FRAMES_PER_TICK_DEFAULT, MEASUREMENTS_INTERVAL_DEFAULT,
    OUTPUT_VOLTAGE_COEFF_DEFAULT, SIGNATURE_PEER, SIGNATURE_SELF, TICK_HZ_DEFAULT,
    TIMER_HZ_DEFAULT,
};

// ─── Top-Level Config ───────────────────────────────────────────────

/// Supervisor configuration: every table except `[shared]`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SupervisorConfig {
    #[serde(default)]
    pub cycle: CycleConfig,
    #[serde(default)]
    pub link: LinkConfig,
    #[serde(default)]
    pub sampler: SamplerConfig,
}

impl SupervisorConfig {
    /// Validate every table.
    pub fn validate(&self) -> Result<(), String> {
        self.cycle.validate()?;
        self.link.validate()?;
        self.sampler.validate()?;
        Ok(())
    }
}

// ─── Cycle ──────────────────────────────────────────────────────────

/// Tick timing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Supervisor tick rate [Hz] (default: 100).
    #[serde(default = "default_tick_hz")]
    pub tick_hz: u32,

    /// Hardware timer rate [Hz] (default: 300). Drives the sampler.
    #[serde(default = "default_timer_hz")]
    pub timer_hz: u32,

    /// State broadcast interval [ticks] (default: 10).
    #[serde(default = "default_broadcast_interval")]
    pub broadcast_interval: u32,

    /// Measurements broadcast interval [ticks] (default: 0 = disabled).
    #[serde(default = "default_measurements_interval")]
    pub measurements_interval: u32,
}

fn default_tick_hz() -> u32 {
    TICK_HZ_DEFAULT
}
fn default_timer_hz() -> u32 {
    TIMER_HZ_DEFAULT
}
fn default_broadcast_interval() -> u32 {
    BROADCAST_INTERVAL_DEFAULT
}
fn default_measurements_interval() -> u32 {
    MEASUREMENTS_INTERVAL_DEFAULT
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            tick_hz: TICK_HZ_DEFAULT,
            timer_hz: TIMER_HZ_DEFAULT,
            broadcast_interval: BROADCAST_INTERVAL_DEFAULT,
            measurements_interval: MEASUREMENTS_INTERVAL_DEFAULT,
        }
    }
}

impl CycleConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.tick_hz == 0 {
            return Err("cycle.tick_hz must be > 0".to_string());
        }
        if self.timer_hz < self.tick_hz {
            return Err(format!(
                "cycle.timer_hz {} is below tick_hz {}",
                self.timer_hz, self.tick_hz
            ));
        }
        if self.timer_hz % self.tick_hz != 0 {
            return Err(format!(
                "cycle.timer_hz {} is not a multiple of tick_hz {}",
                self.timer_hz, self.tick_hz
            ));
        }
        if self.broadcast_interval == 0 {
            return Err("cycle.broadcast_interval must be > 0".to_string());
        }
        Ok(())
    }

    /// Timer interrupts per supervisor tick.
    #[inline]
    pub fn timer_divider(&self) -> u32 {
        self.timer_hz / self.tick_hz.max(1)
    }
}

// ─── Link ───────────────────────────────────────────────────────────

/// Peer link parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LinkConfig {
    /// Signature stamped into our outbound frames (default: 22).
    #[serde(default = "default_self_signature")]
    pub self_signature: u8,

    /// Signature an inbound frame must carry to be accepted (default: 19).
    #[serde(default = "default_peer_signature")]
    pub peer_signature: u8,

    /// Silent ticks before peer-lost is raised (default: 1000).
    #[serde(default = "default_liveness_threshold")]
    pub liveness_threshold: u32,

    /// Inbound frames drained per tick at most (default: 8).
    #[serde(default = "default_max_frames_per_tick")]
    pub max_frames_per_tick: u16,

    /// Reaction to a nonzero peer fault byte (default: advisory).
    #[serde(default)]
    pub peer_fault_policy: PeerFaultPolicy,
}

fn default_self_signature() -> u8 {
    SIGNATURE_SELF
}
fn default_peer_signature() -> u8 {
    SIGNATURE_PEER
}
fn default_liveness_threshold() -> u32 {
    LIVENESS_THRESHOLD_DEFAULT
}
fn default_max_frames_per_tick() -> u16 {
    MAX_FRAMES_PER_TICK_DEFAULT
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            self_signature: SIGNATURE_SELF,
            peer_signature: SIGNATURE_PEER,
            liveness_threshold: LIVENESS_THRESHOLD_DEFAULT,
            max_frames_per_tick: MAX_FRAMES_PER_TICK_DEFAULT,
            peer_fault_policy: PeerFaultPolicy::default(),
        }
    }
}

impl LinkConfig {
    pub fn validate(&self) -> Result<(), String> {
        if self.self_signature == self.peer_signature {
            return Err(format!(
                "link.self_signature and link.peer_signature are both {}",
                self.self_signature
            ));
        }
        if self.liveness_threshold == 0 {
            return Err("link.liveness_threshold must be > 0".to_string());
        }
        if self.max_frames_per_tick == 0 {
            return Err("link.max_frames_per_tick must be > 0".to_string());
        }
        Ok(())
    }
}

// ─── Sampler ────────────────────────────────────────────────────────

/// Per-channel linear calibration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SamplerConfig {
    /// Current coefficient [A/LSB].
    #[serde(default = "default_current_coeff")]
    pub current_coeff: f32,

    /// Output voltage coefficient [V/LSB].
    #[serde(default = "default_output_voltage_coeff")]
    pub output_voltage_coeff: f32,

    /// Input voltage coefficient [V/LSB].
    #[serde(default = "default_input_voltage_coeff")]
    pub input_voltage_coeff: f32,
}

fn default_current_coeff() -> f32 {
    CURRENT_COEFF_DEFAULT
}
fn default_output_voltage_coeff() -> f32 {
    OUTPUT_VOLTAGE_COEFF_DEFAULT
}
fn default_input_voltage_coeff() -> f32 {
    INPUT_VOLTAGE_COEFF_DEFAULT
}

impl Default for SamplerConfig {
    fn default() -> Self {
        Self {
            current_coeff: CURRENT_COEFF_DEFAULT,
            output_voltage_coeff: OUTPUT_VOLTAGE_COEFF_DEFAULT,
            input_voltage_coeff: INPUT_VOLTAGE_COEFF_DEFAULT,
        }
    }
}

impl SamplerConfig {
    /// Coefficient applied to `channel`.
    #[inline]
    pub const fn coefficient(&self, channel: Channel) -> f32 {
        match channel {
            Channel::Current => self.current_coeff,
            Channel::OutputVoltage => self.output_voltage_coeff,
            Channel::InputVoltage => self.input_voltage_coeff,
        }
    }

    pub fn validate(&self) -> Result<(), String> {
        for channel in Channel::ALL {
            let coeff = self.coefficient(channel);
            if !coeff.is_finite() || coeff <= 0.0 {
                return Err(format!(
                    "sampler coefficient for {channel:?} must be finite and > 0, got {coeff}"
                ));
            }
        }
        Ok(())
    }
}
