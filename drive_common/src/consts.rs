//! Wire constants and default limits for the drive supervisor.
//!
//! Single source of truth for message identifiers, payload byte positions,
//! node signatures and the defaults used by configuration.

/// Number of multiplexed analog channels sampled round-robin.
pub const N_CHANNELS: usize = 3;

/// Full-scale value of a 10-bit conversion.
pub const RAW_MAX: u16 = 0x03FF;

/// Maximum CAN payload length in bytes (classic CAN).
pub const MAX_PAYLOAD_LEN: usize = 8;

// ─── Node Signatures ────────────────────────────────────────────────

/// Signature byte this node stamps into byte 0 of every payload.
pub const SIGNATURE_SELF: u8 = 22;

/// Signature byte of the partner controller node.
pub const SIGNATURE_PEER: u8 = 19;

// ─── Message Identifiers ────────────────────────────────────────────

/// Peer → self: peer state heartbeat.
pub const MSG_PEER_STATE_ID: u16 = 0x20;

/// Peer → self: contactor request.
pub const MSG_PEER_CONTACTOR_ID: u16 = 0x21;

/// Self → peer: supervisor state broadcast.
pub const MSG_SELF_STATE_ID: u16 = 0x50;

/// Self → peer: contactor acknowledgement.
pub const MSG_SELF_CONTACTOR_ID: u16 = 0x51;

/// Self → peer: measurements broadcast.
pub const MSG_SELF_MEASUREMENTS_ID: u16 = 0x52;

// ─── Payload Layout ─────────────────────────────────────────────────

/// Byte 0 of every payload carries the sender signature.
pub const SIGNATURE_BYTE: usize = 0;

/// State frame: system state ordinal.
pub const STATE_STATE_BYTE: usize = 1;

/// State frame: fault flags.
pub const STATE_FAULT_BYTE: usize = 2;

/// State frame payload length.
pub const STATE_LENGTH: usize = 3;

/// Contactor request/ack frame: coil state byte.
pub const CONTACTOR_STATE_BYTE: usize = 1;

/// Contactor request/ack frame payload length.
pub const CONTACTOR_LENGTH: usize = 2;

/// Measurements frame: first of three little-endian u16 values.
pub const MEASUREMENTS_FIRST_BYTE: usize = 1;

/// Measurements frame payload length (signature + 3 × u16).
pub const MEASUREMENTS_LENGTH: usize = 7;

// ─── Defaults ───────────────────────────────────────────────────────

/// Supervisor tick rate [Hz].
pub const TICK_HZ_DEFAULT: u32 = 100;

/// Hardware timer interrupt rate [Hz].
pub const TIMER_HZ_DEFAULT: u32 = 300;

/// State broadcast interval [ticks].
pub const BROADCAST_INTERVAL_DEFAULT: u32 = 10;

/// Measurements broadcast interval [ticks] (0 = disabled).
pub const MEASUREMENTS_INTERVAL_DEFAULT: u32 = 0;

/// Silent ticks before the peer is declared lost.
pub const LIVENESS_THRESHOLD_DEFAULT: u32 = 1000;

/// Upper bound of inbound frames processed per tick.
pub const MAX_FRAMES_PER_TICK_DEFAULT: u16 = 8;

/// Current channel coefficient [A/LSB].
pub const CURRENT_COEFF_DEFAULT: f32 = 0.015_993_15;

/// Output voltage channel coefficient [V/LSB].
pub const OUTPUT_VOLTAGE_COEFF_DEFAULT: f32 = 0.067_177_82;

/// Input voltage channel coefficient [V/LSB].
pub const INPUT_VOLTAGE_COEFF_DEFAULT: f32 = 0.065_824_91;

static_assertions::const_assert!(STATE_LENGTH <= MAX_PAYLOAD_LEN);
static_assertions::const_assert!(CONTACTOR_LENGTH <= MAX_PAYLOAD_LEN);
static_assertions::const_assert!(MEASUREMENTS_LENGTH <= MAX_PAYLOAD_LEN);
static_assertions::const_assert!(MEASUREMENTS_FIRST_BYTE + 6 == MEASUREMENTS_LENGTH);
static_assertions::const_assert!(SIGNATURE_SELF != SIGNATURE_PEER);
