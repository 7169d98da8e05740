//! Collaborator traits and transport error type.
//!
//! This module defines:
//! - `CanTransport` - receive/send primitives of the lower CAN driver
//! - `AnalogSource` - raw 10-bit conversion results per channel
//! - `CoilDriver` - forward/reverse contactor coil outputs
//! - `TransportError` - failures reported by `CanTransport::send`

use thiserror::Error;

use crate::supervisor::frame::PeerFrame;
use crate::supervisor::sample::Channel;

/// Failures reported by the CAN transport when queuing a frame.
///
/// The supervisor logs and counts these; it never retries.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    /// All transmit mailboxes are occupied.
    #[error("transmit mailboxes full")]
    TxFull,

    /// Controller is in bus-off state.
    #[error("CAN controller is bus-off")]
    BusOff,

    /// Driver-specific failure.
    #[error("CAN driver error: {0}")]
    Driver(&'static str),
}

/// Lower CAN driver.
///
/// No delivery guarantee is assumed: frames may be silently dropped in
/// either direction.
///
/// # Timing Contracts
///
/// | Operation | Blocking | Called from |
/// |-----------|----------|-------------|
/// | `try_receive()` | never | main-loop tick |
/// | `send()` | never | main-loop tick |
pub trait CanTransport {
    /// Pop the next pending inbound frame, if any.
    fn try_receive(&mut self) -> Option<PeerFrame>;

    /// Queue a frame for transmission.
    fn send(&mut self, frame: &PeerFrame) -> Result<(), TransportError>;
}

/// ADC multiplexer seen from the conversion-complete trigger.
pub trait AnalogSource {
    /// Raw result of the last conversion on `channel`.
    ///
    /// Implementations return the 10-bit value right-aligned; callers mask
    /// anything above bit 9.
    fn read_raw(&mut self, channel: Channel) -> u16;
}

/// Contactor coil outputs.
///
/// A call takes effect before the next tick. Mutual exclusion between the
/// two coils is the caller's responsibility.
pub trait CoilDriver {
    /// Energize (`true`) or release (`false`) the forward coil.
    fn set_forward(&mut self, energized: bool);

    /// Energize (`true`) or release (`false`) the reverse coil.
    fn set_reverse(&mut self, energized: bool);
}

impl<T: CanTransport + ?Sized> CanTransport for &mut T {
    fn try_receive(&mut self) -> Option<PeerFrame> {
        (**self).try_receive()
    }

    fn send(&mut self, frame: &PeerFrame) -> Result<(), TransportError> {
        (**self).send(frame)
    }
}

impl<T: CoilDriver + ?Sized> CoilDriver for &mut T {
    fn set_forward(&mut self, energized: bool) {
        (**self).set_forward(energized)
    }

    fn set_reverse(&mut self, energized: bool) {
        (**self).set_reverse(energized)
    }
}
