//! Coil activation with forward/reverse interlock.
//!
//! The energized coil is always released before the opposite one is
//! driven, so both are never on together regardless of request order.

use drive_common::hal::driver::{CanTransport, CoilDriver};
use drive_common::supervisor::frame::PeerFrame;
use drive_common::supervisor::state::CoilState;
use tracing::{debug, info, warn};

use super::request::RequestSlot;

/// Arbiter counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArbiterStats {
    /// Requests applied to the coils.
    pub applied: u32,
    /// Acks the transport refused. Never resent.
    pub ack_failures: u32,
    /// Forced turn-offs that changed the coil state.
    pub forced_off: u32,
}

pub struct ContactorArbiter<C: CoilDriver> {
    coils: C,
    applied: CoilState,
    signature: u8,
    stats: ArbiterStats,
}

impl<C: CoilDriver> ContactorArbiter<C> {
    /// Take ownership of the coil driver and release both coils.
    pub fn new(mut coils: C, signature: u8) -> Self {
        coils.set_forward(false);
        coils.set_reverse(false);
        Self {
            coils,
            applied: CoilState::Off,
            signature,
            stats: ArbiterStats::default(),
        }
    }

    /// Apply the pending request, if any, and acknowledge it.
    ///
    /// Only called while the supervisor is in a non-fault state. Returns the
    /// applied coil state.
    pub fn service<T: CanTransport + ?Sized>(
        &mut self,
        requests: &mut RequestSlot,
        transport: &mut T,
    ) -> Option<CoilState> {
        let request = requests.take()?;
        let target = request.target();
        self.drive(target);
        self.stats.applied = self.stats.applied.wrapping_add(1);
        debug!(?request, applied = ?target, "Contactor request applied");

        let ack = PeerFrame::contactor_ack(self.signature, target);
        if let Err(e) = transport.send(&ack) {
            self.stats.ack_failures = self.stats.ack_failures.wrapping_add(1);
            warn!(error = %e, "Contactor ack not sent");
        }
        Some(target)
    }

    /// Release both coils and drop any pending request. No ack is sent.
    ///
    /// Idempotent; returns `true` if a coil was energized.
    pub fn force_off(&mut self, requests: &mut RequestSlot) -> bool {
        if let Some(request) = requests.take() {
            debug!(?request, "Pending contactor request discarded");
        }
        let was_on = self.applied != CoilState::Off;
        self.drive(CoilState::Off);
        if was_on {
            self.stats.forced_off = self.stats.forced_off.wrapping_add(1);
            info!("Contactor forced off");
        }
        was_on
    }

    fn drive(&mut self, target: CoilState) {
        match target {
            CoilState::Off => {
                self.coils.set_forward(false);
                self.coils.set_reverse(false);
            }
            CoilState::Forward => {
                self.coils.set_reverse(false);
                self.coils.set_forward(true);
            }
            CoilState::Reverse => {
                self.coils.set_forward(false);
                self.coils.set_reverse(true);
            }
        }
        self.applied = target;
    }

    /// Coil state last driven.
    #[inline]
    pub fn applied(&self) -> CoilState {
        self.applied
    }

    #[inline]
    pub fn stats(&self) -> &ArbiterStats {
        &self.stats
    }

    #[inline]
    pub fn coils(&self) -> &C {
        &self.coils
    }

    #[inline]
    pub fn coils_mut(&mut self) -> &mut C {
        &mut self.coils
    }
}
