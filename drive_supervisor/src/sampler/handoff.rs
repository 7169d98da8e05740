//! Sample handoff between the timer context and the supervisor tick.
//!
//! All multi-field access happens inside `critical_section::with`, which
//! masks interrupts on the target and takes a global lock on hosts.

use core::cell::Cell;

use critical_section::Mutex;
use drive_common::supervisor::sample::{Channel, SampleSet};

#[derive(Debug, Clone, Copy, Default)]
struct Published {
    samples: SampleSet,
    primary_ready: bool,
}

/// Shared cell holding the latest samples and the one-shot ready signal.
///
/// `const`-constructible so the firmware can place it in a `static`.
pub struct SampleHandoff {
    inner: Mutex<Cell<Published>>,
}

impl SampleHandoff {
    pub const fn new() -> Self {
        Self {
            inner: Mutex::new(Cell::new(Published {
                samples: SampleSet {
                    current: 0.0,
                    output_voltage: 0.0,
                    input_voltage: 0.0,
                },
                primary_ready: false,
            })),
        }
    }

    /// Store one converted channel. `closes_cycle` raises the ready signal.
    pub fn publish(&self, channel: Channel, value: f32, closes_cycle: bool) {
        critical_section::with(|cs| {
            let cell = self.inner.borrow(cs);
            let mut published = cell.get();
            published.samples.set(channel, value);
            if closes_cycle {
                published.primary_ready = true;
            }
            cell.set(published);
        });
    }

    /// Consistent copy of all channels.
    pub fn snapshot(&self) -> SampleSet {
        critical_section::with(|cs| self.inner.borrow(cs).get().samples)
    }

    /// Consume the ready signal. Returns whether it was set.
    pub fn take_primary_ready(&self) -> bool {
        critical_section::with(|cs| {
            let cell = self.inner.borrow(cs);
            let mut published = cell.get();
            let ready = published.primary_ready;
            published.primary_ready = false;
            cell.set(published);
            ready
        })
    }

    /// Consume the ready signal together with the samples it belongs to.
    pub fn take_ready_snapshot(&self) -> Option<SampleSet> {
        critical_section::with(|cs| {
            let cell = self.inner.borrow(cs);
            let mut published = cell.get();
            if !published.primary_ready {
                return None;
            }
            published.primary_ready = false;
            cell.set(published);
            Some(published.samples)
        })
    }
}

impl Default for SampleHandoff {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Debug for SampleHandoff {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let published = critical_section::with(|cs| self.inner.borrow(cs).get());
        f.debug_struct("SampleHandoff")
            .field("samples", &published.samples)
            .field("primary_ready", &published.primary_ready)
            .finish()
    }
}
