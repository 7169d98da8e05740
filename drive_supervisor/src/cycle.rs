//! Supervisor tick and host cycle loop.
//!
//! ## Tick Body
//! 1. Drain inbound peer frames (bounded) and advance liveness.
//! 2. Consume the sampler's primary-ready signal.
//! 3. Run the leaving actions of the current state (startup, reset cleanup).
//! 4. Evaluate the transition (pure function of state, faults, events).
//! 5. Idle/Running service the contactor arbiter; Error/Reset force it off.
//! 6. Every `broadcast_interval` ticks send the state frame, and every
//!    `measurements_interval` ticks the measurements frame.
//!
//! ## Cycle Loop
//! [`CycleRunner`] stands in for the firmware scheduler: every timer period
//! it triggers one sampler conversion, and every `timer_hz / tick_hz`
//! periods it runs the supervisor tick.

use std::time::{Duration, Instant};

use drive_common::hal::driver::{AnalogSource, CanTransport, CoilDriver};
use drive_common::supervisor::config::SupervisorConfig;
use drive_common::supervisor::error::FaultFlags;
use drive_common::supervisor::frame::PeerFrame;
use drive_common::supervisor::sample::SampleSet;
use drive_common::supervisor::state::{CoilState, SystemState};
use tracing::{debug, info, trace, warn};

use crate::contactor::{ArbiterStats, ContactorArbiter, RequestSlot};
use crate::link::{LinkStats, PeerLink};
use crate::sampler::{SampleHandoff, Sampler};
use crate::state::{SupervisorEvents, SupervisorStateMachine, Transition};

// ─── Tick Divider ───────────────────────────────────────────────────

/// Fires once every `period` calls. A period of 0 never fires.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickDivider {
    period: u32,
    count: u32,
}

impl TickDivider {
    pub const fn new(period: u32) -> Self {
        Self { period, count: 0 }
    }

    /// Count one call. Returns `true` on every `period`-th call.
    #[inline]
    pub fn tick(&mut self) -> bool {
        if self.period == 0 {
            return false;
        }
        self.count += 1;
        if self.count < self.period {
            return false;
        }
        self.count = 0;
        true
    }

    #[inline]
    pub const fn period(&self) -> u32 {
        self.period
    }

    #[inline]
    pub const fn is_enabled(&self) -> bool {
        self.period != 0
    }
}

// ─── Cycle Statistics ───────────────────────────────────────────────

/// O(1) per-tick timing statistics.
#[derive(Debug, Clone)]
pub struct CycleStats {
    /// Total ticks executed.
    pub tick_count: u64,
    /// Last tick duration [ns].
    pub last_tick_ns: u64,
    /// Minimum tick duration [ns].
    pub min_tick_ns: u64,
    /// Maximum tick duration [ns].
    pub max_tick_ns: u64,
    /// Running sum for average computation.
    pub sum_tick_ns: u64,
    /// Ticks that exceeded the tick period.
    pub overruns: u64,
}

impl CycleStats {
    pub const fn new() -> Self {
        Self {
            tick_count: 0,
            last_tick_ns: 0,
            min_tick_ns: u64::MAX,
            max_tick_ns: 0,
            sum_tick_ns: 0,
            overruns: 0,
        }
    }

    /// Record a tick duration. O(1), no allocation.
    #[inline]
    pub fn record(&mut self, duration_ns: u64) {
        self.tick_count += 1;
        self.last_tick_ns = duration_ns;
        self.min_tick_ns = self.min_tick_ns.min(duration_ns);
        self.max_tick_ns = self.max_tick_ns.max(duration_ns);
        self.sum_tick_ns = self.sum_tick_ns.saturating_add(duration_ns);
    }

    /// Average tick time [ns] (0 if no ticks).
    #[inline]
    pub fn avg_tick_ns(&self) -> u64 {
        if self.tick_count == 0 {
            0
        } else {
            self.sum_tick_ns / self.tick_count
        }
    }
}

impl Default for CycleStats {
    fn default() -> Self {
        Self::new()
    }
}

// ─── Tick Report ────────────────────────────────────────────────────

/// What one supervisor tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    /// 1-based tick number.
    pub tick: u64,
    /// State after the tick.
    pub state: SystemState,
    /// Fault bits after the tick.
    pub faults: FaultFlags,
    pub transition: Option<Transition>,
    /// Frames pulled from the transport.
    pub frames_received: u16,
    /// Peer-lost was raised on this tick.
    pub peer_lost: bool,
    /// A primary sample-ready signal was consumed.
    pub sample_ready: bool,
    /// Coil state applied by the arbiter.
    pub applied: Option<CoilState>,
    /// A state frame was due this tick.
    pub state_broadcast: bool,
    /// A measurements frame was due this tick.
    pub measurements_broadcast: bool,
}

/// Read-only counters of a running supervisor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Diagnostics {
    pub ticks: u64,
    pub state: SystemState,
    pub faults: FaultFlags,
    /// Fault bits raised since power-on, counting repeats after a reset.
    pub total_faults: u32,
    /// Outbound state or measurements frames the transport refused.
    pub send_failures: u32,
    /// Primary sample-ready signals consumed.
    pub samples_consumed: u64,
    pub link: LinkStats,
    pub arbiter: ArbiterStats,
}

// ─── Supervisor ─────────────────────────────────────────────────────

/// Single-threaded supervisor owning the link, arbiter and state machine.
pub struct Supervisor<T: CanTransport, C: CoilDriver> {
    transport: T,
    link: PeerLink,
    requests: RequestSlot,
    arbiter: ContactorArbiter<C>,
    machine: SupervisorStateMachine,
    faults: FaultFlags,
    signature: u8,
    state_divider: TickDivider,
    measurements_divider: TickDivider,
    samples: SampleSet,
    ticks: u64,
    total_faults: u32,
    send_failures: u32,
    samples_consumed: u64,
}

impl<T: CanTransport, C: CoilDriver> Supervisor<T, C> {
    /// Build a supervisor in `Initializing` with both coils released.
    pub fn new(config: &SupervisorConfig, transport: T, coils: C) -> Self {
        let signature = config.link.self_signature;
        Self {
            transport,
            link: PeerLink::new(&config.link),
            requests: RequestSlot::new(),
            arbiter: ContactorArbiter::new(coils, signature),
            machine: SupervisorStateMachine::new(),
            faults: FaultFlags::empty(),
            signature,
            state_divider: TickDivider::new(config.cycle.broadcast_interval),
            measurements_divider: TickDivider::new(config.cycle.measurements_interval),
            samples: SampleSet::default(),
            ticks: 0,
            total_faults: 0,
            send_failures: 0,
            samples_consumed: 0,
        }
    }

    /// Run one supervisor tick.
    pub fn tick(&mut self, handoff: &SampleHandoff, events: SupervisorEvents) -> TickReport {
        self.ticks += 1;

        // ═══ PEER LINK ═══
        let before = self.faults;
        let frames_received =
            self.link
                .drain_incoming(&mut self.transport, &mut self.requests, &mut self.faults);
        let peer_lost = self.link.tick_liveness(&mut self.faults);
        self.total_faults += (self.faults.bits() & !before.bits()).count_ones();

        // ═══ SAMPLES ═══
        let sample_ready = match handoff.take_ready_snapshot() {
            Some(samples) => {
                self.samples = samples;
                self.samples_consumed += 1;
                trace!(
                    current = samples.current,
                    output_voltage = samples.output_voltage,
                    input_voltage = samples.input_voltage,
                    "Primary sample consumed"
                );
                true
            }
            None => false,
        };

        // ═══ STATE MACHINE ═══
        match self.machine.state() {
            SystemState::Initializing => self.startup(),
            SystemState::Reset => self.cleanup(),
            _ => {}
        }

        let transition = self.machine.step(self.faults, events);
        if let Some(t) = transition {
            info!(
                from = %t.from,
                to = %t.to,
                faults = self.faults.bits(),
                tick = self.ticks,
                "State transition"
            );
        }

        // ═══ CONTACTOR ═══
        let applied = match self.machine.state() {
            SystemState::Idle | SystemState::Running => {
                self.arbiter.service(&mut self.requests, &mut self.transport)
            }
            SystemState::Error | SystemState::Reset => {
                self.arbiter.force_off(&mut self.requests);
                None
            }
            SystemState::Initializing => None,
        };

        // ═══ BROADCAST ═══
        let state_broadcast = self.state_divider.tick();
        if state_broadcast {
            let frame = PeerFrame::state(self.signature, self.machine.state(), self.faults);
            self.send(&frame);
        }
        let measurements_broadcast = self.measurements_divider.tick();
        if measurements_broadcast {
            let frame = PeerFrame::measurements(self.signature, &handoff.snapshot());
            self.send(&frame);
        }

        TickReport {
            tick: self.ticks,
            state: self.machine.state(),
            faults: self.faults,
            transition,
            frames_received,
            peer_lost,
            sample_ready,
            applied,
            state_broadcast,
            measurements_broadcast,
        }
    }

    fn startup(&mut self) {
        info!(
            applied = ?self.arbiter.applied(),
            "Startup complete, contactor released"
        );
    }

    fn cleanup(&mut self) {
        self.faults = FaultFlags::empty();
        self.arbiter.force_off(&mut self.requests);
        self.link.clear_liveness();
        info!("Reset cleanup: faults cleared, liveness restarted");
    }

    fn send(&mut self, frame: &PeerFrame) {
        match self.transport.send(frame) {
            Ok(()) => debug!("Sent {frame}"),
            Err(e) => {
                self.send_failures = self.send_failures.wrapping_add(1);
                warn!(error = %e, id = frame.id(), "Outbound frame dropped");
            }
        }
    }

    #[inline]
    pub fn state(&self) -> SystemState {
        self.machine.state()
    }

    #[inline]
    pub fn faults(&self) -> FaultFlags {
        self.faults
    }

    /// Samples consumed with the last primary-ready signal.
    #[inline]
    pub fn samples(&self) -> &SampleSet {
        &self.samples
    }

    #[inline]
    pub fn link(&self) -> &PeerLink {
        &self.link
    }

    #[inline]
    pub fn arbiter(&self) -> &ContactorArbiter<C> {
        &self.arbiter
    }

    #[inline]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    #[inline]
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    pub fn diagnostics(&self) -> Diagnostics {
        Diagnostics {
            ticks: self.ticks,
            state: self.machine.state(),
            faults: self.faults,
            total_faults: self.total_faults,
            send_failures: self.send_failures,
            samples_consumed: self.samples_consumed,
            link: *self.link.stats(),
            arbiter: *self.arbiter.stats(),
        }
    }
}

// ─── Cycle Runner ───────────────────────────────────────────────────

/// Host stand-in for the firmware timer interrupt and scheduler loop.
pub struct CycleRunner<T: CanTransport, C: CoilDriver, A: AnalogSource> {
    supervisor: Supervisor<T, C>,
    sampler: Sampler,
    source: A,
    handoff: SampleHandoff,
    divider: TickDivider,
    timer_period: Duration,
    tick_period_ns: u64,
    paced: bool,
    stats: CycleStats,
}

impl<T: CanTransport, C: CoilDriver, A: AnalogSource> CycleRunner<T, C, A> {
    pub fn new(config: &SupervisorConfig, transport: T, coils: C, source: A) -> Self {
        let cycle = &config.cycle;
        Self {
            supervisor: Supervisor::new(config, transport, coils),
            sampler: Sampler::new(&config.sampler),
            source,
            handoff: SampleHandoff::new(),
            divider: TickDivider::new(cycle.timer_divider()),
            timer_period: Duration::from_nanos(1_000_000_000 / u64::from(cycle.timer_hz.max(1))),
            tick_period_ns: 1_000_000_000 / u64::from(cycle.tick_hz.max(1)),
            paced: true,
            stats: CycleStats::new(),
        }
    }

    /// Disable sleeping between timer periods.
    pub fn unpaced(mut self) -> Self {
        self.paced = false;
        self
    }

    /// One timer period: sampler conversion. Returns `true` when a
    /// supervisor tick is due.
    pub fn on_timer(&mut self) -> bool {
        self.sampler.on_trigger(&mut self.source, &self.handoff);
        self.divider.tick()
    }

    /// Run and time one supervisor tick.
    pub fn tick(&mut self, events: SupervisorEvents) -> TickReport {
        let start = Instant::now();
        let report = self.supervisor.tick(&self.handoff, events);
        let duration_ns = start.elapsed().as_nanos() as u64;
        self.stats.record(duration_ns);
        if duration_ns > self.tick_period_ns {
            self.stats.overruns += 1;
        }
        report
    }

    /// Run `ticks` supervisor ticks, or forever when `None`.
    ///
    /// `script` is called before every tick with the tick number and the
    /// transport, and returns the events for that tick. `observe` sees every
    /// report.
    pub fn run<S, O>(&mut self, ticks: Option<u64>, mut script: S, mut observe: O)
    where
        S: FnMut(u64, &mut T) -> SupervisorEvents,
        O: FnMut(&TickReport),
    {
        let mut done = 0u64;
        while ticks.is_none_or(|limit| done < limit) {
            let period_start = Instant::now();
            if self.on_timer() {
                let events = script(done + 1, self.supervisor.transport_mut());
                let report = self.tick(events);
                observe(&report);
                done += 1;
            }
            if self.paced {
                if let Some(remaining) = self.timer_period.checked_sub(period_start.elapsed()) {
                    std::thread::sleep(remaining);
                }
            }
        }
    }

    #[inline]
    pub fn supervisor(&self) -> &Supervisor<T, C> {
        &self.supervisor
    }

    #[inline]
    pub fn supervisor_mut(&mut self) -> &mut Supervisor<T, C> {
        &mut self.supervisor
    }

    #[inline]
    pub fn sampler(&self) -> &Sampler {
        &self.sampler
    }

    #[inline]
    pub fn source_mut(&mut self) -> &mut A {
        &mut self.source
    }

    #[inline]
    pub fn handoff(&self) -> &SampleHandoff {
        &self.handoff
    }

    #[inline]
    pub fn stats(&self) -> &CycleStats {
        &self.stats
    }
}

// ─── Tests ──────────────────────────────────────────────────────────
