//! Integration test: sampling cycle and handoff.
//!
//! Validates: a full cycle of triggers returns the cursor to its start, the
//! calibrated values reach the supervisor through the handoff, the timer
//! context can run concurrently with ticks, and the measurements frame.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

use drive_common::consts::{
    CURRENT_COEFF_DEFAULT, INPUT_VOLTAGE_COEFF_DEFAULT, MEASUREMENTS_FIRST_BYTE,
    MSG_SELF_MEASUREMENTS_ID, N_CHANNELS, OUTPUT_VOLTAGE_COEFF_DEFAULT,
};
use drive_common::supervisor::config::{SamplerConfig, SupervisorConfig};
use drive_common::supervisor::sample::Channel;
use drive_supervisor::cycle::{CycleRunner, Supervisor};
use drive_supervisor::sampler::{SampleHandoff, Sampler};
use drive_supervisor::sim::{LoopbackTransport, RecordingCoils, SimAnalog};
use drive_supervisor::state::SupervisorEvents;

fn centi(raw: u16, coeff: f32) -> u16 {
    (raw as f32 * coeff * 100.0).round() as u16
}

#[test]
fn n_triggers_return_cursor_to_start() {
    let mut sampler = Sampler::new(&SamplerConfig::default());
    let mut source = SimAnalog::new([1, 2, 3]);
    let handoff = SampleHandoff::new();

    for _ in 0..5 {
        let start = sampler.cursor();
        for _ in 0..N_CHANNELS {
            sampler.on_trigger(&mut source, &handoff);
        }
        assert_eq!(sampler.cursor(), start);
    }
}

#[test]
fn supervisor_sees_calibrated_samples() {
    let config = SupervisorConfig::default();
    let mut runner = CycleRunner::new(
        &config,
        LoopbackTransport::new(),
        RecordingCoils::new(),
        SimAnalog::new([300, 700, 720]),
    )
    .unpaced();

    runner.run(Some(3), |_, _| SupervisorEvents::empty(), |r| {
        assert!(r.sample_ready);
    });

    let samples = runner.supervisor().samples();
    assert_eq!(samples.current, 300.0 * CURRENT_COEFF_DEFAULT);
    assert_eq!(samples.output_voltage, 700.0 * OUTPUT_VOLTAGE_COEFF_DEFAULT);
    assert_eq!(samples.input_voltage, 720.0 * INPUT_VOLTAGE_COEFF_DEFAULT);
}

#[test]
fn tick_without_completed_cycle_has_no_sample() {
    let mut config = SupervisorConfig::default();
    config.cycle.timer_hz = 100;
    let mut runner = CycleRunner::new(
        &config,
        LoopbackTransport::new(),
        RecordingCoils::new(),
        SimAnalog::new([1, 1, 1]),
    )
    .unpaced();

    // Divider 1: one conversion per tick, so only every third tick closes
    // a cycle.
    let mut ready = Vec::new();
    runner.run(Some(6), |_, _| SupervisorEvents::empty(), |r| {
        ready.push(r.sample_ready);
    });
    assert_eq!(ready, [false, false, true, false, false, true]);
}

#[test]
fn sampler_thread_runs_alongside_ticks() {
    let config = SupervisorConfig::default();
    let handoff = Arc::new(SampleHandoff::new());
    let stop = Arc::new(AtomicBool::new(false));

    let timer = {
        let handoff = Arc::clone(&handoff);
        let stop = Arc::clone(&stop);
        let sampler_config = config.sampler.clone();
        thread::spawn(move || {
            let mut sampler = Sampler::new(&sampler_config);
            let mut source = SimAnalog::new([100, 200, 300]).ramp(Channel::Current, 1);
            while !stop.load(Ordering::Relaxed) {
                sampler.on_trigger(&mut source, &handoff);
                thread::yield_now();
            }
            sampler.conversions()
        })
    };

    let mut sup = Supervisor::new(&config, LoopbackTransport::new(), RecordingCoils::new());
    let mut consumed = 0;
    for _ in 0..500 {
        if sup.tick(&handoff, SupervisorEvents::empty()).sample_ready {
            consumed += 1;
            // Voltage channels are constant; a torn set would show zeros.
            assert_eq!(
                sup.samples().output_voltage,
                200.0 * OUTPUT_VOLTAGE_COEFF_DEFAULT
            );
            assert_eq!(
                sup.samples().input_voltage,
                300.0 * INPUT_VOLTAGE_COEFF_DEFAULT
            );
        }
        sup.transport_mut().drain_sent().for_each(drop);
        thread::yield_now();
    }
    stop.store(true, Ordering::Relaxed);
    let conversions = timer.join().unwrap();

    assert!(conversions > 0);
    assert_eq!(sup.diagnostics().samples_consumed, consumed);
}

#[test]
fn measurements_frame_carries_hundredths() {
    let mut config = SupervisorConfig::default();
    config.cycle.measurements_interval = 2;
    let mut runner = CycleRunner::new(
        &config,
        LoopbackTransport::new(),
        RecordingCoils::new(),
        SimAnalog::new([300, 700, 720]),
    )
    .unpaced();

    let mut due = Vec::new();
    runner.run(Some(4), |_, _| SupervisorEvents::empty(), |r| {
        if r.measurements_broadcast {
            due.push(r.tick);
        }
    });
    assert_eq!(due, [2, 4]);

    let frames: Vec<_> = runner
        .supervisor_mut()
        .transport_mut()
        .drain_sent()
        .filter(|f| f.id() == MSG_SELF_MEASUREMENTS_ID)
        .collect();
    assert_eq!(frames.len(), 2);

    let p = frames[0].payload();
    let word = |i: usize| {
        let at = MEASUREMENTS_FIRST_BYTE + 2 * i;
        u16::from_le_bytes([p[at], p[at + 1]])
    };
    assert_eq!(p[0], config.link.self_signature);
    assert_eq!(word(0), centi(300, CURRENT_COEFF_DEFAULT));
    assert_eq!(word(1), centi(700, OUTPUT_VOLTAGE_COEFF_DEFAULT));
    assert_eq!(word(2), centi(720, INPUT_VOLTAGE_COEFF_DEFAULT));
}
