//! Test helpers and fixtures for PulseBridge integration tests
//!
//! Every test drives the engine by hand: a [`Harness`] owns the engine, a
//! recording backend and a simulated device clock, and advances one buffer per
//! `cycle()` call. Nothing touches real audio hardware.
//!
//! ## Tolerance Levels
//!
//! Use the appropriate tolerance from [`tolerances`] module:
//! - `BEAT_EPSILON` (1e-9): Beat positions at exact anchors
//! - `CLICK_EPSILON` (1e-3): Click samples vs reference formula
//! - `SILENCE_THRESHOLD` (0.0001): Silence detection (-80dB)

#![allow(dead_code)]

pub mod tolerances;

use pulsebridge::prelude::*;
use pulsebridge::{BackendEvent, EventTime, Micros};

/// Default test sample rate (matches common hardware)
pub const TEST_SAMPLE_RATE: f64 = 48000.0;

/// 10 ms per buffer at the test sample rate
pub const TEST_BUFFER_SIZE: usize = 480;

pub const BUFFER_MICROS: Micros = 10_000;

/// Device host time of the first cycle.
pub const START_TIME: Micros = 1_000_000;

/// Backend ticks per second; equal to the sample rate so one frame is one tick.
pub const TEST_TICKS_PER_SECOND: u32 = 48_000;

pub type TestEngine = PulseEngine<LocalClock, CaptureBackend>;

/// Engine plus simulated device clock.
pub struct Harness {
    pub engine: TestEngine,
    pub backend: Arc<CaptureBackend>,
    pub output: Vec<f32>,
    /// Device host time of the next cycle.
    pub device_time: Micros,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_builder(test_builder())
    }

    pub fn with_builder(builder: PulseEngineBuilder) -> Self {
        let backend = Arc::new(CaptureBackend::with_ticks_per_second(
            TEST_TICKS_PER_SECOND,
        ));
        let engine = builder
            .build_local(Arc::clone(&backend))
            .expect("Failed to create test engine");
        backend.clear();
        let frames = engine.buffer_size();
        Self {
            engine,
            backend,
            output: vec![0.0; frames * 2],
            device_time: START_TIME,
        }
    }

    pub fn transport(&self) -> TransportHandle {
        self.engine.transport()
    }

    /// Host time the next cycle's first frame is scheduled against.
    pub fn effective_time(&self) -> Micros {
        self.device_time + self.engine.output_latency() + self.transport().get_latency().as_micros() as Micros
    }

    /// Process one buffer and return its interleaved output.
    pub fn cycle(&mut self) -> &[f32] {
        let frames = self.engine.buffer_size();
        self.engine
            .process(self.device_time, frames, &mut self.output);
        self.device_time += BUFFER_MICROS;
        &self.output
    }

    pub fn run(&mut self, cycles: usize) {
        for _ in 0..cycles {
            self.cycle();
        }
    }

    /// Run `cycles` buffers and return the peak of each.
    pub fn run_peaks(&mut self, cycles: usize) -> Vec<f32> {
        (0..cycles).map(|_| peak(self.cycle())).collect()
    }

    pub fn sent_events(&self) -> Vec<(EventTime, BackendEvent)> {
        self.backend.sent_events()
    }

    pub fn sent_ticks(&self) -> Vec<u32> {
        self.sent_events()
            .into_iter()
            .filter_map(|(time, _)| match time {
                EventTime::At(ticks) => Some(ticks),
                EventTime::Immediate => None,
            })
            .collect()
    }
}

/// Builder with the deterministic test configuration.
pub fn test_builder() -> PulseEngineBuilder {
    PulseEngine::<LocalClock, CaptureBackend>::builder()
        .sample_rate(TEST_SAMPLE_RATE)
        .buffer_size(TEST_BUFFER_SIZE)
        .tempo(120.0)
}

pub fn test_engine() -> Harness {
    Harness::new()
}

/// Route engine logs to the test output. Safe to call from every test.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// One event playing `note` with the given trigger phase.
pub fn note_event(track: i32, note: u8, phase: TriggerPhase) -> PerformanceEvent {
    PerformanceEvent::new(track, PerformanceEvent::encode_tone(note, phase), 100, 1)
}

/// Calculate peak amplitude of a signal.
pub fn peak(samples: &[f32]) -> f32 {
    samples
        .iter()
        .map(|s| s.abs())
        .fold(0.0_f32, |a, b| a.max(b))
}

/// Assert that a signal is approximately silent (all values near zero).
pub fn assert_silence(samples: &[f32], tolerance: f32) {
    let max = peak(samples);
    assert!(
        max <= tolerance,
        "Expected silence, but peak amplitude was {}",
        max
    );
}

/// Assert that a signal has content (not silent).
pub fn assert_has_audio(samples: &[f32], min_peak: f32) {
    let p = peak(samples);
    assert!(
        p >= min_peak,
        "Expected audio content with peak >= {}, but peak was {}",
        min_peak,
        p
    );
}
