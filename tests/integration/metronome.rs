//! Metronome integration tests
//!
//! Click placement and gating as heard through the engine's output buffer.
//! At 120 BPM one beat is 50 buffers of 10 ms and a click lasts 10 buffers.

use crate::helpers::tolerances::*;
use crate::helpers::*;
use approx::assert_relative_eq;
use pulsebridge::core::transport::{CLICK_DURATION, HIGH_TONE, LOW_TONE};
use pulsebridge::prelude::*;
use std::f64::consts::PI;

/// Reference click amplitude `elapsed` seconds into a click.
fn click(elapsed: f64, freq: f64) -> f32 {
    ((2.0 * PI * elapsed * freq).cos() * (1.0 - (5.0 * PI * elapsed).sin())) as f32
}

/// Test that the first buffer after start opens with a full-scale click.
#[test]
fn test_click_on_start() {
    let mut h = test_engine();
    h.transport().start(true);
    let out = h.cycle();

    assert_eq!(out[0], 1.0);
    assert_eq!(out[1], 1.0);
}

/// Test that the metronome stays silent unless requested.
#[test]
fn test_metronome_disabled() {
    let mut h = test_engine();
    h.transport().start(false);
    for p in h.run_peaks(100) {
        assert!(p <= SILENCE_THRESHOLD);
    }
    assert!(!h.transport().metronome_enabled());
}

/// Test one click per beat, each lasting the click duration.
#[test]
fn test_clicks_follow_beats() {
    let mut h = test_engine();
    h.transport().start(true);
    let peaks = h.run_peaks(200);

    let clicked: Vec<usize> = peaks
        .iter()
        .enumerate()
        .filter(|(_, p)| **p > SILENCE_THRESHOLD)
        .map(|(i, _)| i)
        .collect();

    let buffers_per_click = (CLICK_DURATION * 100.0).round() as usize;
    let expected: Vec<usize> = (0..4)
        .flat_map(|beat| (0..buffers_per_click).map(move |b| beat * 50 + b))
        .collect();
    assert_eq!(clicked, expected);
}

/// Test the downbeat and off-beat tones.
#[test]
fn test_downbeat_uses_high_tone() {
    let mut h = test_engine();
    h.transport().start(true);

    // Frame 24 sits 500 µs into the click; left channel
    let downbeat = h.cycle()[48];
    h.run(49);
    let offbeat = h.cycle()[48];

    assert_relative_eq!(downbeat, click(500e-6, HIGH_TONE), epsilon = CLICK_EPSILON);
    assert_relative_eq!(offbeat, click(500e-6, LOW_TONE), epsilon = CLICK_EPSILON);
}

/// Test that count-in beats are silent until beat zero arrives.
#[test]
fn test_count_in_is_silent() {
    let mut h = test_engine();
    h.transport().start(true);
    h.cycle();

    // Another peer moves beat zero half a second into the future
    let clock = Arc::clone(h.engine.clock());
    let mut tl = clock.capture_app_timeline();
    tl.force_beat_at_time(0.0, h.effective_time() + 500_000);
    clock.commit_app_timeline(tl);

    for p in h.run_peaks(50) {
        assert!(p <= SILENCE_THRESHOLD);
    }
    assert_relative_eq!(peak(h.cycle()), 1.0, epsilon = CLICK_EPSILON);
}

/// Test that stopping the transport stops the click.
#[test]
fn test_stop_silences_metronome() {
    let mut h = test_engine();
    h.transport().start(true);
    h.run(3);

    h.transport().stop();
    for p in h.run_peaks(60) {
        assert!(p <= SILENCE_THRESHOLD);
    }
}

/// Test that a plain start turns a running click off.
#[test]
fn test_start_without_metronome_disables_click() {
    let mut h = test_engine();
    h.transport().start(true);
    h.run(60);

    h.transport().start(false);
    let peaks = h.run_peaks(50);
    assert!(peaks.iter().all(|p| *p <= SILENCE_THRESHOLD));
}
