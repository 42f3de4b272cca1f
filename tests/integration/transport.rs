//! Transport integration tests
//!
//! Start/stop edges, tempo changes, latency compensation, and control handle
//! validation, observed through the clock the engine commits to.

use crate::helpers::tolerances::*;
use crate::helpers::*;
use approx::assert_relative_eq;
use pulsebridge::core::Error as CoreError;
use pulsebridge::prelude::*;

/// Test basic start/stop through the control handle.
#[test]
fn test_transport_start_stop() {
    let mut h = test_engine();
    assert!(!h.transport().is_playing());

    h.transport().start(false);
    // Nothing changes until the audio thread runs
    assert!(!h.transport().is_playing());
    h.cycle();
    assert!(h.transport().is_playing());

    h.transport().stop();
    h.cycle();
    assert!(!h.transport().is_playing());
}

/// Test that start puts beat 0 on the first frame of the starting buffer.
#[test]
fn test_start_anchors_beat_zero_with_output_latency() {
    let mut h = test_engine();
    h.transport().start(false);
    let start = h.effective_time();
    h.cycle();

    let tl = h.engine.clock().capture_app_timeline();
    assert_relative_eq!(tl.beat_at_time(start, 4.0), 0.0, epsilon = BEAT_EPSILON);
    assert_eq!(start, START_TIME + 10_000);
}

/// Test that user latency is added on top of the device latency.
#[test]
fn test_user_latency_shifts_anchor() {
    let mut h = test_engine();
    h.transport()
        .latency(Duration::from_millis(5))
        .unwrap()
        .start(false);
    let start = h.effective_time();
    h.cycle();

    assert_eq!(start, START_TIME + 15_000);
    let tl = h.engine.clock().capture_app_timeline();
    assert_relative_eq!(tl.beat_at_time(start, 4.0), 0.0, epsilon = BEAT_EPSILON);
}

/// Test that an out-of-range latency is rejected before it reaches the callback.
#[test]
fn test_latency_bounded() {
    let mut h = test_engine();
    assert_eq!(
        h.transport().latency(Duration::MAX).err(),
        Some(CoreError::InvalidLatency(Duration::MAX))
    );

    h.transport()
        .latency(pulsebridge::core::MAX_LATENCY)
        .unwrap()
        .start(true);
    let start = h.effective_time();
    h.run(3);

    assert_eq!(start, START_TIME + 10_000 + 10_000_000);
    assert!(h.transport().is_playing());
    let tl = h.engine.clock().capture_app_timeline();
    assert_relative_eq!(tl.beat_at_time(start, 4.0), 0.0, epsilon = BEAT_EPSILON);
}

/// Test that steady playback never re-anchors.
#[test]
fn test_beat_advances_while_playing() {
    let mut h = test_engine();
    h.transport().start(false);
    h.run(50);

    // 50 buffers of 10 ms at 120 BPM
    assert_relative_eq!(h.transport().current_beat(), 0.98, epsilon = ROUNDED_BEAT_EPSILON);

    // A second start while playing leaves the beat grid alone
    h.transport().start(false);
    h.cycle();
    assert_relative_eq!(h.transport().current_beat(), 1.0, epsilon = ROUNDED_BEAT_EPSILON);
}

/// Test that a restart re-anchors at the new start time.
#[test]
fn test_restart_re_anchors() {
    let mut h = test_engine();
    h.transport().start(false);
    h.run(30);
    h.transport().stop();
    h.run(5);

    h.transport().start(false);
    let restart = h.effective_time();
    h.cycle();

    let tl = h.engine.clock().capture_app_timeline();
    assert_relative_eq!(tl.beat_at_time(restart, 4.0), 0.0, epsilon = BEAT_EPSILON);
}

/// Test that start and stop in the same window resolve to stopped.
#[test]
fn test_stop_wins_in_same_window() {
    let mut h = test_engine();
    h.transport().start(false).stop();
    h.cycle();
    assert!(!h.transport().is_playing());

    h.transport().start(false);
    h.cycle();
    h.transport().stop().start(false);
    h.cycle();
    assert!(!h.transport().is_playing());
}

/// Test that a tempo change keeps the beat continuous.
#[test]
fn test_tempo_change_is_continuous() {
    let mut h = test_engine();
    h.transport().start(false);
    h.run(10);

    let at = h.effective_time();
    let before = h.engine.clock().capture_app_timeline().beat_at_time(at, 4.0);

    h.transport().tempo(60.0).unwrap();
    h.cycle();

    let tl = h.engine.clock().capture_app_timeline();
    assert_eq!(tl.tempo(), 60.0);
    assert_eq!(h.transport().get_tempo(), 60.0);
    assert_relative_eq!(tl.beat_at_time(at, 4.0), before, epsilon = BEAT_EPSILON);
    assert_relative_eq!(
        tl.beat_at_time(at + 2_000_000, 4.0),
        before + 2.0,
        epsilon = BEAT_EPSILON
    );
    assert_eq!(h.engine.state().tempo, 60.0);
}

/// Test that a tempo request applies exactly once.
#[test]
fn test_tempo_request_is_one_shot() {
    let mut h = test_engine();
    h.transport().tempo(150.0).unwrap();
    h.cycle();

    // Another peer changes the tempo; a stale request must not override it
    let mut tl = h.engine.clock().capture_app_timeline();
    tl.set_tempo(90.0, h.effective_time());
    h.engine.clock().commit_app_timeline(tl);
    h.run(3);

    assert_eq!(h.engine.clock().capture_app_timeline().tempo(), 90.0);
}

/// Test handle validation errors.
#[test]
fn test_handle_validation() {
    let h = test_engine();
    assert_eq!(
        h.transport().tempo(19.0).err(),
        Some(CoreError::InvalidTempo(19.0))
    );
    assert_eq!(
        h.transport().quantum(f64::NAN).err().map(|e| e.to_string()),
        Some("Invalid quantum: NaN. Must be a positive number of beats".to_string())
    );
    assert_eq!(
        h.transport().swing(-0.5).err(),
        Some(CoreError::InvalidSwing(-0.5))
    );
    assert!(h.transport().tempo(999.0).is_ok());
    assert!(h.transport().swing(4.0).is_ok());
}

/// Test that quantum changes reach the audio thread and the state query.
#[test]
fn test_quantum_change_affects_phase() {
    let mut h = test_engine();
    h.transport().quantum(3.0).unwrap().start(false);
    h.run(200);

    // The last buffer started 1.99 s after the anchor: beat 3.98
    let begin = h.effective_time() - 10_000;
    let tl = h.engine.clock().capture_app_timeline();
    assert_relative_eq!(tl.phase_at_time(begin, 3.0), 0.98, epsilon = ROUNDED_BEAT_EPSILON);
    assert_eq!(h.transport().get_quantum(), 3.0);
}

/// Test an external clock built with `build`.
#[test]
fn test_external_clock_receives_initial_tempo() {
    let clock = Arc::new(LocalClock::new(100.0));
    let backend = Arc::new(CaptureBackend::new());
    let mut engine = test_builder()
        .tempo(132.0)
        .build(Arc::clone(&clock), backend)
        .unwrap();

    assert_eq!(clock.capture_app_timeline().tempo(), 100.0);

    let mut output = vec![0.0; TEST_BUFFER_SIZE * 2];
    engine.process(0, TEST_BUFFER_SIZE, &mut output);
    assert_eq!(clock.capture_app_timeline().tempo(), 132.0);
}
